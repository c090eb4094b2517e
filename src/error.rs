//! Error types returned by the engine and its selection algorithms.

use thiserror::Error;

/// An alias for `Result` with [`EvolverError`] as the error type.
pub type Result<T> = std::result::Result<T, EvolverError>;

/// Everything that can go wrong while driving a population.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolverError {
  /// Population size must be at least 1.
  #[error("population size must be greater than zero")]
  EmptyPopulation,

  /// A problem returned a population of the wrong size.
  #[error("new population has {actual} individuals, expected {expected}")]
  PopulationSizeMismatch {
    /// Requested population size.
    expected: usize,
    /// Number of individuals actually produced.
    actual: usize,
  },

  /// Coefficient selection divides by the smallest fitness value.
  #[error("minimum fitness is zero, coefficient selection cannot scale")]
  ZeroFitness,

  /// A fitness value is NaN or infinite.
  #[error("fitness value {0} is not finite")]
  NonFiniteFitness(f64),

  /// There is nothing to resample the next generation from.
  #[error("gene pool is empty, no individual has a weight of at least 1")]
  EmptyGenePool,

  /// Survival fraction must lie in `(0, 1]`.
  #[error("survival fraction {0} is outside of (0, 1]")]
  InvalidSurvival(f64),

  /// A numeric run parameter is NaN or infinite.
  #[error("parameter `{name}` has invalid value {value}")]
  InvalidParameter {
    /// Name of the offending parameter.
    name: &'static str,
    /// Its value.
    value: f64,
  },

  /// A selection name could not be parsed.
  #[error("unknown selection `{0}`")]
  UnknownSelection(String),
}

//! Parameters of a generational run.

use typed_builder::TypedBuilder;

use crate::{
  error::{EvolverError, Result},
  selection::{check_survival, Selection},
};

/// Parameters passed to every generation of [`Evolver::run`] and
/// [`Evolver::iterate`].
///
/// # Examples
/// ```
/// use evolver::{EvolutionParams, Selection};
///
/// // every field but the selection strategy has a default
/// let params = EvolutionParams::builder()
///   .selection(Selection::TopCoefficient)
///   .mu(0.1)
///   .cross_chance(0.7)
///   .survival(0.25)
///   .build();
/// assert!(params.validate().is_ok());
///
/// // survival defaults to keeping everyone
/// let params = EvolutionParams::builder().selection(Selection::Top).build();
/// assert_eq!(params.survival, 1.0);
/// ```
///
/// [`Evolver::run`]: crate::evolver::Evolver::run
/// [`Evolver::iterate`]: crate::evolver::Evolver::iterate
#[derive(TypedBuilder, Clone, Copy, PartialEq, Debug)]
pub struct EvolutionParams {
  /// Selection strategy applied between mutation and reproduction.
  pub selection: Selection,
  /// Mutation intensity, passed as is to [`Problem::mutate`].
  ///
  /// [`Problem::mutate`]: crate::problem::Problem::mutate
  #[builder(default = 0.0)]
  pub mu: f64,
  /// Crossover probability, passed as is to [`Problem::reproduce`].
  ///
  /// [`Problem::reproduce`]: crate::problem::Problem::reproduce
  #[builder(default = 0.0)]
  pub cross_chance: f64,
  /// Fraction of the population that survives top selection, in `(0, 1]`.
  #[builder(default = 1.0)]
  pub survival: f64,
}

impl EvolutionParams {
  /// Checks that `mu` and `cross_chance` are finite and that `survival`
  /// lies in `(0, 1]`.
  pub fn validate(&self) -> Result<()> {
    for (name, value) in [("mu", self.mu), ("cross_chance", self.cross_chance)]
    {
      if !value.is_finite() {
        return Err(EvolverError::InvalidParameter { name, value });
      }
    }
    check_survival(self.survival)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let params = EvolutionParams::builder()
      .selection(Selection::Coefficient)
      .build();
    assert_eq!(params.mu, 0.0);
    assert_eq!(params.cross_chance, 0.0);
    assert_eq!(params.survival, 1.0);
    assert_eq!(params.validate(), Ok(()));
  }

  #[test]
  fn test_validate_rejects_non_finite() {
    let params = EvolutionParams::builder()
      .selection(Selection::Top)
      .mu(f64::NAN)
      .build();
    assert!(matches!(
      params.validate(),
      Err(EvolverError::InvalidParameter { name: "mu", .. })
    ));

    let params = EvolutionParams::builder()
      .selection(Selection::Top)
      .cross_chance(f64::INFINITY)
      .build();
    assert_eq!(
      params.validate(),
      Err(EvolverError::InvalidParameter {
        name: "cross_chance",
        value: f64::INFINITY
      })
    );
  }

  #[test]
  fn test_validate_rejects_survival() {
    let params = EvolutionParams::builder()
      .selection(Selection::TopCoefficient)
      .survival(0.0)
      .build();
    assert_eq!(params.validate(), Err(EvolverError::InvalidSurvival(0.0)));
  }
}

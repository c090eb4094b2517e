//! The generational loop and the population it drives.

use std::cmp::Ordering;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, warn};

use crate::{
  error::{EvolverError, Result},
  fitness::{self, Fitness},
  params::EvolutionParams,
  problem::Problem,
  selection::Selection,
};

/// Owns a population of `P::Individual`s and evolves it one generation at a
/// time.
///
/// Each generation is, in this order and without interleaving:
/// 1. [`Problem::mutate`] with [`EvolutionParams::mu`]
/// 2. [`Evolver::select`] with [`EvolutionParams::selection`] and
///    [`EvolutionParams::survival`]
/// 3. [`Problem::reproduce`] with [`EvolutionParams::cross_chance`]
///
/// Every random draw, both the engine's and the problem's, comes from the
/// engine's random number generator `R`. Two engines built with equally
/// seeded generators and driven with the same arguments end up with equal
/// populations.
///
/// # Examples
/// ```
/// use evolver::{ClosureProblem, EvolutionParams, Evolver, Selection};
/// use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
///
/// let problem = ClosureProblem::builder()
///   .new_population(|n: usize, rng: &mut dyn RngCore| -> Vec<f64> {
///     (0..n).map(|_| rng.gen_range(1.0..100.0)).collect()
///   })
///   .mutate(|p: &mut [f64], mu: f64, rng: &mut dyn RngCore| {
///     p.iter_mut().for_each(|x| *x = (*x + rng.gen_range(-mu..mu)).max(1.0))
///   })
///   .fitness(|x: &f64| *x)
///   .reproduce(|p: &mut Vec<f64>, n: usize, _: f64, rng: &mut dyn RngCore| {
///     while p.len() < n {
///       p.push(p[rng.gen_range(0..p.len())]);
///     }
///   })
///   .build();
///
/// let mut evolver =
///   Evolver::with_rng(problem, 20, StdRng::seed_from_u64(1)).unwrap();
/// let params = EvolutionParams::builder()
///   .selection(Selection::Top)
///   .mu(0.5)
///   .survival(0.2)
///   .build();
/// let before = evolver.population_fitness();
/// evolver.run(50, &params).unwrap();
/// assert_eq!(evolver.population().len(), 20);
/// assert!(evolver.population_fitness() < before);
/// ```
pub struct Evolver<P: Problem, R = StdRng> {
  problem: P,
  population: Vec<P::Individual>,
  pop_size: usize,
  rng: R,
}

impl<P> Evolver<P, StdRng>
where
  P: Problem,
  P::Individual: Clone,
{
  /// Creates an engine with an entropy-seeded [`StdRng`] and an initial
  /// population of `pop_size` individuals.
  ///
  /// # Errors
  ///
  /// See [`Evolver::with_rng`].
  pub fn new(problem: P, pop_size: usize) -> Result<Self> {
    Self::with_rng(problem, pop_size, StdRng::from_entropy())
  }
}

impl<P, R> Evolver<P, R>
where
  P: Problem,
  P::Individual: Clone,
  R: Rng,
{
  /// Creates an engine drawing from `rng` and asks `problem` for an initial
  /// population of `pop_size` individuals.
  ///
  /// # Errors
  ///
  /// - [`EvolverError::EmptyPopulation`] if `pop_size` is zero
  /// - [`EvolverError::PopulationSizeMismatch`] if the problem created a
  ///   population of some other size
  pub fn with_rng(mut problem: P, pop_size: usize, mut rng: R) -> Result<Self> {
    let population = generate(&mut problem, pop_size, &mut rng)?;
    Ok(Self {
      problem,
      population,
      pop_size,
      rng,
    })
  }

  /// Sets a new population size and replaces the whole population with a
  /// freshly created one. This is not a resize: no individual survives.
  ///
  /// # Errors
  ///
  /// Same as [`Evolver::with_rng`]. On error the engine keeps its current
  /// population and size.
  pub fn reset(&mut self, pop_size: usize) -> Result<()> {
    self.population = generate(&mut self.problem, pop_size, &mut self.rng)?;
    self.pop_size = pop_size;
    debug!(pop_size, "population reset");
    Ok(())
  }

  /// Runs exactly `iterations` generations, passing each one its 0-based
  /// index.
  ///
  /// # Errors
  ///
  /// Fails before the first generation if `params` are invalid, see
  /// [`EvolutionParams::validate`]. Stops at the first generation whose
  /// selection fails, see [`Selection::apply`].
  pub fn run(
    &mut self,
    iterations: usize,
    params: &EvolutionParams,
  ) -> Result<()> {
    params.validate()?;
    debug!(
      iterations,
      selection = %params.selection,
      pop_size = self.pop_size,
      "starting run"
    );
    for iteration in 0..iterations {
      self.generation(iteration, params)?;
    }
    Ok(())
  }

  /// Runs a single generation: mutation, selection, reproduction.
  ///
  /// # Errors
  ///
  /// Same as [`Evolver::run`].
  pub fn iterate(
    &mut self,
    iteration: usize,
    params: &EvolutionParams,
  ) -> Result<()> {
    params.validate()?;
    self.generation(iteration, params)
  }

  fn generation(
    &mut self,
    iteration: usize,
    params: &EvolutionParams,
  ) -> Result<()> {
    self
      .problem
      .mutate(&mut self.population, params.mu, &mut self.rng);
    self.select(params.selection, params.survival)?;
    self.problem.reproduce(
      &mut self.population,
      self.pop_size,
      params.cross_chance,
      &mut self.rng,
    );

    if self.population.len() != self.pop_size {
      warn!(
        iteration,
        len = self.population.len(),
        pop_size = self.pop_size,
        "reproduction did not restore population size"
      );
    }
    if tracing::enabled!(tracing::Level::DEBUG) {
      let problem = &self.problem;
      let fitness = fitness::mean_over(
        fitness::evaluate(&self.population, |i| problem.fitness(i)),
        self.pop_size,
      );
      debug!(iteration, fitness, "generation complete");
    }
    Ok(())
  }

  /// Applies `selection` to the population in place. `survival` is the
  /// fraction of `pop_size` that [`Selection::Top`] keeps.
  ///
  /// After [`Selection::Top`] the population may be smaller than
  /// `pop_size` until the next reproduction.
  ///
  /// # Errors
  ///
  /// See [`Selection::apply`]. The population is untouched by a failed step.
  pub fn select(&mut self, selection: Selection, survival: f64) -> Result<()> {
    let problem = &self.problem;
    selection.apply(
      &mut self.population,
      self.pop_size,
      survival,
      |individual| problem.fitness(individual),
      &mut self.rng,
    )
  }
}

impl<P: Problem, R> Evolver<P, R> {
  /// Returns the sum of every individual's fitness divided by `pop_size`.
  ///
  /// The divisor is `pop_size` even when the population currently holds a
  /// different number of individuals, e.g. right after [`Selection::Top`].
  pub fn population_fitness(&self) -> Fitness {
    if self.population.len() != self.pop_size {
      warn!(
        len = self.population.len(),
        pop_size = self.pop_size,
        "averaging fitness over a population of unexpected size"
      );
    }
    fitness::mean_over(
      fitness::evaluate(&self.population, |i| self.problem.fitness(i)),
      self.pop_size,
    )
  }

  /// Returns the individual with the lowest fitness, the first one on ties.
  pub fn fittest(&self) -> Option<&P::Individual> {
    self
      .population
      .iter()
      .map(|i| (i, self.problem.fitness(i)))
      .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
      .map(|(i, _)| i)
  }

  /// Returns current population.
  pub fn population(&self) -> &[P::Individual] {
    &self.population
  }

  /// Returns target population size.
  pub fn pop_size(&self) -> usize {
    self.pop_size
  }

  /// Returns a reference to the problem.
  pub fn problem(&self) -> &P {
    &self.problem
  }

  /// Returns a mutable reference to the problem.
  pub fn problem_mut(&mut self) -> &mut P {
    &mut self.problem
  }

  /// Consumes the engine, returning its population.
  pub fn into_population(self) -> Vec<P::Individual> {
    self.population
  }
}

/// Asks `problem` for exactly `pop_size` new individuals.
fn generate<P, R>(
  problem: &mut P,
  pop_size: usize,
  rng: &mut R,
) -> Result<Vec<P::Individual>>
where
  P: Problem,
  R: Rng,
{
  if pop_size == 0 {
    return Err(EvolverError::EmptyPopulation);
  }
  let population = problem.new_population(pop_size, rng);
  if population.len() != pop_size {
    return Err(EvolverError::PopulationSizeMismatch {
      expected: pop_size,
      actual: population.len(),
    });
  }
  Ok(population)
}

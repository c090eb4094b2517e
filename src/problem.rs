//! The capability set a concrete problem supplies to the engine.

use std::marker::PhantomData;

use rand::{Rng, RngCore};
use typed_builder::TypedBuilder;

use crate::fitness::Fitness;

/// A concrete specialization of the evolutionary loop: what an individual is,
/// how a population of them is created, mutated, scored and recombined.
///
/// The engine treats individuals as opaque values and only ever calls these
/// four methods. Every method that needs randomness receives the engine's
/// random number generator, so a seeded [`Evolver`] is fully reproducible as
/// long as the problem draws from `rng` only.
///
/// # Examples
/// ```
/// use evolver::{Fitness, Problem};
/// use rand::Rng;
///
/// // minimizes `|x - 42|`
/// struct FortyTwo;
///
/// impl Problem for FortyTwo {
///   type Individual = f64;
///
///   fn new_population<R: Rng>(
///     &mut self,
///     pop_size: usize,
///     rng: &mut R,
///   ) -> Vec<f64> {
///     (0..pop_size).map(|_| rng.gen_range(-100.0..100.0)).collect()
///   }
///
///   fn mutate<R: Rng>(&mut self, p: &mut [f64], mu: f64, rng: &mut R) {
///     p.iter_mut().for_each(|x| *x += rng.gen_range(-mu..=mu));
///   }
///
///   fn fitness(&self, x: &f64) -> Fitness {
///     (x - 42.0).abs()
///   }
///
///   fn reproduce<R: Rng>(
///     &mut self,
///     population: &mut Vec<f64>,
///     pop_size: usize,
///     _cross_chance: f64,
///     rng: &mut R,
///   ) {
///     while population.len() < pop_size {
///       let parent = population[rng.gen_range(0..population.len())];
///       population.push(parent);
///     }
///   }
/// }
/// ```
///
/// **Note that you can also assemble a problem from closures with
/// [`ClosureProblem`].**
///
/// [`Evolver`]: crate::evolver::Evolver
pub trait Problem {
  /// A single candidate solution.
  type Individual;

  /// Creates an initial generation of exactly `pop_size` individuals.
  fn new_population<R: Rng>(
    &mut self,
    pop_size: usize,
    rng: &mut R,
  ) -> Vec<Self::Individual>;

  /// Perturbs individuals in place. Meaning and units of `mu` are up to
  /// the problem.
  fn mutate<R: Rng>(
    &mut self,
    population: &mut [Self::Individual],
    mu: f64,
    rng: &mut R,
  );

  /// Scores an individual. Must be stable within one generation and must
  /// never be exactly `0.0` if coefficient selection is used.
  fn fitness(&self, individual: &Self::Individual) -> Fitness;

  /// Recombines the survivors of selection. Expected to leave exactly
  /// `pop_size` individuals in `population`.
  fn reproduce<R: Rng>(
    &mut self,
    population: &mut Vec<Self::Individual>,
    pop_size: usize,
    cross_chance: f64,
    rng: &mut R,
  );
}

/// A [`Problem`] assembled from four closures.
///
/// Closures receive the engine's random number generator as
/// `&mut dyn RngCore`, which still exposes every [`Rng`] method.
///
/// # Examples
/// ```
/// use evolver::{ClosureProblem, Evolver};
/// use rand::{Rng, RngCore};
///
/// let problem = ClosureProblem::builder()
///   .new_population(|n: usize, rng: &mut dyn RngCore| -> Vec<f64> {
///     (0..n).map(|_| rng.gen_range(1.0..10.0)).collect()
///   })
///   .mutate(|_: &mut [f64], _: f64, _: &mut dyn RngCore| {})
///   .fitness(|x: &f64| *x)
///   .reproduce(
///     |p: &mut Vec<f64>, n: usize, _: f64, _: &mut dyn RngCore| {
///       p.resize(n, 1.0)
///     },
///   )
///   .build();
///
/// let evolver = Evolver::new(problem, 4).unwrap();
/// assert_eq!(evolver.population().len(), 4);
/// ```
///
/// Since closure parameters can't be inferred from a builder setter,
/// annotate them as above or implement [`Problem`] for your own type instead.
/// The individual type is only fixed once the problem is used as a
/// [`Problem`], e.g. handed to an [`Evolver`]. A problem that is built but
/// never used needs it spelled out: `ClosureProblem<f64, _, _, _, _>`.
///
/// [`Evolver`]: crate::evolver::Evolver
#[derive(TypedBuilder)]
pub struct ClosureProblem<I, N, M, F, P> {
  /// Creates `n` individuals.
  new_population: N,
  /// Mutates a population in place.
  mutate: M,
  /// Scores an individual.
  fitness: F,
  /// Restores the population after selection.
  reproduce: P,
  #[builder(setter(skip), default)]
  _individual: PhantomData<I>,
}

impl<I, N, M, F, P> Problem for ClosureProblem<I, N, M, F, P>
where
  N: FnMut(usize, &mut dyn RngCore) -> Vec<I>,
  M: FnMut(&mut [I], f64, &mut dyn RngCore),
  F: Fn(&I) -> Fitness,
  P: FnMut(&mut Vec<I>, usize, f64, &mut dyn RngCore),
{
  type Individual = I;

  fn new_population<R: Rng>(&mut self, pop_size: usize, rng: &mut R) -> Vec<I> {
    (self.new_population)(pop_size, rng)
  }

  fn mutate<R: Rng>(&mut self, population: &mut [I], mu: f64, rng: &mut R) {
    (self.mutate)(population, mu, rng)
  }

  fn fitness(&self, individual: &I) -> Fitness {
    (self.fitness)(individual)
  }

  fn reproduce<R: Rng>(
    &mut self,
    population: &mut Vec<I>,
    pop_size: usize,
    cross_chance: f64,
    rng: &mut R,
  ) {
    (self.reproduce)(population, pop_size, cross_chance, rng)
  }
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;

  fn exercise<P: Problem<Individual = f64>>(problem: &mut P) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(3);
    let mut population = problem.new_population(4, &mut rng);
    problem.mutate(&mut population, 1.0, &mut rng);
    population.truncate(2);
    problem.reproduce(&mut population, 4, 0.5, &mut rng);
    population
  }

  #[test]
  fn test_problem_from_closures() {
    let mut problem = ClosureProblem::builder()
      .new_population(|n: usize, _: &mut dyn RngCore| -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
      })
      .mutate(|p: &mut [f64], mu: f64, _: &mut dyn RngCore| {
        p.iter_mut().for_each(|x| *x += mu)
      })
      .fitness(|x: &f64| x * 2.0)
      .reproduce(|p: &mut Vec<f64>, n: usize, _: f64, _: &mut dyn RngCore| {
        p.resize(n, 0.0)
      })
      .build();
    assert_eq!(exercise(&mut problem), [1.0, 2.0, 0.0, 0.0]);
    assert_eq!(problem.fitness(&3.0), 6.0);
  }

  #[test]
  fn test_closures_draw_from_engine_rng() {
    let build = || {
      ClosureProblem::builder()
        .new_population(|n: usize, rng: &mut dyn RngCore| -> Vec<f64> {
          (0..n).map(|_| rng.gen_range(0.0..1.0)).collect()
        })
        .mutate(|p: &mut [f64], mu: f64, rng: &mut dyn RngCore| {
          p.iter_mut().for_each(|x| *x += rng.gen_range(-mu..mu))
        })
        .fitness(|x: &f64| *x)
        .reproduce(
          |p: &mut Vec<f64>, n: usize, _: f64, rng: &mut dyn RngCore| {
            while p.len() < n {
              p.push(rng.gen());
            }
          },
        )
        .build()
    };
    assert_eq!(exercise(&mut build()), exercise(&mut build()));
  }

  #[test]
  fn test_custom_problem() {
    struct Constant;
    impl Problem for Constant {
      type Individual = f64;

      fn new_population<R: Rng>(&mut self, n: usize, _: &mut R) -> Vec<f64> {
        vec![7.0; n]
      }

      fn mutate<R: Rng>(&mut self, _: &mut [f64], _: f64, _: &mut R) {}

      fn fitness(&self, x: &f64) -> Fitness {
        *x
      }

      fn reproduce<R: Rng>(
        &mut self,
        population: &mut Vec<f64>,
        pop_size: usize,
        _: f64,
        _: &mut R,
      ) {
        population.resize(pop_size, 7.0);
      }
    }

    assert_eq!(exercise(&mut Constant), [7.0; 4]);
  }
}

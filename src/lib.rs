//! **Evolver** is a generational evolutionary optimization driver. It owns a
//! population of candidate solutions and runs it through a fixed number of
//! generations, leaving everything problem specific to you.
//!
//! Here's a [quick start example](#example) for the impatient.
//!
//! The crate is built around two abstractions:
//! - **Problem** - a concrete specialization of the algorithm, represented
//!   with the [`Problem`] trait. It defines what an **individual** is and
//!   supplies four operators: creation of a new **population**, **mutation**,
//!   **fitness** evaluation and **reproduction**
//! - **Evolver** - the engine, represented with [`Evolver`]. It owns the
//!   population, its target size and a random number generator, and performs
//!   the generational loop:
//!   1. **Mutate** the population with the problem's mutation operator
//!   2. **Select** survivors with one of the built-in [`Selection`]
//!      strategies
//!   3. **Reproduce** survivors with the problem's reproduction operator,
//!      restoring the population to its target size
//!
//! The loop runs for exactly as many generations as you ask it to. There is
//! no convergence detection: inspect the population between calls to
//! [`Evolver::run`] or [`Evolver::iterate`] if you need it.
//!
//! # Selection
//!
//! The engine implements three selection strategies:
//!
//! | Strategy                      | Population size after selection | Favors          |
//! |:------------------------------|:-------------------------------:|:---------------:|
//! | [`Selection::Top`]            | `max(floor(pop_size * s), 1)`   | lowest fitness  |
//! | [`Selection::Coefficient`]    | `pop_size`                      | highest fitness |
//! | [`Selection::TopCoefficient`] | `pop_size`                      | both, in order  |
//!
//! Yes, the directions disagree. [`Selection::Top`] treats lower fitness as
//! better, while [`Selection::Coefficient`] hands out gene pool entries in
//! proportion to raw fitness values. Pick a strategy and shape your fitness
//! function accordingly.
//!
//! [`Selection::Coefficient`] scales fitness values by `1 / min` when the
//! smallest value is below `1`, so it **cannot** handle a fitness of exactly
//! zero and fails with [`EvolverError::ZeroFitness`] instead.
//!
//! # Randomness
//!
//! Every random draw goes through the engine's generator, which is handed to
//! each problem operator as well. Seed it with [`Evolver::with_rng`] and
//! two runs with equal arguments produce equal populations.
//!
//! # Logging
//!
//! The engine emits [`tracing`] events: `debug` per run and generation,
//! `trace` per selection step, and `warn` when reproduction fails to restore
//! the population size. Install any subscriber to see them.
//!
//! # Example
//!
//! Minimizing `x^2 + y^2` with top selection.
//! ```
//! use evolver::{EvolutionParams, Evolver, Fitness, Problem, Selection};
//! use rand::{rngs::StdRng, Rng, SeedableRng};
//!
//! struct Sphere;
//!
//! impl Problem for Sphere {
//!   type Individual = (f64, f64);
//!
//!   fn new_population<R: Rng>(
//!     &mut self,
//!     n: usize,
//!     rng: &mut R,
//!   ) -> Vec<(f64, f64)> {
//!     (0..n)
//!       .map(|_| (rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)))
//!       .collect()
//!   }
//!
//!   fn mutate<R: Rng>(&mut self, p: &mut [(f64, f64)], mu: f64, rng: &mut R) {
//!     for (x, y) in p.iter_mut() {
//!       *x += rng.gen_range(-mu..mu);
//!       *y += rng.gen_range(-mu..mu);
//!     }
//!   }
//!
//!   fn fitness(&self, &(x, y): &(f64, f64)) -> Fitness {
//!     x * x + y * y
//!   }
//!
//!   fn reproduce<R: Rng>(
//!     &mut self,
//!     p: &mut Vec<(f64, f64)>,
//!     pop_size: usize,
//!     cross_chance: f64,
//!     rng: &mut R,
//!   ) {
//!     let survivors = p.len();
//!     while p.len() < pop_size {
//!       let a = p[rng.gen_range(0..survivors)];
//!       let b = p[rng.gen_range(0..survivors)];
//!       p.push(if rng.gen_bool(cross_chance) { (a.0, b.1) } else { a });
//!     }
//!   }
//! }
//!
//! let mut evolver =
//!   Evolver::with_rng(Sphere, 50, StdRng::seed_from_u64(7)).unwrap();
//! let params = EvolutionParams::builder()
//!   .selection(Selection::Top)
//!   .mu(0.1)
//!   .cross_chance(0.5)
//!   .survival(0.2)
//!   .build();
//! evolver.run(100, &params).unwrap();
//! let &(x, y) = evolver.fittest().unwrap();
//! assert!(x * x + y * y < 1.0);
//! ```
//!
//! You can find more examples in the *demos* folder in the root of the
//! project.

#![warn(missing_docs)]

pub mod error;
pub mod evolver;
pub mod fitness;
pub mod params;
pub mod problem;
pub mod selection;

pub use error::{EvolverError, Result};
pub use evolver::Evolver;
pub use fitness::Fitness;
pub use params::EvolutionParams;
pub use problem::{ClosureProblem, Problem};
pub use selection::Selection;

//! Minimizes the sphere function `f(x, y, z) = x^2 + y^2 + z^2` with top
//! selection. Run with `RUST_LOG=evolver=debug` to watch every generation.

use evolver::{ClosureProblem, EvolutionParams, Evolver, Selection};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing_subscriber::EnvFilter;

// our 'individual' is a point in 3d space
type Point = [f64; 3];

fn sphere(p: &Point) -> f64 {
  p.iter().map(|c| c * c).sum()
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let problem = ClosureProblem::builder()
    // initial points lie in a cube between -100 and 100
    .new_population(|n: usize, rng: &mut dyn RngCore| -> Vec<Point> {
      (0..n)
        .map(|_| [(); 3].map(|_| rng.gen_range(-100.0..100.0)))
        .collect()
    })
    // shift each coordinate by a value from normal distribution with
    // standard deviation `mu`
    .mutate(|points: &mut [Point], mu: f64, rng: &mut dyn RngCore| {
      let normal = Normal::new(0.0, mu).expect("mu is a valid deviation");
      for c in points.iter_mut().flatten() {
        *c += normal.sample(rng);
      }
    })
    .fitness(sphere)
    // pick two random survivors and mix their coordinates
    .reproduce(
      |points: &mut Vec<Point>, n: usize, cross: f64, rng: &mut dyn RngCore| {
        let survivors = points.len();
        while points.len() < n {
          let a = points[rng.gen_range(0..survivors)];
          let b = points[rng.gen_range(0..survivors)];
          let child =
            [0, 1, 2].map(|i| if rng.gen_bool(cross) { b[i] } else { a[i] });
          points.push(child);
        }
      },
    )
    .build();

  let mut evolver = Evolver::with_rng(problem, 100, StdRng::seed_from_u64(42))
    .expect("population size is not zero");

  let params = EvolutionParams::builder()
    .selection(Selection::Top)
    .mu(0.5)
    .cross_chance(0.5)
    .survival(0.1)
    .build();

  println!(" gen | mean fitness");
  for round in 0..10 {
    evolver.run(20, &params).expect("top selection does not fail");
    println!("{:>4} | {:.6}", (round + 1) * 20, evolver.population_fitness());
  }

  let best = evolver.fittest().expect("population is not empty");
  println!("best: {best:.4?} -> {:.6}", sphere(best));
}

//! Evolves random strings towards a target phrase with top-coefficient
//! selection. Survival is left at `1.0`, so top selection culls nobody and
//! each word is resampled with a chance proportional to the number of
//! characters it got right. Culling would work against this run: top
//! selection keeps the lowest fitness, while here higher is better.

use evolver::{EvolutionParams, Evolver, Fitness, Problem, Selection};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz ";

struct TargetWord {
  target: Vec<u8>,
}

impl TargetWord {
  fn matches(&self, word: &[u8]) -> usize {
    word.iter().zip(&self.target).filter(|(a, b)| a == b).count()
  }

  fn random_char<R: Rng>(rng: &mut R) -> u8 {
    *ALPHABET.choose(rng).expect("alphabet is not empty")
  }
}

impl Problem for TargetWord {
  type Individual = Vec<u8>;

  fn new_population<R: Rng>(&mut self, n: usize, rng: &mut R) -> Vec<Vec<u8>> {
    (0..n)
      .map(|_| self.target.iter().map(|_| Self::random_char(rng)).collect())
      .collect()
  }

  // `mu` is the chance of each character to be replaced
  fn mutate<R: Rng>(&mut self, words: &mut [Vec<u8>], mu: f64, rng: &mut R) {
    for c in words.iter_mut().flatten() {
      if rng.gen_bool(mu) {
        *c = Self::random_char(rng);
      }
    }
  }

  // higher is better for coefficient selection. the `+ 1` keeps fitness away
  // from zero, which coefficient selection can't scale
  fn fitness(&self, word: &Vec<u8>) -> Fitness {
    (self.matches(word) + 1) as Fitness
  }

  // single point crossover of two resampled parents
  fn reproduce<R: Rng>(
    &mut self,
    words: &mut Vec<Vec<u8>>,
    pop_size: usize,
    cross_chance: f64,
    rng: &mut R,
  ) {
    let parents = std::mem::take(words);
    while words.len() < pop_size {
      let a = parents.choose(rng).expect("selection leaves survivors");
      let b = parents.choose(rng).expect("selection leaves survivors");
      let mut child = a.clone();
      if rng.gen_bool(cross_chance) {
        let point = rng.gen_range(0..child.len());
        child[point..].copy_from_slice(&b[point..]);
      }
      words.push(child);
    }
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let target = "survival of the fittest";
  let problem = TargetWord {
    target: target.as_bytes().to_vec(),
  };
  let mut evolver = Evolver::with_rng(problem, 200, StdRng::seed_from_u64(7))
    .expect("population size is not zero");

  // selection strategy can also be parsed from its name
  let selection: Selection = "top_coefficient".parse().expect("known name");
  let params = EvolutionParams::builder()
    .selection(selection)
    .mu(0.02)
    .cross_chance(0.7)
    .build();

  for generation in 0..500 {
    evolver
      .iterate(generation, &params)
      .expect("fitness is never zero");
    let best = evolver
      .population()
      .iter()
      .max_by_key(|w| evolver.problem().matches(w))
      .expect("population is not empty");
    if generation % 25 == 0 || best == target.as_bytes() {
      println!("{generation:>4} | {}", String::from_utf8_lossy(best));
    }
    if best == target.as_bytes() {
      break;
    }
  }
}

//! Selection strategies and utilities.

use std::{cmp::Ordering, fmt, str::FromStr};

use itertools::Itertools;
use rand::{
  distributions::{Distribution, WeightedIndex},
  Rng,
};

use crate::{
  error::{EvolverError, Result},
  fitness::{self, Fitness},
};

/// Decides which individuals survive a generation and how the next
/// generation's gene pool is weighted.
///
/// Note that the strategies disagree on what a *good* fitness is:
/// - [`Top`] sorts ascending and keeps the front, so **lower is better**;
/// - [`Coefficient`] gives each individual a number of gene pool entries
///   proportional to its fitness, so **higher raw values** are drawn more
///   often.
///
/// Shape your fitness function for the strategy you pick.
///
/// # Examples
/// ```
/// use evolver::Selection;
///
/// let selection: Selection = "top_coefficient".parse().unwrap();
/// assert_eq!(selection, Selection::TopCoefficient);
/// assert!("roulette".parse::<Selection>().is_err());
/// ```
///
/// [`Top`]: Selection::Top
/// [`Coefficient`]: Selection::Coefficient
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Selection {
  /// Keeps the `max(floor(pop_size * s), 1)` individuals with the lowest
  /// fitness, irrespective of how much better they are. Leaves the population
  /// shrunk until reproduction restores it.
  Top,
  /// Resamples `pop_size` individuals with replacement, each one drawn with
  /// a chance proportional to its fitness. Fitness values are scaled so that
  /// the smallest one is at least `1`. Fails if the smallest fitness is zero.
  Coefficient,
  /// Applies [`Top`](Selection::Top), then resamples the survivors with
  /// [`Coefficient`](Selection::Coefficient), restoring `pop_size`.
  TopCoefficient,
}

impl Selection {
  /// Every strategy, in declaration order.
  pub const ALL: [Selection; 3] =
    [Selection::Top, Selection::Coefficient, Selection::TopCoefficient];

  /// Returns the name this strategy is parsed from and displayed as.
  pub const fn name(self) -> &'static str {
    match self {
      Selection::Top => "top",
      Selection::Coefficient => "coefficient",
      Selection::TopCoefficient => "top_coefficient",
    }
  }

  /// Applies this strategy to `population` in place.
  ///
  /// `pop_size` is the target population size, which is not necessarily
  /// `population.len()`. `survival` is only read by [`Selection::Top`] and
  /// [`Selection::TopCoefficient`] and must lie in `(0, 1]`. `fitness` is
  /// evaluated exactly once per individual per strategy step.
  ///
  /// # Errors
  ///
  /// - [`EvolverError::InvalidSurvival`] if `survival` is outside `(0, 1]`
  /// - [`EvolverError::NonFiniteFitness`] on NaN fitness, or on any
  ///   non-finite fitness during resampling
  /// - [`EvolverError::ZeroFitness`] if a resampled individual scores `0`
  /// - [`EvolverError::EmptyGenePool`] if no individual gets a single gene
  ///   pool entry
  ///
  /// On error `population` is left as it was before the failing step.
  pub fn apply<I, F, R>(
    self,
    population: &mut Vec<I>,
    pop_size: usize,
    survival: f64,
    fitness: F,
    rng: &mut R,
  ) -> Result<()>
  where
    I: Clone,
    F: Fn(&I) -> Fitness,
    R: Rng + ?Sized,
  {
    match self {
      Selection::Top => top(population, pop_size, survival, &fitness),
      Selection::Coefficient => {
        coefficient(population, pop_size, &fitness, rng)
      }
      Selection::TopCoefficient => {
        top(population, pop_size, survival, &fitness)?;
        coefficient(population, pop_size, &fitness, rng)
      }
    }
  }
}

impl fmt::Display for Selection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Selection {
  type Err = EvolverError;

  fn from_str(s: &str) -> Result<Self> {
    Selection::ALL
      .into_iter()
      .find(|selection| selection.name() == s)
      .ok_or_else(|| EvolverError::UnknownSelection(s.to_owned()))
  }
}

/// Checks that a survival fraction lies in `(0, 1]`.
pub(crate) fn check_survival(survival: f64) -> Result<()> {
  if survival > 0.0 && survival <= 1.0 {
    Ok(())
  } else {
    Err(EvolverError::InvalidSurvival(survival))
  }
}

/// Number of individuals [`Selection::Top`] keeps.
fn survivor_count(pop_size: usize, survival: f64) -> usize {
  ((pop_size as f64 * survival).floor() as usize).max(1)
}

fn top<I, F>(
  population: &mut Vec<I>,
  pop_size: usize,
  survival: f64,
  fitness: F,
) -> Result<()>
where
  F: Fn(&I) -> Fitness,
{
  check_survival(survival)?;
  let fitnesses = fitness::evaluate(population, fitness);
  if let Some(&nan) = fitnesses.iter().find(|f| f.is_nan()) {
    return Err(EvolverError::NonFiniteFitness(nan));
  }

  let surviving = survivor_count(pop_size, survival);
  tracing::trace!(surviving, of = population.len(), "top selection");

  // `sorted_by` is stable, ties keep their relative order
  *population = std::mem::take(population)
    .into_iter()
    .zip(fitnesses)
    .sorted_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    .take(surviving)
    .map(|(individual, _)| individual)
    .collect();
  Ok(())
}

fn coefficient<I, F, R>(
  population: &mut Vec<I>,
  pop_size: usize,
  fitness: F,
  rng: &mut R,
) -> Result<()>
where
  I: Clone,
  F: Fn(&I) -> Fitness,
  R: Rng + ?Sized,
{
  let pool = GenePool::new(&fitness::evaluate(population, fitness))?;
  tracing::trace!(
    scale = pool.scale,
    entries = pool.entries,
    "coefficient selection"
  );

  *population = (0..pop_size)
    .map(|_| population[pool.draw(rng)].clone())
    .collect();
  Ok(())
}

/// The multiset of individuals coefficient selection resamples from.
///
/// Instead of materializing every entry, the pool keeps a multiplicity per
/// individual and draws indices weighted by it, which is the same as drawing
/// uniformly from the materialized pool.
struct GenePool {
  index: WeightedIndex<f64>,
  scale: f64,
  entries: f64,
}

impl GenePool {
  fn new(fitnesses: &[Fitness]) -> Result<Self> {
    let (copies, scale) = multiplicities(fitnesses)?;

    // a subnormal minimum overflows `scale`, huge values overflow the sum
    let entries: f64 = copies.iter().sum();
    if !entries.is_finite() {
      return Err(EvolverError::NonFiniteFitness(entries));
    }

    let index =
      WeightedIndex::new(&copies).map_err(|_| EvolverError::EmptyGenePool)?;
    Ok(Self {
      index,
      scale,
      entries,
    })
  }

  /// Returns the population index of a uniformly drawn pool entry.
  fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
    self.index.sample(rng)
  }
}

/// Returns how many gene pool entries each individual gets, along with the
/// applied scale.
///
/// Individual `i` appears `trunc(fitness[i] * scale)` times, where `scale` is
/// `1 / min(fitness)` if that is greater than `1` and `1` otherwise, so a
/// positive minimum always earns at least one entry. Negative values earn
/// none.
fn multiplicities(fitnesses: &[Fitness]) -> Result<(Vec<f64>, f64)> {
  if let Some(&f) = fitnesses.iter().find(|f| !f.is_finite()) {
    return Err(EvolverError::NonFiniteFitness(f));
  }
  if fitnesses.iter().any(|&f| f == 0.0) {
    return Err(EvolverError::ZeroFitness);
  }
  let min = fitnesses
    .iter()
    .copied()
    .reduce(f64::min)
    .ok_or(EvolverError::EmptyGenePool)?;

  let scale = 1.0 / min;
  // dividing keeps `min / min` at exactly 1, `min * scale` may round below it
  let copies = fitnesses
    .iter()
    .map(|&f| if scale > 1.0 { f / min } else { f })
    .map(|f| f.trunc().max(0.0))
    .collect();
  Ok((copies, scale.max(1.0)))
}

#[cfg(test)]
mod tests {
  use rand::{rngs::StdRng, SeedableRng};

  use super::*;

  /// Individuals are their own fitness.
  fn select(
    selection: Selection,
    population: &mut Vec<f64>,
    pop_size: usize,
    survival: f64,
  ) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    selection.apply(population, pop_size, survival, |f: &f64| *f, &mut rng)
  }

  #[test]
  fn test_parse_names() {
    for selection in Selection::ALL {
      assert_eq!(selection.to_string().parse::<Selection>(), Ok(selection));
    }
    assert_eq!(
      "TOP".parse::<Selection>(),
      Err(EvolverError::UnknownSelection("TOP".into()))
    );
  }

  #[test]
  fn test_top_keeps_lowest_in_order() {
    // individuals are labels, fitness is looked up
    let fitness = |label: &char| match *label {
      'a' => 4.0,
      'b' => 1.0,
      'c' => 3.0,
      _ => 2.0,
    };
    let mut population = vec!['a', 'b', 'c', 'd'];
    let mut rng = StdRng::seed_from_u64(0);
    Selection::Top
      .apply(&mut population, 4, 0.5, fitness, &mut rng)
      .unwrap();
    assert_eq!(population, ['b', 'd']);
  }

  #[test]
  fn test_top_is_stable() {
    let fitness = |(f, _): &(f64, u8)| *f;
    let mut population = vec![(2.0, 0), (1.0, 1), (2.0, 2), (1.0, 3)];
    let mut rng = StdRng::seed_from_u64(0);
    Selection::Top
      .apply(&mut population, 4, 0.75, fitness, &mut rng)
      .unwrap();
    assert_eq!(population, [(1.0, 1), (1.0, 3), (2.0, 0)]);
  }

  #[test]
  fn test_top_keeps_at_least_one() {
    let mut population = vec![5.0, 3.0, 9.0];
    select(Selection::Top, &mut population, 3, 0.01).unwrap();
    assert_eq!(population, [3.0]);
  }

  #[test]
  fn test_top_counts_from_pop_size() {
    // population already shrunk below pop_size
    let mut population = vec![5.0, 3.0];
    select(Selection::Top, &mut population, 10, 0.5).unwrap();
    assert_eq!(population, [3.0, 5.0]);
  }

  #[test]
  fn test_top_full_survival_sorts() {
    let mut population = vec![5.0, -3.0, 9.0, 0.0];
    select(Selection::Top, &mut population, 4, 1.0).unwrap();
    assert_eq!(population, [-3.0, 0.0, 5.0, 9.0]);
  }

  #[test]
  fn test_top_rejects_nan() {
    let mut population = vec![1.0, f64::NAN];
    assert!(matches!(
      select(Selection::Top, &mut population, 2, 1.0),
      Err(EvolverError::NonFiniteFitness(f)) if f.is_nan()
    ));
    assert_eq!(population.len(), 2);
  }

  #[test]
  fn test_invalid_survival() {
    for survival in [0.0, -0.5, 1.5, f64::NAN] {
      let mut population = vec![1.0, 2.0];
      let result = select(Selection::Top, &mut population, 2, survival);
      assert!(matches!(result, Err(EvolverError::InvalidSurvival(_))));
      let result =
        select(Selection::TopCoefficient, &mut population, 2, survival);
      assert!(matches!(result, Err(EvolverError::InvalidSurvival(_))));
    }
    // coefficient does not read the survival fraction
    let mut population = vec![1.0, 2.0];
    select(Selection::Coefficient, &mut population, 2, 7.0).unwrap();
  }

  #[test]
  fn test_multiplicities_unscaled() {
    let (copies, scale) = multiplicities(&[1.0, 2.5, 4.0]).unwrap();
    assert_eq!(scale, 1.0);
    assert_eq!(copies, [1.0, 2.0, 4.0]);
    assert_eq!(GenePool::new(&[1.0, 2.5, 4.0]).unwrap().entries, 7.0);
  }

  #[test]
  fn test_multiplicities_scale_small_minimum() {
    let (copies, scale) = multiplicities(&[0.5, 1.5, 0.75]).unwrap();
    assert_eq!(scale, 2.0);
    assert_eq!(copies, [1.0, 3.0, 1.0]);
  }

  #[test]
  fn test_multiplicities_large_minimum_not_scaled_down() {
    let (copies, scale) = multiplicities(&[10.0, 20.0]).unwrap();
    assert_eq!(scale, 1.0);
    assert_eq!(copies, [10.0, 20.0]);
  }

  #[test]
  fn test_negative_fitness_earns_no_entries() {
    let (copies, _) = multiplicities(&[-2.0, 3.0]).unwrap();
    assert_eq!(copies, [0.0, 3.0]);
    assert!(matches!(
      GenePool::new(&[-2.0, 0.5]),
      Err(EvolverError::EmptyGenePool)
    ));
  }

  #[test]
  fn test_gene_pool_failures() {
    assert!(matches!(
      GenePool::new(&[1.0, 0.0, 3.0]),
      Err(EvolverError::ZeroFitness)
    ));
    assert!(matches!(
      GenePool::new(&[-0.0, 3.0]),
      Err(EvolverError::ZeroFitness)
    ));
    assert!(matches!(
      GenePool::new(&[1.0, f64::INFINITY]),
      Err(EvolverError::NonFiniteFitness(_))
    ));
    assert!(matches!(
      GenePool::new(&[1e-320, 1.0]),
      Err(EvolverError::NonFiniteFitness(_))
    ));
    assert!(matches!(GenePool::new(&[]), Err(EvolverError::EmptyGenePool)));
  }

  #[test]
  fn test_coefficient_restores_pop_size_from_originals() {
    let mut population = vec![1.0, 2.0, 3.0];
    select(Selection::Coefficient, &mut population, 8, 1.0).unwrap();
    assert_eq!(population.len(), 8);
    assert!(population.iter().all(|f| [1.0, 2.0, 3.0].contains(f)));
  }

  #[test]
  fn test_coefficient_zero_fitness_leaves_population() {
    let mut population = vec![1.0, 0.0, 3.0];
    assert_eq!(
      select(Selection::Coefficient, &mut population, 3, 1.0),
      Err(EvolverError::ZeroFitness)
    );
    assert_eq!(population, [1.0, 0.0, 3.0]);
  }

  #[test]
  fn test_coefficient_is_proportional() {
    // one entry for `1.0`, three for `3.0`
    let mut population = vec![1.0, 3.0];
    select(Selection::Coefficient, &mut population, 10_000, 1.0).unwrap();
    let ones = population.iter().filter(|&&f| f == 1.0).count();
    assert!((2_000..3_000).contains(&ones), "got {ones} of 10000");
  }

  #[test]
  fn test_top_coefficient_restores_pop_size() {
    let mut population = vec![4.0, 1.0, 3.0, 2.0, 6.0, 5.0];
    select(Selection::TopCoefficient, &mut population, 6, 0.5).unwrap();
    assert_eq!(population.len(), 6);
    // only the three lowest survived culling
    assert!(population.iter().all(|f| [1.0, 2.0, 3.0].contains(f)));
  }

  #[test]
  fn test_fitness_evaluated_once_per_step() {
    // every call scores differently, so repeated calls would disagree
    let calls = std::cell::Cell::new(0usize);
    let fitness = |x: &f64| {
      calls.set(calls.get() + 1);
      x + calls.get() as f64
    };
    let originals = [4.0, 1.0, 3.0, 2.0, 6.0, 5.0, 8.0, 7.0];
    let mut rng = StdRng::seed_from_u64(7);

    for (selection, expected) in [
      (Selection::Top, 8),
      (Selection::Coefficient, 8),
      (Selection::TopCoefficient, 8 + 4),
    ] {
      calls.set(0);
      let mut population = originals.to_vec();
      selection
        .apply(&mut population, 8, 0.5, fitness, &mut rng)
        .unwrap();
      assert_eq!(calls.get(), expected, "{selection}");
      assert!(population.iter().all(|f| originals.contains(f)));
    }
  }
}

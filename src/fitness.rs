//! Fitness values and helpers that aggregate them over a population.

/// An alias for a fitness value.
///
/// The engine attaches no direction to it on its own: [`Selection::Top`]
/// keeps the *lowest* values, while [`Selection::Coefficient`] gives *higher*
/// values more copies in the gene pool. See [`Selection`] for details.
///
/// [`Selection`]: crate::selection::Selection
/// [`Selection::Top`]: crate::selection::Selection::Top
/// [`Selection::Coefficient`]: crate::selection::Selection::Coefficient
pub type Fitness = f64;

/// Evaluates `fitness` for each individual exactly once, preserving
/// population order.
pub(crate) fn evaluate<I, F>(population: &[I], fitness: F) -> Vec<Fitness>
where
  F: Fn(&I) -> Fitness,
{
  population.iter().map(fitness).collect()
}

/// Sums given fitness values and divides the sum by `divisor`, which is not
/// necessarily the number of values.
pub(crate) fn mean_over<T>(fitnesses: T, divisor: usize) -> Fitness
where
  T: IntoIterator<Item = Fitness>,
{
  fitnesses.into_iter().sum::<Fitness>() / divisor as Fitness
}

//! Stopping policies for the generational loop.
//!
//! A policy is consulted once per generation boundary, before the next
//! generation runs, and never in the middle of one.

use std::fmt;
use std::time::Duration;

/// Snapshot of a running search, handed to [`StoppingPolicy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchProgress {
    /// Generations completed so far.
    pub generation: usize,
    /// Cost evaluations performed so far, including the initial population.
    pub evaluations: usize,
    /// Best cost currently in the population.
    pub best_cost: f64,
    /// Wall-clock time since the search started.
    pub elapsed: Duration,
}

/// Decides whether the search should run another generation.
///
/// Any `FnMut(&SearchProgress) -> bool` closure is a policy:
///
/// ```
/// use rocket_bees::bees::{SearchProgress, StoppingPolicy};
///
/// let mut policy = |p: &SearchProgress| p.generation < 3;
/// # let progress = SearchProgress {
/// #     generation: 0, evaluations: 0, best_cost: 1.0, elapsed: Default::default(),
/// # };
/// assert!(policy.should_continue(&progress));
/// ```
pub trait StoppingPolicy {
    /// Returns `true` to run another generation.
    fn should_continue(&mut self, progress: &SearchProgress) -> bool;
}

impl<F> StoppingPolicy for F
where
    F: FnMut(&SearchProgress) -> bool,
{
    fn should_continue(&mut self, progress: &SearchProgress) -> bool {
        self(progress)
    }
}

/// Runs a fixed number of generations.
#[derive(Debug, Clone, Copy)]
pub struct MaxGenerations(pub usize);

impl StoppingPolicy for MaxGenerations {
    fn should_continue(&mut self, progress: &SearchProgress) -> bool {
        progress.generation < self.0
    }
}

/// Stops once the number of cost evaluations reaches the budget.
///
/// The check happens between generations, so the final count may overshoot
/// the budget by up to one generation's worth of evaluations.
#[derive(Debug, Clone, Copy)]
pub struct MaxEvaluations(pub usize);

impl StoppingPolicy for MaxEvaluations {
    fn should_continue(&mut self, progress: &SearchProgress) -> bool {
        progress.evaluations < self.0
    }
}

/// Stops once the wall-clock budget is spent.
#[derive(Debug, Clone, Copy)]
pub struct TimeLimit(pub Duration);

impl TimeLimit {
    /// Limit given in milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

impl StoppingPolicy for TimeLimit {
    fn should_continue(&mut self, progress: &SearchProgress) -> bool {
        progress.elapsed < self.0
    }
}

/// Stops as soon as the best cost is at or below the target.
#[derive(Debug, Clone, Copy)]
pub struct TargetCost(pub f64);

impl StoppingPolicy for TargetCost {
    fn should_continue(&mut self, progress: &SearchProgress) -> bool {
        progress.best_cost > self.0
    }
}

/// Stops after `limit` consecutive generations without significant
/// improvement.
///
/// An improvement counts when `(old - new) / |old| >= threshold`; with a
/// threshold of zero any strict decrease counts.
#[derive(Debug, Clone)]
pub struct Stagnation {
    limit: usize,
    threshold: f64,
    best: Option<f64>,
    stalled: usize,
}

impl Stagnation {
    /// Stops after `limit` generations without improvement.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            threshold: 0.0,
            best: None,
            stalled: 0,
        }
    }

    /// Sets the minimum relative improvement that resets the counter.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.max(0.0);
        self
    }

    /// Generations observed since the last significant improvement.
    pub fn stalled(&self) -> usize {
        self.stalled
    }
}

impl StoppingPolicy for Stagnation {
    fn should_continue(&mut self, progress: &SearchProgress) -> bool {
        let current = progress.best_cost;
        match self.best {
            None => self.best = Some(current),
            Some(best) => {
                let improved = current < best && (best - current) >= self.threshold * best.abs();
                if improved {
                    self.best = Some(current);
                    self.stalled = 0;
                } else {
                    self.stalled += 1;
                }
            }
        }
        self.stalled < self.limit
    }
}

/// Stops as soon as any member policy says stop.
///
/// Every member sees every progress snapshot, so stateful members such as
/// [`Stagnation`] stay up to date.
#[derive(Default)]
pub struct AnyOf(Vec<Box<dyn StoppingPolicy + Send>>);

impl AnyOf {
    /// Empty combination; never stops on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member policy.
    pub fn with<P: StoppingPolicy + Send + 'static>(mut self, policy: P) -> Self {
        self.0.push(Box::new(policy));
        self
    }
}

impl fmt::Debug for AnyOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyOf").field("policies", &self.0.len()).finish()
    }
}

impl StoppingPolicy for AnyOf {
    fn should_continue(&mut self, progress: &SearchProgress) -> bool {
        self.0
            .iter_mut()
            .fold(true, |keep, policy| policy.should_continue(progress) && keep)
    }
}

//! Feasibility-preserving mutation operators.
//!
//! Both operators take a feasible solution and leave it feasible:
//!
//! - [`mutate_rocket_type`] never touches the module allocation.
//! - [`mutate_module_allocation`] moves units of one module type between
//!   rockets, bounded by the destination's free capacity, so column totals
//!   are unchanged and no row can overflow.

use super::config::BeesConfig;
use crate::error::{BeesError, BeesResult};
use crate::model::{ProblemConfig, Solution};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Outcome of one mutation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationReport {
    /// Moves that changed (or could have changed) the solution.
    pub applied: usize,
    /// Module-transfer moves skipped because no transfer was possible.
    pub skipped: usize,
}

/// Assigns a uniformly random rocket type to a uniformly random rocket.
pub fn mutate_rocket_type<R: Rng>(solution: &mut Solution, problem: &ProblemConfig, rng: &mut R) {
    let rocket = rng.random_range(0..problem.num_rockets());
    let rocket_type = rng.random_range(0..problem.num_rocket_types());
    solution.set_rocket_type(rocket, rocket_type);
}

/// Moves a random number of modules of one random type between two rockets.
///
/// The destination is drawn among rockets with free capacity, the source among
/// rockets holding at least one unit of the drawn type; the amount is uniform
/// in `[1, min(held, free)]`. Source and destination may coincide, in which
/// case the move changes nothing.
///
/// Returns [`BeesError::MutationInfeasible`] and leaves the solution untouched
/// when there is no destination or no source.
pub fn mutate_module_allocation<R: Rng>(
    solution: &mut Solution,
    problem: &ProblemConfig,
    rng: &mut R,
) -> BeesResult<()> {
    let capacity = u64::from(problem.rocket_capacity());
    let module_type = rng.random_range(0..problem.num_module_types());

    let destinations: Vec<usize> = (0..solution.num_rockets())
        .filter(|&r| solution.rocket_load(r) < capacity)
        .collect();
    let sources: Vec<usize> = (0..solution.num_rockets())
        .filter(|&r| solution.module_count(r, module_type) > 0)
        .collect();

    let (Some(&to), Some(&from)) = (destinations.choose(rng), sources.choose(rng)) else {
        return Err(BeesError::MutationInfeasible { module_type });
    };

    let free = capacity - solution.rocket_load(to);
    let max_amount = u64::from(solution.module_count(from, module_type)).min(free) as u32;
    let amount = rng.random_range(1..=max_amount);
    solution.transfer(from, to, module_type, amount);

    debug_assert!(solution.is_feasible(problem), "module transfer broke feasibility");
    Ok(())
}

/// Applies one mutation pass in place: the configured number of module
/// transfers, then the configured number of rocket-type changes.
///
/// Infeasible transfers are skipped and counted in the report.
pub fn mutate<R: Rng>(
    solution: &mut Solution,
    problem: &ProblemConfig,
    config: &BeesConfig,
    rng: &mut R,
) -> MutationReport {
    let mut report = MutationReport::default();

    for _ in 0..config.module_mutations {
        match mutate_module_allocation(solution, problem, rng) {
            Ok(()) => report.applied += 1,
            Err(err) => {
                tracing::trace!(%err, "skipping module transfer");
                report.skipped += 1;
            }
        }
    }

    for _ in 0..config.type_mutations {
        mutate_rocket_type(solution, problem, rng);
        report.applied += 1;
    }

    report
}

//! Random construction of feasible solutions.
//!
//! Demand is split over the fleet with a uniform multinomial draw per module
//! type, which satisfies every column total by construction. Rows that end up
//! over capacity are then repaired by shifting modules from the fullest rocket
//! to the emptiest one.

use super::problem::ProblemConfig;
use super::solution::Solution;
use crate::error::{BeesError, BeesResult};
use crate::random::multinomial_uniform;
use rand::Rng;

/// Builds a random feasible solution.
///
/// Fails with [`BeesError::Configuration`] when the fleet cannot carry the
/// demand (checked before any allocation), and with
/// [`BeesError::InvariantViolation`] if the result is not feasible.
///
/// # Examples
///
/// ```
/// use rocket_bees::model::{generate_random_solution, ProblemConfig};
/// use rocket_bees::random::create_rng;
///
/// let problem = ProblemConfig::new(
///     2, 2, 3, 4,
///     vec![vec![1.0, 2.0], vec![3.0, 4.0]],
///     vec![10.0, 20.0],
///     vec![5, 6],
/// ).unwrap();
/// let mut rng = create_rng(42);
/// let solution = generate_random_solution(&problem, &mut rng).unwrap();
/// assert!(solution.is_feasible(&problem));
/// ```
pub fn generate_random_solution<R: Rng>(problem: &ProblemConfig, rng: &mut R) -> BeesResult<Solution> {
    problem.ensure_capacity()?;

    let rocket_types = random_rocket_types(problem, rng);
    let modules = random_module_allocation(problem, rng)?;
    let mut solution = Solution::from_raw(rocket_types, modules, problem.num_module_types());

    let steps = repair_capacity(&mut solution, problem)?;
    if steps > 0 {
        tracing::trace!(steps, "capacity repair finished");
    }

    solution.check_invariants(problem)?;
    Ok(solution)
}

fn random_rocket_types<R: Rng>(problem: &ProblemConfig, rng: &mut R) -> Vec<usize> {
    (0..problem.num_rockets())
        .map(|_| rng.random_range(0..problem.num_rocket_types()))
        .collect()
}

/// Row-major allocation whose column totals equal the demand exactly.
fn random_module_allocation<R: Rng>(problem: &ProblemConfig, rng: &mut R) -> BeesResult<Vec<u32>> {
    let rockets = problem.num_rockets();
    let types = problem.num_module_types();
    let mut modules = vec![0u32; rockets * types];

    for (m, &amount) in problem.module_amounts().iter().enumerate() {
        let split = multinomial_uniform(amount, rockets, rng)?;
        for (r, count) in split.into_iter().enumerate() {
            modules[r * types + m] = count;
        }
    }

    Ok(modules)
}

/// Moves modules off overloaded rockets until every row fits.
///
/// Each step takes the rocket with the largest load and the one with the
/// smallest (lowest index on ties), picks the module type the overloaded
/// rocket holds most of, and moves `min(held, overload)` units. Returns the
/// number of steps taken.
///
/// A rocket that has given modules away never drops below capacity, so it is
/// never picked as a destination again and the cells it empties stay empty.
/// Each donor therefore takes at most `num_module_types` steps (empty some
/// cells, then trim the last one down to capacity), and at most
/// `num_rockets - 1` rockets ever donate. Needing more than
/// `num_rockets * num_module_types` steps is reported as
/// [`BeesError::InvariantViolation`].
pub fn repair_capacity(solution: &mut Solution, problem: &ProblemConfig) -> BeesResult<usize> {
    problem.ensure_capacity()?;

    let capacity = u64::from(problem.rocket_capacity());
    let mut loads: Vec<u64> = (0..solution.num_rockets())
        .map(|r| solution.rocket_load(r))
        .collect();
    let max_steps = solution.num_rockets() * problem.num_module_types();

    let mut steps = 0usize;
    loop {
        let (fullest, emptiest) = extreme_rockets(&loads);
        let overload = loads[fullest].saturating_sub(capacity);
        if overload == 0 {
            break;
        }
        if steps >= max_steps {
            return Err(BeesError::invariant(format!(
                "capacity repair did not converge within {max_steps} steps"
            )));
        }

        let row = solution.modules(fullest);
        let module_type = first_argmax(row);
        let moved = u64::from(row[module_type]).min(overload) as u32;

        solution.transfer(fullest, emptiest, module_type, moved);
        loads[fullest] -= u64::from(moved);
        loads[emptiest] += u64::from(moved);
        steps += 1;
    }

    Ok(steps)
}

/// Indices of the first maximum and first minimum load.
fn extreme_rockets(loads: &[u64]) -> (usize, usize) {
    let mut max_idx = 0;
    let mut min_idx = 0;
    for (i, &load) in loads.iter().enumerate() {
        if load > loads[max_idx] {
            max_idx = i;
        }
        if load < loads[min_idx] {
            min_idx = i;
        }
    }
    (max_idx, min_idx)
}

fn first_argmax(row: &[u32]) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }
    best
}

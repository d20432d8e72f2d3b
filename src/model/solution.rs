//! Candidate solution, cost evaluation and feasibility checks.

use super::problem::ProblemConfig;
use crate::error::{BeesError, BeesResult};

/// A rocket-type assignment plus a module-to-rocket allocation.
///
/// Solutions are plain values: `clone()` yields a deep, independent copy.
/// The module allocation is stored row-major, one row per rocket.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    rocket_types: Vec<usize>,
    modules: Vec<u32>,
    num_module_types: usize,
}

impl Solution {
    /// Builds a solution from explicit allocations, checking only the shape.
    ///
    /// `module_allocation[r][m]` is the number of modules of type `m` on rocket
    /// `r`. Feasibility is not checked here; use [`Solution::check_invariants`].
    pub fn from_parts(
        problem: &ProblemConfig,
        rocket_type_allocation: Vec<usize>,
        module_allocation: Vec<Vec<u32>>,
    ) -> BeesResult<Self> {
        if rocket_type_allocation.len() != problem.num_rockets() {
            return Err(BeesError::config(format!(
                "rocket_type_allocation has length {}, expected {}",
                rocket_type_allocation.len(),
                problem.num_rockets()
            )));
        }
        if let Some(t) = rocket_type_allocation
            .iter()
            .find(|&&t| t >= problem.num_rocket_types())
        {
            return Err(BeesError::config(format!("rocket type {t} out of range")));
        }
        if module_allocation.len() != problem.num_rockets()
            || module_allocation
                .iter()
                .any(|row| row.len() != problem.num_module_types())
        {
            return Err(BeesError::config(format!(
                "module_allocation must be {} x {}",
                problem.num_rockets(),
                problem.num_module_types()
            )));
        }

        Ok(Self {
            rocket_types: rocket_type_allocation,
            modules: module_allocation.into_iter().flatten().collect(),
            num_module_types: problem.num_module_types(),
        })
    }

    pub(crate) fn from_raw(rocket_types: Vec<usize>, modules: Vec<u32>, num_module_types: usize) -> Self {
        Self {
            rocket_types,
            modules,
            num_module_types,
        }
    }

    /// Number of rockets in the fleet.
    pub fn num_rockets(&self) -> usize {
        self.rocket_types.len()
    }

    /// Number of module types per rocket row.
    pub fn num_module_types(&self) -> usize {
        self.num_module_types
    }

    /// Rocket type of every rocket.
    pub fn rocket_types(&self) -> &[usize] {
        &self.rocket_types
    }

    /// Rocket type assigned to one rocket.
    pub fn rocket_type(&self, rocket: usize) -> usize {
        self.rocket_types[rocket]
    }

    /// Modules carried by one rocket, indexed by module type.
    pub fn modules(&self, rocket: usize) -> &[u32] {
        let start = rocket * self.num_module_types;
        &self.modules[start..start + self.num_module_types]
    }

    /// Modules of one type carried by one rocket.
    pub fn module_count(&self, rocket: usize, module_type: usize) -> u32 {
        self.modules[rocket * self.num_module_types + module_type]
    }

    /// Rows of the module allocation, one per rocket.
    pub fn module_allocation(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.modules.chunks_exact(self.num_module_types)
    }

    /// Total number of modules loaded on one rocket.
    pub fn rocket_load(&self, rocket: usize) -> u64 {
        self.modules(rocket).iter().map(|&c| u64::from(c)).sum()
    }

    /// Total number of modules of one type across the fleet.
    pub fn column_total(&self, module_type: usize) -> u64 {
        self.module_allocation()
            .map(|row| u64::from(row[module_type]))
            .sum()
    }

    pub(crate) fn set_rocket_type(&mut self, rocket: usize, rocket_type: usize) {
        self.rocket_types[rocket] = rocket_type;
    }

    /// Moves `amount` modules of one type between rockets.
    pub(crate) fn transfer(&mut self, from: usize, to: usize, module_type: usize, amount: u32) {
        let n = self.num_module_types;
        self.modules[from * n + module_type] -= amount;
        self.modules[to * n + module_type] += amount;
    }

    /// Total fuel cost of this solution.
    pub fn cost(&self, problem: &ProblemConfig) -> f64 {
        cost(self, problem)
    }

    /// Checks both structural invariants.
    pub fn is_feasible(&self, problem: &ProblemConfig) -> bool {
        is_valid_capacity(self, problem) && is_valid_module_total(self, problem)
    }

    /// Like [`Solution::is_feasible`] but names the first broken constraint.
    pub fn check_invariants(&self, problem: &ProblemConfig) -> BeesResult<()> {
        let capacity = u64::from(problem.rocket_capacity());
        if let Some(r) = (0..self.num_rockets()).find(|&r| self.rocket_load(r) > capacity) {
            return Err(BeesError::invariant(format!(
                "rocket {r} carries {} modules, capacity is {capacity}",
                self.rocket_load(r)
            )));
        }
        if let Some((m, &amount)) = problem
            .module_amounts()
            .iter()
            .enumerate()
            .find(|&(m, &amount)| self.column_total(m) != u64::from(amount))
        {
            return Err(BeesError::invariant(format!(
                "module type {m} allocated {} times, demand is {amount}",
                self.column_total(m)
            )));
        }
        Ok(())
    }
}

/// Total fuel cost: per-module costs by rocket type plus each rocket's base cost.
pub fn cost(solution: &Solution, problem: &ProblemConfig) -> f64 {
    solution
        .module_allocation()
        .zip(solution.rocket_types())
        .map(|(row, &rocket_type)| {
            let per_module = problem.additional_fuel_costs(rocket_type);
            let cargo: f64 = row
                .iter()
                .zip(per_module)
                .map(|(&count, &unit)| f64::from(count) * unit)
                .sum();
            cargo + problem.fuel_cost(rocket_type)
        })
        .sum()
}

/// Every rocket carries at most `rocket_capacity` modules.
pub fn is_valid_capacity(solution: &Solution, problem: &ProblemConfig) -> bool {
    let capacity = u64::from(problem.rocket_capacity());
    (0..solution.num_rockets()).all(|r| solution.rocket_load(r) <= capacity)
}

/// Every module type is allocated exactly as many times as it is demanded.
pub fn is_valid_module_total(solution: &Solution, problem: &ProblemConfig) -> bool {
    problem
        .module_amounts()
        .iter()
        .enumerate()
        .all(|(m, &amount)| solution.column_total(m) == u64::from(amount))
}

//! Allocation problem model.
//!
//! - [`ProblemConfig`]: fleet size, capacities, demand and cost tables
//! - [`Solution`]: rocket-type assignment plus module allocation
//! - [`cost`], [`is_valid_capacity`], [`is_valid_module_total`]: pure
//!   evaluation and feasibility checks
//! - [`generate_random_solution`]: feasible random construction with capacity
//!   repair

mod generator;
mod problem;
mod solution;

pub use generator::{generate_random_solution, repair_capacity};
pub use problem::ProblemConfig;
pub use solution::{cost, is_valid_capacity, is_valid_module_total, Solution};

//! Bees-algorithm optimizer for rocket fleet allocation.
//!
//! Each rocket in a fixed fleet is assigned one of several rocket types, and
//! a fixed demand of cargo modules is distributed over the fleet. The goal is
//! to minimize total fuel cost while every rocket stays within its capacity
//! and every module is carried exactly once.
//!
//! - **Model** ([`model`]): problem instance, solutions, cost evaluation,
//!   feasibility checks and random feasible construction.
//! - **Bees algorithm** ([`bees`]): mutation operators, neighbourhood search
//!   around elite and normal sites, scouts, and the generational loop with
//!   pluggable stopping policies.
//!
//! # Example
//!
//! ```
//! use rocket_bees::bees::{BeesConfig, BeesSolver, MaxGenerations};
//! use rocket_bees::model::ProblemConfig;
//!
//! let problem = ProblemConfig::new(
//!     2,
//!     4,
//!     4,
//!     10,
//!     vec![
//!         vec![3.22714791, 6.39551519, 5.92349917, 3.02169468],
//!         vec![9.31912442, 8.56746934, 9.37825445, 1.80524675],
//!     ],
//!     vec![39.9175704, 47.029129],
//!     vec![6, 15, 9, 5],
//! )
//! .unwrap();
//!
//! let config = BeesConfig::default().with_seed(7);
//! let mut solver = BeesSolver::new(problem, config).unwrap();
//! let best = solver.search(MaxGenerations(100)).unwrap();
//!
//! assert!(best.is_feasible(solver.problem()));
//! for (rocket, modules) in best.module_allocation().enumerate() {
//!     println!("rocket {rocket} (type {}): {modules:?}", best.rocket_type(rocket));
//! }
//! ```
//!
//! # Features
//!
//! - `parallel` (default): exploit sites on rayon's thread pool when
//!   [`BeesConfig::parallel`](bees::BeesConfig::parallel) is set.
//! - `serde`: `Serialize`/`Deserialize` for solutions and configuration.

pub mod bees;
pub mod error;
pub mod model;
pub mod random;

pub use error::{BeesError, BeesResult};

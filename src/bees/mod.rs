//! Bees algorithm.
//!
//! A population-based local search modelled on honey-bee foraging. The best
//! ranked solutions ("sites") are exploited by sampling mutated neighbours
//! around them; the rest of the population is abandoned each generation and
//! replaced by scouts (fresh random solutions).
//!
//! # Key Types
//!
//! - [`BeesConfig`]: population size, site counts and sizes, mutation counts
//! - [`BeesSolver`]: owns the population and runs generations
//! - [`StoppingPolicy`]: decides between generations whether to continue
//!
//! # Submodules
//!
//! - [`mutation`]: feasibility-preserving rocket-type and module-transfer moves
//!
//! # References
//!
//! - Pham et al. (2006), *The Bees Algorithm: A Novel Tool for Complex
//!   Optimisation Problems*
//! - Karaboga (2005), *An Idea Based on Honey Bee Swarm for Numerical
//!   Optimization*

mod config;
pub mod mutation;
mod runner;
mod stopping;

pub use config::BeesConfig;
pub use runner::{BeesSolver, SearchStats};
pub use stopping::{
    AnyOf, MaxEvaluations, MaxGenerations, SearchProgress, Stagnation, StoppingPolicy, TargetCost,
    TimeLimit,
};

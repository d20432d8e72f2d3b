//! Problem instance: fleet, capacities, demand and cost tables.

use crate::error::{BeesError, BeesResult};

/// Immutable description of one allocation instance.
///
/// All shapes and values are checked once in [`ProblemConfig::new`]; the rest
/// of the crate relies on them without re-checking.
///
/// # Examples
///
/// ```
/// use rocket_bees::model::ProblemConfig;
///
/// let problem = ProblemConfig::new(
///     2,
///     1,
///     2,
///     5,
///     vec![vec![0.0], vec![0.0]],
///     vec![1.0, 100.0],
///     vec![4],
/// )
/// .unwrap();
/// assert_eq!(problem.total_demand(), 4);
/// assert_eq!(problem.total_capacity(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemConfig {
    num_rocket_types: usize,
    num_module_types: usize,
    num_rockets: usize,
    rocket_capacity: u32,
    /// Row-major, `num_rocket_types x num_module_types`.
    additional_fuel_costs: Vec<f64>,
    fuel_costs: Vec<f64>,
    module_amounts: Vec<u32>,
}

impl ProblemConfig {
    /// Validates and builds a problem instance.
    ///
    /// `additional_fuel_costs[t][m]` is the fuel cost of carrying one module of
    /// type `m` on a rocket of type `t`; `fuel_costs[t]` is the base cost of
    /// flying a rocket of type `t`.
    ///
    /// Fails with [`BeesError::Configuration`] on zero dimensions, mismatched
    /// shapes, negative or non-finite costs, or when the total module demand
    /// exceeds the fleet's total capacity.
    pub fn new(
        num_rocket_types: usize,
        num_module_types: usize,
        num_rockets: usize,
        rocket_capacity: u32,
        additional_fuel_costs: Vec<Vec<f64>>,
        fuel_costs: Vec<f64>,
        module_amounts: Vec<u32>,
    ) -> BeesResult<Self> {
        if num_rocket_types == 0 {
            return Err(BeesError::config("num_rocket_types must be positive"));
        }
        if num_module_types == 0 {
            return Err(BeesError::config("num_module_types must be positive"));
        }
        if num_rockets == 0 {
            return Err(BeesError::config("num_rockets must be positive"));
        }
        if rocket_capacity == 0 {
            return Err(BeesError::config("rocket_capacity must be positive"));
        }
        if additional_fuel_costs.len() != num_rocket_types {
            return Err(BeesError::config(format!(
                "additional_fuel_costs has {} rows, expected {num_rocket_types}",
                additional_fuel_costs.len()
            )));
        }
        if let Some((t, row)) = additional_fuel_costs
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num_module_types)
        {
            return Err(BeesError::config(format!(
                "additional_fuel_costs row {t} has {} columns, expected {num_module_types}",
                row.len()
            )));
        }
        if fuel_costs.len() != num_rocket_types {
            return Err(BeesError::config(format!(
                "fuel_costs has length {}, expected {num_rocket_types}",
                fuel_costs.len()
            )));
        }
        if module_amounts.len() != num_module_types {
            return Err(BeesError::config(format!(
                "module_amounts has length {}, expected {num_module_types}",
                module_amounts.len()
            )));
        }

        let additional_fuel_costs: Vec<f64> = additional_fuel_costs.into_iter().flatten().collect();
        if additional_fuel_costs
            .iter()
            .chain(fuel_costs.iter())
            .any(|c| !c.is_finite() || *c < 0.0)
        {
            return Err(BeesError::config("fuel costs must be finite and nonnegative"));
        }

        let problem = Self {
            num_rocket_types,
            num_module_types,
            num_rockets,
            rocket_capacity,
            additional_fuel_costs,
            fuel_costs,
            module_amounts,
        };
        problem.ensure_capacity()?;
        Ok(problem)
    }

    /// Checks that the fleet can carry the full demand.
    pub fn ensure_capacity(&self) -> BeesResult<()> {
        if self.total_demand() > self.total_capacity() {
            return Err(BeesError::config(format!(
                "not enough capacity to carry all modules: demand {} exceeds capacity {}",
                self.total_demand(),
                self.total_capacity()
            )));
        }
        Ok(())
    }

    /// Number of available rocket types.
    pub fn num_rocket_types(&self) -> usize {
        self.num_rocket_types
    }

    /// Number of module types.
    pub fn num_module_types(&self) -> usize {
        self.num_module_types
    }

    /// Size of the fleet.
    pub fn num_rockets(&self) -> usize {
        self.num_rockets
    }

    /// Maximum number of modules one rocket can carry.
    pub fn rocket_capacity(&self) -> u32 {
        self.rocket_capacity
    }

    /// Base cost of flying each rocket type.
    pub fn fuel_costs(&self) -> &[f64] {
        &self.fuel_costs
    }

    /// Base cost of flying one rocket of the given type.
    pub fn fuel_cost(&self, rocket_type: usize) -> f64 {
        self.fuel_costs[rocket_type]
    }

    /// Per-module costs for one rocket type, indexed by module type.
    pub fn additional_fuel_costs(&self, rocket_type: usize) -> &[f64] {
        let start = rocket_type * self.num_module_types;
        &self.additional_fuel_costs[start..start + self.num_module_types]
    }

    /// Cost of carrying one module of `module_type` on a rocket of `rocket_type`.
    pub fn additional_fuel_cost(&self, rocket_type: usize, module_type: usize) -> f64 {
        self.additional_fuel_costs[rocket_type * self.num_module_types + module_type]
    }

    /// Demand per module type.
    pub fn module_amounts(&self) -> &[u32] {
        &self.module_amounts
    }

    /// Total number of modules to transport.
    pub fn total_demand(&self) -> u64 {
        self.module_amounts.iter().map(|&a| u64::from(a)).sum()
    }

    /// Total number of modules the fleet can carry.
    pub fn total_capacity(&self) -> u64 {
        self.num_rockets as u64 * u64::from(self.rocket_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> BeesResult<ProblemConfig> {
        ProblemConfig::new(
            2,
            2,
            3,
            4,
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![10.0, 20.0],
            vec![5, 6],
        )
    }

    #[test]
    fn test_new_ok() {
        let problem = two_by_two().unwrap();
        assert_eq!(problem.num_rocket_types(), 2);
        assert_eq!(problem.num_module_types(), 2);
        assert_eq!(problem.num_rockets(), 3);
        assert_eq!(problem.rocket_capacity(), 4);
        assert_eq!(problem.total_demand(), 11);
        assert_eq!(problem.total_capacity(), 12);
    }

    #[test]
    fn test_cost_table_layout() {
        let problem = two_by_two().unwrap();
        assert_eq!(problem.additional_fuel_costs(0), &[1.0, 2.0]);
        assert_eq!(problem.additional_fuel_costs(1), &[3.0, 4.0]);
        assert!((problem.additional_fuel_cost(1, 0) - 3.0).abs() < 1e-12);
        assert!((problem.fuel_cost(1) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_capacity() {
        let err = ProblemConfig::new(1, 1, 1, 1, vec![vec![0.0]], vec![0.0], vec![5]).unwrap_err();
        assert!(matches!(err, BeesError::Configuration(_)));
    }

    #[test]
    fn test_exact_capacity_ok() {
        let problem = ProblemConfig::new(1, 1, 2, 3, vec![vec![0.0]], vec![0.0], vec![6]);
        assert!(problem.is_ok());
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(ProblemConfig::new(0, 1, 1, 1, vec![], vec![], vec![0]).is_err());
        assert!(ProblemConfig::new(1, 0, 1, 1, vec![vec![]], vec![0.0], vec![]).is_err());
        assert!(ProblemConfig::new(1, 1, 0, 1, vec![vec![0.0]], vec![0.0], vec![0]).is_err());
        assert!(ProblemConfig::new(1, 1, 1, 0, vec![vec![0.0]], vec![0.0], vec![0]).is_err());
    }

    #[test]
    fn test_shape_mismatch() {
        // Ragged cost matrix.
        let err = ProblemConfig::new(
            2,
            2,
            1,
            5,
            vec![vec![1.0, 2.0], vec![3.0]],
            vec![1.0, 1.0],
            vec![1, 1],
        );
        assert!(err.is_err());

        // fuel_costs too short.
        let err = ProblemConfig::new(2, 1, 1, 5, vec![vec![1.0], vec![1.0]], vec![1.0], vec![1]);
        assert!(err.is_err());

        // module_amounts too long.
        let err = ProblemConfig::new(1, 1, 1, 5, vec![vec![1.0]], vec![1.0], vec![1, 2]);
        assert!(err.is_err());
    }

    #[test]
    fn test_negative_or_nan_cost() {
        let err = ProblemConfig::new(1, 1, 1, 5, vec![vec![-1.0]], vec![1.0], vec![1]);
        assert!(err.is_err());
        let err = ProblemConfig::new(1, 1, 1, 5, vec![vec![1.0]], vec![f64::NAN], vec![1]);
        assert!(err.is_err());
    }
}

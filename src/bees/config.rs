//! Bees algorithm configuration.
//!
//! [`BeesConfig`] holds every parameter that controls the generational loop.

use crate::error::{BeesError, BeesResult};

/// Configuration for the bees algorithm.
///
/// Each generation the population is ranked by cost. The first
/// `elite_sites` members are exploited with `elite_site_size` neighbours
/// each, the next `normal_sites` members with `normal_site_size` neighbours,
/// and every remaining slot is refilled by a scout (a fresh random solution).
///
/// # Defaults
///
/// ```
/// use rocket_bees::bees::BeesConfig;
///
/// let config = BeesConfig::default();
/// assert_eq!(config.population_size, 12);
/// assert_eq!(config.elite_sites, 3);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use rocket_bees::bees::BeesConfig;
///
/// let config = BeesConfig::default()
///     .with_population_size(30)
///     .with_sites(4, 6)
///     .with_site_sizes(8, 3)
///     .with_mutations(5, 1)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeesConfig {
    /// Number of solutions kept in the population.
    pub population_size: usize,

    /// Module-transfer moves applied in one mutation pass.
    pub module_mutations: usize,

    /// Rocket-type moves applied in one mutation pass, after the transfers.
    pub type_mutations: usize,

    /// Number of top-ranked solutions exploited as elite sites.
    pub elite_sites: usize,

    /// Number of solutions after the elites exploited as normal sites.
    pub normal_sites: usize,

    /// Neighbours generated around each elite site.
    pub elite_site_size: usize,

    /// Neighbours generated around each normal site.
    pub normal_site_size: usize,

    /// Whether to exploit sites in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature. Results do not depend
    /// on this flag: every site draws from its own seeded generator.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for BeesConfig {
    fn default() -> Self {
        Self {
            population_size: 12,
            module_mutations: 5,
            type_mutations: 1,
            elite_sites: 3,
            normal_sites: 3,
            elite_site_size: 2,
            normal_site_size: 4,
            parallel: true,
            seed: None,
        }
    }
}

impl BeesConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of module-transfer and rocket-type moves per pass.
    pub fn with_mutations(mut self, module_mutations: usize, type_mutations: usize) -> Self {
        self.module_mutations = module_mutations;
        self.type_mutations = type_mutations;
        self
    }

    /// Sets the number of elite and normal sites.
    pub fn with_sites(mut self, elite_sites: usize, normal_sites: usize) -> Self {
        self.elite_sites = elite_sites;
        self.normal_sites = normal_sites;
        self
    }

    /// Sets how many neighbours are generated around elite and normal sites.
    pub fn with_site_sizes(mut self, elite_site_size: usize, normal_site_size: usize) -> Self {
        self.elite_site_size = elite_site_size;
        self.normal_site_size = normal_site_size;
        self
    }

    /// Enables or disables parallel site exploitation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of sites exploited by neighbourhood search each generation.
    pub fn exploited_sites(&self) -> usize {
        self.elite_sites + self.normal_sites
    }

    /// Number of slots refilled by scouts each generation.
    pub fn scouts(&self) -> usize {
        self.population_size.saturating_sub(self.exploited_sites())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BeesResult<()> {
        if self.population_size == 0 {
            return Err(BeesError::config("population_size must be at least 1"));
        }
        if self.exploited_sites() > self.population_size {
            return Err(BeesError::config(format!(
                "elite_sites + normal_sites ({}) exceeds population_size ({})",
                self.exploited_sites(),
                self.population_size
            )));
        }
        if self.exploited_sites() == 0 {
            return Err(BeesError::config(
                "at least one elite or normal site is required",
            ));
        }
        if self.elite_sites > 0 && self.elite_site_size == 0 {
            return Err(BeesError::config("elite_site_size must be at least 1"));
        }
        if self.normal_sites > 0 && self.normal_site_size == 0 {
            return Err(BeesError::config("normal_site_size must be at least 1"));
        }
        Ok(())
    }
}

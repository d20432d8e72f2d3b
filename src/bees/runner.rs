//! Bees algorithm execution engine.
//!
//! # Algorithm
//!
//! 1. Fill the population with random feasible solutions
//! 2. While the stopping policy says continue:
//!    a. Rank the population by cost
//!    b. **Elite sites**: replace each of the first `elite_sites` members by
//!    the best of itself and `elite_site_size` mutated clones
//!    c. **Normal sites**: same for the next `normal_sites` members with
//!    `normal_site_size` clones
//!    d. **Scouts**: replace every remaining member by a fresh random solution
//! 3. Return the cheapest member
//!
//! Every site draws from its own generator, seeded from the solver's generator
//! in slot order, so a fixed seed gives the same run with or without the
//! `parallel` feature.
//!
//! # Reference
//!
//! Pham, D.T. et al. (2006). "The Bees Algorithm: A Novel Tool for Complex
//! Optimisation Problems", *Intelligent Production Machines and Systems*,
//! 454-459.

use super::config::BeesConfig;
use super::mutation::mutate;
use super::stopping::{SearchProgress, StoppingPolicy};
use crate::error::{BeesError, BeesResult};
use crate::model::{generate_random_solution, ProblemConfig, Solution};
use crate::random::{create_rng, split_seeds};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A population member with its cached cost.
#[derive(Debug, Clone)]
struct Bee {
    solution: Solution,
    cost: f64,
}

impl Bee {
    fn new(solution: Solution, problem: &ProblemConfig) -> Self {
        let cost = solution.cost(problem);
        Self { solution, cost }
    }
}

/// Result of exploiting or scouting one population slot.
struct SiteOutcome {
    bee: Bee,
    evaluations: usize,
    skipped_mutations: usize,
}

/// Statistics of the current (or last) search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Generations executed since the population was initialized.
    pub generations: usize,

    /// Cost evaluations, including the initial population.
    pub evaluations: usize,

    /// Module-transfer moves skipped because no transfer was possible.
    pub skipped_mutations: usize,

    /// Whether the last search was cancelled externally.
    pub cancelled: bool,

    /// Best population cost after initialization and after every generation.
    pub cost_history: Vec<f64>,
}

/// Bees algorithm solver for the rocket allocation problem.
///
/// # Examples
///
/// ```
/// use rocket_bees::bees::{BeesConfig, BeesSolver, MaxGenerations};
/// use rocket_bees::model::ProblemConfig;
///
/// let problem = ProblemConfig::new(
///     2, 1, 2, 5,
///     vec![vec![0.0], vec![0.0]],
///     vec![1.0, 100.0],
///     vec![4],
/// ).unwrap();
/// let config = BeesConfig::default().with_population_size(8).with_seed(42);
///
/// let mut solver = BeesSolver::new(problem, config).unwrap();
/// let best = solver.search(MaxGenerations(50)).unwrap();
/// assert_eq!(best.rocket_types(), &[0, 0]);
/// ```
#[derive(Debug)]
pub struct BeesSolver {
    problem: ProblemConfig,
    config: BeesConfig,
    rng: StdRng,
    population: Vec<Bee>,
    stats: SearchStats,
}

impl BeesSolver {
    /// Creates a solver with an empty population.
    ///
    /// Fails with [`BeesError::Configuration`] if the configuration is
    /// invalid or the fleet cannot carry the demand.
    pub fn new(problem: ProblemConfig, config: BeesConfig) -> BeesResult<Self> {
        config.validate()?;
        problem.ensure_capacity()?;

        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        Ok(Self {
            problem,
            config,
            rng,
            population: Vec::new(),
            stats: SearchStats::default(),
        })
    }

    /// Instance being optimized.
    pub fn problem(&self) -> &ProblemConfig {
        &self.problem
    }

    /// Validated search parameters.
    pub fn config(&self) -> &BeesConfig {
        &self.config
    }

    /// Counters accumulated since construction.
    pub fn statistics(&self) -> &SearchStats {
        &self.stats
    }

    /// Current population members with their costs, in slot order.
    pub fn population(&self) -> impl Iterator<Item = (&Solution, f64)> + '_ {
        self.population.iter().map(|bee| (&bee.solution, bee.cost))
    }

    /// Replaces the whole population with random solutions and resets the
    /// statistics.
    pub fn init_population(&mut self) -> BeesResult<()> {
        let seeds = split_seeds(&mut self.rng, self.config.population_size);
        let problem = &self.problem;
        let scouted = run_sites(seeds, self.config.parallel, |seed| {
            scout(problem, &mut create_rng(seed))
        });
        self.population = scouted.into_iter().collect::<BeesResult<Vec<_>>>()?;

        self.stats = SearchStats {
            evaluations: self.population.len(),
            ..SearchStats::default()
        };
        if let Some(best) = self.current_best_cost() {
            self.stats.cost_history.push(best);
        }
        Ok(())
    }

    /// Cost of the best member, or `None` before the population exists.
    pub fn current_best_cost(&self) -> Option<f64> {
        self.best_bee().map(|bee| bee.cost)
    }

    /// Best member of the current population.
    pub fn best(&self) -> Option<&Solution> {
        self.best_bee().map(|bee| &bee.solution)
    }

    fn best_bee(&self) -> Option<&Bee> {
        self.population
            .iter()
            .reduce(|best, bee| if bee.cost < best.cost { bee } else { best })
    }

    /// Best of `solution` and `neighbours` mutated clones of it.
    ///
    /// The result never costs more than `solution`.
    pub fn best_neighbour(&mut self, solution: &Solution, neighbours: usize) -> Solution {
        let site = Bee::new(solution.clone(), &self.problem);
        let outcome = explore(&self.problem, &self.config, site, neighbours, &mut self.rng);
        self.stats.evaluations += outcome.evaluations;
        self.stats.skipped_mutations += outcome.skipped_mutations;
        outcome.bee.solution
    }

    /// Runs one generation: exploit elite and normal sites, scout the rest.
    ///
    /// Initializes the population first if it is empty.
    pub fn advance(&mut self) -> BeesResult<()> {
        if self.population.is_empty() {
            self.init_population()?;
        }

        self.population.sort_by(|a, b| a.cost.total_cmp(&b.cost));

        let seeds = split_seeds(&mut self.rng, self.population.len());
        let tasks: Vec<(usize, Bee, u64)> = std::mem::take(&mut self.population)
            .into_iter()
            .zip(seeds)
            .enumerate()
            .map(|(slot, (bee, seed))| (slot, bee, seed))
            .collect();

        let problem = &self.problem;
        let config = &self.config;
        let outcomes = run_sites(tasks, config.parallel, |(slot, bee, seed)| {
            let mut rng = create_rng(seed);
            if slot < config.elite_sites {
                Ok(explore(problem, config, bee, config.elite_site_size, &mut rng))
            } else if slot < config.exploited_sites() {
                Ok(explore(problem, config, bee, config.normal_site_size, &mut rng))
            } else {
                scout(problem, &mut rng).map(|bee| SiteOutcome {
                    bee,
                    evaluations: 1,
                    skipped_mutations: 0,
                })
            }
        });

        let mut next = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let outcome = outcome?;
            self.stats.evaluations += outcome.evaluations;
            self.stats.skipped_mutations += outcome.skipped_mutations;
            next.push(outcome.bee);
        }
        self.population = next;
        self.stats.generations += 1;

        let best_cost = self
            .current_best_cost()
            .ok_or_else(|| BeesError::invariant("population is empty after a generation"))?;
        self.stats.cost_history.push(best_cost);

        tracing::debug!(
            generation = self.stats.generations,
            best_cost,
            evaluations = self.stats.evaluations,
            "generation complete"
        );
        Ok(())
    }

    /// Runs a full search and returns the best solution found.
    ///
    /// The population is re-initialized, then [`advance`](Self::advance) is
    /// called while `policy` says continue. The policy is consulted once
    /// before every generation.
    pub fn search<P: StoppingPolicy>(&mut self, policy: P) -> BeesResult<Solution> {
        self.search_with_cancel(policy, None)
    }

    /// Runs a full search with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the search stops
    /// before the next generation and returns the best solution so far.
    pub fn search_with_cancel<P: StoppingPolicy>(
        &mut self,
        mut policy: P,
        cancel: Option<Arc<AtomicBool>>,
    ) -> BeesResult<Solution> {
        let started = Instant::now();
        tracing::info!(
            population_size = self.config.population_size,
            elite_sites = self.config.elite_sites,
            normal_sites = self.config.normal_sites,
            scouts = self.config.scouts(),
            "starting bees search"
        );

        self.init_population()?;

        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    self.stats.cancelled = true;
                    break;
                }
            }

            let progress = self.progress(started)?;
            if !policy.should_continue(&progress) {
                break;
            }
            self.advance()?;
        }

        let best = self
            .best_bee()
            .cloned()
            .ok_or_else(|| BeesError::invariant("population is empty after search"))?;

        tracing::info!(
            generations = self.stats.generations,
            evaluations = self.stats.evaluations,
            best_cost = best.cost,
            cancelled = self.stats.cancelled,
            "bees search finished"
        );
        Ok(best.solution)
    }

    fn progress(&self, started: Instant) -> BeesResult<SearchProgress> {
        let best_cost = self
            .current_best_cost()
            .ok_or_else(|| BeesError::invariant("population is empty"))?;
        Ok(SearchProgress {
            generation: self.stats.generations,
            evaluations: self.stats.evaluations,
            best_cost,
            elapsed: started.elapsed(),
        })
    }
}

/// Fresh random member.
fn scout<R: Rng>(problem: &ProblemConfig, rng: &mut R) -> BeesResult<Bee> {
    generate_random_solution(problem, rng).map(|solution| Bee::new(solution, problem))
}

/// Neighbourhood search around one site.
///
/// Clones are examined in creation order and the site itself last; the first
/// strict minimum wins, so a clone as cheap as the site replaces it.
fn explore<R: Rng>(
    problem: &ProblemConfig,
    config: &BeesConfig,
    site: Bee,
    neighbours: usize,
    rng: &mut R,
) -> SiteOutcome {
    let mut best: Option<Bee> = None;
    let mut skipped_mutations = 0;

    for _ in 0..neighbours {
        let mut solution = site.solution.clone();
        skipped_mutations += mutate(&mut solution, problem, config, rng).skipped;
        let neighbour = Bee::new(solution, problem);
        if best.as_ref().is_none_or(|b| neighbour.cost < b.cost) {
            best = Some(neighbour);
        }
    }

    let bee = match best {
        Some(neighbour) if neighbour.cost <= site.cost => neighbour,
        _ => site,
    };
    debug_assert!(bee.solution.is_feasible(problem));

    SiteOutcome {
        bee,
        evaluations: neighbours,
        skipped_mutations,
    }
}

#[cfg(feature = "parallel")]
fn run_sites<T, U, F>(tasks: Vec<T>, parallel: bool, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        tasks.into_par_iter().map(f).collect()
    } else {
        tasks.into_iter().map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_sites<T, U, F>(tasks: Vec<T>, _parallel: bool, f: F) -> Vec<U>
where
    F: Fn(T) -> U,
{
    tasks.into_iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bees::{MaxGenerations, TargetCost};

    /// Two rocket types, one free module type: optimum is both rockets on the
    /// cheap type, cost 2.
    fn two_rocket_problem() -> ProblemConfig {
        ProblemConfig::new(
            2,
            1,
            2,
            5,
            vec![vec![0.0], vec![0.0]],
            vec![1.0, 100.0],
            vec![4],
        )
        .unwrap()
    }

    fn cargo_problem() -> ProblemConfig {
        ProblemConfig::new(
            2,
            4,
            4,
            10,
            vec![
                vec![3.22714791, 6.39551519, 5.92349917, 3.02169468],
                vec![9.31912442, 8.56746934, 9.37825445, 1.80524675],
            ],
            vec![39.9175704, 47.029129],
            vec![6, 15, 9, 5],
        )
        .unwrap()
    }

    fn cargo_config() -> BeesConfig {
        BeesConfig::default()
            .with_population_size(12)
            .with_mutations(5, 1)
            .with_sites(3, 3)
            .with_site_sizes(2, 4)
            .with_seed(42)
    }

    #[test]
    fn test_two_rocket_optimum() {
        let config = BeesConfig::default().with_population_size(8).with_seed(42);
        let mut solver = BeesSolver::new(two_rocket_problem(), config).unwrap();

        let best = solver.search(MaxGenerations(50)).unwrap();

        assert_eq!(best.cost(solver.problem()), 2.0);
        assert_eq!(best.rocket_types(), &[0, 0]);
        assert!(best.is_feasible(solver.problem()));
    }

    #[test]
    fn test_two_rocket_optimum_many_seeds() {
        for seed in 0..10 {
            let config = BeesConfig::default().with_population_size(8).with_seed(seed);
            let mut solver = BeesSolver::new(two_rocket_problem(), config).unwrap();
            let best = solver.search(MaxGenerations(50)).unwrap();
            assert_eq!(best.cost(solver.problem()), 2.0, "seed {seed}");
        }
    }

    #[test]
    fn test_sites_exceed_population() {
        let config = BeesConfig::default().with_population_size(4).with_sites(3, 3);
        let err = BeesSolver::new(two_rocket_problem(), config).unwrap_err();
        assert!(matches!(err, BeesError::Configuration(_)));
    }

    #[test]
    fn test_infeasible_instance_rejected() {
        let err = ProblemConfig::new(1, 1, 1, 1, vec![vec![1.0]], vec![1.0], vec![5]).unwrap_err();
        assert!(matches!(err, BeesError::Configuration(_)));
    }

    #[test]
    fn test_best_cost_non_increasing() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        solver.init_population().unwrap();

        let mut previous = solver.current_best_cost().unwrap();
        for _ in 0..100 {
            solver.advance().unwrap();
            let current = solver.current_best_cost().unwrap();
            assert!(
                current <= previous,
                "best cost increased: {previous} -> {current}"
            );
            previous = current;
        }
    }

    #[test]
    fn test_population_stays_feasible() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        solver.init_population().unwrap();
        for _ in 0..20 {
            solver.advance().unwrap();
            assert_eq!(solver.population().count(), 12);
            for (solution, cost) in solver.population() {
                assert!(solution.is_feasible(solver.problem()));
                assert_eq!(cost, solution.cost(solver.problem()));
            }
        }
    }

    #[test]
    fn test_best_neighbour_never_worse() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        let mut rng = create_rng(11);

        for _ in 0..50 {
            let site = generate_random_solution(solver.problem(), &mut rng).unwrap();
            let site_cost = site.cost(solver.problem());
            let neighbour = solver.best_neighbour(&site, 5);
            assert!(neighbour.cost(solver.problem()) <= site_cost);
            assert!(neighbour.is_feasible(solver.problem()));
        }
    }

    #[test]
    fn test_best_neighbour_zero_neighbours_returns_site() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        let site = generate_random_solution(solver.problem(), &mut create_rng(3)).unwrap();
        assert_eq!(solver.best_neighbour(&site, 0), site);
    }

    #[test]
    fn test_search_improves_on_initial_population() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        let best = solver.search(MaxGenerations(300)).unwrap();

        let history = &solver.statistics().cost_history;
        assert_eq!(history.len(), 301);
        assert!(best.cost(solver.problem()) <= history[0]);
        assert_eq!(best.cost(solver.problem()), *history.last().unwrap());
        assert!(best.is_feasible(solver.problem()));
    }

    #[test]
    fn test_statistics_count_evaluations() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        solver.search(MaxGenerations(10)).unwrap();

        let stats = solver.statistics();
        assert_eq!(stats.generations, 10);
        // 12 initial, then 3*2 + 3*4 neighbours and 6 scouts per generation.
        assert_eq!(stats.evaluations, 12 + 10 * (6 + 12 + 6));
        assert!(!stats.cancelled);
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = |parallel: bool| {
            let config = cargo_config().with_parallel(parallel);
            let mut solver = BeesSolver::new(cargo_problem(), config).unwrap();
            let best = solver.search(MaxGenerations(40)).unwrap();
            (best, solver.statistics().cost_history.clone())
        };

        let (a, history_a) = run(false);
        let (b, history_b) = run(false);
        let (c, history_c) = run(true);
        assert_eq!(a, b);
        assert_eq!(history_a, history_b);
        assert_eq!(a, c);
        assert_eq!(history_a, history_c);
    }

    #[test]
    fn test_target_cost_stops_early() {
        let config = BeesConfig::default().with_population_size(8).with_seed(1);
        let mut solver = BeesSolver::new(two_rocket_problem(), config).unwrap();
        let best = solver.search(TargetCost(2.0)).unwrap();
        assert_eq!(best.cost(solver.problem()), 2.0);
    }

    #[test]
    fn test_cancellation() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();

        // Set before running so cancellation is deterministic.
        let cancel = Arc::new(AtomicBool::new(true));
        let best = solver
            .search_with_cancel(MaxGenerations(1000), Some(cancel))
            .unwrap();

        let stats = solver.statistics();
        assert!(stats.cancelled);
        assert_eq!(stats.generations, 0);
        assert_eq!(best.cost(solver.problem()), stats.cost_history[0]);
    }

    #[test]
    fn test_current_best_cost_before_init() {
        let solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        assert!(solver.current_best_cost().is_none());
        assert!(solver.best().is_none());
    }

    #[test]
    fn test_advance_initializes_population() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        solver.advance().unwrap();
        assert_eq!(solver.population().count(), 12);
        assert_eq!(solver.statistics().generations, 1);
    }

    #[test]
    fn test_init_population_resets_statistics() {
        let mut solver = BeesSolver::new(cargo_problem(), cargo_config()).unwrap();
        solver.search(MaxGenerations(5)).unwrap();
        solver.init_population().unwrap();

        let stats = solver.statistics();
        assert_eq!(stats.generations, 0);
        assert_eq!(stats.evaluations, 12);
        assert_eq!(stats.cost_history.len(), 1);
    }

    #[test]
    fn test_no_scouts() {
        let config = cargo_config().with_population_size(6);
        let mut solver = BeesSolver::new(cargo_problem(), config).unwrap();
        let best = solver.search(MaxGenerations(20)).unwrap();
        assert!(best.is_feasible(solver.problem()));
        assert_eq!(solver.statistics().evaluations, 6 + 20 * 18);
    }
    #[test]
    fn test_generation_evaluations_follow_config() {
        let config = cargo_config().with_population_size(20).with_sites(2, 5);
        let mut solver = BeesSolver::new(cargo_problem(), config).unwrap();
        solver.init_population().unwrap();
        let before = solver.statistics().evaluations;
        solver.advance().unwrap();

        let config = solver.config();
        assert_eq!(config.scouts(), 13);
        let expected = config.elite_sites * config.elite_site_size
            + config.normal_sites * config.normal_site_size
            + config.scouts();
        assert_eq!(solver.statistics().evaluations - before, expected);
    }
}

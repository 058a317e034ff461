use chrono::Utc;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::algorithm::{refine_centers, RefinementResult};
use crate::competitor::CompetitorIndex;
use crate::config::OptimizerConfig;
use crate::error::OptimizerError;
use crate::init::initialize_centers;
use crate::ranking::{build_result, RunContext};
use crate::result::OptimizationResult;
use crate::sampling::{reduce_sample, SampleStats};
use crate::types::{Candidate, Competitor, PopulationPoint};

/// Everything a single run produced, before and after ranking
#[derive(Debug, Clone)]
pub struct OptimizationRun {
    pub sample: Vec<PopulationPoint>,
    pub sample_stats: SampleStats,
    pub initial_centers: Vec<Candidate>,
    pub refinement: RefinementResult,
    pub result: OptimizationResult,
}

/// Site optimizer: sampling, seeding, refinement and ranking in one call.
///
/// # Example
///
/// ```
/// use sitekmeans_rs::{Competitor, OptimizerConfig, PopulationPoint, SiteOptimizer};
///
/// let populations = vec![
///     PopulationPoint::new("a", 1_000, 51.50, -0.12),
///     PopulationPoint::new("b", 800, 51.52, -0.10),
///     PopulationPoint::new("c", 650, 51.40, -0.30),
/// ];
/// let competitors = vec![Competitor::new(51.45, -0.20)];
///
/// let optimizer = SiteOptimizer::with_config(OptimizerConfig::new(2).with_seed(Some(42)));
/// let result = optimizer.optimize(&populations, &competitors).unwrap();
/// assert!(result.locations.len() <= 2);
/// ```
#[derive(Debug, Clone)]
pub struct SiteOptimizer {
    config: OptimizerConfig,
}

impl SiteOptimizer {
    /// Create an optimizer proposing `k` locations with default settings.
    ///
    /// # Panics
    ///
    /// Panics if `k` is 0.
    pub fn new(k: usize) -> Self {
        assert!(k > 0, "k must be greater than 0");

        Self {
            config: OptimizerConfig::new(k),
        }
    }

    /// Create an optimizer with a custom configuration.
    ///
    /// The configuration is validated when a run starts.
    pub fn with_config(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline with the configured seed, or OS entropy when
    /// no seed is set.
    pub fn optimize(
        &self,
        populations: &[PopulationPoint],
        competitors: &[Competitor],
    ) -> Result<OptimizationResult, OptimizerError> {
        let mut rng = self.make_rng();
        Ok(self.run_with_rng(populations, competitors, &mut rng)?.result)
    }

    /// Run the full pipeline drawing every random number from `rng`
    pub fn optimize_with_rng<R: Rng + ?Sized>(
        &self,
        populations: &[PopulationPoint],
        competitors: &[Competitor],
        rng: &mut R,
    ) -> Result<OptimizationResult, OptimizerError> {
        Ok(self.run_with_rng(populations, competitors, rng)?.result)
    }

    /// Run the full pipeline and keep every intermediate stage
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        populations: &[PopulationPoint],
        competitors: &[Competitor],
        rng: &mut R,
    ) -> Result<OptimizationRun, OptimizerError> {
        self.config.validate()?;
        let config = &self.config;

        let (sample, sample_stats) = reduce_sample(populations, &config.sampling, rng);
        let index = CompetitorIndex::new(competitors.to_vec());

        info!(
            "Optimizing {} locations over {} sampled areas and {} competitors",
            config.k,
            sample.len(),
            index.len()
        );

        let initial_centers = initialize_centers(config.k, &sample, &index, config, rng);
        let refinement = refine_centers(&initial_centers, &sample, &index, config);

        let context = RunContext {
            timestamp: Utc::now(),
            total_competitors: index.len(),
            total_population_areas: sample.len(),
        };
        let result = build_result(&refinement.centers, &context, config);

        Ok(OptimizationRun {
            sample,
            sample_stats,
            initial_centers,
            refinement,
            result,
        })
    }

    fn make_rng(&self) -> ChaCha8Rng {
        match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Get the number of locations requested.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

use crate::error::OptimizerError;

/// Stratified sampling parameters for reducing the population set
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Points with at least this population are always kept
    pub high_population_threshold: u64,

    /// Probability of keeping each point below the threshold
    pub regular_sample_rate: f64,

    /// Upper bound on the working set. High-population points are never
    /// dropped, so only the regular pool is truncated to fit.
    pub max_sample_size: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            high_population_threshold: 400,
            regular_sample_rate: 0.05,
            max_sample_size: 20_000,
        }
    }
}

/// Configuration for the site optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Number of locations to propose
    pub k: usize,

    /// Maximum number of refinement iterations
    pub max_iters: usize,

    /// Convergence tolerance. Refinement stops once no center moves
    /// further than this in a single iteration.
    pub tol: f64,

    /// Random seed for sampling and seeding. `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Population sampling parameters
    pub sampling: SamplingConfig,

    /// The first center must be further than this from any competitor
    pub min_first_center_distance: f64,

    /// Centroids closer than this to a competitor trigger relocation
    pub avoidance_trigger_distance: f64,

    /// Radius of the relocation probe circle
    pub avoidance_radius: f64,

    /// Number of evenly spaced relocation probes, starting at 0 degrees
    pub avoidance_probes: usize,

    /// Weight of the competitor distance bonus in the score
    pub isolation_weight: f64,

    /// Estimated annual revenue per captured person
    pub revenue_per_capita: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            k: 10,
            max_iters: 30,
            tol: 0.001,
            seed: None,
            sampling: SamplingConfig::default(),
            min_first_center_distance: 0.008,
            avoidance_trigger_distance: 0.01,
            avoidance_radius: 0.015,
            avoidance_probes: 6,
            isolation_weight: 5.0,
            revenue_per_capita: 50,
        }
    }
}

impl OptimizerConfig {
    /// Create a new configuration with the specified number of locations
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the sampling parameters
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Set the isolation bonus weight used in scoring
    pub fn with_isolation_weight(mut self, weight: f64) -> Self {
        self.isolation_weight = weight;
        self
    }

    /// Set the revenue estimate per captured person
    pub fn with_revenue_per_capita(mut self, revenue: u64) -> Self {
        self.revenue_per_capita = revenue;
        self
    }

    /// Check that every parameter is usable before a run starts
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.k == 0 {
            return Err(OptimizerError::InvalidK(
                "k must be greater than 0".to_string(),
            ));
        }

        let rate = self.sampling.regular_sample_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(OptimizerError::InvalidConfig(format!(
                "regular_sample_rate must be within [0, 1], got {rate}"
            )));
        }

        for (name, value) in [
            ("tol", self.tol),
            ("avoidance_radius", self.avoidance_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(OptimizerError::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("min_first_center_distance", self.min_first_center_distance),
            ("avoidance_trigger_distance", self.avoidance_trigger_distance),
            ("isolation_weight", self.isolation_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizerError::InvalidConfig(format!(
                    "{name} must be a non-negative finite number, got {value}"
                )));
            }
        }

        if self.avoidance_probes == 0 {
            return Err(OptimizerError::InvalidConfig(
                "avoidance_probes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

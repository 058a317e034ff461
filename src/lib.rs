//! # sitekmeans-rs
//!
//! Facility site selection with population-weighted k-means and
//! competitor avoidance.
//!
//! Given a large set of population-weighted areas and the coordinates of
//! existing competitors, picks up to `k` sites that capture the most
//! population while staying clear of competitors, then ranks and scores them.
//!
//! ## Pipeline
//!
//! - **Sampling**: every high-population area plus a random share of the rest,
//!   capped to a bounded working set
//! - **Seeding**: k-means++ weighted by population and squared distance, with
//!   the first center placed away from competitors
//! - **Refinement**: population-weighted centroids, local relocation away from
//!   nearby competitors, scoring, and movement-based convergence
//! - **Ranking**: score ordering, business labels and a serializable result
//!
//! Coordinates are treated as a flat plane: latitude and longitude are used
//! directly as Euclidean axes, and all distance thresholds are in degrees.
//!
//! ## Example
//!
//! ```rust
//! use sitekmeans_rs::{Competitor, OptimizerConfig, PopulationPoint, SiteOptimizer};
//!
//! let populations: Vec<PopulationPoint> = (0..200)
//!     .map(|i| {
//!         let lat = 51.0 + (i % 20) as f64 * 0.01;
//!         let long = -0.5 + (i / 20) as f64 * 0.01;
//!         PopulationPoint::new(format!("oa{i}"), 300 + (i % 7) * 50, lat, long)
//!     })
//!     .collect();
//! let competitors = vec![Competitor::new(51.05, -0.45)];
//!
//! let config = OptimizerConfig::new(5).with_seed(Some(42));
//! let optimizer = SiteOptimizer::with_config(config);
//! let result = optimizer.optimize(&populations, &competitors).unwrap();
//!
//! assert!(result.locations.len() <= 5);
//! for (i, location) in result.locations.iter().enumerate() {
//!     assert_eq!(location.rank, i + 1);
//! }
//! ```
//!
//! ## Reproducibility
//!
//! Sampling and seeding draw random numbers. Set
//! [`OptimizerConfig::seed`] or call [`SiteOptimizer::optimize_with_rng`]
//! to make runs repeatable.

mod algorithm;
mod competitor;
mod config;
mod distance;
mod error;
mod init;
pub mod io;
pub mod logging;
mod optimizer;
mod ranking;
pub mod report;
mod result;
mod sampling;
mod types;

pub use algorithm::{avoid_competitors, refine_centers, refine_step, score, RefinementResult};
pub use competitor::{CompetitorIndex, EARLY_EXIT_DISTANCE, NO_COMPETITOR_DISTANCE};
pub use config::{OptimizerConfig, SamplingConfig};
pub use distance::{assign_to_nearest, max_center_movement, planar_distance, squared_distance};
pub use error::OptimizerError;
pub use init::initialize_centers;
pub use optimizer::{OptimizationRun, SiteOptimizer};
pub use ranking::{build_result, rank_locations, round_to, sort_by_score, RunContext};
pub use result::{
    AlgorithmDescription, BusinessInsights, CompetitiveAdvantage, Coordinates, LocationMetrics,
    MarketPotential, OptimizationResult, Priority, RankedLocation, RunMetadata, RunSummary,
};
pub use sampling::{reduce_sample, SampleStats};
pub use types::{candidates_to_array, points_to_arrays, Candidate, Competitor, PopulationPoint};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::OptimizerConfig;
use crate::result::{
    AlgorithmDescription, BusinessInsights, CompetitiveAdvantage, Coordinates, LocationMetrics,
    MarketPotential, OptimizationResult, Priority, RankedLocation, RunMetadata, RunSummary,
};
use crate::types::Candidate;

pub const ALGORITHM_NAME: &str = "K-means with competitor avoidance";
pub const OPTIMIZATION_METHOD: &str = "Population-weighted K-means with competitor avoidance";

const HIGH_MARKET_POPULATION: u64 = 1_000_000;
const MEDIUM_MARKET_POPULATION: u64 = 500_000;
const STRONG_ADVANTAGE_DISTANCE: f64 = 0.05;
const MODERATE_ADVANTAGE_DISTANCE: f64 = 0.02;
const HIGH_PRIORITY_MAX_RANK: usize = 3;
const MEDIUM_PRIORITY_MAX_RANK: usize = 7;

/// Run-level facts recorded alongside the ranked locations
#[derive(Debug, Clone)]
pub struct RunContext {
    pub timestamp: DateTime<Utc>,
    pub total_competitors: usize,
    pub total_population_areas: usize,
}

impl MarketPotential {
    pub fn classify(population_captured: u64) -> Self {
        if population_captured > HIGH_MARKET_POPULATION {
            Self::High
        } else if population_captured > MEDIUM_MARKET_POPULATION {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl CompetitiveAdvantage {
    pub fn classify(competitor_distance: f64) -> Self {
        if competitor_distance > STRONG_ADVANTAGE_DISTANCE {
            Self::Strong
        } else if competitor_distance > MODERATE_ADVANTAGE_DISTANCE {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

impl Priority {
    pub fn for_rank(rank: usize) -> Self {
        if rank <= HIGH_PRIORITY_MAX_RANK {
            Self::High
        } else if rank <= MEDIUM_PRIORITY_MAX_RANK {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Round to a fixed number of decimal places
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round a non-negative quantity to whole units
#[inline]
fn round_whole(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

/// Order candidates by descending score.
///
/// The sort is stable: equal scores keep their initialization order.
pub fn sort_by_score(centers: &[Candidate]) -> Vec<Candidate> {
    let mut sorted = centers.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted
}

/// Rank candidates and derive per-location metrics and labels
pub fn rank_locations(centers: &[Candidate], revenue_per_capita: u64) -> Vec<RankedLocation> {
    sort_by_score(centers)
        .iter()
        .enumerate()
        .map(|(i, center)| {
            let rank = i + 1;
            RankedLocation {
                rank,
                coordinates: Coordinates {
                    latitude: round_to(center.lat, 6),
                    longitude: round_to(center.long, 6),
                },
                metrics: LocationMetrics {
                    population_captured: center.population_captured,
                    competitor_distance: round_to(center.nearest_competitor_distance, 6),
                    optimization_score: round_whole(center.score),
                    estimated_annual_revenue: center.population_captured * revenue_per_capita,
                },
                business_insights: BusinessInsights {
                    market_potential: MarketPotential::classify(center.population_captured),
                    competitive_advantage: CompetitiveAdvantage::classify(
                        center.nearest_competitor_distance,
                    ),
                    priority: Priority::for_rank(rank),
                },
            }
        })
        .collect()
}

/// Build the complete output record from the final centers
pub fn build_result(
    centers: &[Candidate],
    context: &RunContext,
    config: &OptimizerConfig,
) -> OptimizationResult {
    let locations = rank_locations(centers, config.revenue_per_capita);

    let total_captured: u64 = centers.iter().map(|c| c.population_captured).sum();
    let total_score: f64 = centers.iter().map(|c| c.score).sum();
    let average_distance = if centers.is_empty() {
        0.0
    } else {
        centers
            .iter()
            .map(|c| c.nearest_competitor_distance)
            .sum::<f64>()
            / centers.len() as f64
    };

    OptimizationResult {
        metadata: RunMetadata {
            timestamp: context.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            algorithm: ALGORITHM_NAME.to_string(),
            total_competitors: context.total_competitors,
            total_population_areas: context.total_population_areas,
            optimized_locations: locations.len(),
        },
        summary: RunSummary {
            total_population_captured: total_captured,
            average_competitor_distance: round_to(average_distance, 6),
            total_optimization_score: round_whole(total_score),
            estimated_annual_revenue: total_captured * config.revenue_per_capita,
        },
        locations,
        algorithm: describe_algorithm(config),
    }
}

fn describe_algorithm(config: &OptimizerConfig) -> AlgorithmDescription {
    AlgorithmDescription {
        sampling_strategy: format!(
            "All high-population ({}+) areas + {}% random sample of regular areas",
            config.sampling.high_population_threshold,
            round_to(config.sampling.regular_sample_rate * 100.0, 4)
        ),
        optimization_method: OPTIMIZATION_METHOD.to_string(),
        scoring_formula: format!(
            "Population × (1 + CompetitorDistance × {})",
            config.isolation_weight
        ),
        convergence_threshold: config.tol,
    }
}

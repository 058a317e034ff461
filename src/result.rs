//! The output record handed to presentation layers.
//!
//! Field names serialize in camelCase and match the JSON consumed by the
//! results dashboard.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub metadata: RunMetadata,
    pub summary: RunSummary,
    pub locations: Vec<RankedLocation>,
    pub algorithm: AlgorithmDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    /// RFC 3339 UTC timestamp of the run
    pub timestamp: String,
    pub algorithm: String,
    pub total_competitors: usize,
    /// Size of the sampled working set
    pub total_population_areas: usize,
    pub optimized_locations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_population_captured: u64,
    pub average_competitor_distance: f64,
    pub total_optimization_score: u64,
    pub estimated_annual_revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLocation {
    pub rank: usize,
    pub coordinates: Coordinates,
    pub metrics: LocationMetrics,
    pub business_insights: BusinessInsights,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMetrics {
    pub population_captured: u64,
    pub competitor_distance: f64,
    pub optimization_score: u64,
    pub estimated_annual_revenue: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInsights {
    pub market_potential: MarketPotential,
    pub competitive_advantage: CompetitiveAdvantage,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPotential {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitiveAdvantage {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmDescription {
    pub sampling_strategy: String,
    pub optimization_method: String,
    pub scoring_formula: String,
    pub convergence_threshold: f64,
}

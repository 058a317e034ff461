use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SamplingConfig;
use crate::types::PopulationPoint;

/// Composition of a reduced sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleStats {
    /// Points in the source data
    pub source: usize,
    /// High-population points kept unconditionally
    pub high: usize,
    /// Regular points that survived the random draw, before truncation
    pub regular_drawn: usize,
    /// Regular points in the final sample
    pub regular_kept: usize,
}

impl SampleStats {
    pub fn total(&self) -> usize {
        self.high + self.regular_kept
    }
}

/// Reduce the population set to a bounded working sample.
///
/// Every point at or above the high-population threshold is kept. Each
/// remaining point is kept with probability `regular_sample_rate`; that
/// regular pool is shuffled and truncated so the sample fits within
/// `max_sample_size`. High points come first in the output, in source order.
pub fn reduce_sample<R: Rng + ?Sized>(
    points: &[PopulationPoint],
    config: &SamplingConfig,
    rng: &mut R,
) -> (Vec<PopulationPoint>, SampleStats) {
    let mut high = Vec::new();
    let mut regular = Vec::new();

    for point in points {
        if point.population >= config.high_population_threshold {
            high.push(point.clone());
        } else if rng.gen_bool(config.regular_sample_rate) {
            regular.push(point.clone());
        }
    }

    let regular_drawn = regular.len();
    regular.shuffle(rng);
    regular.truncate(config.max_sample_size.saturating_sub(high.len()));

    let stats = SampleStats {
        source: points.len(),
        high: high.len(),
        regular_drawn,
        regular_kept: regular.len(),
    };

    info!(
        "Sample: {} high-pop + {} regular = {} total (from {} areas)",
        stats.high,
        stats.regular_kept,
        stats.total(),
        stats.source
    );

    high.extend(regular);
    (high, stats)
}

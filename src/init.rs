use log::{debug, warn};
use rand::Rng;
use rayon::prelude::*;

use crate::competitor::CompetitorIndex;
use crate::config::OptimizerConfig;
use crate::distance::squared_distance;
use crate::types::{Candidate, PopulationPoint};

/// Seed up to `k` centers with a population- and distance-weighted
/// k-means++ variant.
///
/// The first center is the most populous point further than
/// `min_first_center_distance` from every competitor, or the most populous
/// point outright if none qualifies. Each further center is drawn with
/// probability proportional to `population * d^2`, where `d` is the distance
/// to the closest center chosen so far. Seeding stops early once every
/// weight is zero, so fewer than `k` centers may come back.
pub fn initialize_centers<R: Rng + ?Sized>(
    k: usize,
    points: &[PopulationPoint],
    competitors: &CompetitorIndex,
    config: &OptimizerConfig,
    rng: &mut R,
) -> Vec<Candidate> {
    if k == 0 || points.is_empty() {
        return Vec::new();
    }

    // Stable sort keeps source order among equal populations
    let mut sorted: Vec<&PopulationPoint> = points.iter().collect();
    sorted.sort_by(|a, b| b.population.cmp(&a.population));

    let first = sorted
        .iter()
        .find(|p| competitors.nearest_distance(p.lat, p.long) > config.min_first_center_distance)
        .copied()
        .unwrap_or(sorted[0]);

    let mut centers = Vec::with_capacity(k);
    centers.push(seed_candidate(first, competitors));

    // Squared distance from each point to its closest chosen center
    let mut min_sq: Vec<f64> = sorted
        .par_iter()
        .map(|p| squared_distance(p.lat, p.long, first.lat, first.long))
        .collect();

    while centers.len() < k {
        let weights: Vec<f64> = sorted
            .iter()
            .zip(&min_sq)
            .map(|(p, &d2)| d2 * p.population as f64)
            .collect();

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            warn!(
                "Seeding stopped early: {} of {} centers placed, no positive weight left",
                centers.len(),
                k
            );
            break;
        }

        let target = rng.gen::<f64>() * total;
        let chosen = weighted_pick(&weights, target);
        let selected = sorted[chosen];
        debug!(
            "Seeded center {} at ({:.6}, {:.6}) pop={}",
            centers.len() + 1,
            selected.lat,
            selected.long,
            selected.population
        );
        centers.push(seed_candidate(selected, competitors));

        min_sq
            .par_iter_mut()
            .zip(sorted.par_iter())
            .for_each(|(d2, p)| {
                let candidate = squared_distance(p.lat, p.long, selected.lat, selected.long);
                if candidate < *d2 {
                    *d2 = candidate;
                }
            });
    }

    centers
}

fn seed_candidate(point: &PopulationPoint, competitors: &CompetitorIndex) -> Candidate {
    Candidate::seeded(
        point.lat,
        point.long,
        competitors.nearest_distance(point.lat, point.long),
    )
}

/// Index of the first positive weight whose running sum reaches `target`.
///
/// Falls back to the last positive weight when rounding leaves the running
/// sum just short of `target`. Callers guarantee at least one positive weight.
fn weighted_pick(weights: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_positive = 0;

    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = i;
        if cumulative >= target {
            return i;
        }
    }

    last_positive
}

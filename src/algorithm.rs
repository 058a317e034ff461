use std::f64::consts::PI;
use std::time::Instant;

use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::competitor::CompetitorIndex;
use crate::config::OptimizerConfig;
use crate::distance::{assign_to_nearest, max_center_movement};
use crate::types::{candidates_to_array, points_to_arrays, Candidate, PopulationPoint};

/// Result of the refinement loop
#[derive(Debug, Clone)]
pub struct RefinementResult {
    /// Final centers, in the same order as the initial centers
    pub centers: Vec<Candidate>,
    /// Center index each point was assigned to in the last iteration
    pub labels: Array1<usize>,
    pub n_iterations: usize,
    pub converged: bool,
    /// Largest center movement in the last iteration
    pub max_movement: f64,
}

/// Run population-weighted k-means with competitor avoidance.
///
/// Loops assign, update and convergence check until no center moves by
/// `config.tol` or more, or `config.max_iters` iterations have run. Each
/// iteration produces a fresh set of centers; the returned metrics are the
/// ones computed by the last update step.
pub fn refine_centers(
    initial: &[Candidate],
    points: &[PopulationPoint],
    competitors: &CompetitorIndex,
    config: &OptimizerConfig,
) -> RefinementResult {
    let (coords, population) = points_to_arrays(points);
    let mut centers = initial.to_vec();
    let mut labels = Array1::zeros(points.len());
    let mut n_iterations = 0;
    let mut converged = false;
    let mut max_movement = 0.0;

    if centers.is_empty() {
        return RefinementResult {
            centers,
            labels,
            n_iterations,
            converged,
            max_movement,
        };
    }

    for iteration in 0..config.max_iters {
        let iter_start = Instant::now();
        n_iterations = iteration + 1;

        let (next, step_labels) = refine_step(
            &centers,
            &coords.view(),
            &population.view(),
            competitors,
            config,
        );
        max_movement = max_center_movement(&centers, &next);
        centers = next;
        labels = step_labels;

        if iteration % 5 == 0 || max_movement < config.tol {
            debug!(
                "Iteration {}/{}: max movement = {:.6}, time = {:.4}s",
                iteration + 1,
                config.max_iters,
                max_movement,
                iter_start.elapsed().as_secs_f64()
            );
        }

        if max_movement < config.tol {
            converged = true;
            info!(
                "Converged after {} iterations (movement {:.6} < tol {:.6})",
                iteration + 1,
                max_movement,
                config.tol
            );
            break;
        }
    }

    if !converged {
        info!(
            "Stopped after {} iterations without converging (movement {:.6})",
            n_iterations, max_movement
        );
    }

    RefinementResult {
        centers,
        labels,
        n_iterations,
        converged,
        max_movement,
    }
}

/// One assign + update pass.
///
/// # Arguments
/// * `centers` - Current centers
/// * `coords` - Point coordinates (n_points, 2) as `[lat, long]`
/// * `population` - Point populations (n_points,)
///
/// # Returns
/// * The updated centers and the assignment they were computed from. A
///   center with no assigned points is returned unchanged.
pub fn refine_step(
    centers: &[Candidate],
    coords: &ArrayView2<f64>,
    population: &ArrayView1<u64>,
    competitors: &CompetitorIndex,
    config: &OptimizerConfig,
) -> (Vec<Candidate>, Array1<usize>) {
    let k = centers.len();
    let center_coords = candidates_to_array(centers);
    let labels = assign_to_nearest(coords, &center_coords.view());

    // Population-weighted coordinate sums, accumulated in point order
    let mut weighted_sums: Array2<f64> = Array2::zeros((k, 2));
    let mut captured: Array1<u64> = Array1::zeros(k);
    let mut counts: Array1<usize> = Array1::zeros(k);

    for (i, &label) in labels.iter().enumerate() {
        let pop = population[i];
        let weight = pop as f64;
        weighted_sums[[label, 0]] += coords[[i, 0]] * weight;
        weighted_sums[[label, 1]] += coords[[i, 1]] * weight;
        captured[label] += pop;
        counts[label] += 1;
    }

    let mut stale = 0;
    let updated: Vec<Candidate> = centers
        .iter()
        .enumerate()
        .map(|(idx, center)| {
            if counts[idx] == 0 {
                stale += 1;
                return *center;
            }

            let total = captured[idx];
            let (lat, long) = if total > 0 {
                let total = total as f64;
                (
                    weighted_sums[[idx, 0]] / total,
                    weighted_sums[[idx, 1]] / total,
                )
            } else {
                (center.lat, center.long)
            };

            let (lat, long) = avoid_competitors(lat, long, competitors, config);
            let distance = competitors.nearest_distance(lat, long);

            Candidate {
                lat,
                long,
                score: score(total, distance, config.isolation_weight),
                population_captured: total,
                nearest_competitor_distance: distance,
            }
        })
        .collect();

    if stale > 0 {
        warn!("{} of {} centers captured no points and kept stale metrics", stale, k);
    }

    (updated, labels)
}

/// Move a position off a nearby competitor.
///
/// When the position is closer than `avoidance_trigger_distance` to a
/// competitor, probes evenly spaced on a circle of `avoidance_radius` are
/// tried in increasing angle from 0 degrees. The first probe that is further
/// from its nearest competitor than the original position wins; otherwise the
/// position is kept.
pub fn avoid_competitors(
    lat: f64,
    long: f64,
    competitors: &CompetitorIndex,
    config: &OptimizerConfig,
) -> (f64, f64) {
    let current = competitors.nearest_distance(lat, long);
    if current >= config.avoidance_trigger_distance {
        return (lat, long);
    }

    let step = 2.0 * PI / config.avoidance_probes as f64;
    for probe in 0..config.avoidance_probes {
        let theta = step * probe as f64;
        let probe_lat = lat + config.avoidance_radius * theta.cos();
        let probe_long = long + config.avoidance_radius * theta.sin();
        if competitors.nearest_distance(probe_lat, probe_long) > current {
            return (probe_lat, probe_long);
        }
    }

    (lat, long)
}

/// Captured population with a linear bonus for distance from competitors
#[inline]
pub fn score(population_captured: u64, competitor_distance: f64, isolation_weight: f64) -> f64 {
    population_captured as f64 * (1.0 + competitor_distance * isolation_weight)
}

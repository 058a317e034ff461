use ndarray::{Array1, ArrayView2};
use rayon::prelude::*;

use crate::types::Candidate;

/// Planar Euclidean distance, treating latitude and longitude as flat axes
#[inline]
pub fn planar_distance(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    squared_distance(lat1, long1, lat2, long2).sqrt()
}

/// Squared planar distance
#[inline]
pub fn squared_distance(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dlong = long2 - long1;
    dlat * dlat + dlong * dlong
}

/// Find the nearest center for each point
///
/// # Arguments
/// * `points` - Point coordinates (n_points, 2)
/// * `centers` - Center coordinates (k, 2)
///
/// # Returns
/// * `labels` - Index of the nearest center for each point. Exact ties go to
///   the lowest center index.
pub fn assign_to_nearest(points: &ArrayView2<f64>, centers: &ArrayView2<f64>) -> Array1<usize> {
    let n_points = points.nrows();
    let k = centers.nrows();

    if k == 0 {
        return Array1::zeros(n_points);
    }

    // Each point is independent, so parallel assignment stays deterministic
    let labels: Vec<usize> = (0..n_points)
        .into_par_iter()
        .map(|i| {
            let lat = points[[i, 0]];
            let long = points[[i, 1]];
            let mut best = f64::INFINITY;
            let mut label = 0;

            for j in 0..k {
                let d = planar_distance(lat, long, centers[[j, 0]], centers[[j, 1]]);
                if d < best {
                    best = d;
                    label = j;
                }
            }
            label
        })
        .collect();

    Array1::from(labels)
}

/// Largest distance any center moved between two iterations
pub fn max_center_movement(old_centers: &[Candidate], new_centers: &[Candidate]) -> f64 {
    old_centers
        .iter()
        .zip(new_centers)
        .map(|(old, new)| planar_distance(old.lat, old.long, new.lat, new.long))
        .fold(0.0, f64::max)
}

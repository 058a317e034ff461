use ndarray::{Array1, Array2};

/// A population-weighted area, as loaded from the population source
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationPoint {
    pub id: String,
    pub population: u64,
    pub lat: f64,
    pub long: f64,
}

impl PopulationPoint {
    pub fn new(id: impl Into<String>, population: u64, lat: f64, long: f64) -> Self {
        Self {
            id: id.into(),
            population,
            lat,
            long,
        }
    }
}

/// An existing competitor site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Competitor {
    pub lat: f64,
    pub long: f64,
}

impl Competitor {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }
}

/// A working center during refinement.
///
/// `score` and `population_captured` stay at zero until the first update
/// step has run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub lat: f64,
    pub long: f64,
    pub score: f64,
    pub population_captured: u64,
    pub nearest_competitor_distance: f64,
}

impl Candidate {
    /// A freshly seeded center with no captured population yet
    pub fn seeded(lat: f64, long: f64, nearest_competitor_distance: f64) -> Self {
        Self {
            lat,
            long,
            score: 0.0,
            population_captured: 0,
            nearest_competitor_distance,
        }
    }
}

/// Pack point coordinates into an (n, 2) matrix of `[lat, long]` rows
/// alongside their populations
pub fn points_to_arrays(points: &[PopulationPoint]) -> (Array2<f64>, Array1<u64>) {
    let mut coords = Array2::zeros((points.len(), 2));
    let mut population = Array1::zeros(points.len());

    for (i, point) in points.iter().enumerate() {
        coords[[i, 0]] = point.lat;
        coords[[i, 1]] = point.long;
        population[i] = point.population;
    }

    (coords, population)
}

/// Pack candidate positions into a (k, 2) matrix of `[lat, long]` rows
pub fn candidates_to_array(candidates: &[Candidate]) -> Array2<f64> {
    let mut coords = Array2::zeros((candidates.len(), 2));
    for (i, candidate) in candidates.iter().enumerate() {
        coords[[i, 0]] = candidate.lat;
        coords[[i, 1]] = candidate.long;
    }
    coords
}

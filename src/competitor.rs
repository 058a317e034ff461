use crate::distance::planar_distance;
use crate::types::Competitor;

/// Distance reported when there are no competitors at all
pub const NO_COMPETITOR_DISTANCE: f64 = 1.0;

/// Scanning stops once a competitor is found closer than this
pub const EARLY_EXIT_DISTANCE: f64 = 0.001;

/// Nearest-competitor lookups over a fixed set of competitor sites
#[derive(Debug, Clone, Default)]
pub struct CompetitorIndex {
    competitors: Vec<Competitor>,
}

impl CompetitorIndex {
    pub fn new(competitors: Vec<Competitor>) -> Self {
        Self { competitors }
    }

    /// Planar distance from `(lat, long)` to the closest competitor.
    ///
    /// Returns [`NO_COMPETITOR_DISTANCE`] when the index is empty.
    pub fn nearest_distance(&self, lat: f64, long: f64) -> f64 {
        let mut min = f64::INFINITY;
        for competitor in &self.competitors {
            let d = planar_distance(lat, long, competitor.lat, competitor.long);
            if d < min {
                min = d;
                if d < EARLY_EXIT_DISTANCE {
                    break;
                }
            }
        }

        if min.is_infinite() {
            NO_COMPETITOR_DISTANCE
        } else {
            min
        }
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }
}

impl From<Vec<Competitor>> for CompetitorIndex {
    fn from(competitors: Vec<Competitor>) -> Self {
        Self::new(competitors)
    }
}

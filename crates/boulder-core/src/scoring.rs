//! Desirability scoring for recommendation candidates.

use serde::{Deserialize, Serialize};

use crate::models::Candidate;

/// Weights for the linear desirability score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Points per rating star
    pub rating: f64,
    /// Penalty per mile from the query point
    pub distance: f64,
    /// Penalty per mile of approach
    pub approach: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating: 20.0,
            distance: 0.5,
            approach: 2.0,
        }
    }
}

impl ScoringWeights {
    /// Score a candidate. Unbounded; only the relative order within one query matters.
    ///
    /// An unknown rating contributes nothing.
    pub fn score(&self, candidate: &Candidate) -> f64 {
        let rating = candidate.route.rating.unwrap_or(0.0);
        rating * self.rating
            - candidate.distance * self.distance
            - candidate.route.approach_distance * self.approach
    }
}

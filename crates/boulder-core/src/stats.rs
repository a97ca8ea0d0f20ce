//! Area-level aggregates over a proximity result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Candidate;

/// Summary of the routes around a point.
///
/// An empty area serializes as `{"total_routes": 0}` with no other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaStatistics {
    pub total_routes: usize,
    #[serde(flatten)]
    pub summary: Option<AreaSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSummary {
    /// Occurrences per grade label, ignoring blank grades
    pub grade_distribution: BTreeMap<String, usize>,
    /// Mean over rated routes; 0.0 when none are rated
    pub average_rating: f64,
    pub average_approach: f64,
}

impl AreaStatistics {
    /// Aggregate a proximity result. Ordering of the input is irrelevant.
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        if candidates.is_empty() {
            return Self {
                total_routes: 0,
                summary: None,
            };
        }

        let mut grade_distribution = BTreeMap::new();
        for candidate in candidates {
            let grade = &candidate.route.grade;
            if !grade.is_empty() {
                *grade_distribution.entry(grade.clone()).or_insert(0) += 1;
            }
        }

        let ratings: Vec<f64> = candidates
            .iter()
            .filter_map(|c| c.route.rating)
            .filter(|rating| *rating != 0.0)
            .collect();
        let approaches: Vec<f64> = candidates
            .iter()
            .map(|c| c.route.approach_distance)
            .collect();

        Self {
            total_routes: candidates.len(),
            summary: Some(AreaSummary {
                grade_distribution,
                average_rating: round2(mean(&ratings)),
                average_approach: round2(mean(&approaches)),
            }),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Two decimal places, exact halves to the even digit.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

//! Hard preference constraints applied to proximity candidates.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{Candidate, Route};

/// Default ceiling on approach distance, in miles.
pub const DEFAULT_MAX_APPROACH: f64 = 2.0;

/// Grade, hold and approach constraints for one query.
///
/// An empty `grades` or `holds` list disables that constraint; the approach
/// ceiling always applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub max_approach: f64,
    #[serde(default)]
    pub grades: Vec<String>,
    #[serde(default)]
    pub holds: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            max_approach: DEFAULT_MAX_APPROACH,
            grades: Vec::new(),
            holds: Vec::new(),
        }
    }
}

impl Preferences {
    pub fn new(max_approach: f64, grades: Vec<String>, holds: Vec<String>) -> Self {
        Self {
            max_approach,
            grades,
            holds,
        }
    }

    pub(crate) fn check(&self) -> Result<(), CoreError> {
        if !self.max_approach.is_finite() || self.max_approach < 0.0 {
            return Err(CoreError::invalid(format!(
                "max approach must be a non-negative number (got {})",
                self.max_approach
            )));
        }
        Ok(())
    }

    /// Check a single route against every constraint.
    pub fn matches(&self, route: &Route) -> bool {
        if route.approach_distance > self.max_approach {
            return false;
        }
        if !self.grades.is_empty() && !self.grades.contains(&route.grade) {
            return false;
        }
        self.holds.is_empty() || route.has_all_holds(&self.holds)
    }

    /// Keep candidates satisfying every constraint, preserving input order.
    pub fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| self.matches(&candidate.route))
            .collect()
    }
}

//! Plain-text rendering of recommendation results.

use boulder_core::{AreaStatistics, Candidate};
use std::fmt::Write;

/// One line per candidate: rank, name, grade, distance, score and location.
pub fn format_recommendations(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return "No routes matched.\n".to_string();
    }

    let mut out = String::new();
    for (rank, candidate) in candidates.iter().enumerate() {
        let route = &candidate.route;
        let _ = write!(
            out,
            "{:>2}. {} ({}) - {:.1} mi",
            rank + 1,
            route.name,
            route.grade,
            candidate.distance
        );
        if let Some(score) = candidate.recommendation_score {
            let _ = write!(out, ", score {:.2}", score);
        }
        if !route.location.is_empty() {
            let _ = write!(out, " [{}]", route.location);
        }
        out.push('\n');
    }
    out
}

pub fn format_statistics(stats: &AreaStatistics) -> String {
    let mut out = format!("Routes in area: {}\n", stats.total_routes);
    let Some(summary) = &stats.summary else {
        return out;
    };

    let _ = writeln!(out, "Average rating: {:.2}", summary.average_rating);
    let _ = writeln!(out, "Average approach: {:.2} mi", summary.average_approach);
    let grades: Vec<String> = summary
        .grade_distribution
        .iter()
        .map(|(grade, count)| format!("{}x{}", grade, count))
        .collect();
    let _ = writeln!(out, "Grades: {}", grades.join(", "));
    out
}

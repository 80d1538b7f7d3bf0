use std::cmp::Ordering;

use crate::models::PersonStats;

/// The `count` people with the most completed tasks. Ties keep the caller's
/// ordering, typically total hours descending.
pub fn top_performers(stats: &[PersonStats], count: usize) -> Vec<PersonStats> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| b.tasks_completed.cmp(&a.tasks_completed));
    ranked.truncate(count);
    ranked
}

/// The `count` people with the fewest logged hours. Note the metric differs
/// from `top_performers` on purpose; see DESIGN.md.
pub fn low_performers(stats: &[PersonStats], count: usize) -> Vec<PersonStats> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| {
        a.total_hours
            .partial_cmp(&b.total_hours)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(count);
    ranked
}

//! Consecutive-day streaks

use chrono::NaiveDate;

/// Streak after completing a Big Quest on `today`.
///
/// Continues when the previous completion was exactly yesterday, otherwise
/// restarts at 1. Callers reject a second completion on the same day.
#[must_use]
pub fn next_streak(previous: u32, last_quest_date: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match (last_quest_date, today.pred_opt()) {
        (Some(last), Some(yesterday)) if last == yesterday => previous.saturating_add(1),
        _ => 1,
    }
}

//! Hydration reminders

use crate::config::Limits;
use crate::notice::Notice;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use mq_progress::UserProgress;

/// Decides when to nudge the user to drink water
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationReminder {
    interval: Duration,
    goal: u8,
}

impl Default for HydrationReminder {
    fn default() -> Self {
        Self::from_limits(&Limits::default())
    }
}

impl HydrationReminder {
    /// Reminder using configured interval and goal
    #[must_use]
    pub fn from_limits(limits: &Limits) -> Self {
        Self {
            interval: Duration::hours(i64::from(limits.hydration_reminder_hours)),
            goal: limits.hydration_goal,
        }
    }

    /// Whether a reminder is due: below today's goal and at least one
    /// interval since the last reminder.
    #[must_use]
    pub fn due(
        &self,
        progress: &UserProgress,
        last_reminder_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> bool {
        if progress.hydration.level_on(today) >= self.goal {
            return false;
        }
        last_reminder_at.map_or(true, |last| now - last >= self.interval)
    }

    /// The reminder notice, if due
    #[must_use]
    pub fn check(
        &self,
        progress: &UserProgress,
        last_reminder_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Option<Notice> {
        self.due(progress, last_reminder_at, now, today)
            .then_some(Notice::HydrationReminder)
    }
}

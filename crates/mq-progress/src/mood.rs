//! Mood check-ins
//!
//! The five-step mood scale, the capped per-day history and the
//! sustained-low-mood check that surfaces support resources.

use crate::error::ModelError;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Moods at or below this value count as low
pub const LOW_MOOD_THRESHOLD: u8 = 2;

/// Consecutive low check-ins (on distinct days) that trigger the support notice
pub const LOW_MOOD_RUN: usize = 3;

/// Mood scale, 1 (angry) to 5 (fantastic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mood {
    /// 1
    Angry,
    /// 2
    Down,
    /// 3
    Neutral,
    /// 4
    Good,
    /// 5
    Fantastic,
}

impl Mood {
    /// All moods, best first
    pub const ALL: [Mood; 5] = [Mood::Fantastic, Mood::Good, Mood::Neutral, Mood::Down, Mood::Angry];

    /// Persisted value
    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Mood::Angry => 1,
            Mood::Down => 2,
            Mood::Neutral => 3,
            Mood::Good => 4,
            Mood::Fantastic => 5,
        }
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Mood::Angry => "Angry",
            Mood::Down => "Down",
            Mood::Neutral => "Neutral",
            Mood::Good => "Good",
            Mood::Fantastic => "Fantastic",
        }
    }

    /// Journaling prompt offered after the check-in
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Mood::Fantastic => "Fantastic! What's putting a smile on your face today?",
            Mood::Good => "Glad to see you're feeling good. Want to write about it?",
            Mood::Neutral => "Feeling neutral is perfectly okay. What's on your mind?",
            Mood::Down => "It's okay to feel down. What's contributing to this feeling?",
            Mood::Angry => "It's valid to feel this way. Writing about it might help.",
        }
    }
}

impl TryFrom<u8> for Mood {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mood::ALL
            .into_iter()
            .find(|m| m.value() == value)
            .ok_or(ModelError::InvalidMood(value))
    }
}

/// One check-in in the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Calendar day of the check-in
    pub day: NaiveDate,
    /// Time of the latest check-in on that day
    pub date: DateTime<Utc>,
    /// Mood value, 1..=5
    pub mood: u8,
}

/// Insert or replace today's check-in, newest first, keeping at most `cap` entries.
#[must_use]
pub fn upsert_mood(
    history: &[MoodEntry],
    mood: Mood,
    today: NaiveDate,
    now: DateTime<Utc>,
    cap: usize,
) -> Vec<MoodEntry> {
    let mut updated = history.to_vec();
    match updated.iter_mut().find(|e| e.day == today) {
        Some(existing) => existing.mood = mood.value(),
        None => updated.push(MoodEntry {
            day: today,
            date: now,
            mood: mood.value(),
        }),
    }
    updated.sort_by(|a, b| b.day.cmp(&a.day).then(b.date.cmp(&a.date)));
    updated.truncate(cap);
    updated
}

/// Whether the most recent check-ins show a sustained low mood.
///
/// Expects `history` newest first. The latest [`LOW_MOOD_RUN`] entries must
/// all be low and fall on distinct days.
#[must_use]
pub fn is_sustained_low(history: &[MoodEntry]) -> bool {
    if history.len() < LOW_MOOD_RUN {
        return false;
    }
    let recent = &history[..LOW_MOOD_RUN];
    let days: BTreeSet<NaiveDate> = recent.iter().map(|e| e.day).collect();
    days.len() >= LOW_MOOD_RUN && recent.iter().all(|e| e.mood <= LOW_MOOD_THRESHOLD)
}

/// Whether the support notice may be shown again.
#[must_use]
pub fn support_cooldown_elapsed(last_shown: Option<NaiveDate>, today: NaiveDate, cooldown_days: u64) -> bool {
    match (last_shown, today.checked_sub_days(Days::new(cooldown_days))) {
        (Some(last), Some(cutoff)) => last <= cutoff,
        _ => true,
    }
}

//! Daily content state machine
//!
//! Each content type moves `Stale -> Generating -> Fresh`, and back to
//! `Stale` when the stored date no longer matches today. A stored document
//! already dated today (written elsewhere) jumps straight to `Fresh`.
//!
//! The machine only tracks this process. Two sessions regenerating at once
//! both write, and the last write wins.

use crate::error::LifecycleError;
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Content type with its own lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Small tasks and Big Quest
    Tasks,
    /// Fitness set
    Fitness,
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentState {
    /// Stored content is absent or from another day
    #[default]
    Stale,
    /// Generation in flight
    Generating,
    /// Stored content is today's
    Fresh,
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: ContentState) -> Vec<ContentState> {
    use ContentState::{Fresh, Generating, Stale};
    match from {
        Stale => vec![Generating, Fresh],
        Generating => vec![Fresh, Stale],
        Fresh => vec![Stale],
    }
}

/// Check a transition against the table
pub fn validate_transition(kind: ContentKind, from: ContentState, to: ContentState) -> Result<(), LifecycleError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(LifecycleError::IllegalTransition { kind, from, to })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    state: ContentState,
    fresh_for: Option<NaiveDate>,
}

/// Per-kind lifecycle tracker
#[derive(Debug, Default)]
pub struct ContentLifecycle {
    slots: Mutex<HashMap<ContentKind, Slot>>,
}

impl ContentLifecycle {
    /// New tracker with every kind stale
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `kind`
    #[must_use]
    pub fn state(&self, kind: ContentKind) -> ContentState {
        self.slots.lock().get(&kind).map(|s| s.state).unwrap_or_default()
    }

    /// Reconcile with the stored content date and return the resulting state.
    ///
    /// In-flight generation is left alone.
    pub fn observe(&self, kind: ContentKind, stored: Option<NaiveDate>, today: NaiveDate) -> ContentState {
        let mut slots = self.slots.lock();
        let slot = slots.entry(kind).or_default();
        if slot.state == ContentState::Generating {
            return slot.state;
        }
        let target = if stored == Some(today) {
            ContentState::Fresh
        } else {
            ContentState::Stale
        };
        if slot.state != target {
            debug!(?kind, from = ?slot.state, to = ?target, "content state observed");
            slot.state = target;
        }
        slot.fresh_for = (target == ContentState::Fresh).then_some(today);
        slot.state
    }

    /// Claim generation for `kind`
    pub fn begin(&self, kind: ContentKind) -> Result<(), LifecycleError> {
        self.transition(kind, ContentState::Generating, None)
    }

    /// Generation finished and was stored for `date`
    pub fn complete(&self, kind: ContentKind, date: NaiveDate) -> Result<(), LifecycleError> {
        self.transition(kind, ContentState::Fresh, Some(date))
    }

    /// Generation could not be stored
    pub fn abort(&self, kind: ContentKind) -> Result<(), LifecycleError> {
        self.transition(kind, ContentState::Stale, None)
    }

    /// Day the content of `kind` is fresh for
    #[must_use]
    pub fn fresh_for(&self, kind: ContentKind) -> Option<NaiveDate> {
        self.slots.lock().get(&kind).and_then(|s| s.fresh_for)
    }

    fn transition(&self, kind: ContentKind, to: ContentState, date: Option<NaiveDate>) -> Result<(), LifecycleError> {
        let mut slots = self.slots.lock();
        let slot = slots.entry(kind).or_default();
        validate_transition(kind, slot.state, to)?;
        debug!(?kind, from = ?slot.state, ?to, "content state transition");
        slot.state = to;
        slot.fresh_for = date;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn full_cycle() {
        let lc = ContentLifecycle::new();
        assert_eq!(lc.observe(ContentKind::Tasks, None, day(1)), ContentState::Stale);
        lc.begin(ContentKind::Tasks).unwrap();
        assert_eq!(lc.state(ContentKind::Tasks), ContentState::Generating);
        lc.complete(ContentKind::Tasks, day(1)).unwrap();
        assert_eq!(lc.fresh_for(ContentKind::Tasks), Some(day(1)));
        assert_eq!(lc.observe(ContentKind::Tasks, Some(day(1)), day(2)), ContentState::Stale);
    }

    #[test]
    fn kinds_are_independent() {
        let lc = ContentLifecycle::new();
        lc.begin(ContentKind::Tasks).unwrap();
        assert_eq!(lc.state(ContentKind::Fitness), ContentState::Stale);
        lc.begin(ContentKind::Fitness).unwrap();
    }

    #[test]
    fn double_begin_is_rejected() {
        let lc = ContentLifecycle::new();
        lc.begin(ContentKind::Fitness).unwrap();
        let err = lc.begin(ContentKind::Fitness).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::IllegalTransition {
                kind: ContentKind::Fitness,
                from: ContentState::Generating,
                to: ContentState::Generating,
            }
        );
    }

    #[test]
    fn observe_does_not_interrupt_generation() {
        let lc = ContentLifecycle::new();
        lc.begin(ContentKind::Tasks).unwrap();
        assert_eq!(lc.observe(ContentKind::Tasks, Some(day(1)), day(1)), ContentState::Generating);
    }

    #[test]
    fn abort_returns_to_stale() {
        let lc = ContentLifecycle::new();
        lc.begin(ContentKind::Tasks).unwrap();
        lc.abort(ContentKind::Tasks).unwrap();
        assert_eq!(lc.state(ContentKind::Tasks), ContentState::Stale);
        assert!(lc.abort(ContentKind::Tasks).is_err());
    }

    #[test]
    fn table_has_no_self_loops() {
        for state in [ContentState::Stale, ContentState::Generating, ContentState::Fresh] {
            assert!(!allowed_transitions(state).contains(&state));
        }
    }
}

//! User-visible feedback
//!
//! Every action ends in notices rather than panics or silent failures. The
//! presentation layer implements [`NoticeSink`]; [`TracingNotices`] mirrors
//! them into the log and [`NoticeBuffer`] collects them.

use mq_content::ContentKind;
use mq_progress::{Mood, NodeId};
use parking_lot::Mutex;
use std::fmt;
use tracing::{error, info, warn};

/// Severity used for display and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational
    Info,
    /// Positive outcome
    Success,
    /// Something failed
    Error,
}

/// A user-visible notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Plain success message
    Success(String),
    /// Failure message
    Error(String),
    /// Informational message
    Info(String),
    /// XP paid for an action
    Reward {
        /// XP paid
        xp: u64,
        /// What earned it
        reason: String,
    },
    /// Level gained
    LevelUp {
        /// New level
        level: u32,
    },
    /// Badge earned
    BadgeEarned {
        /// Badge id
        id: &'static str,
        /// Badge name
        name: &'static str,
    },
    /// Next path node unlocked
    NodeUnlocked {
        /// Node id
        node: NodeId,
        /// Node name
        name: &'static str,
    },
    /// First Big Quest opened the fitness hub
    FitnessHubUnlocked,
    /// All of today's fitness tasks done
    FitnessComplete {
        /// XP paid
        xp: u64,
    },
    /// Hydration goal reached
    HydrationGoalReached {
        /// XP paid
        xp: u64,
    },
    /// Time for a glass of water
    HydrationReminder,
    /// Several low-mood days in a row
    SupportResources {
        /// Resource link
        url: String,
    },
    /// Journaling prompt for the mood just recorded
    MoodPrompt {
        /// Recorded mood
        mood: Mood,
    },
    /// Content came from the fallback pools
    Fallback {
        /// Content type
        kind: ContentKind,
    },
}

impl Notice {
    /// Display severity
    #[must_use]
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::Error(_) => NoticeLevel::Error,
            Notice::Info(_) | Notice::HydrationReminder | Notice::MoodPrompt { .. } | Notice::Fallback { .. } | Notice::SupportResources { .. } => {
                NoticeLevel::Info
            }
            _ => NoticeLevel::Success,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(msg) | Notice::Error(msg) | Notice::Info(msg) => f.write_str(msg),
            Notice::Reward { xp, reason } => write!(f, "{reason} +{xp} XP"),
            Notice::LevelUp { level } => write!(f, "Level up! You reached level {level}."),
            Notice::BadgeEarned { name, .. } => write!(f, "Badge earned: {name}!"),
            Notice::NodeUnlocked { name, .. } => write!(f, "New area unlocked: {name}!"),
            Notice::FitnessHubUnlocked => f.write_str("You've unlocked the Fitness Hub!"),
            Notice::FitnessComplete { xp } => write!(f, "Fitness challenge complete! +{xp} XP"),
            Notice::HydrationGoalReached { xp } => write!(f, "Hydration goal complete! +{xp} XP"),
            Notice::HydrationReminder => f.write_str("Time for a glass of water!"),
            Notice::SupportResources { url } => write!(
                f,
                "It looks like things have been hard lately. You don't have to go through it alone: {url}"
            ),
            Notice::MoodPrompt { mood } => f.write_str(mood.prompt()),
            Notice::Fallback { .. } => f.write_str("The spirits are quiet... Here are some challenges."),
        }
    }
}

/// Receiver of notices
pub trait NoticeSink: Send + Sync {
    /// Deliver one notice
    fn notify(&self, notice: Notice);
}

/// Logs every notice
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotices;

impl NoticeSink for TracingNotices {
    fn notify(&self, notice: Notice) {
        match notice.level() {
            NoticeLevel::Error => error!(notice = %notice, "user notice"),
            NoticeLevel::Info if matches!(notice, Notice::Fallback { .. }) => warn!(notice = %notice, "user notice"),
            _ => info!(notice = %notice, "user notice"),
        }
    }
}

/// Collects notices in order
#[derive(Debug, Default)]
pub struct NoticeBuffer {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBuffer {
    /// Empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Take everything received
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl NoticeSink for NoticeBuffer {
    fn notify(&self, notice: Notice) {
        TracingNotices.notify(notice.clone());
        self.notices.lock().push(notice);
    }
}

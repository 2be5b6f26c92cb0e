//! MindQuest Progress Model
//!
//! The pure half of the game: everything here is a function of a
//! [`UserProgress`] snapshot and a date, with no I/O.
//!
//! - [`reward`]: XP thresholds and level-ups
//! - [`badge`]: the static badge catalog and its evaluator
//! - [`path`]: the three paths and their world-map nodes
//! - [`mood`]: mood catalog, history upsert and the low-mood check
//! - [`streak`]: consecutive-day streak arithmetic
//! - [`clock`]: the date/time seam
//!
//! # Example
//!
//! ```rust
//! use mq_progress::{apply_xp, newly_earned, UserProgress};
//!
//! let mut progress = UserProgress::default();
//! let (level, xp) = apply_xp(250, progress.level, progress.xp);
//! assert_eq!((level, xp), (2, 250));
//!
//! progress.completed_nodes.push("r1".into());
//! let earned: Vec<_> = newly_earned(&progress).iter().map(|b| b.id).collect();
//! assert_eq!(earned, vec!["first_quest"]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod badge;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod mood;
pub mod path;
pub mod reward;
pub mod streak;
pub mod types;

mod lenient;

pub use badge::{newly_earned, Badge, BadgeCategory, BADGES, BADGE_BONUS_XP};
pub use catalog::{Avatar, AVATARS};
pub use clock::{Clock, SystemClock};
pub use error::ModelError;
pub use mood::{Mood, MoodEntry};
pub use path::{MapNode, NodeId, NodePosition, Path, MAP_NODES, NODES_PER_PATH};
pub use reward::{apply_xp, level_progress, xp_threshold_for_level};
pub use streak::next_streak;
pub use types::{
    BigQuest, Category, DailyContent, DailyFitness, EntryId, FitnessTask, Hydration,
    JournalEntry, JournalSource, Task, TaskId, UserId, UserProgress,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

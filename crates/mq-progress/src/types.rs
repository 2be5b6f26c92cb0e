//! Core types for the progress document
//!
//! [`UserProgress`] is the one-document-per-user snapshot. Field names
//! serialize in camelCase to match the stored document shape, and every
//! collection reads as empty when absent or malformed.

use crate::error::ModelError;
use crate::lenient::vec_or_empty;
use crate::mood::MoodEntry;
use crate::path::{NodeId, Path};
use crate::reward::apply_xp;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Identity assigned by the authentication provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Wrap a provider uid
    #[inline]
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique task identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Ulid);

impl TaskId {
    /// Generate new task ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique journal entry identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Ulid);

impl EntryId {
    /// Generate new entry ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category of a daily small task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Emotional strength or coping
    Resilience,
    /// Clarity, concentration or presence
    Focus,
    /// Gratitude, kindness or perspective
    Positivity,
}

impl Category {
    /// All categories in the order daily tasks are listed
    pub const ALL: [Category; 3] = [Category::Resilience, Category::Focus, Category::Positivity];

    /// The path sharing this category's theme
    #[inline]
    #[must_use]
    pub fn path(self) -> Path {
        match self {
            Category::Resilience => Path::Resilience,
            Category::Focus => Path::Focus,
            Category::Positivity => Path::Positivity,
        }
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Path>()
            .map(|p| match p {
                Path::Resilience => Category::Resilience,
                Path::Focus => Category::Focus,
                Path::Positivity => Category::Positivity,
            })
            .map_err(|_| ModelError::UnknownCategory(s.to_string()))
    }
}

/// A daily small task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task ID
    pub id: TaskId,
    /// Category
    pub category: Category,
    /// Free-text description
    #[serde(rename = "task")]
    pub text: String,
    /// Completed by writing a journal entry
    pub is_journaling: bool,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create an open task with a fresh id
    #[must_use]
    pub fn new(category: Category, text: impl Into<String>, is_journaling: bool) -> Self {
        Self {
            id: TaskId::new(),
            category,
            text: text.into(),
            is_journaling,
            completed: false,
        }
    }
}

/// The single daily higher-value quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigQuest {
    /// Path the quest belongs to
    pub path: Path,
    /// Quest description
    #[serde(rename = "task")]
    pub text: String,
}

/// Today's small tasks and Big Quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyContent {
    /// Date the content was generated for
    pub date: NaiveDate,
    /// Three small tasks, exactly one journaling
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub tasks: Vec<Task>,
    /// The Big Quest
    pub big_quest: BigQuest,
    /// Set once every small task is completed
    #[serde(default)]
    pub all_small_tasks_completed: bool,
}

impl DailyContent {
    /// Whether this content belongs to `today`
    #[inline]
    #[must_use]
    pub fn is_for(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    /// Whether every task is completed
    #[inline]
    #[must_use]
    pub fn all_tasks_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }
}

/// One of the five daily fitness tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessTask {
    /// Task ID
    pub id: TaskId,
    /// Exercise description
    pub text: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Intensity level, 1 (warm-up) to 5 (cool-down)
    pub level: u8,
}

/// Today's fitness set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFitness {
    /// Date the set was generated for
    pub date: NaiveDate,
    /// Five leveled tasks
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub tasks: Vec<FitnessTask>,
}

impl DailyFitness {
    /// Whether this set belongs to `today`
    #[inline]
    #[must_use]
    pub fn is_for(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    /// Whether every task is completed
    #[inline]
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }
}

/// Daily water intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hydration {
    /// Glasses logged on `last_log_date`
    #[serde(default)]
    pub level: u8,
    /// Day the level refers to
    #[serde(default)]
    pub last_log_date: Option<NaiveDate>,
}

impl Hydration {
    /// Level as of `today`; a level from an earlier day counts as zero
    #[inline]
    #[must_use]
    pub fn level_on(&self, today: NaiveDate) -> u8 {
        if self.last_log_date == Some(today) {
            self.level
        } else {
            0
        }
    }
}

/// Where a journal entry was written from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalSource {
    /// Opened from a Big Quest
    Quest,
    /// Free journaling
    Journal,
    /// Follow-up to a mood check-in
    Mood,
    /// Completion of a journaling task
    Task,
}

/// A journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Entry ID
    pub id: EntryId,
    /// Written (or last edited) at
    pub date: DateTime<Utc>,
    /// Entry text
    pub entry: String,
    /// Originating context
    pub source: JournalSource,
    /// Mood value for mood-sourced entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<u8>,
    /// Task text for task-sourced entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_text: Option<String>,
    /// Path of the task's category for task-sourced entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
    /// Generated reflection, cleared on edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
}

impl JournalEntry {
    /// Create a new entry with a fresh id
    #[must_use]
    pub fn new(entry: impl Into<String>, source: JournalSource, date: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            date,
            entry: entry.into(),
            source,
            mood: None,
            task_text: None,
            path: None,
            insights: None,
        }
    }
}

/// The per-user progress document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    /// Name chosen at onboarding
    pub display_name: String,
    /// Avatar background image
    pub avatar_url: String,
    /// Path chosen at onboarding, immutable afterwards
    pub main_path: Path,
    /// Level, at least 1
    pub level: u32,
    /// Accumulated XP, never decreases
    pub xp: u64,
    /// Consecutive days with a completed Big Quest
    pub streak: u32,
    /// Last day a Big Quest was completed
    pub last_quest_date: Option<NaiveDate>,
    /// Last day a mood was checked in
    pub last_mood_date: Option<NaiveDate>,
    /// Last day the support notice was shown
    pub last_support_message_date: Option<NaiveDate>,
    /// Journal, newest first on write
    #[serde(deserialize_with = "vec_or_empty")]
    pub journal: Vec<JournalEntry>,
    /// Mood check-ins, newest first, at most one per day
    #[serde(deserialize_with = "vec_or_empty")]
    pub mood_history: Vec<MoodEntry>,
    /// Unlocked node ids
    #[serde(deserialize_with = "vec_or_empty")]
    pub unlocked_nodes: Vec<NodeId>,
    /// Completed node ids
    #[serde(deserialize_with = "vec_or_empty")]
    pub completed_nodes: Vec<NodeId>,
    /// Completed quest text keyed by `<node>-<date>`
    pub completed_node_tasks: BTreeMap<String, String>,
    /// Rolling history of completed small-task texts
    #[serde(deserialize_with = "vec_or_empty")]
    pub completed_tasks_history: Vec<String>,
    /// Earned badge ids, append-only
    #[serde(deserialize_with = "vec_or_empty")]
    pub badges: Vec<String>,
    /// Today's tasks and quest
    pub daily_content: Option<DailyContent>,
    /// Today's fitness set
    pub daily_fitness: Option<DailyFitness>,
    /// Water intake
    pub hydration: Hydration,
    /// Days with all five fitness tasks completed
    pub fitness_completions: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            avatar_url: String::new(),
            main_path: Path::default(),
            level: 1,
            xp: 0,
            streak: 0,
            last_quest_date: None,
            last_mood_date: None,
            last_support_message_date: None,
            journal: Vec::new(),
            mood_history: Vec::new(),
            unlocked_nodes: Vec::new(),
            completed_nodes: Vec::new(),
            completed_node_tasks: BTreeMap::new(),
            completed_tasks_history: Vec::new(),
            badges: Vec::new(),
            daily_content: None,
            daily_fitness: None,
            hydration: Hydration::default(),
            fitness_completions: 0,
        }
    }
}

impl UserProgress {
    /// Fresh profile for a user who just finished onboarding
    #[must_use]
    pub fn new(display_name: impl Into<String>, avatar_url: impl Into<String>, main_path: Path) -> Self {
        Self {
            display_name: display_name.into(),
            avatar_url: avatar_url.into(),
            main_path,
            ..Self::default()
        }
    }

    /// Add XP and recompute the level. Returns the number of levels gained.
    pub fn award_xp(&mut self, amount: u64) -> u32 {
        let (level, xp) = apply_xp(amount, self.level, self.xp);
        let gained = level.saturating_sub(self.level.max(1));
        self.level = level;
        self.xp = xp;
        gained
    }

    /// Whether a badge id is already held
    #[inline]
    #[must_use]
    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|b| b == id)
    }

    /// Completed nodes that belong to a path (fitness pseudo-nodes excluded)
    #[must_use]
    pub fn completed_path_nodes(&self) -> usize {
        self.completed_nodes.iter().filter(|n| !n.is_fitness()).count()
    }

    /// Find a journal entry
    #[must_use]
    pub fn journal_entry(&self, id: EntryId) -> Option<&JournalEntry> {
        self.journal.iter().find(|e| e.id == id)
    }

    /// Journal sorted newest first, as presented
    #[must_use]
    pub fn journal_by_date(&self) -> Vec<&JournalEntry> {
        let mut entries: Vec<_> = self.journal.iter().collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }
}

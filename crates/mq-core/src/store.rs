//! Persistence seam
//!
//! One document per user. Writes are field-level merges ([`ProgressPatch`]);
//! readers observe snapshots through [`ProgressStore::subscribe`], which
//! delivers the current document immediately and again after every write.
//!
//! There is no concurrency token: two writers touching the same field race
//! and the last merge wins.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use mq_progress::{
    DailyContent, DailyFitness, Hydration, JournalEntry, MoodEntry, NodeId, UserId, UserProgress,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Snapshot callback; `None` when the user has no document
pub type SnapshotListener = Box<dyn Fn(Option<UserProgress>) + Send + Sync>;

macro_rules! progress_patch {
    ($($(#[$doc:meta])* $field:ident: $ty:ty,)*) => {
        /// Batched merge-write: every `Some` field replaces the stored field.
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct ProgressPatch {
            $($(#[$doc])* pub $field: Option<$ty>,)*
        }

        impl ProgressPatch {
            /// Merge into `progress`
            pub fn apply_to(self, progress: &mut UserProgress) {
                $(if let Some(value) = self.$field {
                    progress.$field = value.into();
                })*
            }

            /// Names of the fields this patch writes
            #[must_use]
            pub fn touched(&self) -> Vec<&'static str> {
                let mut fields = Vec::new();
                $(if self.$field.is_some() {
                    fields.push(stringify!($field));
                })*
                fields
            }
        }
    };
}

progress_patch! {
    /// Level
    level: u32,
    /// Total XP
    xp: u64,
    /// Quest streak
    streak: u32,
    /// Day of the last Big Quest
    last_quest_date: NaiveDate,
    /// Day of the last mood check-in
    last_mood_date: NaiveDate,
    /// Day the support notice was last shown
    last_support_message_date: NaiveDate,
    /// Journal
    journal: Vec<JournalEntry>,
    /// Mood history
    mood_history: Vec<MoodEntry>,
    /// Unlocked nodes
    unlocked_nodes: Vec<NodeId>,
    /// Completed nodes
    completed_nodes: Vec<NodeId>,
    /// Quest text by `<node>-<date>`
    completed_node_tasks: BTreeMap<String, String>,
    /// Recently completed task texts
    completed_tasks_history: Vec<String>,
    /// Held badges
    badges: Vec<String>,
    /// Today's tasks
    daily_content: DailyContent,
    /// Today's fitness set
    daily_fitness: DailyFitness,
    /// Hydration counter
    hydration: Hydration,
    /// Days with every fitness task done
    fitness_completions: u32,
}

impl ProgressPatch {
    /// Whether the patch writes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touched().is_empty()
    }

    /// Copy XP, level and badges from a working snapshot
    #[must_use]
    pub fn with_rewards_from(mut self, progress: &UserProgress) -> Self {
        self.xp = Some(progress.xp);
        self.level = Some(progress.level);
        self.badges = Some(progress.badges.clone());
        self
    }
}

/// Handle that stops snapshot delivery when dropped
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wrap an unsubscribe action
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription with nothing to cancel
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Stop delivery now
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Document store for [`UserProgress`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Current document, if any
    async fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError>;

    /// Create the document; fails if one exists
    async fn create(&self, user: &UserId, progress: UserProgress) -> Result<(), StoreError>;

    /// Merge fields into an existing document
    async fn merge(&self, user: &UserId, patch: ProgressPatch) -> Result<(), StoreError>;

    /// Observe the document until the handle is dropped
    fn subscribe(&self, user: &UserId, listener: SnapshotListener) -> Subscription;
}

type Listeners = DashMap<UserId, Vec<(u64, Arc<SnapshotListener>)>>;

/// Process-local store
#[derive(Default)]
pub struct InMemoryStore {
    documents: DashMap<UserId, UserProgress>,
    listeners: Arc<Listeners>,
    next_listener: AtomicU64,
}

impl fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("documents", &self.documents.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl InMemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding one document
    #[must_use]
    pub fn with_document(user: UserId, progress: UserProgress) -> Self {
        let store = Self::new();
        store.documents.insert(user, progress);
        store
    }

    /// Synchronous read, for inspection
    #[must_use]
    pub fn get(&self, user: &UserId) -> Option<UserProgress> {
        self.documents.get(user).map(|d| d.clone())
    }

    /// Active listeners for `user`
    #[must_use]
    pub fn listener_count(&self, user: &UserId) -> usize {
        self.listeners.get(user).map_or(0, |l| l.len())
    }

    fn notify(&self, user: &UserId) {
        let snapshot = self.get(user);
        let listeners: Vec<Arc<SnapshotListener>> = self
            .listeners
            .get(user)
            .map(|l| l.iter().map(|(_, f)| Arc::clone(f)).collect())
            .unwrap_or_default();
        for listener in listeners {
            listener(snapshot.clone());
        }
    }
}

#[async_trait]
impl ProgressStore for InMemoryStore {
    async fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError> {
        Ok(self.get(user))
    }

    async fn create(&self, user: &UserId, progress: UserProgress) -> Result<(), StoreError> {
        match self.documents.entry(user.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(StoreError::AlreadyExists(user.clone()));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(progress);
            }
        }
        debug!(%user, "progress document created");
        self.notify(user);
        Ok(())
    }

    async fn merge(&self, user: &UserId, patch: ProgressPatch) -> Result<(), StoreError> {
        {
            let mut doc = self
                .documents
                .get_mut(user)
                .ok_or_else(|| StoreError::NotFound(user.clone()))?;
            debug!(%user, fields = ?patch.touched(), "merging progress patch");
            patch.apply_to(&mut doc);
        }
        self.notify(user);
        Ok(())
    }

    fn subscribe(&self, user: &UserId, listener: SnapshotListener) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        let listener = Arc::new(listener);
        listener(self.get(user));
        self.listeners
            .entry(user.clone())
            .or_default()
            .push((id, listener));

        let registry: Weak<Listeners> = Arc::downgrade(&self.listeners);
        let user = user.clone();
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                if let Some(mut list) = registry.get_mut(&user) {
                    list.retain(|(lid, _)| *lid != id);
                }
                registry.remove_if(&user, |_, list| list.is_empty());
            }
        })
    }
}

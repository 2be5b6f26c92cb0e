//! Journal actions

use crate::controller::ProgressionController;
use crate::error::ControllerError;
use crate::notice::Notice;
use crate::store::ProgressPatch;
use mq_progress::{EntryId, JournalEntry, JournalSource, Mood, Path, UserId};
use tracing::debug;

/// Where a new journal entry was started from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalContext {
    /// Origin
    pub source: JournalSource,
    /// Mood being reflected on
    pub mood: Option<u8>,
    /// Linked task or quest text
    pub task_text: Option<String>,
    /// Linked path
    pub path: Option<Path>,
}

impl JournalContext {
    /// Free-form entry from the journal page
    #[must_use]
    pub fn journal() -> Self {
        Self {
            source: JournalSource::Journal,
            mood: None,
            task_text: None,
            path: None,
        }
    }

    /// Reflection on a mood check-in
    #[must_use]
    pub fn mood(mood: Mood) -> Self {
        Self {
            source: JournalSource::Mood,
            mood: Some(mood.value()),
            ..Self::journal()
        }
    }

    /// Notes on a Big Quest
    #[must_use]
    pub fn quest(path: Path, quest: impl Into<String>) -> Self {
        Self {
            source: JournalSource::Quest,
            task_text: Some(quest.into()),
            path: Some(path),
            ..Self::journal()
        }
    }
}

fn required_text(text: &str) -> Result<&str, ControllerError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ControllerError::validation("Your journal entry is empty."));
    }
    Ok(text)
}

fn missing_entry() -> ControllerError {
    ControllerError::validation("That journal entry no longer exists.")
}

impl ProgressionController {
    /// Save a new journal entry and return its id
    pub async fn save_journal_entry(
        &self,
        user: &UserId,
        text: &str,
        context: JournalContext,
    ) -> Result<EntryId, ControllerError> {
        let result = self.try_save_journal_entry(user, text, context).await;
        self.reported(result, "Could not save your journal entry")
    }

    async fn try_save_journal_entry(
        &self,
        user: &UserId,
        text: &str,
        context: JournalContext,
    ) -> Result<EntryId, ControllerError> {
        let text = required_text(text)?;
        let mut work = self.working(user).await?;

        let mut entry = JournalEntry::new(text, context.source, self.clock.now());
        entry.mood = context.mood;
        entry.task_text = context.task_text;
        entry.path = context.path;
        let id = entry.id;
        work.progress.journal.insert(0, entry);
        work.settle_badges(self.config.rewards.badge_bonus);
        work.notices.push(Notice::Success("Journal entry saved.".into()));

        let patch = ProgressPatch {
            journal: Some(work.progress.journal.clone()),
            ..ProgressPatch::default()
        }
        .with_rewards_from(&work.progress);
        self.commit(user, patch, work).await?;
        debug!(%user, %id, "journal entry saved");
        Ok(id)
    }

    /// Replace an entry's text and re-stamp it; any stored insight is dropped
    pub async fn update_journal_entry(&self, user: &UserId, id: EntryId, text: &str) -> Result<(), ControllerError> {
        let result = self.try_update_journal_entry(user, id, text).await;
        self.reported(result, "Could not update your journal entry")
    }

    async fn try_update_journal_entry(&self, user: &UserId, id: EntryId, text: &str) -> Result<(), ControllerError> {
        let text = required_text(text)?;
        let mut journal = self.current(user).await?.journal;
        let entry = journal.iter_mut().find(|e| e.id == id).ok_or_else(missing_entry)?;
        entry.entry = text.to_string();
        entry.date = self.clock.now();
        entry.insights = None;

        self.store
            .merge(
                user,
                ProgressPatch {
                    journal: Some(journal),
                    ..ProgressPatch::default()
                },
            )
            .await?;
        self.notices.notify(Notice::Success("Journal entry updated.".into()));
        Ok(())
    }

    /// Remove an entry
    pub async fn delete_journal_entry(&self, user: &UserId, id: EntryId) -> Result<(), ControllerError> {
        let result = self.try_delete_journal_entry(user, id).await;
        self.reported(result, "Could not delete your journal entry")
    }

    async fn try_delete_journal_entry(&self, user: &UserId, id: EntryId) -> Result<(), ControllerError> {
        let mut journal = self.current(user).await?.journal;
        let index = journal.iter().position(|e| e.id == id).ok_or_else(missing_entry)?;
        journal.remove(index);

        self.store
            .merge(
                user,
                ProgressPatch {
                    journal: Some(journal),
                    ..ProgressPatch::default()
                },
            )
            .await?;
        self.notices.notify(Notice::Success("Journal entry deleted.".into()));
        Ok(())
    }

    /// Ask the generation endpoint to reflect on an entry and store the reply.
    ///
    /// An entry edited or deleted while the request was in flight is left
    /// alone. Calls for the same entry are not serialized.
    pub async fn generate_journal_insights(&self, user: &UserId, id: EntryId) -> Result<String, ControllerError> {
        let result = self.try_generate_journal_insights(user, id).await;
        self.reported(result, "Couldn't generate insights right now")
    }

    async fn try_generate_journal_insights(&self, user: &UserId, id: EntryId) -> Result<String, ControllerError> {
        let text = self
            .current(user)
            .await?
            .journal_entry(id)
            .map(|e| e.entry.clone())
            .ok_or_else(missing_entry)?;

        let insight = self.generator.journal_insight(&text).await?;

        let mut journal = self.current(user).await?.journal;
        let entry = journal
            .iter_mut()
            .find(|e| e.id == id && e.entry == text)
            .ok_or_else(|| ControllerError::validation("That entry changed while insights were being prepared."))?;
        entry.insights = Some(insight.clone());

        self.store
            .merge(
                user,
                ProgressPatch {
                    journal: Some(journal),
                    ..ProgressPatch::default()
                },
            )
            .await?;
        self.notices.notify(Notice::Success("Insights ready.".into()));
        Ok(insight)
    }
}

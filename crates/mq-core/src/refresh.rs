//! Daily rollover
//!
//! Run on first load after sign-in and whenever the date may have changed.
//! Each stale content type is regenerated (or drawn from the fallback pools)
//! and written on its own; a hydration counter from another day is reset.

use crate::config::MindQuestConfig;
use crate::error::ControllerError;
use crate::notice::{Notice, NoticeSink};
use crate::session::Services;
use crate::store::{ProgressPatch, ProgressStore};
use mq_content::{ContentGenerator, ContentKind, ContentLifecycle, ContentSource, ContentState};
use mq_progress::{Clock, Hydration, UserId};
use std::sync::Arc;
use tracing::{error, info};

/// What a refresh changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Source of new task content, if regenerated
    pub tasks: Option<ContentSource>,
    /// Source of new fitness content, if regenerated
    pub fitness: Option<ContentSource>,
    /// Whether hydration was reset for the new day
    pub hydration_reset: bool,
}

/// Regenerates stale daily content
pub struct DailyRefresh {
    store: Arc<dyn ProgressStore>,
    generator: Arc<ContentGenerator>,
    notices: Arc<dyn NoticeSink>,
    clock: Arc<dyn Clock>,
    config: Arc<MindQuestConfig>,
    lifecycle: ContentLifecycle,
}

impl std::fmt::Debug for DailyRefresh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DailyRefresh")
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}

impl DailyRefresh {
    /// Refresh over shared services
    #[must_use]
    pub fn new(services: &Services) -> Self {
        Self {
            store: Arc::clone(&services.store),
            generator: Arc::clone(&services.generator),
            notices: Arc::clone(&services.notices),
            clock: Arc::clone(&services.clock),
            config: Arc::clone(&services.config),
            lifecycle: ContentLifecycle::new(),
        }
    }

    /// Current lifecycle state of `kind`
    #[must_use]
    pub fn state(&self, kind: ContentKind) -> ContentState {
        self.lifecycle.state(kind)
    }

    /// Bring `user`'s daily content up to today
    pub async fn run(&self, user: &UserId) -> Result<RefreshReport, ControllerError> {
        let result = self.try_run(user).await;
        if let Err(err) = &result {
            error!(%user, error = %err, "daily refresh failed");
            self.notices
                .notify(Notice::Error("Could not prepare today's quests. Please try again.".into()));
        }
        result
    }

    async fn try_run(&self, user: &UserId) -> Result<RefreshReport, ControllerError> {
        let today = self.clock.today();
        let progress = self
            .store
            .load(user)
            .await?
            .ok_or_else(|| crate::error::StoreError::NotFound(user.clone()))?;
        let mut report = RefreshReport::default();

        let stored = progress.daily_content.as_ref().map(|c| c.date);
        if self.lifecycle.observe(ContentKind::Tasks, stored, today) == ContentState::Stale {
            self.lifecycle.begin(ContentKind::Tasks)?;
            let history = &progress.completed_tasks_history;
            let recent = &history[history.len().saturating_sub(self.config.limits.prompt_history)..];
            let generated = self
                .generator
                .daily_content(progress.main_path, recent, today)
                .await;
            let patch = ProgressPatch {
                daily_content: Some(generated.content),
                ..ProgressPatch::default()
            };
            self.store_content(user, ContentKind::Tasks, patch, today).await?;
            if matches!(generated.source, ContentSource::Fallback { .. }) {
                self.notices.notify(Notice::Fallback { kind: ContentKind::Tasks });
            }
            report.tasks = Some(generated.source);
        }

        let stored = progress.daily_fitness.as_ref().map(|f| f.date);
        if self.lifecycle.observe(ContentKind::Fitness, stored, today) == ContentState::Stale {
            self.lifecycle.begin(ContentKind::Fitness)?;
            let generated = self.generator.daily_fitness(today).await;
            let patch = ProgressPatch {
                daily_fitness: Some(generated.content),
                ..ProgressPatch::default()
            };
            self.store_content(user, ContentKind::Fitness, patch, today).await?;
            if matches!(generated.source, ContentSource::Fallback { .. }) {
                self.notices.notify(Notice::Fallback { kind: ContentKind::Fitness });
            }
            report.fitness = Some(generated.source);
        }

        if progress.hydration.last_log_date != Some(today) {
            let patch = ProgressPatch {
                hydration: Some(Hydration {
                    level: 0,
                    last_log_date: Some(today),
                }),
                ..ProgressPatch::default()
            };
            self.store.merge(user, patch).await?;
            report.hydration_reset = true;
        }

        info!(%user, %today, ?report, "daily refresh complete");
        Ok(report)
    }

    async fn store_content(
        &self,
        user: &UserId,
        kind: ContentKind,
        patch: ProgressPatch,
        today: chrono::NaiveDate,
    ) -> Result<(), ControllerError> {
        match self.store.merge(user, patch).await {
            Ok(()) => {
                self.lifecycle.complete(kind, today)?;
                Ok(())
            }
            Err(err) => {
                self.lifecycle.abort(kind)?;
                Err(err.into())
            }
        }
    }
}

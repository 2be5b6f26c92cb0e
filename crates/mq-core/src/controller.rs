//! Progression controller
//!
//! One method per user action. Each reads the current snapshot, computes
//! the new state on a working copy, writes the touched fields as one
//! [`ProgressPatch`], and only then emits notices. Failures are reported as
//! an error notice and returned; nothing is rolled back or retried.
//!
//! Journal operations live in [`crate::journal`] and onboarding in
//! [`crate::onboarding`].

use crate::config::MindQuestConfig;
use crate::error::{ControllerError, StoreError};
use crate::notice::{Notice, NoticeSink};
use crate::session::Services;
use crate::store::{ProgressPatch, ProgressStore};
use chrono::NaiveDate;
use mq_content::ContentGenerator;
use mq_progress::mood::{is_sustained_low, support_cooldown_elapsed, upsert_mood};
use mq_progress::{
    newly_earned, next_streak, Clock, DailyContent, Hydration, JournalEntry, JournalSource, MapNode, Mood,
    NodeId, Task, TaskId, UserId, UserProgress,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What an action paid out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// XP awarded, badge bonuses included
    pub xp_awarded: u64,
    /// Levels gained
    pub levels_gained: u32,
    /// Badges newly earned
    pub badges: Vec<&'static str>,
    /// Node unlocked by this action
    pub unlocked: Option<NodeId>,
}

/// Working copy of a snapshot plus what the action has earned so far
#[derive(Debug)]
pub(crate) struct Working {
    pub(crate) progress: UserProgress,
    pub(crate) outcome: ActionOutcome,
    pub(crate) notices: Vec<Notice>,
}

impl Working {
    fn new(progress: UserProgress) -> Self {
        Self {
            progress,
            outcome: ActionOutcome::default(),
            notices: Vec::new(),
        }
    }

    pub(crate) fn award(&mut self, amount: u64) {
        self.outcome.levels_gained += self.progress.award_xp(amount);
        self.outcome.xp_awarded += amount;
    }

    /// Grant every newly satisfied badge and its bonus
    pub(crate) fn settle_badges(&mut self, bonus: u64) {
        for badge in newly_earned(&self.progress) {
            self.progress.badges.push(badge.id.to_string());
            self.award(bonus);
            self.outcome.badges.push(badge.id);
            self.notices.push(Notice::BadgeEarned {
                id: badge.id,
                name: badge.name,
            });
        }
    }
}

enum WaterLog {
    Full,
    Logged,
    GoalReached,
}

/// Applies user actions to a progress document
pub struct ProgressionController {
    pub(crate) store: Arc<dyn ProgressStore>,
    pub(crate) generator: Arc<ContentGenerator>,
    pub(crate) notices: Arc<dyn NoticeSink>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: Arc<MindQuestConfig>,
}

impl std::fmt::Debug for ProgressionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ProgressionController {
    /// Controller over shared services
    #[must_use]
    pub fn new(services: &Services) -> Self {
        Self {
            store: Arc::clone(&services.store),
            generator: Arc::clone(&services.generator),
            notices: Arc::clone(&services.notices),
            clock: Arc::clone(&services.clock),
            config: Arc::clone(&services.config),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MindQuestConfig {
        &self.config
    }

    /// Record today's mood check-in.
    ///
    /// The first check-in of a day pays the mood reward. A later one the
    /// same day replaces the stored value without paying again.
    pub async fn record_mood(&self, user: &UserId, value: u8) -> Result<ActionOutcome, ControllerError> {
        let result = self.try_record_mood(user, value).await;
        self.reported(result, "Could not record your mood")
    }

    async fn try_record_mood(&self, user: &UserId, value: u8) -> Result<ActionOutcome, ControllerError> {
        let mood = Mood::try_from(value)?;
        let today = self.clock.today();
        let mut work = self.working(user).await?;
        let mut patch = ProgressPatch::default();

        if work.progress.last_mood_date != Some(today) {
            let xp = self.config.rewards.mood;
            work.award(xp);
            work.progress.last_mood_date = Some(today);
            patch.last_mood_date = Some(today);
            work.notices.push(Notice::Reward {
                xp,
                reason: "Thanks for checking in!".into(),
            });
        }

        work.progress.mood_history = upsert_mood(
            &work.progress.mood_history,
            mood,
            today,
            self.clock.now(),
            self.config.limits.mood_history,
        );
        patch.mood_history = Some(work.progress.mood_history.clone());
        work.settle_badges(self.config.rewards.badge_bonus);
        work.notices.push(Notice::MoodPrompt { mood });

        let support_due = is_sustained_low(&work.progress.mood_history)
            && support_cooldown_elapsed(
                work.progress.last_support_message_date,
                today,
                self.config.support.cooldown_days,
            );

        let patch = patch.with_rewards_from(&work.progress);
        let outcome = self.commit(user, patch, work).await?;

        if support_due {
            info!(%user, "sustained low mood, showing support resources");
            self.notices.notify(Notice::SupportResources {
                url: self.config.support.resource_url.clone(),
            });
            let stamp = ProgressPatch {
                last_support_message_date: Some(today),
                ..ProgressPatch::default()
            };
            if let Err(err) = self.store.merge(user, stamp).await {
                warn!(%user, error = %err, "support notice shown but its date was not saved");
            }
        }
        Ok(outcome)
    }

    /// Complete a non-journaling daily task
    pub async fn complete_simple_task(&self, user: &UserId, task_id: TaskId) -> Result<ActionOutcome, ControllerError> {
        let result = self.try_complete_simple_task(user, task_id).await;
        self.reported(result, "Could not complete the task")
    }

    async fn try_complete_simple_task(&self, user: &UserId, task_id: TaskId) -> Result<ActionOutcome, ControllerError> {
        let today = self.clock.today();
        let mut work = self.working(user).await?;
        let mut content = todays_content(&work.progress, today)?;

        let task = open_task(&mut content, task_id)?;
        if task.is_journaling {
            return Err(ControllerError::validation("This task is completed with a journal entry."));
        }
        task.completed = true;
        work.progress.daily_content = Some(content);

        self.pay_task(&mut work, "Task Complete!");
        let mut patch = ProgressPatch::default();
        self.settle_daily_tasks(&mut work, today, &mut patch);
        let patch = patch.with_rewards_from(&work.progress);
        self.commit(user, patch, work).await
    }

    /// Complete the journaling task with the user's written answer
    pub async fn complete_journaling_task(
        &self,
        user: &UserId,
        task_id: TaskId,
        text: &str,
    ) -> Result<ActionOutcome, ControllerError> {
        let result = self.try_complete_journaling_task(user, task_id, text).await;
        self.reported(result, "Could not complete the task")
    }

    async fn try_complete_journaling_task(
        &self,
        user: &UserId,
        task_id: TaskId,
        text: &str,
    ) -> Result<ActionOutcome, ControllerError> {
        let text = text.trim();
        let min = self.config.limits.min_task_journal_chars;
        if text.chars().count() < min {
            return Err(ControllerError::validation(format!(
                "Write at least {min} characters to complete this task."
            )));
        }

        let today = self.clock.today();
        let mut work = self.working(user).await?;
        let mut content = todays_content(&work.progress, today)?;

        let task = open_task(&mut content, task_id)?;
        if !task.is_journaling {
            return Err(ControllerError::validation("This task doesn't need a journal entry."));
        }
        task.completed = true;
        let mut entry = JournalEntry::new(text, JournalSource::Task, self.clock.now());
        entry.task_text = Some(task.text.clone());
        entry.path = Some(task.category.path());

        work.progress.daily_content = Some(content);
        work.progress.journal.insert(0, entry);

        self.pay_task(&mut work, "Journal saved & task complete!");
        let mut patch = ProgressPatch {
            journal: Some(work.progress.journal.clone()),
            ..ProgressPatch::default()
        };
        self.settle_daily_tasks(&mut work, today, &mut patch);
        let patch = patch.with_rewards_from(&work.progress);
        self.commit(user, patch, work).await
    }

    /// Complete today's Big Quest on `node`
    pub async fn complete_node_task(&self, user: &UserId, node: &NodeId) -> Result<ActionOutcome, ControllerError> {
        let result = self.try_complete_node_task(user, node).await;
        self.reported(result, "Could not complete the Big Quest")
    }

    async fn try_complete_node_task(&self, user: &UserId, node_id: &NodeId) -> Result<ActionOutcome, ControllerError> {
        let today = self.clock.today();
        let mut work = self.working(user).await?;
        let content = todays_content(&work.progress, today)?;

        if !content.all_small_tasks_completed {
            return Err(ControllerError::validation(
                "Complete today's small tasks to reveal the Big Quest.",
            ));
        }
        if work.progress.last_quest_date == Some(today) {
            return Err(ControllerError::validation("Today's Big Quest is already complete."));
        }
        let node = MapNode::find(node_id.as_str())
            .filter(|n| n.path == work.progress.main_path)
            .ok_or_else(|| ControllerError::validation("That node isn't on your path."))?;
        if !work.progress.unlocked_nodes.contains(node_id) {
            return Err(ControllerError::validation("That node is still locked."));
        }
        if work.progress.completed_nodes.contains(node_id) {
            return Err(ControllerError::validation("That node is already complete."));
        }

        let first_node = work.progress.completed_nodes.is_empty();
        let previous = work.progress.streak;
        work.progress.streak = next_streak(previous, work.progress.last_quest_date, today);
        work.progress.last_quest_date = Some(today);
        work.progress.completed_nodes.push(node.node_id());
        work.progress
            .completed_node_tasks
            .insert(format!("{}-{}", node.id, today.format("%Y-%m-%d")), content.big_quest.text);
        debug!(%user, node = node.id, previous, streak = work.progress.streak, "big quest completed");

        let xp = self.config.rewards.big_quest;
        work.award(xp);
        work.notices.push(Notice::Reward {
            xp,
            reason: "Big Quest Complete!".into(),
        });
        if first_node {
            work.notices.push(Notice::FitnessHubUnlocked);
        }
        work.settle_badges(self.config.rewards.badge_bonus);

        let patch = ProgressPatch {
            streak: Some(work.progress.streak),
            last_quest_date: Some(today),
            completed_nodes: Some(work.progress.completed_nodes.clone()),
            completed_node_tasks: Some(work.progress.completed_node_tasks.clone()),
            ..ProgressPatch::default()
        }
        .with_rewards_from(&work.progress);
        self.commit(user, patch, work).await
    }

    /// Log one glass of water.
    ///
    /// No-op once today's goal is reached. `silent` suppresses the
    /// goal notice.
    pub async fn log_water_intake(&self, user: &UserId, silent: bool) -> Result<ActionOutcome, ControllerError> {
        let result = self.try_log_water_intake(user, silent).await;
        self.reported(result, "Could not log water")
    }

    async fn try_log_water_intake(&self, user: &UserId, silent: bool) -> Result<ActionOutcome, ControllerError> {
        let today = self.clock.today();
        let mut work = self.working(user).await?;
        match self.add_water(&mut work, today) {
            WaterLog::Full => return Ok(ActionOutcome::default()),
            WaterLog::Logged => {}
            WaterLog::GoalReached => {
                if !silent {
                    work.notices.push(Notice::HydrationGoalReached {
                        xp: self.config.rewards.hydration,
                    });
                }
            }
        }
        let patch = ProgressPatch {
            hydration: Some(work.progress.hydration),
            ..ProgressPatch::default()
        }
        .with_rewards_from(&work.progress);
        self.commit(user, patch, work).await
    }

    /// Complete one of today's fitness tasks.
    ///
    /// The task is saved at once; finishing the set pays the fitness reward
    /// in a second write.
    pub async fn complete_fitness_task(&self, user: &UserId, task_id: TaskId) -> Result<ActionOutcome, ControllerError> {
        let result = self.try_complete_fitness_task(user, task_id).await;
        self.reported(result, "Could not complete the fitness task")
    }

    async fn try_complete_fitness_task(&self, user: &UserId, task_id: TaskId) -> Result<ActionOutcome, ControllerError> {
        let today = self.clock.today();
        let mut work = self.working(user).await?;
        let mut fitness = work
            .progress
            .daily_fitness
            .clone()
            .filter(|f| f.is_for(today))
            .ok_or_else(|| ControllerError::validation("Today's fitness challenges aren't ready yet."))?;

        let task = fitness
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| ControllerError::validation("That exercise isn't part of today's challenge."))?;
        if task.completed {
            return Err(ControllerError::validation("That exercise is already done."));
        }
        task.completed = true;
        let all_done = fitness.all_completed();

        work.progress.daily_fitness = Some(fitness.clone());
        self.store
            .merge(
                user,
                ProgressPatch {
                    daily_fitness: Some(fitness),
                    ..ProgressPatch::default()
                },
            )
            .await?;
        if !all_done {
            return Ok(ActionOutcome::default());
        }

        let xp = self.config.rewards.fitness;
        work.award(xp);
        work.progress.fitness_completions += 1;
        work.notices.push(Notice::FitnessComplete { xp });
        work.settle_badges(self.config.rewards.badge_bonus);
        let patch = ProgressPatch {
            fitness_completions: Some(work.progress.fitness_completions),
            ..ProgressPatch::default()
        }
        .with_rewards_from(&work.progress);
        self.commit(user, patch, work).await
    }

    pub(crate) async fn current(&self, user: &UserId) -> Result<UserProgress, ControllerError> {
        self.store
            .load(user)
            .await?
            .ok_or_else(|| StoreError::NotFound(user.clone()).into())
    }

    pub(crate) async fn working(&self, user: &UserId) -> Result<Working, ControllerError> {
        self.current(user).await.map(Working::new)
    }

    /// Write the patch, then emit the action's notices
    pub(crate) async fn commit(
        &self,
        user: &UserId,
        patch: ProgressPatch,
        work: Working,
    ) -> Result<ActionOutcome, ControllerError> {
        self.store.merge(user, patch).await?;
        for notice in work.notices {
            self.notices.notify(notice);
        }
        if work.outcome.levels_gained > 0 {
            info!(%user, level = work.progress.level, "level up");
            self.notices.notify(Notice::LevelUp {
                level: work.progress.level,
            });
        }
        debug!(%user, xp = work.outcome.xp_awarded, badges = ?work.outcome.badges, "action committed");
        Ok(work.outcome)
    }

    /// Report a failed action as a notice and pass the result through
    pub(crate) fn reported<T>(&self, result: Result<T, ControllerError>, action: &str) -> Result<T, ControllerError> {
        if let Err(err) = &result {
            let message = if err.is_validation() {
                warn!(error = %err, "{action}");
                err.to_string()
            } else {
                tracing::error!(error = %err, "{action}");
                format!("{action}. Please try again.")
            };
            self.notices.notify(Notice::Error(message));
        }
        result
    }

    fn pay_task(&self, work: &mut Working, reason: &str) {
        let xp = self.config.rewards.task;
        work.award(xp);
        work.notices.push(Notice::Reward {
            xp,
            reason: reason.into(),
        });
    }

    /// Side effects of the last small task: history, next node, water
    fn settle_daily_tasks(&self, work: &mut Working, today: NaiveDate, patch: &mut ProgressPatch) {
        let mut texts = Vec::new();
        if let Some(content) = work.progress.daily_content.as_mut() {
            if content.all_tasks_completed() && !content.all_small_tasks_completed {
                content.all_small_tasks_completed = true;
                texts = content.tasks.iter().map(|t| t.text.clone()).collect();
            }
        }
        patch.daily_content.clone_from(&work.progress.daily_content);
        if texts.is_empty() {
            return;
        }

        let history = &mut work.progress.completed_tasks_history;
        history.extend(texts);
        let excess = history.len().saturating_sub(self.config.limits.task_history);
        history.drain(..excess);
        patch.completed_tasks_history = Some(history.clone());

        if let Some(node) = work.progress.main_path.next_unlock(&work.progress.unlocked_nodes) {
            info!(node = node.id, path = work.progress.main_path.id(), "node unlocked");
            work.progress.unlocked_nodes.push(node.node_id());
            patch.unlocked_nodes = Some(work.progress.unlocked_nodes.clone());
            work.outcome.unlocked = Some(node.node_id());
            work.notices.push(Notice::NodeUnlocked {
                node: node.node_id(),
                name: node.name,
            });
        }

        if !matches!(self.add_water(work, today), WaterLog::Full) {
            patch.hydration = Some(work.progress.hydration);
        }
    }

    fn add_water(&self, work: &mut Working, today: NaiveDate) -> WaterLog {
        let goal = self.config.limits.hydration_goal;
        let level = work.progress.hydration.level_on(today);
        if level >= goal {
            return WaterLog::Full;
        }
        work.progress.hydration = Hydration {
            level: level + 1,
            last_log_date: Some(today),
        };
        if level + 1 == goal {
            work.award(self.config.rewards.hydration);
            WaterLog::GoalReached
        } else {
            WaterLog::Logged
        }
    }
}

fn todays_content(progress: &UserProgress, today: NaiveDate) -> Result<DailyContent, ControllerError> {
    progress
        .daily_content
        .clone()
        .filter(|c| c.is_for(today))
        .ok_or_else(|| ControllerError::validation("Today's quests aren't ready yet."))
}

fn open_task(content: &mut DailyContent, id: TaskId) -> Result<&mut Task, ControllerError> {
    let task = content
        .tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| ControllerError::validation("That task isn't part of today's quests."))?;
    if task.completed {
        return Err(ControllerError::validation("That task is already complete."));
    }
    Ok(task)
}

//! Testing utilities for the MindQuest workspace
//!
//! Shared clocks, scripted generation, a store with switchable failures,
//! profile fixtures and a wired-up [`Harness`].

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use mq_content::{ContentGenerator, GenerationClient, GenerationError};
use mq_core::{
    DailyRefresh, InMemoryStore, MindQuestConfig, NoticeBuffer, ProgressPatch, ProgressStore,
    ProgressionController, Services, SnapshotListener, StoreError, Subscription,
};
use mq_progress::{
    BigQuest, Category, Clock, DailyContent, DailyFitness, FitnessTask, Hydration, Path, Task, TaskId,
    UserId, UserProgress, AVATARS,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Clock that only moves when told to; days are UTC days
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        Self {
            now: Mutex::new(Utc.from_utc_datetime(&noon)),
        }
    }

    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.lock();
        *now = now.checked_add_days(Days::new(days)).unwrap();
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn today(&self) -> NaiveDate {
        self.now.lock().date_naive()
    }
}

/// Generation client answering from a queue; an empty queue answers 500
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.replies.lock().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, err: GenerationError) {
        self.replies.lock().push_back(Err(err));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        self.replies.lock().pop_front().unwrap_or(Err(GenerationError::Status {
            status: 500,
            body: "no scripted reply".into(),
        }))
    }
}

/// In-memory store whose calls can be made to fail
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: InMemoryStore,
    failing: AtomicBool,
}

impl FailingStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Backend("injected failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProgressStore for FailingStore {
    async fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError> {
        self.inner.load(user).await
    }

    async fn create(&self, user: &UserId, progress: UserProgress) -> Result<(), StoreError> {
        self.check()?;
        self.inner.create(user, progress).await
    }

    async fn merge(&self, user: &UserId, patch: ProgressPatch) -> Result<(), StoreError> {
        self.check()?;
        self.inner.merge(user, patch).await
    }

    fn subscribe(&self, user: &UserId, listener: SnapshotListener) -> Subscription {
        self.inner.subscribe(user, listener)
    }
}

/// A valid daily-task reply; the Focus task is the journaling one
pub fn daily_reply(path: Path) -> String {
    json!({
        "daily_tasks": [
            {"category": "Resilience", "task": "List three things you handled well this week.", "isJournaling": false},
            {"category": "Focus", "task": "Describe what a calm workspace looks like to you.", "isJournaling": true},
            {"category": "Positivity", "task": "Leave a kind note for someone.", "isJournaling": false}
        ],
        "big_quest": {"path": path.id(), "task": "Take a 10-minute walk and notice five new details."}
    })
    .to_string()
}

/// A valid fitness reply
pub fn fitness_reply() -> String {
    json!({"fitness_tasks": [
        {"level": 1, "task": "Roll your shoulders for a minute."},
        {"level": 2, "task": "Do 20 jumping jacks."},
        {"level": 3, "task": "Do 10 squats."},
        {"level": 4, "task": "Hold a plank for 30 seconds."},
        {"level": 5, "task": "Breathe slowly for two minutes."}
    ]})
    .to_string()
}

/// Freshly onboarded profile
pub fn profile(path: Path) -> UserProgress {
    UserProgress::new("Tester", AVATARS[0].url, path)
}

/// Today's content with the Positivity task as the journaling one
pub fn daily_content(path: Path, today: NaiveDate) -> DailyContent {
    DailyContent {
        date: today,
        tasks: vec![
            Task::new(Category::Resilience, "Name one thing you can control.", false),
            Task::new(Category::Focus, "Single-task for ten minutes.", false),
            Task::new(Category::Positivity, "Write about a small kindness.", true),
        ],
        big_quest: BigQuest {
            path,
            text: "Plan one small adventure.".into(),
        },
        all_small_tasks_completed: false,
    }
}

/// Today's fitness set, nothing completed
pub fn daily_fitness(today: NaiveDate) -> DailyFitness {
    DailyFitness {
        date: today,
        tasks: (1..=5)
            .map(|level| FitnessTask {
                id: TaskId::new(),
                text: format!("Exercise {level}"),
                completed: false,
                level,
            })
            .collect(),
    }
}

/// Profile with today's tasks, fitness and hydration in place
pub fn profile_for_today(path: Path, today: NaiveDate) -> UserProgress {
    let mut p = profile(path);
    p.daily_content = Some(daily_content(path, today));
    p.daily_fitness = Some(daily_fitness(today));
    p.hydration = Hydration {
        level: 0,
        last_log_date: Some(today),
    };
    p
}

/// Everything a controller test needs, wired together
pub struct Harness {
    pub user: UserId,
    pub store: Arc<FailingStore>,
    pub generator: Arc<ScriptedGenerator>,
    pub notices: Arc<NoticeBuffer>,
    pub clock: Arc<ManualClock>,
    pub services: Services,
    pub controller: ProgressionController,
}

impl Harness {
    /// No profile yet
    pub fn new(today: NaiveDate) -> Self {
        Self::build(InMemoryStore::new(), today, MindQuestConfig::default())
    }

    /// Existing profile
    pub fn with_profile(progress: UserProgress, today: NaiveDate) -> Self {
        Self::build(
            InMemoryStore::with_document(Self::default_user(), progress),
            today,
            MindQuestConfig::default(),
        )
    }

    pub fn with_config(progress: UserProgress, today: NaiveDate, config: MindQuestConfig) -> Self {
        Self::build(InMemoryStore::with_document(Self::default_user(), progress), today, config)
    }

    fn default_user() -> UserId {
        UserId::new("tester")
    }

    fn build(store: InMemoryStore, today: NaiveDate, config: MindQuestConfig) -> Self {
        let store = Arc::new(FailingStore::new(store));
        let generator = Arc::new(ScriptedGenerator::new());
        let notices = Arc::new(NoticeBuffer::new());
        let clock = Arc::new(ManualClock::at(today));
        let content = Arc::new(ContentGenerator::with_seed(generator.clone(), 7));
        let services = Services::new(store.clone(), content)
            .with_notices(notices.clone())
            .with_clock(clock.clone())
            .with_config(config);
        let controller = ProgressionController::new(&services);
        Self {
            user: Self::default_user(),
            store,
            generator,
            notices,
            clock,
            services,
            controller,
        }
    }

    /// Stored document
    pub fn progress(&self) -> UserProgress {
        self.store.inner().get(&self.user).unwrap()
    }

    pub fn refresh(&self) -> DailyRefresh {
        DailyRefresh::new(&self.services)
    }

    pub fn task_id(&self, category: Category) -> TaskId {
        self.progress()
            .daily_content
            .unwrap()
            .tasks
            .iter()
            .find(|t| t.category == category)
            .unwrap()
            .id
    }

    pub fn journaling_task(&self) -> Task {
        self.progress()
            .daily_content
            .unwrap()
            .tasks
            .into_iter()
            .find(|t| t.is_journaling)
            .unwrap()
    }

    /// Complete every small task of today
    pub async fn finish_small_tasks(&self) {
        let content = self.progress().daily_content.unwrap();
        for task in content.tasks {
            if task.completed {
                continue;
            }
            if task.is_journaling {
                self.controller
                    .complete_journaling_task(&self.user, task.id, "Today I noticed a small kindness.")
                    .await
                    .unwrap();
            } else {
                self.controller.complete_simple_task(&self.user, task.id).await.unwrap();
            }
        }
    }
}

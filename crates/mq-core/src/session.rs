//! Session wiring
//!
//! [`Services`] is built once per process and shared by reference; a
//! [`Session`] signs a user in, keeps the latest snapshot of their document,
//! and owns the controller and daily refresh for that user. Dropping the
//! session ends the subscription.

use crate::auth::{sign_in, AuthProvider};
use crate::config::MindQuestConfig;
use crate::controller::ProgressionController;
use crate::error::ControllerError;
use crate::notice::{NoticeSink, TracingNotices};
use crate::refresh::{DailyRefresh, RefreshReport};
use crate::store::{ProgressStore, Subscription};
use mq_content::{ContentGenerator, GenerationError, ProxyClient};
use mq_progress::{Clock, SystemClock, UserId, UserProgress};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Shared collaborators
#[derive(Clone)]
pub struct Services {
    pub(crate) store: Arc<dyn ProgressStore>,
    pub(crate) generator: Arc<ContentGenerator>,
    pub(crate) notices: Arc<dyn NoticeSink>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: Arc<MindQuestConfig>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Services {
    /// Services with log-only notices, the wall clock and default config
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>, generator: Arc<ContentGenerator>) -> Self {
        Self {
            store,
            generator,
            notices: Arc::new(TracingNotices),
            clock: Arc::new(SystemClock),
            config: Arc::new(MindQuestConfig::default()),
        }
    }

    /// Services talking to the configured generation endpoint
    pub fn from_config(store: Arc<dyn ProgressStore>, config: MindQuestConfig) -> Result<Self, GenerationError> {
        let client = ProxyClient::new(config.generation_endpoint.clone())?;
        let generator = Arc::new(ContentGenerator::new(Arc::new(client)));
        Ok(Self::new(store, generator).with_config(config))
    }

    /// With notice sink
    #[must_use]
    pub fn with_notices(mut self, notices: Arc<dyn NoticeSink>) -> Self {
        self.notices = notices;
        self
    }

    /// With clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// With configuration
    #[must_use]
    pub fn with_config(mut self, config: MindQuestConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// The store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ProgressStore> {
        &self.store
    }

    /// The configuration
    #[must_use]
    pub fn config(&self) -> &MindQuestConfig {
        &self.config
    }
}

/// One signed-in user
pub struct Session {
    user: UserId,
    controller: ProgressionController,
    refresh: DailyRefresh,
    snapshot: Arc<RwLock<Option<UserProgress>>>,
    _subscription: Subscription,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("has_profile", &self.snapshot.read().is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Sign in and subscribe to the user's document
    pub async fn start(
        auth: &dyn AuthProvider,
        token: Option<&str>,
        services: &Services,
    ) -> Result<Self, ControllerError> {
        let user = sign_in(auth, token).await?;

        let snapshot = Arc::new(RwLock::new(None));
        let cache = Arc::clone(&snapshot);
        let subscription = services.store.subscribe(
            &user,
            Box::new(move |progress| {
                *cache.write() = progress;
            }),
        );
        info!(%user, "session started");

        Ok(Self {
            controller: ProgressionController::new(services),
            refresh: DailyRefresh::new(services),
            user,
            snapshot,
            _subscription: subscription,
        })
    }

    /// Signed-in user
    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Action surface
    #[must_use]
    pub fn controller(&self) -> &ProgressionController {
        &self.controller
    }

    /// Daily rollover
    #[must_use]
    pub fn refresh(&self) -> &DailyRefresh {
        &self.refresh
    }

    /// Latest delivered snapshot
    #[must_use]
    pub fn snapshot(&self) -> Option<UserProgress> {
        self.snapshot.read().clone()
    }

    /// Whether the user still has to create a profile
    #[must_use]
    pub fn needs_onboarding(&self) -> bool {
        self.snapshot.read().is_none()
    }

    /// Refresh daily content once a profile exists
    pub async fn open_day(&self) -> Result<Option<RefreshReport>, ControllerError> {
        if self.needs_onboarding() {
            return Ok(None);
        }
        self.refresh.run(&self.user).await.map(Some)
    }
}

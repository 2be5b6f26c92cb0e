//! MindQuest Core
//!
//! The stateful half of the game, built on [`mq_progress`] and
//! [`mq_content`]:
//!
//! - [`ProgressionController`]: one operation per user action
//! - [`DailyRefresh`]: date rollover for tasks, fitness and hydration
//! - [`ProgressStore`]: the document store seam, with [`InMemoryStore`]
//! - [`NoticeSink`]: user-visible feedback
//! - [`Session`]: sign-in, snapshot subscription and service wiring
//! - [`MindQuestConfig`]: reward amounts, caps and endpoints
//!
//! # Example
//!
//! ```rust,no_run
//! use mq_core::{InMemoryStore, LocalAuth, MindQuestConfig, Services, Session};
//! use mq_progress::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let services = Services::from_config(Arc::new(InMemoryStore::new()), MindQuestConfig::default())?;
//! let session = Session::start(&LocalAuth::new(), None, &services).await?;
//! session.controller().begin_journey(session.user(), "Ada", 1, Path::Focus).await?;
//! session.open_day().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod journal;
pub mod notice;
pub mod onboarding;
pub mod refresh;
pub mod reminder;
pub mod session;
pub mod store;

pub use auth::{sign_in, AuthProvider, LocalAuth};
pub use config::{Limits, MindQuestConfig, Rewards, SupportConfig};
pub use controller::{ActionOutcome, ProgressionController};
pub use error::{AuthError, ConfigError, ControllerError, StoreError};
pub use journal::JournalContext;
pub use notice::{Notice, NoticeBuffer, NoticeLevel, NoticeSink, TracingNotices};
pub use refresh::{DailyRefresh, RefreshReport};
pub use reminder::HydrationReminder;
pub use session::{Services, Session};
pub use store::{InMemoryStore, ProgressPatch, ProgressStore, SnapshotListener, Subscription};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

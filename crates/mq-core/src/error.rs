//! Error types for the progression layer
//!
//! - Persistence failures ([`StoreError`])
//! - User-action failures ([`ControllerError`]), split into validation
//!   failures that never reach the store and everything else
//! - Sign-in failures ([`AuthError`])
//! - Configuration loading ([`ConfigError`])

use mq_content::{GenerationError, LifecycleError};
use mq_progress::{ModelError, UserId};

/// Persistence failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No document for the user
    #[error("no progress document for {0}")]
    NotFound(UserId),

    /// Document already exists
    #[error("progress document for {0} already exists")]
    AlreadyExists(UserId),

    /// Backend rejected or dropped the write
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether a later attempt could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

/// Failures of a user action
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Input rejected before any write
    #[error("{0}")]
    Validation(String),

    /// Input outside a fixed catalog
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Persistence failed
    #[error("could not save progress: {0}")]
    Store(#[from] StoreError),

    /// Generation failed where no fallback exists
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Content state machine refused a transition
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Sign-in failed
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ControllerError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the action was rejected before touching the store
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Model(_))
    }
}

/// Sign-in failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Credentials refused
    #[error("sign-in rejected: {0}")]
    Rejected(String),

    /// Provider could not be reached
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for the config shape
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

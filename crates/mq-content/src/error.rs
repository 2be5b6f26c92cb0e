//! Error types for content generation
//!
//! Every variant here is recoverable: the generator substitutes fallback
//! content, and only journal insights surface the failure to the user.

/// Failures talking to the generation endpoint
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Network or client failure
    #[error("generation request failed: {0}")]
    Transport(String),

    /// Endpoint answered with a non-2xx status
    #[error("generation endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Response body was not the expected envelope
    #[error("unreadable generation response: {0}")]
    Decode(String),

    /// Envelope carried no text
    #[error("no text generated")]
    MissingText,
}

impl GenerationError {
    /// Whether a later attempt could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::MissingText => false,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Failures turning generated text into content
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// Endpoint failure
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Text was not JSON
    #[error("generated text is not JSON: {0}")]
    NotJson(String),

    /// JSON did not match the required shape
    #[error("generated JSON is missing required fields: {0}")]
    Schema(String),
}

/// Illegal content state transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// Transition not in the table
    #[error("illegal content transition for {kind:?}: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Content type
        kind: crate::lifecycle::ContentKind,
        /// Current state
        from: crate::lifecycle::ContentState,
        /// Requested state
        to: crate::lifecycle::ContentState,
    },
}

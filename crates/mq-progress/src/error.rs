//! Error types for the progress model

/// Errors raised while constructing model values from untrusted input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Mood value outside 1..=5
    #[error("invalid mood value: {0} (expected 1-5)")]
    InvalidMood(u8),

    /// Unknown path identifier
    #[error("unknown path: {0}")]
    UnknownPath(String),

    /// Unknown task category
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Unknown avatar identifier
    #[error("unknown avatar: {0}")]
    UnknownAvatar(u8),
}

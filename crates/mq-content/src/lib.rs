//! MindQuest Daily Content
//!
//! Produces each day's small tasks, Big Quest and fitness set:
//!
//! - [`GenerationClient`]: seam over the generation endpoint, with
//!   [`ProxyClient`] as the HTTP implementation
//! - [`prompt`]: prompt builders
//! - [`parse`]: fence stripping and schema validation of generated JSON
//! - [`fallback`]: deterministic fallback pools used on any failure
//! - [`ContentGenerator`]: generate-or-fall-back for each content type
//! - [`ContentLifecycle`]: the stale / generating / fresh state machine
//!
//! Persistence is not handled here; callers write the returned content.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod lifecycle;
pub mod parse;
pub mod prompt;

pub use client::{GenerateRequest, GenerationClient, ProxyClient};
pub use error::{ContentError, GenerationError, LifecycleError};
pub use generator::{ContentGenerator, ContentSource, Generated};
pub use lifecycle::{ContentKind, ContentLifecycle, ContentState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

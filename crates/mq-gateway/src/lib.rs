//! MindQuest Gateway
//!
//! A small HTTP service that keeps the generative-language API key on the
//! server. Clients post `{contents: [{parts: [{text}]}]}` to
//! `/api/generateContent`; the body is forwarded verbatim and the upstream
//! JSON is returned unchanged.
//!
//! - [`GatewayConfig`]: flags and environment
//! - [`routes`]: the warp filter tree
//! - [`ProxyError`]: failures and their status codes

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

pub use config::GatewayConfig;
pub use error::ProxyError;
pub use routes::{routes, Proxy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

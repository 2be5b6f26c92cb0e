//! Tracing subscriber setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `RUST_LOG`, falling back to `level` for this crate and warp
#[must_use]
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mq_gateway={level},warp={level},info")))
}

/// Install the global subscriber; plain text or JSON lines
pub fn init(level: &str, json: bool) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(level));
    if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    }
}

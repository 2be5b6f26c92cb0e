//! Gateway configuration
//!
//! Every option can be given as a flag or through the environment.

use clap::Parser;
use std::net::SocketAddr;

/// Default listen address
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8787";

/// Default upstream origin
pub const DEFAULT_UPSTREAM: &str = "https://generativelanguage.googleapis.com";

/// Default upstream model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// MindQuest generation proxy
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mq-gateway", version)]
#[command(about = "Forwards MindQuest prompts to the generative-language API")]
pub struct GatewayConfig {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// Upstream API key; requests fail with 500 while it is unset
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream origin, without a trailing path
    #[arg(long, env = "UPSTREAM_BASE", default_value = DEFAULT_UPSTREAM)]
    pub upstream_base: String,

    /// Model name used in the upstream path
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 60)]
    pub upstream_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8787)),
            api_key: None,
            upstream_base: DEFAULT_UPSTREAM.to_string(),
            model: DEFAULT_MODEL.to_string(),
            upstream_timeout_secs: 60,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl GatewayConfig {
    /// With API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// With upstream origin
    #[must_use]
    pub fn with_upstream_base(mut self, base: impl Into<String>) -> Self {
        self.upstream_base = base.into();
        self
    }

    /// API key, treating an empty value as unset
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Upstream generate URL without the key
    #[must_use]
    pub fn upstream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.upstream_base.trim_end_matches('/'),
            self.model
        )
    }
}

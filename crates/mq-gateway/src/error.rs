//! Proxy failures and their HTTP rendering

use serde_json::json;
use thiserror::Error;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

/// Why a forwarded request failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Method other than POST
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Request body is not JSON
    #[error("Request body must be JSON: {0}")]
    InvalidBody(String),

    /// No upstream credential configured
    #[error("API key is not configured on the server.")]
    MissingApiKey,

    /// Upstream answered with a non-success status
    #[error("Error from Google API")]
    Upstream {
        /// Upstream status code
        status: u16,
        /// Upstream response text
        details: String,
    },

    /// Upstream could not be reached or its reply could not be read
    #[error("{0}")]
    Transport(String),
}

impl ProxyError {
    /// Status code sent to the caller
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    /// Whether a caller may retry the same request
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl Reply for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Upstream { details, .. } => json!({ "message": self.to_string(), "details": details }),
            _ => json!({ "message": self.to_string() }),
        };
        warp::reply::with_status(warp::reply::json(&body), status).into_response()
    }
}

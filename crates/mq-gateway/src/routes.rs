//! HTTP routes
//!
//! - `POST /api/generateContent`: forward the JSON body upstream and relay the reply
//! - any other method on that path: 405
//! - `GET /healthz`: liveness

use crate::config::GatewayConfig;
use crate::error::ProxyError;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use warp::hyper::body::Bytes;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Upstream client plus the settings it needs
#[derive(Debug, Clone)]
pub struct Proxy {
    client: reqwest::Client,
    upstream_url: String,
    api_key: Option<String>,
}

impl Proxy {
    /// Build from configuration
    pub fn new(config: &GatewayConfig) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            upstream_url: config.upstream_url(),
            api_key: config.key().map(str::to_string),
        })
    }

    /// Whether an upstream key is configured
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validate and forward one request body
    pub async fn forward(&self, body: &[u8]) -> Result<Value, ProxyError> {
        let payload: Value =
            serde_json::from_slice(body).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;
        let key = self.api_key.as_deref().ok_or(ProxyError::MissingApiKey)?;

        let response = self
            .client
            .post(&self.upstream_url)
            .query(&[("key", key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = match response.text().await {
                Ok(text) => text,
                Err(err) => {
                    warn!(status = status.as_u16(), error = %err, "upstream error body unreadable");
                    String::new()
                }
            };
            warn!(status = status.as_u16(), "upstream rejected request");
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                details,
            });
        }
        let data = response.json::<Value>().await?;
        debug!("upstream reply relayed");
        Ok(data)
    }
}

/// All gateway routes
pub fn routes(proxy: Arc<Proxy>) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let generate = warp::path!("api" / "generateContent");

    let forward = generate
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_proxy(proxy))
        .and_then(handle_generate);

    let wrong_method = generate.map(|| ProxyError::MethodNotAllowed.into_response());

    let health = warp::path!("healthz")
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "status": "ok" })).into_response());

    forward
        .or(wrong_method)
        .unify()
        .or(health)
        .unify()
        .recover(handle_rejection)
        .unify()
        .with(warp::trace::request())
}

fn with_proxy(proxy: Arc<Proxy>) -> impl Filter<Extract = (Arc<Proxy>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&proxy))
}

async fn handle_generate(body: Bytes, proxy: Arc<Proxy>) -> Result<Response, Rejection> {
    let reply = match proxy.forward(&body).await {
        Ok(data) => warp::reply::json(&data).into_response(),
        Err(err) => {
            warn!(error = %err, status = err.status().as_u16(), "generate request failed");
            err.into_response()
        }
    };
    Ok(reply)
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        warn!(?rejection, "unhandled rejection");
        (StatusCode::BAD_REQUEST, "Bad request")
    };
    let body = warp::reply::json(&json!({ "message": message }));
    Ok(warp::reply::with_status(body, status).into_response())
}

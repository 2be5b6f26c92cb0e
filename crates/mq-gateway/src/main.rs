use anyhow::Context;
use clap::Parser;
use mq_gateway::{routes, telemetry, GatewayConfig, Proxy};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::parse();
    telemetry::init(&config.log_level, config.log_json).context("installing tracing subscriber")?;

    let proxy = Proxy::new(&config).context("building upstream client")?;
    if !proxy.has_key() {
        warn!("GEMINI_API_KEY is not set; generate requests will fail");
    }
    info!(
        version = mq_gateway::VERSION,
        upstream = %config.upstream_base,
        model = %config.model,
        "starting gateway"
    );

    let (addr, server) = warp::serve(routes(Arc::new(proxy)))
        .try_bind_with_graceful_shutdown(config.listen, async {
            if tokio::signal::ctrl_c().await.is_err() {
                warn!("could not listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .with_context(|| format!("binding {}", config.listen))?;

    info!(%addr, "listening");
    server.await;
    info!("gateway stopped");
    Ok(())
}

#![forbid(unsafe_code)]
//! HTTP API server for SuiRandom

use suirandom::api::{run_api_server, ApiState};
use suirandom::config::load_config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("suirandom=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config()?;
    let port = config.api.port;
    tracing::info!(
        chain = %config.network.chain,
        rpc_url = %config.network.rpc_url,
        resolver_url = %config.network.resolver_url,
        "starting suirandom server"
    );

    let state = ApiState::from_config(config)?;
    run_api_server(state, port).await
}

mod api;
mod chain;
mod config;
mod db;
mod error;
mod types;
mod validate;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::chain::solana::SolanaRpc;
use crate::config::Config;
use crate::db::Store;
use crate::error::Result;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let pool = db::connect(&cfg.db_path).await?;
    info!("Database ready at {}", cfg.db_path);

    let store = Store::new(pool);
    store.seed_if_empty().await?;

    let chain = SolanaRpc::new(cfg.rpc_url.clone());
    info!("Chain RPC endpoint: {}", cfg.rpc_url);

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    let state = ApiState {
        store,
        chain,
        cfg: Arc::new(cfg),
    };
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

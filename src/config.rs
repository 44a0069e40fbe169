use crate::error::{AppError, Result};

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Lamports per SOL — the chain's minor-unit conversion factor.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Smallest accepted wager, in SOL.
pub const MIN_BET_SOL: f64 = 0.01;

/// Immutable process configuration, built once at startup and passed down.
/// Handlers never read the environment directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub log_level: String,
    /// Solana JSON-RPC endpoint (RPC_URL)
    pub rpc_url: String,
    /// Destination account for all bet transfers (TREASURY_ADDRESS, required)
    pub treasury_address: String,
    /// Bearer token guarding POST /admin/seed (ADMIN_TOKEN, required)
    pub admin_token: String,
    /// Allowed CORS origins (CORS_ALLOWLIST, comma-separated). Empty = allow any.
    pub cors_allowlist: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?,
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "solbet.db".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            rpc_url: std::env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            treasury_address: std::env::var("TREASURY_ADDRESS")
                .map_err(|_| AppError::Config("TREASURY_ADDRESS is required".to_string()))?,
            admin_token: std::env::var("ADMIN_TOKEN")
                .map_err(|_| AppError::Config("ADMIN_TOKEN is required".to_string()))?,
            cors_allowlist: std::env::var("CORS_ALLOWLIST")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}

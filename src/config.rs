use std::net::SocketAddr;

use anyhow::Context;

/// Runtime settings, resolved once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// When set, records and predictions persist as JSON files under this
    /// directory; otherwise everything lives in memory.
    pub data_dir: Option<String>,
    /// Maximum number of recent observations fed to the estimator.
    pub history_limit: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("invalid BIND_ADDR")?;
        let data_dir = std::env::var("DATA_DIR").ok();
        let history_limit = std::env::var("HISTORY_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        Ok(Self {
            bind_addr,
            data_dir,
            history_limit,
        })
    }
}

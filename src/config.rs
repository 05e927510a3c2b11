use clap::Parser;
use serde::{Deserialize, Serialize};

/// Base configuration for the orchestrator.
/// Parsed from CLI arguments; serde derives kept for file-based config.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "rootgate")]
pub struct BaseConfig {
    /// Skip remote registration and on-chain submission; compute the
    /// proposal locally and return it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Poll interval in milliseconds between deployment-state queries.
    #[arg(long, default_value_t = 500)]
    pub poll_interval_ms: u64,

    /// Gas headroom divisor: a leaf's gas limit is capped at
    /// block_gas_limit / gas_divisor.
    #[arg(long, default_value_t = 2)]
    pub gas_divisor: u64,
}

impl Default for BaseConfig {
    fn default() -> Self {
        BaseConfig {
            dry_run: false,
            poll_interval_ms: 500,
            gas_divisor: 2,
        }
    }
}

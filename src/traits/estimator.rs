use anyhow::Result;
use async_trait::async_trait;

use crate::types::Leaf;

/// External gas estimator, invoked once per chain over its EXECUTE leaves.
#[async_trait]
pub trait GasEstimator: Send + Sync {
    /// Estimator name for logging.
    fn name(&self) -> &'static str;

    /// Per-leaf gas estimates, same order as `leaves`.
    async fn estimate(&self, chain_id: u64, leaves: &[Leaf]) -> Result<Vec<u64>>;
}

use anyhow::Result;
use async_trait::async_trait;

use crate::traits::GasEstimator;
use crate::types::Leaf;

/// Flat estimate per leaf; the default when no external estimator is wired.
pub struct FixedEstimator {
    pub gas_per_leaf: u64,
}

impl FixedEstimator {
    pub fn new(gas_per_leaf: u64) -> Self {
        Self { gas_per_leaf }
    }
}

impl Default for FixedEstimator {
    fn default() -> Self {
        Self::new(500_000)
    }
}

#[async_trait]
impl GasEstimator for FixedEstimator {
    fn name(&self) -> &'static str {
        "fixed-estimator"
    }

    async fn estimate(&self, _chain_id: u64, leaves: &[Leaf]) -> Result<Vec<u64>> {
        Ok(vec![self.gas_per_leaf; leaves.len()])
    }
}

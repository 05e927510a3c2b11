use anyhow::Result;
use async_trait::async_trait;

use super::{FixedEstimator, MockEstimator};
use crate::traits::GasEstimator;
use crate::types::Leaf;

/// Enum representing all possible gas estimator implementations.
pub enum EstimatorVariant {
    Fixed(FixedEstimator),
    Mock(MockEstimator),
}

#[async_trait]
impl GasEstimator for EstimatorVariant {
    fn name(&self) -> &'static str {
        match self {
            EstimatorVariant::Fixed(inner) => inner.name(),
            EstimatorVariant::Mock(inner) => inner.name(),
        }
    }

    async fn estimate(&self, chain_id: u64, leaves: &[Leaf]) -> Result<Vec<u64>> {
        match self {
            EstimatorVariant::Fixed(inner) => inner.estimate(chain_id, leaves).await,
            EstimatorVariant::Mock(inner) => inner.estimate(chain_id, leaves).await,
        }
    }
}

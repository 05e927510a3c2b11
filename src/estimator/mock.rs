use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::traits::GasEstimator;
use crate::types::Leaf;

/// Mock estimator for testing: fixed estimates plus a call counter, with an
/// optional failure switch to exercise collaborator-error propagation.
#[derive(Clone)]
pub struct MockEstimator {
    pub gas_per_leaf: u64,
    pub fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockEstimator {
    pub fn new(gas_per_leaf: u64) -> Self {
        Self {
            gas_per_leaf,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            gas_per_leaf: 0,
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GasEstimator for MockEstimator {
    fn name(&self) -> &'static str {
        "mock-estimator"
    }

    async fn estimate(&self, chain_id: u64, leaves: &[Leaf]) -> Result<Vec<u64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("estimator unavailable for chain {}", chain_id);
        }
        Ok(vec![self.gas_per_leaf; leaves.len()])
    }
}

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use rs_merkle::algorithms::Sha256;
use rs_merkle::Hasher;
use tracing::info;

use crate::traits::ProposalRegistry;
use crate::types::ProposalRequest;

/// Mock remote registry for testing: records stored configs and relayed
/// proposals in memory.
#[derive(Clone, Default)]
pub struct MockRegistry {
    configs: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    relayed: Arc<Mutex<Vec<ProposalRequest>>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored_configs(&self) -> Vec<(String, Vec<u8>)> {
        self.configs.lock().unwrap().clone()
    }

    pub fn relayed(&self) -> Vec<ProposalRequest> {
        self.relayed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProposalRegistry for MockRegistry {
    fn name(&self) -> &'static str {
        "mock-registry"
    }

    async fn store_config(&self, org_id: &str, data: &[u8]) -> Result<String> {
        let uri = format!("mock://{}/{}", org_id, hex::encode(Sha256::hash(data)));
        self.configs
            .lock()
            .unwrap()
            .push((org_id.to_string(), data.to_vec()));
        Ok(uri)
    }

    async fn relay(&self, request: &ProposalRequest) -> Result<String> {
        let id = format!("proposal-{}", self.relayed.lock().unwrap().len() + 1);
        info!(
            proposal_id = %id,
            root = %hex::encode(request.root),
            chains = request.chain_status.len(),
            "Relayed proposal"
        );
        self.relayed.lock().unwrap().push(request.clone());
        Ok(id)
    }
}

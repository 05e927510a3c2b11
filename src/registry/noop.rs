use anyhow::Result;
use async_trait::async_trait;
use rs_merkle::algorithms::Sha256;
use rs_merkle::Hasher;

use crate::traits::ProposalRegistry;
use crate::types::ProposalRequest;

/// Dry-run registry: nothing leaves the process. Config URIs are derived
/// locally from content so deployment ids stay stable across runs.
pub struct NoopRegistry;

#[async_trait]
impl ProposalRegistry for NoopRegistry {
    fn name(&self) -> &'static str {
        "noop-registry"
    }

    async fn store_config(&self, _org_id: &str, data: &[u8]) -> Result<String> {
        Ok(format!("local://{}", hex::encode(Sha256::hash(data))))
    }

    async fn relay(&self, request: &ProposalRequest) -> Result<String> {
        Ok(format!("dry-run-{}", hex::encode(&request.root[..8])))
    }
}

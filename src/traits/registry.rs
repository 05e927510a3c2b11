use anyhow::Result;
use async_trait::async_trait;

use crate::types::ProposalRequest;

/// Optional remote registry for proposals (e.g. a hosted relay service).
/// Skippable entirely in dry-run mode.
#[async_trait]
pub trait ProposalRegistry: Send + Sync {
    /// Registry name for logging.
    fn name(&self) -> &'static str;

    /// Persist the canonical serialized configuration; returns its content
    /// URI.
    async fn store_config(&self, org_id: &str, data: &[u8]) -> Result<String>;

    /// Register the proposal; returns the assigned proposal id.
    async fn relay(&self, request: &ProposalRequest) -> Result<String>;
}

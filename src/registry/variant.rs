use anyhow::Result;
use async_trait::async_trait;

use super::{MockRegistry, NoopRegistry};
use crate::traits::ProposalRegistry;
use crate::types::ProposalRequest;

/// Enum representing all possible proposal registry implementations.
pub enum RegistryVariant {
    Noop(NoopRegistry),
    Mock(MockRegistry),
}

#[async_trait]
impl ProposalRegistry for RegistryVariant {
    fn name(&self) -> &'static str {
        match self {
            RegistryVariant::Noop(inner) => inner.name(),
            RegistryVariant::Mock(inner) => inner.name(),
        }
    }

    async fn store_config(&self, org_id: &str, data: &[u8]) -> Result<String> {
        match self {
            RegistryVariant::Noop(inner) => inner.store_config(org_id, data).await,
            RegistryVariant::Mock(inner) => inner.store_config(org_id, data).await,
        }
    }

    async fn relay(&self, request: &ProposalRequest) -> Result<String> {
        match self {
            RegistryVariant::Noop(inner) => inner.relay(request).await,
            RegistryVariant::Mock(inner) => inner.relay(request).await,
        }
    }
}

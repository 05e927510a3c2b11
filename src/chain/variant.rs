use anyhow::Result;
use async_trait::async_trait;

use super::MockChain;
use crate::traits::chain::{ChainConnector, DeploymentState};
use crate::types::{AuthState, Leaf, Proof, Root32, SignatureSet};

/// Enum representing all possible chain connector implementations.
#[derive(Clone)]
pub enum ChainVariant {
    Mock(MockChain),
}

#[async_trait]
impl ChainConnector for ChainVariant {
    fn name(&self) -> &'static str {
        match self {
            ChainVariant::Mock(inner) => inner.name(),
        }
    }

    fn chain_id(&self) -> u64 {
        match self {
            ChainVariant::Mock(inner) => inner.chain_id(),
        }
    }

    async fn block_gas_limit(&self) -> Result<u64> {
        match self {
            ChainVariant::Mock(inner) => inner.block_gas_limit().await,
        }
    }

    async fn auth_state(&self, root: &Root32) -> Result<AuthState> {
        match self {
            ChainVariant::Mock(inner) => inner.auth_state(root).await,
        }
    }

    async fn submit_leaf(
        &self,
        root: &Root32,
        leaf: &Leaf,
        proof: &Proof,
        signatures: &SignatureSet,
    ) -> Result<AuthState> {
        match self {
            ChainVariant::Mock(inner) => inner.submit_leaf(root, leaf, proof, signatures).await,
        }
    }

    async fn claim_deployment(&self, id: &Root32, config_uri: &str) -> Result<()> {
        match self {
            ChainVariant::Mock(inner) => inner.claim_deployment(id, config_uri).await,
        }
    }

    async fn active_deployment_id(&self) -> Result<Option<Root32>> {
        match self {
            ChainVariant::Mock(inner) => inner.active_deployment_id().await,
        }
    }

    async fn deployment_state(&self, id: &Root32) -> Result<DeploymentState> {
        match self {
            ChainVariant::Mock(inner) => inner.deployment_state(id).await,
        }
    }

    async fn execute_leaf(
        &self,
        id: &Root32,
        leaf: &Leaf,
        proof: &Proof,
        gas: u64,
    ) -> Result<u64> {
        match self {
            ChainVariant::Mock(inner) => inner.execute_leaf(id, leaf, proof, gas).await,
        }
    }
}

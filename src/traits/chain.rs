use anyhow::Result;
use async_trait::async_trait;

use crate::types::{AuthState, DeploymentStatus, Leaf, Proof, Root32, SignatureSet};

/// RPC-facing view of one chain: the Authorization contract and the
/// Deployment Manager contract behind a provider.
///
/// Each chain is independently reachable and independently failing; the
/// orchestrator never assumes two connectors share fate.
#[async_trait]
pub trait ChainConnector: Send + Sync {
    /// Human-readable connector name for logging.
    fn name(&self) -> &'static str;

    fn chain_id(&self) -> u64;

    /// Gas limit of the chain's current block, used as the execution
    /// ceiling.
    async fn block_gas_limit(&self) -> Result<u64>;

    /// Authorization progress for a root. Roots the chain has never seen
    /// report an EMPTY state.
    async fn auth_state(&self, root: &Root32) -> Result<AuthState>;

    /// Submit one SETUP/PROPOSE/APPROVE leaf with its proof and signatures.
    /// Returns the post-submission state. A contract-level rejection is an
    /// error; the transaction is the unit of irrevocability.
    async fn submit_leaf(
        &self,
        root: &Root32,
        leaf: &Leaf,
        proof: &Proof,
        signatures: &SignatureSet,
    ) -> Result<AuthState>;

    /// Mark a deployment active on the Deployment Manager.
    async fn claim_deployment(&self, deployment_id: &Root32, config_uri: &str) -> Result<()>;

    /// Currently active deployment id, if any.
    async fn active_deployment_id(&self) -> Result<Option<Root32>>;

    async fn deployment_state(&self, deployment_id: &Root32) -> Result<DeploymentState>;

    /// Submit one EXECUTE leaf under a gas limit. Returns the number of
    /// leaves the Deployment Manager reports executed afterwards.
    async fn execute_leaf(
        &self,
        deployment_id: &Root32,
        leaf: &Leaf,
        proof: &Proof,
        gas: u64,
    ) -> Result<u64>;
}

/// On-chain deployment record as reported by the Deployment Manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentState {
    pub status: DeploymentStatus,
    pub leafs_executed: u64,
    pub num_leafs: u64,
}

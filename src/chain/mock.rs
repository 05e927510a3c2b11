use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::executor::deployment_id;
use crate::traits::chain::{ChainConnector, DeploymentState};
use crate::tree::verify_proof;
use crate::types::{
    Address20, AuthState, AuthStatus, DeploymentStatus, Leaf, LeafType, Proof, Root32,
    SignatureSet,
};

/// In-memory simulation of one chain's Authorization and Deployment Manager
/// contracts, used by tests and local runs.
///
/// The verifier mirrors the on-chain rules: proofs must recompute the root,
/// signatures must be strictly ascending by signer address with no
/// duplicates, signers must belong to the owner set, and leaves must land
/// exactly in `leafs_executed` order.
#[derive(Clone)]
pub struct MockChain {
    chain_id: u64,
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    owners: Vec<Address20>,
    threshold: usize,
    block_gas_limit: u64,
    auth: HashMap<Root32, AuthState>,
    active_deployment: Option<Root32>,
    deployments: HashMap<Root32, Deployment>,
    /// Simulate an unreachable RPC endpoint.
    unreachable: bool,
    /// Revert the EXECUTE leaf at this index, once.
    revert_at: Option<u64>,
}

struct Deployment {
    root: Root32,
    status: DeploymentStatus,
    leafs_executed: u64,
    num_leafs: u64,
}

impl MockChain {
    pub fn new(chain_id: u64, owners: Vec<Address20>, threshold: usize, block_gas_limit: u64) -> Self {
        Self {
            chain_id,
            inner: Arc::new(Mutex::new(Inner {
                owners,
                threshold,
                block_gas_limit,
                auth: HashMap::new(),
                active_deployment: None,
                deployments: HashMap::new(),
                unreachable: false,
                revert_at: None,
            })),
        }
    }

    /// Make every subsequent call fail, as if the RPC endpoint dropped.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unwrap().unreachable = unreachable;
    }

    /// Revert the EXECUTE leaf with this index, marking the deployment
    /// FAILED.
    pub fn set_revert_at(&self, index: u64) {
        self.inner.lock().unwrap().revert_at = Some(index);
    }

    pub fn clear_revert(&self) {
        self.inner.lock().unwrap().revert_at = None;
    }

    /// Reset a FAILED deployment back to APPROVED so a resume can proceed.
    pub fn reapprove_deployment(&self, id: &Root32) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(dep) = inner.deployments.get_mut(id) {
            dep.status = DeploymentStatus::Approved;
        }
    }

    fn check_signatures(inner: &Inner, root: &Root32, set: &SignatureSet, required: usize) -> Result<()> {
        if set.root != *root {
            anyhow::bail!("signature set is for a different root");
        }
        if set.len() < required {
            anyhow::bail!("{} signatures, threshold is {}", set.len(), required);
        }
        let mut prev: Option<Address20> = None;
        for sig in &set.signatures {
            if let Some(p) = prev {
                if sig.signer <= p {
                    anyhow::bail!("signatures not in strictly ascending signer order");
                }
            }
            if !inner.owners.contains(&sig.signer) {
                anyhow::bail!("signer {} is not an owner", hex::encode(sig.signer));
            }
            prev = Some(sig.signer);
        }
        Ok(())
    }
}

#[async_trait]
impl ChainConnector for MockChain {
    fn name(&self) -> &'static str {
        "mock-chain"
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn block_gas_limit(&self) -> Result<u64> {
        let inner = self.inner.lock().unwrap();
        if inner.unreachable {
            anyhow::bail!("chain {} unreachable", self.chain_id);
        }
        Ok(inner.block_gas_limit)
    }

    async fn auth_state(&self, root: &Root32) -> Result<AuthState> {
        let inner = self.inner.lock().unwrap();
        if inner.unreachable {
            anyhow::bail!("chain {} unreachable", self.chain_id);
        }
        Ok(inner
            .auth
            .get(root)
            .cloned()
            .unwrap_or_else(|| AuthState::empty(*root)))
    }

    async fn submit_leaf(
        &self,
        root: &Root32,
        leaf: &Leaf,
        proof: &Proof,
        signatures: &SignatureSet,
    ) -> Result<AuthState> {
        let mut inner = self.inner.lock().unwrap();
        if inner.unreachable {
            anyhow::bail!("chain {} unreachable", self.chain_id);
        }
        if leaf.chain_id != self.chain_id {
            anyhow::bail!("leaf bound to chain {}, not {}", leaf.chain_id, self.chain_id);
        }
        if !verify_proof(root, leaf, proof) {
            anyhow::bail!("merkle proof does not recompute root");
        }

        let required = match leaf.leaf_type {
            LeafType::Propose => 1,
            _ => inner.threshold,
        };
        Self::check_signatures(&inner, root, signatures, required)?;

        let mut state = inner
            .auth
            .get(root)
            .cloned()
            .unwrap_or_else(|| AuthState::empty(*root));

        if leaf.index != state.leafs_executed {
            anyhow::bail!(
                "leaf {} out of order, {} leaves executed",
                leaf.index,
                state.leafs_executed
            );
        }

        match (state.status, leaf.leaf_type) {
            (AuthStatus::Empty, LeafType::Setup) => {
                state.status = AuthStatus::Setup;
            }
            (AuthStatus::Empty | AuthStatus::Setup, LeafType::Propose) => {
                let payload: serde_json::Value = serde_json::from_slice(&leaf.data)?;
                let num_leafs = payload["num_leafs"]
                    .as_u64()
                    .ok_or_else(|| anyhow::anyhow!("propose payload missing num_leafs"))?;
                state.status = AuthStatus::Proposed;
                state.num_leafs = num_leafs;
            }
            (AuthStatus::Proposed, LeafType::Approve) => {
                state.status = AuthStatus::Completed;
            }
            (status, kind) => {
                anyhow::bail!("cannot apply {:?} leaf in status {:?}", kind, status);
            }
        }
        state.leafs_executed += 1;

        debug!(
            chain_id = self.chain_id,
            status = ?state.status,
            leafs_executed = state.leafs_executed,
            "Auth leaf accepted"
        );

        inner.auth.insert(*root, state.clone());
        Ok(state)
    }

    async fn claim_deployment(&self, id: &Root32, config_uri: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.unreachable {
            anyhow::bail!("chain {} unreachable", self.chain_id);
        }

        // The claim is valid only for a root this chain has fully approved.
        let root = inner
            .auth
            .iter()
            .find(|(root, state)| {
                state.status == AuthStatus::Completed && deployment_id(root, config_uri) == *id
            })
            .map(|(root, _)| *root)
            .ok_or_else(|| anyhow::anyhow!("no approved root matches deployment id"))?;

        let state = inner.auth[&root].clone();
        inner.deployments.entry(*id).or_insert(Deployment {
            root,
            status: DeploymentStatus::Approved,
            leafs_executed: state.leafs_executed,
            num_leafs: state.num_leafs,
        });
        inner.active_deployment = Some(*id);
        Ok(())
    }

    async fn active_deployment_id(&self) -> Result<Option<Root32>> {
        let inner = self.inner.lock().unwrap();
        if inner.unreachable {
            anyhow::bail!("chain {} unreachable", self.chain_id);
        }
        Ok(inner.active_deployment)
    }

    async fn deployment_state(&self, id: &Root32) -> Result<DeploymentState> {
        let inner = self.inner.lock().unwrap();
        if inner.unreachable {
            anyhow::bail!("chain {} unreachable", self.chain_id);
        }
        Ok(match inner.deployments.get(id) {
            Some(dep) => DeploymentState {
                status: dep.status,
                leafs_executed: dep.leafs_executed,
                num_leafs: dep.num_leafs,
            },
            None => DeploymentState {
                status: DeploymentStatus::Empty,
                leafs_executed: 0,
                num_leafs: 0,
            },
        })
    }

    async fn execute_leaf(
        &self,
        id: &Root32,
        leaf: &Leaf,
        proof: &Proof,
        gas: u64,
    ) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let inner = &mut *inner;
        if inner.unreachable {
            anyhow::bail!("chain {} unreachable", self.chain_id);
        }
        if gas > inner.block_gas_limit {
            anyhow::bail!("gas {} exceeds block limit {}", gas, inner.block_gas_limit);
        }
        if inner.active_deployment != Some(*id) {
            anyhow::bail!("deployment not active");
        }
        let revert = inner.revert_at == Some(leaf.index);
        let dep = inner
            .deployments
            .get_mut(id)
            .ok_or_else(|| anyhow::anyhow!("unknown deployment"))?;
        if dep.status != DeploymentStatus::Approved {
            anyhow::bail!("deployment status is {:?}", dep.status);
        }
        if leaf.leaf_type != LeafType::Execute {
            anyhow::bail!("only EXECUTE leaves go through the deployment manager");
        }
        if leaf.index != dep.leafs_executed {
            anyhow::bail!(
                "execute leaf {} out of order, {} leaves executed",
                leaf.index,
                dep.leafs_executed
            );
        }
        if !verify_proof(&dep.root, leaf, proof) {
            anyhow::bail!("merkle proof does not recompute root");
        }
        if revert {
            dep.status = DeploymentStatus::Failed;
            anyhow::bail!("execution reverted at leaf {}", leaf.index);
        }

        dep.leafs_executed += 1;
        let executed = dep.leafs_executed;
        if dep.leafs_executed == dep.num_leafs {
            dep.status = DeploymentStatus::Completed;
            inner.active_deployment = None;
        }
        Ok(executed)
    }
}

use anyhow::Result;
use rs_merkle::algorithms::Sha256;
use rs_merkle::Hasher;
use tracing::{debug, info, warn};

use crate::config::BaseConfig;
use crate::error::RootgateError;
use crate::traits::ChainConnector;
use crate::types::{DeploymentBundle, DeploymentStatus, Root32};

/// Deployment identifier: hash of the root and the canonical-config content
/// URI. Both sides derive it independently, so the id is stable across runs.
pub fn deployment_id(root: &Root32, config_uri: &str) -> Root32 {
    let mut data = Vec::with_capacity(32 + config_uri.len());
    data.extend_from_slice(root);
    data.extend_from_slice(config_uri.as_bytes());
    Sha256::hash(&data)
}

/// Outcome of one execution attempt against one chain.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub chain_id: u64,
    pub status: DeploymentStatus,
    pub leafs_executed: u64,
    pub num_leafs: u64,
    /// Set when execution halted before completion; the attempt is
    /// resumable from the reported count.
    pub error: Option<String>,
}

impl ExecutionReport {
    pub fn success(&self) -> bool {
        self.error.is_none() && self.status == DeploymentStatus::Completed
    }
}

/// Submits approved EXECUTE leaves to the Deployment Manager.
///
/// Claims the deployment, then submits the remaining leaves in index order
/// under a gas ceiling taken from the chain's current block. A reverted
/// leaf halts submission for the chain and is reported with the partial
/// count; there is no automatic retry. Re-invocation resumes from the
/// chain-reported executed count, mirroring the auth state machine's
/// resume discipline.
pub struct DeploymentExecutor<'a> {
    config: &'a BaseConfig,
}

impl<'a> DeploymentExecutor<'a> {
    pub fn new(config: &'a BaseConfig) -> Self {
        Self { config }
    }

    pub async fn execute<C: ChainConnector>(
        &self,
        chain: &C,
        bundle: &DeploymentBundle,
    ) -> Result<ExecutionReport> {
        let chain_id = bundle.chain_id;
        let rpc = |source: anyhow::Error| RootgateError::Collaborator { chain_id, source };

        let gas_ceiling = chain.block_gas_limit().await.map_err(rpc)?
            / self.config.gas_divisor.max(1);

        // Detect and resume from the chain's current record.
        let state = chain
            .deployment_state(&bundle.deployment_id)
            .await
            .map_err(rpc)?;
        match state.status {
            DeploymentStatus::Empty => {
                match chain.active_deployment_id().await.map_err(rpc)? {
                    Some(active) if active != bundle.deployment_id => {
                        return Err(RootgateError::StateDesync {
                            chain_id,
                            root: bundle.root,
                            expected: 0,
                            reported: 0,
                            status: crate::types::AuthStatus::Completed,
                        }
                        .into());
                    }
                    _ => {}
                }
                chain
                    .claim_deployment(&bundle.deployment_id, &bundle.config_uri)
                    .await
                    .map_err(rpc)?;
                info!(chain_id, id = %hex::encode(bundle.deployment_id), "Claimed deployment");
            }
            DeploymentStatus::Approved => {
                info!(
                    chain_id,
                    leafs_executed = state.leafs_executed,
                    "Resuming partially executed deployment"
                );
            }
            DeploymentStatus::Completed => {
                return Ok(ExecutionReport {
                    chain_id,
                    status: DeploymentStatus::Completed,
                    leafs_executed: state.leafs_executed,
                    num_leafs: state.num_leafs,
                    error: None,
                });
            }
            DeploymentStatus::Failed => {
                return Ok(ExecutionReport {
                    chain_id,
                    status: DeploymentStatus::Failed,
                    leafs_executed: state.leafs_executed,
                    num_leafs: state.num_leafs,
                    error: Some("deployment is marked failed on-chain".into()),
                });
            }
        }

        let state = chain
            .deployment_state(&bundle.deployment_id)
            .await
            .map_err(rpc)?;
        let mut executed = state.leafs_executed;
        let total = state.num_leafs;

        for (leaf, estimate) in bundle.leaves.iter().zip(&bundle.gas_estimates) {
            if leaf.leaf.index < executed {
                debug!(chain_id, index = leaf.leaf.index, "Leaf already executed, skipping");
                continue;
            }

            let gas = (*estimate).min(gas_ceiling);
            match chain
                .execute_leaf(&bundle.deployment_id, &leaf.leaf, &leaf.proof, gas)
                .await
            {
                Ok(reported) => {
                    executed = reported;
                    debug!(chain_id, index = leaf.leaf.index, executed, "Execute leaf landed");
                }
                Err(e) => {
                    warn!(
                        chain_id,
                        index = leaf.leaf.index,
                        executed,
                        total,
                        "Execute leaf reverted: {e}"
                    );
                    let err = RootgateError::LeafReverted {
                        chain_id,
                        index: leaf.leaf.index,
                        executed,
                        total,
                    };
                    let state = chain
                        .deployment_state(&bundle.deployment_id)
                        .await
                        .map_err(rpc)?;
                    return Ok(ExecutionReport {
                        chain_id,
                        status: state.status,
                        leafs_executed: executed,
                        num_leafs: total,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        // Poll until the on-chain record reaches a terminal status; the
        // final leaf's transaction may land after the submission call
        // returns on a real provider.
        let mut state = chain
            .deployment_state(&bundle.deployment_id)
            .await
            .map_err(rpc)?;
        while state.status == DeploymentStatus::Approved && state.leafs_executed < state.num_leafs {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.poll_interval_ms))
                .await;
            state = chain
                .deployment_state(&bundle.deployment_id)
                .await
                .map_err(rpc)?;
        }
        info!(
            chain_id,
            status = ?state.status,
            leafs_executed = state.leafs_executed,
            "Deployment execution finished"
        );
        Ok(ExecutionReport {
            chain_id,
            status: state.status,
            leafs_executed: state.leafs_executed,
            num_leafs: state.num_leafs,
            error: None,
        })
    }
}

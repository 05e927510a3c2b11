use anyhow::Result;
use rs_merkle::algorithms::Sha256;
use rs_merkle::Hasher;
use serde_json::json;
use tracing::debug;

use crate::error::RootgateError;
use crate::traits::ConfigProvider;
use crate::types::{ChainConfig, Leaf, LeafType, RawAction};

/// Emits the ordered leaf sequence for one chain.
///
/// Emission order is SETUP (only when proposer roles still need on-chain
/// registration), PROPOSE, APPROVE, then the EXECUTE leaves; indices are
/// assigned strictly in emission order, gapless from 0. The Authorization
/// contract consumes the first part of the sequence, the Deployment Manager
/// the EXECUTE tail, both resuming from the same `leafs_executed` counter.
pub struct LeafBuilder<'a> {
    provider: &'a dyn ConfigProvider,
}

impl<'a> LeafBuilder<'a> {
    pub fn new(provider: &'a dyn ConfigProvider) -> Self {
        Self { provider }
    }

    /// Build the chain's leaves. Fails with `EmptyActionSet` for a chain
    /// with zero actions; such chains are dropped from the proposal rather
    /// than padded.
    pub fn build_chain_leaves(
        &self,
        config: &ChainConfig,
        actions: &[RawAction],
    ) -> Result<Vec<Leaf>> {
        if actions.is_empty() {
            return Err(RootgateError::EmptyActionSet {
                chain_id: config.chain_id,
            }
            .into());
        }

        let auth_leafs: u64 = if config.requires_setup { 3 } else { 2 };
        let num_leafs = auth_leafs + actions.len() as u64;

        let mut leaves = Vec::with_capacity(num_leafs as usize);
        let mut index = 0u64;

        if config.requires_setup {
            leaves.push(Leaf {
                chain_id: config.chain_id,
                index,
                leaf_type: LeafType::Setup,
                data: encode_setup(config),
            });
            index += 1;
        }

        leaves.push(Leaf {
            chain_id: config.chain_id,
            index,
            leaf_type: LeafType::Propose,
            data: encode_propose(config, num_leafs),
        });
        index += 1;

        leaves.push(Leaf {
            chain_id: config.chain_id,
            index,
            leaf_type: LeafType::Approve,
            data: encode_approve(config),
        });
        index += 1;

        for action in actions {
            let artifact = self
                .provider
                .artifact(&action.artifact)
                .map_err(|source| RootgateError::Collaborator {
                    chain_id: config.chain_id,
                    source,
                })?;
            leaves.push(Leaf {
                chain_id: config.chain_id,
                index,
                leaf_type: LeafType::Execute,
                data: encode_execute(action, &artifact),
            });
            index += 1;
        }

        debug!(
            chain_id = config.chain_id,
            num_leafs,
            requires_setup = config.requires_setup,
            "Built chain leaves"
        );

        Ok(leaves)
    }
}

/// SETUP payload: the proposer-role registration parameters.
fn encode_setup(config: &ChainConfig) -> Vec<u8> {
    let owners: Vec<String> = config.owners.iter().map(hex::encode).collect();
    serde_json::to_vec(&json!({
        "owners": owners,
        "threshold": config.threshold,
    }))
    .expect("setup payload is valid json")
}

/// PROPOSE payload carries the declared leaf total so the chain learns
/// `num_leafs` when the leaf lands.
fn encode_propose(config: &ChainConfig, num_leafs: u64) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "num_leafs": num_leafs,
        "safe": hex::encode(config.safe_address),
        "module": hex::encode(config.module_address),
    }))
    .expect("propose payload is valid json")
}

fn encode_approve(config: &ChainConfig) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "safe": hex::encode(config.safe_address),
        "module": hex::encode(config.module_address),
    }))
    .expect("approve payload is valid json")
}

/// EXECUTE payload binds the action to a digest of its compiled artifact so
/// a payload cannot be replayed against a different build.
fn encode_execute(action: &RawAction, artifact: &[u8]) -> Vec<u8> {
    let digest = Sha256::hash(artifact);
    serde_json::to_vec(&json!({
        "kind": action.kind,
        "artifact": hex::encode(digest),
        "payload": hex::encode(&action.payload),
    }))
    .expect("execute payload is valid json")
}

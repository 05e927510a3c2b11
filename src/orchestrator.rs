use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use kanal::unbounded_async;
use tracing::{error, info, span, warn, Instrument, Level};

use crate::auth_state::AuthStateMachine;
use crate::chain::ChainVariant;
use crate::config::BaseConfig;
use crate::error::RootgateError;
use crate::estimator::EstimatorVariant;
use crate::executor::{deployment_id, DeploymentExecutor};
use crate::leaf_builder::LeafBuilder;
use crate::registry::RegistryVariant;
use crate::signatures::SignatureCollector;
use crate::traits::{ChainConnector, ConfigProvider, GasEstimator, ProposalRegistry};
use crate::tree::MerkleTreeBuilder;
use crate::types::{
    AuthStatus, ChainConfig, ChainReport, DeploymentBundle, Leaf, LeafType, LeafWithProof,
    ProposalRequest, RawAction, Root32,
};

/// Per-chain proposal input: the chain's deployment identity plus its
/// collected actions.
pub struct ChainInput {
    pub config: ChainConfig,
    pub actions: Vec<RawAction>,
}

/// Top-level driver for the proposal lifecycle.
///
/// Builds one canonical tree over every chain's leaves, validates the
/// cross-chain invariants before anything touches a network, then drives
/// each chain through SETUP/PROPOSE/APPROVE and execution in its own task.
/// Chains share only read access to the immutable tree; they complete
/// independently and one chain's failure never aborts its siblings.
pub struct ProposalOrchestrator<P: ConfigProvider> {
    chains: HashMap<u64, ChainVariant>,
    registry: Arc<RegistryVariant>,
    provider: P,
    estimator: Arc<EstimatorVariant>,
    collector: Arc<SignatureCollector>,
    config: BaseConfig,
}

impl<P: ConfigProvider> ProposalOrchestrator<P> {
    pub fn new(
        chains: Vec<ChainVariant>,
        registry: RegistryVariant,
        provider: P,
        estimator: EstimatorVariant,
        collector: SignatureCollector,
        config: BaseConfig,
    ) -> Self {
        Self {
            chains: chains.into_iter().map(|c| (c.chain_id(), c)).collect(),
            registry: Arc::new(registry),
            provider,
            estimator: Arc::new(estimator),
            collector: Arc::new(collector),
            config,
        }
    }

    /// Build the cross-chain proposal: leaves, tree, proofs. Pure local
    /// computation; nothing is submitted anywhere.
    ///
    /// Chains with zero actions are dropped with a warning rather than
    /// padded; a proposal with no remaining chains is an error.
    pub fn propose(&self, inputs: &[ChainInput]) -> Result<ProposalRequest> {
        let builder = LeafBuilder::new(&self.provider);

        let mut kept: Vec<(&ChainInput, Vec<Leaf>)> = Vec::new();
        for input in inputs {
            match builder.build_chain_leaves(&input.config, &input.actions) {
                Ok(leaves) => kept.push((input, leaves)),
                Err(e) => match e.downcast::<RootgateError>() {
                    Ok(RootgateError::EmptyActionSet { chain_id }) => {
                        warn!(chain_id, "Chain has no actions, dropping from proposal");
                    }
                    Ok(other) => return Err(other.into()),
                    Err(other) => return Err(other),
                },
            }
        }

        let first = kept
            .first()
            .map(|(input, _)| &input.config)
            .ok_or_else(|| RootgateError::EmptyActionSet { chain_id: 0 })?;

        // Fail fast on configuration divergence, before any on-chain call.
        for (input, _) in &kept {
            validate_consistency(first, &input.config)?;
        }

        let mut tree = MerkleTreeBuilder::new();
        let mut chain_status = HashMap::new();
        for (input, leaves) in &kept {
            chain_status.insert(input.config.chain_id, leaves.len() as u64);
            tree.add_leaves(leaves.clone());
        }

        let root = tree.root();
        info!(
            root = %hex::encode(root),
            chains = chain_status.len(),
            leaves = tree.len(),
            "Built proposal tree"
        );

        Ok(ProposalRequest {
            root,
            chain_status,
            project: first.project.clone(),
            org_id: first.org_id.clone(),
            owners: first.owners.clone(),
            threshold: first.threshold,
            safe_address: first.safe_address,
            module_address: first.module_address,
            leaves: tree.leaves_with_proofs(),
            proposal_id: None,
        })
    }

    /// Register the proposal remotely and drive every chain independently
    /// to COMPLETED (or its own error), then execute approved deployments.
    /// Returns one report per chain, ordered by chain id.
    pub async fn register_and_approve(
        &self,
        mut request: ProposalRequest,
    ) -> Result<(ProposalRequest, Vec<ChainReport>)> {
        let canonical = self.provider.canonical_config()?;
        let config_uri = self
            .registry
            .store_config(&request.org_id, &canonical)
            .await?;
        let proposal_id = self.registry.relay(&request).await?;
        info!(
            proposal_id = %proposal_id,
            registry = self.registry.name(),
            "Proposal registered"
        );
        request.proposal_id = Some(proposal_id);

        let (report_tx, report_rx) = unbounded_async::<ChainReport>();
        let mut handles = Vec::new();

        let chain_ids: Vec<u64> = {
            let mut ids: Vec<u64> = request.chain_status.keys().copied().collect();
            ids.sort_unstable();
            ids
        };

        for chain_id in chain_ids {
            let Some(chain) = self.chains.get(&chain_id).cloned() else {
                report_tx
                    .send(ChainReport {
                        chain_id,
                        auth_status: AuthStatus::Empty,
                        leafs_executed: 0,
                        num_leafs: request.chain_status[&chain_id],
                        deployment_status: None,
                        error: Some(format!("no connector configured for chain {chain_id}")),
                    })
                    .await?;
                continue;
            };

            let task = ChainTask {
                chain,
                root: request.root,
                leaves: request.chain_leaves(chain_id),
                threshold: request.threshold,
                collector: Arc::clone(&self.collector),
                estimator: Arc::clone(&self.estimator),
                config: self.config.clone(),
                config_uri: config_uri.clone(),
            };

            let tx = report_tx.clone();
            let span = span!(Level::INFO, "chain_task", chain_id);
            handles.push(tokio::task::spawn(
                async move {
                    let report = task.run().await;
                    if let Some(err) = &report.error {
                        error!(chain_id, "Chain failed: {err}");
                    }
                    let _ = tx.send(report).await;
                }
                .instrument(span),
            ));
        }
        drop(report_tx);

        for handle in handles {
            handle
                .await
                .map_err(|_| anyhow::anyhow!("chain task panicked"))?;
        }

        let mut reports = Vec::new();
        while let Ok(report) = report_rx.recv().await {
            reports.push(report);
        }
        reports.sort_by_key(|r| r.chain_id);

        Ok((request, reports))
    }

    /// Full lifecycle: build, then (unless dry-run) register and drive all
    /// chains. In dry-run mode nothing leaves the process.
    pub async fn run(&self, inputs: &[ChainInput]) -> Result<(ProposalRequest, Vec<ChainReport>)> {
        let request = self.propose(inputs)?;

        if self.config.dry_run {
            info!("Dry run: skipping registration and on-chain submission");
            return Ok((request, Vec::new()));
        }

        self.register_and_approve(request).await
    }
}

fn validate_consistency(first: &ChainConfig, other: &ChainConfig) -> Result<()> {
    let field = if other.owners != first.owners {
        Some("owners")
    } else if other.threshold != first.threshold {
        Some("threshold")
    } else if other.safe_address != first.safe_address {
        Some("safe_address")
    } else if other.module_address != first.module_address {
        Some("module_address")
    } else if other.project != first.project {
        Some("project")
    } else if other.org_id != first.org_id {
        Some("org_id")
    } else {
        None
    };

    if let Some(field) = field {
        return Err(RootgateError::InconsistentConfiguration {
            chain_id: other.chain_id,
            field,
        }
        .into());
    }
    Ok(())
}

/// One chain's lifecycle, run to its own completion or error.
struct ChainTask {
    chain: ChainVariant,
    root: Root32,
    leaves: Vec<LeafWithProof>,
    threshold: usize,
    collector: Arc<SignatureCollector>,
    estimator: Arc<EstimatorVariant>,
    config: BaseConfig,
    config_uri: String,
}

impl ChainTask {
    async fn run(&self) -> ChainReport {
        let chain_id = self.chain.chain_id();
        let mut report = ChainReport {
            chain_id,
            auth_status: AuthStatus::Empty,
            leafs_executed: 0,
            num_leafs: self.leaves.len() as u64,
            deployment_status: None,
            error: None,
        };

        match self.drive(&mut report).await {
            Ok(()) => report,
            Err(e) => {
                report.error = Some(e.to_string());
                report
            }
        }
    }

    async fn drive(&self, report: &mut ChainReport) -> Result<()> {
        let chain_id = self.chain.chain_id();
        let machine = AuthStateMachine::new(chain_id, self.root, &self.leaves);

        loop {
            // State is fetched fresh each step; the machine decides the
            // next leaf or detects desync.
            let state = self
                .chain
                .auth_state(&self.root)
                .await
                .map_err(|source| RootgateError::Collaborator { chain_id, source })?;
            report.auth_status = state.status;
            report.leafs_executed = state.leafs_executed;

            let Some(next) = machine.next_step(&state)? else {
                break;
            };

            let signatures = match next.leaf.leaf_type {
                LeafType::Propose => self.collector.collect_proposer(&self.root).await?,
                _ => self.collector.collect(&self.root, self.threshold).await?,
            };

            let kind = match next.leaf.leaf_type {
                LeafType::Setup => "setup",
                LeafType::Propose => "propose",
                LeafType::Approve => "approve",
                LeafType::Execute => "execute",
            };
            info!(chain_id, kind, index = next.leaf.index, "Submitting auth leaf");

            let reported = self
                .chain
                .submit_leaf(&self.root, &next.leaf, &next.proof, &signatures)
                .await
                .map_err(|e| RootgateError::LeafRejected {
                    chain_id,
                    kind,
                    index: next.leaf.index,
                    reason: e.to_string(),
                })?;

            machine.check_response(&state, next.leaf.leaf_type, &reported)?;
            report.auth_status = reported.status;
            report.leafs_executed = reported.leafs_executed;
        }

        // Approved: hand the EXECUTE tail to the deployment executor.
        let execute_leaves: Vec<LeafWithProof> = self
            .leaves
            .iter()
            .filter(|l| l.leaf.leaf_type == LeafType::Execute)
            .cloned()
            .collect();

        let plain: Vec<Leaf> = execute_leaves.iter().map(|l| l.leaf.clone()).collect();
        let gas_estimates = self
            .estimator
            .estimate(chain_id, &plain)
            .await
            .map_err(|source| RootgateError::Collaborator { chain_id, source })?;

        let bundle = DeploymentBundle {
            chain_id,
            root: self.root,
            deployment_id: deployment_id(&self.root, &self.config_uri),
            config_uri: self.config_uri.clone(),
            leaves: execute_leaves,
            gas_estimates,
        };

        let executor = DeploymentExecutor::new(&self.config);
        let exec_report = executor.execute(&self.chain, &bundle).await?;
        report.deployment_status = Some(exec_report.status);
        report.leafs_executed = exec_report.leafs_executed;
        if let Some(err) = exec_report.error {
            return Err(anyhow::anyhow!(err));
        }
        Ok(())
    }
}

use anyhow::Result;

use ::rootgate::artifacts::StaticProvider;
use ::rootgate::chain::{ChainVariant, MockChain};
use ::rootgate::config::BaseConfig;
use ::rootgate::estimator::{EstimatorVariant, FixedEstimator};
use ::rootgate::orchestrator::{ChainInput, ProposalOrchestrator};
use ::rootgate::registry::{MockRegistry, RegistryVariant};
use ::rootgate::signatures::SignatureCollector;
use ::rootgate::signer::{MockSigner, SignerVariant};
use ::rootgate::traits::{ChainConnector, Signer};
use ::rootgate::types::{
    ActionKind, Address20, AuthStatus, ChainConfig, DeploymentStatus, RawAction,
};
use ::rootgate::RootgateError;

// ===== Test Helper Functions =====

fn signers(count: u8) -> Vec<SignerVariant> {
    (1..=count)
        .map(|i| SignerVariant::Mock(MockSigner::new(vec![i; 32])))
        .collect()
}

fn owner_addresses(count: u8) -> Vec<Address20> {
    signers(count).iter().map(|s| s.address()).collect()
}

fn chain_config(chain_id: u64, requires_setup: bool, owners: &[Address20]) -> ChainConfig {
    ChainConfig {
        chain_id,
        requires_setup,
        owners: owners.to_vec(),
        threshold: 2,
        safe_address: [0xaa; 20],
        module_address: [0xbb; 20],
        project: "demo".into(),
        org_id: "org".into(),
    }
}

fn deploy_action(tag: u8) -> RawAction {
    RawAction {
        kind: ActionKind::Deploy,
        artifact: "Token".into(),
        payload: vec![tag],
    }
}

fn provider() -> StaticProvider {
    StaticProvider::new(
        vec![("Token".into(), b"compiled-token".to_vec())],
        b"canonical-config".to_vec(),
    )
}

struct Fixture {
    chains: Vec<MockChain>,
    registry: MockRegistry,
    orchestrator: ProposalOrchestrator<StaticProvider>,
    owners: Vec<Address20>,
}

/// Three chains, owner threshold 2 of 3: chain 1 requires setup, chains 10
/// and 20 do not.
fn fixture(config: BaseConfig) -> Fixture {
    let owners = owner_addresses(3);
    let chains: Vec<MockChain> = [1u64, 10, 20]
        .iter()
        .map(|id| MockChain::new(*id, owners.clone(), 2, 30_000_000))
        .collect();
    let registry = MockRegistry::new();

    let orchestrator = ProposalOrchestrator::new(
        chains.iter().cloned().map(ChainVariant::Mock).collect(),
        RegistryVariant::Mock(registry.clone()),
        provider(),
        EstimatorVariant::Fixed(FixedEstimator::new(400_000)),
        SignatureCollector::new(signers(3)),
        config,
    );

    Fixture {
        chains,
        registry,
        orchestrator,
        owners,
    }
}

fn scenario_inputs(owners: &[Address20]) -> Vec<ChainInput> {
    vec![
        ChainInput {
            config: chain_config(1, true, owners),
            actions: vec![deploy_action(1), deploy_action(2)],
        },
        ChainInput {
            config: chain_config(10, false, owners),
            actions: vec![deploy_action(3)],
        },
        ChainInput {
            config: chain_config(20, false, owners),
            actions: vec![deploy_action(4)],
        },
    ]
}

// ===== Tests =====

#[tokio::test]
async fn test_three_chain_scenario() -> Result<()> {
    let f = fixture(BaseConfig::default());
    let inputs = scenario_inputs(&f.owners);

    let (request, reports) = f.orchestrator.run(&inputs).await?;

    // One shared root authorizes heterogeneous per-chain leaf counts.
    assert_eq!(request.chain_status[&1], 5, "setup + propose + approve + 2 execute");
    assert_eq!(request.chain_status[&10], 3);
    assert_eq!(request.chain_status[&20], 3);
    assert!(request.proposal_id.is_some());

    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert!(report.succeeded(), "chain {}: {:?}", report.chain_id, report.error);
        assert_eq!(report.auth_status, AuthStatus::Completed);
        assert_eq!(report.deployment_status, Some(DeploymentStatus::Completed));
        assert_eq!(
            report.leafs_executed, report.num_leafs,
            "chain {} must execute every leaf",
            report.chain_id
        );
    }
    assert_eq!(reports[0].num_leafs, 5);
    assert_eq!(reports[1].num_leafs, 3);

    // On-chain auth records agree with the reports.
    for chain in &f.chains {
        let state = chain.auth_state(&request.root).await?;
        assert_eq!(state.status, AuthStatus::Completed);
    }

    // The proposal was registered exactly once.
    assert_eq!(f.registry.relayed().len(), 1);
    assert_eq!(f.registry.stored_configs().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_cross_chain_independence() -> Result<()> {
    let f = fixture(BaseConfig::default());
    let inputs = scenario_inputs(&f.owners);

    // Chain 20's RPC drops before anything is submitted there.
    f.chains[2].set_unreachable(true);

    let (request, reports) = f.orchestrator.run(&inputs).await?;

    let failed = reports.iter().find(|r| r.chain_id == 20).unwrap();
    assert!(!failed.succeeded());
    assert!(failed.error.as_deref().unwrap().contains("unreachable"));

    for report in reports.iter().filter(|r| r.chain_id != 20) {
        assert!(report.succeeded(), "chain {}: {:?}", report.chain_id, report.error);
        assert_eq!(report.auth_status, AuthStatus::Completed);
        assert_eq!(report.deployment_status, Some(DeploymentStatus::Completed));
    }

    // Recovery: the failed chain completes on a later run with no effect on
    // the chains that already finished.
    f.chains[2].set_unreachable(false);
    let (_, reports) = f.orchestrator.register_and_approve(request).await?;
    for report in &reports {
        assert!(report.succeeded(), "chain {}: {:?}", report.chain_id, report.error);
    }
    Ok(())
}

#[tokio::test]
async fn test_resume_from_proposed_submits_only_remaining_leaves() -> Result<()> {
    let f = fixture(BaseConfig::default());
    let inputs = scenario_inputs(&f.owners);
    let request = f.orchestrator.propose(&inputs)?;

    // Drive chain 1 to PROPOSED out-of-band, as if a previous run died
    // after two submissions.
    let collector = SignatureCollector::new(signers(3));
    let chain_leaves = request.chain_leaves(1);
    for leaf in &chain_leaves[..2] {
        let sigs = collector.collect(&request.root, 2).await?;
        f.chains[0]
            .submit_leaf(&request.root, &leaf.leaf, &leaf.proof, &sigs)
            .await?;
    }
    let state = f.chains[0].auth_state(&request.root).await?;
    assert_eq!(state.status, AuthStatus::Proposed);
    assert_eq!(state.leafs_executed, 2);

    // The mock chain rejects any out-of-order or repeated leaf, so a
    // successful run proves only the remaining leaves were submitted.
    let (_, reports) = f.orchestrator.register_and_approve(request).await?;
    for report in &reports {
        assert!(report.succeeded(), "chain {}: {:?}", report.chain_id, report.error);
        assert_eq!(report.auth_status, AuthStatus::Completed);
        assert_eq!(report.leafs_executed, report.num_leafs);
    }
    Ok(())
}

#[tokio::test]
async fn test_rerun_after_completion_is_idempotent() -> Result<()> {
    let f = fixture(BaseConfig::default());
    let inputs = scenario_inputs(&f.owners);

    let (request, first) = f.orchestrator.run(&inputs).await?;
    assert!(first.iter().all(|r| r.succeeded()));

    let (_, second) = f.orchestrator.register_and_approve(request).await?;
    for report in &second {
        assert!(report.succeeded(), "chain {}: {:?}", report.chain_id, report.error);
        assert_eq!(report.deployment_status, Some(DeploymentStatus::Completed));
    }
    Ok(())
}

#[tokio::test]
async fn test_inconsistent_configuration_aborts_before_any_submission() -> Result<()> {
    let f = fixture(BaseConfig::default());
    let mut inputs = scenario_inputs(&f.owners);
    inputs[2].config.threshold = 3;

    let err = f.orchestrator.run(&inputs).await.unwrap_err();
    let err = err.downcast::<RootgateError>().unwrap();
    assert!(matches!(
        err,
        RootgateError::InconsistentConfiguration {
            chain_id: 20,
            field: "threshold"
        }
    ));

    // Nothing was registered or submitted anywhere.
    assert!(f.registry.relayed().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_empty_chain_is_dropped_from_proposal() -> Result<()> {
    let f = fixture(BaseConfig::default());
    let mut inputs = scenario_inputs(&f.owners);
    inputs[1].actions.clear();

    let request = f.orchestrator.propose(&inputs)?;
    assert!(!request.chain_status.contains_key(&10));
    assert_eq!(request.chain_status.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_proposal_with_no_actions_anywhere_fails() {
    let f = fixture(BaseConfig::default());
    let mut inputs = scenario_inputs(&f.owners);
    for input in &mut inputs {
        input.actions.clear();
    }

    let err = f.orchestrator.propose(&inputs).unwrap_err();
    assert!(err.downcast_ref::<RootgateError>().is_some());
}

#[tokio::test]
async fn test_dry_run_has_no_network_effect() -> Result<()> {
    let config = BaseConfig {
        dry_run: true,
        ..BaseConfig::default()
    };
    let f = fixture(config);
    let inputs = scenario_inputs(&f.owners);

    let (request, reports) = f.orchestrator.run(&inputs).await?;
    assert!(reports.is_empty());
    assert!(request.proposal_id.is_none());
    assert!(f.registry.relayed().is_empty());
    assert!(f.registry.stored_configs().is_empty());

    for chain in &f.chains {
        let state = chain.auth_state(&request.root).await?;
        assert_eq!(state.status, AuthStatus::Empty);
        assert_eq!(state.leafs_executed, 0);
    }
    Ok(())
}

#[tokio::test]
async fn test_estimator_failure_is_chain_scoped() -> Result<()> {
    use ::rootgate::estimator::MockEstimator;

    let owners = owner_addresses(3);
    let chains: Vec<MockChain> = [1u64, 10]
        .iter()
        .map(|id| MockChain::new(*id, owners.clone(), 2, 30_000_000))
        .collect();
    let estimator = MockEstimator::failing();

    let orchestrator = ProposalOrchestrator::new(
        chains.iter().cloned().map(ChainVariant::Mock).collect(),
        RegistryVariant::Mock(MockRegistry::new()),
        provider(),
        EstimatorVariant::Mock(estimator.clone()),
        SignatureCollector::new(signers(3)),
        BaseConfig::default(),
    );

    let inputs = vec![
        ChainInput {
            config: chain_config(1, true, &owners),
            actions: vec![deploy_action(1)],
        },
        ChainInput {
            config: chain_config(10, false, &owners),
            actions: vec![deploy_action(2)],
        },
    ];

    let (request, reports) = orchestrator.run(&inputs).await?;
    assert_eq!(estimator.call_count(), 2, "one estimate call per chain");
    for report in &reports {
        assert!(!report.succeeded());
        assert!(report.error.as_deref().unwrap().contains("collaborator failure"));
        // Authorization completed; only the execution hand-off failed.
        assert_eq!(report.auth_status, AuthStatus::Completed);
        assert_eq!(report.deployment_status, None);
    }

    for chain in &chains {
        let state = chain.auth_state(&request.root).await?;
        assert_eq!(state.status, AuthStatus::Completed);
    }
    Ok(())
}

#[tokio::test]
async fn test_insufficient_signers_fails_every_chain_cleanly() -> Result<()> {
    let owners = owner_addresses(3);
    let chains: Vec<MockChain> = [1u64, 10]
        .iter()
        .map(|id| MockChain::new(*id, owners.clone(), 2, 30_000_000))
        .collect();
    let registry = MockRegistry::new();

    // Only one signer available against a threshold of two.
    let orchestrator = ProposalOrchestrator::new(
        chains.iter().cloned().map(ChainVariant::Mock).collect(),
        RegistryVariant::Mock(registry.clone()),
        provider(),
        EstimatorVariant::Fixed(FixedEstimator::new(400_000)),
        SignatureCollector::new(signers(1)),
        BaseConfig::default(),
    );

    let inputs = vec![
        ChainInput {
            config: chain_config(1, true, &owners),
            actions: vec![deploy_action(1)],
        },
        ChainInput {
            config: chain_config(10, false, &owners),
            actions: vec![deploy_action(2)],
        },
    ];

    let (request, reports) = orchestrator.run(&inputs).await?;
    for report in &reports {
        assert!(!report.succeeded());
        assert!(report.error.as_deref().unwrap().contains("signers"));
    }

    // Chain 1 never got past its SETUP collection; chain 10's single-signer
    // PROPOSE landed and is not rolled back by the failed APPROVE.
    let state = chains[0].auth_state(&request.root).await?;
    assert_eq!(state.status, AuthStatus::Empty);
    let state = chains[1].auth_state(&request.root).await?;
    assert_eq!(state.status, AuthStatus::Proposed);
    assert_eq!(state.leafs_executed, 1);
    Ok(())
}

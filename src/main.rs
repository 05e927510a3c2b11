use anyhow::Result;
use clap::Parser;
use tracing::info;

use rootgate::artifacts::StaticProvider;
use rootgate::chain::{ChainVariant, MockChain};
use rootgate::config::BaseConfig;
use rootgate::estimator::{EstimatorVariant, FixedEstimator};
use rootgate::orchestrator::{ChainInput, ProposalOrchestrator};
use rootgate::registry::{NoopRegistry, RegistryVariant};
use rootgate::signatures::SignatureCollector;
use rootgate::signer::{MockSigner, SignerVariant};
use rootgate::traits::Signer;
use rootgate::types::{ActionKind, ChainConfig, RawAction};
use rootgate::{telemetry, types::Address20};

/// Demo driver: proposes and executes a two-chain deployment against local
/// in-memory chains. Real provider/signer backends plug in behind the same
/// traits.
#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    info!("Starting rootgate");

    let config = BaseConfig::parse();
    info!(
        "Configuration: dry_run={}, poll_interval_ms={}",
        config.dry_run, config.poll_interval_ms
    );

    let signers: Vec<SignerVariant> = (1u8..=3)
        .map(|i| SignerVariant::Mock(MockSigner::new(vec![i; 32])))
        .collect();
    let owners: Vec<Address20> = signers.iter().map(|s| s.address()).collect();
    let threshold = 2;

    let chains = vec![
        ChainVariant::Mock(MockChain::new(1, owners.clone(), threshold, 30_000_000)),
        ChainVariant::Mock(MockChain::new(10, owners.clone(), threshold, 30_000_000)),
    ];

    let provider = StaticProvider::new(
        vec![("Token".into(), b"compiled-token-artifact".to_vec())],
        b"canonical-config".to_vec(),
    );

    let orchestrator = ProposalOrchestrator::new(
        chains,
        RegistryVariant::Noop(NoopRegistry),
        provider,
        EstimatorVariant::Fixed(FixedEstimator::default()),
        SignatureCollector::new(signers),
        config,
    );

    let shared = |chain_id: u64, requires_setup: bool| ChainConfig {
        chain_id,
        requires_setup,
        owners: owners.clone(),
        threshold,
        safe_address: [0xaa; 20],
        module_address: [0xbb; 20],
        project: "demo".into(),
        org_id: "local".into(),
    };

    let deploy = RawAction {
        kind: ActionKind::Deploy,
        artifact: "Token".into(),
        payload: vec![0x01],
    };

    let inputs = vec![
        ChainInput {
            config: shared(1, true),
            actions: vec![deploy.clone(), deploy.clone()],
        },
        ChainInput {
            config: shared(10, false),
            actions: vec![deploy],
        },
    ];

    let (request, reports) = orchestrator.run(&inputs).await?;
    info!(
        root = %hex::encode(request.root),
        proposal_id = ?request.proposal_id,
        "Proposal finished"
    );
    for report in reports {
        info!(
            chain_id = report.chain_id,
            auth_status = ?report.auth_status,
            leafs_executed = report.leafs_executed,
            num_leafs = report.num_leafs,
            deployment_status = ?report.deployment_status,
            ok = report.succeeded(),
            "Chain report"
        );
    }

    info!("Rootgate shutdown complete");
    Ok(())
}

// Library exports for testing and external use

pub mod artifacts;
pub mod auth_state;
pub mod chain;
pub mod config;
pub mod error;
pub mod estimator;
pub mod executor;
pub mod leaf_builder;
pub mod orchestrator;
pub mod registry;
pub mod signatures;
pub mod signer;
pub mod telemetry;
pub mod traits;
pub mod tree;
pub mod types;

// Re-export commonly used types and traits
pub use config::BaseConfig;
pub use error::RootgateError;
pub use executor::{deployment_id, DeploymentExecutor, ExecutionReport};
pub use leaf_builder::LeafBuilder;
pub use orchestrator::{ChainInput, ProposalOrchestrator};
pub use signatures::SignatureCollector;
pub use traits::{ChainConnector, ConfigProvider, GasEstimator, ProposalRegistry, Signer};
pub use tree::{verify_proof, MerkleTreeBuilder};
pub use types::{
    Address20, AuthState, AuthStatus, ChainConfig, ChainReport, DeploymentBundle,
    DeploymentStatus, Leaf, LeafType, LeafWithProof, Proof, ProofNode, ProposalRequest,
    RawAction, Root32, Signature, SignatureSet,
};

// Re-export variant enums for convenience
pub use artifacts::{ProviderVariant, StaticProvider};
pub use chain::{ChainVariant, MockChain};
pub use estimator::{EstimatorVariant, FixedEstimator, MockEstimator};
pub use registry::{MockRegistry, NoopRegistry, RegistryVariant};
pub use signer::{MockSigner, SignerVariant};

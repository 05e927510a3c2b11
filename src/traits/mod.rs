pub mod artifacts;
pub mod chain;
pub mod estimator;
pub mod registry;
pub mod signer;

pub use artifacts::ConfigProvider;
pub use chain::ChainConnector;
pub use estimator::GasEstimator;
pub use registry::ProposalRegistry;
pub use signer::Signer;

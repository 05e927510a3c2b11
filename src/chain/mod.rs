pub mod mock;
pub mod variant;

pub use mock::MockChain;
pub use variant::ChainVariant;

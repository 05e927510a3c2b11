pub mod mock;
pub mod variant;

pub use mock::MockSigner;
pub use variant::SignerVariant;

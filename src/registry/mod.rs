pub mod mock;
pub mod noop;
pub mod variant;

pub use mock::MockRegistry;
pub use noop::NoopRegistry;
pub use variant::RegistryVariant;

pub mod static_provider;
pub mod variant;

pub use static_provider::StaticProvider;
pub use variant::ProviderVariant;

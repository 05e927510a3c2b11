use anyhow::Result;

use super::StaticProvider;
use crate::traits::ConfigProvider;

/// Enum representing all possible config provider implementations.
pub enum ProviderVariant {
    Static(StaticProvider),
}

impl ConfigProvider for ProviderVariant {
    fn name(&self) -> &'static str {
        match self {
            ProviderVariant::Static(inner) => inner.name(),
        }
    }

    fn artifact(&self, name: &str) -> Result<Vec<u8>> {
        match self {
            ProviderVariant::Static(inner) => inner.artifact(name),
        }
    }

    fn canonical_config(&self) -> Result<Vec<u8>> {
        match self {
            ProviderVariant::Static(inner) => inner.canonical_config(),
        }
    }
}

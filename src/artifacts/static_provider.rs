use std::collections::HashMap;

use anyhow::Result;

use crate::traits::ConfigProvider;

/// In-memory artifact map; the identity provider for tests and dry-run.
pub struct StaticProvider {
    artifacts: HashMap<String, Vec<u8>>,
    canonical: Vec<u8>,
}

impl StaticProvider {
    pub fn new(artifacts: Vec<(String, Vec<u8>)>, canonical: Vec<u8>) -> Self {
        Self {
            artifacts: artifacts.into_iter().collect(),
            canonical,
        }
    }
}

impl ConfigProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static-provider"
    }

    fn artifact(&self, name: &str) -> Result<Vec<u8>> {
        self.artifacts
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown artifact: {}", name))
    }

    fn canonical_config(&self) -> Result<Vec<u8>> {
        Ok(self.canonical.clone())
    }
}

use anyhow::Result;
use async_trait::async_trait;

use super::MockSigner;
use crate::traits::Signer;
use crate::types::{Address20, Root32, Signature};

/// Enum representing all possible signer implementations.
pub enum SignerVariant {
    Mock(MockSigner),
}

#[async_trait]
impl Signer for SignerVariant {
    fn address(&self) -> Address20 {
        match self {
            SignerVariant::Mock(inner) => inner.address(),
        }
    }

    async fn sign(&self, root: &Root32) -> Result<Signature> {
        match self {
            SignerVariant::Mock(inner) => inner.sign(root).await,
        }
    }
}

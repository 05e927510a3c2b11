use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Address20, Root32, Signature};

/// Signing capability over a root. The core never holds secret material
/// beyond the scope of a `sign` call.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Derived address; also the canonical ordering key for signature sets.
    fn address(&self) -> Address20;

    async fn sign(&self, root: &Root32) -> Result<Signature>;
}

use anyhow::Result;
use tracing::debug;

use crate::error::RootgateError;
use crate::signer::SignerVariant;
use crate::traits::Signer;
use crate::types::{Root32, SignatureSet};

/// Collects threshold signatures over a root from a candidate signer set.
///
/// Candidates are sorted ascending by derived address and deduplicated
/// *before* any signing is attempted, so the on-chain verifier (which also
/// expects ascending order) accepts the set regardless of the order signers
/// were supplied in. Signing stops once the threshold is met; no more
/// signatures are gathered than necessary.
pub struct SignatureCollector {
    signers: Vec<SignerVariant>,
}

impl SignatureCollector {
    pub fn new(mut signers: Vec<SignerVariant>) -> Self {
        signers.sort_by_key(|s| s.address());
        signers.dedup_by_key(|s| s.address());
        Self { signers }
    }

    /// Distinct eligible signers available.
    pub fn available(&self) -> usize {
        self.signers.len()
    }

    /// Exactly `threshold` signatures, ascending by signer address.
    pub async fn collect(&self, root: &Root32, threshold: usize) -> Result<SignatureSet> {
        if self.signers.len() < threshold {
            return Err(RootgateError::InsufficientSigners {
                required: threshold,
                available: self.signers.len(),
            }
            .into());
        }

        let mut signatures = Vec::with_capacity(threshold);
        for signer in &self.signers {
            if signatures.len() == threshold {
                break;
            }
            signatures.push(signer.sign(root).await?);
        }

        debug!(
            threshold,
            root = %hex::encode(root),
            "Collected signature set"
        );

        Ok(SignatureSet {
            root: *root,
            signatures,
        })
    }

    /// Single proposer signature (threshold 1), same canonical path as the
    /// owner collection.
    pub async fn collect_proposer(&self, root: &Root32) -> Result<SignatureSet> {
        self.collect(root, 1).await
    }
}

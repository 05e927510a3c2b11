use thiserror::Error;

use crate::types::{AuthStatus, Root32};

/// Domain errors for the proposal and deployment lifecycle.
///
/// Chain-scoped variants carry enough context (chain id, root, leaf index,
/// status) to resume deterministically after a restart.
#[derive(Debug, Error)]
pub enum RootgateError {
    /// A chain contributed zero actions; such chains are dropped from the
    /// proposal rather than padded.
    #[error("chain {chain_id} has no actions to propose")]
    EmptyActionSet { chain_id: u64 },

    /// Owners, threshold, or Safe/module addresses diverge across the chains
    /// of one proposal. Detected before any on-chain submission.
    #[error("chain {chain_id} diverges from proposal configuration: {field}")]
    InconsistentConfiguration { chain_id: u64, field: &'static str },

    /// Fewer distinct eligible signers than the required threshold.
    #[error("need {required} signers, only {available} available")]
    InsufficientSigners { required: usize, available: usize },

    /// Local expected next leaf index disagrees with on-chain reported
    /// progress. The safe response is to re-query state and recompute the
    /// next expected leaf, never a blind resubmission.
    #[error(
        "chain {chain_id} state desync for root {}: expected leaf {expected}, chain reports {reported} (status {status:?})",
        hex::encode(.root)
    )]
    StateDesync {
        chain_id: u64,
        root: Root32,
        expected: u64,
        reported: u64,
        status: AuthStatus,
    },

    /// A submitted leaf was rejected by the Authorization contract.
    #[error("chain {chain_id} rejected {kind} leaf {index}: {reason}")]
    LeafRejected {
        chain_id: u64,
        kind: &'static str,
        index: u64,
        reason: String,
    },

    /// An EXECUTE leaf reverted; `executed` of `total` leaves landed before
    /// the halt. Resumable via re-invocation.
    #[error("chain {chain_id} execute leaf {index} reverted after {executed}/{total} leaves")]
    LeafReverted {
        chain_id: u64,
        index: u64,
        executed: u64,
        total: u64,
    },

    /// Collaborator failure (RPC unreachable, estimator error) with chain
    /// context attached.
    #[error("chain {chain_id} collaborator failure: {source}")]
    Collaborator {
        chain_id: u64,
        #[source]
        source: anyhow::Error,
    },
}

impl RootgateError {
    /// Chain this error is scoped to, if any. Proposal-scoped errors
    /// (insufficient signers during pre-flight aside) abort before any
    /// network effect; chain-scoped errors never abort sibling chains.
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            RootgateError::EmptyActionSet { chain_id }
            | RootgateError::InconsistentConfiguration { chain_id, .. }
            | RootgateError::StateDesync { chain_id, .. }
            | RootgateError::LeafRejected { chain_id, .. }
            | RootgateError::LeafReverted { chain_id, .. }
            | RootgateError::Collaborator { chain_id, .. } => Some(*chain_id),
            RootgateError::InsufficientSigners { .. } => None,
        }
    }
}

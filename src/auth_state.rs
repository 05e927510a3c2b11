use anyhow::Result;

use crate::error::RootgateError;
use crate::types::{AuthState, AuthStatus, LeafType, LeafWithProof, Root32};

/// Per-chain projection over the Authorization contract's state.
///
/// The machine never mutates anything itself; it decides, from a freshly
/// queried `AuthState`, which leaf must be submitted next, and it validates
/// the state the chain reports after each submission. The guard that the
/// next leaf's index equals the chain-reported `leafs_executed` makes every
/// submission idempotent at the orchestration layer: a restart re-queries
/// state and resumes instead of resubmitting.
pub struct AuthStateMachine {
    chain_id: u64,
    root: Root32,
    /// SETUP/PROPOSE/APPROVE leaves, index order.
    auth_leaves: Vec<LeafWithProof>,
}

impl AuthStateMachine {
    pub fn new(chain_id: u64, root: Root32, chain_leaves: &[LeafWithProof]) -> Self {
        let mut auth_leaves: Vec<LeafWithProof> = chain_leaves
            .iter()
            .filter(|l| l.leaf.leaf_type != LeafType::Execute)
            .cloned()
            .collect();
        auth_leaves.sort_by_key(|l| l.leaf.index);
        Self {
            chain_id,
            root,
            auth_leaves,
        }
    }

    /// Whether this chain's sequence starts with a SETUP leaf.
    pub fn has_setup(&self) -> bool {
        self.auth_leaves
            .first()
            .map(|l| l.leaf.leaf_type == LeafType::Setup)
            .unwrap_or(false)
    }

    /// The leaf that must be submitted next given the chain's reported
    /// state, or None once the authorization is COMPLETED.
    ///
    /// Any disagreement between the reported progress and the local leaf
    /// sequence is `StateDesync`, never a blind resubmission.
    pub fn next_step(&self, state: &AuthState) -> Result<Option<&LeafWithProof>> {
        if state.status == AuthStatus::Completed {
            return Ok(None);
        }

        let expected = state.leafs_executed;
        let next = self
            .auth_leaves
            .iter()
            .find(|l| l.leaf.index == expected)
            .ok_or(RootgateError::StateDesync {
                chain_id: self.chain_id,
                root: self.root,
                expected,
                reported: state.leafs_executed,
                status: state.status,
            })?;

        let legal = match (state.status, next.leaf.leaf_type) {
            (AuthStatus::Empty, LeafType::Setup) => next.leaf.index == 0,
            (AuthStatus::Empty, LeafType::Propose) => !self.has_setup(),
            (AuthStatus::Setup, LeafType::Propose) => true,
            (AuthStatus::Proposed, LeafType::Approve) => true,
            _ => false,
        };
        if !legal {
            return Err(RootgateError::StateDesync {
                chain_id: self.chain_id,
                root: self.root,
                expected: next.leaf.index,
                reported: state.leafs_executed,
                status: state.status,
            }
            .into());
        }

        Ok(Some(next))
    }

    /// Status the chain must report after `leaf_type` lands.
    pub fn status_after(leaf_type: LeafType) -> AuthStatus {
        match leaf_type {
            LeafType::Setup => AuthStatus::Setup,
            LeafType::Propose => AuthStatus::Proposed,
            LeafType::Approve => AuthStatus::Completed,
            // EXECUTE leaves never touch the auth status.
            LeafType::Execute => AuthStatus::Completed,
        }
    }

    /// Validate the state reported after a submission: status must advance
    /// to the expected value, never regress, and `leafs_executed` must not
    /// exceed `num_leafs` once the total is known.
    pub fn check_response(
        &self,
        prior: &AuthState,
        submitted: LeafType,
        reported: &AuthState,
    ) -> Result<()> {
        let expected_status = Self::status_after(submitted);
        let expected_executed = prior.leafs_executed + 1;

        let regressed = reported.status < prior.status;
        let wrong = reported.status != expected_status
            || reported.leafs_executed != expected_executed
            || (reported.num_leafs > 0 && reported.leafs_executed > reported.num_leafs);

        if regressed || wrong {
            return Err(RootgateError::StateDesync {
                chain_id: self.chain_id,
                root: self.root,
                expected: expected_executed,
                reported: reported.leafs_executed,
                status: reported.status,
            }
            .into());
        }
        Ok(())
    }
}

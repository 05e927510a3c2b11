use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed-size types used across the system.
pub type Root32 = [u8; 32];
pub type Address20 = [u8; 20];

/// Kind of authorized action a leaf encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeafType {
    Setup,
    Propose,
    Approve,
    Execute,
}

impl LeafType {
    /// Single-byte tag used in the leaf hash preimage.
    pub fn tag(&self) -> u8 {
        match self {
            LeafType::Setup => 0,
            LeafType::Propose => 1,
            LeafType::Approve => 2,
            LeafType::Execute => 3,
        }
    }
}

/// One authorized action on one chain, bound to a position in the tree.
///
/// Within a chain, `index` is gapless starting at 0; a SETUP leaf, if
/// present, always sits at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub chain_id: u64,
    pub index: u64,
    pub leaf_type: LeafType,
    /// Action-specific encoded parameters, opaque to the tree.
    pub data: Vec<u8>,
}

/// Single step of a Merkle proof: the sibling hash and which side it sits on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofNode {
    /// True when the sibling is the left operand of the pair hash.
    pub is_left: bool,
    pub sibling: Root32,
}

/// Ordered bottom-up sibling path from a leaf to the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub nodes: Vec<ProofNode>,
}

/// A leaf together with its proof against the proposal root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafWithProof {
    pub leaf: Leaf,
    pub proof: Proof,
}

/// Authorization progress for one (chain, root) pair, mirroring the
/// on-chain Authorization contract record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AuthStatus {
    Empty,
    Setup,
    Proposed,
    /// Terminal.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub root: Root32,
    pub status: AuthStatus,
    pub leafs_executed: u64,
    /// Declared leaf total for the chain; 0 until the PROPOSE leaf lands.
    pub num_leafs: u64,
}

impl AuthState {
    /// State for a root the chain has never seen.
    pub fn empty(root: Root32) -> Self {
        Self {
            root,
            status: AuthStatus::Empty,
            leafs_executed: 0,
            num_leafs: 0,
        }
    }
}

/// One signature over a root, tagged with the signer's derived address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub signer: Address20,
    pub bytes: Vec<u8>,
}

/// Signatures over one root, ascending by signer address, deduplicated,
/// truncated to exactly the required threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSet {
    pub root: Root32,
    pub signatures: Vec<Signature>,
}

impl SignatureSet {
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// Kind of raw operation collected for a chain before leaf encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Deploy,
    Call,
}

/// One collected deploy/call operation, pre-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAction {
    pub kind: ActionKind,
    /// Artifact name resolved through the config provider.
    pub artifact: String,
    /// Encoded call/constructor parameters.
    pub payload: Vec<u8>,
}

/// Per-chain proposal inputs: the collected actions plus the deployment
/// identity shared by every chain in the proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Whether proposer roles still need on-chain registration.
    pub requires_setup: bool,
    pub owners: Vec<Address20>,
    pub threshold: usize,
    pub safe_address: Address20,
    pub module_address: Address20,
    pub project: String,
    pub org_id: String,
}

/// The cross-chain intent: one root, one signature discipline, N chains.
///
/// Immutable once built, except for the identifier attached after optional
/// remote registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRequest {
    pub root: Root32,
    /// Declared leaf count per chain.
    pub chain_status: HashMap<u64, u64>,
    pub project: String,
    pub org_id: String,
    pub owners: Vec<Address20>,
    pub threshold: usize,
    pub safe_address: Address20,
    pub module_address: Address20,
    /// Full leaf+proof set across all chains, tree order.
    pub leaves: Vec<LeafWithProof>,
    /// Assigned by the remote registry; None in dry-run mode.
    pub proposal_id: Option<String>,
}

impl ProposalRequest {
    /// Leaves belonging to one chain, in index order.
    pub fn chain_leaves(&self, chain_id: u64) -> Vec<LeafWithProof> {
        let mut leaves: Vec<LeafWithProof> = self
            .leaves
            .iter()
            .filter(|l| l.leaf.chain_id == chain_id)
            .cloned()
            .collect();
        leaves.sort_by_key(|l| l.leaf.index);
        leaves
    }
}

/// Deployment record status mirroring the on-chain Deployment Manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentStatus {
    Empty,
    Approved,
    Completed,
    Failed,
}

/// Per-chain execution unit: the ordered EXECUTE leaves with gas
/// annotations, keyed by the deployment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentBundle {
    pub chain_id: u64,
    pub root: Root32,
    /// Hash of root and canonical-config URI.
    pub deployment_id: Root32,
    /// Content URI of the full compiled configuration.
    pub config_uri: String,
    pub leaves: Vec<LeafWithProof>,
    /// Per-leaf gas estimates, same order as `leaves`.
    pub gas_estimates: Vec<u64>,
}

/// Outcome of driving one chain through the proposal lifecycle.
#[derive(Debug, Clone)]
pub struct ChainReport {
    pub chain_id: u64,
    pub auth_status: AuthStatus,
    pub leafs_executed: u64,
    pub num_leafs: u64,
    pub deployment_status: Option<DeploymentStatus>,
    pub error: Option<String>,
}

impl ChainReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

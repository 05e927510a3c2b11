use std::collections::HashMap;

use rs_merkle::algorithms::Sha256;
use rs_merkle::Hasher;

use crate::types::{Leaf, LeafWithProof, Proof, ProofNode, Root32};

/// Canonical binary Merkle tree over the full cross-chain leaf set.
///
/// Construction is a pure function of the leaves and their encoding:
/// re-deriving the tree from the same leaves always yields the same root and
/// proofs. Odd levels duplicate their final node so every proof has uniform
/// length; proof nodes record the sibling's side so verification never needs
/// a leaf index.
pub struct MerkleTreeBuilder {
    leaves: Vec<Leaf>,
    hashes: Vec<Root32>,
    position: HashMap<(u64, u64), usize>,
}

impl MerkleTreeBuilder {
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            hashes: Vec::new(),
            position: HashMap::new(),
        }
    }

    /// Leaf hash = H( chain_id || type tag || index || data ).
    #[inline]
    pub fn leaf_hash(leaf: &Leaf) -> Root32 {
        let mut data = Vec::with_capacity(17 + leaf.data.len());
        data.extend_from_slice(&leaf.chain_id.to_be_bytes());
        data.push(leaf.leaf_type.tag());
        data.extend_from_slice(&leaf.index.to_be_bytes());
        data.extend_from_slice(&leaf.data);
        Sha256::hash(&data)
    }

    pub fn add_leaf(&mut self, leaf: Leaf) {
        let hash = Self::leaf_hash(&leaf);
        self.position
            .insert((leaf.chain_id, leaf.index), self.hashes.len());
        self.hashes.push(hash);
        self.leaves.push(leaf);
    }

    pub fn add_leaves(&mut self, leaves: Vec<Leaf>) {
        for leaf in leaves {
            self.add_leaf(leaf);
        }
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// All tree levels bottom-up, each padded to even length by duplicating
    /// the final node.
    fn levels(&self) -> Vec<Vec<Root32>> {
        let mut levels = Vec::new();
        let mut current = self.hashes.clone();

        while current.len() > 1 {
            if current.len() % 2 == 1 {
                current.push(*current.last().unwrap());
            }
            levels.push(current.clone());

            let mut next = Vec::with_capacity(current.len() / 2);
            for pair in current.chunks(2) {
                next.push(hash_pair(&pair[0], &pair[1]));
            }
            current = next;
        }

        levels.push(current);
        levels
    }

    pub fn root(&self) -> Root32 {
        if self.hashes.is_empty() {
            return [0u8; 32];
        }
        *self
            .levels()
            .last()
            .and_then(|l| l.first())
            .expect("levels() yields at least one level for a non-empty tree")
    }

    /// Proof for the leaf at (chain_id, index), if present.
    pub fn prove(&self, chain_id: u64, index: u64) -> Option<Proof> {
        let mut idx = *self.position.get(&(chain_id, index))?;
        let levels = self.levels();

        let mut nodes = Vec::new();
        // Last level is the root alone; no sibling there.
        for level in &levels[..levels.len() - 1] {
            let sibling_idx = idx ^ 1;
            nodes.push(ProofNode {
                is_left: idx % 2 == 1,
                sibling: level[sibling_idx],
            });
            idx /= 2;
        }

        Some(Proof { nodes })
    }

    /// The full leaf set paired with proofs, in tree order.
    pub fn leaves_with_proofs(&self) -> Vec<LeafWithProof> {
        self.leaves
            .iter()
            .map(|leaf| LeafWithProof {
                leaf: leaf.clone(),
                proof: self
                    .prove(leaf.chain_id, leaf.index)
                    .expect("every added leaf has a position"),
            })
            .collect()
    }
}

impl Default for MerkleTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn hash_pair(left: &Root32, right: &Root32) -> Root32 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    Sha256::hash(&buf)
}

/// Recompute the root from a leaf and its sibling path. Validators run this
/// with only (root, leaf, proof), without access to the full leaf set.
pub fn verify_proof(root: &Root32, leaf: &Leaf, proof: &Proof) -> bool {
    let mut cur = MerkleTreeBuilder::leaf_hash(leaf);

    for node in &proof.nodes {
        cur = if node.is_left {
            hash_pair(&node.sibling, &cur)
        } else {
            hash_pair(&cur, &node.sibling)
        };
    }

    &cur == root
}

use ::rootgate::tree::{verify_proof, MerkleTreeBuilder};
use ::rootgate::types::{Leaf, LeafType};

// ===== Test Helper Functions =====

fn leaf(chain_id: u64, index: u64, leaf_type: LeafType, data: &[u8]) -> Leaf {
    Leaf {
        chain_id,
        index,
        leaf_type,
        data: data.to_vec(),
    }
}

fn cross_chain_leaves() -> Vec<Leaf> {
    let mut leaves = Vec::new();
    // Chain 1 with setup, two executes.
    leaves.push(leaf(1, 0, LeafType::Setup, b"setup"));
    leaves.push(leaf(1, 1, LeafType::Propose, b"propose"));
    leaves.push(leaf(1, 2, LeafType::Approve, b"approve"));
    leaves.push(leaf(1, 3, LeafType::Execute, b"deploy-a"));
    leaves.push(leaf(1, 4, LeafType::Execute, b"deploy-b"));
    // Chain 10 without setup, one execute.
    leaves.push(leaf(10, 0, LeafType::Propose, b"propose"));
    leaves.push(leaf(10, 1, LeafType::Approve, b"approve"));
    leaves.push(leaf(10, 2, LeafType::Execute, b"deploy-c"));
    leaves
}

fn build(leaves: Vec<Leaf>) -> MerkleTreeBuilder {
    let mut tree = MerkleTreeBuilder::new();
    tree.add_leaves(leaves);
    tree
}

// ===== Tests =====

#[test]
fn test_identical_leaf_sets_yield_identical_roots_and_proofs() {
    let a = build(cross_chain_leaves());
    let b = build(cross_chain_leaves());

    assert_eq!(a.root(), b.root(), "Roots must be deterministic");
    assert_eq!(
        a.leaves_with_proofs(),
        b.leaves_with_proofs(),
        "Proofs must be deterministic"
    );
}

#[test]
fn test_every_leaf_verifies_against_root() {
    let tree = build(cross_chain_leaves());
    let root = tree.root();

    for lwp in tree.leaves_with_proofs() {
        assert!(
            verify_proof(&root, &lwp.leaf, &lwp.proof),
            "Leaf (chain {}, index {}) must verify",
            lwp.leaf.chain_id,
            lwp.leaf.index
        );
    }
}

#[test]
fn test_mutated_leaf_byte_breaks_verification() {
    let tree = build(cross_chain_leaves());
    let root = tree.root();

    for lwp in tree.leaves_with_proofs() {
        let mut mutated = lwp.leaf.clone();
        if mutated.data.is_empty() {
            mutated.data.push(0xff);
        } else {
            mutated.data[0] ^= 0x01;
        }
        assert!(
            !verify_proof(&root, &mutated, &lwp.proof),
            "Mutated leaf (chain {}, index {}) must fail",
            lwp.leaf.chain_id,
            lwp.leaf.index
        );
    }
}

#[test]
fn test_mutated_proof_byte_breaks_verification() {
    let tree = build(cross_chain_leaves());
    let root = tree.root();

    for lwp in tree.leaves_with_proofs() {
        for level in 0..lwp.proof.nodes.len() {
            let mut mutated = lwp.proof.clone();
            mutated.nodes[level].sibling[0] ^= 0x01;
            assert!(
                !verify_proof(&root, &lwp.leaf, &mutated),
                "Mutated proof level {} for (chain {}, index {}) must fail",
                level,
                lwp.leaf.chain_id,
                lwp.leaf.index
            );
        }
    }
}

#[test]
fn test_flipped_sibling_side_breaks_verification() {
    let tree = build(cross_chain_leaves());
    let root = tree.root();

    let lwp = &tree.leaves_with_proofs()[0];
    let mut mutated = lwp.proof.clone();
    mutated.nodes[0].is_left = !mutated.nodes[0].is_left;
    assert!(!verify_proof(&root, &lwp.leaf, &mutated));
}

#[test]
fn test_proof_lengths_are_uniform() {
    // 8 leaves is a full tree; also check an odd count.
    let tree = build(cross_chain_leaves());
    let lens: Vec<usize> = tree
        .leaves_with_proofs()
        .iter()
        .map(|l| l.proof.nodes.len())
        .collect();
    assert!(lens.windows(2).all(|w| w[0] == w[1]));

    let mut odd = cross_chain_leaves();
    odd.pop();
    let tree = build(odd);
    let root = tree.root();
    let lens: Vec<usize> = tree
        .leaves_with_proofs()
        .iter()
        .map(|l| l.proof.nodes.len())
        .collect();
    assert!(lens.windows(2).all(|w| w[0] == w[1]));
    for lwp in tree.leaves_with_proofs() {
        assert!(verify_proof(&root, &lwp.leaf, &lwp.proof));
    }
}

#[test]
fn test_leaf_order_changes_root() {
    let a = build(cross_chain_leaves());
    let mut reversed = cross_chain_leaves();
    reversed.reverse();
    let b = build(reversed);
    assert_ne!(a.root(), b.root());
}

use anyhow::Result;
use async_trait::async_trait;
use rs_merkle::algorithms::Sha256;
use rs_merkle::Hasher;

use crate::traits::Signer;
use crate::types::{Address20, Root32, Signature};

/// Deterministic signer for tests and local runs.
///
/// Address is derived from the secret, signature bytes from secret and
/// root, so two signers with the same secret are the same identity. The
/// secret is zeroed when the signer is dropped.
pub struct MockSigner {
    secret: Vec<u8>,
    address: Address20,
}

impl MockSigner {
    pub fn new(secret: Vec<u8>) -> Self {
        let address = derive_address(&secret);
        Self { secret, address }
    }
}

fn derive_address(secret: &[u8]) -> Address20 {
    let mut data = b"rootgate-address".to_vec();
    data.extend_from_slice(secret);
    let digest = Sha256::hash(&data);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

#[async_trait]
impl Signer for MockSigner {
    fn address(&self) -> Address20 {
        self.address
    }

    async fn sign(&self, root: &Root32) -> Result<Signature> {
        let mut data = self.secret.clone();
        data.extend_from_slice(root);
        let digest = Sha256::hash(&data);
        data.iter_mut().for_each(|b| *b = 0);
        Ok(Signature {
            signer: self.address,
            bytes: digest.to_vec(),
        })
    }
}

impl Drop for MockSigner {
    fn drop(&mut self) {
        self.secret.iter_mut().for_each(|b| *b = 0);
    }
}

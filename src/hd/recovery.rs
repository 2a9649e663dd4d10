//! Parent private key recovery from a non-hardened child
//!
//! For a normal child, `child_k = parent_k + I_L` and `I_L` depends only on
//! the parent's public key and chain code. Anyone holding the parent's
//! extended public key and any one non-hardened child private key can
//! therefore solve for `parent_k`. Hardened children break the relation
//! because their `I_L` is keyed on the parent scalar itself.
//!
//! This is why extended public keys must never be shared alongside child
//! private keys.

use bitcoin::secp256k1::{Scalar, SecretKey};
use tracing::warn;

use super::node::{child_tweak, Node, PrivateNode, PublicNode};
use crate::crypto::hash::hash160;
use crate::error::{KeyError, Result};
use crate::keys::PrivateKey;

impl PublicNode {
    /// Recover this node's private key: `parent_k = child_k - I_L mod N`
    ///
    /// Fails with [`KeyError::WatchOnlyViolation`] for hardened children and
    /// [`KeyError::FingerprintMismatch`] when `child` does not descend from
    /// this node.
    pub fn crack_private_key(&self, child: &PrivateNode) -> Result<PrivateNode> {
        let child_number = child.child_number();
        warn!(
            fingerprint = %hex::encode(self.fingerprint()),
            child = %child_number,
            "recovering parent private key from a non-hardened child"
        );

        if child_number.is_hardened() {
            return Err(KeyError::WatchOnlyViolation(format!(
                "child {} is hardened, its parent cannot be recovered",
                child_number
            )));
        }
        if child.parent_fingerprint() != self.fingerprint() {
            return Err(KeyError::FingerprintMismatch {
                expected: hex::encode(self.fingerprint()),
                actual: hex::encode(child.parent_fingerprint()),
            });
        }

        let raw = child_number.to_raw().to_be_bytes();
        let (tweak, _) = child_tweak(
            self.chain_code(),
            &[self.meta().public_bytes(), &raw],
            child_number,
        )?;

        let mut negated = SecretKey::from_slice(&tweak.to_be_bytes())
            .map_err(|_| KeyError::InvalidChildIndex(format!("I_L is zero for child {}", child_number)))?
            .negate();
        let parent = child
            .private_key()
            .secret()
            .add_tweak(&Scalar::from(negated))
            .map_err(|_| KeyError::InvalidKeyMaterial("recovered parent key is zero".to_string()));
        negated.non_secure_erase();

        let key = PrivateKey::from_secret(parent?, self.network().clone());
        // Matching fingerprints with a different chain code lands here
        if key.public_key() != self.public_key() {
            let recovered = hash160(&key.public_key().to_bytes(true)?);
            return Err(KeyError::FingerprintMismatch {
                expected: hex::encode(self.fingerprint()),
                actual: hex::encode(&recovered[..4]),
            });
        }

        Ok(PrivateNode::from_parts(self.meta().clone(), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::network::NetworkProfile;
    use std::sync::Arc;

    fn master() -> PrivateNode {
        PrivateNode::from_seed(
            &hex::decode("000102030405060708090a0b0c0d0e0f").unwrap(),
            Arc::new(NetworkProfile::bitcoin_mainnet()),
        )
        .unwrap()
    }

    #[test]
    fn test_recovers_parent() {
        let parent = master().derive_hardened(0).unwrap();
        let child = parent.derive_normal(1).unwrap();
        let recovered = parent.public_copy().crack_private_key(&child).unwrap();
        assert_eq!(recovered, parent);
    }

    #[test]
    fn test_hardened_child_rejected() {
        let parent = master();
        let child = parent.derive_hardened(3).unwrap();
        let err = parent.public_copy().crack_private_key(&child).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WatchOnlyViolation);
    }

    #[test]
    fn test_unrelated_child_rejected() {
        let parent = master();
        let stranger = master().derive_hardened(9).unwrap().derive_normal(0).unwrap();
        let err = parent.public_copy().crack_private_key(&stranger).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FingerprintMismatch);
    }
}

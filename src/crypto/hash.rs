//! Hash Functions
//!
//! SHA-256, SHA-512 based HMACs and Keccak-256 come from the RustCrypto
//! crates; hash160 pairs SHA-256 with the in-crate RIPEMD-160.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

use super::ripemd160::ripemd160;

/// SHA-256 digest
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 applied twice, as used by Base58Check checksums
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Keccak-256 (pre-standard SHA-3 padding, as used by EVM chains)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// HMAC-SHA512 over the concatenation of `parts`
///
/// Returns (I_L, I_R): the left and right 32-byte halves. Callers holding
/// secret material zeroize both halves when done.
pub fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut mac = Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
    for part in parts {
        mac.update(part);
    }
    let mut output = mac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&output[..32]);
    right.copy_from_slice(&output[32..]);
    zeroize::Zeroize::zeroize(output.as_mut_slice());

    (left, right)
}

/// HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

//! BIP-39 Mnemonic Seeds
//!
//! Thin wrapper over the `bip39` crate. The HD layer only needs the 64-byte
//! seed; word lists and PBKDF2 stretching stay inside `bip39`.
//!
//! ## Usage
//!
//! ```ignore
//! let mnemonic = generate_mnemonic(256)?;
//! let seed = mnemonic_to_seed(&mnemonic, "");
//! let master = PrivateNode::from_seed(&*seed, network)?;
//! ```

use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{KeyError, Result};

// ============================================================================
// Mnemonic Generation
// ============================================================================

/// Generate a new random English mnemonic with `strength` bits of entropy
///
/// `strength` must be a multiple of 32 between 128 and 256 (12 to 24 words).
/// Entropy is zeroized after the mnemonic is built.
pub fn generate_mnemonic(strength: usize) -> Result<Mnemonic> {
    if strength % 32 != 0 || !(128..=256).contains(&strength) {
        return Err(KeyError::InvalidKeyMaterial(format!(
            "Mnemonic strength must be a multiple of 32 in 128..=256, got {}",
            strength
        )));
    }

    let mut entropy = [0u8; 32];
    let entropy = &mut entropy[..strength / 8];
    rand::thread_rng().fill_bytes(entropy);
    let result = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| KeyError::InvalidKeyMaterial(format!("Failed to generate mnemonic: {}", e)));
    entropy.zeroize();
    result
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse mnemonic from space-separated words
pub fn parse_mnemonic(words: &str) -> Result<Mnemonic> {
    Mnemonic::parse_in(Language::English, words)
        .map_err(|e| KeyError::DecodeError(format!("Invalid mnemonic: {}", e)))
}

/// Validate mnemonic words (checksum and wordlist)
pub fn validate_mnemonic(words: &str) -> bool {
    Mnemonic::parse_in(Language::English, words).is_ok()
}

// ============================================================================
// BIP-39 Seed Derivation
// ============================================================================

/// Convert mnemonic to 512-bit seed using BIP-39 PBKDF2
///
/// The optional passphrase adds a second factor (the "25th word").
/// Different passphrases produce completely different seeds.
pub fn mnemonic_to_seed(mnemonic: &Mnemonic, passphrase: &str) -> Zeroizing<[u8; 64]> {
    Zeroizing::new(mnemonic.to_seed(passphrase))
}

/// Format mnemonic as numbered word list for display
pub fn format_mnemonic_numbered(mnemonic: &Mnemonic) -> String {
    mnemonic
        .words()
        .enumerate()
        .map(|(i, word)| format!("{:2}. {}", i + 1, word))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Tests
// ============================================================================

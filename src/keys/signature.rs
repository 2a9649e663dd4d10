//! Signature Formats
//!
//! ECDSA signatures leave [`PrivateKey`](super::PrivateKey) in three shapes:
//! DER bytes (optionally Base64), an ASCII-armored signed message, and the
//! raw (r, s, z) triple where z = SHA256(message).
//!
//! Armored layout, with NAME the upper-cased network name:
//!
//! ```text
//! -----BEGIN NAME SIGNED MESSAGE-----
//! <message>
//! -----BEGIN NAME SIGNATURE-----
//! <address>
//! <base64 DER signature>
//! -----END NAME SIGNATURE-----
//! ```

use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::secp256k1::Message;

use crate::crypto::hash::sha256;
use crate::error::{KeyError, Result};

/// ECDSA signature split into r, s and the message digest z
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RszSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub z: [u8; 32],
}

impl RszSignature {
    pub(crate) fn from_signature(signature: &Signature, message: &[u8]) -> Self {
        let compact = signature.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        Self {
            r,
            s,
            z: sha256(message),
        }
    }

    pub(crate) fn to_signature(&self) -> Result<Signature> {
        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);
        Signature::from_compact(&compact)
            .map_err(|e| KeyError::DecodeError(format!("Invalid r/s values: {}", e)))
    }
}

/// Digest signed for a message: SHA256(message)
pub(crate) fn message_digest(message: &[u8]) -> Message {
    Message::from_digest(sha256(message))
}

/// Parse a DER signature, normalizing S to the lower half of the order
pub(crate) fn parse_der(der: &[u8]) -> Result<Signature> {
    let mut signature = Signature::from_der(der)
        .map_err(|e| KeyError::DecodeError(format!("Invalid DER signature: {}", e)))?;
    signature.normalize_s();
    Ok(signature)
}

// ============================================================================
// Armored Messages
// ============================================================================

/// A message, the signer's address and a Base64 DER signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmoredMessage {
    pub message: String,
    pub address: String,
    pub signature: String,
}

impl ArmoredMessage {
    pub fn render(&self, network_name: &str) -> String {
        let name = network_name.to_uppercase();
        format!(
            "-----BEGIN {name} SIGNED MESSAGE-----\n{}\n-----BEGIN {name} SIGNATURE-----\n{}\n{}\n-----END {name} SIGNATURE-----\n",
            self.message, self.address, self.signature
        )
    }

    /// Parse armored text produced for `network_name`
    ///
    /// Lines split on `\n` only, so a `\r` inside the message is part of
    /// what was signed.
    pub fn parse(text: &str, network_name: &str) -> Result<Self> {
        let name = network_name.to_uppercase();
        let lines: Vec<&str> = text.trim().split('\n').collect();
        if lines.len() < 5 {
            return Err(KeyError::DecodeError(format!(
                "Armored message needs at least 5 lines, got {}",
                lines.len()
            )));
        }

        let n = lines.len();
        if lines[0].trim_end_matches('\r') != format!("-----BEGIN {} SIGNED MESSAGE-----", name) {
            return Err(KeyError::DecodeError(
                "Missing signed message header".to_string(),
            ));
        }
        if lines[n - 4].trim_end_matches('\r') != format!("-----BEGIN {} SIGNATURE-----", name) {
            return Err(KeyError::DecodeError("Missing BEGIN signature line".to_string()));
        }
        if lines[n - 1].trim_end_matches('\r') != format!("-----END {} SIGNATURE-----", name) {
            return Err(KeyError::DecodeError("Missing END signature line".to_string()));
        }

        Ok(Self {
            message: lines[1..n - 4].join("\n"),
            address: lines[n - 3].trim().to_string(),
            signature: lines[n - 2].trim().to_string(),
        })
    }
}

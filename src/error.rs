//! Error types for key, address and HD-node operations.
//!
//! Every failure in this crate is local and deterministic: an operation is
//! rejected and nothing is partially mutated. Nothing is retried internally,
//! including the rare `I_L >= N` derivation case, which is reported as
//! [`KeyError::InvalidChildIndex`] so the caller can move to the next index.

use thiserror::Error;

/// Main error type for key material and derivation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Scalar or point of the wrong length, or outside the curve's range
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Base58Check or extended-key checksum failure
    #[error("Checksum mismatch: {0}")]
    ChecksumMismatch(String),

    /// Version byte(s) do not belong to the expected network
    #[error("Network version mismatch on {network}: expected {expected}, got {actual}")]
    NetworkVersionMismatch {
        network: String,
        expected: String,
        actual: String,
    },

    /// A private scalar is required but the key is public-only
    #[error("Watch-only key: {0}")]
    WatchOnlyViolation(String),

    /// The network profile does not declare the required address mode or format
    #[error("{feature} is not supported on {network}")]
    UnsupportedFeature { network: String, feature: String },

    /// Malformed derivation path
    #[error("Invalid derivation path: {0}")]
    InvalidDerivationPath(String),

    /// Child index out of range, or `I_L >= N` for this index
    #[error("Invalid child index: {0}")]
    InvalidChildIndex(String),

    /// Malformed byte layout or text framing
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The key only carries a hash recovered from an address
    #[error("Only the key hash is known: {0}")]
    HashOnlyKey(String),

    /// The child passed to parent-key recovery does not descend from this node
    #[error("Fingerprint mismatch: expected {expected}, got {actual}")]
    FingerprintMismatch { expected: String, actual: String },
}

/// Fieldless discriminant of [`KeyError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidKeyMaterial,
    ChecksumMismatch,
    NetworkVersionMismatch,
    WatchOnlyViolation,
    UnsupportedFeature,
    InvalidDerivationPath,
    InvalidChildIndex,
    DecodeError,
    HashOnlyKey,
    FingerprintMismatch,
}

impl KeyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeyError::InvalidKeyMaterial(_) => ErrorKind::InvalidKeyMaterial,
            KeyError::ChecksumMismatch(_) => ErrorKind::ChecksumMismatch,
            KeyError::NetworkVersionMismatch { .. } => ErrorKind::NetworkVersionMismatch,
            KeyError::WatchOnlyViolation(_) => ErrorKind::WatchOnlyViolation,
            KeyError::UnsupportedFeature { .. } => ErrorKind::UnsupportedFeature,
            KeyError::InvalidDerivationPath(_) => ErrorKind::InvalidDerivationPath,
            KeyError::InvalidChildIndex(_) => ErrorKind::InvalidChildIndex,
            KeyError::DecodeError(_) => ErrorKind::DecodeError,
            KeyError::HashOnlyKey(_) => ErrorKind::HashOnlyKey,
            KeyError::FingerprintMismatch { .. } => ErrorKind::FingerprintMismatch,
        }
    }

    pub(crate) fn unsupported(network: &str, feature: &str) -> Self {
        KeyError::UnsupportedFeature {
            network: network.to_string(),
            feature: feature.to_string(),
        }
    }

    pub(crate) fn version_mismatch(network: &str, expected: &[u8], actual: &[u8]) -> Self {
        KeyError::NetworkVersionMismatch {
            network: network.to_string(),
            expected: hex::encode(expected),
            actual: hex::encode(actual),
        }
    }
}

/// Result type alias for key operations
pub type Result<T> = std::result::Result<T, KeyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeyError::InvalidKeyMaterial("scalar is zero".to_string());
        assert_eq!(err.to_string(), "Invalid key material: scalar is zero");

        let err = KeyError::unsupported("Ethereum Main Net", "base58 addresses");
        assert_eq!(
            err.to_string(),
            "base58 addresses is not supported on Ethereum Main Net"
        );
    }

    #[test]
    fn test_version_mismatch_is_hex() {
        let err = KeyError::version_mismatch("Bitcoin Main Net", &[0x80], &[0xef]);
        assert_eq!(err.kind(), ErrorKind::NetworkVersionMismatch);
        assert!(err.to_string().contains("expected 80, got ef"));
    }
}

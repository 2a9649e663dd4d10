//! Base58Check
//!
//! Encoding and checksum come from the `bitcoin` crate; its errors are split
//! here so a checksum failure can be told apart from a malformed string.

use bitcoin::base58;

use crate::error::{KeyError, Result};

/// Base58 encode `payload || sha256d(payload)[..4]`
pub fn encode_check(payload: &[u8]) -> String {
    base58::encode_check(payload)
}

/// Decode a Base58Check string and return the payload without its checksum
pub fn decode_check(encoded: &str) -> Result<Vec<u8>> {
    base58::decode_check(encoded).map_err(|e| match e {
        base58::Error::IncorrectChecksum(e) => KeyError::ChecksumMismatch(e.to_string()),
        e => KeyError::DecodeError(format!("Invalid base58check string: {}", e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_known_address_payload() {
        // P2PKH of the generator point's compressed encoding
        let mut payload = vec![0x00];
        payload.extend(hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap());
        assert_eq!(encode_check(&payload), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_eq!(decode_check("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").unwrap(), payload);
    }

    #[test]
    fn test_checksum_mismatch() {
        let err = decode_check("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMJ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);
    }

    #[test]
    fn test_invalid_characters() {
        let err = decode_check("0OIl").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        let err = decode_check("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
    }
}

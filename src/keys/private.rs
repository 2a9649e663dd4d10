//! Private keys
//!
//! A [`PrivateKey`] owns a secp256k1 scalar in [1, N-1] and the
//! [`PublicKey`] derived from it. The scalar is erased when the key drops.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bitcoin::secp256k1::{self, SecretKey};
use rand::RngCore;
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

use super::public::PublicKey;
use super::signature::{message_digest, ArmoredMessage, RszSignature};
use crate::crypto::base58;
use crate::crypto::curve::{is_valid_scalar, secp};
use crate::crypto::hash::sha256;
use crate::error::{KeyError, Result};
use crate::network::{AddressMode, NetworkProfile};

/// Secret scalar plus its public key
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: SecretKey,
    public: PublicKey,
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.secret.non_secure_erase();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("secret", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}

impl PrivateKey {
    // ========================================================================
    // Construction
    // ========================================================================

    pub(crate) fn from_secret(secret: SecretKey, network: Arc<NetworkProfile>) -> Self {
        let public = secp256k1::PublicKey::from_secret_key(secp(), &secret);
        Self {
            secret,
            public: PublicKey::from_secp(public, network),
        }
    }

    /// Exactly 32 big-endian bytes in [1, N-1]
    pub fn from_bytes(bytes: &[u8], network: Arc<NetworkProfile>) -> Result<Self> {
        let scalar: &[u8; 32] = bytes.try_into().map_err(|_| {
            KeyError::InvalidKeyMaterial(format!(
                "Private key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        if !is_valid_scalar(scalar) {
            return Err(KeyError::InvalidKeyMaterial(
                "Private key must be in [1, N-1]".to_string(),
            ));
        }
        let secret = SecretKey::from_slice(scalar)
            .map_err(|e| KeyError::InvalidKeyMaterial(format!("Invalid private key: {}", e)))?;
        Ok(Self::from_secret(secret, network))
    }

    pub fn from_hex(hex_str: &str, network: Arc<NetworkProfile>) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str.trim())
                .map_err(|e| KeyError::DecodeError(format!("Invalid private key hex: {}", e)))?,
        );
        Self::from_bytes(&bytes, network)
    }

    /// Small scalar given as an integer; zero is rejected
    ///
    /// Use [`PrivateKey::from_decimal`] or [`PrivateKey::from_hex`] for the
    /// full range.
    pub fn from_u128(value: u128, network: Arc<NetworkProfile>) -> Result<Self> {
        let mut bytes = Zeroizing::new([0u8; 32]);
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self::from_bytes(&bytes[..], network)
    }

    /// Scalar written as a decimal integer, covering the full [1, N-1] range
    pub fn from_decimal(digits: &str, network: Arc<NetworkProfile>) -> Result<Self> {
        let digits = digits.trim();
        if digits.is_empty() {
            return Err(KeyError::DecodeError("Empty decimal private key".to_string()));
        }
        let mut bytes = Zeroizing::new([0u8; 32]);
        for c in digits.chars() {
            let digit = c.to_digit(10).ok_or_else(|| {
                KeyError::DecodeError(format!("Invalid decimal digit '{}' in private key", c))
            })?;
            // bytes = bytes * 10 + digit, big-endian
            let mut carry = digit;
            for byte in bytes.iter_mut().rev() {
                let v = (*byte as u32) * 10 + carry;
                *byte = v as u8;
                carry = v >> 8;
            }
            if carry != 0 {
                return Err(KeyError::InvalidKeyMaterial(
                    "Private key must be in [1, N-1]".to_string(),
                ));
            }
        }
        Self::from_bytes(&bytes[..], network)
    }

    /// Uniform random scalar, resampling anything outside [1, N-1]
    pub fn from_random(network: Arc<NetworkProfile>) -> Self {
        let mut rng = rand::thread_rng();
        let mut bytes = Zeroizing::new([0u8; 32]);
        loop {
            rng.fill_bytes(&mut bytes[..]);
            if !is_valid_scalar(&bytes) {
                continue;
            }
            if let Ok(secret) = SecretKey::from_slice(&bytes[..]) {
                return Self::from_secret(secret, network);
            }
        }
    }

    /// Decode a WIF string: version byte, scalar, optional 0x01 flag
    pub fn from_wif(wif: &str, network: Arc<NetworkProfile>) -> Result<Self> {
        let version = network
            .secret_key()
            .ok_or_else(|| KeyError::unsupported(network.name(), "WIF keys"))?;

        let payload = Zeroizing::new(base58::decode_check(wif.trim())?);
        let scalar = match payload.len() {
            33 => &payload[1..],
            34 if payload[33] == 0x01 => &payload[1..33],
            n => {
                return Err(KeyError::DecodeError(format!(
                    "WIF payload must be 33 or 34 bytes with a 0x01 flag, got {}",
                    n
                )))
            }
        };
        if payload[0] != version {
            return Err(KeyError::version_mismatch(
                network.name(),
                &[version],
                &payload[..1],
            ));
        }
        Self::from_bytes(scalar, network)
    }

    /// SHA256(password || salt)
    ///
    /// One hash round, so the key is only as strong as the password.
    pub fn from_brainwallet(password: &[u8], salt: &[u8], network: Arc<NetworkProfile>) -> Result<Self> {
        warn!("deriving a private key from a brainwallet password");
        let mut data = Zeroizing::new(Vec::with_capacity(password.len() + salt.len()));
        data.extend_from_slice(password);
        data.extend_from_slice(salt);
        let mut digest = sha256(&data);
        let key = Self::from_bytes(&digest, network);
        digest.zeroize();
        key
    }

    // ========================================================================
    // Accessors and Export
    // ========================================================================

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn network(&self) -> &Arc<NetworkProfile> {
        self.public.network()
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }

    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.secret_bytes())
    }

    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.to_bytes()[..]))
    }

    /// Base58Check(secret_key_version || scalar [|| 0x01])
    pub fn to_wif(&self, compressed: bool) -> Result<String> {
        let network = self.network();
        if !network.supports(AddressMode::Base58) {
            return Err(KeyError::unsupported(network.name(), "WIF export"));
        }
        let version = network
            .secret_key()
            .ok_or_else(|| KeyError::unsupported(network.name(), "WIF export"))?;

        let mut payload = Zeroizing::new(Vec::with_capacity(34));
        payload.push(version);
        payload.extend_from_slice(&self.to_bytes()[..]);
        if compressed {
            payload.push(0x01);
        }
        Ok(base58::encode_check(&payload))
    }

    // ========================================================================
    // Signing
    // ========================================================================
    //
    // ECDSA over SHA256(message) with RFC6979 nonces and low-S signatures,
    // so every signing call is deterministic.

    fn sign(&self, message: &[u8]) -> secp256k1::ecdsa::Signature {
        secp().sign_ecdsa(&message_digest(message), &self.secret)
    }

    /// DER-encoded signature
    pub fn sign_der(&self, message: &[u8]) -> Vec<u8> {
        self.sign(message).serialize_der().to_vec()
    }

    /// Base64 of the DER signature
    pub fn sign_base64(&self, message: &[u8]) -> String {
        BASE64.encode(self.sign_der(message))
    }

    /// Armored signed message carrying the compressed Base58 address
    pub fn sign_armored(&self, message: &str) -> Result<String> {
        let armored = ArmoredMessage {
            message: message.to_string(),
            address: self.public.base58_address(true)?,
            signature: self.sign_base64(message.as_bytes()),
        };
        Ok(armored.render(self.network().name()))
    }

    /// (r, s, z) with z = SHA256(message)
    pub fn sign_rsz(&self, message: &[u8]) -> RszSignature {
        RszSignature::from_signature(&self.sign(message), message)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curve::N;
    use crate::error::ErrorKind;

    fn btc() -> Arc<NetworkProfile> {
        Arc::new(NetworkProfile::bitcoin_mainnet())
    }

    #[test]
    fn test_scalar_one_wif() {
        let key = PrivateKey::from_u128(1, btc()).unwrap();
        assert_eq!(
            key.to_wif(true).unwrap(),
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn"
        );
        assert_eq!(
            key.to_wif(false).unwrap(),
            "5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf"
        );
        assert_eq!(
            key.public_key().base58_address(true).unwrap(),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
    }

    #[test]
    fn test_wif_import_both_forms() {
        let network = btc();
        let one = PrivateKey::from_u128(1, network.clone()).unwrap();
        let compressed = PrivateKey::from_wif(
            "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn",
            network.clone(),
        )
        .unwrap();
        let uncompressed =
            PrivateKey::from_wif("5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf", network)
                .unwrap();
        assert_eq!(compressed, one);
        assert_eq!(uncompressed, one);
    }

    #[test]
    fn test_decimal_covers_full_range() {
        let network = btc();
        assert_eq!(
            PrivateKey::from_decimal("1", network.clone()).unwrap(),
            PrivateKey::from_u128(1, network.clone()).unwrap()
        );

        let max = PrivateKey::from_decimal(
            "115792089237316195423570985008687907852837564279074904382605163141518161494336",
            network.clone(),
        )
        .unwrap();
        assert_eq!(
            max.to_hex().as_str(),
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"
        );

        let order = "115792089237316195423570985008687907852837564279074904382605163141518161494337";
        let err = PrivateKey::from_decimal(order, network.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyMaterial);

        let too_wide = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        let err = PrivateKey::from_decimal(too_wide, network.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyMaterial);

        let err = PrivateKey::from_decimal("12a", network.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        let err = PrivateKey::from_decimal("0", network).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyMaterial);
    }

    #[test]
    fn test_wif_wrong_network() {
        let test = Arc::new(NetworkProfile::bitcoin_testnet());
        let err = PrivateKey::from_wif("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn", test)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkVersionMismatch);
    }

    #[test]
    fn test_wif_unsupported_on_evm() {
        let eth = Arc::new(NetworkProfile::ethereum_mainnet());
        let key = PrivateKey::from_u128(1, eth).unwrap();
        assert_eq!(key.to_wif(true).unwrap_err().kind(), ErrorKind::UnsupportedFeature);
    }

    #[test]
    fn test_invalid_scalars_rejected() {
        let network = btc();
        for bytes in [vec![0u8; 32], N.to_vec(), vec![0xff; 32], vec![1u8; 31], vec![1u8; 33]] {
            let err = PrivateKey::from_bytes(&bytes, network.clone()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidKeyMaterial);
        }
        assert!(PrivateKey::from_u128(0, network).is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let network = btc();
        let key = PrivateKey::from_random(network.clone());
        let restored = PrivateKey::from_hex(&key.to_hex(), network).unwrap();
        assert_eq!(restored, key);
    }

    #[test]
    fn test_random_keys_differ() {
        let network = btc();
        let a = PrivateKey::from_random(network.clone());
        let b = PrivateKey::from_random(network);
        assert_ne!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_brainwallet_is_sha256_of_password_and_salt() {
        let key = PrivateKey::from_brainwallet(b"correct horse", b"battery", btc()).unwrap();
        assert_eq!(*key.to_bytes(), sha256(b"correct horsebattery"));
    }

    #[test]
    fn test_der_signature_verifies() {
        let key = PrivateKey::from_u128(0xdead_beef, btc()).unwrap();
        let public = key.public_key();
        let address = public.base58_address(true).unwrap();

        let der = key.sign_der(b"hello");
        assert_eq!(der, key.sign_der(b"hello"));
        assert!(public.verify_der(b"hello", &der, &address).unwrap());
        assert!(!public.verify_der(b"hullo", &der, &address).unwrap());
    }

    #[test]
    fn test_address_mismatch_is_false() {
        let key = PrivateKey::from_u128(7, btc()).unwrap();
        let signature = key.sign_base64(b"hello");
        let other = "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH";
        assert!(!key.public_key().verify_base64(b"hello", &signature, other).unwrap());

        let bech32 = key.public_key().bech32_address(true, 0).unwrap();
        assert!(key.public_key().verify_base64(b"hello", &signature, &bech32).unwrap());
    }

    #[test]
    fn test_armored_roundtrip() {
        let key = PrivateKey::from_u128(42, btc()).unwrap();
        let text = key.sign_armored("first line\nsecond line").unwrap();
        assert!(text.starts_with("-----BEGIN BITCOIN MAIN NET SIGNED MESSAGE-----\n"));
        assert!(key.public_key().verify_armored(&text).unwrap());

        let tampered = text.replace("second line", "second lime");
        assert!(!key.public_key().verify_armored(&tampered).unwrap());
    }

    #[test]
    fn test_rsz_roundtrip() {
        let key = PrivateKey::from_u128(99, btc()).unwrap();
        let address = key.public_key().base58_address(false).unwrap();
        let rsz = key.sign_rsz(b"message");
        assert_eq!(rsz.z, sha256(b"message"));
        assert!(key.public_key().verify_rsz(b"message", &rsz, &address).unwrap());
        assert!(!key.public_key().verify_rsz(b"other", &rsz, &address).unwrap());
    }

    #[test]
    fn test_hash_only_cannot_verify() {
        let key = PrivateKey::from_u128(5, btc()).unwrap();
        let address = key.public_key().base58_address(true).unwrap();
        let watch = PublicKey::from_address(&address, btc()).unwrap();
        let err = watch
            .verify_base64(b"x", &key.sign_base64(b"x"), &address)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HashOnlyKey);
    }
}

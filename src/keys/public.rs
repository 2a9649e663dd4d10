//! Public keys, addresses and scripts
//!
//! A [`PublicKey`] either wraps a curve point or, when parsed from an
//! address, only the hash that address commits to. Digests are computed
//! once at construction: hash160 of both SEC1 forms on Base58/Bech32
//! networks, Keccak-256 of the uncompressed point on EVM networks.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bech32::{segwit, Fe32, Hrp};
use bitcoin::secp256k1;
use std::fmt;
use std::sync::Arc;

use super::point::{parse_sec1, Point};
use super::script;
use super::signature::{message_digest, parse_der, ArmoredMessage, RszSignature};
use crate::crypto::base58;
use crate::crypto::curve::secp;
use crate::crypto::hash::{hash160, keccak256, sha256};
use crate::error::{KeyError, Result};
use crate::network::{AddressMode, NetworkProfile};

/// What a hash-only key's hash commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    /// Base58 pubkey-hash address
    PubkeyHash,
    /// Base58 script-hash address
    ScriptHash,
    /// Bech32 v0, 20-byte program
    WitnessPubkeyHash,
    /// Bech32 v0, 32-byte program
    WitnessScriptHash,
    /// EVM account (last 20 bytes of Keccak-256)
    Account,
}

#[derive(Clone, PartialEq, Eq)]
enum Digests {
    Ripe {
        compressed: [u8; 20],
        uncompressed: [u8; 20],
    },
    Keccak([u8; 32]),
}

#[derive(Clone, PartialEq, Eq)]
enum Repr {
    Point {
        key: secp256k1::PublicKey,
        digests: Digests,
    },
    HashOnly {
        hash: Vec<u8>,
        kind: HashKind,
    },
}

/// Public key bound to a network profile
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    repr: Repr,
    network: Arc<NetworkProfile>,
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Point { key, .. } => f
                .debug_struct("PublicKey")
                .field("key", &hex::encode(key.serialize()))
                .field("network", &self.network.name())
                .finish(),
            Repr::HashOnly { hash, kind } => f
                .debug_struct("PublicKey")
                .field("hash", &hex::encode(hash))
                .field("kind", kind)
                .field("network", &self.network.name())
                .finish(),
        }
    }
}

impl PublicKey {
    // ========================================================================
    // Construction
    // ========================================================================

    pub(crate) fn from_secp(key: secp256k1::PublicKey, network: Arc<NetworkProfile>) -> Self {
        let digests = if network.supports_evm() {
            let uncompressed = key.serialize_uncompressed();
            Digests::Keccak(keccak256(&uncompressed[1..]))
        } else {
            Digests::Ripe {
                compressed: hash160(&key.serialize()),
                uncompressed: hash160(&key.serialize_uncompressed()),
            }
        };
        Self {
            repr: Repr::Point { key, digests },
            network,
        }
    }

    pub fn from_point(point: &Point, network: Arc<NetworkProfile>) -> Result<Self> {
        Ok(Self::from_secp(point.to_secp()?, network))
    }

    /// Compressed (33-byte) or uncompressed (65-byte) SEC1 bytes
    pub fn from_bytes(bytes: &[u8], network: Arc<NetworkProfile>) -> Result<Self> {
        Ok(Self::from_secp(parse_sec1(bytes)?, network))
    }

    pub fn from_hex(hex_str: &str, network: Arc<NetworkProfile>) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| KeyError::DecodeError(format!("Invalid public key hex: {}", e)))?;
        Self::from_bytes(&bytes, network)
    }

    /// Hash-only key recovered from an address string
    ///
    /// No point is known, so anything that needs one (SEC1 export,
    /// verification) fails with [`KeyError::HashOnlyKey`].
    pub fn from_address(address: &str, network: Arc<NetworkProfile>) -> Result<Self> {
        let (hash, kind) = decode_address(address, &network)?;
        Ok(Self {
            repr: Repr::HashOnly { hash, kind },
            network,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn network(&self) -> &Arc<NetworkProfile> {
        &self.network
    }

    pub fn is_hash_only(&self) -> bool {
        matches!(self.repr, Repr::HashOnly { .. })
    }

    /// Kind of hash held by a hash-only key, `None` for full keys
    pub fn hash_kind(&self) -> Option<HashKind> {
        match &self.repr {
            Repr::HashOnly { kind, .. } => Some(*kind),
            Repr::Point { .. } => None,
        }
    }

    pub(crate) fn secp_key(&self) -> Result<&secp256k1::PublicKey> {
        match &self.repr {
            Repr::Point { key, .. } => Ok(key),
            Repr::HashOnly { .. } => Err(self.hash_only_error()),
        }
    }

    pub fn to_bytes(&self, compressed: bool) -> Result<Vec<u8>> {
        let key = self.secp_key()?;
        Ok(if compressed {
            key.serialize().to_vec()
        } else {
            key.serialize_uncompressed().to_vec()
        })
    }

    pub fn to_hex(&self, compressed: bool) -> Result<String> {
        Ok(hex::encode(self.to_bytes(compressed)?))
    }

    pub fn to_point(&self) -> Result<Point> {
        Ok(Point::from_secp(self.secp_key()?))
    }

    /// RIPEMD160(SHA256(SEC1 bytes))
    ///
    /// Hash-only keys return the 20-byte hash they were parsed from.
    pub fn hash160(&self, compressed: bool) -> Result<[u8; 20]> {
        match &self.repr {
            Repr::Point {
                digests:
                    Digests::Ripe {
                        compressed: c,
                        uncompressed: u,
                    },
                ..
            } => Ok(if compressed { *c } else { *u }),
            Repr::Point {
                digests: Digests::Keccak(_),
                ..
            } => Err(KeyError::unsupported(self.network.name(), "hash160 digests")),
            Repr::HashOnly { hash, kind } => match kind {
                HashKind::PubkeyHash | HashKind::ScriptHash | HashKind::WitnessPubkeyHash => {
                    hash20(hash)
                }
                HashKind::WitnessScriptHash | HashKind::Account => Err(KeyError::HashOnlyKey(
                    format!("{:?} hash has no hash160 form", kind),
                )),
            },
        }
    }

    /// Keccak-256 of the uncompressed point (EVM networks only)
    pub fn keccak256(&self) -> Result<[u8; 32]> {
        match &self.repr {
            Repr::Point {
                digests: Digests::Keccak(digest),
                ..
            } => Ok(*digest),
            Repr::Point { .. } => Err(KeyError::unsupported(self.network.name(), "keccak digests")),
            Repr::HashOnly { .. } => Err(self.hash_only_error()),
        }
    }

    // ========================================================================
    // Addresses
    // ========================================================================

    /// Address in the network's preferred mode, compressed, witness v0
    pub fn address(&self) -> Result<String> {
        match self.network.preferred_address_mode() {
            AddressMode::Base58 => self.base58_address(true),
            AddressMode::Bech32 if self.hash_kind() == Some(HashKind::ScriptHash) => {
                self.base58_address(true)
            }
            AddressMode::Bech32 => self.bech32_address(true, 0),
            AddressMode::Hex => self.hex_address(),
        }
    }

    /// Base58Check(version || hash160)
    pub fn base58_address(&self, compressed: bool) -> Result<String> {
        self.require(AddressMode::Base58, "base58 addresses")?;

        let version = if self.hash_kind() == Some(HashKind::ScriptHash) {
            self.network.script_address()
        } else {
            self.network.pubkey_address()
        }
        .ok_or_else(|| KeyError::unsupported(self.network.name(), "base58 version byte"))?;

        let mut payload = Vec::with_capacity(21);
        payload.push(version);
        payload.extend_from_slice(&self.hash160(compressed)?);
        Ok(base58::encode_check(&payload))
    }

    /// Segwit address for `witness_version` (0 to 16) over hash160
    ///
    /// A legacy script hash has no witness form.
    pub fn bech32_address(&self, compressed: bool, witness_version: u8) -> Result<String> {
        self.require(AddressMode::Bech32, "bech32 addresses")?;
        if self.hash_kind() == Some(HashKind::ScriptHash) {
            return Err(KeyError::unsupported(
                self.network.name(),
                "bech32 addresses for P2SH script hashes",
            ));
        }
        let prefix = self
            .network
            .bech32_prefix()
            .ok_or_else(|| KeyError::unsupported(self.network.name(), "bech32 prefix"))?;
        let hrp = Hrp::parse(prefix)
            .map_err(|e| KeyError::DecodeError(format!("Invalid bech32 prefix: {}", e)))?;
        let version = Fe32::try_from(witness_version)
            .ok()
            .filter(|_| witness_version <= 16)
            .ok_or_else(|| {
                KeyError::unsupported(
                    self.network.name(),
                    &format!("witness version {}", witness_version),
                )
            })?;

        let program = match &self.repr {
            Repr::HashOnly {
                hash,
                kind: HashKind::WitnessScriptHash,
            } => hash.clone(),
            _ => self.hash160(compressed)?.to_vec(),
        };

        segwit::encode(hrp, version, &program)
            .map_err(|e| KeyError::DecodeError(format!("Bech32 encoding failed: {}", e)))
    }

    /// "0x" + hex of the last 20 bytes of Keccak-256
    pub fn hex_address(&self) -> Result<String> {
        self.require(AddressMode::Hex, "hexadecimal addresses")?;
        match &self.repr {
            Repr::HashOnly {
                hash,
                kind: HashKind::Account,
            } => Ok(format!("0x{}", hex::encode(hash))),
            _ => Ok(format!("0x{}", hex::encode(&self.keccak256()?[12..]))),
        }
    }

    /// Every address this key answers to on its network
    pub fn candidate_addresses(&self) -> Vec<String> {
        let mut candidates = Vec::new();
        if self.network.supports(AddressMode::Base58) {
            candidates.extend(self.base58_address(true).ok());
            candidates.extend(self.base58_address(false).ok());
        }
        if self.network.supports(AddressMode::Bech32) {
            candidates.extend(self.bech32_address(true, 0).ok());
        }
        if self.network.supports(AddressMode::Hex) {
            candidates.extend(self.hex_address().ok());
        }
        candidates
    }

    // ========================================================================
    // Scripts
    // ========================================================================
    //
    // All script builders return None on EVM networks and when the key
    // does not hold the matching kind of material.

    pub fn p2pk_script(&self) -> Option<Vec<u8>> {
        if self.network.supports_evm() {
            return None;
        }
        let key = self.secp_key().ok()?;
        Some(script::p2pk(key))
    }

    pub fn p2pkh_script(&self) -> Option<Vec<u8>> {
        Some(script::p2pkh(&self.pubkey_hash()?))
    }

    pub fn p2wpkh_script(&self) -> Option<Vec<u8>> {
        Some(script::p2wpkh(&self.pubkey_hash()?))
    }

    pub fn p2sh_script(&self) -> Option<Vec<u8>> {
        match &self.repr {
            Repr::HashOnly {
                hash,
                kind: HashKind::ScriptHash,
            } => Some(script::p2sh(&hash20(hash).ok()?)),
            _ => None,
        }
    }

    pub fn p2wsh_script(&self) -> Option<Vec<u8>> {
        match &self.repr {
            Repr::HashOnly {
                hash,
                kind: HashKind::WitnessScriptHash,
            } => Some(script::p2wsh(&hash32(hash).ok()?)),
            _ => None,
        }
    }

    /// Script matching the preferred address mode
    pub fn script(&self) -> Option<Vec<u8>> {
        match (self.network.preferred_address_mode(), self.hash_kind()) {
            (AddressMode::Hex, _) => None,
            (_, Some(HashKind::ScriptHash)) => self.p2sh_script(),
            (_, Some(HashKind::WitnessScriptHash)) => self.p2wsh_script(),
            (AddressMode::Bech32, _) => self.p2wpkh_script(),
            (AddressMode::Base58, _) => self.p2pkh_script(),
        }
    }

    /// Locking script for any address of `network`; `None` on EVM networks
    pub fn address_script(address: &str, network: Arc<NetworkProfile>) -> Result<Option<Vec<u8>>> {
        if network.supports_evm() {
            return Ok(None);
        }
        let key = Self::from_address(address, network)?;
        Ok(match key.hash_kind() {
            Some(HashKind::PubkeyHash) => key.p2pkh_script(),
            Some(HashKind::ScriptHash) => key.p2sh_script(),
            Some(HashKind::WitnessPubkeyHash) => key.p2wpkh_script(),
            Some(HashKind::WitnessScriptHash) => key.p2wsh_script(),
            Some(HashKind::Account) | None => None,
        })
    }

    // ========================================================================
    // Verification
    // ========================================================================
    //
    // The claimed address must be one of this key's candidate addresses;
    // a mismatch is Ok(false), not an error.

    pub fn verify_der(&self, message: &[u8], der: &[u8], address: &str) -> Result<bool> {
        let key = self.secp_key()?;
        if !self.answers_to(address) {
            return Ok(false);
        }
        let signature = parse_der(der)?;
        Ok(secp()
            .verify_ecdsa(&message_digest(message), &signature, key)
            .is_ok())
    }

    pub fn verify_base64(&self, message: &[u8], signature: &str, address: &str) -> Result<bool> {
        self.secp_key()?;
        let der = BASE64
            .decode(signature.trim())
            .map_err(|e| KeyError::DecodeError(format!("Invalid base64 signature: {}", e)))?;
        self.verify_der(message, &der, address)
    }

    pub fn verify_armored(&self, text: &str) -> Result<bool> {
        self.secp_key()?;
        let armored = ArmoredMessage::parse(text, self.network.name())?;
        self.verify_base64(armored.message.as_bytes(), &armored.signature, &armored.address)
    }

    /// Fails verification if `rsz.z` is not SHA256(message)
    pub fn verify_rsz(&self, message: &[u8], rsz: &RszSignature, address: &str) -> Result<bool> {
        let key = self.secp_key()?;
        if !self.answers_to(address) || rsz.z != sha256(message) {
            return Ok(false);
        }
        let mut signature = rsz.to_signature()?;
        signature.normalize_s();
        Ok(secp()
            .verify_ecdsa(&message_digest(message), &signature, key)
            .is_ok())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn answers_to(&self, address: &str) -> bool {
        self.candidate_addresses().iter().any(|a| a == address)
    }

    fn require(&self, mode: AddressMode, feature: &str) -> Result<()> {
        if self.network.supports(mode) {
            Ok(())
        } else {
            Err(KeyError::unsupported(self.network.name(), feature))
        }
    }

    fn pubkey_hash(&self) -> Option<[u8; 20]> {
        if self.network.supports_evm() {
            return None;
        }
        match self.hash_kind() {
            None | Some(HashKind::PubkeyHash) | Some(HashKind::WitnessPubkeyHash) => {
                self.hash160(true).ok()
            }
            _ => None,
        }
    }

    fn hash_only_error(&self) -> KeyError {
        KeyError::HashOnlyKey(format!(
            "no curve point is known for this {} key",
            self.network.name()
        ))
    }
}

// ============================================================================
// Address Decoding
// ============================================================================

fn decode_address(address: &str, network: &NetworkProfile) -> Result<(Vec<u8>, HashKind)> {
    if network.supports_evm() {
        let digits = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .ok_or_else(|| KeyError::DecodeError(format!("Hex address must start with 0x: {}", address)))?;
        let hash = hex::decode(digits)
            .map_err(|e| KeyError::DecodeError(format!("Invalid hex address: {}", e)))?;
        if hash.len() != 20 {
            return Err(KeyError::DecodeError(format!(
                "Hex address must hold 20 bytes, got {}",
                hash.len()
            )));
        }
        return Ok((hash, HashKind::Account));
    }

    if let Some(prefix) = network.bech32_prefix() {
        if network.supports(AddressMode::Bech32) {
            if let Ok(decoded) = segwit::decode(address) {
                return decode_bech32(decoded, prefix, network);
            }
            let separator = format!("{}1", prefix.to_lowercase());
            if address.to_lowercase().starts_with(&separator) {
                return Err(KeyError::DecodeError(format!(
                    "Invalid bech32 address: {}",
                    address
                )));
            }
        }
    }

    if !network.supports(AddressMode::Base58) {
        return Err(KeyError::unsupported(network.name(), "base58 addresses"));
    }

    let payload = base58::decode_check(address)?;
    if payload.len() != 21 {
        return Err(KeyError::DecodeError(format!(
            "Base58 address payload must be 21 bytes, got {}",
            payload.len()
        )));
    }
    let kind = if Some(payload[0]) == network.pubkey_address() {
        HashKind::PubkeyHash
    } else if Some(payload[0]) == network.script_address() {
        HashKind::ScriptHash
    } else {
        let expected: Vec<u8> = network
            .pubkey_address()
            .into_iter()
            .chain(network.script_address())
            .collect();
        return Err(KeyError::version_mismatch(network.name(), &expected, &payload[..1]));
    };
    Ok((payload[1..].to_vec(), kind))
}

fn decode_bech32(
    (hrp, version, program): (Hrp, Fe32, Vec<u8>),
    prefix: &str,
    network: &NetworkProfile,
) -> Result<(Vec<u8>, HashKind)> {
    if hrp.to_lowercase() != prefix.to_lowercase() {
        return Err(KeyError::version_mismatch(
            network.name(),
            prefix.as_bytes(),
            hrp.to_lowercase().as_bytes(),
        ));
    }
    if version != Fe32::Q {
        return Err(KeyError::unsupported(
            network.name(),
            &format!("witness version {} addresses", version.to_u8()),
        ));
    }
    match program.len() {
        20 => Ok((program, HashKind::WitnessPubkeyHash)),
        32 => Ok((program, HashKind::WitnessScriptHash)),
        n => Err(KeyError::DecodeError(format!(
            "Witness program must be 20 or 32 bytes, got {}",
            n
        ))),
    }
}

fn hash20(hash: &[u8]) -> Result<[u8; 20]> {
    hash.try_into()
        .map_err(|_| KeyError::DecodeError(format!("Expected a 20-byte hash, got {}", hash.len())))
}

fn hash32(hash: &[u8]) -> Result<[u8; 32]> {
    hash.try_into()
        .map_err(|_| KeyError::DecodeError(format!("Expected a 32-byte hash, got {}", hash.len())))
}

// ============================================================================
// Tests
// ============================================================================

//! BIP-32 HD Nodes
//!
//! A node is chain code + depth + parent fingerprint + child number + key.
//! Private and public-only nodes are separate types sharing the [`Node`]
//! trait; [`HdNode`] holds either when the kind is only known at runtime
//! (e.g. after parsing an extended key).
//!
//! ## Derivation
//!
//! ```text
//! normal:   I = HMAC-SHA512(chain_code, serP(parent_pub) || ser32(i))
//! hardened: I = HMAC-SHA512(chain_code, 0x00 || ser256(k) || ser32(i + 2^31))
//! child_k = (I_L + k) mod N        child_P = I_L*G + P
//! ```
//!
//! If `I_L >= N` (or the child key is zero/infinity) the index is invalid
//! and [`KeyError::InvalidChildIndex`] is returned; moving on to the next
//! index is up to the caller.

use bip39::Mnemonic;
use bitcoin::secp256k1::{self, Scalar};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use zeroize::{Zeroize, Zeroizing};

use super::path::{ChildNumber, DerivationPath};
use super::xkey;
use crate::crypto::curve::secp;
use crate::crypto::hash::{hash160, hmac_sha256, hmac_sha512};
use crate::crypto::mnemonic::{generate_mnemonic, mnemonic_to_seed, parse_mnemonic};
use crate::error::{KeyError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::network::NetworkProfile;

/// HMAC key for master node generation
const BITCOIN_SEED: &[u8] = b"Bitcoin seed";

/// Rounds of HMAC-SHA256 used to stretch a brainwallet password
const BRAINWALLET_ROUNDS: usize = 50_000;

// ============================================================================
// Node Metadata
// ============================================================================

/// Position of a node in the tree plus its public identity
#[derive(Clone, PartialEq, Eq)]
pub struct NodeMeta {
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: ChildNumber,
    public_bytes: [u8; 33],
    identifier: [u8; 20],
}

impl NodeMeta {
    /// Fails if a depth-0 node claims a parent or a child number
    pub(crate) fn new(
        chain_code: [u8; 32],
        depth: u8,
        parent_fingerprint: [u8; 4],
        child_number: ChildNumber,
        public: &secp256k1::PublicKey,
    ) -> Result<Self> {
        if depth == 0 && (parent_fingerprint != [0; 4] || child_number.to_raw() != 0) {
            return Err(KeyError::DecodeError(format!(
                "master node must have zero parent fingerprint and child number, got {} and {}",
                hex::encode(parent_fingerprint),
                child_number.to_raw()
            )));
        }
        let public_bytes = public.serialize();
        Ok(Self {
            chain_code,
            depth,
            parent_fingerprint,
            child_number,
            public_bytes,
            identifier: hash160(&public_bytes),
        })
    }

    fn master(chain_code: [u8; 32], public: &secp256k1::PublicKey) -> Self {
        let public_bytes = public.serialize();
        Self {
            chain_code,
            depth: 0,
            parent_fingerprint: [0; 4],
            child_number: ChildNumber::Normal(0),
            public_bytes,
            identifier: hash160(&public_bytes),
        }
    }

    fn child(
        &self,
        chain_code: [u8; 32],
        child_number: ChildNumber,
        public: &secp256k1::PublicKey,
    ) -> Self {
        let public_bytes = public.serialize();
        Self {
            chain_code,
            depth: self.depth + 1,
            parent_fingerprint: self.fingerprint(),
            child_number,
            public_bytes,
            identifier: hash160(&public_bytes),
        }
    }

    fn check_depth(&self) -> Result<()> {
        if self.depth == u8::MAX {
            return Err(KeyError::InvalidDerivationPath(
                "depth 255 nodes cannot have children".to_string(),
            ));
        }
        Ok(())
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    /// Compressed SEC1 public key
    pub fn public_bytes(&self) -> &[u8; 33] {
        &self.public_bytes
    }

    /// hash160 of the compressed public key
    pub fn identifier(&self) -> [u8; 20] {
        self.identifier
    }

    /// First 4 bytes of the identifier
    pub fn fingerprint(&self) -> [u8; 4] {
        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&self.identifier[..4]);
        fingerprint
    }
}

impl fmt::Debug for NodeMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMeta")
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_number", &self.child_number)
            .field("fingerprint", &hex::encode(self.fingerprint()))
            .finish()
    }
}

/// I_L as a scalar and I_R as the child chain code
pub(crate) fn child_tweak(
    chain_code: &[u8; 32],
    parts: &[&[u8]],
    child: ChildNumber,
) -> Result<(Scalar, [u8; 32])> {
    let (mut il, ir) = hmac_sha512(chain_code, parts);
    let tweak = Scalar::from_be_bytes(il);
    il.zeroize();
    let tweak = tweak.map_err(|_| {
        KeyError::InvalidChildIndex(format!("I_L >= N for child {}, use the next index", child))
    })?;
    Ok((tweak, ir))
}

// ============================================================================
// Shared Interface
// ============================================================================

/// Read-only view shared by private and public-only nodes
pub trait Node: Sized {
    fn meta(&self) -> &NodeMeta;

    fn public_key(&self) -> &PublicKey;

    /// Non-hardened child `index` (must be < 2^31)
    fn derive_normal(&self, index: u32) -> Result<Self>;

    fn network(&self) -> &Arc<NetworkProfile> {
        self.public_key().network()
    }

    fn chain_code(&self) -> &[u8; 32] {
        self.meta().chain_code()
    }

    fn depth(&self) -> u8 {
        self.meta().depth()
    }

    fn parent_fingerprint(&self) -> [u8; 4] {
        self.meta().parent_fingerprint()
    }

    fn child_number(&self) -> ChildNumber {
        self.meta().child_number()
    }

    fn identifier(&self) -> [u8; 20] {
        self.meta().identifier()
    }

    fn fingerprint(&self) -> [u8; 4] {
        self.meta().fingerprint()
    }

    fn is_master(&self) -> bool {
        self.depth() == 0
    }

    /// Public-only copy holding no private material
    fn public_copy(&self) -> PublicNode {
        PublicNode {
            meta: self.meta().clone(),
            key: self.public_key().clone(),
        }
    }

    /// Public, non-hardened child for a numeric user id
    fn child_for_user(&self, user_id: u32) -> Result<PublicNode> {
        Ok(self.derive_normal(user_id)?.public_copy())
    }

    /// Address in the network's preferred mode
    fn address(&self) -> Result<String> {
        self.public_key().address()
    }

    /// 78-byte public serialization
    fn serialize_public(&self, segwit: bool) -> Result<[u8; 78]> {
        let version = self.network().extended_version(false, segwit)?;
        Ok(*xkey::serialize(self.meta(), version, self.meta().public_bytes()))
    }

    /// Base58Check extended public key (xpub/zpub/...)
    fn to_xpub(&self, segwit: bool) -> Result<String> {
        Ok(xkey::encode(&self.serialize_public(segwit)?))
    }

    /// Hex form of [`Node::serialize_public`]
    fn to_xpub_hex(&self, segwit: bool) -> Result<String> {
        Ok(hex::encode(self.serialize_public(segwit)?))
    }
}

// ============================================================================
// Private Node
// ============================================================================

/// Node holding a private scalar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateNode {
    meta: NodeMeta,
    key: PrivateKey,
}

impl PrivateNode {
    pub(crate) fn from_parts(meta: NodeMeta, key: PrivateKey) -> Self {
        Self { meta, key }
    }

    /// Master node: I = HMAC-SHA512("Bitcoin seed", seed)
    ///
    /// BIP-32 asks for 16 to 64 bytes; other lengths are accepted with a
    /// warning.
    pub fn from_seed(seed: &[u8], network: Arc<NetworkProfile>) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            warn!(len = seed.len(), "non-standard seed length");
        }

        let (mut il, ir) = hmac_sha512(BITCOIN_SEED, &[seed]);
        let key = PrivateKey::from_bytes(&il, network);
        il.zeroize();
        let key = key?;

        let meta = NodeMeta::master(ir, key.public_key().secp_key()?);
        debug!(
            network = key.network().name(),
            fingerprint = %hex::encode(meta.fingerprint()),
            "created master node"
        );
        Ok(Self { meta, key })
    }

    /// Master node from a BIP-39 mnemonic and optional passphrase
    pub fn from_mnemonic(words: &str, passphrase: &str, network: Arc<NetworkProfile>) -> Result<Self> {
        let mnemonic = parse_mnemonic(words)?;
        let seed = mnemonic_to_seed(&mnemonic, passphrase);
        Self::from_seed(&seed[..], network)
    }

    /// Fresh mnemonic with `strength` bits of entropy and its master node
    pub fn from_random(
        strength: usize,
        passphrase: &str,
        network: Arc<NetworkProfile>,
    ) -> Result<(Self, Mnemonic)> {
        let mnemonic = generate_mnemonic(strength)?;
        let seed = mnemonic_to_seed(&mnemonic, passphrase);
        let node = Self::from_seed(&seed[..], network)?;
        Ok((node, mnemonic))
    }

    /// Master node from a password stretched with 50,000 rounds of
    /// HMAC-SHA256(key = password), starting from 32 zero bytes
    pub fn from_brainwallet(password: &str, network: Arc<NetworkProfile>) -> Result<Self> {
        warn!("deriving a master node from a brainwallet password");
        let mut data = Zeroizing::new([0u8; 32]);
        for _ in 0..BRAINWALLET_ROUNDS {
            let next = hmac_sha256(password.as_bytes(), &data[..]);
            *data = next;
        }
        Self::from_seed(&data[..], network)
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }

    /// Derive one step, hardened or not
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self> {
        self.meta.check_depth()?;
        let raw = child.to_raw().to_be_bytes();

        let (tweak, chain_code) = if child.is_hardened() {
            let secret = self.key.to_bytes();
            child_tweak(&self.meta.chain_code, &[&[0x00], &secret[..], &raw], child)?
        } else {
            child_tweak(&self.meta.chain_code, &[&self.meta.public_bytes, &raw], child)?
        };

        let secret = self.key.secret().add_tweak(&tweak).map_err(|_| {
            KeyError::InvalidChildIndex(format!("child {} has a zero key, use the next index", child))
        })?;
        let key = PrivateKey::from_secret(secret, self.network().clone());
        let meta = self.meta.child(chain_code, child, key.public_key().secp_key()?);

        debug!(depth = meta.depth, child = %child, "derived private child");
        trace!(public = %hex::encode(meta.public_bytes), "child public key");
        Ok(Self { meta, key })
    }

    /// Hardened child `index + 2^31` (index must be < 2^31)
    pub fn derive_hardened(&self, index: u32) -> Result<Self> {
        self.derive_child(ChildNumber::hardened(index)?)
    }

    /// Apply every step of `path`, stripping to public if the path asks
    pub fn derive_path(&self, path: &DerivationPath) -> Result<HdNode> {
        let node = path
            .steps()
            .iter()
            .try_fold(self.clone(), |node, step| node.derive_child(*step))?;
        Ok(if path.is_public_only() {
            HdNode::Public(node.public_copy())
        } else {
            HdNode::Private(node)
        })
    }

    /// Parse and apply a path string
    pub fn derive_path_str(&self, path: &str) -> Result<HdNode> {
        self.derive_path(&DerivationPath::parse(path)?)
    }

    /// Hardened child 44' (BIP-44 purpose)
    pub fn legacy_child(&self) -> Result<Self> {
        self.derive_hardened(44)
    }

    /// Hardened child 84' (BIP-84 purpose)
    pub fn segwit_child(&self) -> Result<Self> {
        self.derive_hardened(84)
    }

    /// The network's account path template followed by `change/index`
    pub fn derive_account_address(&self, change: u32, index: u32) -> Result<Self> {
        let template = self
            .network()
            .bip32_path()
            .ok_or_else(|| KeyError::unsupported(self.network().name(), "BIP32 path template"))?;
        let path = DerivationPath::parse(template)?.account_address(change, index)?;
        path.steps()
            .iter()
            .try_fold(self.clone(), |node, step| node.derive_child(*step))
    }

    /// 78-byte private serialization; zeroized on drop
    pub fn serialize_private(&self, segwit: bool) -> Result<Zeroizing<[u8; 78]>> {
        let version = self.network().extended_version(true, segwit)?;
        let mut key_data = Zeroizing::new([0u8; 33]);
        key_data[1..].copy_from_slice(&self.key.to_bytes()[..]);
        Ok(xkey::serialize(&self.meta, version, &key_data))
    }

    /// Base58Check extended private key (xprv/zprv/...)
    pub fn to_xprv(&self, segwit: bool) -> Result<String> {
        Ok(xkey::encode(&self.serialize_private(segwit)?[..]))
    }

    pub fn to_xprv_hex(&self, segwit: bool) -> Result<String> {
        Ok(hex::encode(&self.serialize_private(segwit)?[..]))
    }
}

impl Node for PrivateNode {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn public_key(&self) -> &PublicKey {
        self.key.public_key()
    }

    fn derive_normal(&self, index: u32) -> Result<Self> {
        self.derive_child(ChildNumber::normal(index)?)
    }
}

// ============================================================================
// Public Node
// ============================================================================

/// Watch-only node: can derive non-hardened children, never sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicNode {
    meta: NodeMeta,
    key: PublicKey,
}

impl PublicNode {
    pub(crate) fn from_parts(meta: NodeMeta, key: PublicKey) -> Self {
        Self { meta, key }
    }

    /// Non-hardened step; hardened steps need the private scalar
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self> {
        if child.is_hardened() {
            return Err(KeyError::WatchOnlyViolation(format!(
                "hardened child {} needs a private key",
                child
            )));
        }
        self.meta.check_depth()?;
        let raw = child.to_raw().to_be_bytes();
        let (tweak, chain_code) =
            child_tweak(&self.meta.chain_code, &[&self.meta.public_bytes, &raw], child)?;

        let point = self
            .key
            .secp_key()?
            .add_exp_tweak(secp(), &tweak)
            .map_err(|_| {
                KeyError::InvalidChildIndex(format!(
                    "child {} is the point at infinity, use the next index",
                    child
                ))
            })?;
        let meta = self.meta.child(chain_code, child, &point);
        let key = PublicKey::from_secp(point, self.network().clone());

        debug!(depth = meta.depth, child = %child, "derived public child");
        trace!(public = %hex::encode(meta.public_bytes), "child public key");
        Ok(Self { meta, key })
    }

    /// Apply every step of `path`; any hardened step fails
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.steps()
            .iter()
            .try_fold(self.clone(), |node, step| node.derive_child(*step))
    }

    pub fn derive_path_str(&self, path: &str) -> Result<Self> {
        self.derive_path(&DerivationPath::parse(path)?)
    }
}

impl Node for PublicNode {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn public_key(&self) -> &PublicKey {
        &self.key
    }

    fn derive_normal(&self, index: u32) -> Result<Self> {
        self.derive_child(ChildNumber::normal(index)?)
    }
}

// ============================================================================
// Either Kind
// ============================================================================

/// A node whose kind is decided at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HdNode {
    Private(PrivateNode),
    Public(PublicNode),
}

impl HdNode {
    /// Parse a Base58Check or hex extended key for `network`
    pub fn from_extended_key(key: &str, network: Arc<NetworkProfile>) -> Result<Self> {
        let bytes = xkey::decode_str(key)?;
        xkey::parse(&bytes, network)
    }

    /// Parse the raw 78-byte layout
    pub fn from_bytes(bytes: &[u8], network: Arc<NetworkProfile>) -> Result<Self> {
        xkey::parse(bytes, network)
    }

    pub fn is_private(&self) -> bool {
        matches!(self, HdNode::Private(_))
    }

    pub fn as_private(&self) -> Option<&PrivateNode> {
        match self {
            HdNode::Private(node) => Some(node),
            HdNode::Public(_) => None,
        }
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.as_private().map(PrivateNode::private_key)
    }

    /// Require private material, or fail with a watch-only error
    pub fn require_private(&self, operation: &str) -> Result<&PrivateNode> {
        self.as_private().ok_or_else(|| {
            KeyError::WatchOnlyViolation(format!("{} needs a private node", operation))
        })
    }

    pub fn derive_child(&self, child: ChildNumber) -> Result<Self> {
        match self {
            HdNode::Private(node) => node.derive_child(child).map(HdNode::Private),
            HdNode::Public(node) => node.derive_child(child).map(HdNode::Public),
        }
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        match self {
            HdNode::Private(node) => node.derive_path(path),
            HdNode::Public(node) => node.derive_path(path).map(HdNode::Public),
        }
    }

    pub fn derive_path_str(&self, path: &str) -> Result<Self> {
        self.derive_path(&DerivationPath::parse(path)?)
    }

    pub fn to_xprv(&self, segwit: bool) -> Result<String> {
        self.require_private("private key export")?.to_xprv(segwit)
    }

    /// Extended key string, private when available
    pub fn to_extended_key(&self, segwit: bool) -> Result<String> {
        match self {
            HdNode::Private(node) => node.to_xprv(segwit),
            HdNode::Public(node) => node.to_xpub(segwit),
        }
    }
}

impl Node for HdNode {
    fn meta(&self) -> &NodeMeta {
        match self {
            HdNode::Private(node) => node.meta(),
            HdNode::Public(node) => node.meta(),
        }
    }

    fn public_key(&self) -> &PublicKey {
        match self {
            HdNode::Private(node) => node.public_key(),
            HdNode::Public(node) => node.public_key(),
        }
    }

    fn derive_normal(&self, index: u32) -> Result<Self> {
        self.derive_child(ChildNumber::normal(index)?)
    }
}

impl From<PrivateNode> for HdNode {
    fn from(node: PrivateNode) -> Self {
        HdNode::Private(node)
    }
}

impl From<PublicNode> for HdNode {
    fn from(node: PublicNode) -> Self {
        HdNode::Public(node)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn btc() -> Arc<NetworkProfile> {
        Arc::new(NetworkProfile::bitcoin_mainnet())
    }

    fn master() -> PrivateNode {
        PrivateNode::from_seed(&hex::decode(SEED).unwrap(), btc()).unwrap()
    }

    #[test]
    fn test_master_from_seed() {
        let m = master();
        assert_eq!(
            hex::encode(&m.private_key().to_bytes()[..]),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(m.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        assert_eq!(hex::encode(m.fingerprint()), "3442193e");
        assert!(m.is_master());
        assert_eq!(m.parent_fingerprint(), [0; 4]);
    }

    #[test]
    fn test_first_hardened_child() {
        let child = master().derive_hardened(0).unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.child_number(), ChildNumber::Hardened(0));
        assert_eq!(child.child_number().to_raw(), 0x8000_0000);
        assert_eq!(hex::encode(child.parent_fingerprint()), "3442193e");
        assert_eq!(
            hex::encode(child.meta().public_bytes()),
            "035a784662a4a20a65bf6aab9ae98a6c068a81c52e4b032c0fb5400c706cfccc56"
        );
    }

    #[test]
    fn test_public_and_private_derivation_agree() {
        let parent = master().derive_hardened(0).unwrap();
        let public = parent.public_copy();
        for index in [0, 1, 2, 1000, 0x7fff_ffff] {
            let from_private = parent.derive_normal(index).unwrap();
            let from_public = public.derive_normal(index).unwrap();
            assert_eq!(from_private.public_copy(), from_public);
        }
    }

    #[test]
    fn test_hardened_from_public_fails() {
        let public = master().public_copy();
        let err = public.derive_child(ChildNumber::Hardened(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WatchOnlyViolation);

        let err = public.derive_path_str("m/0/1'").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WatchOnlyViolation);
    }

    #[test]
    fn test_index_out_of_range() {
        let m = master();
        assert_eq!(
            m.derive_normal(0x8000_0000).unwrap_err().kind(),
            ErrorKind::InvalidChildIndex
        );
        assert_eq!(
            m.derive_hardened(0x8000_0000).unwrap_err().kind(),
            ErrorKind::InvalidChildIndex
        );
    }

    #[test]
    fn test_path_resolution() {
        let m = master();
        let by_path = m.derive_path_str("m/0'/1").unwrap();
        let by_steps = m.derive_hardened(0).unwrap().derive_normal(1).unwrap();
        assert_eq!(by_path, HdNode::Private(by_steps.clone()));
        assert_eq!(by_path.depth(), 2);

        let public = m.derive_path_str("M/0'/1").unwrap();
        assert!(!public.is_private());
        assert_eq!(public, HdNode::Public(by_steps.public_copy()));
        assert_eq!(m.derive_path_str("m/0'/1.pub").unwrap(), public);

        assert_eq!(m.derive_path_str("m").unwrap(), HdNode::Private(m.clone()));
    }

    #[test]
    fn test_depth_counts_steps() {
        let node = master().derive_path_str("m/1/2/3/4/5").unwrap();
        assert_eq!(node.depth(), 5);
    }

    #[test]
    fn test_depth_limit() {
        let mut node = master();
        for _ in 0..255 {
            node = node.derive_normal(0).unwrap();
        }
        assert_eq!(node.depth(), 255);
        let err = node.derive_normal(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDerivationPath);
        let err = node.public_copy().derive_normal(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDerivationPath);
    }

    #[test]
    fn test_purpose_children() {
        let m = master();
        assert_eq!(m.legacy_child().unwrap().child_number(), ChildNumber::Hardened(44));
        assert_eq!(m.segwit_child().unwrap().child_number(), ChildNumber::Hardened(84));
    }

    #[test]
    fn test_account_address_uses_template() {
        let m = master();
        let node = m.derive_account_address(0, 3).unwrap();
        let expected = m.derive_path_str("m/84'/0'/0'/0/3").unwrap();
        assert_eq!(HdNode::Private(node), expected);

        let doge = PrivateNode::from_seed(&hex::decode(SEED).unwrap(), Arc::new(NetworkProfile::dogecoin_mainnet()))
            .unwrap();
        assert_eq!(doge.derive_account_address(1, 0).unwrap().depth(), 5);
    }

    #[test]
    fn test_child_for_user() {
        let m = master();
        let child = m.child_for_user(7).unwrap();
        assert_eq!(child, m.derive_normal(7).unwrap().public_copy());
        assert!(m.child_for_user(0x8000_0000).is_err());
    }

    #[test]
    fn test_public_copy_equality() {
        let m = master();
        assert_eq!(m.public_copy(), m.public_copy());
        assert_ne!(HdNode::Private(m.clone()), HdNode::Public(m.public_copy()));
    }

    #[test]
    fn test_short_seed_still_works() {
        let node = PrivateNode::from_seed(&[7u8; 8], btc()).unwrap();
        assert!(node.derive_normal(0).is_ok());
    }

    #[test]
    fn test_mnemonic_master_matches_seed() {
        let words = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let node = PrivateNode::from_mnemonic(words, "TREZOR", btc()).unwrap();
        let seed = mnemonic_to_seed(&parse_mnemonic(words).unwrap(), "TREZOR");
        assert_eq!(node, PrivateNode::from_seed(&seed[..], btc()).unwrap());
        assert_eq!(
            node.to_xprv(false).unwrap(),
            "xprv9s21ZrQH143K3h3fDYiay8mocZ3afhfULfb5GX8kCBdno77K4HiA15Tg23wpbeF1pLfs1c5SPmYHrEpTuuRhxMwvKDwqdKiGJS9XFKzUsAF"
        );
    }

    #[test]
    fn test_from_random_returns_matching_mnemonic() {
        let (node, mnemonic) = PrivateNode::from_random(128, "", btc()).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        let again = PrivateNode::from_mnemonic(&mnemonic.to_string(), "", btc()).unwrap();
        assert_eq!(node, again);
    }

    #[test]
    fn test_brainwallet_is_deterministic() {
        let a = PrivateNode::from_brainwallet("hunter2", btc()).unwrap();
        let b = PrivateNode::from_brainwallet("hunter2", btc()).unwrap();
        let c = PrivateNode::from_brainwallet("hunter3", btc()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_master());
    }

    #[test]
    fn test_meta_rejects_orphan_master() {
        let m = master();
        let public = m.public_key().secp_key().unwrap();
        let err = NodeMeta::new([0; 32], 0, [1, 2, 3, 4], ChildNumber::Normal(0), public).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        let err = NodeMeta::new([0; 32], 0, [0; 4], ChildNumber::Normal(3), public).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
    }
}

//! Extended key serialization
//!
//! ```text
//! version(4) || depth(1) || parent_fingerprint(4) || child_number(4)
//!     || chain_code(32) || key_data(33)
//! ```
//!
//! `key_data` is `0x00 || scalar` for private keys and the compressed point
//! for public keys. The 78 bytes travel as Base58Check (111 characters) or
//! as plain hex (156 characters).

use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

use super::node::{HdNode, NodeMeta, PrivateNode, PublicNode};
use super::path::ChildNumber;
use crate::crypto::base58;
use crate::error::{KeyError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::network::NetworkProfile;

/// Serialized length before the Base58Check checksum
pub const XKEY_LEN: usize = 78;

/// Length of the hex form
pub const XKEY_HEX_LEN: usize = XKEY_LEN * 2;

pub(crate) fn serialize(meta: &NodeMeta, version: u32, key_data: &[u8; 33]) -> Zeroizing<[u8; XKEY_LEN]> {
    let mut out = Zeroizing::new([0u8; XKEY_LEN]);
    out[0..4].copy_from_slice(&version.to_be_bytes());
    out[4] = meta.depth();
    out[5..9].copy_from_slice(&meta.parent_fingerprint());
    out[9..13].copy_from_slice(&meta.child_number().to_raw().to_be_bytes());
    out[13..45].copy_from_slice(meta.chain_code());
    out[45..78].copy_from_slice(key_data);
    out
}

pub(crate) fn encode(bytes: &[u8]) -> String {
    base58::encode_check(bytes)
}

/// Raw bytes of a hex or Base58Check extended key string
pub(crate) fn decode_str(key: &str) -> Result<Zeroizing<Vec<u8>>> {
    let key = key.trim();
    if key.len() == XKEY_HEX_LEN && key.bytes().all(|b| b.is_ascii_hexdigit()) {
        let bytes = hex::decode(key)
            .map_err(|e| KeyError::DecodeError(format!("Invalid extended key hex: {}", e)))?;
        return Ok(Zeroizing::new(bytes));
    }
    Ok(Zeroizing::new(base58::decode_check(key)?))
}

pub(crate) fn parse(bytes: &[u8], network: Arc<NetworkProfile>) -> Result<HdNode> {
    if bytes.len() != XKEY_LEN {
        return Err(KeyError::DecodeError(format!(
            "Extended key must be {} bytes, got {}",
            XKEY_LEN,
            bytes.len()
        )));
    }

    let private = match bytes[45] {
        0x00 => true,
        0x02 | 0x03 => false,
        other => {
            return Err(KeyError::DecodeError(format!(
                "Unknown key data prefix 0x{:02x}",
                other
            )))
        }
    };

    let version = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let accepted = network.accepted_versions(private);
    if accepted.is_empty() {
        return Err(KeyError::unsupported(
            network.name(),
            if private {
                "extended private keys"
            } else {
                "extended public keys"
            },
        ));
    }
    if !accepted.contains(&version) {
        let expected: Vec<u8> = accepted.iter().flat_map(|v| v.to_be_bytes()).collect();
        return Err(KeyError::version_mismatch(network.name(), &expected, &bytes[0..4]));
    }

    let depth = bytes[4];
    let mut parent_fingerprint = [0u8; 4];
    parent_fingerprint.copy_from_slice(&bytes[5..9]);
    let child_number =
        ChildNumber::from_raw(u32::from_be_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]));
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&bytes[13..45]);

    let node = if private {
        let key = PrivateKey::from_bytes(&bytes[46..78], network)?;
        let meta = NodeMeta::new(
            chain_code,
            depth,
            parent_fingerprint,
            child_number,
            key.public_key().secp_key()?,
        )?;
        HdNode::Private(PrivateNode::from_parts(meta, key))
    } else {
        let key = PublicKey::from_bytes(&bytes[45..78], network)?;
        let meta = NodeMeta::new(
            chain_code,
            depth,
            parent_fingerprint,
            child_number,
            key.secp_key()?,
        )?;
        HdNode::Public(PublicNode::from_parts(meta, key))
    };

    debug!(depth, private, "parsed extended key");
    Ok(node)
}

//! Locking scripts for Bitcoin-style chains
//!
//! Thin wrappers over `bitcoin::ScriptBuf` that return raw script bytes.

use bitcoin::hashes::Hash;
use bitcoin::secp256k1;
use bitcoin::{PubkeyHash, ScriptBuf, ScriptHash, WPubkeyHash, WScriptHash};

/// <33-byte pubkey> OP_CHECKSIG
pub fn p2pk(pubkey: &secp256k1::PublicKey) -> Vec<u8> {
    ScriptBuf::new_p2pk(&bitcoin::PublicKey::new(*pubkey)).into_bytes()
}

/// OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(*pubkey_hash)).into_bytes()
}

/// OP_HASH160 <20> OP_EQUAL
pub fn p2sh(script_hash: &[u8; 20]) -> Vec<u8> {
    ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(*script_hash)).into_bytes()
}

/// OP_0 <20>
pub fn p2wpkh(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    ScriptBuf::new_p2wpkh(&WPubkeyHash::from_byte_array(*pubkey_hash)).into_bytes()
}

/// OP_0 <32>
pub fn p2wsh(script_hash: &[u8; 32]) -> Vec<u8> {
    ScriptBuf::new_p2wsh(&WScriptHash::from_byte_array(*script_hash)).into_bytes()
}

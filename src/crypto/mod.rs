//! Cryptographic Primitives
//!
//! This module provides the building blocks the key and HD layers sit on:
//!
//! - **curve**: secp256k1 domain parameters and scalar range checks
//! - **ripemd160**: self-contained RIPEMD-160
//! - **hash**: SHA-256, hash160, Keccak-256 and HMAC helpers
//! - **base58**: Base58Check with distinct checksum errors
//! - **mnemonic**: BIP-39 seeds

pub mod base58;
pub mod curve;
pub mod hash;
pub mod mnemonic;
pub mod ripemd160;

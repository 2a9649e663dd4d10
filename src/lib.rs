//! HD wallet core: secp256k1 keys, addresses, scripts and BIP-32 derivation.
//!
//! ```ignore
//! use hdcore::{HdNode, Node, NetworkProfile, PrivateNode};
//! use std::sync::Arc;
//!
//! let network = Arc::new(NetworkProfile::bitcoin_mainnet());
//! let master = PrivateNode::from_seed(&seed, network)?;
//! let node = master.derive_path_str("m/84'/0'/0'/0/0")?;
//! println!("{}", node.address()?);
//! ```

pub mod crypto;
pub mod error;
pub mod hd;
pub mod keys;
pub mod network;

pub use error::{ErrorKind, KeyError, Result};
pub use hd::{ChildNumber, DerivationPath, HdNode, Node, PrivateNode, PublicNode};
pub use keys::{HashKind, Point, PrivateKey, PublicKey, RszSignature};
pub use network::{AddressMode, NetworkConfig, NetworkProfile};

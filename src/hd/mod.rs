//! Hierarchical Deterministic Nodes
//!
//! - **node**: [`PrivateNode`], [`PublicNode`], [`HdNode`] and child derivation
//! - **path**: `m/44'/0'/0'/0/5` style derivation paths
//! - **xkey**: 78-byte extended key (de)serialization
//! - **recovery**: parent private key recovery from a non-hardened child
//!
//! ## Usage
//!
//! ```ignore
//! let network = Arc::new(NetworkProfile::bitcoin_mainnet());
//! let master = PrivateNode::from_mnemonic(words, "", network.clone())?;
//! let account = master.derive_path_str("m/84'/0'/0'")?;
//! let xpub = account.to_xpub(true)?;
//!
//! let watch = HdNode::from_extended_key(&xpub, network)?;
//! let receive = watch.derive_path_str("m/0/0")?.address()?;
//! ```

pub mod node;
pub mod path;
pub mod recovery;
pub mod xkey;

pub use node::{HdNode, Node, NodeMeta, PrivateNode, PublicNode};
pub use path::{ChildNumber, DerivationPath, HARDENED_OFFSET};

//! Key Objects
//!
//! - **point**: affine secp256k1 points and SEC1 encoding
//! - **private**: [`PrivateKey`], WIF and ECDSA signing
//! - **public**: [`PublicKey`], addresses, scripts and verification
//! - **script**: raw locking-script builders
//! - **signature**: (r, s, z) triples and armored message framing

pub mod point;
pub mod private;
pub mod public;
pub mod script;
pub mod signature;

pub use point::Point;
pub use private::PrivateKey;
pub use public::{HashKind, PublicKey};
pub use signature::{ArmoredMessage, RszSignature};

//! secp256k1 Curve Parameters
//!
//! Fixed domain parameters and the range checks the rest of the crate
//! applies before handing bytes to the elliptic-curve backend. Point
//! arithmetic itself is delegated to `bitcoin::secp256k1`.

use bitcoin::secp256k1::{All, Secp256k1};
use std::sync::OnceLock;

/// Field prime P
pub const P: [u8; 32] = hex32("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");

/// Curve coefficient A in y^2 = x^3 + Ax + B
pub const A: u8 = 0;

/// Curve coefficient B in y^2 = x^3 + Ax + B
pub const B: u8 = 7;

/// Group order N
pub const N: [u8; 32] = hex32("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

/// Generator x coordinate
pub const GX: [u8; 32] = hex32("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");

/// Generator y coordinate
pub const GY: [u8; 32] = hex32("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");

/// Cofactor
pub const H: u8 = 1;

/// Shared verification/signing context
///
/// Context creation is expensive, so one instance is built lazily and
/// reused. It holds only precomputed tables and is never mutated.
pub fn secp() -> &'static Secp256k1<All> {
    static CONTEXT: OnceLock<Secp256k1<All>> = OnceLock::new();
    CONTEXT.get_or_init(Secp256k1::new)
}

/// True if the big-endian integer is in [1, N-1]
pub fn is_valid_scalar(bytes: &[u8; 32]) -> bool {
    bytes.iter().any(|b| *b != 0) && *bytes < N
}

/// True if the big-endian integer is >= N
///
/// Used on `I_L` during child derivation, where zero is a legal tweak.
pub fn exceeds_order(bytes: &[u8; 32]) -> bool {
    *bytes >= N
}

const fn hex32(s: &str) -> [u8; 32] {
    let bytes = s.as_bytes();
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < 32 {
        out[i] = (nibble(bytes[2 * i]) << 4) | nibble(bytes[2 * i + 1]);
        i += 1;
    }
    out
}

const fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => panic!("invalid hex digit in curve constant"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::constants;

    #[test]
    fn test_constants_match_backend() {
        assert_eq!(N, constants::CURVE_ORDER);
        assert_eq!(P, constants::FIELD_SIZE);
        assert_eq!(GX, constants::GENERATOR_X);
        assert_eq!(GY, constants::GENERATOR_Y);
    }

    #[test]
    fn test_scalar_range() {
        let mut one = [0u8; 32];
        one[31] = 1;
        assert!(is_valid_scalar(&one));
        assert!(!is_valid_scalar(&[0u8; 32]));
        assert!(!is_valid_scalar(&N));

        let mut n_minus_one = N;
        n_minus_one[31] -= 1;
        assert!(is_valid_scalar(&n_minus_one));
        assert!(!exceeds_order(&n_minus_one));
        assert!(exceeds_order(&N));
        assert!(exceeds_order(&[0xff; 32]));
    }
}

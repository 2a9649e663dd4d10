//! Affine curve points
//!
//! The identity is unrepresentable: every `Point` that leaves this module
//! has been accepted by the secp256k1 backend as a valid public key.

use bitcoin::secp256k1;

use crate::crypto::curve::{GX, GY};
use crate::error::{KeyError, Result};

/// Affine (x, y) point on secp256k1, big-endian coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: [u8; 32],
    pub y: [u8; 32],
}

impl Point {
    /// The generator G
    pub fn generator() -> Self {
        Self { x: GX, y: GY }
    }

    /// Parse a compressed (33-byte) or uncompressed (65-byte) SEC1 encoding
    pub fn from_sec1(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_secp(&parse_sec1(bytes)?))
    }

    /// SEC1 encoding, 33 bytes if `compressed` else 65
    pub fn to_sec1(&self, compressed: bool) -> Vec<u8> {
        if compressed {
            let mut out = Vec::with_capacity(33);
            out.push(if self.y[31] & 1 == 0 { 0x02 } else { 0x03 });
            out.extend_from_slice(&self.x);
            out
        } else {
            let mut out = Vec::with_capacity(65);
            out.push(0x04);
            out.extend_from_slice(&self.x);
            out.extend_from_slice(&self.y);
            out
        }
    }

    pub(crate) fn from_secp(key: &secp256k1::PublicKey) -> Self {
        let raw = key.serialize_uncompressed();
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(&raw[1..33]);
        y.copy_from_slice(&raw[33..65]);
        Self { x, y }
    }

    /// Fails if the coordinates are not on the curve
    pub(crate) fn to_secp(&self) -> Result<secp256k1::PublicKey> {
        parse_sec1(&self.to_sec1(false))
    }
}

pub(crate) fn parse_sec1(bytes: &[u8]) -> Result<secp256k1::PublicKey> {
    if bytes.len() != 33 && bytes.len() != 65 {
        return Err(KeyError::InvalidKeyMaterial(format!(
            "Public key must be 33 or 65 bytes, got {}",
            bytes.len()
        )));
    }
    secp256k1::PublicKey::from_slice(bytes)
        .map_err(|e| KeyError::InvalidKeyMaterial(format!("Invalid public key: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G_COMPRESSED: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn test_generator_sec1() {
        let g = Point::generator();
        assert_eq!(hex::encode(g.to_sec1(true)), G_COMPRESSED);
        assert_eq!(Point::from_sec1(&hex::decode(G_COMPRESSED).unwrap()).unwrap(), g);

        let uncompressed = g.to_sec1(false);
        assert_eq!(uncompressed.len(), 65);
        assert_eq!(Point::from_sec1(&uncompressed).unwrap(), g);
    }

    #[test]
    fn test_off_curve_point_rejected() {
        let mut bad = Point::generator();
        bad.y[31] ^= 1;
        assert!(bad.to_secp().is_err());
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(Point::from_sec1(&[0x02; 32]).is_err());
        assert!(Point::from_sec1(&[]).is_err());
    }
}

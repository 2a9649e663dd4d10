//! BIP-32 derivation paths
//!
//! Paths read `m/44'/0'/0'/0/5`: `m` for a private-capable result, `M` (or a
//! trailing `.pub`) to strip the result to public-only. A segment suffixed
//! with `'`, `h`, `H` or `p` is hardened.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KeyError, Result};

/// First hardened child number (2^31)
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

// ============================================================================
// Child Numbers
// ============================================================================

/// A single derivation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildNumber {
    /// Index in [0, 2^31), derivable from public data
    Normal(u32),
    /// Index in [0, 2^31), stored as index + 2^31
    Hardened(u32),
}

impl ChildNumber {
    pub fn normal(index: u32) -> Result<Self> {
        check_index(index)?;
        Ok(ChildNumber::Normal(index))
    }

    pub fn hardened(index: u32) -> Result<Self> {
        check_index(index)?;
        Ok(ChildNumber::Hardened(index))
    }

    /// Interpret a serialized 32-bit child number
    pub fn from_raw(raw: u32) -> Self {
        if raw >= HARDENED_OFFSET {
            ChildNumber::Hardened(raw - HARDENED_OFFSET)
        } else {
            ChildNumber::Normal(raw)
        }
    }

    /// Child number as serialized and fed to HMAC
    pub fn to_raw(self) -> u32 {
        match self {
            ChildNumber::Normal(index) => index,
            ChildNumber::Hardened(index) => index + HARDENED_OFFSET,
        }
    }

    /// Index without the hardening offset
    pub fn index(self) -> u32 {
        match self {
            ChildNumber::Normal(index) | ChildNumber::Hardened(index) => index,
        }
    }

    pub fn is_hardened(self) -> bool {
        matches!(self, ChildNumber::Hardened(_))
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildNumber::Normal(index) => write!(f, "{}", index),
            ChildNumber::Hardened(index) => write!(f, "{}'", index),
        }
    }
}

fn check_index(index: u32) -> Result<()> {
    if index >= HARDENED_OFFSET {
        return Err(KeyError::InvalidChildIndex(format!(
            "{} is outside [0, 2^31)",
            index
        )));
    }
    Ok(())
}

// ============================================================================
// Derivation Path
// ============================================================================

/// Absolute path from a node to one of its descendants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DerivationPath {
    steps: Vec<ChildNumber>,
    public_only: bool,
}

impl DerivationPath {
    /// Path with the given steps, keeping private material
    pub fn new(steps: Vec<ChildNumber>) -> Self {
        Self {
            steps,
            public_only: false,
        }
    }

    /// Parse `m/...`, `M/...` or `m/....pub`
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();
        if path.is_empty() {
            return Err(KeyError::InvalidDerivationPath("empty path".to_string()));
        }

        let (body, pub_suffix) = match path.strip_suffix(".pub") {
            Some(body) => (body, true),
            None => (path, false),
        };

        let mut segments = body.split('/');
        let public_only = match segments.next() {
            Some("m") => pub_suffix,
            Some("M") => true,
            _ => {
                return Err(KeyError::InvalidDerivationPath(format!(
                    "'{}' must start with m or M",
                    path
                )))
            }
        };

        let steps = segments
            .map(|segment| parse_segment(segment, path))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { steps, public_only })
    }

    pub fn steps(&self) -> &[ChildNumber] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True if the resolved node must be stripped to public-only
    pub fn is_public_only(&self) -> bool {
        self.public_only
    }

    /// Same steps, public-only result
    pub fn to_public(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            public_only: true,
        }
    }

    /// Append one step
    pub fn child(&self, child: ChildNumber) -> Self {
        let mut steps = self.steps.clone();
        steps.push(child);
        Self {
            steps,
            public_only: self.public_only,
        }
    }

    /// Append `change/index` (both non-hardened) to an account path
    pub fn account_address(&self, change: u32, index: u32) -> Result<Self> {
        Ok(self
            .child(ChildNumber::normal(change)?)
            .child(ChildNumber::normal(index)?))
    }
}

fn parse_segment(segment: &str, path: &str) -> Result<ChildNumber> {
    let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H', 'p']) {
        Some(digits) => (digits, true),
        None => (segment, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::InvalidDerivationPath(format!(
            "bad segment '{}' in '{}'",
            segment, path
        )));
    }

    let index: u32 = digits.parse().map_err(|_| {
        KeyError::InvalidChildIndex(format!("{} in '{}' does not fit in 32 bits", digits, path))
    })?;

    if hardened {
        ChildNumber::hardened(index)
    } else {
        ChildNumber::normal(index)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.public_only { "M" } else { "m" })?;
        for step in &self.steps {
            write!(f, "/{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DerivationPath {
    type Error = KeyError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<DerivationPath> for String {
    fn from(path: DerivationPath) -> Self {
        path.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

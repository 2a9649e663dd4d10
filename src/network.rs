//! Network Profiles
//!
//! Per-chain constants consumed by keys and HD nodes: Base58 version bytes,
//! extended-key version bytes, bech32 prefix, default account path and the
//! set of address encodings the chain uses.
//!
//! Profiles are plain values. Nothing here is global: callers build one
//! (from a built-in constructor, a [`NetworkConfig`], or JSON) and share it
//! as `Arc<NetworkProfile>` between every key and node that needs it.
//!
//! ## Usage
//!
//! ```ignore
//! let btc = Arc::new(NetworkProfile::bitcoin_mainnet());
//! let custom = Arc::new(NetworkProfile::from_json(&std::fs::read_to_string(path)?)?);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{KeyError, Result};
use crate::hd::path::DerivationPath;

// ============================================================================
// Address Modes
// ============================================================================

/// Address encodings a network can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AddressMode {
    /// Base58Check(version || hash160)
    Base58,
    /// Segwit bech32(prefix, witness version, program)
    Bech32,
    /// "0x" + last 20 bytes of Keccak-256(uncompressed point)
    Hex,
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressMode::Base58 => write!(f, "BASE58"),
            AddressMode::Bech32 => write!(f, "BECH32"),
            AddressMode::Hex => write!(f, "HEX"),
        }
    }
}

/// Capability set resolved once when the profile is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    preferred: AddressMode,
    base58: bool,
    bech32: bool,
    hex: bool,
}

impl Capabilities {
    fn from_modes(modes: &[AddressMode]) -> Option<Self> {
        let preferred = *modes.first()?;
        Some(Self {
            preferred,
            base58: modes.contains(&AddressMode::Base58),
            bech32: modes.contains(&AddressMode::Bech32),
            hex: modes.contains(&AddressMode::Hex),
        })
    }

    /// The first declared mode, used for default address rendering
    pub fn preferred(&self) -> AddressMode {
        self.preferred
    }

    pub fn supports(&self, mode: AddressMode) -> bool {
        match mode {
            AddressMode::Base58 => self.base58,
            AddressMode::Bech32 => self.bech32,
            AddressMode::Hex => self.hex,
        }
    }
}

// ============================================================================
// Configuration Record
// ============================================================================

/// Raw network constants as supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub coin: String,
    #[serde(default)]
    pub testnet: bool,
    /// Ordered by preference
    pub address_modes: Vec<AddressMode>,
    pub pubkey_address: Option<u8>,
    pub script_address: Option<u8>,
    /// WIF prefix
    pub secret_key: Option<u8>,
    pub ext_public_key: Option<u32>,
    pub ext_secret_key: Option<u32>,
    pub ext_segwit_public_key: Option<u32>,
    pub ext_segwit_secret_key: Option<u32>,
    pub bech32_prefix: Option<String>,
    /// Account-level path template, e.g. "m/44'/0'/0'"
    pub bip32_path: Option<String>,
    #[serde(default)]
    pub supports_evm: bool,
}

// ============================================================================
// Network Profile
// ============================================================================

/// Validated, immutable network profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NetworkConfig", into = "NetworkConfig")]
pub struct NetworkProfile {
    config: NetworkConfig,
    capabilities: Capabilities,
}

impl TryFrom<NetworkConfig> for NetworkProfile {
    type Error = KeyError;

    fn try_from(config: NetworkConfig) -> Result<Self> {
        Self::from_config(config)
    }
}

impl From<NetworkProfile> for NetworkConfig {
    fn from(profile: NetworkProfile) -> Self {
        profile.config
    }
}

impl NetworkProfile {
    /// Validate a configuration record and resolve its capabilities
    pub fn from_config(config: NetworkConfig) -> Result<Self> {
        let invalid = |msg: String| KeyError::DecodeError(format!("{}: {}", config.name, msg));

        let capabilities = Capabilities::from_modes(&config.address_modes)
            .ok_or_else(|| invalid("at least one address mode is required".to_string()))?;

        for (i, mode) in config.address_modes.iter().enumerate() {
            if config.address_modes[..i].contains(mode) {
                return Err(invalid(format!("address mode {} listed twice", mode)));
            }
        }

        if config.supports_evm && (capabilities.base58 || capabilities.bech32) {
            return Err(invalid(
                "EVM networks cannot declare BASE58 or BECH32 addresses".to_string(),
            ));
        }
        if capabilities.hex && !config.supports_evm {
            return Err(invalid("HEX addresses require EVM support".to_string()));
        }
        if capabilities.base58 && config.pubkey_address.is_none() {
            return Err(invalid("BASE58 addresses require a pubkey version byte".to_string()));
        }
        if capabilities.bech32 {
            let prefix = config
                .bech32_prefix
                .as_deref()
                .ok_or_else(|| invalid("BECH32 addresses require a prefix".to_string()))?;
            bech32::Hrp::parse(prefix)
                .map_err(|e| invalid(format!("invalid bech32 prefix '{}': {}", prefix, e)))?;
        }
        if let Some(template) = &config.bip32_path {
            DerivationPath::parse(template.trim_end_matches('/'))
                .map_err(|e| invalid(format!("invalid path template: {}", e)))?;
        }

        Ok(Self {
            config,
            capabilities,
        })
    }

    /// Load a profile from a JSON [`NetworkConfig`]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NetworkConfig = serde_json::from_str(json)
            .map_err(|e| KeyError::DecodeError(format!("Invalid network config JSON: {}", e)))?;
        Self::from_config(config)
    }

    /// Built-in profiles go through the same validation as loaded ones
    fn builtin_checked(config: NetworkConfig) -> Self {
        Self::from_config(config).expect("built-in network profile is valid")
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn coin(&self) -> &str {
        &self.config.coin
    }

    pub fn is_testnet(&self) -> bool {
        self.config.testnet
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn address_modes(&self) -> &[AddressMode] {
        &self.config.address_modes
    }

    pub fn preferred_address_mode(&self) -> AddressMode {
        self.capabilities.preferred
    }

    pub fn supports(&self, mode: AddressMode) -> bool {
        self.capabilities.supports(mode)
    }

    pub fn supports_evm(&self) -> bool {
        self.config.supports_evm
    }

    pub fn pubkey_address(&self) -> Option<u8> {
        self.config.pubkey_address
    }

    pub fn script_address(&self) -> Option<u8> {
        self.config.script_address
    }

    pub fn secret_key(&self) -> Option<u8> {
        self.config.secret_key
    }

    pub fn bech32_prefix(&self) -> Option<&str> {
        self.config.bech32_prefix.as_deref()
    }

    /// Account-level path template without a trailing slash
    pub fn bip32_path(&self) -> Option<&str> {
        self.config
            .bip32_path
            .as_deref()
            .map(|path| path.trim_end_matches('/'))
    }

    /// Extended-key version for (private/public) x (segwit/legacy)
    pub fn extended_version(&self, private: bool, segwit: bool) -> Result<u32> {
        let (version, feature) = match (private, segwit) {
            (true, true) => (
                self.config.ext_segwit_secret_key,
                "segwit private key serialization",
            ),
            (true, false) => (self.config.ext_secret_key, "private key serialization"),
            (false, true) => (
                self.config.ext_segwit_public_key,
                "segwit public key serialization",
            ),
            (false, false) => (self.config.ext_public_key, "public key serialization"),
        };
        version.ok_or_else(|| KeyError::unsupported(self.name(), feature))
    }

    /// Every extended-key version accepted on import for this key type
    pub(crate) fn accepted_versions(&self, private: bool) -> Vec<u32> {
        let candidates = if private {
            [self.config.ext_secret_key, self.config.ext_segwit_secret_key]
        } else {
            [self.config.ext_public_key, self.config.ext_segwit_public_key]
        };
        candidates.into_iter().flatten().collect()
    }

    // ========================================================================
    // Built-in Profiles
    // ========================================================================

    /// Resolve a built-in profile from a short or long name
    pub fn builtin(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "btc" | "bitcoin" | "mainnet" => Ok(Self::bitcoin_mainnet()),
            "btctest" | "bitcoin-testnet" | "testnet" => Ok(Self::bitcoin_testnet()),
            "ltc" | "litecoin" => Ok(Self::litecoin_mainnet()),
            "ltctest" | "litecoin-testnet" => Ok(Self::litecoin_testnet()),
            "doge" | "dogecoin" => Ok(Self::dogecoin_mainnet()),
            "dogetest" | "dogecoin-testnet" => Ok(Self::dogecoin_testnet()),
            "dash" => Ok(Self::dash_mainnet()),
            "dashtest" | "dash-testnet" => Ok(Self::dash_testnet()),
            "bch" | "bitcoin-cash" => Ok(Self::bitcoin_cash_mainnet()),
            "bcy" | "blockcypher-testnet" => Ok(Self::blockcypher_testnet()),
            "omni" | "usdt" => Ok(Self::omni_mainnet()),
            "omnitest" | "omni-testnet" => Ok(Self::omni_testnet()),
            "eth" | "ethereum" => Ok(Self::ethereum_mainnet()),
            _ => Err(KeyError::unsupported(name, "built-in network profile")),
        }
    }

    pub fn bitcoin_mainnet() -> Self {
        Self::builtin_checked(NetworkConfig {
            name: "Bitcoin Main Net".to_string(),
            coin: "BTC".to_string(),
            testnet: false,
            address_modes: vec![AddressMode::Bech32, AddressMode::Base58],
            pubkey_address: Some(0x00),
            script_address: Some(0x05),
            secret_key: Some(0x80),
            ext_public_key: Some(0x0488_b21e),
            ext_secret_key: Some(0x0488_ade4),
            ext_segwit_public_key: Some(0x04b2_4746),
            ext_segwit_secret_key: Some(0x04b2_430c),
            bech32_prefix: Some("bc".to_string()),
            bip32_path: Some("m/84'/0'/0'".to_string()),
            supports_evm: false,
        })
    }

    pub fn bitcoin_testnet() -> Self {
        Self::builtin_checked(NetworkConfig {
            name: "Bitcoin Test Net".to_string(),
            coin: "BTC".to_string(),
            testnet: true,
            address_modes: vec![AddressMode::Bech32, AddressMode::Base58],
            pubkey_address: Some(0x6f),
            script_address: Some(0xc4),
            secret_key: Some(0xef),
            ext_public_key: Some(0x0435_87cf),
            ext_secret_key: Some(0x0435_8394),
            ext_segwit_public_key: Some(0x045f_1cf6),
            ext_segwit_secret_key: Some(0x045f_18bc),
            bech32_prefix: Some("tb".to_string()),
            bip32_path: Some("m/84'/1'/0'".to_string()),
            supports_evm: false,
        })
    }

    pub fn litecoin_mainnet() -> Self {
        Self::base58_only("Litecoin Main Net", "LTC", false, 0x30, 0x05, 0xb0)
            .with_extended(0x0488_b21e, 0x0488_ade4)
            .with_path("m/44'/2'/0'")
    }

    pub fn litecoin_testnet() -> Self {
        Self::base58_only("Litecoin Test Net", "LTC", true, 0x6f, 0xc4, 0xef)
            .with_extended(0x0435_87cf, 0x0435_8394)
            .with_path("m/44'/1'/0'")
    }

    pub fn dogecoin_mainnet() -> Self {
        Self::base58_only("Dogecoin Main Net", "DOGE", false, 0x1e, 0x16, 0x9e)
            .with_extended(0x02fa_cafd, 0x02fa_c398)
            .with_path("m/44'/3'/0'")
    }

    pub fn dogecoin_testnet() -> Self {
        Self::base58_only("Dogecoin Test Net", "DOGE", true, 0x71, 0xc4, 0xf1)
            .with_extended(0x0432_a9a8, 0x0432_a243)
            .with_path("m/44'/1'/0'")
    }

    pub fn dash_mainnet() -> Self {
        Self::base58_only("Dash Main Net", "DASH", false, 0x4c, 0x10, 0xcc)
            .with_extended(0x0488_b21e, 0x0488_ade4)
            .with_path("m/44'/5'/0'")
    }

    pub fn dash_testnet() -> Self {
        Self::base58_only("Dash Test Net", "DASH", true, 0x8c, 0x13, 0xef)
            .with_extended(0x0435_87cf, 0x0435_8394)
            .with_path("m/44'/1'/0'")
    }

    pub fn bitcoin_cash_mainnet() -> Self {
        Self::base58_only("Bitcoin Cash Main Net", "BCH", false, 0x1c, 0x28, 0x80)
            .with_extended(0x0488_b21e, 0x0488_ade4)
            .with_path("m/44'/145'/0'")
    }

    pub fn blockcypher_testnet() -> Self {
        Self::base58_only("BlockCypher Test Net", "BCY", true, 0x1b, 0x1f, 0x49)
            .with_extended(0x02d4_13ff, 0x02d4_0fc3)
            .with_path("m/44'/1'/0'")
    }

    /// Omni layer (USDT) on Bitcoin: Bitcoin version bytes, Base58 only
    pub fn omni_mainnet() -> Self {
        Self::base58_only("Omni Main Net", "USDT", false, 0x00, 0x05, 0x80)
            .with_extended(0x0488_b21e, 0x0488_ade4)
            .with_path("m/44'/0'/0'")
    }

    pub fn omni_testnet() -> Self {
        Self::base58_only("Omni Test Net", "USDT", true, 0x6f, 0xc4, 0xef)
            .with_extended(0x0435_87cf, 0x0435_8394)
            .with_path("m/44'/0'/0'")
    }

    /// Ethereum: Keccak hex addresses, no version bytes, no extended-key
    /// serialization
    pub fn ethereum_mainnet() -> Self {
        Self::builtin_checked(NetworkConfig {
            name: "Ethereum Main Net".to_string(),
            coin: "ETH".to_string(),
            testnet: false,
            address_modes: vec![AddressMode::Hex],
            pubkey_address: None,
            script_address: None,
            secret_key: None,
            ext_public_key: None,
            ext_secret_key: None,
            ext_segwit_public_key: None,
            ext_segwit_secret_key: None,
            bech32_prefix: None,
            bip32_path: Some("m/44'/60'/0'".to_string()),
            supports_evm: true,
        })
    }

    fn base58_only(
        name: &str,
        coin: &str,
        testnet: bool,
        pubkey_address: u8,
        script_address: u8,
        secret_key: u8,
    ) -> Self {
        Self::builtin_checked(NetworkConfig {
            name: name.to_string(),
            coin: coin.to_string(),
            testnet,
            address_modes: vec![AddressMode::Base58],
            pubkey_address: Some(pubkey_address),
            script_address: Some(script_address),
            secret_key: Some(secret_key),
            ext_public_key: None,
            ext_secret_key: None,
            ext_segwit_public_key: None,
            ext_segwit_secret_key: None,
            bech32_prefix: None,
            bip32_path: None,
            supports_evm: false,
        })
    }

    fn with_extended(mut self, public: u32, secret: u32) -> Self {
        self.config.ext_public_key = Some(public);
        self.config.ext_secret_key = Some(secret);
        self
    }

    fn with_path(mut self, path: &str) -> Self {
        self.config.bip32_path = Some(path.to_string());
        self
    }
}

impl fmt::Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config.name)
    }
}

// ============================================================================
// Tests
// ============================================================================

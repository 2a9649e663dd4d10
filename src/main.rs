use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use hdcore::crypto::mnemonic::format_mnemonic_numbered;
use hdcore::{HdNode, Node, NetworkProfile, PrivateKey, PrivateNode, PublicKey};

/// Result from a command, separating explanatory output from copy-paste result
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Explanatory output
    pub output: String,
    /// Clean result for copy-pasting
    pub result: String,
}

#[derive(Parser)]
#[command(name = "hdcore")]
#[command(about = "hdcore - HD wallet keys, addresses and extended keys", long_about = None)]
struct Cli {
    /// Log derivation steps (overrides RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct NetworkArgs {
    /// Built-in network (btc, btctest, ltc, ltctest, doge, dogetest, dash, dashtest, bch, bcy, omni, omnitest, eth)
    #[arg(long, default_value = "btc")]
    network: String,

    /// JSON network config file (overrides --network)
    #[arg(long)]
    network_config: Option<String>,
}

impl NetworkArgs {
    fn load(&self) -> Result<Arc<NetworkProfile>> {
        let profile = match &self.network_config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read network config {}", path))?;
                NetworkProfile::from_json(&json)?
            }
            None => NetworkProfile::builtin(&self.network)?,
        };
        Ok(Arc::new(profile))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a master node from a seed, mnemonic, password or fresh entropy
    Master {
        /// Seed bytes in hex
        #[arg(long, conflicts_with_all = ["mnemonic", "brainwallet"])]
        seed: Option<String>,

        /// BIP-39 mnemonic words
        #[arg(long, conflicts_with = "brainwallet")]
        mnemonic: Option<String>,

        /// Brainwallet password (weak, for testing only)
        #[arg(long)]
        brainwallet: Option<String>,

        /// Mnemonic passphrase
        #[arg(long, default_value = "")]
        passphrase: String,

        /// Entropy bits for a generated mnemonic (128-256, multiple of 32)
        #[arg(long, default_value = "128")]
        strength: usize,

        /// Use segwit extended key versions
        #[arg(long)]
        segwit: bool,

        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Derive a child extended key along a path
    Derive {
        /// Extended key (Base58Check or hex)
        #[arg(long)]
        key: String,

        /// Derivation path, e.g. m/0'/1 or M/0/1
        #[arg(long)]
        path: String,

        #[arg(long)]
        segwit: bool,

        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Show addresses and scripts of an extended key
    Address {
        /// Extended key (Base58Check or hex)
        #[arg(long)]
        key: String,

        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Encode a hex private key as WIF
    Wif {
        /// Private key in hex (32 bytes / 64 hex chars)
        #[arg(long)]
        secret: String,

        /// Export without the compression flag
        #[arg(long)]
        uncompressed: bool,

        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Sign a message, producing an armored signed message
    Sign {
        /// Private key in WIF
        #[arg(long)]
        wif: String,

        /// Message to sign
        #[arg(long, allow_hyphen_values = true)]
        message: String,

        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Verify an armored signed message
    Verify {
        /// Signer public key hex
        #[arg(long)]
        public_key: String,

        /// Armored message text
        #[arg(long, allow_hyphen_values = true)]
        text: String,

        #[command(flatten)]
        network: NetworkArgs,
    },
}

// ============================================================================
// Commands
// ============================================================================

fn master_core(
    seed: Option<&str>,
    mnemonic: Option<&str>,
    brainwallet: Option<&str>,
    passphrase: &str,
    strength: usize,
    segwit: bool,
    network: Arc<NetworkProfile>,
) -> Result<CommandResult> {
    let mut out = String::new();
    out.push_str(&format!("Master Node ({})\n\n", network.name()));
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let master = if let Some(seed_hex) = seed {
        let seed = hex::decode(seed_hex).context("Invalid hex string for seed")?;
        out.push_str(&format!("Seed: {} bytes\n", seed.len()));
        out.push_str("I = HMAC-SHA512(\"Bitcoin seed\", seed)\n");
        PrivateNode::from_seed(&seed, network)?
    } else if let Some(words) = mnemonic {
        out.push_str("Seed from BIP-39 mnemonic (PBKDF2-HMAC-SHA512, 2048 rounds)\n");
        PrivateNode::from_mnemonic(words, passphrase, network)?
    } else if let Some(password) = brainwallet {
        out.push_str("WARNING: brainwallet seeds are only as strong as the password\n");
        out.push_str("Seed: 50,000 rounds of HMAC-SHA256(password)\n");
        PrivateNode::from_brainwallet(password, network)?
    } else {
        let (master, mnemonic) = PrivateNode::from_random(strength, passphrase, network)?;
        out.push_str(&format!("Generated {}-bit mnemonic:\n\n", strength));
        out.push_str(&format_mnemonic_numbered(&mnemonic));
        out.push_str("\n\nWrite these words down. They are the only backup.\n");
        master
    };

    out.push_str(&format!("\nFingerprint: {}\n", hex::encode(master.fingerprint())));
    out.push_str(&format!("Extended public key:\n{}\n", master.to_xpub(segwit)?));

    Ok(CommandResult {
        output: out,
        result: master.to_xprv(segwit)?,
    })
}

fn derive_core(key: &str, path: &str, segwit: bool, network: Arc<NetworkProfile>) -> Result<CommandResult> {
    let node = HdNode::from_extended_key(key, network).context("Failed to parse extended key")?;
    let child = node.derive_path_str(path)?;

    let mut out = String::new();
    out.push_str(&format!("Derived {}\n\n", path));
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out.push_str(&format!("Depth: {}\n", child.depth()));
    out.push_str(&format!("Child number: {}\n", child.child_number()));
    out.push_str(&format!("Parent fingerprint: {}\n", hex::encode(child.parent_fingerprint())));
    out.push_str(&format!("Fingerprint: {}\n", hex::encode(child.fingerprint())));
    out.push_str(&format!("Public key: {}\n", hex::encode(child.meta().public_bytes())));
    out.push_str(&format!("Address: {}\n", child.address()?));

    Ok(CommandResult {
        output: out,
        result: child.to_extended_key(segwit)?,
    })
}

fn address_core(key: &str, network: Arc<NetworkProfile>) -> Result<CommandResult> {
    let node = HdNode::from_extended_key(key, network).context("Failed to parse extended key")?;
    let public = node.public_key();

    let mut out = String::new();
    out.push_str(&format!("Addresses ({})\n\n", public.network().name()));
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    for address in public.candidate_addresses() {
        out.push_str(&format!("  {}\n", address));
    }

    let scripts = [
        ("P2PK", public.p2pk_script()),
        ("P2PKH", public.p2pkh_script()),
        ("P2WPKH", public.p2wpkh_script()),
    ];
    for (name, script) in scripts {
        if let Some(script) = script {
            out.push_str(&format!("{}: {}\n", name, hex::encode(script)));
        }
    }

    Ok(CommandResult {
        output: out,
        result: node.address()?,
    })
}

fn wif_core(secret: &str, uncompressed: bool, network: Arc<NetworkProfile>) -> Result<CommandResult> {
    let key = PrivateKey::from_hex(secret, network)?;

    let mut out = String::new();
    out.push_str("Wallet Import Format\n\n");
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out.push_str(&format!("Compressed: {}\n", !uncompressed));
    out.push_str(&format!(
        "Address: {}\n",
        key.public_key().base58_address(!uncompressed)?
    ));

    Ok(CommandResult {
        output: out,
        result: key.to_wif(!uncompressed)?,
    })
}

fn sign_core(wif: &str, message: &str, network: Arc<NetworkProfile>) -> Result<CommandResult> {
    let key = PrivateKey::from_wif(wif, network)?;

    let mut out = String::new();
    out.push_str("Signed Message\n\n");
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out.push_str("ECDSA over SHA256(message), RFC6979 nonce\n");
    out.push_str(&format!("Public key: {}\n", key.public_key().to_hex(true)?));

    Ok(CommandResult {
        output: out,
        result: key.sign_armored(message)?,
    })
}

fn verify_core(public_key: &str, text: &str, network: Arc<NetworkProfile>) -> Result<CommandResult> {
    let key = PublicKey::from_hex(public_key, network)?;
    let valid = key.verify_armored(text)?;

    let mut out = String::new();
    out.push_str("Signature Verification\n\n");
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out.push_str(if valid {
        "Signature is valid\n"
    } else {
        "Signature is NOT valid\n"
    });

    Ok(CommandResult {
        output: out,
        result: valid.to_string(),
    })
}

fn print_result(cmd_result: CommandResult) {
    println!("{}", cmd_result.output);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Copy this:");
    println!("{}\n", cmd_result.result);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cmd_result = match cli.command {
        Commands::Master {
            seed,
            mnemonic,
            brainwallet,
            passphrase,
            strength,
            segwit,
            network,
        } => master_core(
            seed.as_deref(),
            mnemonic.as_deref(),
            brainwallet.as_deref(),
            &passphrase,
            strength,
            segwit,
            network.load()?,
        )?,
        Commands::Derive {
            key,
            path,
            segwit,
            network,
        } => derive_core(&key, &path, segwit, network.load()?)?,
        Commands::Address { key, network } => address_core(&key, network.load()?)?,
        Commands::Wif {
            secret,
            uncompressed,
            network,
        } => wif_core(&secret, uncompressed, network.load()?)?,
        Commands::Sign {
            wif,
            message,
            network,
        } => sign_core(&wif, &message, network.load()?)?,
        Commands::Verify {
            public_key,
            text,
            network,
        } => verify_core(&public_key, &text, network.load()?)?,
    };

    print_result(cmd_result);
    Ok(())
}

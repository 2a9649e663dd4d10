//! Integration tests against published BIP-32 / BIP-84 vectors

use hdcore::{ChildNumber, ErrorKind, HdNode, Node, NetworkProfile, PrivateNode};
use rand::RngCore;
use std::sync::Arc;

const TV1_SEED: &str = "000102030405060708090a0b0c0d0e0f";

const TV1: &[(&str, &str, &str)] = &[
    (
        "m",
        "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8",
        "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi",
    ),
    (
        "m/0H",
        "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw",
        "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7",
    ),
    (
        "m/0H/1",
        "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ",
        "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs",
    ),
];

fn btc() -> Arc<NetworkProfile> {
    Arc::new(NetworkProfile::bitcoin_mainnet())
}

fn tv1_master() -> PrivateNode {
    PrivateNode::from_seed(&hex::decode(TV1_SEED).unwrap(), btc()).unwrap()
}

#[test]
fn test_vector_1_chain() {
    let master = tv1_master();
    for (path, xpub, xprv) in TV1 {
        let node = master.derive_path_str(path).unwrap();
        assert_eq!(node.to_xprv(false).unwrap(), *xprv, "xprv at {}", path);
        assert_eq!(node.to_xpub(false).unwrap(), *xpub, "xpub at {}", path);
    }
}

#[test]
fn test_vector_1_import() {
    for (path, xpub, xprv) in TV1 {
        let private = HdNode::from_extended_key(xprv, btc()).unwrap();
        let public = HdNode::from_extended_key(xpub, btc()).unwrap();
        assert!(private.is_private());
        assert!(!public.is_private());
        assert_eq!(private.public_copy(), public.public_copy(), "{}", path);
        assert_eq!(private.to_xprv(false).unwrap(), *xprv);
        assert_eq!(public.to_xpub(false).unwrap(), *xpub);
    }
}

#[test]
fn test_vector_1_public_derivation_from_xpub() {
    let (_, parent_xpub, _) = TV1[1];
    let (_, child_xpub, _) = TV1[2];
    let parent = HdNode::from_extended_key(parent_xpub, btc()).unwrap();
    let child = parent.derive_child(ChildNumber::Normal(1)).unwrap();
    assert_eq!(child.to_xpub(false).unwrap(), child_xpub);
}

#[test]
fn test_watch_only_private_export_fails() {
    let (_, xpub, _) = TV1[0];
    let public = HdNode::from_extended_key(xpub, btc()).unwrap();
    assert_eq!(public.to_xprv(false).unwrap_err().kind(), ErrorKind::WatchOnlyViolation);
    assert_eq!(
        public.derive_path_str("m/0H").unwrap_err().kind(),
        ErrorKind::WatchOnlyViolation
    );
}

#[test]
fn test_master_fingerprint_and_first_hardened_address() {
    let master = tv1_master();
    assert_eq!(hex::encode(master.fingerprint()), "3442193e");

    let child = master.derive_hardened(0).unwrap();
    assert_eq!(
        hex::encode(child.public_key().to_bytes(true).unwrap()),
        "035a784662a4a20a65bf6aab9ae98a6c068a81c52e4b032c0fb5400c706cfccc56"
    );
    // Base58 address of the same key is stable across both derivation routes
    let from_xpub = HdNode::from_extended_key(TV1[1].1, btc()).unwrap();
    assert_eq!(
        child.public_key().base58_address(true).unwrap(),
        from_xpub.public_key().base58_address(true).unwrap()
    );
}

#[test]
fn test_bip84_account_and_first_address() {
    let words = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    let master = PrivateNode::from_mnemonic(words, "", btc()).unwrap();

    let account = master.derive_path_str("m/84'/0'/0'").unwrap();
    assert_eq!(
        account.to_xprv(true).unwrap(),
        "zprvAdG4iTXWBoARxkkzNpNh8r6Qag3irQB8PzEMkAFeTRXxHpbF9z4QgEvBRmfvqWvGp42t42nvgGpNgYSJA9iefm1yYNZKEm7z6qUWCroSQnE"
    );
    assert_eq!(
        account.to_xpub(true).unwrap(),
        "zpub6rFR7y4Q2AijBEqTUquhVz398htDFrtymD9xYYfG1m4wAcvPhXNfE3EfH1r1ADqtfSdVCToUG868RvUUkgDKf31mGDtKsAYz2oz2AGutZYs"
    );

    let first = master.derive_account_address(0, 0).unwrap();
    assert_eq!(first.address().unwrap(), "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu");

    // zpub import derives the same receive address without private data
    let watch = HdNode::from_extended_key(&account.to_xpub(true).unwrap(), btc()).unwrap();
    let receive = watch.derive_path_str("m/0/0").unwrap();
    assert_eq!(receive.address().unwrap(), "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu");
}

#[test]
fn test_random_seed_roundtrip() {
    let mut rng = rand::thread_rng();
    for len in [16usize, 32, 64] {
        let mut seed = vec![0u8; len];
        rng.fill_bytes(&mut seed);
        let master = PrivateNode::from_seed(&seed, btc()).unwrap();

        let private = HdNode::from_extended_key(&master.to_xprv(false).unwrap(), btc()).unwrap();
        assert_eq!(private, HdNode::Private(master.clone()));

        let public = HdNode::from_extended_key(&master.to_xpub(false).unwrap(), btc()).unwrap();
        assert_eq!(public, HdNode::Public(master.public_copy()));

        let hex_form = master.to_xprv_hex(true).unwrap();
        let from_hex = HdNode::from_extended_key(&hex_form, btc()).unwrap();
        assert_eq!(from_hex, HdNode::Private(master));
    }
}

#[test]
fn test_public_private_agreement_across_networks() {
    let seed = hex::decode(TV1_SEED).unwrap();
    let networks = [
        NetworkProfile::bitcoin_mainnet(),
        NetworkProfile::bitcoin_testnet(),
        NetworkProfile::litecoin_mainnet(),
        NetworkProfile::dogecoin_testnet(),
        NetworkProfile::dash_mainnet(),
        NetworkProfile::ethereum_mainnet(),
    ];
    for network in networks {
        let network = Arc::new(network);
        let master = PrivateNode::from_seed(&seed, network.clone()).unwrap();
        let public = master.public_copy();
        for index in [0u32, 1, 17, 0x7fff_ffff] {
            let a = master.derive_normal(index).unwrap();
            let b = public.derive_normal(index).unwrap();
            assert_eq!(
                a.public_key().to_bytes(true).unwrap(),
                b.public_key().to_bytes(true).unwrap(),
                "{} child {}",
                network.name(),
                index
            );
            assert_eq!(a.address().unwrap(), b.address().unwrap());
        }
    }
}

#[test]
fn test_segwit_versions_unsupported_on_legacy_network() {
    let doge = Arc::new(NetworkProfile::dogecoin_mainnet());
    let master = PrivateNode::from_seed(&hex::decode(TV1_SEED).unwrap(), doge).unwrap();
    assert!(master.to_xprv(false).unwrap().starts_with("dgpv"));
    assert_eq!(
        master.to_xpub(true).unwrap_err().kind(),
        ErrorKind::UnsupportedFeature
    );
}

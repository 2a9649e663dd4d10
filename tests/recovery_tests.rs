//! Integration tests for parent private key recovery

use hdcore::{ErrorKind, HdNode, Node, NetworkProfile, PrivateNode};
use std::sync::Arc;

fn master(profile: NetworkProfile) -> PrivateNode {
    PrivateNode::from_seed(&[0x5a; 32], Arc::new(profile)).unwrap()
}

#[test]
fn test_crack_recovers_parent_for_many_children() {
    let parent = master(NetworkProfile::bitcoin_mainnet())
        .derive_path_str("m/44'/0'/0'")
        .unwrap();
    let parent = parent.as_private().unwrap().clone();
    let watch = parent.public_copy();

    for index in [0u32, 1, 42, 0x7fff_ffff] {
        let child = parent.derive_normal(index).unwrap();
        let recovered = watch.crack_private_key(&child).unwrap();
        assert_eq!(recovered, parent, "child {}", index);
    }
}

#[test]
fn test_crack_from_imported_xpub() {
    let parent = master(NetworkProfile::litecoin_mainnet()).derive_hardened(2).unwrap();
    let xpub = parent.to_xpub(false).unwrap();
    let watch = match HdNode::from_extended_key(&xpub, parent.network().clone()).unwrap() {
        HdNode::Public(node) => node,
        HdNode::Private(_) => panic!("xpub parsed as private"),
    };

    let child = parent.derive_normal(9).unwrap();
    let recovered = watch.crack_private_key(&child).unwrap();
    assert_eq!(recovered.to_xprv(false).unwrap(), parent.to_xprv(false).unwrap());
}

#[test]
fn test_crack_rejects_hardened_child() {
    let parent = master(NetworkProfile::bitcoin_mainnet());
    let child = parent.derive_hardened(0).unwrap();
    let err = parent.public_copy().crack_private_key(&child).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WatchOnlyViolation);
}

#[test]
fn test_crack_rejects_foreign_child() {
    let parent = master(NetworkProfile::bitcoin_mainnet());
    let grandchild = parent.derive_normal(0).unwrap().derive_normal(0).unwrap();
    let err = parent.public_copy().crack_private_key(&grandchild).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FingerprintMismatch);
}

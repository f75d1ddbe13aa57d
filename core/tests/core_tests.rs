use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use btc_core::base58;
use btc_core::block::BlockHeader;
use btc_core::config::{Config, Network};
use btc_core::encoding::Cursor;
use btc_core::error::CoreError;
use btc_core::hash::hash256;
use btc_core::keys::{PrivateKey, PublicKey};
use btc_core::merkle::MerkleTree;
use btc_core::script::Script;
use btc_core::signature;
use btc_core::transaction::{Transaction, TxInput, TxOutput};

fn modulardiv(a: u64, b: u64, p: u64) -> u64 {
    let p_big = BigUint::from(p);
    let a = BigUint::from(a) % &p_big;
    let inv = BigUint::from(b).modpow(&(&p_big - BigUint::from(2u32)), &p_big);
    ((a * inv) % p_big).to_u64().unwrap_or(0)
}

#[test]
fn s1_modulardiv_examples() {
    assert_eq!(modulardiv(8, 4, 5), 2);
    assert_eq!(modulardiv(8, 3, 5), 1);
    assert_eq!(modulardiv(11, 4, 5), 4);
}

#[test]
fn s2_address_from_private_key_one_round_trips_through_base58() {
    let key = PrivateKey::from_scalar(BigUint::one()).unwrap();
    let pubkey = key.public_key().unwrap();
    let h160 = btc_core::hash::hash160(&pubkey.sec(true));
    let address = pubkey.address(Network::Testnet, true);

    let mut payload = vec![Network::Testnet.address_version()];
    payload.extend(h160);
    payload.extend(base58::checksum(&payload));
    assert_eq!(base58::encode(&payload), address);

    let decoded = base58::decode(&address, 25).unwrap();
    assert_eq!(&decoded[1..21], h160.as_slice());
}

#[test]
fn s3_sign_and_verify_then_reject_tampered_message() {
    let key = PrivateKey::from_scalar(BigUint::one()).unwrap();
    let pubkey = key.public_key().unwrap();
    let z = BigUint::from_bytes_be(&hash256(b"abc"));
    let sig = signature::sign(&key, &z).unwrap();
    assert!(signature::verify(&pubkey, &z, &sig).unwrap());

    let mut tampered = hash256(b"abc");
    tampered[0] ^= 0x01;
    let bad_z = BigUint::from_bytes_be(&tampered);
    assert!(!signature::verify(&pubkey, &bad_z, &sig).unwrap());
}

#[test]
fn s4_decode_testnet_genesis_header() {
    const GENESIS_HEX: &str = "0100000000000000000000000000000000000000000000000000000000000000000000003ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4adae5494dffff001d1aa4ae18";
    let bytes = hex::decode(GENESIS_HEX).unwrap();
    let mut cur = Cursor::new(&bytes);
    let header = BlockHeader::decode(&mut cur).unwrap();

    assert_eq!(header.timestamp, 0x4D49E5DA);
    assert_eq!(header.bits, [0xFF, 0xFF, 0x00, 0x1D]);
    assert_eq!(header.difficulty(), BigUint::one());
}

#[test]
fn s5_p2pkh_spend_accepts_then_rejects_flipped_signature() {
    let key = PrivateKey::from_scalar(BigUint::from(424242u64)).unwrap();
    let pubkey = key.public_key().unwrap();
    let sec = pubkey.sec(true);
    let h160 = btc_core::hash::hash160(&sec);

    let prev_output = TxOutput {
        amount_satoshi: 70_000,
        script_pubkey: Script::p2pkh(&h160),
    };

    let mut tx = Transaction {
        version: 1,
        inputs: vec![TxInput {
            prev_tx: [0x11; 32],
            prev_idx: 0,
            script_sig: Script::default(),
            seq: 0xFFFF_FFFF,
        }],
        outputs: vec![
            TxOutput { amount_satoshi: 20_000, script_pubkey: Script::p2pkh(&[0x22; 20]) },
            TxOutput { amount_satoshi: 48_000, script_pubkey: Script::p2pkh(&[0x33; 20]) },
        ],
        locktime: 0,
        witness: None,
    };

    let z = tx.sighash(0, &prev_output.script_pubkey).unwrap();
    let sig = signature::sign(&key, &z).unwrap();
    let mut sig_bytes = signature::der_encode(&sig);
    sig_bytes.push(0x01); // SIGHASH_ALL

    tx.inputs[0].script_sig = Script::new(vec![
        btc_core::script::Command::Push(sig_bytes),
        btc_core::script::Command::Push(sec),
    ]);
    assert!(tx.validate_p2pkh(0, &prev_output, &Config::default()).unwrap());

    // flip a bit in the signature's r component and reinstall it
    let mut bad_sig = sig.clone();
    bad_sig.r += BigUint::one();
    let mut bad_sig_bytes = signature::der_encode(&bad_sig);
    bad_sig_bytes.push(0x01);
    tx.inputs[0].script_sig = Script::new(vec![
        btc_core::script::Command::Push(bad_sig_bytes),
        btc_core::script::Command::Push(pubkey.sec(true)),
    ]);
    assert!(!tx.validate_p2pkh(0, &prev_output, &Config::default()).unwrap());
}

#[test]
fn s6_two_leaf_merkle_root_matches_direct_hash() {
    let a = [0xAAu8; 32];
    let b = [0xBBu8; 32];
    let tree = MerkleTree::from_leaves(vec![a, b]).unwrap();

    let mut expected = hash256(&[a, b].concat());
    expected.reverse();
    assert_eq!(tree.root(), expected);
}

#[test]
fn s7_wif_export_import_rederives_same_address_as_s2() {
    let key = PrivateKey::from_scalar(BigUint::one()).unwrap();
    let wif = key.to_wif(Network::Testnet, true);
    let (imported, compressed, network) = PrivateKey::from_wif(&wif).unwrap();
    assert!(compressed);
    assert_eq!(network, Network::Testnet);

    let original_address = key.public_key().unwrap().address(Network::Testnet, true);
    let imported_address = imported.public_key().unwrap().address(network, compressed);
    assert_eq!(original_address, imported_address);
}

#[test]
fn sec_decode_rejects_malformed_prefix() {
    let bytes = [0x05u8; 33];
    assert_eq!(
        PublicKey::from_sec(&bytes),
        Err(CoreError::BadEncoding("unknown SEC prefix byte 0x05".into()))
    );
}

#[test]
fn transaction_round_trip_through_wire_encoding() {
    let key = PrivateKey::from_scalar(BigUint::from(99u64)).unwrap();
    let h160 = btc_core::hash::hash160(&key.public_key().unwrap().sec(true));
    let tx = Transaction {
        version: 2,
        inputs: vec![TxInput {
            prev_tx: [0x55; 32],
            prev_idx: 3,
            script_sig: Script::default(),
            seq: 0,
        }],
        outputs: vec![TxOutput { amount_satoshi: 1234, script_pubkey: Script::p2pkh(&h160) }],
        locktime: 500_000,
        witness: None,
    };
    let encoded = tx.encode().unwrap();
    let mut cur = Cursor::new(&encoded);
    let decoded = Transaction::decode(&mut cur).unwrap();
    assert_eq!(decoded, tx);
    assert_eq!(decoded.txid().unwrap().len(), 32);
}

use juno_addrgen::zip316::{self, UnifiedItem};
use juno_addrgen::{
    decode_unified_address, derive, derive_address, derive_batch, derive_batch_with, BatchOptions,
    ErrorCode, Network, Pool, UnifiedFullViewingKey, HRP_JUNO_UFVK, MAX_BATCH_COUNT,
    TYPECODE_ORCHARD,
};
use sapling_crypto::zip32::ExtendedSpendingKey;
use zcash_address::unified::Receiver;

// Orchard-only mainnet UFVK built from the first published Orchard key
// component vector, and the address it yields at index 0.
const UFVK: &str = "jview14ydwl2n4jpzqr9263l874epx7n2elrxp0ym7kahylwmuz6p3zszm6m8trm0pj5jwvjlcxqmap9psdneal4vyx2gk89eud2capgz5rwclx0m4w5utxscmyreuzrxd6vgp7zdf5qv5ccu99cs5q9prmegvr3gdra9jxx7nth4z70j3ruj0qpeefyqa0az4m";
const UA_INDEX_0: &str = "j1agdak48un5885yeadk5ngzsswqm6tljmmhjazz4hdhkpedzfehpywt03d4kvnugfdjt2q85km7fplavw6f7yjmrzqfn593wdkua7vxme";
const RECEIVER_INDEX_0: &str = "8ff3386971cb64b8e7789908dd8ebd7de92a68e586a34db8fea999efd2016fae76750afae7ee941646bcb9";

// Same key plus an item with unassigned typecode 0x10.
const UFVK_UNKNOWN_POOL: &str = "jview1qjzrpdmtq2c240kxwkxq9zgdgser6yc7vd070ulzjp48h3t0e23htuv82rfmnnuphc8qmkk34f6qj7tl3sllw85cwqfl6qnpcnsqwekm68akrqasvz82dtnsfpuhncpzhrthg8j5x6gtp4khlzajrxqwwvyr7egzl8rh7jqt4242daehpn3vd653xturw5nkuwq6wzfd069r9cha4evz87xkvj6942esrrwhwqfkc3ncwhykstn";

fn sapling_orchard_ufvk(hrp: &str) -> String {
    let sapling = ExtendedSpendingKey::master(b"juno-addrgen integration seed 01")
        .to_diversifiable_full_viewing_key()
        .to_bytes();
    let orchard = UnifiedFullViewingKey::decode(UFVK).unwrap();
    let orchard_bytes = match &orchard.pools()[0] {
        juno_addrgen::pool::PoolKey::Orchard(key) => key.fvk().to_bytes(),
        other => panic!("unexpected pool {:?}", other.pool()),
    };
    zip316::encode_items(
        hrp,
        &[UnifiedItem::new(2, sapling), UnifiedItem::new(3, orchard_bytes)],
    )
    .unwrap()
}

#[test]
fn test_reference_address() {
    assert_eq!(derive(UFVK, 0).unwrap(), UA_INDEX_0);
}

#[test]
fn test_reference_ufvk_from_key_components() {
    let fvk = hex::decode(concat!(
        "740bbe5d0580b2cad430180d02cc128b9a140d5e07c151721dc16d25d4e20f15",
        "9f2f826738945ad01f47f70db0c367c246c20c61ff5583948c39dea968fefd1b",
        "021ccf89604f5f7cc6e034b32d338908b819fbe325fee6458b56b4ca71a7e43d",
    ))
    .unwrap();
    let ufvk = zip316::encode_unified_container(HRP_JUNO_UFVK, TYPECODE_ORCHARD, &fvk).unwrap();
    assert_eq!(ufvk, UFVK);
}

#[test]
fn test_derive_is_deterministic() {
    for index in [0, 1, 77, 123_456] {
        assert_eq!(derive(UFVK, index).unwrap(), derive(UFVK, index).unwrap());
    }
    let two_pool = sapling_orchard_ufvk("jview");
    assert_eq!(derive(&two_pool, 42).unwrap(), derive(&two_pool, 42).unwrap());
}

#[test]
fn test_batch_single_equivalence() {
    let batch = derive_batch(UFVK, 5, 3).unwrap();
    assert_eq!(
        batch,
        vec![
            derive(UFVK, 5).unwrap(),
            derive(UFVK, 6).unwrap(),
            derive(UFVK, 7).unwrap(),
        ]
    );

    let two_pool = sapling_orchard_ufvk("jview");
    let batch = derive_batch(&two_pool, 100, 40).unwrap();
    for (i, address) in batch.iter().enumerate() {
        assert_eq!(address, &derive(&two_pool, 100 + i as u32).unwrap());
    }
}

#[test]
fn test_index_boundaries() {
    assert!(derive(UFVK, 0).is_ok());
    assert!(derive(UFVK, u32::MAX).is_ok());
    assert_ne!(derive(UFVK, 0).unwrap(), derive(UFVK, u32::MAX).unwrap());
}

#[test]
fn test_count_boundaries() {
    assert_eq!(derive_batch(UFVK, 0, 0).unwrap_err().code(), ErrorCode::CountInvalid);
    assert_eq!(
        derive_batch(UFVK, 0, MAX_BATCH_COUNT + 1).unwrap_err().code(),
        ErrorCode::CountInvalid
    );
}

#[test]
#[ignore]
fn test_max_count_batch() {
    let options = BatchOptions::with_parallelism(
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
    );
    let batch = derive_batch_with(UFVK, 0, MAX_BATCH_COUNT, &options).unwrap();
    assert_eq!(batch.len(), MAX_BATCH_COUNT as usize);
    assert_eq!(batch[0], UA_INDEX_0);
}

#[test]
fn test_overflow_boundary() {
    let err = derive_batch(UFVK, 4_294_967_295, 2).unwrap_err();
    assert_eq!(err.code(), ErrorCode::IndexRangeOverflow);
    assert_eq!(err.code().as_str(), "index_range_overflow");
    assert_eq!(derive_batch(UFVK, 4_294_967_295, 1).unwrap().len(), 1);
}

#[test]
fn test_malformed_input_isolation() {
    let mut corrupted = UFVK.to_string();
    corrupted.replace_range(20..21, if &UFVK[20..21] == "q" { "p" } else { "q" });
    let invalid = derive(&corrupted, 0).unwrap_err().code();
    let unsupported = derive(UFVK_UNKNOWN_POOL, 0).unwrap_err().code();

    assert_eq!(invalid, ErrorCode::UfvkInvalid);
    assert_eq!(unsupported, ErrorCode::UnsupportedPool);
    assert_ne!(invalid.as_str(), unsupported.as_str());
}

#[test]
fn test_encoding_round_trip() {
    let ufvk = UnifiedFullViewingKey::decode(UFVK).unwrap();
    let derived = derive_address(&ufvk, 0).unwrap();
    assert_eq!(derived.receiver_hex(Pool::Orchard).unwrap(), RECEIVER_INDEX_0);

    let (network, receivers) = decode_unified_address(&derived.ua_string).unwrap();
    assert_eq!(network, Network::Main);
    assert_eq!(receivers.len(), 1);
    match &receivers[0] {
        Receiver::Orchard(raw) => assert_eq!(hex::encode(raw), RECEIVER_INDEX_0),
        other => panic!("unexpected receiver {:?}", other),
    }

    let two_pool = UnifiedFullViewingKey::decode(&sapling_orchard_ufvk("jviewregtest")).unwrap();
    let derived = derive_address(&two_pool, 31).unwrap();
    assert!(derived.ua_string.starts_with("jregtest1"));
    let (network, receivers) = decode_unified_address(&derived.ua_string).unwrap();
    assert_eq!(network, Network::Regtest);
    let raw: Vec<[u8; 43]> = derived.receivers.iter().map(|r| r.to_raw_bytes()).collect();
    assert_eq!(receivers, vec![Receiver::Sapling(raw[0]), Receiver::Orchard(raw[1])]);
}

#[test]
fn test_parallel_output_matches_sequential() {
    let two_pool = sapling_orchard_ufvk("jview");
    let sequential = derive_batch(&two_pool, 9_000, 600).unwrap();
    let parallel =
        derive_batch_with(&two_pool, 9_000, 600, &BatchOptions::with_parallelism(4)).unwrap();
    assert_eq!(parallel, sequential);
}

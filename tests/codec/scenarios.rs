//! End-to-end scenarios for the key shapes the store layer builds

use crate::common::*;
use num_bigint::BigInt;

#[test]
fn newest_time_uuid_sorts_first_when_reversed() {
    let codec = full_codec();
    let t1 = time_uuid(1_000_000);
    let t2 = time_uuid(2_000_000);

    let key = |t: Uuid| {
        vec![
            Component::forward("alice"),
            Component::reversed(ComponentValue::time_uuid(t).unwrap()),
        ]
    };
    let k1 = key(t1);
    let k2 = key(t2);

    let b1 = codec.encode(&k1).unwrap();
    let b2 = codec.encode(&k2).unwrap();
    assert_eq!(codec.decode(&b1).unwrap(), k1);
    assert_eq!(codec.decode(&b2).unwrap(), k2);
    assert!(b2 < b1, "later time UUID must sort first");
}

#[test]
fn truncated_length_prefix_is_malformed() {
    let codec = full_codec();
    let bytes = codec
        .encode(&[Component::forward(ComponentValue::integer(1000))])
        .unwrap();
    // tag, sign marker, then one of the two length bytes
    let err = codec.decode(&bytes[..3]).unwrap_err();
    assert!(matches!(err, KeyError::MalformedKey { .. }), "{err:?}");
}

#[test]
fn length_prefix_past_end_is_malformed() {
    let codec = full_codec();
    let bytes = [b'i', 0x02, 0x00, 0x05, 0x01];
    let err = codec.decode(&bytes).unwrap_err();
    assert!(matches!(err, KeyError::MalformedKey { .. }), "{err:?}");
}

#[test]
fn truncated_fixed_width_is_malformed() {
    let codec = full_codec();
    let bytes = codec.encode(&[Component::forward(7i64)]).unwrap();
    for cut in 1..bytes.len() {
        let err = codec.decode(&bytes[..cut]).unwrap_err();
        assert!(matches!(err, KeyError::MalformedKey { .. }), "cut {cut}: {err:?}");
    }
}

#[test]
fn unknown_tag_byte() {
    let err = full_codec().decode(b"z\x00\x00").unwrap_err();
    assert_eq!(err, KeyError::UnknownTag(b'z'));
    assert!(err.is_corruption());
}

#[test]
fn alphabet_without_long_rejects_long() {
    let alphabet = TagAlphabet::empty()
        .with(fwd(PrimitiveKind::Utf8))
        .with(rev(PrimitiveKind::TimeUuid));
    let codec = CompositeCodec::new(TypeTagRegistry::standard(), alphabet);

    let err = codec.encode(&[Component::forward(5i64)]).unwrap_err();
    assert!(matches!(err, KeyError::IllegalTagForSchema { tag: 'l', .. }), "{err:?}");

    // The same key produced elsewhere is refused on the way back in too.
    let foreign = full_codec().encode(&[Component::forward(5i64)]).unwrap();
    assert!(matches!(
        codec.decode(&foreign),
        Err(KeyError::IllegalTagForSchema { tag: 'l', .. })
    ));
}

#[test]
fn every_kind_roundtrips_in_both_directions() {
    let codec = full_codec();
    let values = vec![
        ComponentValue::ascii("plain ascii").unwrap(),
        ComponentValue::Bytes(vec![0, 0xFF, 0, 1]),
        ComponentValue::integer(BigInt::parse_bytes(b"-123456789012345678901234567890", 10).unwrap()),
        ComponentValue::LexicalUuid(entity(4)),
        ComponentValue::Long(i64::MIN),
        ComponentValue::time_uuid(time_uuid(42)).unwrap(),
        ComponentValue::utf8("héllo\u{0}wörld"),
        ComponentValue::Uuid(entity(5)),
    ];
    for direction in [Direction::Forward, Direction::Reversed] {
        let components: Vec<_> = values
            .iter()
            .cloned()
            .map(|v| Component::new(v, direction))
            .collect();
        let bytes = codec.encode(&components).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), components);
    }
}

#[test]
fn encoding_is_deterministic() {
    let codec = full_codec();
    let key = vec![Component::forward("x"), Component::reversed(ComponentValue::integer(-3))];
    assert_eq!(codec.encode(&key).unwrap(), codec.encode(&key.clone()).unwrap());
}

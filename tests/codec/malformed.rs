//! Rejection of invalid components, limits and corrupt bytes

use crate::common::*;
use num_bigint::BigInt;

fn small_codec() -> CompositeCodec {
    CompositeCodec::standard().with_limits(KeyLimits::with_small_limits())
}

fn limit_what(err: KeyError) -> &'static str {
    match err {
        KeyError::LimitExceeded { what, .. } => what,
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn too_many_components() {
    let key: Vec<_> = (0..5i64).map(Component::forward).collect();
    assert_eq!(limit_what(small_codec().encode(&key).unwrap_err()), "component count");

    let bytes = full_codec().encode(&key).unwrap();
    assert_eq!(limit_what(small_codec().decode(&bytes).unwrap_err()), "component count");
}

#[test]
fn component_too_large() {
    let key = [Component::forward("x".repeat(17))];
    assert_eq!(limit_what(small_codec().encode(&key).unwrap_err()), "component");

    // 26-byte magnitude
    let big = BigInt::from(1u8) << 200usize;
    for value in [big.clone(), -big] {
        let key = [Component::forward(ComponentValue::integer(value))];
        assert_eq!(limit_what(small_codec().encode(&key).unwrap_err()), "component");
    }
    let fits = [Component::forward(ComponentValue::integer(u128::MAX))];
    assert!(small_codec().encode(&fits).is_ok());
}

#[test]
fn key_too_large() {
    let key: Vec<_> = (0..4).map(|_| Component::forward("a".repeat(16))).collect();
    assert_eq!(limit_what(small_codec().encode(&key).unwrap_err()), "key");
}

#[test]
fn invalid_component_values() {
    assert!(matches!(
        ComponentValue::ascii("café"),
        Err(KeyError::InvalidComponent { kind: PrimitiveKind::Ascii, .. })
    ));
    assert!(matches!(
        ComponentValue::time_uuid(entity(1)),
        Err(KeyError::InvalidComponent { kind: PrimitiveKind::TimeUuid, .. })
    ));
    assert!(matches!(
        Component::with_tag(fwd(PrimitiveKind::Long), ComponentValue::utf8("x")),
        Err(KeyError::InvalidComponent { .. })
    ));
}

#[test]
fn wrong_end_of_component_marker() {
    let codec = full_codec();
    let mut bytes = codec.encode(&[Component::forward(9i64)]).unwrap();
    let last = bytes.len() - 1;
    bytes[last] = 0xFF;
    assert!(matches!(codec.decode(&bytes), Err(KeyError::MalformedKey { .. })));

    let mut bytes = codec.encode(&[Component::reversed(9i64)]).unwrap();
    let last = bytes.len() - 1;
    bytes[last] = 0x00;
    assert!(matches!(codec.decode(&bytes), Err(KeyError::MalformedKey { .. })));
}

#[test]
fn non_canonical_integer_bytes() {
    // positive, length 2, magnitude with a leading zero byte
    let bytes = [b'i', 0x02, 0x00, 0x02, 0x00, 0x01, 0x00];
    assert!(matches!(
        full_codec().decode(&bytes),
        Err(KeyError::MalformedKey { .. })
    ));
}

#[test]
fn raw_forms() {
    assert_eq!(ComponentValue::integer(-1).to_raw(), vec![0xFF]);
    assert_eq!(
        ComponentValue::from_raw(PrimitiveKind::Integer, &[0xFF]).unwrap(),
        ComponentValue::integer(-1)
    );
    assert!(ComponentValue::from_raw(PrimitiveKind::Integer, &[0x00, 0x01]).is_err());
    assert!(ComponentValue::from_raw(PrimitiveKind::Long, &[0; 7]).is_err());
    assert!(ComponentValue::from_raw(PrimitiveKind::TimeUuid, entity(1).as_bytes()).is_err());
    assert_eq!(
        ComponentValue::from_raw(PrimitiveKind::Long, &5i64.to_be_bytes()).unwrap(),
        ComponentValue::Long(5)
    );
}

//! Byte order of encoded keys against component-wise order

use crate::common::*;
use colkey::compare_components;
use std::cmp::Ordering;

fn assert_byte_order_matches(keys: &[Vec<Component>]) {
    let codec = full_codec();
    for a in keys {
        for b in keys {
            let expected = compare_components(a, b).expect("comparable keys");
            let actual = CompositeCodec::compare(&codec.encode(a).unwrap(), &codec.encode(b).unwrap());
            assert_eq!(actual, expected, "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn mixed_direction_two_component_keys() {
    let names = ["", "a", "aa", "ab", "b", "a\u{0}"];
    let counts = [i64::MIN, -1, 0, 1, 300, i64::MAX];
    let keys: Vec<Vec<Component>> = names
        .iter()
        .flat_map(|n| {
            counts
                .iter()
                .map(move |c| vec![Component::forward(*n), Component::reversed(*c)])
        })
        .collect();
    assert_byte_order_matches(&keys);
}

#[test]
fn integers_across_sign_and_width() {
    let values: Vec<i128> = vec![
        -(1 << 100),
        -65536,
        -256,
        -255,
        -1,
        0,
        1,
        127,
        128,
        255,
        256,
        65535,
        1 << 70,
    ];
    for direction in Direction::ALL {
        let keys: Vec<_> = values
            .iter()
            .map(|v| vec![Component::new(ComponentValue::integer(*v), direction)])
            .collect();
        assert_byte_order_matches(&keys);
    }
}

#[test]
fn reversed_text_inverts_including_prefixes() {
    let codec = full_codec();
    let mut words = vec!["", "a", "a\u{0}", "ab", "abc", "b"];
    let mut encoded: Vec<Vec<u8>> = words
        .iter()
        .map(|w| codec.encode(&[Component::reversed(*w)]).unwrap())
        .collect();
    encoded.sort();
    words.reverse();
    let decoded: Vec<String> = encoded
        .iter()
        .map(|b| match codec.decode(b).unwrap().remove(0).into_value() {
            ComponentValue::Utf8(s) => s,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(decoded, words);
}

#[test]
fn generic_uuid_orders_by_version_then_time() {
    let v1_early = time_uuid(10);
    let v1_late = time_uuid(20);
    let v4 = Uuid::from_bytes([0x00, 0, 0, 0, 0, 0, 0x40, 0, 0x80, 0, 0, 0, 0, 0, 0, 0]);
    let keys: Vec<_> = [v4, v1_late, v1_early]
        .into_iter()
        .map(|u| vec![Component::forward(u)])
        .collect();
    assert_byte_order_matches(&keys);

    let codec = full_codec();
    let early = codec.encode(&[Component::forward(v1_early)]).unwrap();
    let late = codec.encode(&[Component::forward(v1_late)]).unwrap();
    let newer_version = codec.encode(&[Component::forward(v4)]).unwrap();
    assert!(early < late);
    assert!(late < newer_version);
}

#[test]
fn shorter_key_sorts_before_its_extensions() {
    let codec = full_codec();
    let short = codec.encode(&[Component::forward("user")]).unwrap();
    let long = codec
        .encode(&[Component::forward("user"), Component::reversed(1i64)])
        .unwrap();
    assert!(long.starts_with(&short));
    assert_eq!(CompositeCodec::compare(&short, &long), Ordering::Less);
}

#[test]
fn prefix_range_bounds_exactly_the_extensions() {
    let codec = full_codec();
    let (start, end) = codec.prefix_range(&[Component::forward("name")]).unwrap();

    let inside = [
        vec![Component::forward("name")],
        vec![Component::forward("name"), Component::forward("")],
        vec![Component::forward("name"), Component::reversed(ComponentValue::integer(u64::MAX))],
    ];
    for key in &inside {
        let bytes = codec.encode(key).unwrap();
        assert!(start <= bytes && bytes < end, "{key:?}");
    }

    let outside = [
        vec![Component::forward("nam")],
        vec![Component::forward("name\u{0}")],
        vec![Component::forward("namf")],
    ];
    for key in &outside {
        let bytes = codec.encode(key).unwrap();
        assert!(bytes < start || bytes >= end, "{key:?}");
    }
}

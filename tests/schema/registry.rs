//! Registry lookups over the application stores

use crate::common::*;
use colkey::{Comparator, IndexMetadataBuilder, ValueValidator, DEFAULT_DYNAMIC_COMPOSITE_ALIASES};
use std::sync::Arc;

#[test]
fn describe_is_total_over_application_stores() {
    let schema = app_schema();
    for cf in ApplicationCf::ALL {
        let d = schema.describe(cf.name()).unwrap();
        assert_eq!(d.name(), cf.name());
        assert!(d.create());
        assert!(d.index_metadata().is_empty());
    }
    for bogus in ["", "entity_unique", "Entity_Unique ", "Entity_Nope"] {
        assert!(
            matches!(schema.describe(bogus), Err(SchemaError::UnknownStore(_))),
            "{bogus:?}"
        );
    }
}

#[test]
fn describe_is_idempotent() {
    let schema = app_schema();
    let first = schema.describe("Entity_Unique").unwrap();
    let second = schema.describe("Entity_Unique").unwrap();
    assert_eq!(*first, *second);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn independent_registries_agree() {
    let a = SchemaRegistry::application().unwrap();
    let b = SchemaRegistry::builder()
        .tags(Arc::new(TypeTagRegistry::new()))
        .with_application()
        .build()
        .unwrap();
    for name in a.names() {
        assert_eq!(*a.describe(name).unwrap(), *b.describe(name).unwrap());
    }
}

#[test]
fn composite_stores_accept_the_full_alphabet() {
    let schema = app_schema();
    for name in ["Entity_Composite_Dictionaries", "Entity_Index", "Entity_Index_Entries"] {
        assert!(schema.is_composite(name).unwrap());
        let codec = schema.codec(name).unwrap();
        assert_eq!(codec.alphabet(), TagAlphabet::all());
        assert_eq!(
            schema.describe(name).unwrap().comparator().to_string(),
            format!("DynamicCompositeType{DEFAULT_DYNAMIC_COMPOSITE_ALIASES}")
        );
    }
}

#[test]
fn simple_and_counter_stores() {
    let schema = app_schema();
    let unique = schema.describe("Entity_Unique").unwrap();
    assert_eq!(unique.comparator(), Comparator::Simple(fwd(PrimitiveKind::Uuid)));
    assert!(!unique.is_counter());

    let counters = schema.describe("Application_Aggregate_Counters").unwrap();
    assert_eq!(counters.comparator(), Comparator::Simple(fwd(PrimitiveKind::Long)));
    assert_eq!(counters.validator(), Some(ValueValidator::Counter));
    assert!(schema.describe("Entity_Counters").unwrap().is_counter());
}

#[test]
fn narrow_alphabet_rejects_long_component() {
    let schema = SchemaRegistry::builder()
        .register(ColumnFamilyDef::new(
            "Device_Index",
            "DynamicCompositeType(s=>UTF8Type,T=>TimeUUIDType(reversed=true))",
        ))
        .build()
        .unwrap();
    let codec = schema.codec("Device_Index").unwrap();

    let err = codec.encode(&[Component::forward(12i64)]).unwrap_err();
    assert!(matches!(err, KeyError::IllegalTagForSchema { tag: 'l', .. }));
    assert_eq!(err.reason_code(), "illegal_tag_for_schema");

    let ok = codec.encode(&[
        Component::forward("phone"),
        Component::reversed(ComponentValue::time_uuid(time_uuid(1)).unwrap()),
    ]);
    assert!(ok.is_ok());

    // Right kind, wrong direction.
    let err = codec
        .encode(&[Component::forward(ComponentValue::time_uuid(time_uuid(1)).unwrap())])
        .unwrap_err();
    assert!(matches!(err, KeyError::IllegalTagForSchema { tag: 't', .. }));
}

#[test]
fn declared_indexes_surface_in_metadata() {
    let schema = SchemaRegistry::builder()
        .register(ColumnFamilyDef::new("Devices", "UTF8Type").with_indexes("owner,email:UTF8Type"))
        .build()
        .unwrap();
    let cols = schema.index_metadata("Devices").unwrap();
    assert_eq!(cols, IndexMetadataBuilder::parse(Some("owner,email:UTF8Type")).unwrap());
    assert_eq!(cols[0].validation_class, PrimitiveKind::Uuid);
    assert_eq!(cols[1].index_name, "email");
}

#[test]
fn malformed_declarations_abort_build() {
    let cases = [
        ColumnFamilyDef::new("A", "BytesType").with_indexes("owner,,email"),
        ColumnFamilyDef::new("B", "NoSuchType"),
        ColumnFamilyDef::new("C", "DynamicCompositeType(q=>UTF8Type)"),
        ColumnFamilyDef::new("D", "BytesType").with_validator("LongType(reversed=true)"),
    ];
    for def in cases {
        let err = SchemaRegistry::builder().register(def.clone()).build().unwrap_err();
        assert!(err.is_fatal_at_startup(), "{def:?}: {err}");
    }
}

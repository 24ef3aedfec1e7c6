//! Registries built from `colkey.toml`

use crate::common::*;
use colkey::CONFIG_FILE_NAME;
use tempfile::TempDir;

#[test]
fn default_file_builds_application_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    SchemaConfig::write_default_if_missing(&path).unwrap();

    let config = SchemaConfig::from_file(&path).unwrap();
    let schema = SchemaRegistry::from_config(&config).unwrap();
    assert_eq!(schema.len(), ApplicationCf::ALL.len());
}

#[test]
fn extra_stores_and_limits_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        r#"
[limits]
max_components = 2

[[column_family]]
name = "Device_Index"
comparator = "DynamicCompositeType(s=>UTF8Type,L=>LongType(reversed=true))"

[[column_family]]
name = "Devices"
comparator = "UTF8Type"
indexes = "owner"
create = false
"#,
    )
    .unwrap();

    let schema = SchemaRegistry::from_config(&SchemaConfig::from_file(&path).unwrap()).unwrap();
    assert_eq!(schema.len(), ApplicationCf::ALL.len() + 2);
    assert!(!schema.describe("Devices").unwrap().create());
    assert_eq!(schema.index_metadata("Devices").unwrap().len(), 1);

    let codec = schema.codec("Device_Index").unwrap();
    let three = [
        Component::forward("a"),
        Component::reversed(1i64),
        Component::forward("b"),
    ];
    assert!(matches!(
        codec.encode(&three),
        Err(KeyError::LimitExceeded { what: "component count", .. })
    ));
}

#[test]
fn bad_store_in_file_aborts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "[[column_family]]\nname = \"Broken\"\ncomparator = \"BytesType\"\nindexes = \"owner:\"\n",
    )
    .unwrap();

    let config = SchemaConfig::from_file(&path).unwrap();
    let err = SchemaRegistry::from_config(&config).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidIndexSpec { .. }));
}

#[test]
fn redeclaring_an_application_store_is_rejected() {
    let config = SchemaConfig::from_toml_str(
        "[[column_family]]\nname = \"Entity_Index\"\ncomparator = \"BytesType\"\n",
    )
    .unwrap();
    assert!(matches!(
        SchemaRegistry::from_config(&config),
        Err(SchemaError::DuplicateStore(_))
    ));
}

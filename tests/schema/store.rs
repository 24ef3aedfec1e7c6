//! Schema-checked writes, unique claims and index history

use crate::common::*;
use colkey::{IndexEntry, SortedStore, UniqueConstraintRecord};
use std::sync::Arc;
use std::thread;

#[test]
fn counters_only_increment() {
    let store = app_store();
    for name in ["Entity_Counters", "Application_Aggregate_Counters"] {
        let column = 1i64.to_be_bytes();
        assert!(matches!(
            store.put(name, b"row", &column, &[0; 8]),
            Err(SchemaError::UnsupportedWrite { operation: "value", .. })
        ));
        assert_eq!(store.increment(name, b"row", &column, 2).unwrap(), 2);
        assert_eq!(store.increment(name, b"row", &column, 5).unwrap(), 7);
        assert!(store.delete(name, b"row", &column).unwrap());
    }
    assert!(matches!(
        store.increment("Entity_Properties", b"row", b"x", 1),
        Err(SchemaError::UnsupportedWrite { operation: "increment", .. })
    ));
}

#[test]
fn simple_comparator_columns_are_checked() {
    let store = app_store();
    let column = 1i64.to_be_bytes();
    assert!(matches!(
        store.increment("Application_Aggregate_Counters", b"row", b"short", 1),
        Err(SchemaError::Key(KeyError::InvalidComponent { .. }))
    ));
    assert!(store
        .increment("Application_Aggregate_Counters", b"row", &column, 1)
        .is_ok());
}

#[test]
fn composite_columns_must_fit_the_alphabet() {
    let schema = Arc::new(
        SchemaRegistry::builder()
            .with_application()
            .register(ColumnFamilyDef::new("Narrow", "DynamicCompositeType(s=>UTF8Type)"))
            .build()
            .unwrap(),
    );
    let store = SchemaStore::new(schema, MemoryStore::new()).unwrap();
    let long_col = full_codec().encode(&[Component::forward(3i64)]).unwrap();
    let text_col = full_codec().encode(&[Component::forward("ok")]).unwrap();

    assert!(matches!(
        store.put("Narrow", b"r", &long_col, b""),
        Err(SchemaError::Key(KeyError::IllegalTagForSchema { .. }))
    ));
    store.put("Narrow", b"r", &text_col, b"v").unwrap();
    assert_eq!(store.get("Narrow", b"r", &text_col).unwrap(), Some(b"v".to_vec()));
}

#[test]
fn unique_value_has_one_owner() {
    let store = app_store();
    let mine = UniqueConstraintRecord::new("app/users", "email", "a@b.io", entity(1));
    let theirs = UniqueConstraintRecord::new("app/users", "email", "a@b.io", entity(2));
    let other_scope = UniqueConstraintRecord::new("app/groups", "email", "a@b.io", entity(2));

    assert!(store.claim_unique(&mine).unwrap());
    assert!(!store.claim_unique(&theirs).unwrap());
    assert!(store.claim_unique(&other_scope).unwrap());
    assert_eq!(store.unique_owner(&theirs).unwrap(), Some(entity(1)));

    assert!(store.release_unique(&mine).unwrap());
    assert_eq!(store.unique_owner(&mine).unwrap(), None);
    assert!(store.claim_unique(&theirs).unwrap());
}

#[test]
fn concurrent_claims_have_one_winner() {
    let store = Arc::new(app_store());
    let handles: Vec<_> = (1..=8u8)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let claim = UniqueConstraintRecord::new("app/users", "username", "neo", entity(n));
                store.claim_unique(&claim).unwrap()
            })
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn index_history_and_cleanup() {
    let store = app_store();
    let e = entity(7);
    let history = [
        IndexEntry::new(e, "status", "new", time_uuid(100)).unwrap(),
        IndexEntry::new(e, "status", "active", time_uuid(200)).unwrap(),
        IndexEntry::new(e, "status", "active", time_uuid(300)).unwrap(),
        IndexEntry::new(e, "rank", 4i64, time_uuid(150)).unwrap(),
    ];
    for entry in &history {
        store.record_index_entry(entry).unwrap();
    }

    let status = store.index_entries(e, Some("status")).unwrap();
    // value order, newest first within a value
    assert_eq!(status, vec![history[2].clone(), history[1].clone(), history[0].clone()]);

    let removed = store.remove_stale_index_entries(e).unwrap();
    assert_eq!(removed.len(), 2);
    let remaining = store.index_entries(e, None).unwrap();
    assert_eq!(remaining, vec![history[3].clone(), history[2].clone()]);
    assert!(store.remove_stale_index_entries(e).unwrap().is_empty());
}

#[test]
fn lenient_scan_skips_corrupt_entries() {
    let store = app_store();
    let e = entity(8);
    let entry = IndexEntry::new(e, "name", "x", time_uuid(1)).unwrap();
    store.record_index_entry(&entry).unwrap();

    // Written around the wrapper, as a legacy writer would have.
    store
        .inner()
        .put("Entity_Index_Entries", e.as_bytes(), b"s\xFF", b"")
        .unwrap();
    assert_eq!(store.index_entries(e, None).unwrap(), vec![entry]);
}

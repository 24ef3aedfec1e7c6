//! Sorted-store seam and the schema-checked wrapper around it
//!
//! The persistence layer talks to the underlying wide-column store through
//! [`SortedStore`]: rows of columns, ordered by unsigned byte comparison of
//! column names, with a conditional write for uniqueness claims.
//! [`MemoryStore`] implements it over `BTreeMap`s for tests and tooling.
//!
//! [`SchemaStore`] is what entity code uses. It resolves every store name
//! against the [`SchemaRegistry`], validates column names against the
//! store's comparator and values against its validator, routes counters
//! through the increment path, and builds index-entry and unique-claim keys.

use crate::application::ApplicationCf;
use crate::comparator::{Comparator, ValueValidator};
use crate::descriptor::{ColumnFamilyDescriptor, WriteKind};
use crate::error::{Result, SchemaError};
use crate::records::{stale_entries, IndexEntry, UniqueConstraintRecord};
use crate::registry::SchemaRegistry;
use colkey_core::{ComponentValue, CompositeCodec, KeyError, PrimitiveKind, TagAlphabet};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// A column name and its value
pub type Cell = (Vec<u8>, Vec<u8>);

/// The underlying sorted wide-column store
///
/// Columns within a row are ordered by unsigned lexicographic comparison of
/// their names. Implementations must be safe to share between threads.
pub trait SortedStore: Send + Sync {
    /// Write a column, replacing any existing value
    fn put(&self, store: &str, row: &[u8], column: &[u8], value: &[u8]) -> Result<()>;

    /// Write a column only if the row holds no columns
    ///
    /// Returns `true` if the write happened. The check and the write are
    /// atomic with respect to other calls on the same store.
    fn put_if_absent(&self, store: &str, row: &[u8], column: &[u8], value: &[u8]) -> Result<bool>;

    /// Read one column
    fn get(&self, store: &str, row: &[u8], column: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Remove one column; returns `true` if it existed
    fn delete(&self, store: &str, row: &[u8], column: &[u8]) -> Result<bool>;

    /// Columns of a row in `[start, end)`, in column order
    ///
    /// `end = None` scans to the end of the row.
    fn scan(&self, store: &str, row: &[u8], start: &[u8], end: Option<&[u8]>) -> Result<Vec<Cell>>;

    /// Add `delta` to a counter column and return the new total
    fn add_counter(&self, store: &str, row: &[u8], column: &[u8], delta: i64) -> Result<i64>;
}

type Row = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory [`SortedStore`]
///
/// Counters are stored as 8-byte big-endian integers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, BTreeMap<Vec<u8>, Row>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-empty rows in a store
    pub fn row_count(&self, store: &str) -> usize {
        self.data.read().get(store).map_or(0, |rows| rows.len())
    }
}

impl SortedStore for MemoryStore {
    fn put(&self, store: &str, row: &[u8], column: &[u8], value: &[u8]) -> Result<()> {
        let mut data = self.data.write();
        data.entry(store.to_string())
            .or_default()
            .entry(row.to_vec())
            .or_default()
            .insert(column.to_vec(), value.to_vec());
        Ok(())
    }

    fn put_if_absent(&self, store: &str, row: &[u8], column: &[u8], value: &[u8]) -> Result<bool> {
        let mut data = self.data.write();
        let cells = data
            .entry(store.to_string())
            .or_default()
            .entry(row.to_vec())
            .or_default();
        if !cells.is_empty() {
            return Ok(false);
        }
        cells.insert(column.to_vec(), value.to_vec());
        Ok(true)
    }

    fn get(&self, store: &str, row: &[u8], column: &[u8]) -> Result<Option<Vec<u8>>> {
        let data = self.data.read();
        Ok(data
            .get(store)
            .and_then(|rows| rows.get(row))
            .and_then(|cells| cells.get(column))
            .cloned())
    }

    fn delete(&self, store: &str, row: &[u8], column: &[u8]) -> Result<bool> {
        let mut data = self.data.write();
        let Some(rows) = data.get_mut(store) else {
            return Ok(false);
        };
        let Some(cells) = rows.get_mut(row) else {
            return Ok(false);
        };
        let removed = cells.remove(column).is_some();
        if cells.is_empty() {
            rows.remove(row);
        }
        Ok(removed)
    }

    fn scan(&self, store: &str, row: &[u8], start: &[u8], end: Option<&[u8]>) -> Result<Vec<Cell>> {
        let data = self.data.read();
        let Some(cells) = data.get(store).and_then(|rows| rows.get(row)) else {
            return Ok(Vec::new());
        };
        Ok(cells
            .range(start.to_vec()..)
            .take_while(|(column, _)| end.map_or(true, |end| column.as_slice() < end))
            .map(|(c, v)| (c.clone(), v.clone()))
            .collect())
    }

    fn add_counter(&self, store: &str, row: &[u8], column: &[u8], delta: i64) -> Result<i64> {
        let mut data = self.data.write();
        let slot = data
            .entry(store.to_string())
            .or_default()
            .entry(row.to_vec())
            .or_default()
            .entry(column.to_vec())
            .or_insert_with(|| 0i64.to_be_bytes().to_vec());
        let current: [u8; 8] = slot.as_slice().try_into().map_err(|_| KeyError::InvalidComponent {
            kind: PrimitiveKind::Long,
            reason: format!("counter cell holds {} bytes", slot.len()),
        })?;
        let total = i64::from_be_bytes(current).wrapping_add(delta);
        *slot = total.to_be_bytes().to_vec();
        Ok(total)
    }
}

/// Schema-checked access to a [`SortedStore`]
pub struct SchemaStore<S: SortedStore> {
    schema: Arc<SchemaRegistry>,
    store: S,
    index_codec: CompositeCodec,
    unique_codec: CompositeCodec,
}

impl<S: SortedStore> SchemaStore<S> {
    /// Wrap a store
    ///
    /// # Errors
    ///
    /// `UnknownStore` or `NotComposite` if the schema lacks a composite
    /// `Entity_Index_Entries` store or an `Entity_Unique` store.
    pub fn new(schema: Arc<SchemaRegistry>, store: S) -> Result<Self> {
        let index_codec = schema.codec(ApplicationCf::EntityIndexEntries.name())?;
        schema.describe(ApplicationCf::EntityUnique.name())?;
        let unique_codec = CompositeCodec::new(Arc::clone(schema.tags()), TagAlphabet::all())
            .with_limits(schema.limits());
        Ok(SchemaStore {
            schema,
            store,
            index_codec,
            unique_codec,
        })
    }

    /// Schema in use
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Underlying store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Write a value column
    ///
    /// # Errors
    ///
    /// `UnsupportedWrite` on a counter store; `Key` errors when the column
    /// name or value does not fit the store's comparator or validator.
    pub fn put(&self, name: &str, row: &[u8], column: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.guard(name, WriteKind::Value)?;
        self.check_column(&cf, column)?;
        if let Some(ValueValidator::Typed(kind)) = cf.validator() {
            ComponentValue::from_raw(kind, value)?;
        }
        self.store.put(name, row, column, value)
    }

    /// Increment a counter column
    pub fn increment(&self, name: &str, row: &[u8], column: &[u8], delta: i64) -> Result<i64> {
        let cf = self.guard(name, WriteKind::Increment)?;
        self.check_column(&cf, column)?;
        self.store.add_counter(name, row, column, delta)
    }

    /// Read a column
    pub fn get(&self, name: &str, row: &[u8], column: &[u8]) -> Result<Option<Vec<u8>>> {
        self.schema.describe(name)?;
        self.store.get(name, row, column)
    }

    /// Delete a column
    pub fn delete(&self, name: &str, row: &[u8], column: &[u8]) -> Result<bool> {
        self.guard(name, WriteKind::Delete)?;
        self.store.delete(name, row, column)
    }

    /// Claim a unique value for its owner
    ///
    /// Returns `true` if the owner now holds the value, including when it
    /// already did. Returns `false` if another entity holds it.
    pub fn claim_unique(&self, record: &UniqueConstraintRecord) -> Result<bool> {
        let name = ApplicationCf::EntityUnique.name();
        self.guard(name, WriteKind::Value)?;
        let row = record.row_key(&self.unique_codec)?;
        if self.store.put_if_absent(name, &row, &record.column_name(), &[])? {
            return Ok(true);
        }
        let holder = self.owner_of_row(&row)?;
        if holder != Some(record.owner()) {
            debug!(
                target: "colkey::store",
                property = record.property(),
                owner = %record.owner(),
                holder = ?holder,
                "Unique value already claimed"
            );
        }
        Ok(holder == Some(record.owner()))
    }

    /// Current owner of a unique value
    pub fn unique_owner(&self, record: &UniqueConstraintRecord) -> Result<Option<Uuid>> {
        let row = record.row_key(&self.unique_codec)?;
        self.owner_of_row(&row)
    }

    /// Release a unique value held by the record's owner
    ///
    /// Returns `false` if the owner did not hold it.
    pub fn release_unique(&self, record: &UniqueConstraintRecord) -> Result<bool> {
        let name = ApplicationCf::EntityUnique.name();
        self.guard(name, WriteKind::Delete)?;
        let row = record.row_key(&self.unique_codec)?;
        self.store.delete(name, &row, &record.column_name())
    }

    /// Record that a property value was indexed
    pub fn record_index_entry(&self, entry: &IndexEntry) -> Result<()> {
        let name = ApplicationCf::EntityIndexEntries.name();
        self.guard(name, WriteKind::Value)?;
        let column = entry.column_name(&self.index_codec)?;
        self.store.put(name, &entry.row_key(), &column, &[])
    }

    /// Index entries of an entity, optionally for one property
    ///
    /// Columns whose bytes are corrupt are logged and skipped; other errors
    /// abort the scan.
    pub fn index_entries(&self, entity: Uuid, property: Option<&str>) -> Result<Vec<IndexEntry>> {
        let name = ApplicationCf::EntityIndexEntries.name();
        self.schema.describe(name)?;
        let cells = match property {
            Some(p) => {
                let (start, end) = IndexEntry::property_range(&self.index_codec, p)?;
                self.store.scan(name, entity.as_bytes(), &start, Some(&end))?
            }
            None => self.store.scan(name, entity.as_bytes(), &[], None)?,
        };

        let mut entries = Vec::with_capacity(cells.len());
        for (column, _) in cells {
            match IndexEntry::decode(entity, &column, &self.index_codec) {
                Ok(entry) => entries.push(entry),
                Err(SchemaError::Key(e)) if e.is_corruption() => {
                    warn!(
                        target: "colkey::store",
                        store = name,
                        entity = %entity,
                        reason = e.reason_code(),
                        error = %e,
                        "Skipping malformed index entry"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(entries)
    }

    /// Delete superseded index entries of an entity and return them
    pub fn remove_stale_index_entries(&self, entity: Uuid) -> Result<Vec<IndexEntry>> {
        let name = ApplicationCf::EntityIndexEntries.name();
        self.guard(name, WriteKind::Delete)?;
        let stale = stale_entries(&self.index_entries(entity, None)?);
        for entry in &stale {
            let column = entry.column_name(&self.index_codec)?;
            self.store.delete(name, &entry.row_key(), &column)?;
        }
        if !stale.is_empty() {
            debug!(
                target: "colkey::store",
                entity = %entity,
                removed = stale.len(),
                "Removed stale index entries"
            );
        }
        Ok(stale)
    }

    fn guard(&self, name: &str, kind: WriteKind) -> Result<Arc<ColumnFamilyDescriptor>> {
        let cf = self.schema.describe(name)?;
        cf.check_write(kind)?;
        Ok(cf)
    }

    fn check_column(&self, cf: &ColumnFamilyDescriptor, column: &[u8]) -> Result<()> {
        match cf.comparator() {
            Comparator::Simple(tag) => {
                ComponentValue::from_raw(tag.kind(), column)?;
            }
            Comparator::Composite(_) => {
                cf.codec(Arc::clone(self.schema.tags()), self.schema.limits())?
                    .decode(column)?;
            }
        }
        Ok(())
    }

    fn owner_of_row(&self, row: &[u8]) -> Result<Option<Uuid>> {
        let cells = self
            .store
            .scan(ApplicationCf::EntityUnique.name(), row, &[], None)?;
        cells
            .first()
            .map(|(column, _)| UniqueConstraintRecord::owner_from_column(column))
            .transpose()
    }
}

//! Key layouts for index-entry history and unique-value claims
//!
//! ## Index entries (`Entity_Index_Entries`)
//!
//! ```text
//! row:    entity UUID (16 bytes)
//! column: s(property) <value> T(timestamp)
//! ```
//!
//! The timestamp component is a reversed time UUID, so within one property
//! and value the newest record sorts first. Entries are never mutated; a new
//! value adds a new entry and the older ones become stale.
//!
//! ## Unique claims (`Entity_Unique`)
//!
//! ```text
//! row:    s(scope) s(property) <value>
//! column: owner entity UUID (16 bytes)
//! ```
//!
//! A claim is made with a conditional write on the row, so one value can
//! have at most one owner.

use crate::error::Result;
use chrono::{DateTime, Utc};
use colkey_core::uuid_time::{time_ordered_bytes, time_uuid_unix_micros};
use colkey_core::{Component, ComponentValue, CompositeCodec, Direction, KeyError, PrimitiveKind};
use std::collections::HashMap;
use uuid::Uuid;

/// One historical record of an indexed property value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    entity: Uuid,
    property: String,
    value: ComponentValue,
    timestamp: Uuid,
}

impl IndexEntry {
    /// Build an entry; `timestamp` must be a version-1 UUID
    pub fn new(
        entity: Uuid,
        property: impl Into<String>,
        value: impl Into<ComponentValue>,
        timestamp: Uuid,
    ) -> Result<Self> {
        // Validates the version.
        ComponentValue::time_uuid(timestamp)?;
        Ok(IndexEntry {
            entity,
            property: property.into(),
            value: value.into(),
            timestamp,
        })
    }

    /// Owning entity
    pub fn entity(&self) -> Uuid {
        self.entity
    }

    /// Indexed property name
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Indexed value
    pub fn value(&self) -> &ComponentValue {
        &self.value
    }

    /// Time UUID the entry was written under
    pub fn timestamp(&self) -> Uuid {
        self.timestamp
    }

    /// Wall-clock time of the entry, if representable
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        let micros = i64::try_from(time_uuid_unix_micros(&self.timestamp)?).ok()?;
        DateTime::<Utc>::from_timestamp_micros(micros)
    }

    /// Row key: the entity UUID
    pub fn row_key(&self) -> Vec<u8> {
        self.entity.as_bytes().to_vec()
    }

    /// Encoded column name
    pub fn column_name(&self, codec: &CompositeCodec) -> Result<Vec<u8>> {
        let components = [
            Component::forward(ComponentValue::utf8(self.property.as_str())),
            Component::forward(self.value.clone()),
            Component::new(ComponentValue::time_uuid(self.timestamp)?, Direction::Reversed),
        ];
        Ok(codec.encode(&components)?)
    }

    /// Column range holding every entry of one property
    pub fn property_range(codec: &CompositeCodec, property: &str) -> Result<(Vec<u8>, Vec<u8>)> {
        Ok(codec.prefix_range(&[Component::forward(ComponentValue::utf8(property))])?)
    }

    /// Rebuild an entry from its row key and column name
    ///
    /// # Errors
    ///
    /// `MalformedKey` if the column does not have the entry layout.
    pub fn decode(entity: Uuid, column: &[u8], codec: &CompositeCodec) -> Result<Self> {
        let mut components = codec.decode(column)?.into_iter();
        let (property, value, timestamp) =
            match (components.next(), components.next(), components.next(), components.next()) {
                (Some(p), Some(v), Some(t), None) => (p, v, t),
                _ => return Err(layout_error(column.len(), "expected three components").into()),
            };

        let property = match (property.direction(), property.into_value()) {
            (Direction::Forward, ComponentValue::Utf8(s)) => s,
            _ => return Err(layout_error(0, "first component must be forward UTF-8").into()),
        };
        if value.direction().is_reversed() {
            return Err(layout_error(0, "value component must be forward").into());
        }
        let timestamp = match (timestamp.direction(), timestamp.into_value()) {
            (Direction::Reversed, ComponentValue::TimeUuid(u)) => u,
            _ => return Err(layout_error(0, "last component must be a reversed time UUID").into()),
        };
        Ok(IndexEntry {
            entity,
            property,
            value: value.into_value(),
            timestamp,
        })
    }
}

fn layout_error(offset: usize, reason: &str) -> KeyError {
    KeyError::MalformedKey {
        offset,
        reason: reason.to_string(),
    }
}

/// Entries superseded by a newer entry for the same entity and property
///
/// The newest entry per property is kept; everything else is returned, in
/// input order.
pub fn stale_entries(entries: &[IndexEntry]) -> Vec<IndexEntry> {
    let mut newest: HashMap<(Uuid, &str), [u8; 16]> = HashMap::new();
    for e in entries {
        let ts = time_ordered_bytes(&e.timestamp);
        newest
            .entry((e.entity, e.property.as_str()))
            .and_modify(|cur| {
                if ts > *cur {
                    *cur = ts;
                }
            })
            .or_insert(ts);
    }
    entries
        .iter()
        .filter(|e| newest.get(&(e.entity, e.property.as_str())) != Some(&time_ordered_bytes(&e.timestamp)))
        .cloned()
        .collect()
}

/// Claim of a unique property value by one entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueConstraintRecord {
    scope: String,
    property: String,
    value: ComponentValue,
    owner: Uuid,
}

impl UniqueConstraintRecord {
    /// Build a claim
    ///
    /// `scope` names the owner of the uniqueness domain, such as an
    /// application-qualified collection path.
    pub fn new(
        scope: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<ComponentValue>,
        owner: Uuid,
    ) -> Self {
        UniqueConstraintRecord {
            scope: scope.into(),
            property: property.into(),
            value: value.into(),
            owner,
        }
    }

    /// Uniqueness scope
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Property name
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Claimed value
    pub fn value(&self) -> &ComponentValue {
        &self.value
    }

    /// Owning entity
    pub fn owner(&self) -> Uuid {
        self.owner
    }

    /// Encoded row key shared by every claim on the same value
    pub fn row_key(&self, codec: &CompositeCodec) -> Result<Vec<u8>> {
        let components = [
            Component::forward(ComponentValue::utf8(self.scope.as_str())),
            Component::forward(ComponentValue::utf8(self.property.as_str())),
            Component::forward(self.value.clone()),
        ];
        Ok(codec.encode(&components)?)
    }

    /// Column name: the owner UUID
    pub fn column_name(&self) -> Vec<u8> {
        self.owner.as_bytes().to_vec()
    }

    /// Read an owner UUID back from a column name
    pub fn owner_from_column(column: &[u8]) -> Result<Uuid> {
        Uuid::from_slice(column).map_err(|_| {
            KeyError::InvalidComponent {
                kind: PrimitiveKind::Uuid,
                reason: format!("owner column must be 16 bytes, got {}", column.len()),
            }
            .into()
        })
    }
}

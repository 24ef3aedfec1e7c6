//! Time-ordered UUID helpers
//!
//! A version-1 UUID stores its 60-bit timestamp split across three fields with
//! the least significant field first, so raw byte order is not time order.
//! [`time_ordered_bytes`] moves the fields so the most significant comes
//! first:
//!
//! ```text
//! raw:      time_low(4) time_mid(2) time_hi_and_version(2) clock_seq(2) node(6)
//! ordered:  time_hi_and_version(2) time_mid(2) time_low(4) clock_seq(2) node(6)
//! ```

use uuid::Uuid;

/// Offset between the UUID epoch (1582-10-15) and the Unix epoch, in 100ns ticks
pub const UUID_EPOCH_OFFSET_TICKS: u64 = 0x01B2_1DD2_1381_4000;

/// Permute a UUID's bytes so unsigned comparison follows the v1 timestamp
pub fn time_ordered_bytes(uuid: &Uuid) -> [u8; 16] {
    let b = uuid.as_bytes();
    [
        b[6], b[7], b[4], b[5], b[0], b[1], b[2], b[3], b[8], b[9], b[10], b[11], b[12], b[13],
        b[14], b[15],
    ]
}

/// Inverse of [`time_ordered_bytes`]
pub fn from_time_ordered_bytes(b: &[u8; 16]) -> Uuid {
    Uuid::from_bytes([
        b[4], b[5], b[6], b[7], b[2], b[3], b[0], b[1], b[8], b[9], b[10], b[11], b[12], b[13],
        b[14], b[15],
    ])
}

/// True when the UUID carries version 1
pub fn is_time_uuid(uuid: &Uuid) -> bool {
    uuid.get_version_num() == 1
}

/// The 60-bit timestamp of a v1 UUID, in 100ns ticks since 1582-10-15
pub fn time_uuid_ticks(uuid: &Uuid) -> Option<u64> {
    if !is_time_uuid(uuid) {
        return None;
    }
    let b = uuid.as_bytes();
    let hi = u64::from(u16::from_be_bytes([b[6] & 0x0F, b[7]]));
    let mid = u64::from(u16::from_be_bytes([b[4], b[5]]));
    let low = u64::from(u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
    Some((hi << 48) | (mid << 32) | low)
}

/// Build a v1 UUID from its timestamp, clock sequence and node
///
/// Only the low 60 bits of `ticks` and low 14 bits of `clock_seq` are used.
pub fn new_time_uuid(ticks: u64, clock_seq: u16, node: [u8; 6]) -> Uuid {
    let low = (ticks & 0xFFFF_FFFF) as u32;
    let mid = ((ticks >> 32) & 0xFFFF) as u16;
    let hi = (((ticks >> 48) & 0x0FFF) as u16) | 0x1000;
    let seq = (clock_seq & 0x3FFF) | 0x8000;

    let mut bytes = [0u8; 16];
    bytes[0..4].copy_from_slice(&low.to_be_bytes());
    bytes[4..6].copy_from_slice(&mid.to_be_bytes());
    bytes[6..8].copy_from_slice(&hi.to_be_bytes());
    bytes[8..10].copy_from_slice(&seq.to_be_bytes());
    bytes[10..16].copy_from_slice(&node);
    Uuid::from_bytes(bytes)
}

/// Build a v1 UUID for a Unix timestamp in microseconds
pub fn time_uuid_from_unix_micros(micros: u64, clock_seq: u16, node: [u8; 6]) -> Uuid {
    let ticks = micros
        .saturating_mul(10)
        .saturating_add(UUID_EPOCH_OFFSET_TICKS);
    new_time_uuid(ticks, clock_seq, node)
}

/// Unix timestamp in microseconds of a v1 UUID
///
/// Returns `None` for non-v1 UUIDs and for timestamps before the Unix epoch.
pub fn time_uuid_unix_micros(uuid: &Uuid) -> Option<u64> {
    time_uuid_ticks(uuid)?
        .checked_sub(UUID_EPOCH_OFFSET_TICKS)
        .map(|t| t / 10)
}

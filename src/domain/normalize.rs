// src/domain/normalize.rs

use crate::bookings::BookingRecord;
use crate::domain::dates::parse_date_value;
use crate::domain::status::{CanonicalStatus, StatusTable};
use chrono::{DateTime, Utc};

/// A booking reduced to what the dashboard needs.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBooking {
    pub id: String,
    pub label: String,
    pub destination: Option<String>,
    pub status: CanonicalStatus,
    /// `None` when no candidate date field parsed; such bookings never land
    /// in a month bucket.
    pub date: Option<DateTime<Utc>>,
}

/// Pick the most authoritative raw status and map it.
///
/// Order: last tracking update, then `currentStatus`, then `status`, then
/// the `Booked` default.
pub fn resolve_status(record: &BookingRecord, table: &StatusTable) -> CanonicalStatus {
    let updates = record.tracking_updates();

    let raw = if !updates.is_empty() {
        updates.last().and_then(|update| update.status)
    } else {
        record.current_status().or_else(|| record.status())
    };

    raw.map(|raw| table.normalize(raw)).unwrap_or_default()
}

/// First candidate date field that parses, in priority order.
pub fn resolve_date(record: &BookingRecord) -> Option<DateTime<Utc>> {
    record.date_candidates().find_map(parse_date_value)
}

pub fn normalize_record(record: &BookingRecord, table: &StatusTable) -> NormalizedBooking {
    let id = record
        .id()
        .or_else(|| record.consignment_number())
        .unwrap_or_else(|| "-".to_string());
    let label = record.display_label().unwrap_or_else(|| id.clone());

    NormalizedBooking {
        id,
        label,
        destination: record.destination(),
        status: resolve_status(record, table),
        date: resolve_date(record),
    }
}

pub fn normalize_all(records: &[BookingRecord], table: &StatusTable) -> Vec<NormalizedBooking> {
    records
        .iter()
        .map(|record| normalize_record(record, table))
        .collect()
}

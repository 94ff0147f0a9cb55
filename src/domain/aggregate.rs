// src/domain/aggregate.rs

use crate::domain::normalize::NormalizedBooking;
use crate::domain::status::CanonicalStatus;
use chrono::Datelike;
use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month. `month0` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month0: u32,
}

impl MonthKey {
    /// `None` unless `month0` is in 0..=11.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 < 12).then_some(Self { year, month0 })
    }

    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }

    pub fn contains<D: Datelike>(self, date: &D) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }
}

/// Count per canonical status, always all six present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    counts: [usize; 6],
}

impl StatusCounts {
    pub fn add(&mut self, status: CanonicalStatus) {
        self.counts[status.index()] += 1;
    }

    pub fn get(&self, status: CanonicalStatus) -> usize {
        self.counts[status.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalStatus, usize)> + '_ {
        CanonicalStatus::ALL
            .into_iter()
            .map(move |status| (status, self.get(status)))
    }
}

impl FromIterator<CanonicalStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = CanonicalStatus>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for status in iter {
            counts.add(status);
        }
        counts
    }
}

// Serialized as { "booked": n, "picked_up": n, ... } in lifecycle order.
impl Serialize for StatusCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CanonicalStatus::ALL.len()))?;
        for (status, count) in self.iter() {
            map.serialize_entry(status.key(), &count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub month: MonthKey,
    pub counts: StatusCounts,
    pub total: usize,
}

/// Count bookings dated inside `month`. Undated bookings are skipped.
pub fn aggregate_month(bookings: &[NormalizedBooking], month: MonthKey) -> MonthBucket {
    let counts: StatusCounts = bookings
        .iter()
        .filter(|b| b.date.is_some_and(|date| month.contains(&date)))
        .map(|b| b.status)
        .collect();

    MonthBucket {
        month,
        total: counts.total(),
        counts,
    }
}

/// All-time counts, dated or not.
pub fn status_totals(bookings: &[NormalizedBooking]) -> StatusCounts {
    bookings.iter().map(|b| b.status).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub id: String,
    pub label: String,
    pub destination: String,
    pub status: CanonicalStatus,
    pub status_label: &'static str,
    pub date: String,
}

/// The `limit` newest dated bookings, newest first.
pub fn recent_activity(bookings: &[NormalizedBooking], limit: usize) -> Vec<ActivityEntry> {
    let mut dated: Vec<_> = bookings
        .iter()
        .filter_map(|b| b.date.map(|date| (date, b)))
        .collect();

    // Stable, so equal timestamps keep upstream order.
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    dated
        .into_iter()
        .take(limit)
        .map(|(date, b)| ActivityEntry {
            id: b.id.clone(),
            label: b.label.clone(),
            destination: b.destination.clone().unwrap_or_else(|| "-".to_string()),
            status: b.status,
            status_label: b.status.label(),
            date: date.format("%d %b %Y").to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::BookingRecord;
    use crate::domain::normalize::normalize_all;
    use crate::domain::status::StatusTable;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn booking(id: &str, status: CanonicalStatus, date: Option<&str>) -> NormalizedBooking {
        NormalizedBooking {
            id: id.to_string(),
            label: format!("label-{id}"),
            destination: None,
            status,
            date: date.map(|d| DateTime::parse_from_rfc3339(d).unwrap().with_timezone(&Utc)),
        }
    }

    #[test]
    fn month_key_bounds() {
        assert!(MonthKey::new(2024, 0).is_some());
        assert!(MonthKey::new(2024, 11).is_some());
        assert!(MonthKey::new(2024, 12).is_none());
        assert_eq!(MonthKey::new(2024, 10).unwrap().name(), "November");
    }

    #[test]
    fn month_total_matches_counts_and_dated_records() {
        let bookings = vec![
            booking("a", CanonicalStatus::Delivered, Some("2024-03-01T00:00:00Z")),
            booking("b", CanonicalStatus::Delivered, Some("2024-03-31T23:59:59Z")),
            booking("c", CanonicalStatus::InTransit, Some("2024-03-15T12:00:00Z")),
            booking("d", CanonicalStatus::Booked, Some("2024-04-01T00:00:00Z")),
            booking("e", CanonicalStatus::Booked, Some("2023-03-10T00:00:00Z")),
            booking("f", CanonicalStatus::Cancelled, None),
        ];
        let march = MonthKey::new(2024, 2).unwrap();

        let bucket = aggregate_month(&bookings, march);

        assert_eq!(bucket.total, 3);
        assert_eq!(bucket.counts.get(CanonicalStatus::Delivered), 2);
        assert_eq!(bucket.counts.get(CanonicalStatus::InTransit), 1);
        assert_eq!(bucket.counts.get(CanonicalStatus::Cancelled), 0);
        assert_eq!(
            bucket.total,
            bucket.counts.iter().map(|(_, n)| n).sum::<usize>()
        );
        let dated_in_march = bookings
            .iter()
            .filter(|b| b.date.is_some_and(|d| march.contains(&d)))
            .count();
        assert_eq!(bucket.total, dated_in_march);
    }

    #[test]
    fn aggregation_is_pure() {
        let bookings = vec![
            booking("a", CanonicalStatus::PickedUp, Some("2024-06-02T00:00:00Z")),
            booking("b", CanonicalStatus::Booked, None),
        ];
        let june = MonthKey::new(2024, 5).unwrap();
        assert_eq!(aggregate_month(&bookings, june), aggregate_month(&bookings, june));
    }

    #[test]
    fn undated_records_still_count_all_time() {
        let bookings = vec![
            booking("a", CanonicalStatus::Delivered, Some("2024-03-01T00:00:00Z")),
            booking("b", CanonicalStatus::Cancelled, None),
        ];
        let totals = status_totals(&bookings);
        assert_eq!(totals.total(), 2);
        assert_eq!(totals.get(CanonicalStatus::Cancelled), 1);
    }

    #[test]
    fn three_record_scenario() {
        let records: Vec<BookingRecord> = vec![
            json!({
                "_id": "1",
                "createdAt": "2024-05-03T10:00:00Z",
                "trackingUpdates": [
                    { "status": "Booked", "timestamp": "2024-05-03T10:00:00Z" },
                    { "status": "OFP", "timestamp": "2024-05-04T09:00:00Z" }
                ]
            }),
            json!({
                "_id": "2",
                "createdAt": "2024-05-10T10:00:00Z",
                "currentStatus": "Delivered"
            }),
            json!({
                "_id": "3",
                "createdAt": "2024-05-20T10:00:00Z",
                "status": "pending"
            }),
        ]
        .into_iter()
        .map(BookingRecord::new)
        .collect();

        let bookings = normalize_all(&records, &StatusTable::default());
        let bucket = aggregate_month(&bookings, MonthKey::new(2024, 4).unwrap());

        assert_eq!(bucket.total, 3);
        assert_eq!(bucket.counts.get(CanonicalStatus::OutForDelivery), 1);
        assert_eq!(bucket.counts.get(CanonicalStatus::Delivered), 1);
        assert_eq!(bucket.counts.get(CanonicalStatus::Booked), 1);
        assert_eq!(bucket.counts.get(CanonicalStatus::InTransit), 0);
    }

    #[test]
    fn wrapped_timestamp_lands_in_its_month() {
        let records = vec![BookingRecord::new(json!({
            "_id": "w",
            "bookingDate": { "seconds": 1700000000 }
        }))];
        let bookings = normalize_all(&records, &StatusTable::default());

        let november = MonthKey::new(2023, 10).unwrap();
        assert_eq!(aggregate_month(&bookings, november).total, 1);
        assert_eq!(
            aggregate_month(&bookings, MonthKey::new(2023, 9).unwrap()).total,
            0
        );
        assert_eq!(
            bookings[0].date,
            Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
        );
    }

    #[test]
    fn recent_activity_is_newest_first_and_limited() {
        let mut bookings = vec![
            booking("old", CanonicalStatus::Delivered, Some("2024-01-01T00:00:00Z")),
            booking("new", CanonicalStatus::OutForDelivery, Some("2024-03-05T00:00:00Z")),
            booking("none", CanonicalStatus::Booked, None),
            booking("mid", CanonicalStatus::InTransit, Some("2024-02-01T00:00:00Z")),
        ];
        bookings[1].destination = Some("Chennai".into());

        let recent = recent_activity(&bookings, 2);

        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "new");
        assert_eq!(recent[0].destination, "Chennai");
        assert_eq!(recent[0].status_label, "Out for Delivery");
        assert_eq!(recent[0].date, "05 Mar 2024");
        assert_eq!(recent[1].id, "mid");
        assert_eq!(recent[1].destination, "-");
    }

    #[test]
    fn counts_serialize_with_every_status() {
        let counts: StatusCounts = [CanonicalStatus::Delivered].into_iter().collect();
        assert_eq!(
            serde_json::to_value(counts).unwrap(),
            json!({
                "booked": 0,
                "picked_up": 0,
                "in_transit": 0,
                "out_for_delivery": 0,
                "delivered": 1,
                "cancelled": 0
            })
        );
    }
}

// src/domain/status.rs

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The six shipment states shown on the dashboard, whatever the upstream
/// vocabulary was.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    #[default]
    Booked,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl CanonicalStatus {
    /// Lifecycle order, used for every fixed-shape count.
    pub const ALL: [CanonicalStatus; 6] = [
        CanonicalStatus::Booked,
        CanonicalStatus::PickedUp,
        CanonicalStatus::InTransit,
        CanonicalStatus::OutForDelivery,
        CanonicalStatus::Delivered,
        CanonicalStatus::Cancelled,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CanonicalStatus::Booked => "booked",
            CanonicalStatus::PickedUp => "picked_up",
            CanonicalStatus::InTransit => "in_transit",
            CanonicalStatus::OutForDelivery => "out_for_delivery",
            CanonicalStatus::Delivered => "delivered",
            CanonicalStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanonicalStatus::Booked => "Booked",
            CanonicalStatus::PickedUp => "Picked Up",
            CanonicalStatus::InTransit => "In Transit",
            CanonicalStatus::OutForDelivery => "Out for Delivery",
            CanonicalStatus::Delivered => "Delivered",
            CanonicalStatus::Cancelled => "Cancelled",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CanonicalStatus {
    type Err = String;

    /// Parses the snake_case key, e.g. `out_for_delivery`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalStatus::ALL
            .into_iter()
            .find(|status| status.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown canonical status '{s}'"))
    }
}

// Known upstream vocabulary. Keys are already lowercased.
const DEFAULT_ALIASES: &[(&str, CanonicalStatus)] = &[
    ("booked", CanonicalStatus::Booked),
    ("pending", CanonicalStatus::Booked),
    ("created", CanonicalStatus::Booked),
    ("new", CanonicalStatus::Booked),
    ("confirmed", CanonicalStatus::Booked),
    ("booking confirmed", CanonicalStatus::Booked),
    ("order placed", CanonicalStatus::Booked),
    ("picked up", CanonicalStatus::PickedUp),
    ("picked_up", CanonicalStatus::PickedUp),
    ("pickedup", CanonicalStatus::PickedUp),
    ("picked", CanonicalStatus::PickedUp),
    ("pickup done", CanonicalStatus::PickedUp),
    ("in transit", CanonicalStatus::InTransit),
    ("in_transit", CanonicalStatus::InTransit),
    ("intransit", CanonicalStatus::InTransit),
    ("dispatched", CanonicalStatus::InTransit),
    ("shipped", CanonicalStatus::InTransit),
    ("at hub", CanonicalStatus::InTransit),
    ("reached hub", CanonicalStatus::InTransit),
    ("arrived at hub", CanonicalStatus::InTransit),
    ("departed hub", CanonicalStatus::InTransit),
    ("out for delivery", CanonicalStatus::OutForDelivery),
    ("out_for_delivery", CanonicalStatus::OutForDelivery),
    ("ofd", CanonicalStatus::OutForDelivery),
    ("ofp", CanonicalStatus::OutForDelivery),
    ("delivered", CanonicalStatus::Delivered),
    ("completed", CanonicalStatus::Delivered),
    ("cancelled", CanonicalStatus::Cancelled),
    ("canceled", CanonicalStatus::Cancelled),
    ("returned", CanonicalStatus::Cancelled),
    ("rto", CanonicalStatus::Cancelled),
];

/// Case-insensitive lookup from raw upstream status to canonical status.
///
/// The table is plain data: deployments extend it with extra aliases
/// instead of touching the normalizer.
#[derive(Debug, Clone)]
pub struct StatusTable {
    aliases: HashMap<String, CanonicalStatus>,
}

impl Default for StatusTable {
    fn default() -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(raw, status)| (raw.to_string(), *status))
            .collect();
        Self { aliases }
    }
}

impl StatusTable {
    /// Add or override one alias.
    pub fn insert(&mut self, raw: &str, status: CanonicalStatus) {
        self.aliases.insert(fold(raw), status);
    }

    /// Map a raw status. Unknown values fall back to `Booked`.
    pub fn normalize(&self, raw: &str) -> CanonicalStatus {
        self.lookup(raw).unwrap_or_default()
    }

    /// Strict variant of [`normalize`](Self::normalize): `None` for unknown values.
    pub fn lookup(&self, raw: &str) -> Option<CanonicalStatus> {
        self.aliases.get(&fold(raw)).copied()
    }
}

fn fold(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

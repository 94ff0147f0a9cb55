use serde::Deserialize;
use serde_json::Value;

// booking (any of these may sit at the top level or under `booking` / `data`)
//  ├── _id | id | bookingId
//  ├── consignmentNumber | consignmentNo | awb | trackingNumber
//  ├── trackingUpdates | tracking | statusHistory
//  │    └── [ { status, .. } ]   (oldest first)
//  ├── currentStatus
//  ├── status
//  ├── bookingDate | createdAt | updatedAt | pickupDate | dispatchDate
//  └── receiver
//       ├── name
//       └── city

const ENVELOPES: &[&str] = &["booking", "data"];

const ID_FIELDS: &[&str] = &["_id", "id", "bookingId"];
const CONSIGNMENT_FIELDS: &[&str] = &[
    "consignmentNumber",
    "consignmentNo",
    "awb",
    "trackingNumber",
];
const TRACKING_FIELDS: &[&str] = &["trackingUpdates", "tracking", "statusHistory"];
const CURRENT_STATUS_FIELDS: &[&str] = &["currentStatus"];
const STATUS_FIELDS: &[&str] = &["status"];

// Candidate date fields, most authoritative first.
const DATE_FIELDS: &[&str] = &[
    "bookingDate",
    "createdAt",
    "updatedAt",
    "pickupDate",
    "dispatchDate",
];

const DESTINATION_FIELDS: &[&str] = &[
    "destination",
    "receiverCity",
    "deliveryCity",
    "receiver.city",
    "receiver.name",
    "receiverName",
];
const LABEL_FIELDS: &[&str] = &["receiverName", "receiver.name", "customerName", "senderName"];

/// One raw booking as the upstream API returned it.
///
/// Upstream shapes are inconsistent, so the record keeps the JSON as-is and
/// reads each logical attribute through an ordered list of field paths.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct BookingRecord {
    raw: Value,
}

/// A status entry attached to a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingUpdate<'a> {
    pub status: Option<&'a str>,
}

impl BookingRecord {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn id(&self) -> Option<String> {
        self.first_scalar(ID_FIELDS)
    }

    pub fn consignment_number(&self) -> Option<String> {
        self.first_scalar(CONSIGNMENT_FIELDS)
    }

    /// Tracking updates in upstream order (oldest first).
    pub fn tracking_updates(&self) -> Vec<TrackingUpdate<'_>> {
        let Some(entries) = self.first_present(TRACKING_FIELDS).and_then(Value::as_array) else {
            return Vec::new();
        };

        entries
            .iter()
            .map(|entry| TrackingUpdate {
                status: entry.get("status").and_then(non_blank_str),
            })
            .collect()
    }

    pub fn current_status(&self) -> Option<&str> {
        self.first_str(CURRENT_STATUS_FIELDS)
    }

    pub fn status(&self) -> Option<&str> {
        self.first_str(STATUS_FIELDS)
    }

    /// Raw date candidates in priority order, skipping absent fields.
    pub fn date_candidates(&self) -> impl Iterator<Item = &Value> + '_ {
        DATE_FIELDS
            .iter()
            .filter_map(move |field| self.first_present(std::slice::from_ref(field)))
    }

    pub fn destination(&self) -> Option<String> {
        self.first_scalar(DESTINATION_FIELDS)
    }

    pub fn display_label(&self) -> Option<String> {
        self.first_scalar(LABEL_FIELDS)
            .or_else(|| self.consignment_number())
    }

    /// First non-null value among `paths`, looking at the record itself and
    /// then inside each envelope.
    fn first_present(&self, paths: &[&str]) -> Option<&Value> {
        std::iter::once(Some(&self.raw))
            .chain(ENVELOPES.iter().map(|env| self.raw.get(*env)))
            .flatten()
            .filter(|scope| scope.is_object())
            .find_map(|scope| {
                paths
                    .iter()
                    .find_map(|path| lookup_path(scope, path).filter(|v| !v.is_null()))
            })
    }

    fn first_str(&self, paths: &[&str]) -> Option<&str> {
        self.first_present(paths).and_then(non_blank_str)
    }

    fn first_scalar(&self, paths: &[&str]) -> Option<String> {
        match self.first_present(paths)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            // {"_id": {"$oid": "..."}}
            Value::Object(map) => map.get("$oid").and_then(non_blank_str).map(String::from),
            _ => None,
        }
    }
}

fn lookup_path<'a>(scope: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(scope, |node, key| node.get(key))
}

fn non_blank_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

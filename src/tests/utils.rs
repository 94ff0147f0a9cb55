use crate::bookings::BookingRecord;
use crate::dashboard::{DataSource, Dashboard};
use crate::domain::{ComplaintSummary, DashboardState, LoadOutcome, MonthKey, StatusTable};
use astra::{Body, Response};
use chrono::{Datelike, Utc};
use serde_json::{json, Value};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Serves a fixed booking history, like a well-behaved upstream would.
pub struct FixtureSource {
    pub records: Vec<Value>,
    pub complaints: ComplaintSummary,
}

impl DataSource for FixtureSource {
    fn load(&self) -> LoadOutcome {
        LoadOutcome::Loaded {
            records: self.records.iter().cloned().map(BookingRecord::new).collect(),
            complaints: self.complaints,
        }
    }
}

/// Like [`FixtureSource`], but each load waits for the test to release it.
pub struct HeldSource {
    pub started: Mutex<Sender<()>>,
    pub release: Mutex<Receiver<()>>,
    pub loads: AtomicUsize,
}

impl HeldSource {
    pub fn new(started: Sender<()>, release: Receiver<()>) -> Self {
        Self {
            started: Mutex::new(started),
            release: Mutex::new(release),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl DataSource for HeldSource {
    fn load(&self) -> LoadOutcome {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let _ = self.started.lock().unwrap().send(());
        let _ = self.release.lock().unwrap().recv();
        LoadOutcome::Loaded {
            records: fixture_records().into_iter().map(BookingRecord::new).collect(),
            complaints: ComplaintSummary::default(),
        }
    }
}

/// `YYYY-MM-DDT10:00:00Z` in the current year; the dashboard always looks
/// at the current year.
pub fn this_year(month: u32, day: u32) -> String {
    format!("{}-{month:02}-{day:02}T10:00:00Z", Utc::now().year())
}

/// Three March bookings (one per status source) plus an April one and an
/// undated one.
pub fn fixture_records() -> Vec<Value> {
    vec![
        json!({
            "_id": "b-1",
            "consignmentNumber": "CN-1001",
            "destination": "Mumbai",
            "createdAt": this_year(3, 2),
            "trackingUpdates": [
                { "status": "Booked", "timestamp": this_year(3, 2) },
                { "status": "OFP", "timestamp": this_year(3, 3) }
            ]
        }),
        json!({
            "_id": "b-2",
            "consignmentNumber": "CN-1002",
            "receiver": { "name": "Ravi", "city": "Delhi" },
            "bookingDate": this_year(3, 10),
            "currentStatus": "Delivered"
        }),
        json!({
            "_id": "b-3",
            "booking": { "status": "pending", "createdAt": this_year(3, 20) }
        }),
        json!({
            "_id": "b-4",
            "createdAt": this_year(4, 1),
            "status": "In Transit"
        }),
        json!({ "_id": "b-5", "status": "cancelled" }),
    ]
}

/// A dashboard already loaded from the fixture, showing March.
pub fn loaded_dashboard() -> Dashboard {
    let march = MonthKey::new(Utc::now().year(), 2).unwrap();
    let state = DashboardState::new(StatusTable::default(), 5, march);
    let source = FixtureSource {
        records: fixture_records(),
        complaints: ComplaintSummary {
            open: 2,
            resolved: 3,
            other: 0,
        },
    };

    let dashboard = Dashboard::new(state, Arc::new(source));
    assert!(dashboard.refresh_blocking());
    dashboard
}

pub fn empty_request(method: http::Method, uri: &str) -> http::Request<Body> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn body_string(mut resp: Response) -> String {
    let mut body_bytes = Vec::new();
    resp.body_mut()
        .reader()
        .read_to_end(&mut body_bytes)
        .unwrap();
    String::from_utf8(body_bytes).unwrap()
}

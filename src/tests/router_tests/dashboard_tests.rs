// src/tests/router_tests/dashboard_tests.rs

use crate::dashboard::Dashboard;
use crate::domain::{DashboardState, LoadState, MonthKey, StatusTable};
use crate::router::handle;
use crate::tests::utils::{body_string, empty_request, loaded_dashboard, HeldSource};
use chrono::Utc;
use http::Method;
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn dashboard_shows_selected_month() {
    let app = loaded_dashboard();

    let resp = handle(empty_request(Method::GET, "/"), &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Shipments · March"), "missing month heading");
    assert!(body.contains("Out for Delivery"));
    assert!(body.contains("CN-1001"), "recent activity should list CN-1001");
    assert!(body.contains("Mumbai"));
    // Newest first: April's booking precedes March's.
    let april = body.find("data-id=\"b-4\"").unwrap();
    let march = body.find("data-id=\"b-1\"").unwrap();
    assert!(april < march);
}

#[test]
fn month_query_switches_without_refetch() {
    let app = loaded_dashboard();

    let resp = handle(empty_request(Method::GET, "/?month=3"), &app).unwrap();
    let body = body_string(resp);
    assert!(body.contains("Shipments · April"));

    // Selection sticks for later requests without a month.
    let view = app.snapshot();
    assert_eq!(view.month, 3);
    assert_eq!(view.total_this_month, 1);
}

#[test]
fn bad_month_is_rejected() {
    let app = loaded_dashboard();

    for uri in ["/?month=12", "/?month=march", "/api/summary?month=-1"] {
        match handle(empty_request(Method::GET, uri), &app) {
            Err(crate::errors::ServerError::BadRequest(_)) => {}
            Err(other) => panic!("{uri}: unexpected error {other}"),
            Ok(resp) => panic!("{uri}: unexpected status {}", resp.status()),
        }
    }
}

#[test]
fn error_page_carries_status() {
    let resp = crate::responses::html_error_response(crate::errors::ServerError::BadRequest(
        "invalid month '<x>'".into(),
    ));
    assert_eq!(resp.status(), 400);

    let body = body_string(resp);
    assert!(body.contains("Error 400"));
    assert!(body.contains("invalid month '&lt;x&gt;'"), "message must be escaped");
}

#[test]
fn unknown_route_is_not_found() {
    let app = loaded_dashboard();

    let result = handle(empty_request(Method::GET, "/admin"), &app);
    assert!(matches!(result, Err(crate::errors::ServerError::NotFound)));

    let result = handle(empty_request(Method::GET, "/refresh"), &app);
    assert!(matches!(result, Err(crate::errors::ServerError::NotFound)));
}

#[test]
fn refresh_redirects_home() {
    let app = loaded_dashboard();

    let resp = handle(empty_request(Method::POST, "/refresh"), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/");
}

#[test]
fn repeated_refresh_posts_share_one_load() {
    let (started_tx, started_rx) = channel();
    let (release_tx, release_rx) = channel();
    let source = Arc::new(HeldSource::new(started_tx, release_rx));
    let state = DashboardState::new(StatusTable::default(), 5, MonthKey::of(&Utc::now()));
    let app = Dashboard::new(state, source.clone());

    let resp = handle(empty_request(Method::POST, "/refresh"), &app).unwrap();
    assert_eq!(resp.status(), 303);
    started_rx.recv().unwrap();

    for _ in 0..4 {
        let resp = handle(empty_request(Method::POST, "/refresh"), &app).unwrap();
        assert_eq!(resp.status(), 303);
    }
    assert_eq!(source.loads(), 1);
    assert_eq!(app.snapshot().load_state, LoadState::Loading);

    release_tx.send(()).unwrap();
    let mut waited = 0;
    while app.snapshot().load_state == LoadState::Loading && waited < 500 {
        std::thread::sleep(Duration::from_millis(10));
        waited += 1;
    }
    assert_eq!(app.snapshot().load_state, LoadState::Loaded);
    assert_eq!(source.loads(), 1);
}

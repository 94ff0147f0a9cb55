// src/tests/router_tests/api_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, empty_request, loaded_dashboard};
use http::Method;
use serde_json::{json, Value};

#[test]
fn summary_reports_month_counts() {
    let app = loaded_dashboard();

    let resp = handle(empty_request(Method::GET, "/api/summary"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/json"
    );

    let summary: Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(summary["month"], 2);
    assert_eq!(summary["month_name"], "March");
    assert_eq!(summary["load_state"], "loaded");
    assert_eq!(summary["total_this_month"], 3);
    assert_eq!(
        summary["counts"],
        json!({
            "booked": 1,
            "picked_up": 0,
            "in_transit": 0,
            "out_for_delivery": 1,
            "delivered": 1,
            "cancelled": 0
        })
    );
    // The undated, cancelled booking only shows up all-time.
    assert_eq!(summary["all_time"]["cancelled"], 1);
    assert_eq!(summary["all_time"]["in_transit"], 1);
    assert_eq!(summary["complaints"], json!({ "open": 2, "resolved": 3, "other": 0 }));
    assert_eq!(summary["error"], Value::Null);
}

#[test]
fn summary_recent_activity_entries() {
    let app = loaded_dashboard();

    let resp = handle(empty_request(Method::GET, "/api/summary"), &app).unwrap();
    let summary: Value = serde_json::from_str(&body_string(resp)).unwrap();

    let recent = summary["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 4, "undated bookings are left out");

    let ids: Vec<&str> = recent.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["b-4", "b-3", "b-2", "b-1"]);

    let ravi = &recent[2];
    assert_eq!(ravi["label"], "Ravi");
    assert_eq!(ravi["destination"], "Delhi");
    assert_eq!(ravi["status"], "delivered");
    assert_eq!(ravi["status_label"], "Delivered");
}

#[test]
fn summary_honours_month_query() {
    let app = loaded_dashboard();

    let resp = handle(empty_request(Method::GET, "/api/summary?month=3"), &app).unwrap();
    let summary: Value = serde_json::from_str(&body_string(resp)).unwrap();

    assert_eq!(summary["month_name"], "April");
    assert_eq!(summary["total_this_month"], 1);
    assert_eq!(summary["counts"]["in_transit"], 1);
}

#[test]
fn health_check() {
    let app = loaded_dashboard();

    let resp = handle(empty_request(Method::GET, "/health"), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(body_string(resp), "ok");
}

//! HTTP-level tests for the explosion, requisition, item, and snapshot
//! endpoints, run against the real router with in-memory snapshots.

mod common;

use axum::http::Method;
use rust_decimal_macros::dec;
use serde_json::json;

use common::{edge, item, response_json, TestApp};

fn bottling_app() -> TestApp {
    TestApp::new(
        vec![
            edge("CASE-A", "BOTTLE-B", dec!(12)),
            edge("BOTTLE-B", "CAP-C", dec!(1)),
        ],
        vec![
            item("BOTTLE-B", "500ml PET bottle, filled", dec!(50), dec!(1.10)),
            item("cap-c ", "28mm tamper-evident cap", dec!(1200), dec!(0.04)),
        ],
    )
}

#[tokio::test]
async fn explode_endpoint_returns_full_report() {
    let app = bottling_app();

    let response = app
        .request(
            Method::POST,
            "/api/v1/bom/explode",
            Some(json!({ "root_item_id": "case-a", "build_quantity": 10 })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["root_item_id"], "CASE-A");
    assert_eq!(body["build_quantity"], 10);

    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["component_item_id"], "BOTTLE-B");
    assert_eq!(lines[0]["level"], 0);
    assert_eq!(lines[0]["total_required_quantity"], "120");
    assert_eq!(lines[0]["shortfall_quantity"], "70");
    assert_eq!(lines[0]["is_assembled"], true);
    // Item table id was "cap-c " in the snapshot; lookups normalize.
    assert_eq!(lines[1]["component_item_id"], "CAP-C");
    assert_eq!(lines[1]["level"], 1);
    assert_eq!(lines[1]["shortfall_quantity"], "0");

    assert!(body["missing_components"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn explode_rejects_non_positive_quantity() {
    let app = bottling_app();

    let response = app
        .request(
            Method::POST,
            "/api/v1/bom/explode",
            Some(json!({ "root_item_id": "CASE-A", "build_quantity": 0 })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn cyclic_bom_is_a_422() {
    let app = TestApp::new(
        vec![
            edge("A", "B", dec!(1)),
            edge("B", "A", dec!(1)),
        ],
        vec![
            item("A", "a", dec!(0), dec!(1)),
            item("B", "b", dec!(0), dec!(1)),
        ],
    );

    let response = app
        .request(
            Method::POST,
            "/api/v1/bom/explode",
            Some(json!({ "root_item_id": "A", "build_quantity": 1 })),
        )
        .await;
    assert_eq!(response.status(), 422);

    let body = response_json(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Circular"), "message was: {}", message);
}

#[tokio::test]
async fn shortfall_then_requisition_flow() {
    let app = bottling_app();

    let response = app
        .request(
            Method::POST,
            "/api/v1/bom/shortfall",
            Some(json!({ "root_item_id": "CASE-A", "build_quantity": 10 })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["nothing_short"], false);
    let candidates = body["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["item_id"], "BOTTLE-B");
    assert_eq!(candidates[0]["quantity_needed"], "70");

    // Pre-populate a requisition from the candidates.
    let response = app
        .request(
            Method::POST,
            "/api/v1/requisitions",
            Some(json!({
                "lines": [{
                    "item_id": candidates[0]["item_id"],
                    "description": candidates[0]["description"],
                    "quantity_needed": candidates[0]["quantity_needed"],
                    "unit_of_measure": candidates[0]["unit_of_measure"],
                    "unit_cost": candidates[0]["unit_cost"],
                }],
                "source_root_item_id": "CASE-A"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let created = response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .request(Method::GET, &format!("/api/v1/requisitions/{}", id), None)
        .await;
    assert_eq!(response.status(), 200);
    let requisition = response_json(response).await;
    assert_eq!(requisition["source_root_item_id"], "CASE-A");
    assert_eq!(requisition["lines"][0]["item_id"], "BOTTLE-B");
    // 70 bottles at 1.10
    assert_eq!(requisition["estimated_cost"], "77.00");

    let response = app.request(Method::GET, "/api/v1/requisitions", None).await;
    assert_eq!(response.status(), 200);
    let listing = response_json(response).await;
    assert_eq!(listing["pagination"]["total"], 1);
}

#[tokio::test]
async fn shortfall_reports_nothing_short() {
    let app = TestApp::new(
        vec![edge("CASE-A", "TRAY-D", dec!(1))],
        vec![item("TRAY-D", "Cardboard tray", dec!(400), dec!(0.55))],
    );

    let response = app
        .request(
            Method::POST,
            "/api/v1/bom/shortfall",
            Some(json!({ "root_item_id": "CASE-A", "build_quantity": 10 })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["nothing_short"], true);
    assert!(body["candidates"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_requisition_is_rejected() {
    let app = bottling_app();

    let response = app
        .request(
            Method::POST,
            "/api/v1/requisitions",
            Some(json!({ "lines": [] })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn unknown_requisition_is_404() {
    let app = bottling_app();

    let response = app
        .request(
            Method::GET,
            "/api/v1/requisitions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn item_listing_paginates_and_searches() {
    let app = TestApp::new(
        vec![],
        vec![
            item("BOTTLE-B", "500ml PET bottle, filled", dec!(50), dec!(1.10)),
            item("CAP-C", "28mm tamper-evident cap", dec!(1200), dec!(0.04)),
            item("TRAY-D", "Cardboard tray", dec!(400), dec!(0.55)),
        ],
    );

    let response = app
        .request(Method::GET, "/api/v1/items?page=1&per_page=2", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);

    let response = app
        .request(Method::GET, "/api/v1/items?search=cap", None)
        .await;
    let body = response_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["item_id"], "CAP-C");
}

#[tokio::test]
async fn out_of_range_page_numbers_return_empty_pages() {
    let app = bottling_app();

    let uri = format!("/api/v1/items?page={}&per_page=2", u64::MAX);
    let response = app.request(Method::GET, &uri, None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 2);

    let uri = format!("/api/v1/requisitions?page={}&per_page={}", u64::MAX, u64::MAX);
    let response = app.request(Method::GET, &uri, None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn direct_components_endpoint() {
    let app = bottling_app();

    let response = app
        .request(Method::GET, "/api/v1/bom/case-a/components", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["component_item_id"], "BOTTLE-B");
    assert_eq!(rows[0]["quantity_per_parent"], "12");
}

#[tokio::test]
async fn health_reports_snapshot_counts() {
    let app = bottling_app();

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["snapshots"]["bom_edges"], 2);
    assert_eq!(body["snapshots"]["items"], 2);
}

#[tokio::test]
async fn snapshot_status_and_reload() {
    let app = bottling_app();

    let response = app.request(Method::GET, "/api/v1/snapshots", None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["bom_edges"], 2);

    // The test store has no backing files; reload must fail without
    // disturbing the current tables.
    let response = app
        .request(Method::POST, "/api/v1/snapshots/reload", None)
        .await;
    assert_eq!(response.status(), 503);

    let response = app.request(Method::GET, "/api/v1/snapshots", None).await;
    let body = response_json(response).await;
    assert_eq!(body["items"], 2);
}

mod common;
use common::{store, MIXED};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use cob_dashboard::server::router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let app = router(Arc::new(store(MIXED)));
    let resp = app.oneshot(req).await.expect("router responds");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn options_list_months_in_data_and_every_region() {
    let (status, json) = send(get("/api/options")).await;
    assert_eq!(status, StatusCode::OK);

    let months: Vec<&str> = json["months"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["label"].as_str().unwrap())
        .collect();
    assert_eq!(months, vec!["Janeiro", "Fevereiro", "Março"]);
    assert_eq!(json["regions"].as_array().unwrap().len(), 8);
    assert_eq!(json["regions"][0]["value"], 21);
}

#[tokio::test]
async fn default_dashboard_has_eight_charts() {
    let (status, json) = send(get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filtered_calls"], 9);
    for (key, id) in [
        ("calls_per_day", "graph1"),
        ("status_by_region", "graph2"),
        ("calls_per_bucket", "graph3"),
        ("bucket_trend", "graph4"),
        ("answered_share", "graph5"),
        ("top_attendant", "graph6"),
        ("top_region_answered", "graph7"),
        ("top_region_unanswered", "graph8"),
    ] {
        assert_eq!(json[key]["id"], id);
        assert_eq!(json[key]["show_legend"], true);
        assert_eq!(json[key]["template"], "flatly");
    }
    assert_eq!(json["top_attendant"]["data"]["state"], "value");
    assert_eq!(json["top_attendant"]["data"]["value"]["attendant"], "A1");
}

#[tokio::test]
async fn query_string_filters_and_toggles() {
    let (status, json) = send(get("/api/dashboard?months=2&regions=4,61&theme=dark&legend=false")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filtered_calls"], 3);
    assert_eq!(json["theme"], "dark");
    assert_eq!(json["answered_share"]["template"], "darkly");
    assert_eq!(json["answered_share"]["show_legend"], false);
    assert_eq!(json["top_region_unanswered"]["data"]["value"]["code"], 61);
}

#[tokio::test]
async fn empty_month_renders_no_data_instead_of_failing() {
    let (status, json) = send(get("/api/dashboard?months=9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filtered_calls"], 0);
    for key in ["top_attendant", "top_region_answered", "top_region_unanswered"] {
        assert_eq!(json[key]["data"]["state"], "no_data");
    }
}

#[tokio::test]
async fn invalid_tokens_are_rejected() {
    let (status, json) = send(get("/api/dashboard?regions=21,abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn post_accepts_json_query() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/dashboard")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"months": ["all"], "regions": [99]}"#))
        .unwrap();
    let (status, json) = send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["filtered_calls"], 1);
    assert_eq!(json["status_by_region"]["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn health_check() {
    let app = router(Arc::new(store(MIXED)));
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

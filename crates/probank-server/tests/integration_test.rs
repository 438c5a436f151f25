//! End-to-end integration tests for the catalogue HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! validation -> CatalogService -> store -> HTTP response.
//!
//! Each test creates a fresh AppState backed by the in-memory store. Tests
//! use `tower::ServiceExt::oneshot` to send requests directly to the router
//! without starting a network server.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use probank_core::problem_identity;
use probank_server::router::build_router;
use probank_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Creates a fresh router backed by an in-memory store.
fn test_app() -> Router {
    build_router(AppState::in_memory())
}

/// Sends a request with an optional JSON body and returns (status, json).
async fn request(
    app: &Router,
    method: &str,
    path: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    request(app, "GET", path, None).await
}

async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request(app, "POST", path, Some(body)).await
}

async fn put_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request(app, "PUT", path, Some(body)).await
}

async fn delete_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    request(app, "DELETE", path, None).await
}

/// A complete problem payload for `platform_problem_id`, member of `set_ids`.
fn problem_payload(platform_problem_id: &str, set_ids: &[&str]) -> serde_json::Value {
    json!({
        "title": format!("Problem {}", platform_problem_id),
        "source": "CODEFORCES",
        "source_link": format!(
            "https://codeforces.com/problemset/problem/{}",
            platform_problem_id
        ),
        "problem_set_ids": set_ids,
        "problem_metadata": {
            "platform_problem_id": platform_problem_id,
            "difficulty": "easy"
        }
    })
}

/// Creates a problem set and returns its id.
async fn setup_problem_set(app: &Router, title: &str) -> String {
    let (status, body) = post_json(app, "/problem-sets", json!({ "title": title })).await;
    assert_eq!(status, StatusCode::OK, "create problem set failed: {:?}", body);
    body["id"].as_str().unwrap().to_string()
}

/// Creates a problem and returns its store id.
async fn setup_problem(
    app: &Router,
    platform_problem_id: &str,
    set_ids: &[&str],
) -> String {
    let (status, body) =
        post_json(app, "/problems", problem_payload(platform_problem_id, set_ids)).await;
    assert_eq!(status, StatusCode::OK, "create problem failed: {:?}", body);
    body["id"].as_str().unwrap().to_string()
}

/// Fetches a set's cached problem_count.
async fn problem_count(app: &Router, set_id: &str) -> i64 {
    let (status, body) = get_json(app, &format!("/problem-sets/{}", set_id)).await;
    assert_eq!(status, StatusCode::OK, "get problem set failed: {:?}", body);
    body["problem_count"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Problems
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_lists_problems_newest_first() {
    let app = test_app();
    let (status, body) = get_json(&app, "/problems").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problems"].as_array().unwrap().len(), 0);

    setup_problem(&app, "4A", &[]).await;
    setup_problem(&app, "1A", &[]).await;

    let (status, body) = get_json(&app, "/problems").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problems"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_computes_identity_and_ignores_client_hash() {
    let app = test_app();
    let mut payload = problem_payload("123A", &[]);
    // A client-supplied hash must be ignored.
    payload["problem_id"] = json!("attacker-controlled");

    let (status, body) = post_json(&app, "/problems", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["problem_id"].as_str().unwrap(),
        problem_identity("CODEFORCES", "123A")
    );
    assert!(body["id"].as_str().is_some());
    assert_eq!(body["source"], "CODEFORCES");
    assert_eq!(body["problem_metadata"]["difficulty"], "easy");
}

#[tokio::test]
async fn create_with_membership_updates_set_count() {
    let app = test_app();
    let set_id = setup_problem_set(&app, "div2-warmups").await;
    assert_eq!(problem_count(&app, &set_id).await, 0);

    setup_problem(&app, "123A", &[&set_id]).await;
    assert_eq!(problem_count(&app, &set_id).await, 1);

    setup_problem(&app, "123B", &[&set_id]).await;
    assert_eq!(problem_count(&app, &set_id).await, 2);
}

#[tokio::test]
async fn create_rejects_missing_fields_with_details() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/problems",
        json!({ "source": "CODEFORCES" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");

    let details = body["error"]["details"].as_array().unwrap();
    let fields: Vec<&str> = details
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"problem_metadata"));
    assert_eq!(details[0]["location"], "body");
    assert_eq!(
        details[0]["message"].as_str().unwrap(),
        "Invalid or missing 'title'"
    );
}

#[tokio::test]
async fn create_rejects_unknown_platform() {
    let app = test_app();
    let mut payload = problem_payload("123A", &[]);
    payload["source"] = json!("LEETCODE");

    let (status, body) = post_json(&app, "/problems", payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["field"], "source");
}

#[tokio::test]
async fn show_returns_problem_or_not_found() {
    let app = test_app();
    let id = setup_problem(&app, "4A", &[]).await;

    let (status, body) = get_json(&app, &format!("/problems/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_str().unwrap(), id);

    let (status, body) = get_json(&app, "/problems/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn exists_looks_up_by_generated_id() {
    let app = test_app();
    setup_problem(&app, "123A", &[]).await;
    let hash = problem_identity("CODEFORCES", "123A");

    let (status, body) = get_json(&app, &format!("/problems/exists/{}", hash)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problem_id"].as_str().unwrap(), hash);

    let (status, body) = get_json(&app, "/problems/exists/unknown-hash").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn update_recomputes_identity() {
    let app = test_app();
    let id = setup_problem(&app, "123A", &[]).await;
    let original_hash = problem_identity("CODEFORCES", "123A");

    // Identity fields unchanged: hash unchanged.
    let (status, body) =
        put_json(&app, &format!("/problems/{}", id), problem_payload("123A", &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problem_id"].as_str().unwrap(), original_hash);

    // Changing the platform id moves the identity.
    let (status, body) =
        put_json(&app, &format!("/problems/{}", id), problem_payload("123B", &[])).await;
    assert_eq!(status, StatusCode::OK);
    let new_hash = body["problem_id"].as_str().unwrap();
    assert_eq!(new_hash, problem_identity("CODEFORCES", "123B"));
    assert_ne!(new_hash, original_hash);
}

#[tokio::test]
async fn update_propagates_to_new_membership() {
    let app = test_app();
    let set_a = setup_problem_set(&app, "a").await;
    let set_b = setup_problem_set(&app, "b").await;
    let id = setup_problem(&app, "123A", &[&set_a]).await;
    assert_eq!(problem_count(&app, &set_a).await, 1);

    let (status, _) = put_json(
        &app,
        &format!("/problems/{}", id),
        problem_payload("123A", &[&set_b]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The gaining set is recomputed. The losing set is not part of the new
    // membership and keeps its stale count until the next mutation that
    // touches it.
    assert_eq!(problem_count(&app, &set_b).await, 1);
    assert_eq!(problem_count(&app, &set_a).await, 1);
}

#[tokio::test]
async fn update_missing_problem_is_not_found() {
    let app = test_app();
    let (status, body) = put_json(
        &app,
        "/problems/nonexistent",
        problem_payload("123A", &[]),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn update_rejects_invalid_payload_before_lookup() {
    let app = test_app();
    let (status, body) = put_json(&app, "/problems/whatever", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn delete_propagates_to_every_member_set() {
    let app = test_app();
    let set_x = setup_problem_set(&app, "x").await;
    let set_y = setup_problem_set(&app, "y").await;
    let id = setup_problem(&app, "123A", &[&set_x, &set_y]).await;
    assert_eq!(problem_count(&app, &set_x).await, 1);
    assert_eq!(problem_count(&app, &set_y).await, 1);

    let (status, body) = delete_json(&app, &format!("/problems/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = get_json(&app, &format!("/problems/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Counts recomputed from the pre-deletion membership snapshot.
    assert_eq!(problem_count(&app, &set_x).await, 0);
    assert_eq!(problem_count(&app, &set_y).await, 0);
}

#[tokio::test]
async fn delete_missing_problem_is_not_found() {
    let app = test_app();
    let (status, body) = delete_json(&app, "/problems/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Problem sets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn problem_set_crud_roundtrip() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/problem-sets",
        json!({
            "title": "graphs",
            "description": "shortest paths and flows",
            "tags": ["graphs", "bfs"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let set_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["problem_count"], 0);

    let (status, body) = get_json(&app, "/problem-sets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problem_sets"].as_array().unwrap().len(), 1);

    let (status, body) = put_json(
        &app,
        &format!("/problem-sets/{}", set_id),
        json!({ "title": "graph theory" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "graph theory");

    let (status, body) = delete_json(&app, &format!("/problem-sets/{}", set_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = get_json(&app, &format!("/problem-sets/{}", set_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn problem_set_create_requires_title() {
    let app = test_app();
    let (status, body) = post_json(&app, "/problem-sets", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details[0]["field"], "title");
}

#[tokio::test]
async fn problem_set_update_cannot_touch_count() {
    let app = test_app();
    let set_id = setup_problem_set(&app, "greedy").await;
    setup_problem(&app, "123A", &[&set_id]).await;
    assert_eq!(problem_count(&app, &set_id).await, 1);

    let (status, body) = put_json(
        &app,
        &format!("/problem-sets/{}", set_id),
        json!({ "title": "greedy-renamed", "problem_count": 999 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problem_count"], 1);
}

#[tokio::test]
async fn problem_set_members_listing() {
    let app = test_app();
    let set_id = setup_problem_set(&app, "dp").await;
    setup_problem(&app, "123A", &[&set_id]).await;
    setup_problem(&app, "123B", &[]).await;

    let (status, body) =
        get_json(&app, &format!("/problem-sets/{}/problems", set_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["problem_set_id"].as_str().unwrap(), set_id);
    assert_eq!(body["problems"].as_array().unwrap().len(), 1);

    let (status, _) = get_json(&app, "/problem-sets/nonexistent/problems").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_set_detaches_membership_from_problems() {
    let app = test_app();
    let doomed = setup_problem_set(&app, "doomed").await;
    let kept = setup_problem_set(&app, "kept").await;
    let p1 = setup_problem(&app, "123A", &[&doomed, &kept]).await;
    let p2 = setup_problem(&app, "123B", &[&doomed]).await;

    let (status, _) = delete_json(&app, &format!("/problem-sets/{}", doomed)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, &format!("/problems/{}", p1)).await;
    assert_eq!(
        body["problem_set_ids"].as_array().unwrap(),
        &vec![json!(kept.clone())]
    );
    let (_, body) = get_json(&app, &format!("/problems/{}", p2)).await;
    assert_eq!(body["problem_set_ids"].as_array().unwrap().len(), 0);

    // The surviving set's membership is untouched.
    let (status, body) = get_json(&app, &format!("/problem-sets/{}", kept)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "kept");
}

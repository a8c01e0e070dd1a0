//! Startup plus the full task lifecycle against a real PostgreSQL store

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::TestStore;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use taskboard_core::SEED_TASK_TITLES;
use taskboard_server::create_server;
use tower::ServiceExt;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
#[ignore = "needs Docker or TASKBOARD_TEST_DATABASE_URL"]
async fn test_fresh_store_lifecycle() {
    let store = TestStore::create().await;

    let repo = store.repository().await;
    let report = repo.initialize_schema().await.unwrap();
    assert!(report.seeded);
    assert_eq!(report.task_count, 5);

    let app = create_server(repo.clone()).router();

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, original) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = original.as_array().unwrap();
    assert_eq!(tasks.len(), 5);
    for (i, task) in tasks.iter().enumerate() {
        assert_eq!(task["id"], i as i64 + 1);
        assert_eq!(task["title"], SEED_TASK_TITLES[i]);
        assert_eq!(task["done"], false);
    }

    let (status, created) = send(&app, "POST", "/tasks", Some(json!({ "title": "X" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 6);
    assert_eq!(created["title"], "X");
    assert_eq!(created["done"], false);

    let (status, updated) = send(
        &app,
        "PUT",
        "/tasks/6",
        Some(json!({ "title": "Y", "done": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Y");
    assert_eq!(updated["done"], true);
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, body) = send(&app, "DELETE", "/tasks/6", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, original);

    let (status, _) = send(&app, "PUT", "/tasks/6", Some(json!({ "title": "Z" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/tasks/6", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    repo.close().await;
    store.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Docker or TASKBOARD_TEST_DATABASE_URL"]
async fn test_restart_keeps_existing_rows() {
    let store = TestStore::create().await;

    let first = store.repository().await;
    first.initialize_schema().await.unwrap();
    let app = create_server(first.clone()).router();
    let (status, _) = send(&app, "PUT", "/tasks/1", Some(json!({ "title": "Renamed", "done": true }))).await;
    assert_eq!(status, StatusCode::OK);
    first.close().await;

    let second = store.repository().await;
    let report = second.initialize_schema().await.unwrap();
    assert!(!report.seeded);
    assert_eq!(report.task_count, 5);

    let app = create_server(second.clone()).router();
    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(body[0]["title"], "Renamed");
    assert_eq!(body[0]["done"], true);
    assert_eq!(body.as_array().unwrap().len(), 5);

    second.close().await;
    store.cleanup().await;
}

#[tokio::test]
#[ignore = "needs Docker or TASKBOARD_TEST_DATABASE_URL"]
async fn test_concurrent_startups_seed_once() {
    let store = TestStore::create().await;

    let a = store.repository().await;
    let b = store.repository().await;
    let (ra, rb) = tokio::join!(a.initialize_schema(), b.initialize_schema());
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert!(ra.seeded ^ rb.seeded, "exactly one replica seeds");
    assert_eq!(ra.task_count, 5);
    assert_eq!(rb.task_count, 5);

    a.close().await;
    b.close().await;
    store.cleanup().await;
}

//! HTTP tests: request ids, status capture and access logs over a real socket.

use reqwest::StatusCode;

use super::helpers::TestServer;

#[tokio::test]
async fn test_fast_get_is_logged() {
    let server = TestServer::start(1000).await;

    let resp = server
        .client
        .get(server.url("/items?x=1"))
        .send()
        .await
        .expect("GET request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let header_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("response carries the request id");

    let line = server.last_access_log();
    assert_eq!(line["level"], "info");
    assert_eq!(line["method"], "GET");
    assert_eq!(line["path"], "/items");
    assert_eq!(line["query"], "x=1");
    assert_eq!(line["status"], 200);
    assert_eq!(line["request_id"], header_id.as_str());
    assert!(line["duration_ms"].is_u64());
    assert!(line.get("long_query").is_none());
    assert!(line.get("body").is_none());
}

#[tokio::test]
async fn test_request_id_header_and_status() {
    let server = TestServer::start(1000).await;

    let resp = server
        .client
        .post(server.url("/items?status=201"))
        .header("x-request-id", "abc123")
        .body("created")
        .send()
        .await
        .expect("POST request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()["x-request-id"], "abc123");
    assert_eq!(resp.text().await.unwrap(), "created");

    let line = server.last_access_log();
    assert_eq!(line["request_id"], "abc123");
    assert_eq!(line["status"], 201);
    assert_eq!(line["query"], "status=201");

    // The handler's own log line carries the same id.
    let echo: Vec<_> = server
        .logs()
        .into_iter()
        .filter(|l| l["message"] == "echo")
        .collect();
    assert_eq!(echo.len(), 1);
    assert_eq!(echo[0]["request_id"], "abc123");
    assert_eq!(echo[0]["level"], "debug");
}

#[tokio::test]
async fn test_slow_json_request_includes_body() {
    let server = TestServer::start(20).await;

    let resp = server
        .client
        .post(server.url("/orders?sleep_ms=60"))
        .header("content-type", "application/json")
        .body(r#"{"a":1}"#)
        .send()
        .await
        .expect("POST request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), r#"{"a":1}"#);

    let line = server.last_access_log();
    assert_eq!(line["long_query"], true);
    assert_eq!(line["body"], serde_json::json!({"a": 1}));
    assert!(line["duration_ms"].as_u64().unwrap() >= 60);
}

#[tokio::test]
async fn test_slow_malformed_json_omits_body() {
    let server = TestServer::start(20).await;

    let resp = server
        .client
        .post(server.url("/orders?sleep_ms=60"))
        .header("content-type", "application/json")
        .body(r#"{"a":"#)
        .send()
        .await
        .expect("POST request failed");
    assert_eq!(resp.text().await.unwrap(), r#"{"a":"#);

    let line = server.last_access_log();
    assert_eq!(line["long_query"], true);
    assert!(line.get("body").is_none());
}

#[tokio::test]
async fn test_user_and_canonical_query() {
    let server = TestServer::start(1000).await;

    let resp = server
        .client
        .get(server.url("/search?b=2&a=1&q=two+words"))
        .header("x-user", "alice")
        .send()
        .await
        .expect("GET request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let line = server.last_access_log();
    assert_eq!(line["user"], "alice");
    assert_eq!(line["query"], "a=1&b=2&q=two+words");
    assert_eq!(line["path"], "/search");
}

#[tokio::test]
async fn test_generated_request_ids_differ() {
    let server = TestServer::start(1000).await;

    for _ in 0..2 {
        server
            .client
            .get(server.url("/"))
            .send()
            .await
            .expect("GET request failed");
    }

    let lines = server.access_logs();
    assert_eq!(lines.len(), 2);
    assert_ne!(lines[0]["request_id"], lines[1]["request_id"]);
    assert!(lines[0]["request_id"].as_str().unwrap().contains('/'));
}

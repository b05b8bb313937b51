//! Tests for the path builder

use super::*;
use crate::http::ClientConfig;
use crate::retry::RetryPolicy;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn offline_client() -> ApiClient {
    ApiClient::new(
        ClientConfig::builder()
            .base_url("http://localhost:5000")
            .build(),
    )
    .unwrap()
}

fn client_for(server: &MockServer) -> ApiClient {
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .retry(RetryPolicy::new(5, Duration::from_millis(1), Duration::from_millis(5)))
        .build();
    ApiClient::new(config).unwrap()
}

// ============================================================================
// Path composition
// ============================================================================

#[test]
fn test_root_path() {
    let builder = offline_client().req();
    assert_eq!(builder.path(), "/");
}

#[test]
fn test_segments_join_with_single_slash() {
    let builder = offline_client().req().segment("a").segment("b").segment(123);
    assert_eq!(builder.path(), "/a/b/123");
}

#[test]
fn test_leading_and_repeated_slashes_are_dropped() {
    let builder = offline_client()
        .req()
        .segment("/a")
        .segment("//b/")
        .segment("c//d")
        .segment("");
    assert_eq!(builder.path(), "/a/b/c/d");
}

#[test]
fn test_segments_helper() {
    let builder = offline_client().req().segments(["frameworks", "g-cloud-7", "lots"]);
    assert_eq!(builder.path(), "/frameworks/g-cloud-7/lots");
}

#[test]
fn test_builders_are_immutable() {
    let frameworks = offline_client().req().segment("frameworks");
    let gcloud = frameworks.segment("g-cloud-7");
    let dos = frameworks.segment("dos");

    assert_eq!(frameworks.path(), "/frameworks");
    assert_eq!(gcloud.path(), "/frameworks/g-cloud-7");
    assert_eq!(dos.path(), "/frameworks/dos");
}

#[test]
fn test_access_dispatches_on_verb_names() {
    let root = offline_client().req();

    let PathAccess::Segment(users) = root.access("users") else {
        panic!("Expected a segment");
    };
    let PathAccess::Segment(user) = users.access("42") else {
        panic!("Expected a segment");
    };
    let PathAccess::Call(call) = user.access("get") else {
        panic!("Expected a bound call");
    };

    assert_eq!(call.method(), Method::GET);
    assert_eq!(call.path(), "/users/42");
    assert!(call.client().context().is_none());
}

#[test]
fn test_access_only_lowercase_names_are_verbs() {
    let builder = offline_client().req().segment("x");
    assert!(matches!(builder.access("patch"), PathAccess::Call(c) if c.method() == Method::PATCH));
    assert!(matches!(builder.access("delete"), PathAccess::Call(c) if c.method() == Method::DELETE));

    for name in ["GET", "Delete", "PATCH"] {
        match builder.access(name) {
            PathAccess::Segment(b) => assert_eq!(b.path(), format!("/x/{name}")),
            PathAccess::Call(_) => panic!("'{name}' must stay a path segment"),
        }
    }
}

#[test]
fn test_path_is_a_segment_not_a_verb() {
    let builder = offline_client().req().segment("files");
    match builder.access("path") {
        PathAccess::Segment(b) => assert_eq!(b.path(), "/files/path"),
        PathAccess::Call(_) => panic!("'path' must not be treated as a verb"),
    }
}

#[test]
fn test_terminal_methods() {
    let builder = offline_client().req().segment("things");

    let cases = [
        (builder.get(), Method::GET),
        (builder.head(), Method::HEAD),
        (builder.post(json!({})), Method::POST),
        (builder.put(json!({})), Method::PUT),
        (builder.patch(json!({})), Method::PATCH),
        (builder.delete(), Method::DELETE),
        (builder.options(), Method::OPTIONS),
        (builder.trace(), Method::TRACE),
        (builder.connect(), Method::CONNECT),
    ];

    for (call, expected) in cases {
        assert_eq!(call.method(), expected);
        assert_eq!(call.path(), "/things");
    }
}

#[test]
fn test_bound_call_builders() {
    let call = offline_client()
        .req()
        .segment("briefs")
        .get()
        .query("status", "live")
        .query("status", "closed");

    assert_eq!(
        call.params(),
        &[
            ("status".to_string(), "live".to_string()),
            ("status".to_string(), "closed".to_string()),
        ]
    );
    assert!(call.body().is_none());

    let call = offline_client().req().segment("briefs").post(json!({"title": "t"}));
    assert_eq!(call.body(), Some(&json!({"title": "t"})));
}

// ============================================================================
// Sending
// ============================================================================

#[tokio::test]
async fn test_get_issues_request_to_joined_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a/b/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .req()
        .segment("a")
        .segment("/b")
        .segment(123)
        .get()
        .send()
        .await
        .unwrap();

    assert_eq!(result, Some(json!({"ok": true})));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.as_str(),
        format!("{}/a/b/123", mock_server.uri())
    );
}

#[tokio::test]
async fn test_post_sends_body_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/suppliers/1/users"))
        .and(query_param("notify", "true"))
        .and(body_json(json!({"email": "a@b.c"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .req()
        .segments(["suppliers", "1", "users"])
        .post(json!({"email": "a@b.c"}))
        .query("notify", "true")
        .send()
        .await
        .unwrap();

    assert_eq!(result, Some(json!({"id": 9})));
}

#[tokio::test]
async fn test_bound_call_can_be_sent_twice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("pong")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let call = client_for(&mock_server).req().segment("ping").get();
    call.send().await.unwrap();
    call.send().await.unwrap();
}

#[tokio::test]
async fn test_send_with_retry_retries_reads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.req().segment("flaky").get().send_with_retry().await;

    assert_eq!(result.unwrap(), Some(json!({"ok": true})));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_send_with_retry_refuses_writes() {
    let mock_server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let builder = client.req().segment("briefs");

    for call in [
        builder.post(json!({})),
        builder.put(json!({})),
        builder.patch(json!({})),
        builder.delete(),
    ] {
        let err = call.send_with_retry().await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}

#[tokio::test]
async fn test_send_without_retry_fails_fast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.req().segment("flaky").get().send().await.unwrap_err();
    assert!(err.is_temporary());
}

//! Integration tests for the reqwest primitive against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use fetchkit_lib::{
    BuilderConfig, ConfigError, EndpointBuilder, EndpointDeclaration, Fetch, FetchError, Request,
    RequestInit, ReqwestFetch, TransportError, body, compose, header, json, method, prefix,
    query,
};
use serde::Deserialize;
use wiremock::matchers::{
    body_json, body_string, header as header_matcher, method as http_method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, PartialEq, Deserialize)]
struct TestResponse {
    id: u64,
    name: String,
}

#[tokio::test]
async fn get_json_through_builder() {
    let mock_server = MockServer::start().await;

    Mock::given(http_method("GET"))
        .and(path("/users/1"))
        .and(header_matcher("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "name": "Alice"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let builder = EndpointBuilder::with_fetch(
        BuilderConfig::new(mock_server.uri()),
        Arc::new(ReqwestFetch::new().unwrap()),
    );
    let get_user = builder.build(|id: u64| {
        Ok(EndpointDeclaration::new(format!("/users/{id}"), vec![method("GET")])
            .parse_json::<TestResponse>())
    });

    let user = get_user.call(1).await.unwrap();
    assert_eq!(
        user,
        TestResponse {
            id: 1,
            name: "Alice".to_string()
        }
    );
}

#[tokio::test]
async fn post_with_headers_query_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(http_method("POST"))
        .and(path("/v1/files/abc/comments"))
        .and(query_param("as_md", "true"))
        .and(header_matcher("x-figma-token", "secret"))
        .and(body_json(serde_json::json!({"message": "hi"})))
        .respond_with(ResponseTemplate::new(201).insert_header("x-request-id", "r-1"))
        .mount(&mock_server)
        .await;

    let pipeline = compose(
        vec![
            prefix(mock_server.uri()),
            method("POST"),
            json(),
            header("X-Figma-Token", "secret"),
            query([("as_md", true)]),
            body(r#"{"message":"hi"}"#),
        ],
        Arc::new(ReqwestFetch::new().unwrap()),
    );

    let response = pipeline
        .fetch("/v1/files/abc/comments".into(), RequestInit::default())
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    assert_eq!(response.headers().get("X-Request-Id"), Some("r-1"));
    assert!(response.url().unwrap().contains("/v1/files/abc/comments"));
}

#[tokio::test]
async fn error_status_is_a_value() {
    let mock_server = MockServer::start().await;

    Mock::given(http_method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&mock_server)
        .await;

    let fetch = ReqwestFetch::new().unwrap();
    let response = fetch
        .fetch(
            format!("{}/forbidden", mock_server.uri()).into(),
            RequestInit::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
    assert!(!response.ok());
    assert_eq!(response.text().unwrap(), "Forbidden");
}

#[tokio::test]
async fn per_request_timeout_maps_to_transport_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(http_method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let fetch = ReqwestFetch::new().unwrap();
    let init = RequestInit {
        timeout: Some(Duration::from_millis(50)),
        ..RequestInit::default()
    };

    let err = fetch
        .fetch(format!("{}/slow", mock_server.uri()).into(), init)
        .await
        .unwrap_err();

    match err {
        FetchError::Transport(TransportError::Timeout { duration_ms }) => {
            assert_eq!(duration_ms, 50);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn extension_method_is_sent_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(http_method("PURGE"))
        .and(path("/cache"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetch = ReqwestFetch::new().unwrap();
    let response = fetch
        .fetch(
            format!("{}/cache", mock_server.uri()).into(),
            RequestInit::new().with_method("PURGE"),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn invalid_header_is_config_error() {
    let fetch = ReqwestFetch::new().unwrap();
    let err = fetch
        .fetch(
            "http://127.0.0.1:9/never".into(),
            RequestInit::new().with_header("Bad Name", "x"),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::Config(ConfigError::InvalidHeader { .. })
    ));
}

#[tokio::test]
async fn request_target_sends_its_own_init() {
    let mock_server = MockServer::start().await;

    Mock::given(http_method("POST"))
        .and(path("/items"))
        .and(header_matcher("x-carried", "yes"))
        .and(body_string("{}"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(http_method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let carried = RequestInit::new()
        .with_method("POST")
        .with_header("X-Carried", "yes")
        .with_body("{}");
    let request = Request::parse(&format!("{}/items", mock_server.uri()), carried).unwrap();

    let response = ReqwestFetch::new()
        .unwrap()
        .fetch(request.into(), RequestInit::default())
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn call_site_init_overrides_request_target_method() {
    let mock_server = MockServer::start().await;

    Mock::given(http_method("PUT"))
        .and(path("/items"))
        .and(body_string("carried"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let carried = RequestInit::new().with_method("POST").with_body("carried");
    let request = Request::parse(&format!("{}/items", mock_server.uri()), carried).unwrap();

    let pipeline = compose(vec![method("PUT")], Arc::new(ReqwestFetch::new().unwrap()));
    let response = pipeline
        .fetch(request.into(), RequestInit::default())
        .await
        .unwrap();

    assert_eq!(response.status(), 204);
}

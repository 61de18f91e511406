//! End-to-end pipeline tests.
//!
//! These tests compose transformers and endpoint builders over recording and
//! mock primitives to verify:
//! - The exact request that reaches the primitive
//! - Status handling in ok-checking and lenient endpoints
//! - Retry and cache behavior when stacked together

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fetchkit_lib::{
    Backoff, BuilderConfig, EndpointBuilder, EndpointDeclaration, EndpointOptions, FetchError,
    FetchMock, FetchRef, Headers, MemoryCacheStore, Payload, RequestInit, RequestTarget, Response,
    ResponseKind, TransportError, body, cache_with, compose, create_endpoint, fetch_fn, json,
    method, prefix, query, retry,
};
use serde_json::json;

type Calls = Arc<Mutex<Vec<(String, RequestInit)>>>;

/// Primitive that records every call and answers `200 {}`.
fn recording() -> (FetchRef, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&calls);
    let fetch = fetch_fn(move |target: RequestTarget, init| {
        log.lock().unwrap().push((target.href(), init));
        async { Ok(Response::new(200, "{}")) }
    });
    (fetch, calls)
}

// ============================================================================
// Composition
// ============================================================================

#[tokio::test]
async fn post_json_body_reaches_primitive_once() {
    let (fetch, calls) = recording();
    let pipeline = compose(vec![method("POST"), json(), body(r#"{"a":1}"#)], fetch);

    pipeline
        .fetch("/x".into(), RequestInit::default())
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (href, init) = &calls[0];
    assert_eq!(href, "/x");
    assert_eq!(
        init,
        &RequestInit {
            method: Some("POST".to_string()),
            headers: Headers::from([("Content-Type", "application/json")]),
            body: Some(r#"{"a":1}"#.into()),
            timeout: None,
        }
    );
}

#[tokio::test]
async fn prefix_and_query_compose_on_bare_path() {
    let (fetch, calls) = recording();
    let pipeline = compose(
        vec![
            prefix("https://api.flickr.com/services/rest"),
            query([("format", "json")]),
            query([("method", "flickr.photosets.getList")]),
        ],
        fetch,
    );

    pipeline
        .fetch("/".into(), RequestInit::default())
        .await
        .unwrap();

    assert_eq!(
        calls.lock().unwrap()[0].0,
        "https://api.flickr.com/services/rest/?format=json&method=flickr.photosets.getList"
    );
}

// ============================================================================
// Endpoint builder
// ============================================================================

#[tokio::test]
async fn builder_sends_prefixed_get_with_json_header() {
    let (fetch, calls) = recording();
    let builder = EndpointBuilder::with_fetch(BuilderConfig::new("https://api.example.com"), fetch);
    let get_user = builder.build(|id: u64| {
        Ok(EndpointDeclaration::new(
            format!("/users/{id}"),
            vec![method("GET")],
        ))
    });

    get_user.call(1).await.unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "https://api.example.com/users/1");
    assert_eq!(
        calls[0].1,
        RequestInit::new()
            .with_method("GET")
            .with_header("Content-Type", "application/json")
    );
}

#[tokio::test]
async fn not_found_rejected_by_checking_variant_only() {
    let mock = Arc::new(FetchMock::new());
    mock.on("/missing", "GET", |_, _| {
        Ok(Response::new(404, "Not Found").into())
    })
    .unwrap();

    let declare = |_: ()| -> Result<EndpointDeclaration, FetchError> {
        Ok(EndpointDeclaration::new("/missing", vec![method("GET")]))
    };

    let checking = EndpointBuilder::with_fetch(
        BuilderConfig::new("https://example.com").check_status(true),
        mock.clone(),
    )
    .build(declare);
    let lenient =
        EndpointBuilder::with_fetch(BuilderConfig::new("https://example.com"), mock).build(declare);

    match checking.call(()).await {
        Err(FetchError::Status(err)) => {
            assert_eq!(err.status(), 404);
            assert_eq!(err.response().text().unwrap(), "Not Found");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    let response = lenient.call(()).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn typed_parser_through_mock() {
    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Item {
        id: u32,
        name: String,
    }

    let mock = Arc::new(FetchMock::new());
    mock.on("/items/\\d+", "GET", |url, _| {
        let id: u32 = url
            .path()
            .rsplit('/')
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or("bad id")?;
        Ok(json!({"id": id, "name": format!("item-{id}")}).into())
    })
    .unwrap();

    let builder = EndpointBuilder::with_fetch(BuilderConfig::new("https://shop.test"), mock);
    let get_item = builder.build(|id: u32| {
        Ok(EndpointDeclaration::new(format!("/items/{id}"), vec![method("GET")])
            .parse_json::<Item>())
    });

    assert_eq!(
        get_item.call(5).await.unwrap(),
        Item {
            id: 5,
            name: "item-5".to_string()
        }
    );
}

#[tokio::test]
async fn request_endpoint_text_and_error_cause() {
    let mock = Arc::new(FetchMock::new());
    mock.on("/api/text", "GET", |_, _| {
        Ok(Response::new(200, "Hello, World!")
            .with_header("Content-Type", "text/plain")
            .into())
    })
    .unwrap()
    .on("/api/server-error", "GET", |_, _| {
        Ok(Response::new(500, "Server Error").into())
    })
    .unwrap();

    let text = create_endpoint(
        vec![prefix("https://example.com")],
        EndpointOptions {
            parse: ResponseKind::Text,
        },
        mock.clone(),
    );

    assert_eq!(
        text.call("/api/text", vec![]).await.unwrap(),
        Payload::Text("Hello, World!".to_string())
    );

    let err = text.call("/api/server-error", vec![]).await.unwrap_err();
    assert_eq!(err.response().map(Response::status), Some(500));
    assert!(err.to_string().contains("500"));
}

// ============================================================================
// Retry and cache stacked
// ============================================================================

#[tokio::test(start_paused = true)]
async fn retry_outside_cache_recovers_then_caches() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let flaky = fetch_fn(move |_, _| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if n == 0 {
                Err(TransportError::Connection("reset".to_string()).into())
            } else {
                Ok(Response::new(200, r#"{"ok":true}"#))
            }
        }
    });

    let pipeline = compose(
        vec![
            method("GET"),
            retry(3, Duration::from_millis(100), Backoff::exponential()),
            cache_with(Duration::from_secs(60), Arc::new(MemoryCacheStore::new())),
        ],
        flaky,
    );

    for _ in 0..3 {
        let response = pipeline
            .fetch("https://example.com/data".into(), RequestInit::default())
            .await
            .unwrap();
        assert_eq!(response.json_value().unwrap(), json!({"ok": true}));
    }

    // One failure, one success, then cache hits.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn unparseable_cached_body_is_fetched_once() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let html = fetch_fn(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok(Response::new(200, "<html>")) }
    });

    let pipeline = compose(
        vec![
            method("GET"),
            retry(3, Duration::from_millis(100), Backoff::default()),
            cache_with(Duration::from_secs(60), Arc::new(MemoryCacheStore::new())),
        ],
        html,
    );

    let err = pipeline
        .fetch("https://example.com/page".into(), RequestInit::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

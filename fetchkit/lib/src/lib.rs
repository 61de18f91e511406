//! Composable request transformers and endpoint builders.
//!
//! A request flows through an ordered list of [`Transformer`]s composed over
//! a request primitive ([`Fetch`]). The first transformer in the list is the
//! outermost: it sees the request first and the response last.
//!
//! ```rust,ignore
//! use fetchkit_lib::{Fetch, RequestInit, ReqwestFetch, compose, json, method, body};
//! use std::sync::Arc;
//!
//! let post = compose(
//!     vec![method("POST"), json(), body(r#"{"a":1}"#)],
//!     Arc::new(ReqwestFetch::new()?),
//! );
//! let response = post.fetch("https://example.com/x".into(), RequestInit::default()).await?;
//! ```
//!
//! For API clients, [`EndpointBuilder`] turns declaration functions into
//! callable [`Endpoint`]s that share a base URL and common transformers.

pub mod client;
pub mod compose;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod init;
mod method;
pub mod mock;
pub mod response;
pub mod target;
pub mod transformers;

pub use client::{ReqwestFetch, ReqwestFetchBuilder, default_fetch};
pub use compose::{SharedTransformer, Transformer, compose, transformer_fn};
pub use endpoint::{
    BuilderConfig, Endpoint, EndpointBuilder, EndpointDeclaration, EndpointOptions, ParseMode,
    RequestEndpoint, ResponseKind, check_status, create_endpoint, endpoint, endpoint_with,
};
pub use error::{
    AuthError, ConfigError, FetchError, HttpStatusError, ParseError, Result, TransportError,
    ValidationError,
};
pub use fetch::{BoxFuture, Fetch, FetchRef, FetchResult, fetch_fn};
pub use init::{Headers, RequestInit};
pub use method::{RestMethod, to_reqwest_method};
pub use mock::{FetchMock, MockReply};
pub use response::{Payload, Response};
pub use target::{Request, RequestTarget};
pub use transformers::{
    Backoff, CacheEntry, CacheStore, DEFAULT_CACHE_MAX_AGE, MemoryCacheStore, RetryPolicy, body,
    cache, cache_with, debug, debug_with, default_cache_store, header, json, json_body, method,
    prefix, query, query_object, query_pairs, retry, retry_with,
};

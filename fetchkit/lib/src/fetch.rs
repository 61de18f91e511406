//! The request primitive abstraction.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::FetchError;
use crate::init::RequestInit;
use crate::response::Response;
use crate::target::RequestTarget;

/// A boxed future type for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result type produced by every request primitive and pipeline stage.
pub type FetchResult = Result<Response, FetchError>;

/// A request primitive: takes a target and init, produces a response.
///
/// Implementations include the reqwest-backed [`ReqwestFetch`](crate::ReqwestFetch),
/// the in-memory [`FetchMock`](crate::FetchMock), closures wrapped with
/// [`fetch_fn`], and composed pipelines returned by [`compose`](crate::compose).
pub trait Fetch: Send + Sync {
    /// Issues one request.
    fn fetch(&self, target: RequestTarget, init: RequestInit) -> BoxFuture<'_, FetchResult>;
}

/// Shared handle to a request primitive.
pub type FetchRef = Arc<dyn Fetch>;

struct FetchFn<F>(F);

impl<F, Fut> Fetch for FetchFn<F>
where
    F: Fn(RequestTarget, RequestInit) -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    fn fetch(&self, target: RequestTarget, init: RequestInit) -> BoxFuture<'_, FetchResult> {
        Box::pin((self.0)(target, init))
    }
}

/// Wraps an async closure as a request primitive.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::{Fetch, RequestInit, Response, fetch_fn};
///
/// # tokio_test::block_on(async {
/// let primitive = fetch_fn(|target, _init| async move {
///     Ok(Response::new(200, target.href()))
/// });
///
/// let response = primitive.fetch("/echo".into(), RequestInit::default()).await.unwrap();
/// assert_eq!(response.text().unwrap(), "/echo");
/// # });
/// ```
pub fn fetch_fn<F, Fut>(f: F) -> FetchRef
where
    F: Fn(RequestTarget, RequestInit) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    Arc::new(FetchFn(f))
}

//! Transformer trait and the right-fold composer.

use std::future::Future;
use std::sync::Arc;

use tracing::trace;

use crate::fetch::{BoxFuture, Fetch, FetchRef, FetchResult};
use crate::init::RequestInit;
use crate::target::RequestTarget;

/// A composable stage that wraps the rest of a pipeline.
///
/// A transformer receives `next` (everything after it, down to the request
/// primitive) together with the outgoing target and init. It may rewrite the
/// request before delegating, inspect the response after, or skip `next`
/// entirely to short-circuit the chain.
pub trait Transformer: Send + Sync {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        init: RequestInit,
    ) -> BoxFuture<'_, FetchResult>;
}

/// Shared handle to a transformer.
pub type SharedTransformer = Arc<dyn Transformer>;

struct TransformerFn<F>(F);

impl<F, Fut> Transformer for TransformerFn<F>
where
    F: Fn(FetchRef, RequestTarget, RequestInit) -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        Box::pin((self.0)(next, target, init))
    }
}

/// Wraps an async closure as a transformer.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::transformer_fn;
///
/// // Stamp every request with a request id.
/// let stamp = transformer_fn(|next, target, init| async move {
///     next.fetch(target, init.with_header("X-Request-Id", "42")).await
/// });
/// ```
pub fn transformer_fn<F, Fut>(f: F) -> SharedTransformer
where
    F: Fn(FetchRef, RequestTarget, RequestInit) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    Arc::new(TransformerFn(f))
}

/// One transformer bound to the pipeline below it.
struct Layer {
    transformer: SharedTransformer,
    next: FetchRef,
}

impl Fetch for Layer {
    fn fetch(&self, target: RequestTarget, init: RequestInit) -> BoxFuture<'_, FetchResult> {
        self.transformer.apply(Arc::clone(&self.next), target, init)
    }
}

/// Folds `transformers` around `base`, first transformer outermost.
///
/// The result has the same call shape as the base primitive. Composing an
/// empty sequence returns `base` itself.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::{Fetch, RequestInit, Response, compose, fetch_fn, json, method};
///
/// # tokio_test::block_on(async {
/// let base = fetch_fn(|_target, init: RequestInit| async move {
///     Ok(Response::new(200, init.method_or_get().to_string()))
/// });
///
/// let pipeline = compose(vec![method("POST"), json()], base);
/// let response = pipeline.fetch("/x".into(), RequestInit::default()).await.unwrap();
/// assert_eq!(response.text().unwrap(), "POST");
/// # });
/// ```
pub fn compose<I>(transformers: I, base: FetchRef) -> FetchRef
where
    I: IntoIterator<Item = SharedTransformer>,
{
    let transformers: Vec<SharedTransformer> = transformers.into_iter().collect();
    trace!(layers = transformers.len(), "composing pipeline");

    transformers
        .into_iter()
        .rev()
        .fold(base, |next, transformer| {
            Arc::new(Layer { transformer, next }) as FetchRef
        })
}

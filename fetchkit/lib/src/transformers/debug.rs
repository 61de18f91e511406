use std::sync::Arc;

use crate::compose::{SharedTransformer, Transformer};
use crate::fetch::{BoxFuture, FetchRef, FetchResult};
use crate::init::RequestInit;
use crate::target::RequestTarget;

type Logger = dyn Fn(&RequestTarget, &RequestInit) + Send + Sync;

struct DebugLog {
    logger: Arc<Logger>,
}

impl Transformer for DebugLog {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        (self.logger)(&target, &init);
        Box::pin(async move { next.fetch(target, init).await })
    }
}

fn log_call(target: &RequestTarget, init: &RequestInit) {
    tracing::debug!("{:#?}", (target, init));
}

/// Logs the full call (target and init) before delegating.
///
/// Output goes to `tracing` at debug level as the pretty-printed
/// `(target, init)` pair. The request and response pass through untouched.
pub fn debug() -> SharedTransformer {
    debug_with(log_call)
}

/// Like [`debug`], with a caller-supplied logger.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::debug_with;
///
/// let print = debug_with(|target, init| {
///     eprintln!("{} {}", init.method_or_get(), target);
/// });
/// ```
pub fn debug_with<F>(logger: F) -> SharedTransformer
where
    F: Fn(&RequestTarget, &RequestInit) + Send + Sync + 'static,
{
    Arc::new(DebugLog {
        logger: Arc::new(logger),
    })
}

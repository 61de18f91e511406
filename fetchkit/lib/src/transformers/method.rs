use std::sync::Arc;

use crate::compose::{SharedTransformer, Transformer};
use crate::fetch::{BoxFuture, FetchRef, FetchResult};
use crate::init::RequestInit;
use crate::target::RequestTarget;

struct SetMethod {
    name: String,
}

impl Transformer for SetMethod {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        mut init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        init.method = Some(self.name.clone());
        Box::pin(async move { next.fetch(target, init).await })
    }
}

/// Sets the HTTP method, keeping every other init field.
///
/// The name is forwarded as given; case is the caller's responsibility.
/// Accepts a plain string or a [`RestMethod`](crate::RestMethod).
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::{RestMethod, method};
///
/// let post = method("POST");
/// let delete = method(RestMethod::Delete);
/// ```
pub fn method(name: impl Into<String>) -> SharedTransformer {
    Arc::new(SetMethod { name: name.into() })
}

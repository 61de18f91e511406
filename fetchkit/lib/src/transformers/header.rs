use std::sync::Arc;

use crate::compose::{SharedTransformer, Transformer};
use crate::fetch::{BoxFuture, FetchRef, FetchResult};
use crate::init::RequestInit;
use crate::target::RequestTarget;

struct SetHeader {
    name: String,
    value: String,
}

impl Transformer for SetHeader {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        mut init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        init.headers.set(self.name.clone(), self.value.clone());
        Box::pin(async move { next.fetch(target, init).await })
    }
}

/// Sets one header, merging with headers already on the init.
///
/// A header whose name matches case-insensitively is replaced.
pub fn header(name: impl Into<String>, value: impl Into<String>) -> SharedTransformer {
    Arc::new(SetHeader {
        name: name.into(),
        value: value.into(),
    })
}

/// Sets `Content-Type: application/json`.
pub fn json() -> SharedTransformer {
    header("Content-Type", "application/json")
}

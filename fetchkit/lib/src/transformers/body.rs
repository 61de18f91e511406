use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

use crate::compose::{SharedTransformer, Transformer};
use crate::error::ValidationError;
use crate::fetch::{BoxFuture, FetchRef, FetchResult};
use crate::init::RequestInit;
use crate::target::RequestTarget;

struct SetBody {
    content: Bytes,
}

impl Transformer for SetBody {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        mut init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        // Bytes clones share the buffer.
        init.body = Some(self.content.clone());
        Box::pin(async move { next.fetch(target, init).await })
    }
}

/// Sets the request body. The content must already be serialized.
pub fn body(content: impl Into<Bytes>) -> SharedTransformer {
    Arc::new(SetBody {
        content: content.into(),
    })
}

/// Serializes `value` to JSON and sets it as the body.
///
/// Does not set a content type; pair it with [`json`](crate::json).
///
/// ## Errors
///
/// Returns [`ValidationError::Serialize`] if `value` cannot be serialized.
pub fn json_body<T: Serialize>(value: &T) -> Result<SharedTransformer, ValidationError> {
    let content = serde_json::to_vec(value)?;
    Ok(body(content))
}

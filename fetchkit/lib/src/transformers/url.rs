use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::compose::{SharedTransformer, Transformer};
use crate::error::ValidationError;
use crate::fetch::{BoxFuture, FetchRef, FetchResult};
use crate::init::RequestInit;
use crate::target::RequestTarget;

struct Prefix {
    base: String,
}

impl Transformer for Prefix {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        let target = target.with_path_prefix(&self.base);
        Box::pin(async move { next.fetch(target, init).await })
    }
}

/// Inserts `base` in front of the target's path.
///
/// For a bare path such as `"/users/1"` this simply concatenates, which is
/// how a builder turns `prefix("https://api.example.com")` plus a declared
/// path into a full URL. For absolute targets the scheme and host are kept
/// and only the path is rewritten.
pub fn prefix(base: impl Into<String>) -> SharedTransformer {
    Arc::new(Prefix { base: base.into() })
}

struct Query {
    pairs: Vec<(String, String)>,
}

impl Transformer for Query {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        let target = target.with_query(self.pairs.iter().cloned());
        Box::pin(async move { next.fetch(target, init).await })
    }
}

/// Appends query parameters, keeping the target's existing ones.
///
/// Keys already present are appended again rather than overwritten.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::query;
///
/// let paging = query([("page", 2), ("per_page", 50)]);
/// let search = query(vec![("q", "rust")]);
/// ```
pub fn query<I, K, V>(pairs: I) -> SharedTransformer
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    let pairs = pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect();
    Arc::new(Query { pairs })
}

/// Flattens a serializable object into query pairs.
///
/// `null` fields are skipped, scalars are stringified, and arrays become
/// repeated keys. Nested objects are sent as their JSON text.
///
/// ## Errors
///
/// Returns [`ValidationError::NotAnObject`] unless `params` serializes to a
/// JSON object.
pub fn query_pairs<T: Serialize>(params: &T) -> Result<Vec<(String, String)>, ValidationError> {
    let map = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        other => {
            return Err(ValidationError::NotAnObject {
                found: json_kind(&other),
            });
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(&item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(&other) {
                    pairs.push((key, text));
                }
            }
        }
    }
    Ok(pairs)
}

/// Like [`query`], taking the pairs from a serializable object.
///
/// ## Errors
///
/// See [`query_pairs`].
pub fn query_object<T: Serialize>(params: &T) -> Result<SharedTransformer, ValidationError> {
    Ok(Arc::new(Query {
        pairs: query_pairs(params)?,
    }))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

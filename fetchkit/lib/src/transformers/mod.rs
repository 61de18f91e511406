//! Built-in transformers.
//!
//! Each constructor returns a [`SharedTransformer`](crate::SharedTransformer)
//! ready to be placed in a [`compose`](crate::compose) sequence:
//!
//! | Constructor | Effect |
//! |---|---|
//! | [`method`] | Sets the HTTP method |
//! | [`header`] / [`json`] | Sets one header (case-insensitive, last write wins) |
//! | [`prefix`] | Inserts a base in front of the target's path |
//! | [`query`] / [`query_object`] | Appends query parameters |
//! | [`body`] / [`json_body`] | Sets the request body |
//! | [`debug`] / [`debug_with`] | Logs the call before delegating |
//! | [`retry`] / [`retry_with`] | Re-invokes the rest of the chain on errors |
//! | [`cache`] / [`cache_with`] | Memoizes GET responses as JSON |

mod body;
mod cache;
mod debug;
mod header;
mod method;
mod retry;
mod url;

pub use body::{body, json_body};
pub use cache::{
    CacheEntry, CacheStore, DEFAULT_CACHE_MAX_AGE, MemoryCacheStore, cache, cache_with,
    default_cache_store,
};
pub use debug::{debug, debug_with};
pub use header::{header, json};
pub use method::method;
pub use retry::{Backoff, RetryPolicy, retry, retry_with};
pub use url::{prefix, query, query_object, query_pairs};

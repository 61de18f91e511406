//! In-memory request primitive for tests and offline development.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use regex::Regex;
use serde_json::{Value, json};
use tracing::{error, trace};
use url::Url;

use crate::error::{ConfigError, FetchError, TransportError};
use crate::fetch::{BoxFuture, Fetch, FetchResult};
use crate::init::RequestInit;
use crate::response::Response;
use crate::target::RequestTarget;

/// Base used to resolve bare-path targets before lookup.
const RELATIVE_BASE: &str = "http://localhost";

/// What a mock handler answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Sent as a `200` JSON response.
    Json(Value),
    /// Returned verbatim.
    Response(Response),
}

impl From<Value> for MockReply {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Response> for MockReply {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

type Handler = dyn Fn(&Url, &RequestInit) -> Result<MockReply, String> + Send + Sync;

struct Route {
    key: String,
    pattern: Regex,
    handler: Arc<Handler>,
}

/// A request primitive answering from registered handlers.
///
/// Handlers are keyed by method and a pathname pattern. The pattern is an
/// anchored regular expression matched against `"METHOD.<origin><path>"`
/// first and `"METHOD.<path>"` second, so a pattern may name a full origin
/// or just a path. The registry belongs to the instance; separate mocks
/// never see each other's routes.
///
/// | Outcome | Response |
/// |---|---|
/// | Handler returns [`MockReply::Json`] | `200` with the JSON body |
/// | Handler returns [`MockReply::Response`] | that response |
/// | Handler returns `Err` | `500` with `{"error":"Internal Server Error"}` |
/// | No route matches | [`TransportError::NoMock`] |
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::{Fetch, FetchMock, RequestInit};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let mock = FetchMock::new();
/// mock.on("/api/users/\\d+", "GET", |url, _init| {
///     Ok(json!({"path": url.path()}).into())
/// })
/// .unwrap();
///
/// let response = mock
///     .fetch("https://example.com/api/users/7".into(), RequestInit::default())
///     .await
///     .unwrap();
/// assert_eq!(response.json_value().unwrap()["path"], "/api/users/7");
/// # });
/// ```
#[derive(Default)]
pub struct FetchMock {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<(String, RequestInit)>>,
}

impl FetchMock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for `method` and `pathname`.
    ///
    /// Registering the same method and pattern again replaces the handler.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if the pattern is not a valid
    /// regular expression.
    pub fn on<F>(&self, pathname: &str, method: &str, handler: F) -> Result<&Self, ConfigError>
    where
        F: Fn(&Url, &RequestInit) -> Result<MockReply, String> + Send + Sync + 'static,
    {
        let key = format!("{}.{}", method.to_uppercase(), pathname);
        let pattern = Regex::new(&format!("^{key}$"))?;

        let mut routes = lock(&self.routes);
        routes.retain(|route| route.key != key);
        routes.push(Route {
            key,
            pattern,
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    /// Removes every registered handler.
    pub fn clear(&self) {
        lock(&self.routes).clear();
    }

    /// Every `(target, init)` this mock has been called with, in order.
    pub fn calls(&self) -> Vec<(String, RequestInit)> {
        lock(&self.calls).clone()
    }

    fn find(&self, method: &str, url: &Url) -> Option<Arc<Handler>> {
        let origin = url.origin().ascii_serialization();
        let candidates = [
            format!("{method}.{origin}{}", url.path()),
            format!("{method}.{}", url.path()),
        ];

        let routes = lock(&self.routes);
        candidates.iter().find_map(|candidate| {
            routes
                .iter()
                .find(|route| route.pattern.is_match(candidate))
                .map(|route| Arc::clone(&route.handler))
        })
    }

    fn respond(&self, target: RequestTarget, init: RequestInit) -> FetchResult {
        let href = target.href();
        lock(&self.calls).push((href.clone(), init.clone()));

        let url = match target.parsed_url() {
            Some(url) => url,
            None => Url::parse(RELATIVE_BASE)
                .and_then(|base| base.join(&href))
                .map_err(|e| FetchError::Config(ConfigError::InvalidUrl(e)))?,
        };
        let method = init.method_or_get().to_uppercase();

        let Some(handler) = self.find(&method, &url) else {
            return Err(TransportError::NoMock { method, url: href }.into());
        };
        trace!(%method, %url, "mock handler matched");

        match handler(&url, &init) {
            Ok(MockReply::Json(value)) => Ok(Response::json(&value).with_url(url.as_str())),
            Ok(MockReply::Response(response)) => Ok(response),
            Err(message) => {
                error!(url = %href, error = %message, "mock handler failed");
                Ok(Response::new(500, json!({"error": "Internal Server Error"}).to_string())
                    .with_header("Content-Type", "application/json")
                    .with_url(url.as_str()))
            }
        }
    }
}

impl Fetch for FetchMock {
    fn fetch(&self, target: RequestTarget, init: RequestInit) -> BoxFuture<'_, FetchResult> {
        let result = self.respond(target, init);
        Box::pin(async move { result })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

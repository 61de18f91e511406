//! Endpoint builders: declarations turned into callable async functions.
//!
//! A declaration function maps call arguments to an [`EndpointDeclaration`]:
//! the path to request, the transformers that shape this call, and an
//! optional response parser. [`endpoint`] and [`EndpointBuilder::build`] wrap
//! such a function into an [`Endpoint`] that composes the transformers over a
//! request primitive and runs them on every call.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::client::default_fetch;
use crate::compose::{SharedTransformer, compose};
use crate::error::{FetchError, HttpStatusError};
use crate::fetch::FetchRef;
use crate::init::RequestInit;
use crate::response::{Payload, Response};
use crate::target::RequestTarget;
use crate::transformers::{debug as debug_transformer, json, prefix};

/// Which body reader feeds a declaration's response parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Parse the body as JSON.
    #[default]
    Json,
    /// Read the body as text; the parser receives a `Value::String`.
    Text,
}

impl ParseMode {
    fn read(self, response: &Response) -> Result<Value, FetchError> {
        match self {
            Self::Json => response.json_value(),
            Self::Text => response.text().map(Value::String),
        }
    }
}

type Finish<T> = Box<dyn FnOnce(Response, ParseMode) -> Result<T, FetchError> + Send>;

/// The shape of one endpoint call.
///
/// Built fresh by the declaration function on every call.
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::{EndpointDeclaration, method, query};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u64,
/// }
///
/// // Raw response
/// let raw = EndpointDeclaration::new("/users/1", vec![method("GET")]);
///
/// // Parsed into a typed value
/// let typed = EndpointDeclaration::new("/users", vec![method("GET")])
///     .with_transformer(query([("page", 2)]))
///     .parse_json::<Vec<User>>();
/// ```
pub struct EndpointDeclaration<T = Response> {
    path: String,
    transformers: Vec<SharedTransformer>,
    finish: Finish<T>,
}

impl EndpointDeclaration<Response> {
    /// Declares a call whose result is the raw response.
    pub fn new(path: impl Into<String>, transformers: Vec<SharedTransformer>) -> Self {
        Self {
            path: path.into(),
            transformers,
            finish: Box::new(|response, _| Ok(response)),
        }
    }

    /// Parses the body and hands it to `parser`.
    ///
    /// The builder's [`ParseMode`] decides whether `parser` receives parsed
    /// JSON or the body text.
    pub fn parse_with<U, F>(self, parser: F) -> EndpointDeclaration<U>
    where
        F: FnOnce(Value) -> Result<U, FetchError> + Send + 'static,
    {
        EndpointDeclaration {
            path: self.path,
            transformers: self.transformers,
            finish: Box::new(move |response, mode| parser(mode.read(&response)?)),
        }
    }

    /// Deserializes the parsed body into `U`.
    pub fn parse_json<U>(self) -> EndpointDeclaration<U>
    where
        U: DeserializeOwned,
    {
        self.parse_with(|value| serde_json::from_value(value).map_err(FetchError::from))
    }
}

impl<T> EndpointDeclaration<T> {
    /// Appends one transformer to this call's list.
    pub fn with_transformer(mut self, transformer: SharedTransformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn transformers(&self) -> &[SharedTransformer] {
        &self.transformers
    }
}

impl<T> fmt::Debug for EndpointDeclaration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointDeclaration")
            .field("path", &self.path)
            .field("transformers", &self.transformers.len())
            .finish_non_exhaustive()
    }
}

/// Returns the response unchanged when its status is `2xx`.
///
/// ## Errors
///
/// Returns [`HttpStatusError`] carrying the response otherwise.
pub fn check_status(response: Response) -> Result<Response, HttpStatusError> {
    if response.ok() {
        Ok(response)
    } else {
        Err(HttpStatusError::new(response))
    }
}

async fn run_declaration<T>(
    declaration: EndpointDeclaration<T>,
    common: &[SharedTransformer],
    fetch: &FetchRef,
    parse_mode: ParseMode,
    ok_only: bool,
) -> Result<T, FetchError> {
    let EndpointDeclaration {
        path,
        transformers,
        finish,
    } = declaration;

    debug!(%path, layers = common.len() + transformers.len(), "executing endpoint");

    let pipeline = compose(
        common.iter().cloned().chain(transformers),
        Arc::clone(fetch),
    );
    let mut response = pipeline
        .fetch(RequestTarget::from(path), RequestInit::default())
        .await?;

    if ok_only {
        response = check_status(response)?;
    }

    finish(response, parse_mode)
}

type Declare<A, T> = dyn Fn(A) -> Result<EndpointDeclaration<T>, FetchError> + Send + Sync;

/// A callable endpoint produced by [`endpoint`] or [`EndpointBuilder::build`].
///
/// Cheap to clone; clones share the declaration function and primitive.
pub struct Endpoint<A, T = Response> {
    declare: Arc<Declare<A, T>>,
    common: Arc<[SharedTransformer]>,
    fetch: FetchRef,
    parse_mode: ParseMode,
    check_status: bool,
}

impl<A, T> Endpoint<A, T> {
    /// Runs the declaration for `args` and performs the request.
    ///
    /// ## Errors
    ///
    /// Propagates errors from the declaration function (before any request
    /// is made), the pipeline, the status check when enabled, and the
    /// response parser.
    pub async fn call(&self, args: A) -> Result<T, FetchError> {
        let declaration = (self.declare)(args)?;
        run_declaration(
            declaration,
            &self.common,
            &self.fetch,
            self.parse_mode,
            self.check_status,
        )
        .await
    }
}

impl<A, T> Clone for Endpoint<A, T> {
    fn clone(&self) -> Self {
        Self {
            declare: Arc::clone(&self.declare),
            common: Arc::clone(&self.common),
            fetch: Arc::clone(&self.fetch),
            parse_mode: self.parse_mode,
            check_status: self.check_status,
        }
    }
}

impl<A, T> fmt::Debug for Endpoint<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("common", &self.common.len())
            .field("parse_mode", &self.parse_mode)
            .field("check_status", &self.check_status)
            .finish_non_exhaustive()
    }
}

/// Wraps a declaration function into an endpoint over the default primitive.
///
/// No common transformers are added; the declaration supplies everything.
pub fn endpoint<A, T, F>(declare: F) -> Endpoint<A, T>
where
    F: Fn(A) -> Result<EndpointDeclaration<T>, FetchError> + Send + Sync + 'static,
{
    endpoint_with(declare, default_fetch(), ParseMode::Json)
}

/// Like [`endpoint`], over the given primitive and parse mode.
pub fn endpoint_with<A, T, F>(declare: F, fetch: FetchRef, parse_mode: ParseMode) -> Endpoint<A, T>
where
    F: Fn(A) -> Result<EndpointDeclaration<T>, FetchError> + Send + Sync + 'static,
{
    Endpoint {
        declare: Arc::new(declare),
        common: Arc::from(Vec::new()),
        fetch,
        parse_mode,
        check_status: false,
    }
}

/// Configuration consumed once by [`EndpointBuilder`].
///
/// ## Examples
///
/// ```rust
/// use fetchkit_lib::{BuilderConfig, header};
///
/// let config = BuilderConfig::new("https://api.example.com")
///     .transformer(header("X-Api-Key", "secret"))
///     .debug(true)
///     .check_status(true);
/// ```
#[derive(Clone, Default, Deserialize)]
pub struct BuilderConfig {
    /// Prefixed onto every declared path.
    pub base_url: String,
    /// Applied to every call after the prefix, JSON, and debug stages.
    #[serde(skip)]
    pub transformers: Vec<SharedTransformer>,
    #[serde(default)]
    pub debug: bool,
    /// Turn non-2xx responses into [`FetchError::Status`].
    #[serde(default)]
    pub check_status: bool,
    #[serde(default)]
    pub parse_mode: ParseMode,
}

impl BuilderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Adds a common transformer.
    pub fn transformer(mut self, transformer: SharedTransformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn check_status(mut self, enabled: bool) -> Self {
        self.check_status = enabled;
        self
    }

    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }
}

impl fmt::Debug for BuilderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderConfig")
            .field("base_url", &self.base_url)
            .field("transformers", &self.transformers.len())
            .field("debug", &self.debug)
            .field("check_status", &self.check_status)
            .field("parse_mode", &self.parse_mode)
            .finish()
    }
}

/// Builds endpoints that share a base URL and common transformers.
///
/// Every call runs `[prefix(base_url), json(), debug()?, ...config
/// transformers, ...declaration transformers]` over the primitive.
///
/// ## Examples
///
/// ```rust,ignore
/// use fetchkit_lib::{BuilderConfig, EndpointBuilder, EndpointDeclaration, method};
///
/// let builder = EndpointBuilder::new(BuilderConfig::new("https://api.example.com"));
/// let get_user = builder.build(|id: u64| {
///     Ok(EndpointDeclaration::new(format!("/users/{id}"), vec![method("GET")])
///         .parse_json::<serde_json::Value>())
/// });
///
/// let user = get_user.call(1).await?;
/// ```
#[derive(Clone)]
pub struct EndpointBuilder {
    common: Arc<[SharedTransformer]>,
    fetch: FetchRef,
    parse_mode: ParseMode,
    check_status: bool,
}

impl EndpointBuilder {
    /// Creates a builder over the default reqwest primitive.
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_fetch(config, default_fetch())
    }

    /// Creates a builder over the given primitive.
    pub fn with_fetch(config: BuilderConfig, fetch: FetchRef) -> Self {
        let mut common = vec![prefix(config.base_url), json()];
        if config.debug {
            common.push(debug_transformer());
        }
        common.extend(config.transformers);

        Self {
            common: Arc::from(common),
            fetch,
            parse_mode: config.parse_mode,
            check_status: config.check_status,
        }
    }

    /// The common transformers, outermost first.
    pub fn transformers(&self) -> &[SharedTransformer] {
        &self.common
    }

    /// Wraps a declaration function into an endpoint.
    pub fn build<A, T, F>(&self, declare: F) -> Endpoint<A, T>
    where
        F: Fn(A) -> Result<EndpointDeclaration<T>, FetchError> + Send + Sync + 'static,
    {
        Endpoint {
            declare: Arc::new(declare),
            common: Arc::clone(&self.common),
            fetch: Arc::clone(&self.fetch),
            parse_mode: self.parse_mode,
            check_status: self.check_status,
        }
    }

    /// Runs a single declaration through this builder's pipeline.
    pub async fn execute<T>(&self, declaration: EndpointDeclaration<T>) -> Result<T, FetchError> {
        run_declaration(
            declaration,
            &self.common,
            &self.fetch,
            self.parse_mode,
            self.check_status,
        )
        .await
    }
}

impl fmt::Debug for EndpointBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointBuilder")
            .field("common", &self.common.len())
            .field("parse_mode", &self.parse_mode)
            .field("check_status", &self.check_status)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Ok-checking request endpoint
// ============================================================================

/// How [`RequestEndpoint`] reads a successful body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    #[default]
    Json,
    Text,
    /// Return the response untouched.
    Raw,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct EndpointOptions {
    #[serde(default)]
    pub parse: ResponseKind,
}

/// A URL-taking endpoint that always rejects non-2xx responses.
///
/// Created by [`create_endpoint`].
#[derive(Clone)]
pub struct RequestEndpoint {
    transformers: Arc<[SharedTransformer]>,
    options: EndpointOptions,
    fetch: FetchRef,
}

impl RequestEndpoint {
    /// Requests `url` through the base transformers followed by
    /// `endpoint_transformers`.
    ///
    /// A `204 No Content` response is returned as [`Payload::Raw`] whatever
    /// the parse option.
    ///
    /// ## Errors
    ///
    /// Returns [`FetchError::Status`] for non-2xx responses, with the
    /// response attached, and parse errors for unreadable bodies.
    pub async fn call(
        &self,
        url: impl Into<RequestTarget>,
        endpoint_transformers: Vec<SharedTransformer>,
    ) -> Result<Payload, FetchError> {
        let pipeline = compose(
            self.transformers
                .iter()
                .cloned()
                .chain(endpoint_transformers),
            Arc::clone(&self.fetch),
        );
        let response = pipeline.fetch(url.into(), RequestInit::default()).await?;
        let response = check_status(response)?;

        if response.status() == 204 {
            return Ok(Payload::Raw(response));
        }

        match self.options.parse {
            ResponseKind::Json => Ok(Payload::Json(response.json_value()?)),
            ResponseKind::Text => Ok(Payload::Text(response.text()?)),
            ResponseKind::Raw => Ok(Payload::Raw(response)),
        }
    }

    /// Like [`call`](Self::call), deserializing the payload into `T`.
    ///
    /// Text payloads deserialize from a JSON string and empty responses from
    /// `null`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        url: impl Into<RequestTarget>,
        endpoint_transformers: Vec<SharedTransformer>,
    ) -> Result<T, FetchError> {
        let value = match self.call(url, endpoint_transformers).await? {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
            Payload::Raw(_) => Value::Null,
        };
        Ok(serde_json::from_value(value)?)
    }
}

impl fmt::Debug for RequestEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestEndpoint")
            .field("transformers", &self.transformers.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Creates an ok-checking endpoint over `fetch`.
///
/// ## Examples
///
/// ```rust,ignore
/// use fetchkit_lib::{EndpointOptions, create_endpoint, default_fetch, json, method, prefix};
///
/// let api = create_endpoint(
///     vec![json(), prefix("https://example.com")],
///     EndpointOptions::default(),
///     default_fetch(),
/// );
/// let created = api.call("/api/items", vec![method("POST")]).await?;
/// ```
pub fn create_endpoint(
    transformers: Vec<SharedTransformer>,
    options: EndpointOptions,
    fetch: FetchRef,
) -> RequestEndpoint {
    RequestEndpoint {
        transformers: Arc::from(transformers),
        options,
        fetch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::fetch::fetch_fn;
    use crate::transformers::method;
    use serde_json::json;
    use std::sync::Mutex;

    type Calls = Arc<Mutex<Vec<(String, RequestInit)>>>;

    fn recording(status: u16, body: &'static str) -> (FetchRef, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&calls);
        let fetch = fetch_fn(move |target: RequestTarget, init| {
            log.lock().unwrap().push((target.href(), init));
            async move { Ok(Response::new(status, body)) }
        });
        (fetch, calls)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    #[tokio::test]
    async fn test_declaration_without_parser_returns_raw_response() {
        let (fetch, _) = recording(404, "missing");
        let get = endpoint_with(
            |id: u32| Ok(EndpointDeclaration::new(format!("https://x.test/{id}"), vec![])),
            fetch,
            ParseMode::Json,
        );

        let response = get.call(7).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(response.text().unwrap(), "missing");
    }

    #[tokio::test]
    async fn test_parser_receives_json() {
        let (fetch, _) = recording(200, r#"{"items":[1,2,3]}"#);
        let count = endpoint_with(
            |_: ()| {
                Ok(EndpointDeclaration::new("/items", vec![]).parse_with(|value| {
                    Ok(value["items"].as_array().map_or(0, Vec::len))
                }))
            },
            fetch,
            ParseMode::Json,
        );

        assert_eq!(count.call(()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_text_mode_hands_parser_a_string() {
        let (fetch, _) = recording(200, "plain body");
        let upper = endpoint_with(
            |_: ()| {
                Ok(EndpointDeclaration::new("/t", vec![])
                    .parse_with(|value| Ok(value.as_str().unwrap_or_default().to_uppercase())))
            },
            fetch,
            ParseMode::Text,
        );

        assert_eq!(upper.call(()).await.unwrap(), "PLAIN BODY");
    }

    #[tokio::test]
    async fn test_declaration_error_skips_request() {
        let (fetch, calls) = recording(200, "{}");
        let validated = endpoint_with(
            |page: u32| {
                if page == 0 {
                    return Err(ValidationError::invalid("page", "must be at least 1").into());
                }
                Ok(EndpointDeclaration::new("/p", vec![]))
            },
            fetch,
            ParseMode::Json,
        );

        let err = validated.call(0).await.unwrap_err();
        assert!(matches!(err, FetchError::Validation(_)));
        assert!(calls.lock().unwrap().is_empty());
    }

    // ========================================================================
    // Builder
    // ========================================================================

    #[tokio::test]
    async fn test_builder_prefixes_and_sets_json() {
        let (fetch, calls) = recording(200, "{}");
        let builder =
            EndpointBuilder::with_fetch(BuilderConfig::new("https://api.example.com"), fetch);
        let get_user = builder.build(|id: u32| {
            Ok(EndpointDeclaration::new(
                format!("/users/{id}"),
                vec![method("GET")],
            ))
        });

        get_user.call(1).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (href, init) = &calls[0];
        assert_eq!(href, "https://api.example.com/users/1");
        assert_eq!(init.method.as_deref(), Some("GET"));
        assert_eq!(init.headers.len(), 1);
        assert_eq!(init.headers.get("Content-Type"), Some("application/json"));
        assert!(init.body.is_none());
    }

    #[tokio::test]
    async fn test_builder_order_common_then_declaration() {
        let (fetch, calls) = recording(200, "{}");
        let config = BuilderConfig::new("https://api.example.com")
            .transformer(crate::transformers::header("X-Source", "common"));
        let builder = EndpointBuilder::with_fetch(config, fetch);

        builder
            .execute(EndpointDeclaration::new(
                "/x",
                vec![crate::transformers::header("x-source", "declaration")],
            ))
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].1.headers.get("X-Source"), Some("declaration"));
        assert_eq!(builder.transformers().len(), 3);
    }

    #[tokio::test]
    async fn test_builder_debug_adds_stage() {
        let (fetch, _) = recording(200, "{}");
        let builder =
            EndpointBuilder::with_fetch(BuilderConfig::new("https://a.test").debug(true), fetch);
        assert_eq!(builder.transformers().len(), 3);
    }

    #[tokio::test]
    async fn test_check_status_wraps_response() {
        let (fetch, _) = recording(404, "nope");
        let checking = EndpointBuilder::with_fetch(
            BuilderConfig::new("https://a.test").check_status(true),
            Arc::clone(&fetch),
        );
        let lenient = EndpointBuilder::with_fetch(BuilderConfig::new("https://a.test"), fetch);

        let err = checking
            .execute(EndpointDeclaration::new("/missing", vec![]))
            .await
            .unwrap_err();
        match err {
            FetchError::Status(e) => {
                assert_eq!(e.status(), 404);
                assert_eq!(e.response().text().unwrap(), "nope");
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let response = lenient
            .execute(EndpointDeclaration::new("/missing", vec![]))
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn test_builder_config_deserializes() {
        let config: BuilderConfig = serde_json::from_value(json!({
            "base_url": "https://api.example.com",
            "debug": true,
            "parse_mode": "text"
        }))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com");
        assert!(config.debug);
        assert!(!config.check_status);
        assert_eq!(config.parse_mode, ParseMode::Text);
        assert!(config.transformers.is_empty());
    }

    // ========================================================================
    // Ok-checking request endpoint
    // ========================================================================

    #[tokio::test]
    async fn test_create_endpoint_parses_json() {
        let (fetch, calls) = recording(200, r#"{"message":"success"}"#);
        let api = create_endpoint(
            vec![json(), prefix("https://example.com")],
            EndpointOptions::default(),
            fetch,
        );

        let payload = api.call("/api/test", vec![]).await.unwrap();
        assert_eq!(payload, Payload::Json(json!({"message": "success"})));
        assert_eq!(calls.lock().unwrap()[0].0, "https://example.com/api/test");
    }

    #[tokio::test]
    async fn test_create_endpoint_no_content_is_raw() {
        let (fetch, _) = recording(204, "");
        for parse in [ResponseKind::Json, ResponseKind::Text, ResponseKind::Raw] {
            let api = create_endpoint(vec![], EndpointOptions { parse }, Arc::clone(&fetch));
            let payload = api.call("https://example.com/empty", vec![]).await.unwrap();
            assert_eq!(payload.as_response().map(Response::status), Some(204));
        }
    }

    #[tokio::test]
    async fn test_create_endpoint_rejects_error_status() {
        let (fetch, _) = recording(500, "Server Error");
        let api = create_endpoint(vec![], EndpointOptions::default(), fetch);

        let err = api
            .call("https://example.com/api/server-error", vec![])
            .await
            .unwrap_err();

        assert_eq!(err.response().map(Response::status), Some(500));
    }

    #[tokio::test]
    async fn test_call_json_typed() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Flag {
            default: bool,
        }

        let (fetch, _) = recording(200, r#"{"default":true}"#);
        let api = create_endpoint(vec![], EndpointOptions::default(), fetch);

        let flag: Flag = api.call_json("https://e.test/d", vec![]).await.unwrap();
        assert_eq!(flag, Flag { default: true });
    }
}

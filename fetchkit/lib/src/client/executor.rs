//! Request execution over `reqwest` with tracing instrumentation.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use tracing::{Span, instrument};

use crate::error::{ConfigError, FetchError, TransportError};
use crate::fetch::{BoxFuture, Fetch, FetchRef, FetchResult};
use crate::init::{Headers, RequestInit};
use crate::method::to_reqwest_method;
use crate::response::Response;
use crate::target::RequestTarget;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring a [`ReqwestFetch`].
#[derive(Debug)]
pub struct ReqwestFetchBuilder {
    timeout: Duration,
    default_headers: HeaderMap,
}

impl Default for ReqwestFetchBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }
}

impl ReqwestFetchBuilder {
    /// Sets the client-wide timeout. A per-request `init.timeout` overrides it.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use fetchkit_lib::ReqwestFetch;
    ///
    /// let fetch = ReqwestFetch::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, FetchError> {
        let (name, value) = header_pair(name.as_ref(), value.as_ref())?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the `User-Agent` header.
    ///
    /// ## Errors
    ///
    /// Returns an error if the value is not a valid header value.
    pub fn user_agent(mut self, agent: impl AsRef<str>) -> Result<Self, FetchError> {
        let value = HeaderValue::try_from(agent.as_ref())
            .map_err(|e| ConfigError::invalid_header("User-Agent", e.to_string()))?;
        self.default_headers.insert(USER_AGENT, value);
        Ok(self)
    }

    /// Builds the [`ReqwestFetch`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ReqwestFetch, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(TransportError::Request)?;

        Ok(ReqwestFetch {
            client,
            timeout: Some(self.timeout),
        })
    }
}

/// Request primitive backed by a pooled `reqwest::Client`.
///
/// The target must resolve to an absolute URL; compose a
/// [`prefix`](crate::prefix) in front of it for bare paths. The method
/// defaults to GET and non-standard names are sent as extension methods.
/// Response bodies are buffered before returning.
///
/// ## Examples
///
/// ```rust,ignore
/// use fetchkit_lib::{Fetch, ReqwestFetch, RequestInit, compose, method, prefix};
/// use std::sync::Arc;
///
/// let base = Arc::new(ReqwestFetch::new()?);
/// let api = compose(vec![prefix("https://api.example.com"), method("GET")], base);
///
/// let response = api.fetch("/users/1".into(), RequestInit::default()).await?;
/// println!("{}", response.status());
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestFetch {
    client: reqwest::Client,
    /// Client-wide timeout, when known.
    timeout: Option<Duration>,
}

impl ReqwestFetch {
    pub fn builder() -> ReqwestFetchBuilder {
        ReqwestFetchBuilder::default()
    }

    /// Creates a primitive with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Wraps an existing client.
    ///
    /// The client's own timeout is opaque, so timeout errors report only a
    /// per-request `init.timeout`.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    #[instrument(
        name = "fetch_request",
        skip(self, target, init),
        fields(
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn send(&self, target: RequestTarget, init: RequestInit) -> FetchResult {
        let init = match target.request_init() {
            Some(carried) => init.merged_over(carried),
            None => init,
        };
        let method = init.method_or_get();
        Span::current().record("http.method", method);

        let url = match target.parsed_url() {
            Some(url) => url,
            None => url::Url::parse(&target.href()).map_err(ConfigError::InvalidUrl)?,
        };
        Span::current().record("http.url", url.as_str());

        let mut request = self
            .client
            .request(to_reqwest_method(method)?, url)
            .headers(header_map(&init.headers)?);

        if let Some(body) = init.body.clone() {
            request = request.body(body);
        }
        let timeout = init.timeout.or(self.timeout).unwrap_or_default();
        if let Some(per_call) = init.timeout {
            request = request.timeout(per_call);
        }

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());
        let otel_status = if status.is_server_error() {
            "ERROR"
        } else if status.is_success() {
            "OK"
        } else {
            "UNSET"
        };
        Span::current().record("otel.status_code", otel_status);

        let final_url = response.url().to_string();
        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        Ok(Response::new(status.as_u16(), body)
            .with_headers(headers)
            .with_url(final_url))
    }
}

impl Fetch for ReqwestFetch {
    fn fetch(&self, target: RequestTarget, init: RequestInit) -> BoxFuture<'_, FetchResult> {
        Box::pin(self.send(target, init))
    }
}

static DEFAULT_FETCH: Lazy<FetchRef> = Lazy::new(|| {
    let fetch = ReqwestFetch::new()
        .unwrap_or_else(|_| ReqwestFetch::from_client(reqwest::Client::new()));
    Arc::new(fetch)
});

/// A shared, lazily built [`ReqwestFetch`] with default settings.
pub fn default_fetch() -> FetchRef {
    Arc::clone(&DEFAULT_FETCH)
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ConfigError> {
    let header_name = HeaderName::try_from(name)
        .map_err(|e| ConfigError::invalid_header(name, e.to_string()))?;
    let header_value = HeaderValue::try_from(value)
        .map_err(|e| ConfigError::invalid_header(name, e.to_string()))?;
    Ok((header_name, header_value))
}

fn header_map(headers: &Headers) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let (name, value) = header_pair(name, value)?;
        map.insert(name, value);
    }
    Ok(map)
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Request(err)
    }
}

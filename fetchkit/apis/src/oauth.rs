//! OAuth2 client-credentials flow and a bearer token transformer.
//!
//! [`OAuth2Client`] fetches a token from `POST {base_url}/token` and keeps
//! the most recent one in memory until it expires. [`bearer_token`] asks the
//! client for a token on every request and sets the `Authorization` header,
//! so an API built with it renews credentials transparently:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fetchkit_apis::oauth::{OAuth2Client, OAuth2Config, OAuth2Credentials, bearer_token};
//! use fetchkit_lib::{BuilderConfig, EndpointBuilder};
//!
//! let auth = Arc::new(OAuth2Client::new(OAuth2Config::new(
//!     "https://auth.example.com/oauth",
//!     OAuth2Credentials::new("client", "secret", "https://api.example.com"),
//! )));
//! let api = EndpointBuilder::new(
//!     BuilderConfig::new("https://api.example.com").transformer(bearer_token(auth)),
//! );
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use fetchkit_lib::{
    AuthError, BoxFuture, BuilderConfig, Endpoint, EndpointBuilder, EndpointDeclaration,
    FetchError, FetchRef, FetchResult, RequestInit, RequestTarget, Response, RestMethod,
    SharedTransformer, Transformer, default_fetch, json_body, method,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client credentials sent to the token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub audience: String,
}

impl OAuth2Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            audience: audience.into(),
        }
    }
}

impl fmt::Debug for OAuth2Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuth2Config {
    /// Authorization server root; the token endpoint is `{base_url}/token`.
    pub base_url: String,
    pub credentials: OAuth2Credentials,
    #[serde(default)]
    pub debug: bool,
}

impl OAuth2Config {
    pub fn new(base_url: impl Into<String>, credentials: OAuth2Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            debug: false,
        }
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}

/// An access token as returned by the token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub scope: String,
    /// Expiry as milliseconds since the Unix epoch.
    pub expires_at: i64,
}

impl Token {
    /// Whether the token has expired at `now_ms`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at - now_ms < 0
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_ms())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Fetches and caches client-credentials tokens.
///
/// Concurrent callers that find no usable token each fetch one; the last
/// response to arrive replaces the cached token. The lock is never held
/// across a request.
pub struct OAuth2Client {
    credentials: OAuth2Credentials,
    token_endpoint: Endpoint<OAuth2Credentials, Response>,
    cached: Mutex<Option<Token>>,
}

fn token_request(credentials: OAuth2Credentials) -> Result<EndpointDeclaration, FetchError> {
    Ok(EndpointDeclaration::new(
        "/token",
        vec![method(RestMethod::Post), json_body(&credentials)?],
    ))
}

impl OAuth2Client {
    /// Creates a client over the default request primitive.
    pub fn new(config: OAuth2Config) -> Self {
        Self::with_fetch(config, default_fetch())
    }

    /// Creates a client over the given request primitive.
    pub fn with_fetch(config: OAuth2Config, fetch: FetchRef) -> Self {
        let builder = EndpointBuilder::with_fetch(
            BuilderConfig::new(config.base_url).debug(config.debug),
            fetch,
        );
        Self {
            credentials: config.credentials,
            token_endpoint: builder.build(token_request),
            cached: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Token>> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached token, if any, whether or not it has expired.
    pub fn cached(&self) -> Option<Token> {
        self.slot().clone()
    }

    /// Returns a usable token, fetching a new one when none is cached, the
    /// cached one has expired, or `skip_cache` is set.
    ///
    /// ## Errors
    ///
    /// - [`AuthError::TokenRequestFailed`] if the token endpoint answers
    ///   with a non-2xx status
    /// - [`AuthError::TokenExpired`] if the fresh token is already expired
    /// - transport and parse errors from the request itself
    pub async fn token(&self, skip_cache: bool) -> Result<Token, FetchError> {
        if !skip_cache {
            if let Some(token) = self.cached().filter(|token| !token.is_expired()) {
                return Ok(token);
            }
        }

        debug!(skip_cache, "requesting access token");
        let response = self.token_endpoint.call(self.credentials.clone()).await?;
        if !response.ok() {
            return Err(AuthError::TokenRequestFailed {
                status: response.status(),
            }
            .into());
        }

        let token: Token = response.json_as()?;
        if token.is_expired() {
            return Err(AuthError::TokenExpired.into());
        }

        *self.slot() = Some(token.clone());
        Ok(token)
    }
}

impl fmt::Debug for OAuth2Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Client")
            .field("credentials", &self.credentials)
            .field("cached", &self.slot().is_some())
            .finish_non_exhaustive()
    }
}

struct Bearer {
    client: Arc<OAuth2Client>,
}

impl Transformer for Bearer {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        mut init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        Box::pin(async move {
            let token = self.client.token(false).await?;
            init.headers
                .set("Authorization", format!("Bearer {}", token.access_token));
            next.fetch(target, init).await
        })
    }
}

/// Sets `Authorization: Bearer <token>` from `client` on every request.
pub fn bearer_token(client: Arc<OAuth2Client>) -> SharedTransformer {
    Arc::new(Bearer { client })
}

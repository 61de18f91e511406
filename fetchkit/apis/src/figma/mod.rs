//! Figma REST API client.
//!
//! [`figma`] builds every endpoint over one [`EndpointBuilder`] whose common
//! transformers prefix the Figma base URL and attach the `X-Figma-Token`
//! header. Endpoints are grouped into namespaces mirroring the API reference:
//!
//! ```rust,ignore
//! use fetchkit_apis::figma::{FigmaConfig, GetFileRequest, figma};
//!
//! let client = figma("figd_...", FigmaConfig::from_env());
//! let me = client.users.get_me.call(()).await?;
//! let file = client.files.get_file.call(GetFileRequest::new("abc123").depth(2)).await?;
//! ```
//!
//! Path-only endpoints take the key or id as a `String`; endpoints with query
//! parameters or a body take a request struct.

mod comments;
mod components;
mod dev_resources;
mod files;
mod logs;
mod projects;
mod variables;
mod webhooks;

use std::env;

use fetchkit_lib::{
    AuthError, BuilderConfig, EndpointBuilder, EndpointDeclaration, FetchError, FetchRef,
    RestMethod, SharedTransformer, default_fetch, header, json_body, method, query_object,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use comments::{
    Comments, CommentReactionRequest, DeleteCommentRequest, GetCommentReactionsRequest,
    GetCommentsRequest, PostCommentRequest,
};
pub use components::{Components, TeamPaginationRequest};
pub use dev_resources::{
    DeleteDevResourceRequest, DevResourceCreate, DevResourceUpdate, DevResources,
    GetDevResourcesRequest, PostDevResourcesRequest, PutDevResourcesRequest,
};
pub use files::{Files, GetFileNodesRequest, GetFileRequest, GetImageRequest, ImageFormat, Versions};
pub use logs::{ActivityLogs, GetActivityLogsRequest, GetPaymentsRequest, Payments};
pub use projects::{GetProjectFilesRequest, Projects, Users};
pub use variables::{
    ChangeAction, CodeSyntax, PostVariablesRequest, VariableChange, VariableCollectionChange,
    VariableModeChange, VariableModeValue, VariableResolvedType, VariableScope, Variables,
};
pub use webhooks::{
    PostWebhookRequest, PutWebhookRequest, WebhookEvent, WebhookStatus, Webhooks,
};

/// Default API origin. Paths carry their own `/v1` or `/v2` version segment.
pub const FIGMA_BASE_URL: &str = "https://api.figma.com";

/// Environment variable overriding [`FIGMA_BASE_URL`].
pub const FIGMA_URL_ENV: &str = "FIGMA_URL";

/// Environment variable holding a personal access token.
pub const FIGMA_TOKEN_ENV: &str = "FIGMA_TOKEN";

/// Fallback for [`FIGMA_TOKEN_ENV`].
pub const FIGMA_TOKEN_ALT_ENV: &str = "FIGMA_ACCESS_TOKEN";

/// Client options.
#[derive(Debug, Clone, Deserialize)]
pub struct FigmaConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Log each outgoing request at debug level.
    #[serde(default)]
    pub debug: bool,
}

fn default_base_url() -> String {
    FIGMA_BASE_URL.to_string()
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debug: false,
        }
    }
}

impl FigmaConfig {
    /// Default options, with the base URL taken from `FIGMA_URL` when set.
    pub fn from_env() -> Self {
        let base_url = env::var(FIGMA_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(default_base_url);
        Self {
            base_url,
            debug: false,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}

/// Attaches a Figma access token to the request.
pub fn figma_token(value: impl Into<String>) -> SharedTransformer {
    header("X-Figma-Token", value)
}

/// Reads the access token from `FIGMA_TOKEN`, then `FIGMA_ACCESS_TOKEN`.
///
/// ## Errors
///
/// Returns [`AuthError::MissingCredential`] if neither variable is set.
pub fn token_from_env() -> Result<String, AuthError> {
    env::var(FIGMA_TOKEN_ENV)
        .or_else(|_| env::var(FIGMA_TOKEN_ALT_ENV))
        .map_err(|_| AuthError::MissingCredential {
            env_vars: vec![FIGMA_TOKEN_ENV.to_string(), FIGMA_TOKEN_ALT_ENV.to_string()],
        })
}

/// The Figma API, grouped by resource.
#[derive(Debug, Clone)]
pub struct Figma {
    pub files: Files,
    pub comments: Comments,
    pub users: Users,
    pub versions: Versions,
    pub projects: Projects,
    pub components: Components,
    pub webhooks: Webhooks,
    pub activity_logs: ActivityLogs,
    pub payments: Payments,
    pub variables: Variables,
    pub dev_resources: DevResources,
}

impl Figma {
    /// Builds a client from `FIGMA_TOKEN` and `FIGMA_URL`.
    ///
    /// ## Errors
    ///
    /// Returns [`AuthError::MissingCredential`] when no token is set.
    pub fn from_env() -> Result<Self, FetchError> {
        let token = token_from_env()?;
        Ok(figma(token, FigmaConfig::from_env()))
    }
}

/// Creates a Figma client over the default request primitive.
pub fn figma(token: impl Into<String>, config: FigmaConfig) -> Figma {
    figma_with(token, config, default_fetch())
}

/// Creates a Figma client over the given request primitive.
pub fn figma_with(token: impl Into<String>, config: FigmaConfig, fetch: FetchRef) -> Figma {
    let builder = EndpointBuilder::with_fetch(
        BuilderConfig::new(config.base_url)
            .transformer(figma_token(token))
            .debug(config.debug),
        fetch,
    );

    Figma {
        files: Files::new(&builder),
        comments: Comments::new(&builder),
        users: Users::new(&builder),
        versions: Versions::new(&builder),
        projects: Projects::new(&builder),
        components: Components::new(&builder),
        webhooks: Webhooks::new(&builder),
        activity_logs: ActivityLogs::new(&builder),
        payments: Payments::new(&builder),
        variables: Variables::new(&builder),
        dev_resources: DevResources::new(&builder),
    }
}

// ============================================================================
// Declaration helpers
// ============================================================================

pub(crate) type Declared = Result<EndpointDeclaration<Value>, FetchError>;

/// A call without parameters.
pub(crate) fn call(verb: RestMethod, path: String) -> Declared {
    Ok(EndpointDeclaration::new(path, vec![method(verb)]).parse_json())
}

/// A call whose parameters travel in the query string.
pub(crate) fn with_query<Q: Serialize>(verb: RestMethod, path: String, params: &Q) -> Declared {
    Ok(EndpointDeclaration::new(path, vec![method(verb), query_object(params)?]).parse_json())
}

/// A call with an optional JSON body.
pub(crate) fn with_body<B: Serialize>(
    verb: RestMethod,
    path: String,
    payload: Option<&B>,
) -> Declared {
    let mut transformers = vec![method(verb)];
    if let Some(payload) = payload {
        transformers.push(json_body(payload)?);
    }
    Ok(EndpointDeclaration::new(path, transformers).parse_json())
}

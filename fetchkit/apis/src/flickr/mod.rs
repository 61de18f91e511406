//! Flickr REST API client.
//!
//! Every Flickr call goes to the same URL; the operation is selected by a
//! `method=flickr.<group>.<name>` query parameter. The builder's common
//! transformers add the API key and ask for plain JSON rather than JSONP.

mod activity;
mod photosets;

use std::env;

use fetchkit_lib::{
    AuthError, BuilderConfig, EndpointBuilder, EndpointDeclaration, FetchError, FetchRef,
    RestMethod, SharedTransformer, default_fetch, method, query, query_object,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use activity::{Activity, UserCommentsRequest, UserPhotosRequest};
pub use photosets::{
    AddPhotoRequest, CreatePhotosetRequest, EditMetaRequest, EditPhotosRequest,
    GetContextRequest, GetInfoRequest, GetListRequest, GetPhotosRequest, OrderSetsRequest,
    PhotosetMedia, Photosets, RemovePhotoRequest, RemovePhotosRequest, ReorderPhotosRequest,
    SetPrimaryPhotoRequest,
};

pub const FLICKR_BASE_URL: &str = "https://api.flickr.com/services/rest";

/// Environment variable overriding [`FLICKR_BASE_URL`].
pub const FLICKR_URL_ENV: &str = "FLICKR_URL";

pub const FLICKR_API_KEY_ENV: &str = "FLICKR_API_KEY";

/// Client options.
#[derive(Debug, Clone, Deserialize)]
pub struct FlickrConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub debug: bool,
}

fn default_base_url() -> String {
    FLICKR_BASE_URL.to_string()
}

impl Default for FlickrConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debug: false,
        }
    }
}

impl FlickrConfig {
    /// Default options, with the base URL taken from `FLICKR_URL` when set.
    pub fn from_env() -> Self {
        let base_url = env::var(FLICKR_URL_ENV)
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

/// Adds the API key and JSON response format to every call.
pub fn flickr_api_key(api_key: impl Into<String>) -> SharedTransformer {
    query([
        ("api_key", api_key.into()),
        ("format", "json".to_string()),
        ("nojsoncallback", "1".to_string()),
    ])
}

/// The Flickr API, grouped by method namespace.
#[derive(Debug, Clone)]
pub struct Flickr {
    pub photosets: Photosets,
    pub activity: Activity,
}

impl Flickr {
    /// Builds a client from `FLICKR_API_KEY` and `FLICKR_URL`.
    ///
    /// ## Errors
    ///
    /// Returns [`AuthError::MissingCredential`] when no key is set.
    pub fn from_env() -> Result<Self, FetchError> {
        let api_key = env::var(FLICKR_API_KEY_ENV).map_err(|_| AuthError::MissingCredential {
            env_vars: vec![FLICKR_API_KEY_ENV.to_string()],
        })?;
        Ok(flickr(api_key, FlickrConfig::from_env()))
    }
}

/// Creates a Flickr client over the default request primitive.
pub fn flickr(api_key: impl Into<String>, config: FlickrConfig) -> Flickr {
    flickr_with(api_key, config, default_fetch())
}

/// Creates a Flickr client over the given request primitive.
pub fn flickr_with(api_key: impl Into<String>, config: FlickrConfig, fetch: FetchRef) -> Flickr {
    let builder = EndpointBuilder::with_fetch(
        BuilderConfig::new(config.base_url)
            .transformer(flickr_api_key(api_key))
            .debug(config.debug),
        fetch,
    );

    Flickr {
        photosets: Photosets::new(&builder),
        activity: Activity::new(&builder),
    }
}

pub(crate) type Declared = Result<EndpointDeclaration<Value>, FetchError>;

/// Declares `flickr.<name>` with `params` in the query string.
pub(crate) fn flickr_method<P: Serialize>(verb: RestMethod, name: &str, params: &P) -> Declared {
    Ok(EndpointDeclaration::new(
        "/",
        vec![
            method(verb),
            query_object(params)?,
            query([("method", format!("flickr.{name}"))]),
        ],
    )
    .parse_json())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn config_from_env_reads_base_url() {
        unsafe {
            env::set_var(FLICKR_URL_ENV, "http://localhost:9998/rest");
        }
        assert_eq!(FlickrConfig::from_env().base_url, "http://localhost:9998/rest");

        unsafe {
            env::remove_var(FLICKR_URL_ENV);
        }
        assert_eq!(FlickrConfig::from_env().base_url, FLICKR_BASE_URL);
    }

    #[test]
    #[serial_test::serial]
    fn from_env_requires_api_key() {
        unsafe {
            env::remove_var(FLICKR_API_KEY_ENV);
        }

        match Flickr::from_env() {
            Err(FetchError::Auth(AuthError::MissingCredential { env_vars })) => {
                assert_eq!(env_vars, vec![FLICKR_API_KEY_ENV.to_string()]);
            }
            other => panic!("Expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn method_declaration_targets_root() {
        let declaration =
            flickr_method(RestMethod::Get, "photosets.getInfo", &serde_json::json!({})).unwrap();
        assert_eq!(declaration.path(), "/");
        assert_eq!(declaration.transformers().len(), 3);
    }
}

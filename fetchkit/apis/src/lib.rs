//! API clients built on `fetchkit-lib` endpoint builders.
//!
//! - [`figma`]: the Figma REST API, authenticated with `X-Figma-Token`
//! - [`flickr`]: the Flickr REST API, authenticated with an API key
//! - [`oauth`]: client-credentials tokens and a bearer transformer for any
//!   other API
//!
//! Every endpoint validates its arguments before a request is made; invalid
//! input fails with [`fetchkit_lib::ValidationError`].

pub mod figma;
pub mod flickr;
pub mod oauth;
mod validation;

pub use figma::{Figma, FigmaConfig, figma, figma_token, figma_with};
pub use flickr::{Flickr, FlickrConfig, flickr, flickr_api_key, flickr_with};
pub use oauth::{OAuth2Client, OAuth2Config, OAuth2Credentials, Token, bearer_token};

//! The reqwest-backed request primitive.

mod executor;

pub use executor::{ReqwestFetch, ReqwestFetchBuilder, default_fetch};

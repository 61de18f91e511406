use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::Serialize;
use serde_json::Value;

use super::{Declared, call, with_query};
use crate::validation::{non_empty, opt_in_range};

/// Query for `GET /v1/files/:key`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetFileRequest {
    #[serde(skip)]
    pub key: String,
    pub version: Option<String>,
    /// Comma separated node ids to restrict the document to.
    pub ids: Option<String>,
    pub depth: Option<u32>,
    pub geometry: Option<String>,
    pub plugin_data: Option<String>,
    pub branch_data: Option<bool>,
}

impl GetFileRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Query for `GET /v1/files/:key/nodes`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetFileNodesRequest {
    #[serde(skip)]
    pub key: String,
    /// Comma separated node ids. Required.
    pub ids: String,
    pub version: Option<String>,
    pub depth: Option<u32>,
    pub geometry: Option<String>,
    pub plugin_data: Option<String>,
}

/// Export format for rendered images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpg,
    Png,
    Svg,
    Pdf,
}

/// Query for `GET /v1/images/:key`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetImageRequest {
    #[serde(skip)]
    pub key: String,
    pub ids: String,
    /// Between 0.01 and 4.
    pub scale: Option<f64>,
    pub format: Option<ImageFormat>,
    pub svg_outline_text: Option<bool>,
    pub svg_include_id: Option<bool>,
    pub svg_include_node_id: Option<bool>,
    pub svg_simplify_stroke: Option<bool>,
    pub contents_only: Option<bool>,
    pub use_absolute_bounds: Option<bool>,
    pub version: Option<String>,
}

impl GetImageRequest {
    pub fn new(key: impl Into<String>, ids: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ids: ids.into(),
            ..Self::default()
        }
    }
}

fn get_file(req: GetFileRequest) -> Declared {
    with_query(RestMethod::Get, format!("/v1/files/{}", req.key), &req)
}

fn get_file_nodes(req: GetFileNodesRequest) -> Declared {
    non_empty("ids", &req.ids)?;
    with_query(RestMethod::Get, format!("/v1/files/{}/nodes", req.key), &req)
}

fn get_image(req: GetImageRequest) -> Declared {
    non_empty("ids", &req.ids)?;
    opt_in_range("scale", req.scale, 0.01..=4.0)?;
    with_query(RestMethod::Get, format!("/v1/images/{}", req.key), &req)
}

fn get_image_fills(key: String) -> Declared {
    call(RestMethod::Get, format!("/v1/files/{key}/images"))
}

fn get_file_versions(key: String) -> Declared {
    call(RestMethod::Get, format!("/v1/files/{key}/versions"))
}

/// File contents, nodes, and rendered images.
#[derive(Debug, Clone)]
pub struct Files {
    pub get_file: Endpoint<GetFileRequest, Value>,
    pub get_file_nodes: Endpoint<GetFileNodesRequest, Value>,
    pub get_image: Endpoint<GetImageRequest, Value>,
    pub get_image_fills: Endpoint<String, Value>,
}

impl Files {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_file: builder.build(get_file),
            get_file_nodes: builder.build(get_file_nodes),
            get_image: builder.build(get_image),
            get_image_fills: builder.build(get_image_fills),
        }
    }
}

/// File version history.
#[derive(Debug, Clone)]
pub struct Versions {
    pub get_file_versions: Endpoint<String, Value>,
}

impl Versions {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_file_versions: builder.build(get_file_versions),
        }
    }
}

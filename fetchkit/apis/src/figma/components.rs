use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::Serialize;
use serde_json::Value;

use super::{Declared, call, with_query};

/// Team library listing with cursor pagination.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamPaginationRequest {
    #[serde(skip)]
    pub team_id: String,
    pub page_size: Option<u32>,
    pub after: Option<u64>,
    pub before: Option<u64>,
}

impl TeamPaginationRequest {
    pub fn new(team_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            ..Self::default()
        }
    }
}

fn team_listing(req: &TeamPaginationRequest, resource: &str) -> Declared {
    with_query(
        RestMethod::Get,
        format!("/v1/teams/{}/{resource}", req.team_id),
        req,
    )
}

/// Published components, component sets, and styles.
#[derive(Debug, Clone)]
pub struct Components {
    pub get_team_components: Endpoint<TeamPaginationRequest, Value>,
    pub get_file_components: Endpoint<String, Value>,
    pub get_component: Endpoint<String, Value>,
    pub get_team_component_sets: Endpoint<TeamPaginationRequest, Value>,
    pub get_file_component_sets: Endpoint<String, Value>,
    pub get_component_set: Endpoint<String, Value>,
    pub get_team_styles: Endpoint<TeamPaginationRequest, Value>,
    pub get_file_styles: Endpoint<String, Value>,
    pub get_style: Endpoint<String, Value>,
}

impl Components {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_team_components: builder.build(|req: TeamPaginationRequest| {
                team_listing(&req, "components")
            }),
            get_file_components: builder.build(|key: String| {
                call(RestMethod::Get, format!("/v1/files/{key}/components"))
            }),
            get_component: builder.build(|key: String| {
                call(RestMethod::Get, format!("/v1/components/{key}"))
            }),
            get_team_component_sets: builder.build(|req: TeamPaginationRequest| {
                team_listing(&req, "component_sets")
            }),
            get_file_component_sets: builder.build(|key: String| {
                call(RestMethod::Get, format!("/v1/files/{key}/component_sets"))
            }),
            get_component_set: builder.build(|key: String| {
                call(RestMethod::Get, format!("/v1/component_sets/{key}"))
            }),
            get_team_styles: builder.build(|req: TeamPaginationRequest| {
                team_listing(&req, "styles")
            }),
            get_file_styles: builder.build(|key: String| {
                call(RestMethod::Get, format!("/v1/files/{key}/styles"))
            }),
            get_style: builder
                .build(|key: String| call(RestMethod::Get, format!("/v1/styles/{key}"))),
        }
    }
}

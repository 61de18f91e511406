use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::Serialize;
use serde_json::Value;

use super::{Declared, call, with_query};

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetProjectFilesRequest {
    #[serde(skip)]
    pub project_id: String,
    pub branch_data: Option<bool>,
}

fn get_me(_: ()) -> Declared {
    call(RestMethod::Get, "/v1/me".to_string())
}

fn get_team_projects(team_id: String) -> Declared {
    call(RestMethod::Get, format!("/v1/teams/{team_id}/projects"))
}

fn get_project_files(req: GetProjectFilesRequest) -> Declared {
    with_query(
        RestMethod::Get,
        format!("/v1/projects/{}/files", req.project_id),
        &req,
    )
}

/// The authenticated user.
#[derive(Debug, Clone)]
pub struct Users {
    pub get_me: Endpoint<(), Value>,
}

impl Users {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_me: builder.build(get_me),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Projects {
    pub get_team_projects: Endpoint<String, Value>,
    pub get_project_files: Endpoint<GetProjectFilesRequest, Value>,
}

impl Projects {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_team_projects: builder.build(get_team_projects),
            get_project_files: builder.build(get_project_files),
        }
    }
}

use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Declared, call, with_body, with_query};
use crate::validation::non_empty;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetDevResourcesRequest {
    #[serde(skip)]
    pub key: String,
    /// Comma separated node ids to filter by.
    pub node_ids: Option<String>,
}

/// A link to attach to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevResourceCreate {
    pub name: String,
    pub url: String,
    pub file_key: String,
    pub node_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevResourceUpdate {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostDevResourcesRequest {
    pub dev_resources: Vec<DevResourceCreate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PutDevResourcesRequest {
    pub dev_resources: Vec<DevResourceUpdate>,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteDevResourceRequest {
    pub key: String,
    pub dev_resource_id: String,
}

fn get(req: GetDevResourcesRequest) -> Declared {
    with_query(
        RestMethod::Get,
        format!("/v1/files/{}/dev_resources", req.key),
        &req,
    )
}

fn post(req: PostDevResourcesRequest) -> Declared {
    for resource in &req.dev_resources {
        non_empty("url", &resource.url)?;
        non_empty("node_id", &resource.node_id)?;
    }
    with_body(RestMethod::Post, "/v1/dev_resources".to_string(), Some(&req))
}

fn put(req: PutDevResourcesRequest) -> Declared {
    for resource in &req.dev_resources {
        non_empty("id", &resource.id)?;
    }
    with_body(RestMethod::Put, "/v1/dev_resources".to_string(), Some(&req))
}

fn delete(req: DeleteDevResourceRequest) -> Declared {
    call(
        RestMethod::Delete,
        format!("/v1/files/{}/dev_resources/{}", req.key, req.dev_resource_id),
    )
}

/// Dev mode resources linked to nodes.
#[derive(Debug, Clone)]
pub struct DevResources {
    pub get: Endpoint<GetDevResourcesRequest, Value>,
    pub post: Endpoint<PostDevResourcesRequest, Value>,
    pub put: Endpoint<PutDevResourcesRequest, Value>,
    pub delete: Endpoint<DeleteDevResourceRequest, Value>,
}

impl DevResources {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get: builder.build(get),
            post: builder.build(post),
            put: builder.build(put),
            delete: builder.build(delete),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_rejects_resource_without_url() {
        let req = PostDevResourcesRequest {
            dev_resources: vec![DevResourceCreate {
                name: "Docs".into(),
                url: String::new(),
                file_key: "abc".into(),
                node_id: "1:2".into(),
            }],
        };
        assert!(post(req).is_err());
    }

    #[test]
    fn delete_path() {
        let declaration = delete(DeleteDevResourceRequest {
            key: "abc".into(),
            dev_resource_id: "9".into(),
        })
        .unwrap();
        assert_eq!(declaration.path(), "/v1/files/abc/dev_resources/9");
    }
}

use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Declared, call, with_body};
use crate::validation::non_empty;

/// Events a webhook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookEvent {
    FileUpdate,
    FileDelete,
    FileVersionUpdate,
    LibraryPublish,
    FileComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebhookStatus {
    Active,
    Paused,
}

/// Body of `POST /v2/webhooks`.
#[derive(Debug, Clone, Serialize)]
pub struct PostWebhookRequest {
    pub event_type: WebhookEvent,
    pub team_id: String,
    pub endpoint: String,
    /// Echoed back in every delivery so the receiver can verify it.
    pub passcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WebhookStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for `PUT /v2/webhooks/:id`. An empty update sends no body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PutWebhookRequest {
    #[serde(skip)]
    pub webhook_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<WebhookEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WebhookStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PutWebhookRequest {
    fn is_empty(&self) -> bool {
        self.event_type.is_none()
            && self.endpoint.is_none()
            && self.passcode.is_none()
            && self.status.is_none()
            && self.description.is_none()
    }
}

fn post_webhook(req: PostWebhookRequest) -> Declared {
    non_empty("team_id", &req.team_id)?;
    non_empty("endpoint", &req.endpoint)?;
    with_body(RestMethod::Post, "/v2/webhooks".to_string(), Some(&req))
}

fn put_webhook(req: PutWebhookRequest) -> Declared {
    let path = format!("/v2/webhooks/{}", req.webhook_id);
    let payload = (!req.is_empty()).then_some(&req);
    with_body(RestMethod::Put, path, payload)
}

#[derive(Debug, Clone)]
pub struct Webhooks {
    pub post_webhook: Endpoint<PostWebhookRequest, Value>,
    pub get_webhook: Endpoint<String, Value>,
    pub put_webhook: Endpoint<PutWebhookRequest, Value>,
    pub delete_webhook: Endpoint<String, Value>,
    pub get_team_webhooks: Endpoint<String, Value>,
    pub get_webhook_requests: Endpoint<String, Value>,
}

impl Webhooks {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            post_webhook: builder.build(post_webhook),
            get_webhook: builder.build(|id: String| {
                call(RestMethod::Get, format!("/v2/webhooks/{id}"))
            }),
            put_webhook: builder.build(put_webhook),
            delete_webhook: builder.build(|id: String| {
                call(RestMethod::Delete, format!("/v2/webhooks/{id}"))
            }),
            get_team_webhooks: builder.build(|team_id: String| {
                call(RestMethod::Get, format!("/v2/teams/{team_id}/webhooks"))
            }),
            get_webhook_requests: builder.build(|id: String| {
                call(RestMethod::Get, format!("/v2/webhooks/{id}/requests"))
            }),
        }
    }
}

use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::Serialize;
use serde_json::Value;

use super::{Declared, with_query};

/// Query for `GET /v1/activity_logs`. Organization admins only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetActivityLogsRequest {
    /// Comma separated event types.
    pub events: Option<String>,
    /// Unix timestamp in seconds.
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub limit: Option<u32>,
    /// `asc` or `desc`.
    pub order: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetPaymentsRequest {
    pub user_id: Option<String>,
    pub community_file_id: Option<String>,
    pub plugin_id: Option<String>,
    pub widget_id: Option<String>,
}

fn get_activity_logs(req: GetActivityLogsRequest) -> Declared {
    with_query(RestMethod::Get, "/v1/activity_logs".to_string(), &req)
}

fn get_payments(req: GetPaymentsRequest) -> Declared {
    with_query(RestMethod::Get, "/v1/payments".to_string(), &req)
}

#[derive(Debug, Clone)]
pub struct ActivityLogs {
    pub get_activity_logs: Endpoint<GetActivityLogsRequest, Value>,
}

impl ActivityLogs {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_activity_logs: builder.build(get_activity_logs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Payments {
    pub get_payments: Endpoint<GetPaymentsRequest, Value>,
}

impl Payments {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_payments: builder.build(get_payments),
        }
    }
}

//! `flickr.activity.*`: recent activity on the caller's photos and comments.

use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::Serialize;
use serde_json::Value;

use super::{Declared, flickr_method};
use crate::validation::{at_least, opt_in_range, timeframe};

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserCommentsRequest {
    /// 1 to 50. The API defaults to 10.
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPhotosRequest {
    /// Days (`"2d"`) or hours (`"4h"`). Defaults to the previous session.
    pub timeframe: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

fn user_comments(req: UserCommentsRequest) -> Declared {
    opt_in_range("per_page", req.per_page, 1..=50)?;
    at_least("page", req.page, 1)?;
    flickr_method(RestMethod::Get, "activity.userComments", &req)
}

fn user_photos(req: UserPhotosRequest) -> Declared {
    timeframe("timeframe", req.timeframe.as_deref())?;
    opt_in_range("per_page", req.per_page, 1..=50)?;
    at_least("page", req.page, 1)?;
    flickr_method(RestMethod::Get, "activity.userPhotos", &req)
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub user_comments: Endpoint<UserCommentsRequest, Value>,
    pub user_photos: Endpoint<UserPhotosRequest, Value>,
}

impl Activity {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            user_comments: builder.build(user_comments),
            user_photos: builder.build(user_photos),
        }
    }
}

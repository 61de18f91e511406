use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::Serialize;
use serde_json::Value;

use super::{Declared, call, with_body, with_query};
use crate::validation::non_empty;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCommentsRequest {
    #[serde(skip)]
    pub key: String,
    /// Return comment bodies as markdown.
    pub as_md: Option<bool>,
}

/// Body of `POST /v1/files/:key/comments`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostCommentRequest {
    #[serde(skip)]
    pub key: String,
    pub message: String,
    /// Reply to this comment instead of starting a thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteCommentRequest {
    pub key: String,
    pub comment_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCommentReactionsRequest {
    #[serde(skip)]
    pub key: String,
    #[serde(skip)]
    pub comment_id: String,
    pub cursor: Option<String>,
}

/// Adds or removes one emoji reaction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentReactionRequest {
    #[serde(skip)]
    pub key: String,
    #[serde(skip)]
    pub comment_id: String,
    /// Shortcode such as `:heart:`.
    pub emoji: String,
}

fn get_comments(req: GetCommentsRequest) -> Declared {
    with_query(RestMethod::Get, format!("/v1/files/{}/comments", req.key), &req)
}

fn post_comment(req: PostCommentRequest) -> Declared {
    non_empty("message", &req.message)?;
    with_body(RestMethod::Post, format!("/v1/files/{}/comments", req.key), Some(&req))
}

fn delete_comment(req: DeleteCommentRequest) -> Declared {
    call(
        RestMethod::Delete,
        format!("/v1/files/{}/comments/{}", req.key, req.comment_id),
    )
}

fn get_comment_reactions(req: GetCommentReactionsRequest) -> Declared {
    let path = format!("/v1/files/{}/comments/{}/reactions", req.key, req.comment_id);
    with_query(RestMethod::Get, path, &req)
}

fn post_comment_reaction(req: CommentReactionRequest) -> Declared {
    non_empty("emoji", &req.emoji)?;
    let path = format!("/v1/files/{}/comments/{}/reactions", req.key, req.comment_id);
    with_body(RestMethod::Post, path, Some(&req))
}

// The API takes the emoji to remove as a query parameter.
fn delete_comment_reaction(req: CommentReactionRequest) -> Declared {
    non_empty("emoji", &req.emoji)?;
    let path = format!("/v1/files/{}/comments/{}/reactions", req.key, req.comment_id);
    with_query(RestMethod::Delete, path, &req)
}

/// File comments and their reactions.
#[derive(Debug, Clone)]
pub struct Comments {
    pub get_comments: Endpoint<GetCommentsRequest, Value>,
    pub post_comment: Endpoint<PostCommentRequest, Value>,
    pub delete_comment: Endpoint<DeleteCommentRequest, Value>,
    pub get_comment_reactions: Endpoint<GetCommentReactionsRequest, Value>,
    pub post_comment_reaction: Endpoint<CommentReactionRequest, Value>,
    pub delete_comment_reaction: Endpoint<CommentReactionRequest, Value>,
}

impl Comments {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_comments: builder.build(get_comments),
            post_comment: builder.build(post_comment),
            delete_comment: builder.build(delete_comment),
            get_comment_reactions: builder.build(get_comment_reactions),
            post_comment_reaction: builder.build(post_comment_reaction),
            delete_comment_reaction: builder.build(delete_comment_reaction),
        }
    }
}

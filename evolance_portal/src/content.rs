//! Guarded wrappers around the content endpoints.
//!
//! Checks that can be answered locally (missing session, empty required
//! fields) are answered here, before anything goes over the wire.

use log::error;
use thiserror::Error;

use crate::api::PortalApi;
use crate::models::{
    Comment, CreateCommentInput, CreatePostInput, DashboardStats, LikeResponse, Post, PostType,
};
use crate::session::BearerToken;

/// Failure of a content operation. `Display` is the notice shown to the user.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Please login to {0}")]
    LoginRequired(&'static str),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Something went wrong, please try again")]
    Request(#[from] anyhow::Error),
}

pub type ContentResult<T> = Result<T, ContentError>;

/// Splits comma-separated tags, trimming each one and dropping blanks and
/// repeats while keeping first-seen order.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub post_type: PostType,
    pub summary: String,
    pub tags: String,
}

impl PostDraft {
    pub fn new(post_type: PostType) -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            post_type,
            summary: String::new(),
            tags: String::new(),
        }
    }

    pub fn validate(&self) -> ContentResult<()> {
        if self.title.trim().is_empty() {
            return Err(ContentError::MissingField("Title"));
        }
        if self.content.trim().is_empty() {
            return Err(ContentError::MissingField("Content"));
        }
        Ok(())
    }

    pub fn to_input(&self) -> ContentResult<CreatePostInput> {
        self.validate()?;
        let summary = self.summary.trim();
        Ok(CreatePostInput {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            post_type: self.post_type,
            summary: (!summary.is_empty()).then(|| summary.to_string()),
            tags: parse_tags(&self.tags),
        })
    }
}

fn require_session<'a>(
    token: Option<&'a BearerToken>,
    action: &'static str,
) -> ContentResult<&'a BearerToken> {
    token.ok_or(ContentError::LoginRequired(action))
}

fn logged<T>(what: &str, result: anyhow::Result<T>) -> ContentResult<T> {
    result.map_err(|err| {
        error!("failed to {what}: {err:#}");
        ContentError::Request(err)
    })
}

pub fn list_posts<A: PortalApi + ?Sized>(
    api: &A,
    post_type: Option<PostType>,
) -> ContentResult<Vec<Post>> {
    logged("fetch posts", api.list_posts(post_type))
}

pub fn like_post<A: PortalApi + ?Sized>(
    api: &A,
    token: Option<&BearerToken>,
    post_id: &str,
) -> ContentResult<LikeResponse> {
    let token = require_session(token, "like posts")?;
    logged("like post", api.like_post(token, post_id))
}

pub fn create_post<A: PortalApi + ?Sized>(
    api: &A,
    token: Option<&BearerToken>,
    draft: &PostDraft,
) -> ContentResult<Post> {
    let input = draft.to_input()?;
    let token = require_session(token, "publish")?;
    logged("create post", api.create_post(token, &input))
}

pub fn dashboard_stats<A: PortalApi + ?Sized>(
    api: &A,
    token: Option<&BearerToken>,
) -> ContentResult<DashboardStats> {
    let token = require_session(token, "view your dashboard")?;
    logged("fetch stats", api.dashboard_stats(token))
}

pub fn list_comments<A: PortalApi + ?Sized>(api: &A, post_id: &str) -> ContentResult<Vec<Comment>> {
    logged("fetch comments", api.list_comments(post_id))
}

pub fn add_comment<A: PortalApi + ?Sized>(
    api: &A,
    token: Option<&BearerToken>,
    post_id: &str,
    content: &str,
) -> ContentResult<Comment> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ContentError::MissingField("Comment"));
    }
    let token = require_session(token, "comment")?;
    let input = CreateCommentInput {
        post_id: post_id.to_string(),
        content: content.to_string(),
    };
    logged("add comment", api.create_comment(token, &input))
}

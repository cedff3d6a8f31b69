use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{
    AuthResponse, Comment, CreateCommentInput, CreatePostInput, Credentials, DashboardStats,
    LikeResponse, Post, PostType, Registration, User,
};
use crate::session::BearerToken;

/// Remote calls the portal depends on.
///
/// Authenticated endpoints take the token explicitly; nothing about the
/// session is kept inside the client.
pub trait PortalApi {
    fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;
    fn register(&self, registration: &Registration) -> Result<AuthResponse>;
    fn current_user(&self, token: &BearerToken) -> Result<User>;
    fn list_posts(&self, post_type: Option<PostType>) -> Result<Vec<Post>>;
    fn like_post(&self, token: &BearerToken, post_id: &str) -> Result<LikeResponse>;
    fn create_post(&self, token: &BearerToken, input: &CreatePostInput) -> Result<Post>;
    fn dashboard_stats(&self, token: &BearerToken) -> Result<DashboardStats>;
    fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>>;
    fn create_comment(&self, token: &BearerToken, input: &CreateCommentInput) -> Result<Comment>;
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Link handed out by the share button.
    pub fn share_url(&self, post_id: &str) -> String {
        format!("{}/post/{}", self.base_url, post_id)
    }

    fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/api/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).with_context(|| format!("invalid request URL {raw}"))
    }

    fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .with_context(|| format!("request to {what} failed"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            anyhow::bail!("{what} returned {status}: {body}");
        }
        Ok(response)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        self.send(request, what)?
            .json()
            .with_context(|| format!("failed to parse {what} response"))
    }
}

impl PortalApi for ApiClient {
    fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let url = self.url("/login")?;
        self.send_json(self.client.post(url).json(credentials), "login")
    }

    fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let url = self.url("/register")?;
        self.send_json(self.client.post(url).json(registration), "register")
    }

    fn current_user(&self, token: &BearerToken) -> Result<User> {
        let url = self.url("/me")?;
        self.send_json(self.client.get(url).bearer_auth(token.secret()), "identity check")
    }

    fn list_posts(&self, post_type: Option<PostType>) -> Result<Vec<Post>> {
        let mut url = self.url("/posts")?;
        if let Some(post_type) = post_type {
            url.query_pairs_mut()
                .append_pair("post_type", post_type.as_str());
        }
        let entries: Vec<Value> = self.send_json(self.client.get(url), "post listing")?;
        Ok(decode_posts(entries))
    }

    fn like_post(&self, token: &BearerToken, post_id: &str) -> Result<LikeResponse> {
        let url = self.url(&format!("/posts/{post_id}/like"))?;
        let response = self.send(
            self.client.post(url).bearer_auth(token.secret()),
            "like",
        )?;
        let body = response.text().context("failed to read like response")?;
        if body.trim().is_empty() {
            return Ok(LikeResponse::default());
        }
        serde_json::from_str(&body).context("failed to parse like response")
    }

    fn create_post(&self, token: &BearerToken, input: &CreatePostInput) -> Result<Post> {
        let url = self.url("/posts")?;
        self.send_json(
            self.client.post(url).bearer_auth(token.secret()).json(input),
            "post creation",
        )
    }

    fn dashboard_stats(&self, token: &BearerToken) -> Result<DashboardStats> {
        let url = self.url("/dashboard/stats")?;
        self.send_json(
            self.client.get(url).bearer_auth(token.secret()),
            "dashboard stats",
        )
    }

    fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let url = self.url(&format!("/posts/{post_id}/comments"))?;
        self.send_json(self.client.get(url), "comment listing")
    }

    fn create_comment(&self, token: &BearerToken, input: &CreateCommentInput) -> Result<Comment> {
        let url = self.url("/comments")?;
        self.send_json(
            self.client.post(url).bearer_auth(token.secret()).json(input),
            "comment creation",
        )
    }
}

/// Entries that do not decode, such as an unknown `post_type`, are skipped
/// instead of failing the whole listing.
fn decode_posts(entries: Vec<Value>) -> Vec<Post> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Post>(entry) {
            Ok(post) => Some(post),
            Err(err) => {
                warn!("skipping post the client cannot display: {err}");
                None
            }
        })
        .collect()
}

pub(crate) fn sanitize_base_url(mut base: String) -> Result<String> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

//! Scripted stand-in for the remote API used by unit tests.

use std::cell::RefCell;

use anyhow::{bail, Result};

use crate::api::PortalApi;
use crate::models::{
    AuthResponse, Comment, CreateCommentInput, CreatePostInput, Credentials, DashboardStats,
    LikeResponse, Post, PostType, Registration, User,
};
use crate::session::BearerToken;

pub(crate) const VALID_TOKEN: &str = "token-123";

pub(crate) fn sample_user() -> User {
    User {
        id: "user-1".into(),
        email: "ada@example.com".into(),
        username: "ada".into(),
        full_name: "Ada Lovelace".into(),
        bio: None,
        avatar_url: None,
        created_at: None,
    }
}

pub(crate) fn sample_post(id: &str, post_type: PostType) -> Post {
    Post {
        id: id.into(),
        title: format!("Post {id}"),
        content: "Body".into(),
        summary: None,
        post_type,
        tags: Vec::new(),
        likes: 0,
        views: 0,
        reading_time: 1,
        created_at: "2024-05-01T10:00:00".into(),
        author_id: Some("user-1".into()),
        author_name: Some("Ada Lovelace".into()),
    }
}

pub(crate) struct FakeApi {
    calls: RefCell<Vec<&'static str>>,
    accept_credentials: bool,
    pub posts: Vec<Post>,
    pub stats: DashboardStats,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            accept_credentials: true,
            posts: Vec::new(),
            stats: DashboardStats::default(),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept_credentials: false,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    fn authorize(&self, token: &BearerToken) -> Result<()> {
        if token.secret() != VALID_TOKEN {
            bail!("401 Unauthorized");
        }
        Ok(())
    }

    fn auth_response(&self) -> Result<AuthResponse> {
        if !self.accept_credentials {
            bail!("401 Unauthorized: Invalid credentials");
        }
        Ok(AuthResponse {
            access_token: VALID_TOKEN.into(),
            token_type: Some("bearer".into()),
            user: sample_user(),
        })
    }
}

impl PortalApi for FakeApi {
    fn login(&self, _credentials: &Credentials) -> Result<AuthResponse> {
        self.record("login");
        self.auth_response()
    }

    fn register(&self, _registration: &Registration) -> Result<AuthResponse> {
        self.record("register");
        self.auth_response()
    }

    fn current_user(&self, token: &BearerToken) -> Result<User> {
        self.record("current_user");
        self.authorize(token)?;
        Ok(sample_user())
    }

    fn list_posts(&self, post_type: Option<PostType>) -> Result<Vec<Post>> {
        self.record("list_posts");
        Ok(self
            .posts
            .iter()
            .filter(|post| post_type.map_or(true, |wanted| post.post_type == wanted))
            .cloned()
            .collect())
    }

    fn like_post(&self, token: &BearerToken, _post_id: &str) -> Result<LikeResponse> {
        self.record("like_post");
        self.authorize(token)?;
        Ok(LikeResponse { liked: Some(true) })
    }

    fn create_post(&self, token: &BearerToken, input: &CreatePostInput) -> Result<Post> {
        self.record("create_post");
        self.authorize(token)?;
        let mut post = sample_post("new", input.post_type);
        post.title = input.title.clone();
        post.content = input.content.clone();
        post.summary = input.summary.clone();
        post.tags = input.tags.clone();
        Ok(post)
    }

    fn dashboard_stats(&self, token: &BearerToken) -> Result<DashboardStats> {
        self.record("dashboard_stats");
        self.authorize(token)?;
        Ok(self.stats)
    }

    fn list_comments(&self, _post_id: &str) -> Result<Vec<Comment>> {
        self.record("list_comments");
        Ok(Vec::new())
    }

    fn create_comment(&self, token: &BearerToken, input: &CreateCommentInput) -> Result<Comment> {
        self.record("create_comment");
        self.authorize(token)?;
        Ok(Comment {
            id: "comment-1".into(),
            post_id: input.post_id.clone(),
            user_id: "user-1".into(),
            user_name: "Ada Lovelace".into(),
            content: input.content.clone(),
            created_at: "2024-05-01T10:00:00".into(),
            likes: 0,
        })
    }
}

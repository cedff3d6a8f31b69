use std::collections::{HashMap, HashSet};

use crate::content::PostDraft;
use crate::models::{Comment, DashboardStats, Post, PostType, Registration};
use crate::router::FeedFilter;
use crate::session::AuthAction;

pub struct FeedState {
    pub filter: FeedFilter,
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub liking: HashSet<String>,
    pub comments: HashMap<String, CommentThreadState>,
    /// Sequence number of the newest listing requested for this mount.
    pub fetch_seq: u64,
}

impl FeedState {
    pub fn new(filter: FeedFilter) -> Self {
        Self {
            filter,
            posts: Vec::new(),
            loading: false,
            error: None,
            liking: HashSet::new(),
            comments: HashMap::new(),
            fetch_seq: 0,
        }
    }
}

#[derive(Default)]
pub struct CommentThreadState {
    pub comments: Vec<Comment>,
    pub loading: bool,
    pub error: Option<String>,
    pub draft: String,
    pub sending: bool,
}

#[derive(Default)]
pub struct AuthFormState {
    pub email: String,
    pub password: String,
    pub username: String,
    pub full_name: String,
    pub bio: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl AuthFormState {
    /// First required field left blank for the given action.
    pub fn missing_field(&self, action: AuthAction) -> Option<&'static str> {
        let mut required = vec![("Email", &self.email), ("Password", &self.password)];
        if action == AuthAction::Register {
            required.insert(0, ("Username", &self.username));
            required.insert(0, ("Full name", &self.full_name));
        }
        required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }

    pub fn registration(&self) -> Registration {
        let bio = self.bio.trim();
        Registration {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            username: self.username.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            bio: (!bio.is_empty()).then(|| bio.to_string()),
        }
    }
}

#[derive(Default)]
pub struct DashboardState {
    pub stats: DashboardStats,
    pub loading: bool,
    pub error: Option<String>,
    pub fetch_seq: u64,
}

pub struct ComposerState {
    pub open: bool,
    pub draft: PostDraft,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ComposerState {
    pub fn closed() -> Self {
        Self {
            open: false,
            draft: PostDraft::new(PostType::Blog),
            submitting: false,
            error: None,
        }
    }

    pub fn open_for(post_type: PostType) -> Self {
        Self {
            open: true,
            draft: PostDraft::new(post_type),
            submitting: false,
            error: None,
        }
    }
}

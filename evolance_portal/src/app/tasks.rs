use std::sync::mpsc::Sender;
use std::thread;

use log::error;

use crate::api::{ApiClient, PortalApi};
use crate::content::{self, PostDraft};
use crate::models::{Credentials, Registration};
use crate::router::{FeedFilter, ScreenTicket};
use crate::session::{AuthAction, BearerToken};

use super::messages::AppMessage;

/// Background work requested by the UI. Every request answers with exactly
/// one `AppMessage`.
#[derive(Debug)]
pub enum Request {
    Login(Credentials),
    Register(Registration),
    CheckIdentity(BearerToken),
    LoadPosts {
        ticket: ScreenTicket,
        seq: u64,
        filter: FeedFilter,
    },
    Like {
        ticket: ScreenTicket,
        token: BearerToken,
        post_id: String,
    },
    CreatePost {
        token: BearerToken,
        draft: PostDraft,
    },
    LoadStats {
        ticket: ScreenTicket,
        seq: u64,
        token: BearerToken,
    },
    LoadComments {
        ticket: ScreenTicket,
        post_id: String,
    },
    AddComment {
        ticket: ScreenTicket,
        token: BearerToken,
        post_id: String,
        body: String,
    },
}

pub trait Dispatch {
    fn dispatch(&self, request: Request);
}

/// Runs each request on its own short-lived thread.
pub struct ThreadDispatch {
    client: ApiClient,
    tx: Sender<AppMessage>,
}

impl ThreadDispatch {
    pub fn new(client: ApiClient, tx: Sender<AppMessage>) -> Self {
        Self { client, tx }
    }
}

impl Dispatch for ThreadDispatch {
    fn dispatch(&self, request: Request) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let message = execute(&client, request);
            if tx.send(message).is_err() {
                error!("UI channel closed, dropping result");
            }
        });
    }
}

pub fn execute<A: PortalApi + ?Sized>(api: &A, request: Request) -> AppMessage {
    match request {
        Request::Login(credentials) => AppMessage::AuthFinished {
            action: AuthAction::Login,
            result: api.login(&credentials),
        },
        Request::Register(registration) => AppMessage::AuthFinished {
            action: AuthAction::Register,
            result: api.register(&registration),
        },
        Request::CheckIdentity(token) => {
            let result = api.current_user(&token);
            AppMessage::IdentityChecked { token, result }
        }
        Request::LoadPosts {
            ticket,
            seq,
            filter,
        } => AppMessage::PostsLoaded {
            ticket,
            seq,
            result: content::list_posts(api, filter.0),
        },
        Request::Like {
            ticket,
            token,
            post_id,
        } => {
            let result = content::like_post(api, Some(&token), &post_id);
            AppMessage::LikeFinished {
                ticket,
                post_id,
                result,
            }
        }
        Request::CreatePost { token, draft } => {
            AppMessage::PostCreated(content::create_post(api, Some(&token), &draft))
        }
        Request::LoadStats { ticket, seq, token } => AppMessage::StatsLoaded {
            ticket,
            seq,
            result: content::dashboard_stats(api, Some(&token)),
        },
        Request::LoadComments { ticket, post_id } => {
            let result = content::list_comments(api, &post_id);
            AppMessage::CommentsLoaded {
                ticket,
                post_id,
                result,
            }
        }
        Request::AddComment {
            ticket,
            token,
            post_id,
            body,
        } => {
            let result = content::add_comment(api, Some(&token), &post_id, &body);
            AppMessage::CommentAdded {
                ticket,
                post_id,
                result,
            }
        }
    }
}

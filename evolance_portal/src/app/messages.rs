use log::{debug, error, info};

use crate::content::ContentResult;
use crate::models::{AuthResponse, Comment, DashboardStats, LikeResponse, Post, User};
use crate::router::{ScreenTicket, View};
use crate::session::{AuthAction, BearerToken};

use super::state::{AuthFormState, ComposerState};
use super::EvolanceApp;

pub enum AppMessage {
    AuthFinished {
        action: AuthAction,
        result: anyhow::Result<AuthResponse>,
    },
    IdentityChecked {
        token: BearerToken,
        result: anyhow::Result<User>,
    },
    PostsLoaded {
        ticket: ScreenTicket,
        seq: u64,
        result: ContentResult<Vec<Post>>,
    },
    LikeFinished {
        ticket: ScreenTicket,
        post_id: String,
        result: ContentResult<LikeResponse>,
    },
    PostCreated(ContentResult<Post>),
    StatsLoaded {
        ticket: ScreenTicket,
        seq: u64,
        result: ContentResult<DashboardStats>,
    },
    CommentsLoaded {
        ticket: ScreenTicket,
        post_id: String,
        result: ContentResult<Vec<Comment>>,
    },
    CommentAdded {
        ticket: ScreenTicket,
        post_id: String,
        result: ContentResult<Comment>,
    },
}

pub(super) fn process_messages(app: &mut EvolanceApp) {
    while let Ok(message) = app.rx.try_recv() {
        app.pending = app.pending.saturating_sub(1);
        match message {
            AppMessage::AuthFinished { action, result } => {
                app.auth_form.submitting = false;
                if app.session.accept_auth(action, result) {
                    app.auth_form = AuthFormState::default();
                    app.navigate(View::Home);
                } else {
                    app.auth_form.error = Some(action.failure_notice().to_string());
                }
            }
            AppMessage::IdentityChecked { token, result } => {
                app.session.finish_restore(token, result);
                if !app.session.is_authenticated() {
                    app.after_session_lost();
                }
            }
            AppMessage::PostsLoaded {
                ticket,
                seq,
                result,
            } => {
                if !app.router.is_current(ticket) {
                    debug!("dropping post listing for {:?}", ticket.view);
                    continue;
                }
                if seq < app.feed.fetch_seq {
                    debug!("dropping post listing #{seq}, #{} is newer", app.feed.fetch_seq);
                    continue;
                }
                app.feed.loading = false;
                match result {
                    Ok(posts) => {
                        app.feed.posts = posts;
                        app.feed.error = None;
                    }
                    Err(err) => app.feed.error = Some(err.to_string()),
                }
            }
            AppMessage::LikeFinished {
                ticket,
                post_id,
                result,
            } => {
                app.feed.liking.remove(&post_id);
                match result {
                    Ok(response) => {
                        match response.liked {
                            Some(true) => {
                                app.liked.insert(post_id);
                            }
                            Some(false) => {
                                app.liked.remove(&post_id);
                            }
                            None => {}
                        }
                        // The server owns the count.
                        if app.router.is_current(ticket) {
                            app.spawn_load_posts(ticket);
                        }
                    }
                    Err(err) => app.notice = Some(err.to_string()),
                }
            }
            AppMessage::PostCreated(result) => {
                app.composer.submitting = false;
                match result {
                    Ok(post) => {
                        info!("published post {}", post.id);
                        app.composer = ComposerState::closed();
                        app.notice = Some(format!("Published \"{}\"", post.title));
                        app.refresh_current();
                    }
                    Err(err) => app.composer.error = Some(err.to_string()),
                }
            }
            AppMessage::StatsLoaded {
                ticket,
                seq,
                result,
            } => {
                if !app.router.is_current(ticket) || seq < app.dashboard.fetch_seq {
                    debug!("dropping stale dashboard stats");
                    continue;
                }
                app.dashboard.loading = false;
                match result {
                    Ok(stats) => {
                        app.dashboard.stats = stats;
                        app.dashboard.error = None;
                    }
                    Err(err) => app.dashboard.error = Some(err.to_string()),
                }
            }
            AppMessage::CommentsLoaded {
                ticket,
                post_id,
                result,
            } => {
                if !app.router.is_current(ticket) {
                    continue;
                }
                if let Some(thread) = app.feed.comments.get_mut(&post_id) {
                    thread.loading = false;
                    match result {
                        Ok(comments) => {
                            thread.comments = comments;
                            thread.error = None;
                        }
                        Err(err) => thread.error = Some(err.to_string()),
                    }
                }
            }
            AppMessage::CommentAdded {
                ticket,
                post_id,
                result,
            } => {
                if !app.router.is_current(ticket) {
                    if let Err(err) = result {
                        error!("comment on {post_id} failed after leaving the screen: {err}");
                    }
                    continue;
                }
                let Some(thread) = app.feed.comments.get_mut(&post_id) else {
                    continue;
                };
                thread.sending = false;
                match result {
                    Ok(_) => {
                        thread.draft.clear();
                        thread.error = None;
                        app.spawn_load_comments(ticket, post_id);
                    }
                    Err(err) => thread.error = Some(err.to_string()),
                }
            }
        }
    }
}

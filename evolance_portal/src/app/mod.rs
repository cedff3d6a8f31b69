use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use eframe::egui::{self, Context};
use log::info;

use crate::api::ApiClient;
use crate::content::ContentError;
use crate::models::{Credentials, PostType};
use crate::router::{FeedFilter, ScreenTicket, View, ViewRouter};
use crate::session::{AuthAction, SessionManager};

mod messages;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use state::{AuthFormState, CommentThreadState, ComposerState, DashboardState, FeedState};
use tasks::{Dispatch, Request, ThreadDispatch};

pub struct EvolanceApp {
    api: ApiClient,
    dispatcher: Box<dyn Dispatch>,
    rx: Receiver<AppMessage>,
    /// Requests spawned whose result message has not been drained yet.
    pending: usize,
    session: SessionManager,
    router: ViewRouter,
    feed: FeedState,
    liked: HashSet<String>,
    auth_form: AuthFormState,
    dashboard: DashboardState,
    composer: ComposerState,
    notice: Option<String>,
}

impl EvolanceApp {
    /// Builds the app, starts the identity check for a persisted token and
    /// mounts the home screen.
    pub fn new(api: ApiClient, session: SessionManager) -> Self {
        let (tx, rx) = mpsc::channel();
        let dispatcher = ThreadDispatch::new(api.clone(), tx);
        Self::with_dispatcher(api, session, rx, Box::new(dispatcher))
    }

    fn with_dispatcher(
        api: ApiClient,
        session: SessionManager,
        rx: Receiver<AppMessage>,
        dispatcher: Box<dyn Dispatch>,
    ) -> Self {
        let mut app = Self {
            api,
            dispatcher,
            rx,
            pending: 0,
            session,
            router: ViewRouter::new(),
            feed: FeedState::new(FeedFilter(None)),
            liked: HashSet::new(),
            auth_form: AuthFormState::default(),
            dashboard: DashboardState::default(),
            composer: ComposerState::closed(),
            notice: None,
        };
        if let Some(token) = app.session.begin_restore() {
            info!("validating persisted session");
            app.dispatch(Request::CheckIdentity(token));
        }
        let ticket = app.router.ticket();
        app.mount(ticket);
        app
    }

    fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    fn dispatch(&mut self, request: Request) {
        self.pending += 1;
        self.dispatcher.dispatch(request);
    }

    pub(crate) fn navigate(&mut self, view: View) {
        let ticket = self.router.navigate(view, self.session.is_authenticated());
        self.mount(ticket);
    }

    /// Resets the screen's state and starts its fetches.
    fn mount(&mut self, ticket: ScreenTicket) {
        if let Some(filter) = ticket.view.feed() {
            self.feed = FeedState::new(filter);
            self.spawn_load_posts(ticket);
        }
        match ticket.view {
            View::Dashboard => {
                self.dashboard = DashboardState::default();
                self.spawn_load_stats(ticket);
            }
            View::Login | View::Register => {
                self.auth_form.error = None;
            }
            View::Home | View::Blogs | View::Research => {}
        }
    }

    /// Re-reads whatever the current screen shows, keeping its mount.
    fn refresh_current(&mut self) {
        let ticket = self.router.ticket();
        if ticket.view.feed().is_some() {
            self.spawn_load_posts(ticket);
        }
        if ticket.view == View::Dashboard {
            self.spawn_load_stats(ticket);
        }
    }

    fn after_session_lost(&mut self) {
        self.liked.clear();
        self.composer = ComposerState::closed();
        if let Some(ticket) = self.router.session_changed(false) {
            self.mount(ticket);
        }
    }

    pub(crate) fn logout(&mut self) {
        self.session.logout();
        self.after_session_lost();
    }

    fn spawn_load_posts(&mut self, ticket: ScreenTicket) {
        self.feed.fetch_seq += 1;
        self.feed.loading = true;
        self.feed.error = None;
        self.dispatch(Request::LoadPosts {
            ticket,
            seq: self.feed.fetch_seq,
            filter: self.feed.filter,
        });
    }

    fn spawn_load_stats(&mut self, ticket: ScreenTicket) {
        let Some(token) = self.session.bearer().cloned() else {
            self.dashboard.error = Some(ContentError::LoginRequired("view your dashboard").to_string());
            return;
        };
        self.dashboard.fetch_seq += 1;
        self.dashboard.loading = true;
        self.dispatch(Request::LoadStats {
            ticket,
            seq: self.dashboard.fetch_seq,
            token,
        });
    }

    pub(crate) fn request_like(&mut self, post_id: &str) {
        let Some(token) = self.session.bearer().cloned() else {
            self.notice = Some(ContentError::LoginRequired("like posts").to_string());
            return;
        };
        if !self.feed.liking.insert(post_id.to_string()) {
            return;
        }
        self.dispatch(Request::Like {
            ticket: self.router.ticket(),
            token,
            post_id: post_id.to_string(),
        });
    }

    pub(crate) fn submit_auth(&mut self, action: AuthAction) {
        if self.auth_form.submitting {
            return;
        }
        if let Some(field) = self.auth_form.missing_field(action) {
            self.auth_form.error = Some(format!("{field} is required"));
            return;
        }
        self.auth_form.submitting = true;
        self.auth_form.error = None;
        let request = match action {
            AuthAction::Login => Request::Login(Credentials {
                email: self.auth_form.email.trim().to_string(),
                password: self.auth_form.password.clone(),
            }),
            AuthAction::Register => Request::Register(self.auth_form.registration()),
        };
        self.dispatch(request);
    }

    pub(crate) fn open_composer(&mut self, post_type: PostType) {
        self.composer = ComposerState::open_for(post_type);
    }

    pub(crate) fn submit_composer(&mut self) {
        if self.composer.submitting {
            return;
        }
        if let Err(err) = self.composer.draft.validate() {
            self.composer.error = Some(err.to_string());
            return;
        }
        let Some(token) = self.session.bearer().cloned() else {
            self.composer.error = Some(ContentError::LoginRequired("publish").to_string());
            return;
        };
        self.composer.submitting = true;
        self.composer.error = None;
        let draft = self.composer.draft.clone();
        self.dispatch(Request::CreatePost { token, draft });
    }

    pub(crate) fn toggle_comments(&mut self, post_id: &str) {
        if self.feed.comments.remove(post_id).is_some() {
            return;
        }
        self.feed
            .comments
            .insert(post_id.to_string(), CommentThreadState::default());
        let ticket = self.router.ticket();
        self.spawn_load_comments(ticket, post_id.to_string());
    }

    fn spawn_load_comments(&mut self, ticket: ScreenTicket, post_id: String) {
        if let Some(thread) = self.feed.comments.get_mut(&post_id) {
            thread.loading = true;
        }
        self.dispatch(Request::LoadComments { ticket, post_id });
    }

    pub(crate) fn submit_comment(&mut self, post_id: &str) {
        let token = self.session.bearer().cloned();
        let ticket = self.router.ticket();
        let Some(thread) = self.feed.comments.get_mut(post_id) else {
            return;
        };
        if thread.sending {
            return;
        }
        if thread.draft.trim().is_empty() {
            thread.error = Some(ContentError::MissingField("Comment").to_string());
            return;
        }
        let Some(token) = token else {
            thread.error = Some(ContentError::LoginRequired("comment").to_string());
            return;
        };
        thread.sending = true;
        thread.error = None;
        let body = thread.draft.clone();
        self.dispatch(Request::AddComment {
            ticket,
            token,
            post_id: post_id.to_string(),
            body,
        });
    }
}

impl eframe::App for EvolanceApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.render_header(ui);
            self.render_notice(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.router.current() {
            View::Home => {
                self.render_hero(ui);
                ui.separator();
                self.render_feed(ui);
            }
            View::Blogs | View::Research => self.render_feed(ui),
            View::Login => self.render_auth_form(ui, AuthAction::Login),
            View::Register => self.render_auth_form(ui, AuthAction::Register),
            View::Dashboard => self.render_dashboard(ui),
        });

        self.render_composer(ctx);

        if self.pending > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// Formats server timestamps, which may come with or without an offset.
fn format_date(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Utc).format("%b %-d, %Y").to_string();
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

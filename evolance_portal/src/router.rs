//! Top-level view selection.
//!
//! Any view may follow any other. The only guard is on screens that need a
//! session: asking for them while logged out lands on the login screen.

use log::debug;

use crate::models::PostType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Home,
    Login,
    Register,
    Blogs,
    Research,
    Dashboard,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Home,
        View::Login,
        View::Register,
        View::Blogs,
        View::Research,
        View::Dashboard,
    ];

    pub fn requires_session(self) -> bool {
        matches!(self, View::Dashboard)
    }

    /// Filter applied to the feed shown on this view, if it shows one.
    pub fn feed(self) -> Option<FeedFilter> {
        match self {
            View::Home => Some(FeedFilter(None)),
            View::Blogs => Some(FeedFilter(Some(PostType::Blog))),
            View::Research => Some(FeedFilter(Some(PostType::Research))),
            View::Login | View::Register | View::Dashboard => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedFilter(pub Option<PostType>);

impl FeedFilter {
    pub fn heading(self) -> &'static str {
        match self.0 {
            Some(PostType::Research) => "Research Papers",
            Some(PostType::Blog) => "Blog Posts",
            None => "Latest Content",
        }
    }
}

/// Identifies one mount of one screen. Results fetched for an older mount
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTicket {
    pub view: View,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct ViewRouter {
    current: View,
    generation: u64,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn ticket(&self) -> ScreenTicket {
        ScreenTicket {
            view: self.current,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: ScreenTicket) -> bool {
        self.ticket() == ticket
    }

    /// Switches screens and returns the ticket of the new mount.
    pub fn navigate(&mut self, requested: View, authenticated: bool) -> ScreenTicket {
        let target = if requested.requires_session() && !authenticated {
            debug!("{requested:?} needs a session, showing login instead");
            View::Login
        } else {
            requested
        };
        self.current = target;
        self.generation += 1;
        self.ticket()
    }

    /// Re-checks the guard after the session changed. Returns the new ticket
    /// when the current screen had to be left.
    pub fn session_changed(&mut self, authenticated: bool) -> Option<ScreenTicket> {
        if self.current.requires_session() && !authenticated {
            Some(self.navigate(View::Home, authenticated))
        } else {
            None
        }
    }
}

use eframe::egui::{self, Color32, RichText};

use crate::models::{Post, PostType};

use super::super::state::CommentThreadState;
use super::super::{format_date, EvolanceApp};

enum CardAction {
    Like(String),
    ToggleComments(String),
    Share(String),
    SendComment(String),
}

impl EvolanceApp {
    pub(crate) fn render_feed(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.feed.filter.heading());
        ui.label("Discover cutting-edge insights and innovative ideas");
        ui.add_space(8.0);

        if self.feed.loading && self.feed.posts.is_empty() {
            ui.add(egui::Spinner::new());
            return;
        }
        if let Some(err) = &self.feed.error {
            ui.colored_label(Color32::LIGHT_RED, err);
            ui.separator();
        }

        let mut actions = Vec::new();
        egui::ScrollArea::vertical().show(ui, |ui| {
            if self.feed.posts.is_empty() {
                ui.label("No posts found. Be the first to share your research!");
            }
            let comments = &mut self.feed.comments;
            for post in &self.feed.posts {
                let liked = self.liked.contains(&post.id);
                let liking = self.feed.liking.contains(&post.id);
                render_card(ui, post, liked, liking, comments.get_mut(&post.id), &mut actions);
                ui.add_space(6.0);
            }
        });

        for action in actions {
            match action {
                CardAction::Like(id) => self.request_like(&id),
                CardAction::ToggleComments(id) => self.toggle_comments(&id),
                CardAction::SendComment(id) => self.submit_comment(&id),
                CardAction::Share(id) => {
                    let url = self.api.share_url(&id);
                    ui.output_mut(|o| o.copied_text = url);
                    self.notice = Some("Link copied to clipboard!".into());
                }
            }
        }
    }
}

fn render_card(
    ui: &mut egui::Ui,
    post: &Post,
    liked: bool,
    liking: bool,
    comments: Option<&mut CommentThreadState>,
    actions: &mut Vec<CardAction>,
) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let icon = match post.post_type {
                    PostType::Research => "🔬",
                    PostType::Blog => "✏",
                };
                ui.label(icon);
                ui.label(RichText::new(post.post_type.label()).small());
                ui.label(RichText::new(format_date(&post.created_at)).small().weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(format!("{} min read", post.reading_time)).small());
                });
            });

            ui.label(RichText::new(&post.title).strong().size(18.0));
            if let Some(author) = &post.author_name {
                ui.label(RichText::new(format!("by {author}")).weak());
            }
            if let Some(summary) = post.summary.as_deref().filter(|s| !s.is_empty()) {
                ui.label(summary);
            }
            if !post.tags.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for tag in &post.tags {
                        ui.label(RichText::new(format!("#{tag}")).color(Color32::from_rgb(192, 132, 252)));
                    }
                });
            }

            ui.separator();
            ui.horizontal(|ui| {
                let heart = if liked { "♥" } else { "♡" };
                let like = ui.add_enabled(!liking, egui::Button::new(format!("{heart} {}", post.likes)));
                if like.clicked() {
                    actions.push(CardAction::Like(post.id.clone()));
                }
                let comment_label = if comments.is_some() { "Hide comments" } else { "Comment" };
                if ui.button(comment_label).clicked() {
                    actions.push(CardAction::ToggleComments(post.id.clone()));
                }
                if ui.button("Share").clicked() {
                    actions.push(CardAction::Share(post.id.clone()));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{} views", post.views));
                });
            });

            if let Some(thread) = comments {
                render_comments(ui, &post.id, thread, actions);
            }
        });
}

fn render_comments(
    ui: &mut egui::Ui,
    post_id: &str,
    thread: &mut CommentThreadState,
    actions: &mut Vec<CardAction>,
) {
    ui.add_space(4.0);
    if thread.loading && thread.comments.is_empty() {
        ui.spinner();
    }
    if let Some(err) = &thread.error {
        ui.colored_label(Color32::LIGHT_RED, err);
    }
    if thread.comments.is_empty() && !thread.loading {
        ui.label(RichText::new("No comments yet.").weak());
    }
    for comment in &thread.comments {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(&comment.user_name).strong());
            ui.label(RichText::new(format_date(&comment.created_at)).small().weak());
        });
        ui.label(&comment.content);
    }
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut thread.draft)
                .hint_text("Add a comment...")
                .id_salt(("comment_draft", post_id)),
        );
        if thread.sending {
            ui.spinner();
        } else if ui.button("Send").clicked() {
            actions.push(CardAction::SendComment(post_id.to_string()));
        }
    });
}

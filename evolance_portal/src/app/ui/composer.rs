use eframe::egui::{self, Align2, Color32, Context};

use crate::models::PostType;

use super::super::state::ComposerState;
use super::super::EvolanceApp;

impl EvolanceApp {
    pub(crate) fn render_composer(&mut self, ctx: &Context) {
        if !self.composer.open {
            return;
        }

        let mut should_submit = false;
        let mut should_close = false;
        let composer = &mut self.composer;

        egui::Window::new("New Post")
            .open(&mut composer.open)
            .default_width(480.0)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                if let Some(err) = &composer.error {
                    ui.colored_label(Color32::LIGHT_RED, err);
                }
                let draft = &mut composer.draft;
                ui.horizontal(|ui| {
                    ui.label("Type");
                    ui.selectable_value(&mut draft.post_type, PostType::Blog, "Blog Post");
                    ui.selectable_value(&mut draft.post_type, PostType::Research, "Research Paper");
                });
                ui.label("Title");
                ui.text_edit_singleline(&mut draft.title);
                ui.add_space(6.0);
                ui.label("Summary (optional)");
                ui.text_edit_singleline(&mut draft.summary);
                ui.add_space(6.0);
                ui.label("Content");
                ui.add(
                    egui::TextEdit::multiline(&mut draft.content)
                        .desired_rows(10)
                        .hint_text("Write your post..."),
                );
                ui.add_space(6.0);
                ui.label("Tags (comma separated)");
                ui.add(egui::TextEdit::singleline(&mut draft.tags).hint_text("ai, psychology"));
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if composer.submitting {
                        ui.add(egui::Spinner::new());
                    } else if ui.button("Publish").clicked() {
                        should_submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        should_close = true;
                    }
                });
            });

        if should_submit {
            self.submit_composer();
        }
        if should_close {
            self.composer = ComposerState::closed();
        }
    }
}

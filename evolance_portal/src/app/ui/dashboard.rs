use eframe::egui::{self, Color32, RichText};

use crate::models::PostType;

use super::super::EvolanceApp;

impl EvolanceApp {
    pub(crate) fn render_dashboard(&mut self, ui: &mut egui::Ui) {
        let name = self
            .session
            .user()
            .map(|user| user.display_name().to_string())
            .unwrap_or_default();
        ui.heading(format!("Welcome, {name}!"));
        ui.label("Your research journey dashboard");
        ui.add_space(12.0);

        if let Some(err) = &self.dashboard.error {
            ui.colored_label(Color32::LIGHT_RED, err);
        }

        let stats = self.dashboard.stats;
        ui.horizontal(|ui| {
            for (value, label, color) in [
                (stats.posts, "Published Posts", Color32::from_rgb(34, 211, 238)),
                (stats.likes, "Total Likes", Color32::from_rgb(192, 132, 252)),
                (stats.views, "Total Views", Color32::from_rgb(244, 114, 182)),
            ] {
                egui::Frame::group(ui.style())
                    .inner_margin(egui::vec2(24.0, 12.0))
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            if self.dashboard.loading {
                                ui.spinner();
                            } else {
                                ui.label(RichText::new(value.to_string()).size(28.0).strong().color(color));
                            }
                            ui.label(label);
                        });
                    });
            }
        });

        ui.add_space(16.0);
        ui.heading("Quick Actions");
        let mut compose = None;
        ui.horizontal(|ui| {
            if ui
                .button("Create New Blog Post\nShare your insights with the community")
                .clicked()
            {
                compose = Some(PostType::Blog);
            }
            if ui
                .button("Publish Research Paper\nContribute to scientific knowledge")
                .clicked()
            {
                compose = Some(PostType::Research);
            }
        });
        if let Some(post_type) = compose {
            self.open_composer(post_type);
        }
    }
}

use eframe::egui::{self, Color32, RichText};

use crate::router::View;

use super::super::EvolanceApp;

const BRAND: Color32 = Color32::from_rgb(34, 211, 238);

impl EvolanceApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        let current = self.router.current();
        let mut target = None;
        let mut logout = false;

        ui.horizontal(|ui| {
            ui.label(RichText::new("EVOLANCE").strong().size(22.0).color(BRAND))
                .on_hover_text(self.backend_caption());
            ui.label(RichText::new(self.api.base_url()).small().weak());
            ui.add_space(12.0);

            for (view, label) in [
                (View::Home, "Research Portal"),
                (View::Blogs, "Blogs"),
                (View::Research, "Research Papers"),
            ] {
                if ui.selectable_label(current == view, label).clicked() {
                    target = Some(view);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(user) = self.session.user() {
                    if ui.button("Logout").clicked() {
                        logout = true;
                    }
                    ui.label(format!("Hi, {}!", user.display_name()));
                    if ui
                        .selectable_label(current == View::Dashboard, "Dashboard")
                        .clicked()
                    {
                        target = Some(View::Dashboard);
                    }
                } else if self.session.is_restoring() {
                    ui.spinner();
                    ui.label("Restoring session…");
                } else {
                    if ui.button("Join Research Portal").clicked() {
                        target = Some(View::Register);
                    }
                    if ui.selectable_label(current == View::Login, "Login").clicked() {
                        target = Some(View::Login);
                    }
                }
            });
        });

        if logout {
            self.logout();
        }
        if let Some(view) = target {
            self.navigate(view);
        }
    }

    pub(crate) fn backend_caption(&self) -> String {
        format!("Connected to {}", self.api.base_url())
    }

    pub(crate) fn render_notice(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        let mut dismiss = false;
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(message.as_str());
                    if ui.button("Dismiss").clicked() {
                        dismiss = true;
                    }
                });
            });
        if dismiss {
            self.notice = None;
        }
    }

    pub(crate) fn render_hero(&mut self, ui: &mut egui::Ui) {
        let mut target = None;
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(RichText::new("Future of").size(36.0).strong());
            ui.label(RichText::new("Research").size(36.0).strong().color(BRAND));
            ui.add_space(8.0);
            ui.label(
                "Discover cutting-edge research papers, innovative blog posts, and join a \
                 community of forward-thinking researchers.",
            );
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Explore Research").clicked() {
                    target = Some(View::Research);
                }
                if ui.button("Read Blogs").clicked() {
                    target = Some(View::Blogs);
                }
            });
            ui.add_space(16.0);
        });
        if let Some(view) = target {
            self.navigate(view);
        }
    }
}

use eframe::egui::{self, Color32, RichText};

use crate::router::View;
use crate::session::AuthAction;

use super::super::EvolanceApp;

impl EvolanceApp {
    pub(crate) fn render_auth_form(&mut self, ui: &mut egui::Ui, action: AuthAction) {
        let is_login = action == AuthAction::Login;
        let mut submit = false;
        let mut switch_to = None;

        ui.vertical_centered(|ui| {
            ui.set_max_width(360.0);
            ui.add_space(24.0);
            ui.heading(if is_login { "Welcome Back" } else { "Join Evolance" });
            ui.label(if is_login {
                "Sign in to continue your research journey"
            } else {
                "Start your journey into the future of research"
            });
            ui.add_space(12.0);

            let form = &mut self.auth_form;
            if let Some(err) = &form.error {
                ui.colored_label(Color32::LIGHT_RED, err);
            }

            egui::Grid::new("auth_form_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    if !is_login {
                        ui.label("Full name");
                        ui.text_edit_singleline(&mut form.full_name);
                        ui.end_row();

                        ui.label("Username");
                        ui.text_edit_singleline(&mut form.username);
                        ui.end_row();
                    }

                    ui.label("Email");
                    ui.text_edit_singleline(&mut form.email);
                    ui.end_row();

                    ui.label("Password");
                    let password = ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
                    if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();

                    if !is_login {
                        ui.label("Bio");
                        ui.add(
                            egui::TextEdit::multiline(&mut form.bio)
                                .desired_rows(3)
                                .hint_text("Tell us about your research interests..."),
                        );
                        ui.end_row();
                    }
                });

            ui.add_space(12.0);
            if form.submitting {
                ui.add(egui::Spinner::new());
            } else if ui
                .button(if is_login { "Sign In" } else { "Create Account" })
                .clicked()
            {
                submit = true;
            }

            ui.add_space(8.0);
            let (prompt, target) = if is_login {
                ("Don't have an account? Sign up", View::Register)
            } else {
                ("Already have an account? Sign in", View::Login)
            };
            if ui.link(RichText::new(prompt)).clicked() {
                switch_to = Some(target);
            }
        });

        if submit {
            self.submit_auth(action);
        }
        if let Some(view) = switch_to {
            self.navigate(view);
        }
    }
}

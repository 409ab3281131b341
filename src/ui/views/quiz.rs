use egui::{Align, Button, CentralPanel, Context, ProgressBar, RichText, Vec2};

use crate::app::QuizApp;
use crate::model::ChoiceLabel;

pub fn ui_quiz(app: &mut QuizApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 520.0;
        let content_width = ui.available_width().min(max_width);
        let button_h = 44.0;

        ui.vertical_centered_justified(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(24, 12))
                .show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
                        ui.set_width(content_width);

                        // Cuenta atrás y marcador
                        let seconds_left = app.run.time_left.ceil().max(0.0) as u32;
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(format!("⏱ {seconds_left}"))
                                    .heading()
                                    .strong(),
                            );
                            ui.add_space(16.0);
                            ui.label(format!("Puntos: {}", app.run.score));
                            ui.add_space(16.0);
                            ui.label(format!("COMBO: {}", app.run.combo));
                        });
                        let fraction =
                            (app.run.time_left / app.config.round_seconds).clamp(0.0, 1.0);
                        ui.add(ProgressBar::new(fraction as f32).desired_height(6.0));
                        ui.add_space(14.0);

                        // Se clona lo necesario para no pelear con el
                        // borrow de `app` dentro de los botones
                        let question = app.live_question().cloned();
                        match question {
                            Some(q) => {
                                ui.heading(RichText::new(&q.word).size(34.0).strong());
                                ui.label(&q.prompt);
                                ui.add_space(12.0);

                                let locked = app.is_answer_locked();
                                for label in ChoiceLabel::ALL {
                                    let text = format!("{}: {}", label.as_str(), q.choice(label));
                                    let button = ui.add_enabled(
                                        !locked,
                                        Button::new(text)
                                            .min_size(Vec2::new(content_width, button_h)),
                                    );
                                    if button.clicked() {
                                        app.procesar_respuesta(label);
                                    }
                                    ui.add_space(6.0);
                                }
                            }
                            None => {
                                ui.label("…");
                            }
                        }

                        if !app.message.is_empty() {
                            ui.add_space(6.0);
                            ui.label(RichText::new(&app.message).strong());
                        }

                        ui.add_space(12.0);
                        if ui
                            .add_sized([content_width / 2.0, 32.0], Button::new("⏹ Terminar"))
                            .clicked()
                        {
                            app.terminar_partida();
                        }
                    });
                });
        });
    });
}

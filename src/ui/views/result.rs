use egui::{Align, Button, CentralPanel, Context, RichText, Vec2};

use crate::app::QuizApp;

pub fn ui_result(app: &mut QuizApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 420.0;
        let content_width = ui.available_width().min(max_width);
        let button_h = 40.0;

        let estimated_h = 320.0;
        let vertical_space = ((ui.available_height() - estimated_h) / 2.0).max(0.0);
        ui.add_space(vertical_space);

        ui.vertical_centered_justified(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(24, 16))
                .show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
                        ui.set_width(content_width);
                        ui.heading("⏰ ¡Fin de la partida!");
                        ui.add_space(10.0);

                        ui.label(
                            RichText::new(format!("{} puntos", app.run.score))
                                .size(32.0)
                                .strong(),
                        );
                        ui.label(format!(
                            "⭕ {}  /  ❌ {}  ·  COMBO máximo {}",
                            app.run.correct, app.run.wrong, app.run.max_combo
                        ));
                        ui.add_space(6.0);

                        let tier = if app.run.score >= 120 {
                            "🔥 ¡Imparable!"
                        } else if app.run.score >= 60 {
                            "✨ ¡Vas cogiendo ritmo!"
                        } else {
                            "🌱 Sigue practicando"
                        };
                        ui.label(RichText::new(tier).strong());
                        ui.add_space(16.0);

                        let retry = ui.add_sized(
                            [content_width, button_h],
                            Button::new(RichText::new("🔁 Otra partida").heading()),
                        );
                        if retry.clicked() {
                            let now = ui.input(|i| i.time);
                            app.empezar_partida(now);
                        }
                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            let half = (content_width - 8.0) / 2.0;
                            if ui
                                .add_sized([half, button_h], Button::new("🏆 Ranking"))
                                .clicked()
                            {
                                app.abrir_ranking();
                            }
                            if ui.add_sized([half, button_h], Button::new("Menú")).clicked() {
                                app.abandonar_partida();
                            }
                        });
                    });
                });
        });

        ui.add_space(vertical_space);
    });
}

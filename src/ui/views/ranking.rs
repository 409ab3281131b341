use egui::{Align, Button, CentralPanel, ComboBox, Context, RichText, ScrollArea};

use crate::app::{QuizApp, RankingVm};

pub fn ui_ranking(app: &mut QuizApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 480.0;
        let content_width = ui.available_width().min(max_width);

        ui.vertical_centered_justified(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(24, 16))
                .show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
                        ui.set_width(content_width);
                        ui.heading("🏆 Ranking");
                        ui.add_space(8.0);

                        // Selector de semana (desc, la actual siempre está)
                        let weeks = app.ranking.weeks.clone();
                        let mut selected = app
                            .ranking
                            .selected_week
                            .clone()
                            .unwrap_or_default();
                        let before = selected.clone();
                        ui.horizontal(|ui| {
                            ui.label("Semana:");
                            ComboBox::from_id_salt("week_select")
                                .selected_text(selected.clone())
                                .show_ui(ui, |ui| {
                                    for week in &weeks {
                                        ui.selectable_value(&mut selected, week.clone(), week);
                                    }
                                });
                        });
                        if selected != before && !selected.is_empty() {
                            app.seleccionar_semana(selected);
                        }
                        ui.add_space(8.0);

                        if !app.ranking.message.is_empty() {
                            ui.label(
                                RichText::new(&app.ranking.message)
                                    .color(egui::Color32::YELLOW),
                            );
                            ui.add_space(6.0);
                        }

                        ScrollArea::vertical().max_height(380.0).show(ui, |ui| {
                            ui.label(RichText::new("Top 10 de la semana").strong());
                            if app.ranking.weekly_top.is_empty() {
                                ui.label(RichText::new("Aún no hay datos").weak());
                            }
                            for row in &app.ranking.weekly_top {
                                ui.label(RankingVm::format_row(row));
                            }
                            ui.add_space(6.0);

                            match &app.ranking.my_rank {
                                Some(me) => {
                                    ui.label(
                                        RichText::new(format!(
                                            "Tú: puesto {} con {} puntos (⭕{} / ❌{})",
                                            me.rank, me.points, me.correct, me.wrong
                                        ))
                                        .strong(),
                                    );
                                }
                                None => {
                                    ui.label(RichText::new("Tú: aún sin datos esta semana").weak());
                                }
                            }

                            ui.add_space(12.0);
                            ui.label(RichText::new("Top 10 total").strong());
                            if app.ranking.total_top.is_empty() {
                                ui.label(RichText::new("Aún no hay datos").weak());
                            }
                            for row in &app.ranking.total_top {
                                ui.label(RankingVm::format_row(row));
                            }
                        });

                        ui.add_space(12.0);
                        if ui
                            .add_sized([content_width, 36.0], Button::new("Volver"))
                            .clicked()
                        {
                            app.abandonar_partida();
                        }
                    });
                });
        });
    });
}

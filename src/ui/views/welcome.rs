use egui::{Align, Button, CentralPanel, ComboBox, Context, RichText, TextEdit, Vec2};

use crate::app::{BackendMode, QuizApp};

pub fn ui_welcome(app: &mut QuizApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 420.0;
        let content_width = ui.available_width().min(max_width);
        let button_h = 40.0;

        let estimated_h = 380.0;
        let vertical_space = ((ui.available_height() - estimated_h) / 2.0).max(0.0);
        ui.add_space(vertical_space);

        ui.vertical_centered_justified(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(24, 16))
                .show(ui, |ui| {
                    ui.with_layout(egui::Layout::top_down(Align::Center), |ui| {
                        ui.set_width(content_width);
                        ui.heading("📚 Quiz de Vocabulario");
                        ui.label("30 segundos, 4 opciones, ¿cuántas aciertas?");
                        ui.add_space(12.0);

                        if !app.message.is_empty() {
                            ui.label(
                                RichText::new(&app.message)
                                    .color(egui::Color32::YELLOW)
                                    .strong(),
                            );
                            ui.add_space(8.0);
                        }

                        // Modo de puntuación: se elige aquí, una vez
                        ui.horizontal(|ui| {
                            ui.label("Puntuaciones:");
                            let mut mode = app.mode;
                            ui.selectable_value(&mut mode, BackendMode::Local, "En este equipo");
                            ui.selectable_value(&mut mode, BackendMode::Remote, "En línea");
                            if mode != app.mode {
                                app.aplicar_modo(mode);
                            }
                        });
                        ui.add_space(6.0);

                        match app.mode {
                            BackendMode::Local => {
                                ui.horizontal(|ui| {
                                    ui.label("Apodo:");
                                    ui.add(
                                        TextEdit::singleline(&mut app.display_name)
                                            .desired_width(160.0),
                                    );
                                });
                            }
                            BackendMode::Remote => login_box(app, ui),
                        }
                        ui.add_space(6.0);

                        // Filtro de nivel (si el pool trae varios)
                        let levels = app.pool.levels();
                        if levels.len() > 1 {
                            ui.horizontal(|ui| {
                                ui.label("Nivel:");
                                let selected_text = match app.level_filter {
                                    Some(l) => format!("Nivel {l}"),
                                    None => "Todos".to_string(),
                                };
                                ComboBox::from_id_salt("level_filter")
                                    .selected_text(selected_text)
                                    .show_ui(ui, |ui| {
                                        ui.selectable_value(&mut app.level_filter, None, "Todos");
                                        for level in levels {
                                            ui.selectable_value(
                                                &mut app.level_filter,
                                                Some(level),
                                                format!("Nivel {level}"),
                                            );
                                        }
                                    });
                            });
                            ui.add_space(6.0);
                        }

                        ui.add_space(10.0);
                        let start = ui.add_enabled(
                            app.can_start(),
                            Button::new(RichText::new("▶ Jugar").heading())
                                .min_size(Vec2::new(content_width, button_h + 8.0)),
                        );
                        if start.clicked() {
                            let now = ui.input(|i| i.time);
                            app.empezar_partida(now);
                        }

                        ui.add_space(8.0);
                        if ui
                            .add_sized([content_width, button_h], Button::new("🏆 Ranking"))
                            .clicked()
                        {
                            app.abrir_ranking();
                        }
                    });
                });
        });

        ui.add_space(vertical_space);
    });
}

fn login_box(app: &mut QuizApp, ui: &mut egui::Ui) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label("Usuario:");
            ui.add(TextEdit::singleline(&mut app.login_id).desired_width(140.0));
        });
        ui.horizontal(|ui| {
            ui.label("Clave:");
            ui.add(
                TextEdit::singleline(&mut app.login_pw)
                    .password(true)
                    .desired_width(140.0),
            );
        });
        ui.horizontal(|ui| {
            if ui.button("Entrar").clicked() {
                app.iniciar_sesion();
            }
            if ui.button("Salir").clicked() {
                app.cerrar_sesion();
            }
        });
        if !app.login_msg.is_empty() {
            ui.label(RichText::new(&app.login_msg).weak());
        }
    });
}

pub mod views;

use crate::app::QuizApp;
use crate::model::AppState;
use eframe::{APP_KEY, App, Frame, set_value};
use egui::Context;

impl App for QuizApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // Resultados asíncronos (web): se recogen antes de pintar
        #[cfg(target_arch = "wasm32")]
        self.poll_async();

        // El reloj de ronda va por su cuenta, candado o no candado
        let now = ctx.input(|i| i.time);
        self.tick(now);

        // Dispatch por estado a las vistas
        match self.state {
            AppState::Welcome => views::welcome::ui_welcome(self, ctx),
            AppState::Quiz => views::quiz::ui_quiz(self, ctx),
            AppState::Result => views::result::ui_result(self, ctx),
            AppState::Ranking => views::ranking::ui_ranking(self, ctx),
        }

        // Durante la partida hay que repintar para que la cuenta atrás
        // avance aunque nadie toque nada
        if self.state == AppState::Quiz {
            ctx.request_repaint();
        }

        // Con trabajo asíncrono en vuelo, repintar pronto para que el
        // poll lo recoja sin esperar a un evento de usuario
        #[cfg(target_arch = "wasm32")]
        if self.has_pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        set_value(storage, APP_KEY, self);
    }
}

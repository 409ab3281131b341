use chrono::Utc;

use super::*;
use crate::error::{LedgerError, QuizError};
use crate::ledger::GameRun;
use crate::model::ChoiceLabel;
use crate::ranking;
use crate::selector;
use crate::verify::verify;
use crate::week;

impl QuizApp {
    // ---- Vocabulario ----

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_vocabulary(&mut self) {
        match crate::data::read_vocab_file("vocab.csv") {
            Ok(text) => {
                if let Err(e) = self.pool.load_csv(&text) {
                    log::warn!("se mantiene el vocabulario anterior: {e}");
                }
            }
            // sin fichero no pasa nada: queda el pool embebido
            Err(e) => log::warn!("carga de vocab.csv omitida: {e}"),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load_vocabulary(&mut self) {
        let (tx, rx) = std::sync::mpsc::channel();
        self.pending_vocab_rx = Some(rx);
        wasm_bindgen_futures::spawn_local(async move {
            let _ = tx.send(fetch_vocab_csv().await);
        });
    }

    // ---- Partida ----

    pub fn empezar_partida(&mut self, now: f64) {
        if self.state == AppState::Quiz {
            return;
        }
        if !self.can_start() {
            self.message = "⚠ Inicia sesión para jugar en modo remoto.".to_string();
            return;
        }
        if let Err(e) = self
            .ledger
            .register_display_name(&self.user_id, &self.display_name)
        {
            log::warn!("no se pudo registrar el apodo: {e}");
        }

        self.run = RunState {
            time_left: self.config.round_seconds,
            deadline: Some(now + self.config.round_seconds),
            ..RunState::default()
        };
        self.message.clear();
        self.answer_lock = false;
        self.finish_after_pending = false;
        self.state = AppState::Quiz;
        self.emitir_pregunta();
    }

    /// Cuenta atrás. Corre en cada frame, independiente del candado de
    /// respuesta: el reloj sigue aunque haya un intento registrándose.
    pub fn tick(&mut self, now: f64) {
        if self.state != AppState::Quiz {
            return;
        }
        let Some(deadline) = self.run.deadline else {
            return;
        };
        self.run.time_left = (deadline - now).max(0.0);
        if self.run.time_left > 0.0 {
            return;
        }

        // tiempo agotado con un intento en vuelo: se deja que aplique
        // y la partida se cierra justo después
        if self.is_answer_locked() {
            self.finish_after_pending = true;
            return;
        }
        self.terminar_partida();
    }

    pub fn procesar_respuesta(&mut self, chosen: ChoiceLabel) {
        if self.state != AppState::Quiz {
            return;
        }
        // candado de reentrada: el segundo toque se descarta
        if self.is_answer_locked() {
            return;
        }

        let expected = self.live.as_ref().map(|issued| issued.correct);
        let result = match verify(chosen, expected, &self.config, Utc::now()) {
            Ok(result) => result,
            Err(QuizError::NoLiveQuestion) => {
                log::warn!("intento sin pregunta en curso, descartado");
                return;
            }
            Err(e) => {
                log::warn!("verificación fallida: {e}");
                return;
            }
        };

        self.answer_lock = true;

        #[cfg(target_arch = "wasm32")]
        if self.mode == BackendMode::Remote {
            self.start_remote_submit(result);
            return;
        }

        self.aplicar_resultado(&result);
        self.registrar_resultado(&result);
        self.avanzar_ronda();
    }

    /// Marcador y combo de la ronda. Al ledger solo llegan los puntos
    /// base del verificador; el bono de combo es cosmética de partida.
    fn aplicar_resultado(&mut self, result: &AttemptResult) {
        if result.is_correct {
            let bonus = self.run.combo.min(self.config.combo_cap);
            let gain = result.points + bonus;
            self.run.score += gain;
            self.run.combo += 1;
            self.run.max_combo = self.run.max_combo.max(self.run.combo);
            self.run.correct += 1;
            self.message = format!("⭕ ¡Correcto! +{gain} (COMBO {})", self.run.combo);
        } else {
            self.run.combo = 0;
            self.run.wrong += 1;
            self.message = "❌ Incorrecto. COMBO a cero.".to_string();
        }
    }

    fn registrar_resultado(&mut self, result: &AttemptResult) {
        // primero los desenlaces que quedaron pendientes
        let queued = std::mem::take(&mut self.pending_retry);
        for old in queued {
            if let Err(e) = self.ledger.apply_attempt(&self.user_id, &old) {
                log::warn!("reintento de envío fallido: {e}");
                self.pending_retry.push(old);
            }
        }

        if let Err(e) = self.ledger.apply_attempt(&self.user_id, result) {
            // el desenlace no se pierde: queda en cola de reintento
            log::warn!("no se pudo registrar el intento: {e}");
            self.message.push_str(" ⚠ Sin conexión: se reenviará.");
            self.pending_retry.push(result.clone());
        }
    }

    /// Libera el candado una vez registrado el intento y emitida la
    /// siguiente pregunta (o cerrada la partida si el tiempo venció
    /// mientras tanto).
    fn avanzar_ronda(&mut self) {
        if self.finish_after_pending {
            self.finish_after_pending = false;
            self.answer_lock = false;
            self.terminar_partida();
            return;
        }
        self.emitir_pregunta();
        self.answer_lock = false;
    }

    fn emitir_pregunta(&mut self) {
        self.question_seq += 1;
        let mut rng = rand::rng();
        match selector::next_question(
            &self.pool,
            self.level_filter,
            &mut self.history,
            &self.config,
            &mut rng,
            self.question_seq,
        ) {
            Ok(issued) => {
                // la clave de la ronda anterior muere aquí
                self.live = Some(issued);
            }
            Err(e) => {
                // sin datos suficientes no hay quiz: estado claro en
                // vez de pantalla vacía
                log::error!("no se pudo emitir pregunta: {e}");
                self.live = None;
                self.run.deadline = None;
                self.message = "⚠ No se puede empezar: vocabulario insuficiente.".to_string();
                self.state = AppState::Welcome;
            }
        }
    }

    pub fn terminar_partida(&mut self) {
        // una pregunta en vuelo se descarta sin verificar
        self.live = None;
        self.answer_lock = false;
        self.finish_after_pending = false;
        self.run.deadline = None;
        self.run.time_left = 0.0;
        self.state = AppState::Result;
        self.message = "⏰ ¡Tiempo!".to_string();

        let run = GameRun {
            day: week::current_day_id(),
            week_id: week::current_week_id(),
            score: self.run.score,
            correct: self.run.correct,
            wrong: self.run.wrong,
            max_combo: self.run.max_combo,
        };
        if let Err(e) = self.ledger.record_run(&run) {
            log::warn!("no se pudo archivar la partida: {e}");
        }
    }

    pub fn abandonar_partida(&mut self) {
        self.live = None;
        self.answer_lock = false;
        self.finish_after_pending = false;
        self.run.deadline = None;
        self.state = AppState::Welcome;
        self.message.clear();
    }

    // ---- Ranking ----

    pub fn abrir_ranking(&mut self) {
        self.state = AppState::Ranking;
        self.cargar_ranking(None);
    }

    pub fn seleccionar_semana(&mut self, week_id: String) {
        self.cargar_ranking(Some(week_id));
    }

    fn cargar_ranking(&mut self, week_id: Option<String>) {
        #[cfg(target_arch = "wasm32")]
        if self.mode == BackendMode::Remote {
            self.start_remote_ranking(week_id);
            return;
        }

        match self.build_ranking_vm(week_id) {
            Ok(vm) => self.ranking = vm,
            Err(e) => {
                // RemoteUnavailable llega hasta aquí y se muestra tal
                // cual; nada de inventarse filas
                self.ranking.loading = false;
                self.ranking.message = format!("⚠ {e}");
            }
        }
    }

    fn build_ranking_vm(&self, week_id: Option<String>) -> Result<RankingVm, LedgerError> {
        let weeks = self.ledger.week_ids()?;
        let selected = week_id.or_else(|| weeks.first().cloned());
        let names = self.ledger.display_names()?;

        let mut vm = RankingVm {
            weeks,
            selected_week: selected.clone(),
            ..RankingVm::default()
        };
        if let Some(week_id) = &selected {
            let weekly = self.ledger.weekly(week_id)?;
            vm.weekly_top = ranking::top_n(&weekly, &names, 10);
            vm.my_rank = self.ledger.my_rank(week_id, &self.user_id)?;
        }
        let total = self.ledger.total()?;
        vm.total_top = ranking::top_n(&total, &names, 10);
        Ok(vm)
    }

    // ---- Modo y sesión ----

    pub fn aplicar_modo(&mut self, mode: BackendMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.rebuild_backend();
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn iniciar_sesion(&mut self) {
        if self.login_id.trim().is_empty() || self.login_pw.is_empty() {
            self.login_msg = "Escribe usuario y contraseña.".to_string();
            return;
        }
        let config = crate::ledger::remote::RemoteConfig::resolve();
        match crate::ledger::remote::sign_in(&config, self.login_id.trim(), &self.login_pw) {
            Ok(outcome) if outcome.ok => {
                let user = outcome.user_id.unwrap_or_default();
                self.login_msg = format!("Sesión iniciada: {user}");
                self.user_id = user.clone();
                self.ledger = Box::new(RemoteLedger::new(config, user));
                self.login_pw.clear();
            }
            Ok(outcome) => {
                self.login_msg = outcome
                    .message
                    .unwrap_or_else(|| "No se pudo iniciar sesión.".to_string());
            }
            Err(e) => self.login_msg = format!("⚠ {e}"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn cerrar_sesion(&mut self) {
        let config = crate::ledger::remote::RemoteConfig::resolve();
        if let Err(e) = crate::ledger::remote::sign_out(&config) {
            log::warn!("cierre de sesión remoto fallido: {e}");
        }
        self.user_id.clear();
        self.login_msg = "Sesión cerrada.".to_string();
    }

    // ---- Maquinaria asíncrona web (pendiente + poll) ----

    #[cfg(target_arch = "wasm32")]
    pub fn poll_async(&mut self) {
        self.poll_vocab();
        self.poll_auth();
        self.poll_submit();
        self.poll_ranking();
    }

    #[cfg(target_arch = "wasm32")]
    fn start_remote_submit(&mut self, result: AttemptResult) {
        use crate::ledger::remote;

        let Some(config) = self.remote_config.clone() else {
            self.aplicar_resultado(&result);
            self.registrar_resultado(&result);
            self.avanzar_ronda();
            return;
        };
        let user_id = self.user_id.clone();
        let (tx, rx) = std::sync::mpsc::channel();
        self.pending_submit_rx = Some(rx);
        self.message = "⏳ Enviando...".to_string();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = remote::submit_attempt(&config, &user_id, &result).await;
            let _ = tx.send((result, outcome));
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_submit(&mut self) {
        let received = self
            .pending_submit_rx
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        let Some((result, outcome)) = received else {
            return;
        };
        self.pending_submit_rx = None;

        self.aplicar_resultado(&result);
        if let Err(e) = outcome {
            // decisión de esta capa: el desenlace cae al ledger local
            // para no perderse
            log::warn!("envío remoto fallido, se guarda en local: {e}");
            self.message.push_str(" ⚠ Guardado solo en este dispositivo.");
            self.registrar_resultado(&result);
        }
        self.avanzar_ronda();
    }

    #[cfg(target_arch = "wasm32")]
    fn start_remote_ranking(&mut self, week_id: Option<String>) {
        use crate::ledger::remote;

        let Some(config) = self.remote_config.clone() else {
            return;
        };
        let user_id = self.user_id.clone();
        let (tx, rx) = std::sync::mpsc::channel();
        self.pending_ranking_rx = Some(rx);
        self.ranking.loading = true;
        self.ranking.message = "⏳ Cargando ranking...".to_string();

        wasm_bindgen_futures::spawn_local(async move {
            let bundle = fetch_ranking_bundle(&config, &user_id, week_id).await;
            let _ = tx.send(bundle);
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_ranking(&mut self) {
        let received = self
            .pending_ranking_rx
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        let Some(bundle) = received else {
            return;
        };
        self.pending_ranking_rx = None;
        match bundle {
            Ok(vm) => self.ranking = vm,
            Err(e) => {
                self.ranking.loading = false;
                self.ranking.message = format!("⚠ {e}");
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn start_current_user_probe(&mut self) {
        use crate::ledger::remote;

        let Some(config) = self.remote_config.clone() else {
            return;
        };
        let (tx, rx) = std::sync::mpsc::channel();
        self.pending_auth_rx = Some(rx);
        self.login_msg = "Comprobando sesión...".to_string();

        wasm_bindgen_futures::spawn_local(async move {
            let event = match remote::current_user_id(&config).await {
                Ok(Some(user)) => Ok((Some(user.clone()), format!("Sesión activa: {user}"))),
                Ok(None) => Ok((
                    None,
                    "Inicia sesión para enviar puntuaciones.".to_string(),
                )),
                Err(e) => Err(e),
            };
            let _ = tx.send(event);
        });
    }

    #[cfg(target_arch = "wasm32")]
    pub fn iniciar_sesion(&mut self) {
        use crate::ledger::remote;

        if self.login_id.trim().is_empty() || self.login_pw.is_empty() {
            self.login_msg = "Escribe usuario y contraseña.".to_string();
            return;
        }
        let Some(config) = self.remote_config.clone() else {
            return;
        };
        let login_id = self.login_id.trim().to_string();
        let password = std::mem::take(&mut self.login_pw);
        let (tx, rx) = std::sync::mpsc::channel();
        self.pending_auth_rx = Some(rx);
        self.login_msg = "⏳ Iniciando sesión...".to_string();

        wasm_bindgen_futures::spawn_local(async move {
            let event = match remote::sign_in(&config, &login_id, &password).await {
                Ok(outcome) if outcome.ok => {
                    let user = outcome.user_id.unwrap_or_default();
                    Ok((Some(user.clone()), format!("Sesión iniciada: {user}")))
                }
                Ok(outcome) => Ok((
                    None,
                    outcome
                        .message
                        .unwrap_or_else(|| "No se pudo iniciar sesión.".to_string()),
                )),
                Err(e) => Err(e),
            };
            let _ = tx.send(event);
        });
    }

    #[cfg(target_arch = "wasm32")]
    pub fn cerrar_sesion(&mut self) {
        use crate::ledger::remote;

        let Some(config) = self.remote_config.clone() else {
            return;
        };
        let (tx, rx) = std::sync::mpsc::channel();
        self.pending_auth_rx = Some(rx);

        wasm_bindgen_futures::spawn_local(async move {
            let event = match remote::sign_out(&config).await {
                Ok(()) => Ok((None, "Sesión cerrada.".to_string())),
                Err(e) => Err(e),
            };
            let _ = tx.send(event);
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_auth(&mut self) {
        let received = self
            .pending_auth_rx
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        let Some(event) = received else {
            return;
        };
        self.pending_auth_rx = None;
        match event {
            Ok((user, message)) => {
                self.user_id = user.unwrap_or_default();
                self.login_msg = message;
            }
            Err(e) => self.login_msg = format!("⚠ {e}"),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn poll_vocab(&mut self) {
        let received = self
            .pending_vocab_rx
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        let Some(outcome) = received else {
            return;
        };
        self.pending_vocab_rx = None;
        match outcome {
            Ok(text) => {
                if let Err(e) = self.pool.load_csv(&text) {
                    log::warn!("se mantiene el vocabulario anterior: {e}");
                }
            }
            Err(e) => log::warn!("carga de vocab.csv omitida: {e}"),
        }
    }
}

/// Descarga del CSV de vocabulario en web (equivalente al fetch con
/// `cache: no-store` de la versión original).
#[cfg(target_arch = "wasm32")]
async fn fetch_vocab_csv() -> Result<String, QuizError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::Response;

    let window = web_sys::window()
        .ok_or_else(|| QuizError::SourceUnavailable("no existe window en WASM".into()))?;

    let response_value = JsFuture::from(window.fetch_with_str("./vocab.csv"))
        .await
        .map_err(|e| QuizError::SourceUnavailable(format!("fetch de vocab.csv falló: {e:?}")))?;
    let response: Response = response_value
        .dyn_into()
        .map_err(|_| QuizError::SourceUnavailable("la respuesta no es un Response".into()))?;

    if !response.ok() {
        return Err(QuizError::SourceUnavailable(format!(
            "vocab.csv devolvió HTTP {}",
            response.status()
        )));
    }

    let text_promise = response
        .text()
        .map_err(|e| QuizError::SourceUnavailable(format!("no se pudo leer el body: {e:?}")))?;
    JsFuture::from(text_promise)
        .await
        .ok()
        .and_then(|v| v.as_string())
        .ok_or_else(|| QuizError::SourceUnavailable("cuerpo de vocab.csv ilegible".into()))
}

/// Monta el modelo de ranking contra el servicio remoto (web).
#[cfg(target_arch = "wasm32")]
async fn fetch_ranking_bundle(
    config: &crate::ledger::RemoteConfig,
    user_id: &str,
    week_id: Option<String>,
) -> Result<RankingVm, LedgerError> {
    use crate::ledger::remote;
    use std::collections::HashMap;

    let weeks = remote::list_weeks(config).await?;
    let weeks = crate::ledger::normalize_week_ids(weeks, week::current_week_id());
    let selected = week_id.or_else(|| weeks.first().cloned());

    let mut names = HashMap::new();
    let mut vm = RankingVm {
        weeks,
        selected_week: selected.clone(),
        ..RankingVm::default()
    };

    if let Some(week_id) = &selected {
        let rows = remote::fetch_weekly_top(config, week_id, remote::FETCH_LIMIT).await?;
        remote::collect_names(&rows, &mut names);
        vm.weekly_top = ranking::top_n(&remote::rows_to_snapshot(&rows), &names, 10);
        vm.my_rank = remote::fetch_my_rank(config, week_id, user_id).await?;
    }

    let rows = remote::fetch_total_top(config, remote::FETCH_LIMIT).await?;
    remote::collect_names(&rows, &mut names);
    vm.total_top = ranking::top_n(&remote::rows_to_snapshot(&rows), &names, 10);
    Ok(vm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LocalLedger, MemoryStore, ScoreLedger};
    use crate::model::ScoreRecord;

    fn test_app() -> QuizApp {
        let mut app = QuizApp::default();
        app.ledger = Box::new(LocalLedger::new(MemoryStore::default()));
        app
    }

    fn answer_of(app: &QuizApp) -> ChoiceLabel {
        app.live.as_ref().expect("pregunta viva").correct
    }

    fn wrong_answer_of(app: &QuizApp) -> ChoiceLabel {
        let correct = answer_of(app);
        ChoiceLabel::ALL
            .into_iter()
            .find(|l| *l != correct)
            .unwrap()
    }

    #[test]
    fn starting_a_game_issues_a_live_question_and_arms_the_clock() {
        let mut app = test_app();
        app.empezar_partida(100.0);

        assert_eq!(app.state, AppState::Quiz);
        assert!(app.live.is_some());
        assert_eq!(app.run.deadline, Some(100.0 + app.config.round_seconds));
    }

    #[test]
    fn correct_answers_accumulate_combo_bonus_in_the_run_score() {
        let mut app = test_app();
        app.empezar_partida(0.0);

        for _ in 0..3 {
            let correct = answer_of(&app);
            app.procesar_respuesta(correct);
        }

        // 10+0, 10+1, 10+2
        assert_eq!(app.run.score, 33);
        assert_eq!(app.run.combo, 3);
        assert_eq!(app.run.correct, 3);

        let wrong = wrong_answer_of(&app);
        app.procesar_respuesta(wrong);
        assert_eq!(app.run.combo, 0);
        assert_eq!(app.run.wrong, 1);
    }

    #[test]
    fn the_ledger_receives_base_points_not_combo_bonus() {
        let mut app = test_app();
        app.empezar_partida(0.0);
        for _ in 0..5 {
            let correct = answer_of(&app);
            app.procesar_respuesta(correct);
        }

        let week = week::current_week_id();
        let weekly = app.ledger.weekly(&week).unwrap();
        assert_eq!(
            weekly[LOCAL_USER_ID],
            ScoreRecord {
                points: 50,
                correct: 5,
                wrong: 0
            }
        );
    }

    #[test]
    fn locked_submissions_are_dropped_not_queued() {
        let mut app = test_app();
        app.empezar_partida(0.0);

        app.answer_lock = true;
        let correct = answer_of(&app);
        app.procesar_respuesta(correct);

        assert_eq!(app.run.correct + app.run.wrong, 0);
        assert!(app.ledger.weekly(&week::current_week_id()).unwrap().is_empty());
    }

    #[test]
    fn attempts_without_a_live_question_never_score() {
        let mut app = test_app();
        app.state = AppState::Quiz;
        app.live = None;

        app.procesar_respuesta(ChoiceLabel::A);
        assert_eq!(app.run.correct + app.run.wrong, 0);
    }

    #[test]
    fn time_expiry_finalizes_the_run_and_archives_it() {
        let mut app = test_app();
        app.empezar_partida(0.0);
        let correct = answer_of(&app);
        app.procesar_respuesta(correct);

        app.tick(app.config.round_seconds + 1.0);
        assert_eq!(app.state, AppState::Result);
        assert!(app.live.is_none());
        assert!(!app.answer_lock);
    }

    #[test]
    fn expiry_while_an_attempt_is_in_flight_lets_it_apply_first() {
        let mut app = test_app();
        app.empezar_partida(0.0);

        // se simula el intento en vuelo en el instante del vencimiento
        app.answer_lock = true;
        app.tick(app.config.round_seconds + 1.0);
        assert!(app.finish_after_pending);
        assert_eq!(app.state, AppState::Quiz);

        // al liberar el vuelo, la partida se cierra
        app.answer_lock = false;
        app.avanzar_ronda();
        assert_eq!(app.state, AppState::Result);
    }

    #[test]
    fn failed_recordings_queue_and_retry_on_the_next_attempt() {
        struct OfflineLedger;
        impl ScoreLedger for OfflineLedger {
            fn apply_attempt(
                &self,
                _user_id: &str,
                _result: &AttemptResult,
            ) -> Result<(), LedgerError> {
                Err(LedgerError::RemoteUnavailable("sin red".into()))
            }
            fn weekly(
                &self,
                _week_id: &str,
            ) -> Result<crate::ranking::ScoreSnapshot, LedgerError> {
                Ok(Default::default())
            }
            fn total(&self) -> Result<crate::ranking::ScoreSnapshot, LedgerError> {
                Ok(Default::default())
            }
            fn week_ids(&self) -> Result<Vec<String>, LedgerError> {
                Ok(vec![])
            }
            fn display_names(
                &self,
            ) -> Result<std::collections::HashMap<String, String>, LedgerError> {
                Ok(Default::default())
            }
        }

        let mut app = test_app();
        app.ledger = Box::new(OfflineLedger);
        app.empezar_partida(0.0);

        let correct = answer_of(&app);
        app.procesar_respuesta(correct);
        assert_eq!(app.pending_retry.len(), 1);

        // vuelve la conexión: el siguiente intento arrastra el pendiente
        app.ledger = Box::new(LocalLedger::new(MemoryStore::default()));
        let correct = answer_of(&app);
        app.procesar_respuesta(correct);
        assert!(app.pending_retry.is_empty());

        let weekly = app.ledger.weekly(&week::current_week_id()).unwrap();
        assert_eq!(weekly[LOCAL_USER_ID].correct, 2);
    }

    #[test]
    fn ranking_view_reflects_the_ledger_and_the_callers_rank() {
        let mut app = test_app();
        app.display_name = "Nora".to_string();
        app.empezar_partida(0.0);
        for _ in 0..2 {
            let correct = answer_of(&app);
            app.procesar_respuesta(correct);
        }

        app.abrir_ranking();
        assert_eq!(app.state, AppState::Ranking);
        assert_eq!(app.ranking.weekly_top.len(), 1);
        let me = app.ranking.my_rank.as_ref().expect("mi fila");
        assert_eq!(me.rank, 1);
        assert_eq!(me.display_name, "Nora");
        assert_eq!(me.points, 20);
        assert!(app.ranking.weeks.contains(&week::current_week_id()));
    }

    #[test]
    fn abandoning_a_game_discards_the_live_question() {
        let mut app = test_app();
        app.empezar_partida(0.0);
        app.abandonar_partida();

        assert_eq!(app.state, AppState::Welcome);
        assert!(app.live.is_none());
        assert!(app.run.deadline.is_none());
    }
}

use serde::{Deserialize, Serialize};

use crate::ledger::{LocalLedger, ScoreLedger};
use crate::model::{AppState, AttemptResult, GameConfig};
use crate::pool::VocabularyPool;
use crate::selector::{IssuedQuestion, SelectionHistory};

#[cfg(not(target_arch = "wasm32"))]
use crate::ledger::{FileStore, RemoteLedger, remote};
#[cfg(target_arch = "wasm32")]
use crate::ledger::{RemoteConfig, WebStorageStore};

// Submódulos
pub mod actions;
pub mod view_models;

pub use view_models::RankingVm;

#[cfg(target_arch = "wasm32")]
use std::sync::mpsc::Receiver;

#[cfg(target_arch = "wasm32")]
use crate::error::{LedgerError, QuizError};

/// Identidad fija del modo sin conexión.
pub const LOCAL_USER_ID: &str = "local-me";

/// Backend de puntuación: se elige una vez al arrancar la sesión y el
/// resto del código solo ve la interfaz del ledger.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum BackendMode {
    Local,
    Remote,
}

/// Marcador de la partida en curso (una ronda cronometrada).
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RunState {
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub correct: u32,
    pub wrong: u32,
    pub time_left: f64,
    /// Instante (reloj de la UI) en que acaba la ronda.
    pub deadline: Option<f64>,
}

fn default_ledger() -> Box<dyn ScoreLedger> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(LocalLedger::new(FileStore::new(".")))
    }
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalLedger::new(WebStorageStore))
    }
}

#[derive(Serialize, Deserialize)]
pub struct QuizApp {
    pub config: GameConfig,
    pub mode: BackendMode,
    pub level_filter: Option<u32>,
    pub display_name: String,

    #[serde(skip)]
    pub pool: VocabularyPool,
    #[serde(skip)]
    pub history: SelectionHistory,
    #[serde(skip, default = "default_ledger")]
    pub(crate) ledger: Box<dyn ScoreLedger>,
    #[serde(skip)]
    pub user_id: String,
    #[serde(skip)]
    pub state: AppState,
    #[serde(skip)]
    pub run: RunState,
    /// Pregunta en curso con su clave de verificación. Exactamente una
    /// viva por sesión; la siguiente emisión la sustituye.
    #[serde(skip)]
    pub(crate) live: Option<IssuedQuestion>,
    #[serde(skip)]
    pub message: String,
    /// Candado de reentrada: mientras un intento se verifica y
    /// registra, cualquier otro toque se descarta (ni cola ni proceso).
    #[serde(skip)]
    pub(crate) answer_lock: bool,
    #[serde(skip)]
    pub(crate) question_seq: u64,
    /// El tiempo se agotó con un envío en vuelo: se deja aplicar el
    /// intento y después se cierra la partida.
    #[serde(skip)]
    pub(crate) finish_after_pending: bool,
    /// Desenlaces que no llegaron al backend; se reintentan con el
    /// siguiente intento para no perder nada.
    #[serde(skip)]
    pub(crate) pending_retry: Vec<AttemptResult>,
    #[serde(skip)]
    pub ranking: RankingVm,

    #[serde(skip)]
    pub login_id: String,
    #[serde(skip)]
    pub login_pw: String,
    #[serde(skip)]
    pub login_msg: String,

    // Canales de resultados asíncronos en web (pendiente + poll)
    #[cfg(target_arch = "wasm32")]
    #[serde(skip)]
    pub(crate) remote_config: Option<RemoteConfig>,
    #[cfg(target_arch = "wasm32")]
    #[serde(skip)]
    pub(crate) pending_submit_rx: Option<Receiver<(AttemptResult, Result<(), LedgerError>)>>,
    #[cfg(target_arch = "wasm32")]
    #[serde(skip)]
    pub(crate) pending_ranking_rx: Option<Receiver<Result<RankingVm, LedgerError>>>,
    #[cfg(target_arch = "wasm32")]
    #[serde(skip)]
    pub(crate) pending_auth_rx: Option<Receiver<Result<(Option<String>, String), LedgerError>>>,
    #[cfg(target_arch = "wasm32")]
    #[serde(skip)]
    pub(crate) pending_vocab_rx: Option<Receiver<Result<String, QuizError>>>,
}

impl Default for QuizApp {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            mode: BackendMode::Local,
            level_filter: None,
            display_name: "Tú".to_string(),
            pool: VocabularyPool::default(),
            history: SelectionHistory::default(),
            ledger: default_ledger(),
            user_id: LOCAL_USER_ID.to_string(),
            state: AppState::default(),
            run: RunState::default(),
            live: None,
            message: String::new(),
            answer_lock: false,
            question_seq: 0,
            finish_after_pending: false,
            pending_retry: Vec::new(),
            ranking: RankingVm::default(),
            login_id: String::new(),
            login_pw: String::new(),
            login_msg: String::new(),
            #[cfg(target_arch = "wasm32")]
            remote_config: None,
            #[cfg(target_arch = "wasm32")]
            pending_submit_rx: None,
            #[cfg(target_arch = "wasm32")]
            pending_ranking_rx: None,
            #[cfg(target_arch = "wasm32")]
            pending_auth_rx: None,
            #[cfg(target_arch = "wasm32")]
            pending_vocab_rx: None,
        }
    }
}

impl QuizApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: QuizApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.init_runtime();
        app
    }

    /// Lo que no se persiste (pool, ledger, sesión remota) se
    /// reconstruye según el modo guardado.
    pub(crate) fn init_runtime(&mut self) {
        self.load_vocabulary();
        self.rebuild_backend();
    }

    pub fn is_answer_locked(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        if self.pending_submit_rx.is_some() {
            return true;
        }
        self.answer_lock
    }

    pub fn live_question(&self) -> Option<&crate::model::Question> {
        self.live.as_ref().map(|issued| &issued.question)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn has_pending(&self) -> bool {
        self.pending_submit_rx.is_some()
            || self.pending_ranking_rx.is_some()
            || self.pending_auth_rx.is_some()
            || self.pending_vocab_rx.is_some()
    }

    pub fn can_start(&self) -> bool {
        !(self.mode == BackendMode::Remote && self.user_id.is_empty())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn rebuild_backend(&mut self) {
        match self.mode {
            BackendMode::Local => self.use_local_backend(),
            BackendMode::Remote => {
                let config = remote::RemoteConfig::resolve();
                match remote::current_user_id(&config) {
                    Ok(Some(user)) => {
                        self.login_msg = format!("Sesión activa: {user}");
                        self.user_id = user.clone();
                        self.ledger = Box::new(RemoteLedger::new(config, user));
                    }
                    Ok(None) => {
                        self.login_msg = "Inicia sesión para enviar puntuaciones.".to_string();
                        self.user_id.clear();
                        self.ledger = Box::new(RemoteLedger::new(config, String::new()));
                    }
                    Err(e) => {
                        // la capa llamadora decide: aquí se cae a local
                        log::warn!("backend remoto no disponible: {e}");
                        self.message = "⚠ Servicio remoto no disponible: modo local.".to_string();
                        self.mode = BackendMode::Local;
                        self.use_local_backend();
                    }
                }
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn rebuild_backend(&mut self) {
        match self.mode {
            BackendMode::Local => {
                self.remote_config = None;
                self.use_local_backend();
            }
            BackendMode::Remote => {
                self.remote_config = Some(RemoteConfig::resolve());
                self.user_id.clear();
                // el ledger local queda de respaldo: historial de
                // partidas y desenlaces que no lleguen al servicio
                self.ledger = default_ledger();
                self.start_current_user_probe();
            }
        }
    }

    fn use_local_backend(&mut self) {
        self.user_id = LOCAL_USER_ID.to_string();
        let ledger = default_ledger();
        if let Err(e) = ledger.register_display_name(LOCAL_USER_ID, &self.display_name) {
            log::warn!("no se pudo registrar el apodo: {e}");
        }
        self.ledger = ledger;
        self.login_msg.clear();
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::model::{AttemptResult, ScoreRecord};
use crate::ranking::ScoreSnapshot;
use crate::week;

use super::{GameRun, ScoreLedger, normalize_week_ids};

const SCORES_KEY: &str = "vocab_quiz_scores_v1";
const RUNS_KEY: &str = "vocab_quiz_runs_v1";

/// Historial de partidas acotado para que el almacén no crezca sin fin.
const MAX_RUNS: usize = 200;

/// Almacén clave-valor del dispositivo: fichero en nativo, localStorage
/// en web, memoria en tests. Durabilidad de mejor esfuerzo; escribir
/// puede fallar (cuota) y eso no debe tumbar nada.
pub trait ScoreStore: Send {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;
}

/// Almacén en memoria, clonable para poder "reabrirlo" en tests.
#[derive(Clone, Default)]
pub struct MemoryStore(Arc<Mutex<HashMap<String, Vec<u8>>>>);

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.0.lock().expect("memory store envenenado").get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.0
            .lock()
            .expect("memory store envenenado")
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Un fichero JSON por clave, junto al ejecutable.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    base: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(base: impl Into<std::path::PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        std::fs::read(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        std::fs::write(self.path_for(key), value)
            .map_err(|e| LedgerError::PersistenceWriteFailed(e.to_string()))
    }
}

/// localStorage del navegador.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct WebStorageStore;

#[cfg(target_arch = "wasm32")]
impl ScoreStore for WebStorageStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage
            .get_item(key)
            .ok()
            .flatten()
            .map(|s| s.into_bytes())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| {
                LedgerError::PersistenceWriteFailed("localStorage no disponible".into())
            })?;
        let text = String::from_utf8_lossy(value);
        storage
            .set_item(key, &text)
            .map_err(|e| LedgerError::PersistenceWriteFailed(format!("{e:?}")))
    }
}

/// Forma persistida de los agregados:
/// usuarios, semanal (semana -> usuario -> registro) y total.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct LedgerDb {
    users: HashMap<String, String>,
    weekly: IndexMap<String, ScoreSnapshot>,
    total: ScoreSnapshot,
}

struct Inner {
    db: LedgerDb,
    runs: Vec<GameRun>,
    store: Box<dyn ScoreStore>,
}

/// Ledger local: agregados en memoria como autoridad de la sesión,
/// persistidos en cada aplicación de intento con mejor esfuerzo. El
/// mutex hace atómico el par semanal+total también cuando varias
/// sesiones (usuarios distintos) comparten el mismo ledger.
pub struct LocalLedger {
    inner: Mutex<Inner>,
}

impl LocalLedger {
    pub fn new(store: impl ScoreStore + 'static) -> Self {
        Self::with_boxed_store(Box::new(store))
    }

    pub fn with_boxed_store(store: Box<dyn ScoreStore>) -> Self {
        let db = match store.get(SCORES_KEY) {
            Some(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!("puntuaciones guardadas ilegibles, se parte de cero: {e}");
                LedgerDb::default()
            }),
            None => LedgerDb::default(),
        };
        let runs = match store.get(RUNS_KEY) {
            Some(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!("historial de partidas ilegible, se parte de cero: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self {
            inner: Mutex::new(Inner { db, runs, store }),
        }
    }

    /// Persiste agregados. Un fallo se registra y se traga: la memoria
    /// sigue siendo la autoridad de la sesión, sin rollback.
    fn persist_scores(inner: &mut Inner) {
        let bytes = match serde_json::to_vec(&inner.db) {
            Ok(b) => b,
            Err(e) => {
                log::error!("no se pudieron serializar las puntuaciones: {e}");
                return;
            }
        };
        if let Err(e) = inner.store.set(SCORES_KEY, &bytes) {
            log::error!("{e}");
        }
    }

    fn persist_runs(inner: &mut Inner) {
        let bytes = match serde_json::to_vec(&inner.runs) {
            Ok(b) => b,
            Err(e) => {
                log::error!("no se pudo serializar el historial de partidas: {e}");
                return;
            }
        };
        if let Err(e) = inner.store.set(RUNS_KEY, &bytes) {
            log::error!("{e}");
        }
    }

    pub fn runs(&self) -> Vec<GameRun> {
        self.inner.lock().expect("ledger envenenado").runs.clone()
    }
}

impl ScoreLedger for LocalLedger {
    fn apply_attempt(&self, user_id: &str, result: &AttemptResult) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().expect("ledger envenenado");

        inner
            .db
            .users
            .entry(user_id.to_string())
            .or_insert_with(|| format!("user-{user_id}"));

        inner
            .db
            .weekly
            .entry(result.week_id.clone())
            .or_default()
            .entry(user_id.to_string())
            .or_insert_with(ScoreRecord::default)
            .apply(result);

        inner
            .db
            .total
            .entry(user_id.to_string())
            .or_insert_with(ScoreRecord::default)
            .apply(result);

        Self::persist_scores(&mut inner);
        Ok(())
    }

    fn weekly(&self, week_id: &str) -> Result<ScoreSnapshot, LedgerError> {
        let inner = self.inner.lock().expect("ledger envenenado");
        Ok(inner.db.weekly.get(week_id).cloned().unwrap_or_default())
    }

    fn total(&self) -> Result<ScoreSnapshot, LedgerError> {
        let inner = self.inner.lock().expect("ledger envenenado");
        Ok(inner.db.total.clone())
    }

    fn week_ids(&self) -> Result<Vec<String>, LedgerError> {
        let inner = self.inner.lock().expect("ledger envenenado");
        let weeks = inner.db.weekly.keys().cloned().collect();
        Ok(normalize_week_ids(weeks, week::current_week_id()))
    }

    fn display_names(&self) -> Result<HashMap<String, String>, LedgerError> {
        let inner = self.inner.lock().expect("ledger envenenado");
        Ok(inner.db.users.clone())
    }

    fn register_display_name(&self, user_id: &str, name: &str) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().expect("ledger envenenado");
        inner
            .db
            .users
            .insert(user_id.to_string(), name.to_string());
        Self::persist_scores(&mut inner);
        Ok(())
    }

    fn record_run(&self, run: &GameRun) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().expect("ledger envenenado");
        inner.runs.push(run.clone());
        while inner.runs.len() > MAX_RUNS {
            inner.runs.remove(0);
        }
        Self::persist_runs(&mut inner);
        Ok(())
    }
}

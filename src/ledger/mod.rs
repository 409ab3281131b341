use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::model::AttemptResult;
use crate::ranking::ScoreSnapshot;

pub mod local;
pub mod remote;

pub use local::{LocalLedger, MemoryStore, ScoreStore};
#[cfg(not(target_arch = "wasm32"))]
pub use local::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::WebStorageStore;
#[cfg(not(target_arch = "wasm32"))]
pub use remote::RemoteLedger;
pub use remote::RemoteConfig;

/// Resumen de una partida terminada, para el historial local acotado.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GameRun {
    pub day: String,
    pub week_id: String,
    pub score: u32,
    pub correct: u32,
    pub wrong: u32,
    pub max_combo: u32,
}

/// Almacén de agregados de puntuación, local o remoto tras la misma
/// interfaz: el backend se elige una vez al arrancar la sesión y los
/// llamadores no vuelven a distinguirlo.
///
/// `apply_attempt` representa exactamente un intento real; el llamador
/// garantiza como-mucho-una invocación por intento (el candado de
/// reentrada de la sesión). Los agregados semanal y total del usuario
/// se actualizan juntos, sin estado intermedio observable.
pub trait ScoreLedger {
    fn apply_attempt(&self, user_id: &str, result: &AttemptResult) -> Result<(), LedgerError>;

    /// Agregados por usuario de una semana concreta.
    fn weekly(&self, week_id: &str) -> Result<ScoreSnapshot, LedgerError>;

    /// Agregados por usuario de todos los tiempos.
    fn total(&self) -> Result<ScoreSnapshot, LedgerError>;

    /// Semanas con datos, la más reciente primero. La semana en curso
    /// aparece siempre, haya datos o no.
    fn week_ids(&self) -> Result<Vec<String>, LedgerError>;

    /// Apodos conocidos para pintar filas de ranking.
    fn display_names(&self) -> Result<HashMap<String, String>, LedgerError>;

    /// Posición del usuario en una semana, o `None` sin datos. El
    /// backend remoto lo resuelve en el servicio; por defecto se
    /// deriva de la instantánea semanal.
    fn my_rank(
        &self,
        week_id: &str,
        user_id: &str,
    ) -> Result<Option<crate::model::RankingRow>, LedgerError> {
        let weekly = self.weekly(week_id)?;
        let names = self.display_names()?;
        Ok(crate::ranking::rank_of(&weekly, &names, user_id))
    }

    /// Registra un apodo. Los backends cuyo servicio ya es dueño de los
    /// nombres pueden ignorarlo.
    fn register_display_name(&self, _user_id: &str, _name: &str) -> Result<(), LedgerError> {
        Ok(())
    }

    /// Archiva el resumen de una partida terminada (mejor esfuerzo).
    fn record_run(&self, _run: &GameRun) -> Result<(), LedgerError> {
        Ok(())
    }
}

/// Ordena identificadores de semana en descendente, quita duplicados y
/// garantiza que la semana en curso está presente.
pub(crate) fn normalize_week_ids(mut weeks: Vec<String>, current: String) -> Vec<String> {
    if !weeks.contains(&current) {
        weeks.push(current);
    }
    weeks.sort();
    weeks.dedup();
    weeks.reverse();
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_inserts_current_week_and_sorts_descending() {
        let weeks = normalize_week_ids(
            vec!["2026-W03".into(), "2026-W05".into(), "2026-W03".into()],
            "2026-W06".into(),
        );
        assert_eq!(weeks, vec!["2026-W06", "2026-W05", "2026-W03"]);
    }

    #[test]
    fn normalize_on_empty_input_yields_only_current_week() {
        let weeks = normalize_week_ids(vec![], "2026-W06".into());
        assert_eq!(weeks, vec!["2026-W06"]);
    }
}

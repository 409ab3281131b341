use thiserror::Error;

/// Fallos de la capa de juego (carga de vocabulario, emisión de
/// preguntas, verificación).
#[derive(Debug, Error)]
pub enum QuizError {
    /// La fuente de vocabulario no se pudo usar. Se recupera en el pool
    /// (se conserva el anterior) y nunca tumba la partida.
    #[error("fuente de vocabulario no disponible: {0}")]
    SourceUnavailable(String),

    /// Menos de 4 palabras utilizables: imposible montar 4 opciones.
    /// Esto sí se propaga al llamador.
    #[error("vocabulario insuficiente: hacen falta {min} palabras y hay {got}")]
    PoolTooSmall { min: usize, got: usize },

    /// Llegó un intento sin pregunta en curso. Se rechaza sin puntuar.
    #[error("no hay pregunta en curso")]
    NoLiveQuestion,
}

/// Fallos de la capa de puntuación.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Operación remota fallida. El llamador decide: reintentar, caer a
    /// local o mostrar el error.
    #[error("servicio remoto no disponible: {0}")]
    RemoteUnavailable(String),

    /// Escritura local fallida (p. ej. cuota llena). Se registra y se
    /// sigue: la memoria manda durante la sesión.
    #[error("no se pudo persistir la puntuación: {0}")]
    PersistenceWriteFailed(String),
}

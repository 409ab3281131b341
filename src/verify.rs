use chrono::{DateTime, Utc};

use crate::error::QuizError;
use crate::model::{AttemptResult, ChoiceLabel, GameConfig};
use crate::week;

/// Verificación pura de un intento contra la clave de la pregunta en
/// curso. Sin efectos: registrar el resultado es un paso aparte, así
/// que esto se prueba sin tocar almacenamiento.
///
/// `expected == None` significa que no hay pregunta en curso: se
/// rechaza el intento (cerrado en fallo, jamás se puntúa).
pub fn verify(
    submitted: ChoiceLabel,
    expected: Option<ChoiceLabel>,
    config: &GameConfig,
    now: DateTime<Utc>,
) -> Result<AttemptResult, QuizError> {
    let expected = expected.ok_or(QuizError::NoLiveQuestion)?;
    let is_correct = submitted == expected;
    Ok(AttemptResult {
        is_correct,
        // la semana se sella en el momento de verificar, no al emitir
        week_id: week::week_id_of(now),
        points: if is_correct { config.base_points } else { 0 },
    })
}

// src/data.rs

use crate::error::QuizError;
use crate::model::VocabularyItem;

/// Conjunto mínimo embebido: garantiza que el juego arranca aunque la
/// fuente externa no exista o llegue rota.
pub fn fallback_vocab() -> Vec<VocabularyItem> {
    let file_content = include_str!("data/vocab_fallback.yaml");
    serde_yaml::from_str(file_content).expect("No se pudo parsear el vocabulario embebido YAML")
}

/// Parsea la fuente tabular de vocabulario: columnas por nombre de
/// cabecera `word,meaning,level` (`level` opcional, por defecto 1),
/// campos recortados, líneas en blanco ignoradas. Las filas sin `word`
/// o sin `meaning` se descartan, no se sustituyen.
pub fn parse_vocab_csv(text: &str) -> Result<Vec<VocabularyItem>, QuizError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| QuizError::SourceUnavailable(format!("cabecera CSV ilegible: {e}")))?
        .clone();

    let idx_word = headers.iter().position(|h| h == "word");
    let idx_meaning = headers.iter().position(|h| h == "meaning");
    let idx_level = headers.iter().position(|h| h == "level");

    let (Some(idx_word), Some(idx_meaning)) = (idx_word, idx_meaning) else {
        return Err(QuizError::SourceUnavailable(
            "la cabecera CSV necesita word,meaning (ej: word,meaning,level)".into(),
        ));
    };

    let mut out = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("fila CSV ilegible, se descarta: {e}");
                continue;
            }
        };

        let word = record.get(idx_word).unwrap_or("").trim();
        let meaning = record.get(idx_meaning).unwrap_or("").trim();
        if word.is_empty() || meaning.is_empty() {
            continue;
        }

        // level por defecto 1, también si no es numérico
        let level = idx_level
            .and_then(|i| record.get(i))
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(1);

        out.push(VocabularyItem {
            word: word.to_string(),
            meaning: meaning.to_string(),
            level,
        });
    }

    Ok(out)
}

/// Lee `vocab.csv` junto al ejecutable (la variante nativa del fetch
/// que hace la versión web).
#[cfg(not(target_arch = "wasm32"))]
pub fn read_vocab_file(path: &str) -> Result<String, QuizError> {
    std::fs::read_to_string(path)
        .map_err(|e| QuizError::SourceUnavailable(format!("no se pudo leer {path}: {e}")))
}

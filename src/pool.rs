use serde::{Deserialize, Serialize};

use crate::data::{fallback_vocab, parse_vocab_csv};
use crate::error::QuizError;
use crate::model::VocabularyItem;

/// Mínimo de entradas para poder montar una pregunta de 4 opciones.
pub const MIN_POOL_SIZE: usize = 4;

/// Pool de vocabulario de la sesión. El reemplazo es todo-o-nada: una
/// carga que no llegue al mínimo deja el pool anterior intacto.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VocabularyPool {
    items: Vec<VocabularyItem>,
}

impl Default for VocabularyPool {
    fn default() -> Self {
        Self {
            items: fallback_vocab(),
        }
    }
}

impl VocabularyPool {
    pub fn items(&self) -> &[VocabularyItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Intenta sustituir el pool por la lista entrante. Solo se acepta
    /// con al menos `MIN_POOL_SIZE` filas válidas; si no, se conserva
    /// el pool actual sin mezclar nada.
    pub fn replace(&mut self, incoming: Vec<VocabularyItem>) -> bool {
        if incoming.len() < MIN_POOL_SIZE {
            log::warn!(
                "vocabulario entrante demasiado pequeño ({} < {}), se conserva el actual",
                incoming.len(),
                MIN_POOL_SIZE
            );
            return false;
        }
        log::info!("vocabulario cargado: {} entradas", incoming.len());
        self.items = incoming;
        true
    }

    /// Carga desde el texto CSV de la fuente externa. Cualquier fallo
    /// (parseo, pocas filas) deja el pool como estaba y se devuelve
    /// tipado para que el llamador decida si lo registra.
    pub fn load_csv(&mut self, text: &str) -> Result<usize, QuizError> {
        let rows = parse_vocab_csv(text)?;
        let n = rows.len();
        if !self.replace(rows) {
            return Err(QuizError::SourceUnavailable(format!(
                "solo {n} filas válidas (mínimo {MIN_POOL_SIZE})"
            )));
        }
        Ok(n)
    }

    /// Candidatos para jugar con un filtro de nivel opcional. Si el
    /// filtro deja menos del mínimo, se vuelve al pool completo (igual
    /// que hacía la selección por nivel original).
    pub fn candidates_for_level(&self, level: Option<u32>) -> Vec<&VocabularyItem> {
        if let Some(level) = level {
            let filtered: Vec<&VocabularyItem> =
                self.items.iter().filter(|v| v.level == level).collect();
            if filtered.len() >= MIN_POOL_SIZE {
                return filtered;
            }
        }
        self.items.iter().collect()
    }

    /// Niveles presentes, ordenados, para el selector de la UI.
    pub fn levels(&self) -> Vec<u32> {
        let mut levels: Vec<u32> = self.items.iter().map(|v| v.level).collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(word: &str, meaning: &str, level: u32) -> VocabularyItem {
        VocabularyItem {
            word: word.into(),
            meaning: meaning.into(),
            level,
        }
    }

    #[test]
    fn starts_with_the_fallback_set() {
        let pool = VocabularyPool::default();
        assert_eq!(pool.len(), MIN_POOL_SIZE);
    }

    #[test]
    fn too_small_source_keeps_previous_pool_unchanged() {
        let mut pool = VocabularyPool::default();
        let before = pool.items().to_vec();

        // 3 filas válidas: por debajo del mínimo
        let csv = "word,meaning\nuno,primero\ndos,segundo\ntres,tercero\n";
        assert!(pool.load_csv(csv).is_err());
        assert_eq!(pool.items(), &before[..]);
    }

    #[test]
    fn broken_source_keeps_previous_pool_unchanged() {
        let mut pool = VocabularyPool::default();
        let before = pool.items().to_vec();

        assert!(pool.load_csv("sin,cabecera,valida\n1,2,3\n").is_err());
        assert_eq!(pool.items(), &before[..]);
    }

    #[test]
    fn valid_source_replaces_wholesale_not_merges() {
        let mut pool = VocabularyPool::default();
        let csv = "word,meaning,level\na,aa,1\nb,bb,1\nc,cc,2\nd,dd,2\ne,ee,3\n";
        assert_eq!(pool.load_csv(csv).unwrap(), 5);
        assert_eq!(pool.len(), 5);
        assert!(pool.items().iter().all(|v| v.word.len() == 1));
    }

    #[test]
    fn level_filter_falls_back_to_full_pool_when_starved() {
        let mut pool = VocabularyPool::default();
        pool.replace(vec![
            item("a", "aa", 1),
            item("b", "bb", 1),
            item("c", "cc", 1),
            item("d", "dd", 1),
            item("e", "ee", 2),
        ]);

        assert_eq!(pool.candidates_for_level(Some(1)).len(), 4);
        // nivel 2 solo tiene 1 palabra: se juega con todo el pool
        assert_eq!(pool.candidates_for_level(Some(2)).len(), 5);
        assert_eq!(pool.candidates_for_level(None).len(), 5);
    }
}

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{ChoiceLabel, GameConfig, Question, VocabularyItem};
use crate::pool::{MIN_POOL_SIZE, VocabularyPool};

/// Historial anti-repetición de la sesión. Sustituye a los globales
/// ambientales de la versión web: viaja explícitamente en cada llamada.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SelectionHistory {
    recent_words: VecDeque<String>,
    recent_labels: VecDeque<ChoiceLabel>,
}

impl SelectionHistory {
    pub fn is_recent_word(&self, word: &str) -> bool {
        self.recent_words.iter().any(|w| w == word)
    }

    fn remember_word(&mut self, word: &str, cap: usize) {
        self.recent_words.push_back(word.to_string());
        while self.recent_words.len() > cap {
            self.recent_words.pop_front();
        }
    }

    fn remember_label(&mut self, label: ChoiceLabel, cap: usize) {
        self.recent_labels.push_back(label);
        while self.recent_labels.len() > cap {
            self.recent_labels.pop_front();
        }
    }

    /// true si la etiqueta correcta cayó en esta misma casilla en TODAS
    /// las últimas `cap` rondas.
    fn label_saturated(&self, label: ChoiceLabel, cap: usize) -> bool {
        self.recent_labels.len() >= cap && self.recent_labels.iter().all(|l| *l == label)
    }

    pub fn recent_words(&self) -> impl Iterator<Item = &str> {
        self.recent_words.iter().map(String::as_str)
    }

    pub fn last_label(&self) -> Option<ChoiceLabel> {
        self.recent_labels.back().copied()
    }
}

/// Pregunta emitida: la parte visible para la UI más la clave de
/// verificación de esta ronda. `degraded` marca el último recurso de
/// distractores repetidos (ver `build_distractors`).
#[derive(Debug, Clone)]
pub struct IssuedQuestion {
    pub question: Question,
    pub correct: ChoiceLabel,
    pub degraded: bool,
}

/// Emite la siguiente pregunta: palabra sin repetir recientes, 3
/// distractores barajados y etiqueta correcta des-sesgada. Nunca falla
/// por el historial; el único error posible es un pool bajo mínimos.
pub fn next_question(
    pool: &VocabularyPool,
    level: Option<u32>,
    history: &mut SelectionHistory,
    config: &GameConfig,
    rng: &mut impl Rng,
    sequence: u64,
) -> Result<IssuedQuestion, QuizError> {
    let candidates = pool.candidates_for_level(level);
    if candidates.len() < MIN_POOL_SIZE {
        return Err(QuizError::PoolTooSmall {
            min: MIN_POOL_SIZE,
            got: candidates.len(),
        });
    }

    // 1) Palabra: evitar las recientes; si el filtro vacía los
    //    candidatos, se vuelve al pool sin filtrar (nunca dejamos de
    //    emitir pregunta).
    let fresh: Vec<&VocabularyItem> = candidates
        .iter()
        .copied()
        .filter(|v| !history.is_recent_word(&v.word))
        .collect();
    let chosen = if fresh.is_empty() {
        candidates
            .choose(rng)
            .copied()
            .ok_or(QuizError::PoolTooSmall {
                min: MIN_POOL_SIZE,
                got: 0,
            })?
    } else {
        fresh
            .choose(rng)
            .copied()
            .ok_or(QuizError::PoolTooSmall {
                min: MIN_POOL_SIZE,
                got: 0,
            })?
    };
    history.remember_word(&chosen.word, config.recent_words_cap);

    // 2) Distractores
    let (distractors, degraded) = build_distractors(&candidates, chosen, rng);

    // 3) Permutación Fisher-Yates + des-sesgo de casilla acotado
    let mut meanings: Vec<String> = Vec::with_capacity(4);
    meanings.push(chosen.meaning.clone());
    meanings.extend(distractors);

    // pool con todas las acepciones idénticas: ni degradando salen 4
    if meanings.len() < 4 {
        return Err(QuizError::PoolTooSmall {
            min: MIN_POOL_SIZE,
            got: meanings.len(),
        });
    }

    let mut correct = ChoiceLabel::A;
    for _ in 0..=config.shuffle_retries {
        meanings.shuffle(rng);
        let position = meanings
            .iter()
            .position(|m| *m == chosen.meaning)
            .unwrap_or(0);
        correct = ChoiceLabel::ALL[position];
        // Reintento acotado: reduce la repetición de casilla, no la
        // garantiza. Agotados los intentos, vale la última baraja.
        if !history.label_saturated(correct, config.recent_labels_cap) {
            break;
        }
    }
    history.remember_label(correct, config.recent_labels_cap);

    let question = Question {
        id: format!("q-{sequence}"),
        word: chosen.word.clone(),
        prompt: "¿Cuál es el significado correcto?".to_string(),
        choice_a: meanings[0].clone(),
        choice_b: meanings[1].clone(),
        choice_c: meanings[2].clone(),
        choice_d: meanings[3].clone(),
    };

    Ok(IssuedQuestion {
        question,
        correct,
        degraded,
    })
}

/// 3 significados de otras palabras, barajados sin reemplazo. Si no hay
/// 3 textos distintos disponibles se permite repetir texto como último
/// recurso y la pregunta queda marcada como degradada.
fn build_distractors(
    candidates: &[&VocabularyItem],
    chosen: &VocabularyItem,
    rng: &mut impl Rng,
) -> (Vec<String>, bool) {
    let mut others: Vec<&VocabularyItem> = candidates
        .iter()
        .copied()
        .filter(|v| v.word != chosen.word)
        .collect();
    others.shuffle(rng);

    let mut picked: Vec<String> = Vec::with_capacity(3);
    for other in &others {
        if picked.len() == 3 {
            break;
        }
        if other.meaning != chosen.meaning && !picked.contains(&other.meaning) {
            picked.push(other.meaning.clone());
        }
    }

    // Último recurso: rellenar repitiendo significados ajenos.
    let mut degraded = false;
    let mut cycle = others
        .iter()
        .filter(|v| v.meaning != chosen.meaning)
        .cycle();
    while picked.len() < 3 {
        match cycle.next() {
            Some(other) => {
                degraded = true;
                picked.push(other.meaning.clone());
            }
            None => break,
        }
    }

    if degraded {
        log::warn!(
            "distractores insuficientes para «{}»: pregunta degradada",
            chosen.word
        );
    }

    (picked, degraded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool_of(pairs: &[(&str, &str)]) -> VocabularyPool {
        let mut pool = VocabularyPool::default();
        pool.replace(
            pairs
                .iter()
                .map(|(w, m)| VocabularyItem {
                    word: (*w).into(),
                    meaning: (*m).into(),
                    level: 1,
                })
                .collect(),
        );
        pool
    }

    fn four_word_pool() -> VocabularyPool {
        pool_of(&[("a", "aa"), ("b", "bb"), ("c", "cc"), ("d", "dd")])
    }

    #[test]
    fn choices_are_distinct_and_contain_exactly_one_correct_meaning() {
        let pool = pool_of(&[
            ("uno", "m-uno"),
            ("dos", "m-dos"),
            ("tres", "m-tres"),
            ("cuatro", "m-cuatro"),
            ("cinco", "m-cinco"),
            ("seis", "m-seis"),
        ]);
        let mut history = SelectionHistory::default();
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for seq in 0..200 {
            let issued = next_question(&pool, None, &mut history, &config, &mut rng, seq).unwrap();
            assert!(!issued.degraded);

            let q = &issued.question;
            let texts = [&q.choice_a, &q.choice_b, &q.choice_c, &q.choice_d];
            for i in 0..4 {
                for j in (i + 1)..4 {
                    assert_ne!(texts[i], texts[j], "opciones repetidas en {:?}", q);
                }
            }

            let expected_meaning = format!("m-{}", q.word);
            let hits = texts.iter().filter(|t| ***t == expected_meaning).count();
            assert_eq!(hits, 1);
            assert_eq!(q.choice(issued.correct), expected_meaning);
        }
    }

    #[test]
    fn recent_words_are_not_repeated_within_the_window() {
        // Escenario: pool de 4 palabras fijas, historial de capacidad 3.
        // Con 3 recientes vetadas solo queda 1 candidata, así que la
        // secuencia recorre las 4 palabras en ciclo: cualquier ventana
        // de 4 emisiones consecutivas contiene 4 palabras distintas (la
        // reutilización llega exactamente en la emisión 5 de cada
        // palabra).
        let pool = four_word_pool();
        let mut history = SelectionHistory::default();
        let config = GameConfig {
            recent_words_cap: 3,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(21);

        let mut words = Vec::new();
        for seq in 0..20 {
            let issued = next_question(&pool, None, &mut history, &config, &mut rng, seq).unwrap();
            words.push(issued.question.word.clone());
        }

        for window in words.windows(4) {
            let mut seen = window.to_vec();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 4, "repetición dentro de la ventana: {window:?}");
        }
    }

    #[test]
    fn starved_word_filter_falls_back_to_full_pool() {
        let pool = four_word_pool();
        let mut history = SelectionHistory::default();
        // capacidad mayor que el pool: tras 4 rondas todas las palabras
        // son "recientes" y aun así se sigue emitiendo pregunta
        let config = GameConfig {
            recent_words_cap: 10,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        for seq in 0..12 {
            next_question(&pool, None, &mut history, &config, &mut rng, seq).unwrap();
        }
    }

    #[test]
    fn exactly_four_items_use_all_three_remaining_distractors() {
        let pool = four_word_pool();
        let mut history = SelectionHistory::default();
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(5);

        let issued = next_question(&pool, None, &mut history, &config, &mut rng, 0).unwrap();
        let q = &issued.question;
        let mut texts = vec![
            q.choice_a.clone(),
            q.choice_b.clone(),
            q.choice_c.clone(),
            q.choice_d.clone(),
        ];
        texts.sort();
        assert_eq!(texts, vec!["aa", "bb", "cc", "dd"]);
        assert!(!issued.degraded);
    }

    #[test]
    fn correct_label_does_not_stick_to_one_slot() {
        // El des-sesgo es probabilístico; con RNG sembrado el test es
        // determinista y una racha de 4 casillas iguales exigiría 10
        // rebarajas consecutivas en la misma posición.
        let pool = pool_of(&[
            ("uno", "m-uno"),
            ("dos", "m-dos"),
            ("tres", "m-tres"),
            ("cuatro", "m-cuatro"),
            ("cinco", "m-cinco"),
        ]);
        let mut history = SelectionHistory::default();
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(11);

        let mut labels = Vec::new();
        for seq in 0..100 {
            let issued = next_question(&pool, None, &mut history, &config, &mut rng, seq).unwrap();
            labels.push(issued.correct);
        }

        assert!(
            !labels
                .windows(4)
                .any(|w| w.iter().all(|l| *l == w[0])),
            "racha de 4 casillas iguales: {labels:?}"
        );
    }

    #[test]
    fn too_small_pool_is_rejected() {
        // `replace` nunca deja el pool bajo mínimos, pero un pool
        // restaurado de un estado persistido corrupto sí puede llegar
        // así: la emisión debe fallar con PoolTooSmall, no romperse.
        let pool: VocabularyPool = serde_json::from_str(
            r#"{"items":[{"word":"a","meaning":"aa"},{"word":"b","meaning":"bb"}]}"#,
        )
        .unwrap();
        let mut history = SelectionHistory::default();
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            next_question(&pool, None, &mut history, &config, &mut rng, 0),
            Err(QuizError::PoolTooSmall { min: 4, got: 2 })
        ));
    }

    #[test]
    fn degraded_questions_repeat_distractor_text_only_as_last_resort() {
        // 4 entradas pero solo 2 significados distintos ajenos a la
        // palabra elegida: hay que repetir texto y marcar la pregunta.
        let pool = pool_of(&[
            ("uno", "m-uno"),
            ("dos", "m-dos"),
            ("tres", "m-dos"),
            ("cuatro", "m-cuatro"),
        ]);
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(13);

        let mut saw_degraded = false;
        for seq in 0..40 {
            let mut history = SelectionHistory::default();
            let issued = next_question(&pool, None, &mut history, &config, &mut rng, seq).unwrap();
            if issued.question.word == "uno" {
                saw_degraded = true;
                assert!(issued.degraded);
            }
        }
        assert!(saw_degraded);
    }
}

use serde::{Deserialize, Serialize};

/// Etiquetas de las cuatro opciones de respuesta.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum ChoiceLabel {
    A,
    B,
    C,
    D,
}

impl ChoiceLabel {
    pub const ALL: [ChoiceLabel; 4] = [
        ChoiceLabel::A,
        ChoiceLabel::B,
        ChoiceLabel::C,
        ChoiceLabel::D,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceLabel::A => "A",
            ChoiceLabel::B => "B",
            ChoiceLabel::C => "C",
            ChoiceLabel::D => "D",
        }
    }
}

fn default_level() -> u32 {
    1
}

/// Una entrada del vocabulario. Inmutable una vez cargada.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VocabularyItem {
    pub word: String,    // Palabra
    pub meaning: String, // Significado
    #[serde(default = "default_level")]
    pub level: u32,
}

/// Pregunta tal y como la ve la UI: la etiqueta correcta NO viaja aquí,
/// se guarda aparte como clave de verificación de la ronda en curso.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Question {
    pub id: String,
    pub word: String,
    pub prompt: String,
    pub choice_a: String,
    pub choice_b: String,
    pub choice_c: String,
    pub choice_d: String,
}

impl Question {
    pub fn choice(&self, label: ChoiceLabel) -> &str {
        match label {
            ChoiceLabel::A => &self.choice_a,
            ChoiceLabel::B => &self.choice_b,
            ChoiceLabel::C => &self.choice_c,
            ChoiceLabel::D => &self.choice_d,
        }
    }
}

/// Resultado de verificar un intento. Se consume en el acto: no se
/// almacena como entidad, solo alimenta al ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AttemptResult {
    pub is_correct: bool,
    pub points: u32,
    pub week_id: String,
}

/// Agregado por (usuario, semana) y por usuario en el total.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreRecord {
    pub points: u32,
    pub correct: u32,
    pub wrong: u32,
}

impl ScoreRecord {
    /// Única operación de mutación: aplicar el resultado de un intento.
    pub fn apply(&mut self, result: &AttemptResult) {
        if result.is_correct {
            self.points += result.points;
            self.correct += 1;
        } else {
            self.wrong += 1;
        }
    }
}

/// Fila derivada para el ranking; nunca se persiste.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    pub user_id: String,
    pub display_name: String,
    pub points: u32,
    pub correct: u32,
    pub wrong: u32,
    pub rank: usize,
}

/// Constantes de juego. La base de puntos es configuración, no cálculo.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameConfig {
    pub base_points: u32,
    pub round_seconds: f64,
    pub recent_words_cap: usize,
    pub recent_labels_cap: usize,
    pub shuffle_retries: usize,
    pub combo_cap: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_points: 10,
            round_seconds: 30.0,
            recent_words_cap: 8,
            recent_labels_cap: 3,
            shuffle_retries: 10,
            combo_cap: 20,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Quiz,
    Result,
    Ranking,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Welcome
    }
}

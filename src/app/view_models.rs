use crate::model::RankingRow;

/// Modelo de la pantalla de ranking: listo para pintar, sin tocar el
/// ledger desde la UI.
#[derive(Clone, Debug, Default)]
pub struct RankingVm {
    pub weeks: Vec<String>,
    pub selected_week: Option<String>,
    pub weekly_top: Vec<RankingRow>,
    pub total_top: Vec<RankingRow>,
    pub my_rank: Option<RankingRow>,
    pub loading: bool,
    pub message: String,
}

impl RankingVm {
    /// `1. Ana — 40 puntos (⭕4 / ❌0)`
    pub fn format_row(row: &RankingRow) -> String {
        format!(
            "{}. {} — {} puntos (⭕{} / ❌{})",
            row.rank, row.display_name, row.points, row.correct, row.wrong
        )
    }
}

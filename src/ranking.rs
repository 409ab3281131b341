use std::collections::HashMap;

use indexmap::IndexMap;

use crate::model::{RankingRow, ScoreRecord};

/// Instantánea de agregados tal como la sirve el ledger. `IndexMap`
/// conserva el orden de inserción, que es el criterio estable de
/// desempate del ranking.
pub type ScoreSnapshot = IndexMap<String, ScoreRecord>;

fn sorted_entries(snapshot: &ScoreSnapshot) -> Vec<(&String, &ScoreRecord)> {
    let mut entries: Vec<(&String, &ScoreRecord)> = snapshot.iter().collect();
    // sort_by es estable: a igualdad de (puntos, aciertos) manda el
    // orden de inserción de la instantánea
    entries.sort_by(|a, b| {
        b.1.points
            .cmp(&a.1.points)
            .then(b.1.correct.cmp(&a.1.correct))
    });
    entries
}

fn row_for(user_id: &str, record: &ScoreRecord, rank: usize, names: &HashMap<String, String>) -> RankingRow {
    RankingRow {
        user_id: user_id.to_string(),
        display_name: names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string()),
        points: record.points,
        correct: record.correct,
        wrong: record.wrong,
        rank,
    }
}

/// Top N por `(puntos desc, aciertos desc)` con rango 1-based.
pub fn top_n(snapshot: &ScoreSnapshot, names: &HashMap<String, String>, n: usize) -> Vec<RankingRow> {
    sorted_entries(snapshot)
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (user_id, record))| row_for(user_id, record, i + 1, names))
        .collect()
}

/// Posición de un usuario en la instantánea, o `None` si todavía no
/// tiene datos (condición normal, no un error).
pub fn rank_of(
    snapshot: &ScoreSnapshot,
    names: &HashMap<String, String>,
    user_id: &str,
) -> Option<RankingRow> {
    sorted_entries(snapshot)
        .into_iter()
        .enumerate()
        .find(|(_, (id, _))| id.as_str() == user_id)
        .map(|(i, (id, record))| row_for(id, record, i + 1, names))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(points: u32, correct: u32, wrong: u32) -> ScoreRecord {
        ScoreRecord {
            points,
            correct,
            wrong,
        }
    }

    fn snapshot() -> ScoreSnapshot {
        let mut snap = ScoreSnapshot::new();
        snap.insert("u1".into(), record(40, 4, 0));
        snap.insert("u2".into(), record(30, 3, 1));
        snap.insert("u3".into(), record(40, 3, 2));
        snap.insert("u4".into(), record(10, 1, 3));
        snap
    }

    #[test]
    fn sorts_by_points_then_correct() {
        let rows = top_n(&snapshot(), &HashMap::new(), 10);
        let ids: Vec<&str> = rows.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3", "u2", "u4"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[3].rank, 4);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut snap = ScoreSnapshot::new();
        snap.insert("primero".into(), record(20, 2, 0));
        snap.insert("segundo".into(), record(20, 2, 5));
        snap.insert("tercero".into(), record(20, 2, 1));

        let rows = top_n(&snap, &HashMap::new(), 10);
        let ids: Vec<&str> = rows.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["primero", "segundo", "tercero"]);
    }

    #[test]
    fn repeated_calls_on_the_same_snapshot_are_identical() {
        let snap = snapshot();
        let names = HashMap::new();
        assert_eq!(top_n(&snap, &names, 3), top_n(&snap, &names, 3));
    }

    #[test]
    fn top_n_truncates() {
        assert_eq!(top_n(&snapshot(), &HashMap::new(), 2).len(), 2);
    }

    #[test]
    fn rank_of_unknown_user_is_none() {
        let snap = snapshot();
        assert!(rank_of(&snap, &HashMap::new(), "fantasma").is_none());
    }

    #[test]
    fn rank_of_finds_position_and_display_name() {
        let snap = snapshot();
        let mut names = HashMap::new();
        names.insert("u2".to_string(), "Ana".to_string());

        let me = rank_of(&snap, &names, "u2").unwrap();
        assert_eq!(me.rank, 3);
        assert_eq!(me.display_name, "Ana");

        // sin apodo registrado se muestra el id tal cual
        let other = rank_of(&snap, &names, "u4").unwrap();
        assert_eq!(other.display_name, "u4");
    }
}

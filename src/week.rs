use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Identificador de semana ISO-8601 con formato `YYYY-Www` (semana de
/// lunes; la semana 01 es la que contiene el primer jueves del año).
/// El año es el del calendario semanal, no el del día: 2025-12-29 cae
/// en `2026-W01`.
pub fn week_id_for_date(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

pub fn week_id_of(when: DateTime<Utc>) -> String {
    week_id_for_date(when.date_naive())
}

/// Semana ISO del instante actual (UTC).
pub fn current_week_id() -> String {
    week_id_of(Utc::now())
}

/// Día actual `YYYY-MM-DD` (UTC), para el historial de partidas.
pub fn current_day_id() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_thursday_of_2026_is_week_01() {
        // 2026-01-01 es jueves
        assert_eq!(week_id_for_date(date(2026, 1, 1)), "2026-W01");
    }

    #[test]
    fn monday_before_new_year_belongs_to_next_iso_year() {
        // 2025-12-29 es el lunes de la semana que contiene el primer
        // jueves de 2026
        assert_eq!(week_id_for_date(date(2025, 12, 29)), "2026-W01");
    }

    #[test]
    fn year_starting_on_thursday_has_53_weeks() {
        // última semana de 2026: lunes 2026-12-28 a domingo 2027-01-03
        assert_eq!(week_id_for_date(date(2026, 12, 28)), "2026-W53");
        assert_eq!(week_id_for_date(date(2027, 1, 3)), "2026-W53");
        assert_eq!(week_id_for_date(date(2027, 1, 4)), "2027-W01");
    }

    #[test]
    fn week_number_is_zero_padded() {
        assert_eq!(week_id_for_date(date(2026, 2, 3)), "2026-W06");
    }
}

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::model::{AttemptResult, RankingRow, ScoreRecord};
use crate::ranking::ScoreSnapshot;

#[cfg(target_arch = "wasm32")]
const DEFAULT_ENDPOINT: &str = "/api";
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_NATIVE_ENDPOINT: &str = "http://127.0.0.1:8787/api";

/// Cuántas filas semanales/totales se piden para montar instantáneas.
pub const FETCH_LIMIT: usize = 100;

/// Dónde vive el servicio remoto de puntuaciones. Se resuelve una vez
/// al arrancar; las operaciones cuelgan de esta URL base con nombre
/// propio: sign-in, sign-out, current-user-id, submit-attempt,
/// list-weeks, fetch-weekly-top, fetch-total-top, fetch-my-rank.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
}

impl RemoteConfig {
    pub fn resolve() -> Self {
        Self {
            base_url: default_endpoint(),
        }
    }

    fn op_url(&self, op: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), op)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_endpoint() -> String {
    std::env::var("VOCAB_QUIZ_API_ENDPOINT")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_NATIVE_ENDPOINT.to_string())
}

#[cfg(target_arch = "wasm32")]
fn default_endpoint() -> String {
    endpoint_from_build_env()
        .or_else(endpoint_from_querystring)
        .or_else(endpoint_from_local_storage)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}

#[cfg(target_arch = "wasm32")]
fn normalize_endpoint(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
fn endpoint_from_build_env() -> Option<String> {
    option_env!("VOCAB_QUIZ_API_ENDPOINT").and_then(normalize_endpoint)
}

#[cfg(target_arch = "wasm32")]
fn endpoint_from_querystring() -> Option<String> {
    let window = web_sys::window()?;
    let search = window.location().search().ok()?;
    let query = search.strip_prefix('?').unwrap_or(search.as_str());

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        if key == "api_endpoint" {
            return normalize_endpoint(value);
        }
    }
    None
}

#[cfg(target_arch = "wasm32")]
fn endpoint_from_local_storage() -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    storage
        .get_item("vocab_quiz_api_endpoint")
        .ok()?
        .as_deref()
        .and_then(normalize_endpoint)
}

// ---- Cuerpos de las operaciones ----

#[derive(Debug, Serialize)]
struct EmptyRequest {}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    login_id: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SignInOutcome {
    pub ok: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentUserResponse {
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubmitAttemptRequest<'a> {
    user_id: &'a str,
    week_id: &'a str,
    is_correct: bool,
    points: u32,
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    #[serde(default)]
    #[allow(dead_code)]
    ok: bool,
}

#[derive(Debug, Serialize)]
struct WeeklyTopRequest<'a> {
    week_id: &'a str,
    limit: usize,
}

#[derive(Debug, Serialize)]
struct TotalTopRequest {
    limit: usize,
}

#[derive(Debug, Serialize)]
struct MyRankRequest<'a> {
    week_id: &'a str,
    user_id: &'a str,
}

/// Fila de puntuación tal como la sirve el servicio.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteScoreRow {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub points: u32,
    pub correct: u32,
    pub wrong: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRankedRow {
    #[serde(flatten)]
    pub row: RemoteScoreRow,
    pub rank: usize,
}

impl RemoteRankedRow {
    pub fn into_ranking_row(self) -> RankingRow {
        let display_name = self
            .row
            .display_name
            .unwrap_or_else(|| self.row.user_id.clone());
        RankingRow {
            user_id: self.row.user_id,
            display_name,
            points: self.row.points,
            correct: self.row.correct,
            wrong: self.row.wrong,
            rank: self.rank,
        }
    }
}

/// Instantánea a partir de las filas remotas: el orden del servidor es
/// el orden de inserción, así que el desempate del ranking coincide en
/// ambos backends.
pub fn rows_to_snapshot(rows: &[RemoteScoreRow]) -> ScoreSnapshot {
    rows.iter()
        .map(|r| {
            (
                r.user_id.clone(),
                ScoreRecord {
                    points: r.points,
                    correct: r.correct,
                    wrong: r.wrong,
                },
            )
        })
        .collect()
}

pub fn collect_names(rows: &[RemoteScoreRow], names: &mut HashMap<String, String>) {
    for row in rows {
        if let Some(name) = &row.display_name {
            names.insert(row.user_id.clone(), name.clone());
        }
    }
}

// ---- Transporte nativo (bloqueante) ----

#[cfg(not(target_arch = "wasm32"))]
fn post_json<T: Serialize, R: DeserializeOwned>(
    config: &RemoteConfig,
    op: &str,
    payload: &T,
) -> Result<R, LedgerError> {
    let url = config.op_url(op);
    let client = reqwest::blocking::Client::new();

    let response = client.post(&url).json(payload).send().map_err(|e| {
        LedgerError::RemoteUnavailable(format!("error conectando con el servicio: {e}"))
    })?;

    if !response.status().is_success() {
        return Err(LedgerError::RemoteUnavailable(format!(
            "el servicio devolvió HTTP {} en {url}",
            response.status()
        )));
    }

    response
        .json::<R>()
        .map_err(|e| LedgerError::RemoteUnavailable(format!("respuesta JSON inválida: {e}")))
}

// ---- Transporte web (fetch) ----

#[cfg(target_arch = "wasm32")]
async fn post_json<T: Serialize, R: DeserializeOwned>(
    config: &RemoteConfig,
    op: &str,
    payload: &T,
) -> Result<R, LedgerError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let url = config.op_url(op);
    let payload_json = serde_json::to_string(payload).map_err(|e| {
        LedgerError::RemoteUnavailable(format!("no se pudo serializar el payload: {e}"))
    })?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&payload_json));

    let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| {
        LedgerError::RemoteUnavailable(format!("no se pudo crear el request: {e:?}"))
    })?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| {
            LedgerError::RemoteUnavailable(format!("no se pudieron fijar headers: {e:?}"))
        })?;

    let window = web_sys::window()
        .ok_or_else(|| LedgerError::RemoteUnavailable("no existe window en WASM".into()))?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| LedgerError::RemoteUnavailable(format!("fetch falló: {e:?}")))?;

    let response: Response = response_value
        .dyn_into()
        .map_err(|_| LedgerError::RemoteUnavailable("la respuesta no es un Response".into()))?;

    let text_promise = response
        .text()
        .map_err(|e| LedgerError::RemoteUnavailable(format!("no se pudo leer el body: {e:?}")))?;
    let text = JsFuture::from(text_promise)
        .await
        .ok()
        .and_then(|v| v.as_string())
        .ok_or_else(|| LedgerError::RemoteUnavailable("body de respuesta ilegible".into()))?;

    if !response.ok() {
        return Err(LedgerError::RemoteUnavailable(format!(
            "el servicio devolvió HTTP {} en {url}",
            response.status()
        )));
    }

    serde_json::from_str::<R>(&text)
        .map_err(|e| LedgerError::RemoteUnavailable(format!("respuesta JSON inválida: {e}")))
}

// ---- Operaciones con nombre ----
//
// En nativo son bloqueantes; en web son async y la sesión las encadena
// con su maquinaria de pendientes (el candado de reentrada cubre la
// espera). Mismo contrato en ambos casos.

#[cfg(not(target_arch = "wasm32"))]
mod ops {
    use super::*;

    pub fn sign_in(
        config: &RemoteConfig,
        login_id: &str,
        password: &str,
    ) -> Result<SignInOutcome, LedgerError> {
        post_json(config, "sign-in", &SignInRequest { login_id, password })
    }

    pub fn sign_out(config: &RemoteConfig) -> Result<(), LedgerError> {
        let _ack: AckResponse = post_json(config, "sign-out", &EmptyRequest {})?;
        Ok(())
    }

    pub fn current_user_id(config: &RemoteConfig) -> Result<Option<String>, LedgerError> {
        let response: CurrentUserResponse =
            post_json(config, "current-user-id", &EmptyRequest {})?;
        Ok(response.user_id)
    }

    pub fn submit_attempt(
        config: &RemoteConfig,
        user_id: &str,
        result: &AttemptResult,
    ) -> Result<(), LedgerError> {
        let _ack: AckResponse = post_json(
            config,
            "submit-attempt",
            &SubmitAttemptRequest {
                user_id,
                week_id: &result.week_id,
                is_correct: result.is_correct,
                points: result.points,
            },
        )?;
        Ok(())
    }

    pub fn list_weeks(config: &RemoteConfig) -> Result<Vec<String>, LedgerError> {
        post_json(config, "list-weeks", &EmptyRequest {})
    }

    pub fn fetch_weekly_top(
        config: &RemoteConfig,
        week_id: &str,
        limit: usize,
    ) -> Result<Vec<RemoteScoreRow>, LedgerError> {
        post_json(
            config,
            "fetch-weekly-top",
            &WeeklyTopRequest { week_id, limit },
        )
    }

    pub fn fetch_total_top(
        config: &RemoteConfig,
        limit: usize,
    ) -> Result<Vec<RemoteScoreRow>, LedgerError> {
        post_json(config, "fetch-total-top", &TotalTopRequest { limit })
    }

    pub fn fetch_my_rank(
        config: &RemoteConfig,
        week_id: &str,
        user_id: &str,
    ) -> Result<Option<RankingRow>, LedgerError> {
        let row: Option<RemoteRankedRow> =
            post_json(config, "fetch-my-rank", &MyRankRequest { week_id, user_id })?;
        Ok(row.map(RemoteRankedRow::into_ranking_row))
    }
}

#[cfg(target_arch = "wasm32")]
mod ops {
    use super::*;

    pub async fn sign_in(
        config: &RemoteConfig,
        login_id: &str,
        password: &str,
    ) -> Result<SignInOutcome, LedgerError> {
        post_json(config, "sign-in", &SignInRequest { login_id, password }).await
    }

    pub async fn sign_out(config: &RemoteConfig) -> Result<(), LedgerError> {
        let _ack: AckResponse = post_json(config, "sign-out", &EmptyRequest {}).await?;
        Ok(())
    }

    pub async fn current_user_id(config: &RemoteConfig) -> Result<Option<String>, LedgerError> {
        let response: CurrentUserResponse =
            post_json(config, "current-user-id", &EmptyRequest {}).await?;
        Ok(response.user_id)
    }

    pub async fn submit_attempt(
        config: &RemoteConfig,
        user_id: &str,
        result: &AttemptResult,
    ) -> Result<(), LedgerError> {
        let _ack: AckResponse = post_json(
            config,
            "submit-attempt",
            &SubmitAttemptRequest {
                user_id,
                week_id: &result.week_id,
                is_correct: result.is_correct,
                points: result.points,
            },
        )
        .await?;
        Ok(())
    }

    pub async fn list_weeks(config: &RemoteConfig) -> Result<Vec<String>, LedgerError> {
        post_json(config, "list-weeks", &EmptyRequest {}).await
    }

    pub async fn fetch_weekly_top(
        config: &RemoteConfig,
        week_id: &str,
        limit: usize,
    ) -> Result<Vec<RemoteScoreRow>, LedgerError> {
        post_json(
            config,
            "fetch-weekly-top",
            &WeeklyTopRequest { week_id, limit },
        )
        .await
    }

    pub async fn fetch_total_top(
        config: &RemoteConfig,
        limit: usize,
    ) -> Result<Vec<RemoteScoreRow>, LedgerError> {
        post_json(config, "fetch-total-top", &TotalTopRequest { limit }).await
    }

    pub async fn fetch_my_rank(
        config: &RemoteConfig,
        week_id: &str,
        user_id: &str,
    ) -> Result<Option<RankingRow>, LedgerError> {
        let row: Option<RemoteRankedRow> =
            post_json(config, "fetch-my-rank", &MyRankRequest { week_id, user_id }).await?;
        Ok(row.map(RemoteRankedRow::into_ranking_row))
    }
}

pub use ops::*;

/// Ledger respaldado por el servicio remoto (solo nativo: en web las
/// llamadas son async y pasan por los pendientes de la sesión). Cachea
/// los apodos vistos en las últimas respuestas para pintar el ranking.
#[cfg(not(target_arch = "wasm32"))]
pub struct RemoteLedger {
    config: RemoteConfig,
    user_id: String,
    names: std::sync::Mutex<HashMap<String, String>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RemoteLedger {
    pub fn new(config: RemoteConfig, user_id: String) -> Self {
        Self {
            config,
            user_id,
            names: std::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl super::ScoreLedger for RemoteLedger {
    fn apply_attempt(&self, user_id: &str, result: &AttemptResult) -> Result<(), LedgerError> {
        submit_attempt(&self.config, user_id, result)
    }

    fn weekly(&self, week_id: &str) -> Result<ScoreSnapshot, LedgerError> {
        let rows = fetch_weekly_top(&self.config, week_id, FETCH_LIMIT)?;
        collect_names(&rows, &mut self.names.lock().expect("cache envenenada"));
        Ok(rows_to_snapshot(&rows))
    }

    fn total(&self) -> Result<ScoreSnapshot, LedgerError> {
        let rows = fetch_total_top(&self.config, FETCH_LIMIT)?;
        collect_names(&rows, &mut self.names.lock().expect("cache envenenada"));
        Ok(rows_to_snapshot(&rows))
    }

    fn week_ids(&self) -> Result<Vec<String>, LedgerError> {
        let weeks = list_weeks(&self.config)?;
        Ok(super::normalize_week_ids(
            weeks,
            crate::week::current_week_id(),
        ))
    }

    fn display_names(&self) -> Result<HashMap<String, String>, LedgerError> {
        Ok(self.names.lock().expect("cache envenenada").clone())
    }

    fn my_rank(&self, week_id: &str, user_id: &str) -> Result<Option<RankingRow>, LedgerError> {
        fetch_my_rank(&self.config, week_id, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_urls_hang_from_the_base_without_double_slashes() {
        let config = RemoteConfig {
            base_url: "http://127.0.0.1:8787/api/".into(),
        };
        assert_eq!(
            config.op_url("submit-attempt"),
            "http://127.0.0.1:8787/api/submit-attempt"
        );
    }

    #[test]
    fn remote_rows_keep_server_order_in_the_snapshot() {
        let rows = vec![
            RemoteScoreRow {
                user_id: "u2".into(),
                display_name: Some("Bea".into()),
                points: 30,
                correct: 3,
                wrong: 1,
            },
            RemoteScoreRow {
                user_id: "u1".into(),
                display_name: None,
                points: 30,
                correct: 3,
                wrong: 4,
            },
        ];

        let snapshot = rows_to_snapshot(&rows);
        let ids: Vec<&str> = snapshot.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["u2", "u1"]);

        let mut names = HashMap::new();
        collect_names(&rows, &mut names);
        assert_eq!(names.get("u2").map(String::as_str), Some("Bea"));
        assert!(!names.contains_key("u1"));
    }

    #[test]
    fn ranked_row_falls_back_to_the_raw_user_id() {
        let row: RemoteRankedRow = serde_json::from_str(
            r#"{"user_id":"u9","points":10,"correct":1,"wrong":0,"rank":4}"#,
        )
        .unwrap();
        let ranked = row.into_ranking_row();
        assert_eq!(ranked.display_name, "u9");
        assert_eq!(ranked.rank, 4);
    }
}

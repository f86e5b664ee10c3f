//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, Json, response::{IntoResponse, Response}};
use tracing::{info, instrument, warn};

use crate::domain::DifficultyLabel;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::{self, LogicError};

fn error_response(e: LogicError) -> Response {
  let status = match e {
    LogicError::UnknownSession(_) => StatusCode::NOT_FOUND,
    LogicError::Difficulty(_) => StatusCode::BAD_REQUEST,
  };
  warn!(target: "trivia_backend", %status, error = %e, "Request rejected");
  (status, Json(ErrorOut { message: e.to_string() })).into_response()
}

fn respond<T: serde::Serialize>(res: Result<T, LogicError>) -> Response {
  match res {
    Ok(body) => Json(body).into_response(),
    Err(e) => error_response(e),
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info")]
pub async fn http_get_difficulties() -> impl IntoResponse {
  let options: Vec<DifficultyOptionOut> = DifficultyLabel::ALL
    .into_iter()
    .map(|label| DifficultyOptionOut { label, tier: label.tier() })
    .collect();
  Json(options)
}

#[instrument(level = "info", skip(state), fields(difficulty = ?q.difficulty))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionQuery>,
) -> Response {
  let res = logic::generate_question(&state, q.difficulty.as_deref()).await;
  if let Ok(out) = &res {
    info!(target: "generator", tier = %out.tier, category = %out.record.category(), "HTTP question served");
  }
  respond(res)
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_session(State(state): State<Arc<AppState>>) -> Response {
  Json(logic::create_session(&state).await).into_response()
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Response {
  respond(logic::get_session(&state, &q.session_id).await)
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_post_reveal(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SessionIn>,
) -> Response {
  respond(logic::reveal_answer(&state, &body.session_id).await)
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, %body.difficulty))]
pub async fn http_post_difficulty(
  State(state): State<Arc<AppState>>,
  Json(body): Json<DifficultyIn>,
) -> Response {
  respond(logic::select_difficulty(&state, &body.session_id, &body.difficulty).await)
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_post_next(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SessionIn>,
) -> Response {
  respond(logic::next_question(&state, &body.session_id).await)
}

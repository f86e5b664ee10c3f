//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{DifficultyLabel, DifficultyTier, QuestionRecord};
use crate::session::{RevealState, Session};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewQuestion,
    Reveal,
    SelectDifficulty { difficulty: String },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session { session: SessionOut },
    Error { message: String },
}

/// DTO used by both WS and HTTP for session delivery. The answer stays
/// empty until the session is revealed.
#[derive(Debug, Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub difficulty: DifficultyLabel,
    pub tier: DifficultyTier,
    pub category: String,
    pub question: String,
    pub state: RevealState,
    pub answer: Option<String>,
}

/// Convert a `Session` (internal) to the public DTO.
pub fn session_out(s: &Session) -> SessionOut {
    SessionOut {
        session_id: s.id().to_string(),
        difficulty: s.difficulty(),
        tier: s.difficulty().tier(),
        category: s.record().category().to_string(),
        question: s.record().question().to_string(),
        state: s.state(),
        answer: s.visible_answer().map(str::to_string),
    }
}

/// Stateless question delivery: the full record including the answer.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub difficulty: DifficultyLabel,
    pub tier: DifficultyTier,
    #[serde(flatten)]
    pub record: QuestionRecord,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub difficulty: String,
}

#[derive(Serialize)]
pub struct DifficultyOptionOut {
    pub label: DifficultyLabel,
    pub tier: DifficultyTier,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

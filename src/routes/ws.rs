//! WebSocket upgrade + message loop. Each connection owns one session for its
//! lifetime; every client message yields a single JSON reply.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::domain::DifficultyLabel;
use crate::protocol::{session_out, ClientWsMessage, ServerWsMessage};
use crate::pool::GeneratorPool;
use crate::session::Session;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "trivia_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "trivia_backend", "WebSocket connected");
  let mut session: Option<Session> = None;
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "session", msg = ?incoming, "WS message");
            let (next, reply) = handle_client_ws(incoming, session.take(), &state.pool).await;
            session = next;
            reply
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {e}") },
        };

        if let Err(e) = socket.send(Message::Text(encode(&reply_msg))).await {
          error!(target: "trivia_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "trivia_backend", "WebSocket disconnected");
}

fn encode(reply: &ServerWsMessage) -> String {
  serde_json::to_string(reply).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {e}") }).to_string()
  })
}

/// Takes the connection's session and returns the one to keep. A session is
/// started (easiest tier) the first time a message needs one.
#[instrument(level = "info", skip(session, pool))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  session: Option<Session>,
  pool: &GeneratorPool,
) -> (Option<Session>, ServerWsMessage) {
  let current = match (&msg, session) {
    (ClientWsMessage::Ping, s) => return (s, ServerWsMessage::Pong),
    (_, Some(s)) => s,
    (_, None) => Session::start(pool).await,
  };

  let next = match msg {
    ClientWsMessage::Ping => current,
    ClientWsMessage::NewQuestion => current.next_question(pool).await,
    ClientWsMessage::Reveal => current.reveal(),
    ClientWsMessage::SelectDifficulty { difficulty } => match difficulty.parse::<DifficultyLabel>() {
      Ok(label) => current.select_difficulty(label),
      Err(e) => return (Some(current), ServerWsMessage::Error { message: e.to_string() }),
    },
  };

  info!(target: "session", id = %next.id(), state = ?next.state(), "WS session updated");
  let reply = ServerWsMessage::Session { session: session_out(&next) };
  (Some(next), reply)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fetch::stub::{self, StubFetch};
  use crate::util::Dice;

  fn pool() -> GeneratorPool {
    GeneratorPool::new(Arc::new(StubFetch::healthy()), stub::sources(), Dice::seeded(77))
  }

  fn parse(json: &str) -> ClientWsMessage {
    serde_json::from_str(json).unwrap()
  }

  #[test]
  fn replies_are_tagged_json() {
    assert_eq!(encode(&ServerWsMessage::Pong), r#"{"type":"pong"}"#);
    let err: serde_json::Value = serde_json::from_str(&encode(&ServerWsMessage::Error { message: "nope".into() })).unwrap();
    assert_eq!(err["type"], "error");
    assert_eq!(err["message"], "nope");
  }

  #[tokio::test]
  async fn ping_does_not_start_a_session() {
    let (s, reply) = handle_client_ws(parse(r#"{"type":"ping"}"#), None, &pool()).await;
    assert!(s.is_none());
    assert!(matches!(reply, ServerWsMessage::Pong));
  }

  #[tokio::test]
  async fn reveal_keeps_question_and_shows_answer() {
    let pool = pool();
    let (s, _) = handle_client_ws(parse(r#"{"type":"new_question"}"#), None, &pool).await;
    let question = s.as_ref().unwrap().record().clone();
    let (s, reply) = handle_client_ws(parse(r#"{"type":"reveal"}"#), s, &pool).await;
    assert_eq!(s.unwrap().record(), &question);
    match reply {
      ServerWsMessage::Session { session } => assert_eq!(session.answer.as_deref(), Some(question.answer())),
      other => panic!("unexpected reply {other:?}"),
    }
  }

  #[tokio::test]
  async fn bad_label_keeps_session() {
    let pool = pool();
    let (s, _) = handle_client_ws(parse(r#"{"type":"reveal"}"#), None, &pool).await;
    let id = s.as_ref().unwrap().id().to_string();
    let (s, reply) = handle_client_ws(parse(r#"{"type":"select_difficulty","difficulty":"ultra"}"#), s, &pool).await;
    assert_eq!(s.unwrap().id(), id);
    assert!(matches!(reply, ServerWsMessage::Error { .. }));
  }
}

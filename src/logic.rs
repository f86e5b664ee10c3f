//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Stateless generation for a difficulty label
//!   - Session lifecycle against the in-memory store (start, reveal, select, next)

use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::{DifficultyLabel, UnknownDifficulty};
use crate::protocol::{session_out, QuestionOut, SessionOut};
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum LogicError {
  #[error("Unknown sessionId: {0}")]
  UnknownSession(String),

  #[error(transparent)]
  Difficulty(#[from] UnknownDifficulty),
}

/// Missing label means the default (easiest) one.
pub fn parse_difficulty(raw: Option<&str>) -> Result<DifficultyLabel, UnknownDifficulty> {
  match raw {
    Some(s) if !s.trim().is_empty() => s.parse(),
    _ => Ok(DifficultyLabel::default()),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn generate_question(state: &AppState, difficulty: Option<&str>) -> Result<QuestionOut, LogicError> {
  let label = parse_difficulty(difficulty)?;
  let record = state.pool.generate(label.tier()).await;
  Ok(QuestionOut { difficulty: label, tier: label.tier(), record })
}

#[instrument(level = "info", skip(state))]
pub async fn create_session(state: &AppState) -> SessionOut {
  let session = Session::start(&state.pool).await;
  let out = session_out(&session);
  info!(target: "session", id = %session.id(), category = %session.record().category(), "Session started");
  state.put_session(session).await;
  out
}

async fn load(state: &AppState, session_id: &str) -> Result<Session, LogicError> {
  state.get_session(session_id).await
    .ok_or_else(|| LogicError::UnknownSession(session_id.to_string()))
}

#[instrument(level = "info", skip(state))]
pub async fn get_session(state: &AppState, session_id: &str) -> Result<SessionOut, LogicError> {
  Ok(session_out(&load(state, session_id).await?))
}

async fn update(
  state: &AppState,
  session_id: &str,
  f: impl FnOnce(Session) -> Session,
) -> Result<Session, LogicError> {
  state.update_session(session_id, f).await
    .ok_or_else(|| LogicError::UnknownSession(session_id.to_string()))
}

#[instrument(level = "info", skip(state))]
pub async fn reveal_answer(state: &AppState, session_id: &str) -> Result<SessionOut, LogicError> {
  let session = update(state, session_id, Session::reveal).await?;
  info!(target: "session", id = %session_id, "Answer revealed");
  Ok(session_out(&session))
}

#[instrument(level = "info", skip(state))]
pub async fn select_difficulty(state: &AppState, session_id: &str, difficulty: &str) -> Result<SessionOut, LogicError> {
  let label: DifficultyLabel = difficulty.parse()?;
  let session = update(state, session_id, |s| s.select_difficulty(label)).await?;
  info!(target: "session", id = %session_id, %label, "Difficulty selected");
  Ok(session_out(&session))
}

/// Fetches at the tier selected when the call starts, without holding the
/// store lock. Only the question is swapped in afterwards, so a difficulty
/// picked meanwhile is kept.
#[instrument(level = "info", skip(state))]
pub async fn next_question(state: &AppState, session_id: &str) -> Result<SessionOut, LogicError> {
  let tier = load(state, session_id).await?.difficulty().tier();
  let record = state.pool.generate(tier).await;
  let session = update(state, session_id, |s| s.replace_question(record)).await?;
  info!(
    target: "session",
    id = %session_id,
    category = %session.record().category(),
    sentinel = session.record().is_sentinel(),
    "New question served"
  );
  Ok(session_out(&session))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuestionRecord;
  use crate::fetch::stub::{self, StubFetch};
  use crate::fetch::{Fetch, FetchFuture};
  use crate::pool::GeneratorPool;
  use crate::seeds::OfflineTables;
  use crate::session::RevealState;
  use crate::state::SESSION_IDLE_TTL;
  use crate::util::Dice;
  use std::sync::Arc;
  use std::time::Instant;
  use tokio::sync::{Notify, Semaphore};

  fn state() -> (AppState, Arc<StubFetch>) {
    let fetcher = Arc::new(StubFetch::healthy());
    let pool = GeneratorPool::new(fetcher.clone(), stub::sources(), Dice::seeded(99));
    (AppState::with_pool(pool), fetcher)
  }

  #[test]
  fn parse_difficulty_defaults_and_rejects() {
    assert_eq!(parse_difficulty(None).unwrap(), DifficultyLabel::BabyBarbara);
    assert_eq!(parse_difficulty(Some(" ")).unwrap(), DifficultyLabel::BabyBarbara);
    assert_eq!(parse_difficulty(Some("expert")).unwrap(), DifficultyLabel::PhdPat);
    assert!(parse_difficulty(Some("legend")).is_err());
  }

  #[tokio::test]
  async fn reveal_after_create_returns_stored_answer() {
    let (state, _) = state();
    let created = create_session(&state).await;
    assert_eq!(created.answer, None);
    assert_eq!(created.state, RevealState::Unrevealed);

    let stored = state.get_session(&created.session_id).await.unwrap();
    let revealed = reveal_answer(&state, &created.session_id).await.unwrap();
    assert_eq!(revealed.answer.as_deref(), Some(stored.record().answer()));
    assert_eq!(revealed.question, created.question);

    let again = reveal_answer(&state, &created.session_id).await.unwrap();
    assert_eq!(again.answer, revealed.answer);
  }

  #[tokio::test]
  async fn select_difficulty_never_fetches() {
    let (state, fetcher) = state();
    let created = create_session(&state).await;
    let before = fetcher.calls().len();
    let out = select_difficulty(&state, &created.session_id, "PhD Pat").await.unwrap();
    assert_eq!(out.difficulty, DifficultyLabel::PhdPat);
    assert_eq!(out.question, created.question);
    assert_eq!(fetcher.calls().len(), before);
  }

  #[tokio::test]
  async fn next_question_resets_reveal() {
    let (state, _) = state();
    let created = create_session(&state).await;
    reveal_answer(&state, &created.session_id).await.unwrap();
    let next = next_question(&state, &created.session_id).await.unwrap();
    assert_eq!(next.state, RevealState::Unrevealed);
    assert_eq!(next.answer, None);
  }

  #[tokio::test]
  async fn unknown_session_and_label_are_errors() {
    let (state, _) = state();
    assert!(matches!(reveal_answer(&state, "nope").await, Err(LogicError::UnknownSession(_))));
    let created = create_session(&state).await;
    assert!(matches!(
      select_difficulty(&state, &created.session_id, "Grandmaster Gus").await,
      Err(LogicError::Difficulty(_))
    ));
  }

  /// Holds every fetch until the test hands out permits.
  struct GatedFetch {
    inner: StubFetch,
    gate: Semaphore,
    entered: Notify,
  }

  impl Fetch for GatedFetch {
    fn get_json<'a>(&'a self, url: &'a str, query: &'a [(&'a str, String)]) -> FetchFuture<'a> {
      Box::pin(async move {
        self.entered.notify_one();
        let _permit = self.gate.acquire().await.expect("gate closed");
        self.inner.get_json(url, query).await
      })
    }
  }

  fn gated_state() -> (Arc<AppState>, Arc<GatedFetch>) {
    let fetcher = Arc::new(GatedFetch { inner: StubFetch::healthy(), gate: Semaphore::new(0), entered: Notify::new() });
    let pool = GeneratorPool::new(fetcher.clone(), stub::sources(), Dice::seeded(5)).with_tables(OfflineTables::EMPTY);
    let state = Arc::new(AppState::with_pool(pool));
    (state, fetcher)
  }

  async fn seed_session(state: &AppState, id: &str) {
    let record = QuestionRecord::new("Unit of electrical resistance (3).", "OHM", "Crossword").unwrap();
    state.put_session(Session::with_record(id.into(), DifficultyLabel::default(), record)).await;
  }

  #[tokio::test]
  async fn selection_during_fetch_is_kept() {
    let (state, fetcher) = gated_state();
    seed_session(&state, "s1").await;

    let pending = tokio::spawn({
      let state = state.clone();
      async move { next_question(&state, "s1").await }
    });
    fetcher.entered.notified().await;

    let picked = select_difficulty(&state, "s1", "PhD Pat").await.unwrap();
    assert_eq!(picked.difficulty, DifficultyLabel::PhdPat);

    fetcher.gate.add_permits(16);
    let next = pending.await.unwrap().unwrap();
    assert_eq!(next.difficulty, DifficultyLabel::PhdPat);
    assert_ne!(next.question, "Unit of electrical resistance (3).");
    assert_eq!(state.get_session("s1").await.unwrap().difficulty(), DifficultyLabel::PhdPat);
  }

  #[tokio::test]
  async fn reveal_during_fetch_applies_to_the_question_it_saw() {
    let (state, fetcher) = gated_state();
    seed_session(&state, "s1").await;

    let pending = tokio::spawn({
      let state = state.clone();
      async move { next_question(&state, "s1").await }
    });
    fetcher.entered.notified().await;

    let revealed = reveal_answer(&state, "s1").await.unwrap();
    assert_eq!(revealed.answer.as_deref(), Some("OHM"));

    fetcher.gate.add_permits(16);
    let next = pending.await.unwrap().unwrap();
    let stored = state.get_session("s1").await.unwrap();
    assert_eq!(next.state, RevealState::Unrevealed);
    assert_eq!(stored.record().question(), next.question);
  }

  #[tokio::test]
  async fn session_dropped_during_fetch_is_unknown() {
    let (state, fetcher) = gated_state();
    seed_session(&state, "s1").await;

    let pending = tokio::spawn({
      let state = state.clone();
      async move { next_question(&state, "s1").await }
    });
    fetcher.entered.notified().await;
    state.sessions.write().await.evict(Instant::now() + SESSION_IDLE_TTL);

    fetcher.gate.add_permits(16);
    assert!(matches!(pending.await.unwrap(), Err(LogicError::UnknownSession(_))));
  }

  #[tokio::test]
  async fn stateless_generation_honors_label() {
    let (state, _) = state();
    let out = generate_question(&state, Some("College Carl")).await.unwrap();
    assert_eq!(out.difficulty, DifficultyLabel::CollegeCarl);
    assert!(!out.record.category().is_empty());
  }
}

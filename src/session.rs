//! Display/session state for one player: the current question, the selected
//! difficulty and whether the answer has been revealed.
//!
//! Transitions take the session by value and hand back the next one, so the
//! caller decides where it lives (a store entry or a socket loop).

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{DifficultyLabel, QuestionRecord};
use crate::pool::GeneratorPool;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealState {
  Unrevealed,
  Revealed,
}

#[derive(Clone, Debug)]
pub struct Session {
  id: String,
  difficulty: DifficultyLabel,
  record: QuestionRecord,
  state: RevealState,
}

impl Session {
  /// First load: a question at the default (easiest) tier, answer hidden.
  pub async fn start(pool: &GeneratorPool) -> Self {
    let difficulty = DifficultyLabel::default();
    let record = pool.generate(difficulty.tier()).await;
    Self::with_record(Uuid::new_v4().to_string(), difficulty, record)
  }

  pub fn with_record(id: String, difficulty: DifficultyLabel, record: QuestionRecord) -> Self {
    Self { id, difficulty, record, state: RevealState::Unrevealed }
  }

  pub fn reveal(mut self) -> Self {
    self.state = RevealState::Revealed;
    self
  }

  /// Changes the tier used by the next question. Does not fetch.
  pub fn select_difficulty(mut self, difficulty: DifficultyLabel) -> Self {
    self.difficulty = difficulty;
    self
  }

  pub async fn next_question(self, pool: &GeneratorPool) -> Self {
    let record = pool.generate(self.difficulty.tier()).await;
    self.replace_question(record)
  }

  pub fn replace_question(mut self, record: QuestionRecord) -> Self {
    self.record = record;
    self.state = RevealState::Unrevealed;
    self
  }

  pub fn id(&self) -> &str { &self.id }
  pub fn difficulty(&self) -> DifficultyLabel { self.difficulty }
  pub fn record(&self) -> &QuestionRecord { &self.record }
  pub fn state(&self) -> RevealState { self.state }

  /// The answer, only once revealed.
  pub fn visible_answer(&self) -> Option<&str> {
    match self.state {
      RevealState::Revealed => Some(self.record.answer()),
      RevealState::Unrevealed => None,
    }
  }
}

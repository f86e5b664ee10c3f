//! Domain models: difficulty labels and tiers, question records, generator kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Internal four-way difficulty classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
  Easy,
  Medium,
  Hard,
  Expert,
}

impl DifficultyTier {
  #[cfg(test)]
  pub const ALL: [DifficultyTier; 4] = [
    DifficultyTier::Easy,
    DifficultyTier::Medium,
    DifficultyTier::Hard,
    DifficultyTier::Expert,
  ];

  /// Nearest supported tier for sources that stop at "hard".
  pub fn capped(self) -> CappedTier {
    match self {
      DifficultyTier::Easy => CappedTier::Easy,
      DifficultyTier::Medium => CappedTier::Medium,
      DifficultyTier::Hard | DifficultyTier::Expert => CappedTier::Hard,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      DifficultyTier::Easy => "easy",
      DifficultyTier::Medium => "medium",
      DifficultyTier::Hard => "hard",
      DifficultyTier::Expert => "expert",
    }
  }
}

impl fmt::Display for DifficultyTier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The three-way difficulty accepted by the general-knowledge API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CappedTier {
  Easy,
  Medium,
  Hard,
}

impl CappedTier {
  pub fn as_str(self) -> &'static str {
    match self {
      CappedTier::Easy => "easy",
      CappedTier::Medium => "medium",
      CappedTier::Hard => "hard",
    }
  }
}

/// User-facing difficulty label. The mapping to `DifficultyTier` is total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLabel {
  #[default]
  #[serde(rename = "Baby Barbara")]
  BabyBarbara,
  #[serde(rename = "Average Joe")]
  AverageJoe,
  #[serde(rename = "College Carl")]
  CollegeCarl,
  #[serde(rename = "PhD Pat")]
  PhdPat,
}

impl DifficultyLabel {
  pub const ALL: [DifficultyLabel; 4] = [
    DifficultyLabel::BabyBarbara,
    DifficultyLabel::AverageJoe,
    DifficultyLabel::CollegeCarl,
    DifficultyLabel::PhdPat,
  ];

  pub fn tier(self) -> DifficultyTier {
    match self {
      DifficultyLabel::BabyBarbara => DifficultyTier::Easy,
      DifficultyLabel::AverageJoe => DifficultyTier::Medium,
      DifficultyLabel::CollegeCarl => DifficultyTier::Hard,
      DifficultyLabel::PhdPat => DifficultyTier::Expert,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      DifficultyLabel::BabyBarbara => "Baby Barbara",
      DifficultyLabel::AverageJoe => "Average Joe",
      DifficultyLabel::CollegeCarl => "College Carl",
      DifficultyLabel::PhdPat => "PhD Pat",
    }
  }
}

impl fmt::Display for DifficultyLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty label: {0}")]
pub struct UnknownDifficulty(pub String);

/// Accepts the display labels and the tier names, case-insensitively.
impl FromStr for DifficultyLabel {
  type Err = UnknownDifficulty;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_lowercase();
    DifficultyLabel::ALL
      .into_iter()
      .find(|l| l.as_str().to_lowercase() == wanted || l.tier().as_str() == wanted)
      .ok_or_else(|| UnknownDifficulty(s.to_string()))
  }
}

pub const SENTINEL_QUESTION: &str =
  "Hmm, couldn't fetch a question right now. Check your internet and try Refresh.";
pub const SENTINEL_ANSWER: &str = "—";
pub const SENTINEL_CATEGORY: &str = "Error";

/// A (question, answer, category) triple. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
  question: String,
  answer: String,
  category: String,
}

impl QuestionRecord {
  /// Returns None unless both question and answer carry text.
  pub fn new(
    question: impl Into<String>,
    answer: impl Into<String>,
    category: impl Into<String>,
  ) -> Option<Self> {
    let question = question.into();
    let answer = answer.into();
    if question.trim().is_empty() || answer.trim().is_empty() {
      return None;
    }
    Some(Self { question, answer, category: category.into() })
  }

  /// Placeholder returned when every generator in a pool is unavailable.
  pub fn sentinel() -> Self {
    Self {
      question: SENTINEL_QUESTION.into(),
      answer: SENTINEL_ANSWER.into(),
      category: SENTINEL_CATEGORY.into(),
    }
  }

  pub fn is_sentinel(&self) -> bool {
    self.category == SENTINEL_CATEGORY && self.answer == SENTINEL_ANSWER
  }

  pub fn question(&self) -> &str { &self.question }
  pub fn answer(&self) -> &str { &self.answer }
  pub fn category(&self) -> &str { &self.category }
}

/// Which content source a generator talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
  GeneralKnowledge,
  Capital,
  Fact,
  Lyric,
  Crossword,
}

impl fmt::Display for SourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      SourceKind::GeneralKnowledge => "general_knowledge",
      SourceKind::Capital => "capital",
      SourceKind::Fact => "fact",
      SourceKind::Lyric => "lyric",
      SourceKind::Crossword => "crossword",
    })
  }
}

/// A generator bound to its tier parameter. Built fresh per selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorKind {
  GeneralKnowledge(CappedTier),
  Capital(DifficultyTier),
  Fact(DifficultyTier),
  Lyric,
  Crossword(DifficultyTier),
}

impl GeneratorKind {
  pub fn source(self) -> SourceKind {
    match self {
      GeneratorKind::GeneralKnowledge(_) => SourceKind::GeneralKnowledge,
      GeneratorKind::Capital(_) => SourceKind::Capital,
      GeneratorKind::Fact(_) => SourceKind::Fact,
      GeneratorKind::Lyric => SourceKind::Lyric,
      GeneratorKind::Crossword(_) => SourceKind::Crossword,
    }
  }
}

//! Per-source question generators.
//!
//! Each generator is stateless and returns either a populated `QuestionRecord`
//! or `Unavailable`. Network and payload problems never escape as errors of
//! their own: they are folded into `Unavailable` at this boundary.

use std::fmt::Display;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::SourcesConfig;
use crate::domain::{CappedTier, DifficultyTier, QuestionRecord, SourceKind};
use crate::fetch::{decode, Fetch};
use crate::seeds::{
  fact_pool, OfflineTables, EASY_POPULATION_MIN, EXPERT_POPULATION_MAX, HARD_POPULATION_MAX,
  MEDIUM_POPULATION_MIN, WELL_KNOWN_COUNTRIES,
};
use crate::util::{decode_text, Dice};

pub const WIKI_NOT_FOUND: &str = "https://mediawiki.org/wiki/HyperSwitch/errors/not_found";
pub const CAPITAL_CATEGORY: &str = "Geography (Capitals)";
pub const LYRIC_CATEGORY: &str = "Music (Lyrics ≤10 words)";
pub const CROSSWORD_CATEGORY: &str = "Crossword";

/// The one failure kind a generator reports.
#[derive(Debug, Error)]
#[error("{kind} unavailable: {reason}")]
pub struct Unavailable {
  pub kind: SourceKind,
  pub reason: String,
}

impl Unavailable {
  pub fn new(kind: SourceKind, reason: impl Display) -> Self {
    Self { kind, reason: reason.to_string() }
  }
}

pub type Generated = Result<QuestionRecord, Unavailable>;

fn unavailable<E: Display>(kind: SourceKind) -> impl FnOnce(E) -> Unavailable {
  move |e| Unavailable::new(kind, e)
}

fn build(kind: SourceKind, question: impl Into<String>, answer: impl Into<String>, category: impl Into<String>) -> Generated {
  QuestionRecord::new(question, answer, category)
    .ok_or_else(|| Unavailable::new(kind, "empty question or answer"))
}

// --- General knowledge (Open Trivia DB) ---

#[derive(Deserialize)]
struct OpenTdbResponse {
  response_code: i64,
  #[serde(default)]
  results: Vec<OpenTdbItem>,
}

#[derive(Deserialize)]
struct OpenTdbItem {
  question: String,
  correct_answer: String,
  category: String,
}

/// One multiple-choice item at the capped tier.
#[instrument(level = "debug", skip(fetcher, sources), fields(difficulty = tier.as_str()))]
pub async fn general_knowledge(fetcher: &dyn Fetch, sources: &SourcesConfig, tier: CappedTier) -> Generated {
  let kind = SourceKind::GeneralKnowledge;
  let mut query = vec![
    ("amount", "1".to_string()),
    ("type", "multiple".to_string()),
    ("encode", "base64".to_string()),
    ("difficulty", tier.as_str().to_string()),
  ];
  if let Some(category) = sources.general_knowledge_category {
    query.push(("category", category.to_string()));
  }

  let body = fetcher.get_json(&sources.opentdb_url, &query).await.map_err(unavailable(kind))?;
  let resp: OpenTdbResponse = decode(body).map_err(unavailable(kind))?;
  if resp.response_code != 0 {
    return Err(Unavailable::new(kind, format!("response_code {}", resp.response_code)));
  }
  let item = resp.results.into_iter().next()
    .ok_or_else(|| Unavailable::new(kind, "no results"))?;

  let question = decode_text(&item.question).map_err(unavailable(kind))?;
  let answer = decode_text(&item.correct_answer).map_err(unavailable(kind))?;
  let category = decode_text(&item.category).map_err(unavailable(kind))?;
  build(kind, question, answer, category)
}

// --- Capitals (REST Countries) ---

#[derive(Clone, Debug, Deserialize)]
pub struct Country {
  pub name: CountryName,
  #[serde(default)]
  pub capital: Option<Vec<String>>,
  #[serde(default)]
  pub region: String,
  #[serde(default)]
  pub population: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CountryName {
  #[serde(default)]
  pub common: String,
}

impl Country {
  pub fn first_capital(&self) -> Option<&str> {
    self.capital.as_ref()?.iter().map(String::as_str).find(|c| !c.trim().is_empty())
  }

  fn is_candidate(&self) -> bool {
    !self.name.common.trim().is_empty() && self.first_capital().is_some()
  }
}

fn keep<'a>(pool: &[&'a Country], pred: impl Fn(&Country) -> bool) -> Vec<&'a Country> {
  pool.iter().copied().filter(|c| pred(c)).collect()
}

/// Countries eligible for a tier. Falls back to every country with a capital
/// when the tier's own slice is empty; empty only if no country has a capital.
pub fn capital_partition(countries: &[Country], tier: DifficultyTier) -> Vec<&Country> {
  let candidates: Vec<&Country> = countries.iter().filter(|c| c.is_candidate()).collect();

  let primary = match tier {
    DifficultyTier::Easy => {
      let listed = keep(&candidates, |c| WELL_KNOWN_COUNTRIES.contains(&c.name.common.as_str()));
      if listed.is_empty() {
        keep(&candidates, |c| c.population >= EASY_POPULATION_MIN)
      } else {
        listed
      }
    }
    DifficultyTier::Medium => keep(&candidates, |c| {
      (MEDIUM_POPULATION_MIN..EASY_POPULATION_MIN).contains(&c.population)
    }),
    DifficultyTier::Hard => keep(&candidates, |c| {
      c.population < HARD_POPULATION_MAX || c.region == "Oceania"
    }),
    DifficultyTier::Expert => keep(&candidates, |c| {
      c.population < EXPERT_POPULATION_MAX || matches!(c.region.as_str(), "Oceania" | "Americas")
    }),
  };

  if primary.is_empty() { candidates } else { primary }
}

#[instrument(level = "debug", skip(fetcher, sources, dice))]
pub async fn capital(fetcher: &dyn Fetch, sources: &SourcesConfig, tier: DifficultyTier, dice: &Dice) -> Generated {
  let kind = SourceKind::Capital;
  let body = fetcher.get_json(&sources.restcountries_url, &[]).await.map_err(unavailable(kind))?;
  let countries: Vec<Country> = decode(body).map_err(unavailable(kind))?;

  let partition = capital_partition(&countries, tier);
  debug!(target: "generator", %tier, total = countries.len(), eligible = partition.len(), "Capital partition");
  let country = dice.choose(&partition)
    .ok_or_else(|| Unavailable::new(kind, "no country with a capital"))?;
  let capital = country.first_capital()
    .ok_or_else(|| Unavailable::new(kind, "country without capital"))?;

  build(kind, format!("What is the capital of {}?", country.name.common), capital, CAPITAL_CATEGORY)
}

// --- Facts (curated table + encyclopedia existence check) ---

fn summary_url(base: &str, topic: &str) -> String {
  format!("{}/{}", base.trim_end_matches('/'), topic.trim().replace(' ', "_"))
}

/// Picks a curated fact and confirms its topic still resolves. The summary
/// itself is discarded so the answer is never shown early.
#[instrument(level = "debug", skip(fetcher, sources, dice))]
pub async fn fact(fetcher: &dyn Fetch, sources: &SourcesConfig, tier: DifficultyTier, dice: &Dice) -> Generated {
  let kind = SourceKind::Fact;
  let &(topic, category, question, answer) = dice.choose(fact_pool(tier))
    .ok_or_else(|| Unavailable::new(kind, "empty fact pool"))?;

  let url = summary_url(&sources.wikipedia_summary_url, topic);
  let summary = fetcher.get_json(&url, &[]).await.map_err(unavailable(kind))?;
  if summary.get("type").and_then(Value::as_str) == Some(WIKI_NOT_FOUND) {
    return Err(Unavailable::new(kind, format!("topic not found: {topic}")));
  }

  build(kind, question, answer, category)
}

// --- Offline generators ---

pub fn lyric(tables: &OfflineTables, dice: &Dice) -> Generated {
  let kind = SourceKind::Lyric;
  let &(snippet, song, artist) = dice.choose(tables.lyrics)
    .ok_or_else(|| Unavailable::new(kind, "empty lyric pool"))?;
  build(
    kind,
    format!("Music — Name That Song:\n“{snippet} …”  • Name the song and artist."),
    format!("{song} — {artist}"),
    LYRIC_CATEGORY,
  )
}

pub fn crossword(tables: &OfflineTables, tier: DifficultyTier, dice: &Dice) -> Generated {
  let kind = SourceKind::Crossword;
  let &(clue, answer) = dice.choose(tables.crossword(tier))
    .ok_or_else(|| Unavailable::new(kind, "empty clue pool"))?;
  build(kind, format!("Crossword-style clue: {clue}"), answer, CROSSWORD_CATEGORY)
}

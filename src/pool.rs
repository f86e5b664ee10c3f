//! Generator pool: picks the generators eligible for a tier, shuffles them,
//! and tries each in turn until one yields a question.
//!
//! `generate` never fails. When every generator is unavailable the caller
//! gets the sentinel record.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::config::SourcesConfig;
use crate::domain::{DifficultyTier, GeneratorKind, QuestionRecord};
use crate::fetch::Fetch;
use crate::generators::{self, Generated};
use crate::seeds::OfflineTables;
use crate::util::{trunc_for_log, Dice};

/// Generators eligible for a tier, before shuffling.
/// Lyrics are left out from Hard upwards: the snippets are too recognizable.
pub fn candidates(tier: DifficultyTier) -> Vec<GeneratorKind> {
  let mut kinds = vec![
    GeneratorKind::GeneralKnowledge(tier.capped()),
    GeneratorKind::Capital(tier),
    GeneratorKind::Fact(tier),
    GeneratorKind::Crossword(tier),
  ];
  if matches!(tier, DifficultyTier::Easy | DifficultyTier::Medium) {
    kinds.push(GeneratorKind::Lyric);
  }
  kinds
}

pub struct GeneratorPool {
  fetcher: Arc<dyn Fetch>,
  sources: SourcesConfig,
  tables: OfflineTables,
  dice: Dice,
}

impl GeneratorPool {
  pub fn new(fetcher: Arc<dyn Fetch>, sources: SourcesConfig, dice: Dice) -> Self {
    Self { fetcher, sources, tables: OfflineTables::default(), dice }
  }

  #[cfg(test)]
  pub fn with_tables(mut self, tables: OfflineTables) -> Self {
    self.tables = tables;
    self
  }

  /// Eligible generators in a fresh uniform random order.
  pub fn select(&self, tier: DifficultyTier) -> Vec<GeneratorKind> {
    let mut kinds = candidates(tier);
    self.dice.shuffle(&mut kinds);
    kinds
  }

  /// First generator to produce a question wins; the rest are not called.
  #[instrument(level = "info", skip(self))]
  pub async fn generate(&self, tier: DifficultyTier) -> QuestionRecord {
    let order = self.select(tier);
    for kind in &order {
      match self.run(*kind).await {
        Ok(record) => {
          info!(
            target: "generator",
            %tier,
            source = %kind.source(),
            category = %record.category(),
            question = %trunc_for_log(record.question(), 60),
            "Question generated"
          );
          return record;
        }
        Err(e) => {
          warn!(target: "generator", %tier, source = %e.kind, reason = %e.reason, "Generator unavailable; trying next");
        }
      }
    }
    error!(target: "generator", %tier, tried = order.len(), "Every generator unavailable; serving sentinel");
    QuestionRecord::sentinel()
  }

  async fn run(&self, kind: GeneratorKind) -> Generated {
    let fetcher = self.fetcher.as_ref();
    match kind {
      GeneratorKind::GeneralKnowledge(capped) => generators::general_knowledge(fetcher, &self.sources, capped).await,
      GeneratorKind::Capital(tier) => generators::capital(fetcher, &self.sources, tier, &self.dice).await,
      GeneratorKind::Fact(tier) => generators::fact(fetcher, &self.sources, tier, &self.dice).await,
      GeneratorKind::Lyric => generators::lyric(&self.tables, &self.dice),
      GeneratorKind::Crossword(tier) => generators::crossword(&self.tables, tier, &self.dice),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{CappedTier, SourceKind, SENTINEL_QUESTION};
  use crate::fetch::stub::{self, StubFetch};
  use crate::generators::{CAPITAL_CATEGORY, CROSSWORD_CATEGORY, LYRIC_CATEGORY};
  use crate::seeds::fact_pool;
  use std::collections::HashSet;

  fn pool_with(fetcher: Arc<StubFetch>, seed: u64) -> GeneratorPool {
    GeneratorPool::new(fetcher, stub::sources(), Dice::seeded(seed))
  }

  #[test]
  fn lyric_only_in_easy_and_medium() {
    for tier in DifficultyTier::ALL {
      let has_lyric = candidates(tier).contains(&GeneratorKind::Lyric);
      let expected = matches!(tier, DifficultyTier::Easy | DifficultyTier::Medium);
      assert_eq!(has_lyric, expected, "{tier}");
    }
    assert_eq!(candidates(DifficultyTier::Easy).len(), 5);
    assert_eq!(candidates(DifficultyTier::Hard).len(), 4);
  }

  #[test]
  fn expert_uses_capped_tier_only_for_general_knowledge() {
    let kinds = candidates(DifficultyTier::Expert);
    assert!(kinds.contains(&GeneratorKind::GeneralKnowledge(CappedTier::Hard)));
    assert!(kinds.contains(&GeneratorKind::Capital(DifficultyTier::Expert)));
    assert!(kinds.contains(&GeneratorKind::Fact(DifficultyTier::Expert)));
    assert!(kinds.contains(&GeneratorKind::Crossword(DifficultyTier::Expert)));
  }

  #[test]
  fn select_is_a_permutation_and_varies() {
    let pool = pool_with(Arc::new(StubFetch::offline()), 21);
    let mut firsts = HashSet::new();
    for _ in 0..60 {
      let order = pool.select(DifficultyTier::Medium);
      assert_eq!(order.len(), 5);
      let unique: HashSet<SourceKind> = order.iter().map(|k| k.source()).collect();
      assert_eq!(unique.len(), 5);
      firsts.insert(order[0].source());
    }
    assert!(firsts.len() > 1, "shuffle never changed the lead generator");
  }

  #[tokio::test]
  async fn every_tier_yields_a_category() {
    let pool = pool_with(Arc::new(StubFetch::healthy()), 8);
    for tier in DifficultyTier::ALL {
      for _ in 0..10 {
        let rec = pool.generate(tier).await;
        assert!(!rec.category().is_empty());
        assert!(!rec.is_sentinel());
      }
    }
  }

  #[tokio::test]
  async fn all_sources_down_gives_exact_sentinel() {
    let fetcher = Arc::new(StubFetch::offline());
    let pool = pool_with(fetcher.clone(), 1).with_tables(OfflineTables::EMPTY);
    for tier in DifficultyTier::ALL {
      let rec = pool.generate(tier).await;
      assert_eq!(rec.question(), SENTINEL_QUESTION);
      assert_eq!(rec.answer(), "—");
      assert_eq!(rec.category(), "Error");
    }
    // gk + capital + fact per tier, each tried exactly once
    assert_eq!(fetcher.calls().len(), 12);
  }

  #[tokio::test]
  async fn healthy_easy_categories_are_known() {
    let pool = pool_with(Arc::new(StubFetch::healthy()), 17);
    let facts: Vec<&str> = fact_pool(DifficultyTier::Easy).iter().map(|e| e.1).collect();
    let mut seen = HashSet::new();
    for _ in 0..80 {
      let rec = pool.generate(DifficultyTier::Easy).await;
      let cat = rec.category().to_string();
      let known = cat == "Science & Nature"
        || cat == CAPITAL_CATEGORY
        || cat == LYRIC_CATEGORY
        || cat == CROSSWORD_CATEGORY
        || facts.contains(&cat.as_str());
      assert!(known, "unexpected category {cat}");
      seen.insert(cat);
    }
    assert!(seen.len() >= 3, "too little variety: {seen:?}");
  }

  #[tokio::test]
  async fn no_lyrics_at_hard_or_expert() {
    let pool = pool_with(Arc::new(StubFetch::healthy()), 33);
    for tier in [DifficultyTier::Hard, DifficultyTier::Expert] {
      for _ in 0..100 {
        let rec = pool.generate(tier).await;
        assert!(!rec.category().starts_with("Music"), "{tier}: {}", rec.category());
      }
    }
  }

  #[tokio::test]
  async fn offline_easy_falls_back_to_offline_generators() {
    let pool = pool_with(Arc::new(StubFetch::offline()), 2);
    for _ in 0..40 {
      let rec = pool.generate(DifficultyTier::Easy).await;
      assert!(rec.category() == LYRIC_CATEGORY || rec.category() == CROSSWORD_CATEGORY);
    }
  }

  #[tokio::test]
  async fn expert_requests_hard_from_general_knowledge() {
    let fetcher = Arc::new(StubFetch::offline());
    let pool = pool_with(fetcher.clone(), 4).with_tables(OfflineTables::EMPTY);
    for _ in 0..20 {
      pool.generate(DifficultyTier::Expert).await;
    }
    let difficulties: HashSet<String> = fetcher.calls()
      .into_iter()
      .filter(|(url, _)| url == stub::OPENTDB)
      .flat_map(|(_, q)| q.into_iter().filter(|(k, _)| k == "difficulty").map(|(_, v)| v))
      .collect();
    assert_eq!(difficulties, HashSet::from(["hard".to_string()]));
  }

  #[tokio::test]
  async fn first_success_short_circuits() {
    let fetcher = Arc::new(StubFetch::healthy());
    let pool = pool_with(fetcher.clone(), 12);
    for _ in 0..25 {
      let before = fetcher.calls().len();
      pool.generate(DifficultyTier::Hard).await;
      assert!(fetcher.calls().len() - before <= 1, "more than one network call on the happy path");
    }
  }
}

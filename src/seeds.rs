//! Hand-curated content tables used by the offline generators and by the
//! fact generator's topic pool.

use crate::domain::DifficultyTier;

/// (topic, category, question, canonical answer)
pub type FactEntry = (&'static str, &'static str, &'static str, &'static str);

const FACTS_EASY: &[FactEntry] = &[
  ("Mitochondrion", "Science (Biology)", "What cell organelle is often called the 'powerhouse' of the cell?", "Mitochondrion"),
  ("Abraham Lincoln", "History (US)", "Which U.S. president delivered the Gettysburg Address?", "Abraham Lincoln"),
  ("Water", "Science", "What is the chemical formula for water?", "H₂O"),
];

const FACTS_MEDIUM: &[FactEntry] = &[
  ("Periodic table", "Science (Chemistry)", "Who arranged elements by atomic number in the modern periodic table? (Last name)", "Moseley"),
  ("Magna Carta", "History (World)", "The Magna Carta was sealed under King John in which century?", "13th century"),
  ("Photosynthesis", "Science (Biology)", "In plants, what gas is taken in during photosynthesis?", "Carbon dioxide"),
];

const FACTS_HARD: &[FactEntry] = &[
  ("Alexander von Humboldt", "History/Science", "Which Prussian naturalist is called the 'father of modern geography'?", "Alexander von Humboldt"),
  ("General relativity", "Science (Physics)", "Which scientist proposed the theory of general relativity? (Last name)", "Einstein"),
  ("Abyssinia", "History/Geography", "Which modern country was historically known as Abyssinia?", "Ethiopia"),
];

const FACTS_EXPERT: &[FactEntry] = &[
  ("Peace of Westphalia", "History (World)", "Which 1648 series of treaties ended the Thirty Years' War?", "Peace of Westphalia"),
  ("Srinivasa Ramanujan", "History (Mathematics)", "Which self-taught Indian mathematician worked with G. H. Hardy at Cambridge?", "Srinivasa Ramanujan"),
  ("Tardigrade", "Science (Biology)", "Which microscopic animals, nicknamed 'water bears', survived exposure to open space?", "Tardigrades"),
  ("Antikythera mechanism", "History/Science", "What ancient Greek geared device is often called the first analogue computer?", "Antikythera mechanism"),
];

pub fn fact_pool(tier: DifficultyTier) -> &'static [FactEntry] {
  match tier {
    DifficultyTier::Easy => FACTS_EASY,
    DifficultyTier::Medium => FACTS_MEDIUM,
    DifficultyTier::Hard => FACTS_HARD,
    DifficultyTier::Expert => FACTS_EXPERT,
  }
}

/// (snippet, song, artist). Public-domain or at most ten words.
pub const LYRIC_SNIPPETS: &[(&str, &str, &str)] = &[
  ("Amazing grace, how sweet the sound", "Amazing Grace", "Traditional"),
  ("Twinkle, twinkle, little star, how I wonder", "Twinkle, Twinkle, Little Star", "Traditional"),
  ("Happy birthday to you, happy birthday to you", "Happy Birthday to You", "Traditional"),
  ("You can call me queen bee, and baby I'll rule", "Royals", "Lorde"),
  ("Is this the real life, is this just fantasy", "Bohemian Rhapsody", "Queen"),
  ("Hello from the other side, I must have", "Hello", "Adele"),
  ("Cause baby you're a firework, come on, show 'em", "Firework", "Katy Perry"),
];

/// (clue, answer) for Easy and Medium.
pub const CROSSWORD_EASY: &[(&str, &str)] = &[
  ("Opposite of ‘yin’ (4).", "YANG"),
  ("French 'yes' (3).", "OUI"),
  ("Unit of electrical resistance (3).", "OHM"),
  ("Greek letter after alpha (4).", "BETA"),
  ("Ocean-warming pattern; ignore diacritics (6).", "ELNINO"),
];

/// (clue, answer) for Hard and Expert.
pub const CROSSWORD_HARD: &[(&str, &str)] = &[
  ("Prefix meaning 'earth' (3).", "GEO"),
  ("Shakespearean 'before' (3).", "ERE"),
  ("Sash worn with a kimono (3).", "OBI"),
  ("Sacred beetle of ancient Egypt (6).", "SCARAB"),
  ("Old Norse collection of poems (4).", "EDDA"),
  ("Atmospheric layer holding most ozone (12).", "STRATOSPHERE"),
];

/// The tables behind the generators that need no network.
#[derive(Clone, Copy, Debug)]
pub struct OfflineTables {
  pub lyrics: &'static [(&'static str, &'static str, &'static str)],
  pub crossword_easy: &'static [(&'static str, &'static str)],
  pub crossword_hard: &'static [(&'static str, &'static str)],
}

impl Default for OfflineTables {
  fn default() -> Self {
    Self { lyrics: LYRIC_SNIPPETS, crossword_easy: CROSSWORD_EASY, crossword_hard: CROSSWORD_HARD }
  }
}

impl OfflineTables {
  #[cfg(test)]
  pub const EMPTY: OfflineTables = OfflineTables { lyrics: &[], crossword_easy: &[], crossword_hard: &[] };

  pub fn crossword(&self, tier: DifficultyTier) -> &'static [(&'static str, &'static str)] {
    match tier {
      DifficultyTier::Easy | DifficultyTier::Medium => self.crossword_easy,
      DifficultyTier::Hard | DifficultyTier::Expert => self.crossword_hard,
    }
  }
}

/// Common names of countries most players can place on a map.
pub const WELL_KNOWN_COUNTRIES: &[&str] = &[
  "United States", "Canada", "Mexico", "Brazil", "Argentina",
  "United Kingdom", "France", "Germany", "Italy", "Spain",
  "Russia", "China", "Japan", "India", "Australia",
  "Egypt", "South Africa", "Greece", "Ireland", "Portugal",
];

pub const EASY_POPULATION_MIN: u64 = 20_000_000;
pub const MEDIUM_POPULATION_MIN: u64 = 5_000_000;
pub const HARD_POPULATION_MAX: u64 = 5_000_000;
pub const EXPERT_POPULATION_MAX: u64 = 1_000_000;

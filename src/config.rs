//! Loading source configuration (endpoint URLs + per-call timeout) from TOML.
//!
//! Expected schema:
//!
//! ```toml
//! [sources]
//! opentdb_url = "https://opentdb.com/api.php"
//! restcountries_url = "https://restcountries.com/v3.1/all?fields=name,capital,cca2,region,population"
//! wikipedia_summary_url = "https://en.wikipedia.org/api/rest_v1/page/summary"
//! timeout_secs = 12
//! # general_knowledge_category = 9
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub sources: SourcesConfig,
}

/// Where the content sources live and how long a single call may take.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
  pub opentdb_url: String,
  pub restcountries_url: String,
  pub wikipedia_summary_url: String,
  pub timeout_secs: u64,
  /// Optional category id passed to the general-knowledge API.
  pub general_knowledge_category: Option<u32>,
}

impl Default for SourcesConfig {
  fn default() -> Self {
    Self {
      opentdb_url: "https://opentdb.com/api.php".into(),
      restcountries_url: "https://restcountries.com/v3.1/all?fields=name,capital,cca2,region,population".into(),
      wikipedia_summary_url: "https://en.wikipedia.org/api/rest_v1/page/summary".into(),
      timeout_secs: 12,
      general_knowledge_category: None,
    }
  }
}

impl SourcesConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Attempt to load `AppConfig` from TRIVIA_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("TRIVIA_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "trivia_backend", %path, "Loaded source config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "trivia_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "trivia_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

//! Small utility helpers used across modules.

use std::sync::{Mutex, PoisonError};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shared random source. Seeded in tests so selections are reproducible.
/// The lock is only held for the duration of a single pick or shuffle.
pub struct Dice(Mutex<StdRng>);

impl Dice {
  pub fn from_entropy() -> Self {
    Dice(Mutex::new(StdRng::from_entropy()))
  }

  #[cfg(test)]
  pub fn seeded(seed: u64) -> Self {
    Dice(Mutex::new(StdRng::seed_from_u64(seed)))
  }

  fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
    let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut *rng)
  }

  /// Uniform pick; None only for an empty slice.
  pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
    self.with_rng(|rng| items.choose(rng))
  }

  /// Uniform permutation in place.
  pub fn shuffle<T>(&self, items: &mut [T]) {
    self.with_rng(|rng| items.shuffle(rng))
  }
}

/// Decode a base64 transport field, dropping invalid UTF-8, then unescape HTML entities.
pub fn decode_text(encoded: &str) -> Result<String, base64::DecodeError> {
  let bytes = STANDARD.decode(encoded.trim())?;
  let raw: String = String::from_utf8_lossy(&bytes)
    .chars()
    .filter(|c| *c != char::REPLACEMENT_CHARACTER)
    .collect();
  Ok(html_escape::decode_html_entities(&raw).into_owned())
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    format!("{}…", s.chars().take(max).collect::<String>())
  }
}

//! Shared HTTP/JSON fetch helper for the content sources.
//!
//! Every call is a single GET bounded by the configured timeout. Any failure
//! (transport, timeout, non-2xx, undecodable body) comes back as `FetchError`;
//! generators turn that into an unavailable outcome.

use std::{future::Future, pin::Pin, time::Duration, time::Instant};

use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("HTTP {status} from {url}")]
  Status { status: u16, url: String },

  #[error("malformed payload: {0}")]
  Payload(#[from] serde_json::Error),
}

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, FetchError>> + Send + 'a>>;

/// Read-only JSON source. Implemented over HTTP in production and by an
/// in-process stub in tests.
pub trait Fetch: Send + Sync {
  fn get_json<'a>(&'a self, url: &'a str, query: &'a [(&'a str, String)]) -> FetchFuture<'a>;
}

/// Typed view of a fetched payload.
pub fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, FetchError> {
  Ok(serde_json::from_value(body)?)
}

#[derive(Clone)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  pub fn new(timeout: Duration) -> Result<Self, FetchError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client })
  }
}

impl Fetch for HttpFetcher {
  fn get_json<'a>(&'a self, url: &'a str, query: &'a [(&'a str, String)]) -> FetchFuture<'a> {
    Box::pin(self.get_json_inner(url, query))
  }
}

impl HttpFetcher {
  #[instrument(level = "debug", skip(self, query), fields(%url))]
  async fn get_json_inner(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
    let start = Instant::now();
    let res = self.client.get(url)
      .header(USER_AGENT, "trivia-backend/0.1")
      .header(ACCEPT, "application/json")
      .query(query)
      .send().await?;

    let status = res.status();
    if !status.is_success() {
      return Err(FetchError::Status { status: status.as_u16(), url: url.to_string() });
    }

    let body: Value = res.json().await?;
    debug!(target: "generator", elapsed = ?start.elapsed(), %status, "Source responded");
    Ok(body)
  }
}

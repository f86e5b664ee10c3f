//! Application state: the generator pool and the in-memory session store.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::config::load_config_from_env;
use crate::fetch::{FetchError, HttpFetcher};
use crate::pool::GeneratorPool;
use crate::session::Session;
use crate::util::Dice;

/// Upper bound on live HTTP sessions; the least recently touched go first.
pub const MAX_SESSIONS: usize = 10_000;
/// Sessions untouched for this long are dropped on the next write.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

struct Entry {
    session: Session,
    touched: Instant,
}

/// Sessions keyed by id, bounded by count and idle time.
/// Reads do not refresh `touched`; only writes do.
pub struct SessionStore {
    entries: HashMap<String, Entry>,
    capacity: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(capacity: usize, idle_ttl: Duration) -> Self {
        Self { entries: HashMap::new(), capacity: capacity.max(1), idle_ttl }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.entries.get(id).map(|e| &e.session)
    }

    pub fn insert(&mut self, session: Session, now: Instant) {
        self.evict(now);
        let id = session.id().to_string();
        if !self.entries.contains_key(&id) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(id, Entry { session, touched: now });
    }

    /// Applies `f` to the stored session in place. None if the id is unknown.
    pub fn update(&mut self, id: &str, now: Instant, f: impl FnOnce(Session) -> Session) -> Option<&Session> {
        self.evict(now);
        let entry = self.entries.remove(id)?;
        let session = f(entry.session);
        let slot = self.entries.entry(id.to_string()).or_insert(Entry { session, touched: now });
        Some(&slot.session)
    }

    /// Drops every session idle for at least the TTL.
    pub fn evict(&mut self, now: Instant) {
        let ttl = self.idle_ttl;
        let before = self.entries.len();
        self.entries.retain(|_, e| now.saturating_duration_since(e.touched) < ttl);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            debug!(target: "session", dropped, remaining = self.entries.len(), "Idle sessions evicted");
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self.entries
            .iter()
            .min_by_key(|(_, e)| e.touched)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            self.entries.remove(&id);
            debug!(target: "session", %id, "Session store full; oldest evicted");
        }
    }
}

pub struct AppState {
    pub pool: GeneratorPool,
    pub sessions: Arc<RwLock<SessionStore>>,
}

impl AppState {
    /// Build state from env: load source config, build the HTTP client and pool.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Result<Self, FetchError> {
        let sources = load_config_from_env()
            .map(|c| c.sources)
            .unwrap_or_default();
        info!(
            target: "trivia_backend",
            opentdb = %sources.opentdb_url,
            restcountries = %sources.restcountries_url,
            wikipedia = %sources.wikipedia_summary_url,
            timeout_secs = sources.timeout_secs,
            "Content sources configured"
        );
        let fetcher = HttpFetcher::new(sources.timeout())?;
        Ok(Self::with_pool(GeneratorPool::new(Arc::new(fetcher), sources, Dice::from_entropy())))
    }

    pub fn with_pool(pool: GeneratorPool) -> Self {
        Self::with_store(pool, SessionStore::new(MAX_SESSIONS, SESSION_IDLE_TTL))
    }

    pub fn with_store(pool: GeneratorPool, store: SessionStore) -> Self {
        Self {
            pool,
            sessions: Arc::new(RwLock::new(store)),
        }
    }

    /// Store (or overwrite) a session under its id.
    #[instrument(level = "debug", skip(self, session), fields(id = %session.id()))]
    pub async fn put_session(&self, session: Session) {
        self.sessions.write().await.insert(session, Instant::now());
    }

    /// Read-only copy of a session by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_session(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Transition the stored session under the write lock and return the result.
    /// `f` must not await; fetches happen before calling this.
    #[instrument(level = "debug", skip(self, f), fields(%id))]
    pub async fn update_session(&self, id: &str, f: impl FnOnce(Session) -> Session) -> Option<Session> {
        self.sessions.write().await.update(id, Instant::now(), f).cloned()
    }
}

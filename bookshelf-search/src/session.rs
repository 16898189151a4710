//! Search session controller.
//!
//! Owns the observable state of the current search and is its only
//! writer. Every submitted query bumps a session token; initial results,
//! errors and hydration events carry the token they were started under and
//! are dropped unless it is still current.
//!
//! ```text
//! Idle ──search──▶ Searching ──ok, nothing pending──▶ Ready
//!                      │     ──ok, pending──▶ Hydrating ──settled──▶ Ready
//!                      └──err──▶ Failed
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::cache::SearchCache;
use crate::catalog::search::{build_request, orchestrate_search};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::hydration::{hydrate_batch, HydrationEvent};
use crate::provider::CatalogProvider;
use crate::types::{BookRecord, SearchPage, SearchRequest, SearchType};

/// Shown when a search succeeds but nothing survives filtering.
pub const NO_RESULTS_NOTICE: &str = "No books found. Try different search terms or criteria.";

/// Where the current session is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing submitted yet, or cleared.
    #[default]
    Idle,
    /// Initial search in flight.
    Searching,
    /// Results shown, background hydration running.
    Hydrating,
    /// Results shown, nothing in flight.
    Ready,
    /// The initial search failed.
    Failed,
}

/// Completed / total hydration counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrationProgress {
    pub completed: usize,
    pub total: usize,
}

/// Everything a front end can observe about the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Monotonic session token; bumped by every search and clear.
    pub token: u64,
    pub phase: SessionPhase,
    pub records: Vec<BookRecord>,
    pub is_loading: bool,
    pub is_hydrating: bool,
    pub progress: HydrationProgress,
    pub error: Option<CatalogError>,
    /// Informational message that is not an error ("no results").
    pub notice: Option<String>,
    pub has_searched: bool,
    /// Provider hit count before filtering.
    pub total_found: u64,
}

impl SessionSnapshot {
    /// Whether nothing is in flight for this session.
    pub fn is_settled(&self) -> bool {
        !matches!(self.phase, SessionPhase::Searching | SessionPhase::Hydrating)
    }
}

struct Inner<P> {
    provider: Arc<P>,
    config: CatalogConfig,
    state: watch::Sender<SessionSnapshot>,
    cancel: Mutex<CancellationToken>,
    cache: Option<SearchCache>,
}

/// Drives searches against a [`CatalogProvider`] and publishes
/// [`SessionSnapshot`]s. Cheap to clone; clones share one session.
pub struct SessionController<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for SessionController<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: CatalogProvider + 'static> SessionController<P> {
    /// Create an idle session. A search page cache is attached unless
    /// `config.cache_ttl_seconds` is zero.
    pub fn new(provider: P, config: CatalogConfig) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                provider: Arc::new(provider),
                cache: SearchCache::from_ttl_seconds(config.cache_ttl_seconds),
                config,
                state,
                cancel: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    /// Watch the session; the receiver sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Wait until the current session has nothing in flight.
    pub async fn settled(&self) -> SessionSnapshot {
        let mut rx = self.subscribe();
        let snapshot = match rx.wait_for(SessionSnapshot::is_settled).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        snapshot
    }

    /// Discard the current session and return to `Idle`. Pending
    /// callbacks of the discarded session are ignored when they arrive.
    pub fn clear(&self) {
        let (token, _) = self.rotate(|token| SessionSnapshot {
            token,
            ..Default::default()
        });
        tracing::debug!(token, "session cleared");
    }

    /// Submit a query.
    ///
    /// Returns once the initial results (or error) are published. When
    /// some records need hydration a background task is spawned that
    /// merges them in as they complete; use [`settled`](Self::settled) or
    /// [`subscribe`](Self::subscribe) to follow it. A blank query only
    /// sets the error and leaves the current session running.
    pub async fn search(&self, query: &str, search_type: SearchType) {
        let request = match build_request(query, search_type, &self.inner.config) {
            Ok(request) => request,
            Err(err) => {
                self.inner.state.send_modify(|s| s.error = Some(err));
                return;
            }
        };

        let (token, cancel) = self.rotate(|token| SessionSnapshot {
            token,
            phase: SessionPhase::Searching,
            is_loading: true,
            has_searched: true,
            ..Default::default()
        });
        tracing::trace!(token, query = %request.query, %search_type, "search started");

        let page = match self.fetch_page(&request).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(token, error = %err, "search failed");
                self.update_if_current(token, |s| {
                    s.phase = SessionPhase::Failed;
                    s.is_loading = false;
                    s.error = Some(err);
                });
                return;
            }
        };

        let pending = page
            .records
            .iter()
            .filter(|r| r.is_hydration_candidate())
            .count();
        let applied = self.update_if_current(token, |s| {
            s.is_loading = false;
            s.total_found = page.total_found;
            s.records = page.records.clone();
            if s.records.is_empty() {
                s.notice = Some(NO_RESULTS_NOTICE.to_owned());
                s.phase = SessionPhase::Ready;
            } else if pending > 0 {
                s.phase = SessionPhase::Hydrating;
                s.is_hydrating = true;
                s.progress = HydrationProgress {
                    completed: 0,
                    total: pending,
                };
            } else {
                s.phase = SessionPhase::Ready;
            }
        });

        if !applied {
            tracing::debug!(token, "discarding results of superseded search");
            return;
        }
        if pending > 0 {
            self.spawn_hydration(token, page.records, cancel);
        }
    }

    async fn fetch_page(&self, request: &SearchRequest) -> Result<SearchPage, CatalogError> {
        if let Some(cache) = &self.inner.cache {
            if let Some(page) = cache.get(request).await {
                tracing::debug!(query = %request.query, "search cache hit");
                return Ok(page);
            }
        }
        let page = orchestrate_search(&*self.inner.provider, request, &self.inner.config).await?;
        if let Some(cache) = &self.inner.cache {
            cache.insert(request, page.clone()).await;
        }
        Ok(page)
    }

    fn spawn_hydration(&self, token: u64, records: Vec<BookRecord>, cancel: CancellationToken) {
        let session = self.clone();
        tokio::spawn(async move {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let provider = Arc::clone(&session.inner.provider);
            let config = session.inner.config.clone();

            let batch = async move {
                hydrate_batch(records, &*provider, &config, &tx, &cancel).await;
            };
            let merge = async {
                while let Some(event) = rx.recv().await {
                    session.apply_event(token, event);
                }
            };
            tokio::join!(batch, merge);

            session.update_if_current(token, |s| {
                s.is_hydrating = false;
                s.phase = SessionPhase::Ready;
            });
            tracing::debug!(token, "hydration settled");
        });
    }

    fn apply_event(&self, token: u64, event: HydrationEvent) {
        let work_key = event.record.work_key.clone();
        let applied = self.update_if_current(token, |s| {
            if let Some(slot) = s.records.iter_mut().find(|r| r.work_key == work_key) {
                if slot.is_hydration_candidate() {
                    *slot = event.record;
                }
            }
            s.progress.completed += 1;
        });
        if applied {
            tracing::debug!(token, %work_key, outcome = %event.outcome, "hydration merged");
        }
    }

    /// Cancel the running session and publish a fresh snapshot under the
    /// next token.
    fn rotate(&self, next: impl FnOnce(u64) -> SessionSnapshot) -> (u64, CancellationToken) {
        let mut cancel = self.lock_cancel();
        cancel.cancel();
        *cancel = CancellationToken::new();

        let mut token = 0;
        self.inner.state.send_modify(|s| {
            token = s.token + 1;
            *s = next(token);
        });
        (token, cancel.clone())
    }

    /// Apply `f` only if `token` is still current. Returns whether it was.
    fn update_if_current(&self, token: u64, f: impl FnOnce(&mut SessionSnapshot)) -> bool {
        self.inner.state.send_if_modified(|s| {
            if s.token != token {
                return false;
            }
            f(s);
            true
        })
    }

    fn lock_cancel(&self) -> MutexGuard<'_, CancellationToken> {
        self.inner
            .cancel
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<P> std::fmt::Debug for SessionController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.inner.state.borrow();
        f.debug_struct("SessionController")
            .field("token", &snapshot.token)
            .field("phase", &snapshot.phase)
            .field("records", &snapshot.records.len())
            .finish()
    }
}

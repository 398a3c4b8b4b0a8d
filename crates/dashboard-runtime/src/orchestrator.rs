//! Background dataset loader.
//!
//! Runs the [`DatasetCache`] in a tokio task, performing each load on a
//! blocking worker thread and forwarding [`LoadEvent`]s through an `mpsc`
//! channel so the TUI event loop never blocks on the network.

use std::sync::Arc;

use dashboard_core::models::{DataSource, RentalTable};
use tokio::sync::mpsc;
use tokio::time;

use crate::dataset_cache::{CachePolicy, DatasetCache};

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of one load, forwarded to the presentation layer.
#[derive(Debug, Clone)]
pub enum LoadEvent {
    Loaded(Arc<RentalTable>),
    /// Display message of the load error.
    Failed(String),
}

/// What the UI asks the loader to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest {
    /// Serve from cache when fresh, load otherwise.
    Fetch,
    /// Load again regardless of the cache.
    Refresh,
}

// ── LoadOrchestrator ──────────────────────────────────────────────────────────

/// Owns the cache and the source; consumed by [`LoadOrchestrator::start`].
pub struct LoadOrchestrator {
    source: DataSource,
    cache: DatasetCache,
}

impl LoadOrchestrator {
    pub fn new(source: DataSource, policy: CachePolicy) -> Self {
        Self::with_cache(source, DatasetCache::new(policy))
    }

    pub fn with_cache(source: DataSource, cache: DatasetCache) -> Self {
        Self { source, cache }
    }

    /// Spawn the loader task.
    ///
    /// The task loads once immediately, then on every request sent through
    /// the returned [`LoadHandle`]. Under a TTL policy it also reloads each
    /// time the TTL elapses. It exits when either channel closes.
    pub fn start(self) -> (mpsc::Receiver<LoadEvent>, LoadHandle) {
        let (events_tx, events_rx) = mpsc::channel(8);
        let (requests_tx, requests_rx) = mpsc::channel(8);

        let handle = tokio::spawn(async move {
            self.run(events_tx, requests_rx).await;
        });

        (
            events_rx,
            LoadHandle {
                handle,
                requests: requests_tx,
            },
        )
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn run(
        self,
        events: mpsc::Sender<LoadEvent>,
        mut requests: mpsc::Receiver<LoadRequest>,
    ) {
        let LoadOrchestrator { source, cache } = self;
        let mut cache = Some(cache);

        let mut ttl_timer = match cache.as_ref().map(DatasetCache::policy) {
            // A zero TTL serves every fetch fresh; there is no period to tick on.
            Some(CachePolicy::Ttl(ttl)) if !ttl.is_zero() => {
                let mut interval = time::interval(ttl);
                // The first tick fires immediately; the initial fetch covers it.
                interval.tick().await;
                Some(interval)
            }
            _ => None,
        };

        let mut next = Some(LoadRequest::Fetch);
        loop {
            if let Some(request) = next.take() {
                let Some(owned) = cache.take() else { break };
                match load_on_worker(owned, source.clone(), request).await {
                    Some((returned, event)) => {
                        cache = Some(returned);
                        if events.send(event).await.is_err() {
                            tracing::debug!("load event channel closed; exiting loader");
                            break;
                        }
                    }
                    None => break,
                }
            }

            next = tokio::select! {
                request = requests.recv() => match request {
                    Some(request) => Some(request),
                    None => break,
                },
                _ = tick(&mut ttl_timer) => Some(LoadRequest::Refresh),
            };
        }
    }
}

/// Run one cache operation on the blocking pool, handing the cache back.
///
/// Returns `None` only if the worker panicked, in which case the cache is
/// lost and the loader stops.
async fn load_on_worker(
    mut cache: DatasetCache,
    source: DataSource,
    request: LoadRequest,
) -> Option<(DatasetCache, LoadEvent)> {
    let joined = tokio::task::spawn_blocking(move || {
        let result = match request {
            LoadRequest::Fetch => cache.get(&source),
            LoadRequest::Refresh => cache.refresh(&source),
        };
        let event = match result {
            Ok(table) => LoadEvent::Loaded(table),
            Err(e) => LoadEvent::Failed(e.to_string()),
        };
        (cache, event)
    })
    .await;

    match joined {
        Ok(pair) => Some(pair),
        Err(e) => {
            tracing::error!(error = %e, "dataset loader worker failed");
            None
        }
    }
}

/// Wait for the next TTL tick, or forever when there is no TTL.
async fn tick(timer: &mut Option<time::Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

// ── LoadHandle ────────────────────────────────────────────────────────────────

/// Handle to the background loader task.
pub struct LoadHandle {
    handle: tokio::task::JoinHandle<()>,
    requests: mpsc::Sender<LoadRequest>,
}

impl LoadHandle {
    /// Ask for a forced reload. Returns `false` when the request could not be
    /// queued (loader busy with a full queue, or stopped).
    pub fn request_refresh(&self) -> bool {
        self.send(LoadRequest::Refresh)
    }

    /// Ask for a cache-respecting fetch.
    pub fn request_fetch(&self) -> bool {
        self.send(LoadRequest::Fetch)
    }

    fn send(&self, request: LoadRequest) -> bool {
        match self.requests.try_send(request) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "could not queue load request");
                false
            }
        }
    }

    /// Immediately abort the loader task.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

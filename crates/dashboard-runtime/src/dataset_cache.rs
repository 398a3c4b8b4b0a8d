//! Single-entry dataset cache.
//!
//! Holds at most one loaded [`RentalTable`], keyed by the [`DataSource`] it
//! came from. Callers use [`DatasetCache::get`] to obtain a cached-or-fresh
//! table; the cache handles key changes, the staleness policy and keeps the
//! previous entry when a reload fails.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashboard_core::error::DataLoadError;
use dashboard_core::models::{DataSource, RentalTable};
use dashboard_data::reader;

// ── CachePolicy ───────────────────────────────────────────────────────────────

/// When a cached table stops being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Loaded once and kept until invalidated. The dataset is static.
    #[default]
    Never,
    /// Reloaded on the first request after the entry is older than the TTL.
    Ttl(Duration),
}

impl CachePolicy {
    pub fn from_ttl(ttl: Option<Duration>) -> Self {
        ttl.map_or(CachePolicy::Never, CachePolicy::Ttl)
    }
}

/// Function that produces a table for a source; [`reader::load`] in production.
pub type LoadFn = Box<dyn Fn(&DataSource) -> Result<RentalTable, DataLoadError> + Send>;

struct CacheEntry {
    source: DataSource,
    table: Arc<RentalTable>,
    loaded_at: Instant,
}

// ── DatasetCache ──────────────────────────────────────────────────────────────

/// Explicit single-entry cache around the dataset loader.
///
/// # Example
/// ```no_run
/// use dashboard_core::models::DataSource;
/// use dashboard_runtime::dataset_cache::{CachePolicy, DatasetCache};
///
/// let mut cache = DatasetCache::new(CachePolicy::Never);
/// let table = cache.get(&DataSource::default()).expect("load");
/// println!("{} rows", table.len());
/// ```
pub struct DatasetCache {
    policy: CachePolicy,
    loader: LoadFn,
    entry: Option<CacheEntry>,
    last_error: Option<String>,
    loads: usize,
}

impl DatasetCache {
    /// Cache backed by the CSV reader.
    pub fn new(policy: CachePolicy) -> Self {
        Self::with_loader(policy, reader::load)
    }

    /// Cache backed by a custom loader.
    pub fn with_loader(
        policy: CachePolicy,
        loader: impl Fn(&DataSource) -> Result<RentalTable, DataLoadError> + Send + 'static,
    ) -> Self {
        Self {
            policy,
            loader: Box::new(loader),
            entry: None,
            last_error: None,
            loads: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the table for `source`, loading it when there is no fresh entry
    /// for that key.
    ///
    /// A failed load is returned as-is; there are no retries. The previous
    /// entry (if any) is kept.
    pub fn get(&mut self, source: &DataSource) -> Result<Arc<RentalTable>, DataLoadError> {
        if let Some(entry) = self.entry.as_ref() {
            if self.is_fresh(source) {
                tracing::debug!("serving cached dataset for {}", source);
                return Ok(Arc::clone(&entry.table));
            }
        }
        self.load(source)
    }

    /// Reload `source` regardless of the current entry.
    pub fn refresh(&mut self, source: &DataSource) -> Result<Arc<RentalTable>, DataLoadError> {
        self.load(source)
    }

    /// Drop the current entry so the next [`Self::get`] loads again.
    pub fn invalidate(&mut self) {
        self.entry = None;
        tracing::debug!("dataset cache invalidated");
    }

    /// `true` when there is an entry for `source` that the policy still accepts.
    pub fn is_fresh(&self, source: &DataSource) -> bool {
        match (&self.entry, self.policy) {
            (Some(entry), _) if entry.source != *source => false,
            (Some(_), CachePolicy::Never) => true,
            (Some(entry), CachePolicy::Ttl(ttl)) => entry.loaded_at.elapsed() < ttl,
            (None, _) => false,
        }
    }

    /// The cached table, fresh or not.
    pub fn cached(&self) -> Option<Arc<RentalTable>> {
        self.entry.as_ref().map(|e| Arc::clone(&e.table))
    }

    /// Age of the current entry.
    pub fn cache_age(&self) -> Option<Duration> {
        self.entry.as_ref().map(|e| e.loaded_at.elapsed())
    }

    /// Message of the last failed load; cleared by the next successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of loads attempted so far.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn load(&mut self, source: &DataSource) -> Result<Arc<RentalTable>, DataLoadError> {
        self.loads += 1;
        match (self.loader)(source) {
            Ok(table) => {
                let table = Arc::new(table);
                self.entry = Some(CacheEntry {
                    source: source.clone(),
                    table: Arc::clone(&table),
                    loaded_at: Instant::now(),
                });
                self.last_error = None;
                tracing::debug!(rows = table.len(), "dataset cache updated");
                Ok(table)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dataset load failed; keeping previous entry");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::models::NumericColumn;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn table(rows: usize) -> RentalTable {
        let first = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let dates = (0..rows)
            .map(|i| first + chrono::Duration::days(i as i64))
            .collect();
        RentalTable::new(
            "dteday",
            dates,
            vec![NumericColumn::new("cnt", vec![1.0; rows])],
        )
        .unwrap()
    }

    fn source(name: &str) -> DataSource {
        DataSource::File(PathBuf::from(name))
    }

    /// Loader that returns a table with one row per call so far.
    fn counting_cache(policy: CachePolicy) -> (DatasetCache, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cache = DatasetCache::with_loader(policy, move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(table(n))
        });
        (cache, calls)
    }

    // ── get ───────────────────────────────────────────────────────────────

    #[test]
    fn test_get_loads_once_with_never_policy() {
        let (mut cache, calls) = counting_cache(CachePolicy::Never);
        let a = cache.get(&source("day.csv")).unwrap();
        let b = cache.get(&source("day.csv")).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(cache.cache_age().is_some());
    }

    #[test]
    fn test_get_reloads_on_key_change() {
        let (mut cache, calls) = counting_cache(CachePolicy::Never);
        cache.get(&source("a.csv")).unwrap();
        let b = cache.get(&source("b.csv")).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(b.len(), 2);
        assert!(!cache.is_fresh(&source("a.csv")));
    }

    #[test]
    fn test_ttl_policy_expires() {
        let (mut cache, calls) = counting_cache(CachePolicy::Ttl(Duration::from_millis(20)));
        cache.get(&source("day.csv")).unwrap();
        assert!(cache.is_fresh(&source("day.csv")));

        std::thread::sleep(Duration::from_millis(40));
        assert!(!cache.is_fresh(&source("day.csv")));
        cache.get(&source("day.csv")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_refresh_and_invalidate() {
        let (mut cache, calls) = counting_cache(CachePolicy::Never);
        cache.get(&source("day.csv")).unwrap();
        cache.refresh(&source("day.csv")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cache.invalidate();
        assert!(cache.cached().is_none());
        cache.get(&source("day.csv")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.load_count(), 3);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn test_failed_refresh_keeps_previous_entry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut cache = DatasetCache::with_loader(CachePolicy::Never, move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(table(3))
            } else {
                Err(DataLoadError::Empty)
            }
        });

        cache.get(&source("day.csv")).unwrap();
        let err = cache.refresh(&source("day.csv")).unwrap_err();

        assert!(matches!(err, DataLoadError::Empty));
        assert_eq!(cache.cached().map(|t| t.len()), Some(3));
        assert_eq!(cache.last_error(), Some("Dataset contains no rows"));
        // No retries.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_success_clears_last_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut cache = DatasetCache::with_loader(CachePolicy::Never, move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(DataLoadError::Empty)
            } else {
                Ok(table(1))
            }
        });

        assert!(cache.get(&source("day.csv")).is_err());
        assert!(cache.last_error().is_some());
        assert!(cache.get(&source("day.csv")).is_ok());
        assert!(cache.last_error().is_none());
    }

    #[test]
    fn test_policy_from_ttl() {
        assert_eq!(CachePolicy::from_ttl(None), CachePolicy::Never);
        assert_eq!(
            CachePolicy::from_ttl(Some(Duration::from_secs(5))),
            CachePolicy::Ttl(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_reader_backed_cache_reports_missing_file() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let mut cache = DatasetCache::new(CachePolicy::Never);
        let result = cache.get(&DataSource::File(dir.path().join("absent.csv")));
        assert!(matches!(result, Err(DataLoadError::FileRead { .. })));
    }
}

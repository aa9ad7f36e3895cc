// Cached async queries with single-flight de-duplication
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

/// The one key the book-list query lives under
pub const BOOKS_QUERY_KEY: &str = "books";

/// A read failure as the cache remembers it
///
/// The cache keeps errors as plain strings: by the time a failure reaches the
/// presentation layer there's nothing to do with it but show a generic message
/// and offer a retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("fetch failed: {0}")]
pub struct FetchError(pub String);

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync>;

/// Point-in-time view of a query's state
///
/// `is_loading` is true only while the very first fetch is in flight.
/// Later fetches report `is_refetching` instead, and `data` keeps the
/// previous successful value until the new one lands.
#[derive(Debug)]
pub struct QuerySnapshot<T> {
    pub data: Option<Arc<T>>,
    pub error: Option<FetchError>,
    pub is_loading: bool,
    pub is_refetching: bool,
}

impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
            is_refetching: self.is_refetching,
        }
    }
}

impl<T> QuerySnapshot<T> {
    pub fn is_fetching(&self) -> bool {
        self.is_loading || self.is_refetching
    }
}

struct QueryState<T> {
    data: Option<Arc<T>>,
    error: Option<FetchError>,
    /// Generation of the request currently in flight, if any
    in_flight: Option<u64>,
    /// Monotonic counter handed out when a request starts
    latest_started: u64,
    /// Highest generation whose result has been applied
    applied: u64,
    ever_completed: bool,
    /// Set on invalidation to the generation current at that moment; only a
    /// request started *after* this mark counts as fresh again
    stale_since: Option<u64>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            in_flight: None,
            latest_started: 0,
            applied: 0,
            ever_completed: false,
            stale_since: None,
        }
    }
}

enum Plan {
    /// This caller owns the request for the given generation
    Run(u64),
    /// Someone else is already fetching; wait for that generation
    Join(u64),
    /// Nothing to do, current state stands
    Settled,
}

/// One cached query: a stored fetcher plus the last known result
pub struct Query<T> {
    fetcher: Fetcher<T>,
    state: Mutex<QueryState<T>>,
    done_tx: watch::Sender<u64>,
}

impl<T: Send + Sync + 'static> Query<T> {
    pub fn new<F>(fetcher: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync + 'static,
    {
        let (done_tx, _) = watch::channel(0);
        Self {
            fetcher: Arc::new(fetcher),
            state: Mutex::new(QueryState::default()),
            done_tx,
        }
    }

    /// Current state without triggering anything
    pub fn snapshot(&self) -> QuerySnapshot<T> {
        let s = self.lock();
        QuerySnapshot {
            data: s.data.clone(),
            error: s.error.clone(),
            is_loading: s.in_flight.is_some() && !s.ever_completed,
            is_refetching: s.in_flight.is_some() && s.ever_completed,
        }
    }

    /// Make sure this query has been executed at least once
    ///
    /// Runs the fetcher if the query has never completed or has been
    /// invalidated; joins an in-flight request rather than starting a second
    /// one. A settled query (even a settled failure) is left alone - the way
    /// back from an error is [`Query::refetch`].
    pub async fn fetch(&self) -> QuerySnapshot<T> {
        let plan = {
            let mut s = self.lock();
            if let Some(generation) = s.in_flight {
                Plan::Join(generation)
            } else if s.ever_completed && s.stale_since.is_none() {
                Plan::Settled
            } else {
                Plan::Run(s.begin())
            }
        };
        self.execute(plan).await
    }

    /// Force a new execution of the query
    ///
    /// Single-flight: a refetch issued while a request is already in flight
    /// joins it instead of stacking a second request on the wire.
    pub async fn refetch(&self) -> QuerySnapshot<T> {
        let plan = {
            let mut s = self.lock();
            if let Some(generation) = s.in_flight {
                debug!(generation, "refetch joined in-flight request");
                Plan::Join(generation)
            } else {
                Plan::Run(s.begin())
            }
        };
        self.execute(plan).await
    }

    /// Mark the cached value stale so the next [`Query::fetch`] re-executes
    ///
    /// The retained data stays visible until the replacement arrives. A
    /// request already in flight when the invalidation lands cannot clear it:
    /// it started before whatever made the data stale, so its result is
    /// already suspect.
    pub fn invalidate(&self) {
        let mut s = self.lock();
        s.stale_since = Some(s.latest_started);
    }

    async fn execute(&self, plan: Plan) -> QuerySnapshot<T> {
        match plan {
            Plan::Settled => self.snapshot(),
            Plan::Join(generation) => self.wait_for(generation).await,
            Plan::Run(generation) => self.run(generation).await,
        }
    }

    async fn run(&self, generation: u64) -> QuerySnapshot<T> {
        debug!(generation, "executing query");
        let result = (self.fetcher)().await;

        {
            let mut s = self.lock();
            // A response from a superseded request must never overwrite the
            // result of one that started later.
            if generation >= s.applied {
                match result {
                    Ok(value) => {
                        s.data = Some(Arc::new(value));
                        s.error = None;
                    }
                    Err(err) => {
                        warn!(generation, "query failed: {}", err);
                        s.error = Some(err);
                    }
                }
                s.applied = generation;
                // Only a request started after the invalidation mark makes
                // the entry fresh again
                if s.stale_since.is_some_and(|mark| generation > mark) {
                    s.stale_since = None;
                }
            } else {
                debug!(generation, "discarding stale response");
            }
            if s.in_flight == Some(generation) {
                s.in_flight = None;
            }
            s.ever_completed = true;
        }

        // Receivers may all be gone; that's fine
        let _ = self.done_tx.send(generation);
        self.snapshot()
    }

    async fn wait_for(&self, generation: u64) -> QuerySnapshot<T> {
        let mut done_rx = self.done_tx.subscribe();
        loop {
            if *done_rx.borrow_and_update() >= generation {
                break;
            }
            if done_rx.changed().await.is_err() {
                break;
            }
        }
        self.snapshot()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueryState<T>> {
        self.state.lock().expect("query state lock poisoned")
    }
}

impl<T> QueryState<T> {
    fn begin(&mut self) -> u64 {
        self.latest_started += 1;
        self.in_flight = Some(self.latest_started);
        self.latest_started
    }
}

/// Holds named queries so callers share one entry per key
///
/// Built to be constructed and passed around explicitly - tests get their own
/// isolated instance instead of fighting over a process-wide singleton.
pub struct QueryCache<T> {
    queries: Mutex<HashMap<String, Arc<Query<T>>>>,
}

impl<T: Send + Sync + 'static> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            queries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a query under `key`, or return the one already there
    ///
    /// First registration wins so every caller shares the same entry and its
    /// in-flight de-duplication.
    pub fn register<F>(&self, key: &str, fetcher: F) -> Arc<Query<T>>
    where
        F: Fn() -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync + 'static,
    {
        let mut queries = self.queries.lock().expect("query map lock poisoned");
        queries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Query::new(fetcher)))
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<Arc<Query<T>>> {
        let queries = self.queries.lock().expect("query map lock poisoned");
        queries.get(key).cloned()
    }

    /// Mark the query under `key` stale, if it exists
    pub fn invalidate(&self, key: &str) {
        if let Some(query) = self.get(key) {
            debug!(key, "invalidating query");
            query.invalidate();
        }
    }
}

impl<T: Send + Sync + 'static> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

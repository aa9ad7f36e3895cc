// Book service with caching support
use crate::models::{Book, BookDraft};
use crate::store::{BookStore, WriteOutcome};
use futures::future::BoxFuture;
use shelfscout_cache::{FetchError, Query, QueryCache, BOOKS_QUERY_KEY};
use std::sync::Arc;
use tracing::{debug, info};

/// The service the rest of the app talks to
///
/// Wires the store behind the query cache (grounding every read in the
/// cached, de-duplicated books query) and routes writes straight through,
/// invalidating the cached list afterwards so the next read refetches.
pub struct Library {
    store: Arc<dyn BookStore>,
    cache: Arc<QueryCache<Vec<Book>>>,
    books: Arc<Query<Vec<Book>>>,
}

impl Library {
    /// Both collaborators are passed in - no module-level singletons, so
    /// every test can build an isolated instance.
    pub fn new(store: Arc<dyn BookStore>, cache: Arc<QueryCache<Vec<Book>>>) -> Self {
        let books = {
            let store = Arc::clone(&store);
            cache.register(
                BOOKS_QUERY_KEY,
                move || -> BoxFuture<'static, Result<Vec<Book>, FetchError>> {
                    let store = Arc::clone(&store);
                    Box::pin(async move {
                        store.list().await.map_err(|e| FetchError(e.to_string()))
                    })
                },
            )
        };

        Self {
            store,
            cache,
            books,
        }
    }

    /// The cached book-list query
    pub fn books(&self) -> Arc<Query<Vec<Book>>> {
        Arc::clone(&self.books)
    }

    pub async fn create(&self, draft: &BookDraft) -> WriteOutcome {
        let outcome = self.store.create(draft).await;
        self.after_write("create", &outcome);
        outcome
    }

    pub async fn update(&self, book: &Book) -> WriteOutcome {
        let outcome = self.store.update(book).await;
        self.after_write("update", &outcome);
        outcome
    }

    pub async fn delete(&self, id: i64) -> WriteOutcome {
        let outcome = self.store.delete(id).await;
        self.after_write("delete", &outcome);
        outcome
    }

    fn after_write(&self, op: &str, outcome: &WriteOutcome) {
        if outcome.is_ok() {
            info!("{} succeeded, invalidating cached book list", op);
            self.cache.invalidate(BOOKS_QUERY_KEY);
        } else {
            // A failed write changed nothing remotely; the cache stays valid
            debug!("{} failed with status {}", op, outcome.status);
        }
    }
}

// The seam between core and the remote collection
use crate::config::Config;
use crate::models::{Book, BookDraft};
use shelfscout_api::{StoreError, SupabaseClient};
use thiserror::Error;
use tracing::{debug, error};

/// What went wrong with a write, as a kind rather than a caught throwable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error("no backend configured")]
    BackendUnavailable,

    #[error("invalid published date: {0}")]
    InvalidDate(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("backend rejected the write (status {status}): {message}")]
    Service { status: u16, message: String },
}

/// Uniform result shape for create/update/delete
///
/// Writes never return `Err`: every failure is caught at this layer, logged,
/// and handed back as `{rows, error, status}` so callers see one shape no
/// matter what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// Affected records as the backend returned them; empty on failure
    pub rows: Vec<Book>,
    pub error: Option<WriteError>,
    pub status: u16,
}

impl WriteOutcome {
    pub fn success(rows: Vec<Book>, status: u16) -> Self {
        Self {
            rows,
            error: None,
            status,
        }
    }

    /// Locally-detected failures report 500; backend rejections keep their status
    pub fn failure(error: WriteError) -> Self {
        let status = match &error {
            WriteError::Service { status, .. } => *status,
            _ => 500,
        };
        Self {
            rows: Vec::new(),
            error: Some(error),
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn normalize(err: StoreError) -> WriteError {
    match err {
        StoreError::Service { status, message } => WriteError::Service { status, message },
        StoreError::AuthRequired => WriteError::Service {
            status: 401,
            message: "authentication rejected".into(),
        },
        StoreError::NotFound(what) => WriteError::Service {
            status: 404,
            message: format!("not found: {}", what),
        },
        StoreError::MissingId => WriteError::Service {
            status: 400,
            message: "record has no id".into(),
        },
        StoreError::NetworkError(e) => WriteError::Network(e.to_string()),
        StoreError::ParseError(e) => WriteError::Network(format!("bad response body: {}", e)),
    }
}

/// Trait for book stores - makes testing easier and keeps things flexible
///
/// The remote adapter implements this for real; tests swap in mocks so the
/// service layer never needs a live backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookStore: Send + Sync {
    /// All records, or an empty list when no backend is configured
    async fn list(&self) -> crate::Result<Vec<Book>>;
    async fn create(&self, draft: &BookDraft) -> WriteOutcome;
    async fn update(&self, book: &Book) -> WriteOutcome;
    async fn delete(&self, id: i64) -> WriteOutcome;
}

/// [`BookStore`] backed by the hosted collection
///
/// Holds an optional client: running without a configured backend is legal
/// and reads come back empty instead of failing.
pub struct RemoteStore {
    client: Option<SupabaseClient>,
}

impl RemoteStore {
    pub fn new(client: Option<SupabaseClient>) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = config
            .backend
            .as_ref()
            .map(|backend| SupabaseClient::new(&backend.url, &backend.anon_key));
        if client.is_none() {
            debug!("no backend configured, shelf will be empty");
        }
        Self { client }
    }
}

#[async_trait::async_trait]
impl BookStore for RemoteStore {
    async fn list(&self) -> crate::Result<Vec<Book>> {
        match &self.client {
            // Backend unavailable reads as an empty shelf, not an error
            None => Ok(Vec::new()),
            Some(client) => Ok(client.list().await?),
        }
    }

    async fn create(&self, draft: &BookDraft) -> WriteOutcome {
        let Some(client) = &self.client else {
            error!("create failed: no backend configured");
            return WriteOutcome::failure(WriteError::BackendUnavailable);
        };

        let published_date = match draft.published_epoch() {
            Ok(epoch) => epoch,
            Err(e) => {
                error!("create failed: {}", e);
                return WriteOutcome::failure(WriteError::InvalidDate(draft.published_date.clone()));
            }
        };

        let record = Book {
            id: None,
            title: draft.title.clone(),
            author: draft.author.clone(),
            published_date,
            genre: draft.genre.clone(),
        };

        match client.insert(&record).await {
            Ok(rows) => WriteOutcome::success(rows, 201),
            Err(e) => {
                error!("create failed: {}", e);
                WriteOutcome::failure(normalize(e))
            }
        }
    }

    async fn update(&self, book: &Book) -> WriteOutcome {
        let Some(client) = &self.client else {
            error!("update failed: no backend configured");
            return WriteOutcome::failure(WriteError::BackendUnavailable);
        };

        match client.update(book).await {
            Ok(rows) => WriteOutcome::success(rows, 200),
            Err(e) => {
                error!("update failed: {}", e);
                WriteOutcome::failure(normalize(e))
            }
        }
    }

    async fn delete(&self, id: i64) -> WriteOutcome {
        let Some(client) = &self.client else {
            error!("delete failed: no backend configured");
            return WriteOutcome::failure(WriteError::BackendUnavailable);
        };

        match client.delete(id).await {
            Ok(rows) => WriteOutcome::success(rows, 200),
            Err(e) => {
                error!("delete failed: {}", e);
                WriteOutcome::failure(normalize(e))
            }
        }
    }
}

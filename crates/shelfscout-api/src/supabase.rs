use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::Book;

const BOOKS_TABLE: &str = "books";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed with status {status}: {message}")]
    Service { status: u16, message: String },

    #[error("authentication rejected by the backend")]
    AuthRequired,

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("record has no id yet, nothing to target")]
    MissingId,

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl StoreError {
    /// HTTP status to report for this failure; locally-detected ones get 500
    pub fn status(&self) -> u16 {
        match self {
            StoreError::Service { status, .. } => *status,
            StoreError::AuthRequired => 401,
            StoreError::NotFound(_) => 404,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Client for a Supabase-hosted books collection
///
/// Talks PostgREST: one table, addressed via query-string filters, with the
/// project API key sent both as `apikey` and as a bearer token.
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("shelfscout/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        let base_url: String = base_url.into();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, BOOKS_TABLE)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key),
            )
    }

    /// Fetch every record in the collection. No filtering, no pagination.
    pub async fn list(&self) -> Result<Vec<Book>> {
        let request = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "*")]);

        debug!("listing {}", BOOKS_TABLE);
        let response = request.send().await?;
        Self::parse_rows(response).await
    }

    /// Insert one record. `book.id` must be `None`; the backend assigns one.
    pub async fn insert(&self, book: &Book) -> Result<Vec<Book>> {
        let request = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(book);

        debug!("inserting into {}", BOOKS_TABLE);
        let response = request.send().await?;
        Self::parse_rows(response).await
    }

    /// Update the record matching `book.id`, sending the full record.
    pub async fn update(&self, book: &Book) -> Result<Vec<Book>> {
        let id = book.id.ok_or(StoreError::MissingId)?;

        let request = self
            .authed(self.client.patch(self.table_url()))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(book);

        debug!("updating {} id={}", BOOKS_TABLE, id);
        let response = request.send().await?;
        Self::parse_rows(response).await
    }

    /// Delete the record matching `id`.
    pub async fn delete(&self, id: i64) -> Result<Vec<Book>> {
        let request = self
            .authed(self.client.delete(self.table_url()))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation");

        debug!("deleting {} id={}", BOOKS_TABLE, id);
        let response = request.send().await?;
        Self::parse_rows(response).await
    }

    async fn parse_rows<T: DeserializeOwned>(response: reqwest::Response) -> Result<Vec<T>> {
        let status = response.status();

        if status == 401 || status == 403 {
            return Err(StoreError::AuthRequired);
        }

        if status == 404 {
            return Err(StoreError::NotFound(BOOKS_TABLE.to_string()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Service {
                status: status.as_u16(),
                message,
            });
        }

        // 204 No Content comes back when no representation was asked for
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let rows: Vec<T> = response.json().await?;
        Ok(rows)
    }
}

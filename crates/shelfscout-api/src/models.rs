use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A book record as it lives in the remote collection
///
/// The backend stores `publishedDate` as an integer column holding epoch
/// seconds, so that's what travels over the wire. Humans get a formatted
/// date back via [`Book::published_date_display`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Generated by the backend; absent until the record exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    #[serde(rename = "publishedDate")]
    pub published_date: i64,
    /// Books without a genre never show up in any tab
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl Book {
    /// Format the stored epoch seconds as a calendar date for display
    pub fn published_date_display(&self) -> String {
        match DateTime::<Utc>::from_timestamp(self.published_date, 0) {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => self.published_date.to_string(),
        }
    }
}

/// Client-side input for creating a book
///
/// `published_date` is the human-readable form; it gets converted to epoch
/// seconds before the insert is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub published_date: String,
    pub genre: Option<String>,
}

impl BookDraft {
    /// Convert the draft's date string to the epoch seconds the backend expects
    pub fn published_epoch(&self) -> Result<i64, DateParseError> {
        parse_published_date(&self.published_date)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a recognizable date: {0}")]
pub struct DateParseError(pub String);

/// Parse a human-readable date into epoch seconds
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. A bare date is
/// taken as midnight UTC, matching how the records were originally written.
pub fn parse_published_date(raw: &str) -> Result<i64, DateParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.timestamp());
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // and_hms_opt(0, 0, 0) cannot fail for midnight
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp());
        }
    }

    Err(DateParseError(raw.to_string()))
}

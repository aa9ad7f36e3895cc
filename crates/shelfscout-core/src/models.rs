// The record types travel with the wire layer; core re-exports them so
// downstream crates only need one import path.
pub use shelfscout_api::models::{parse_published_date, Book, BookDraft, DateParseError};

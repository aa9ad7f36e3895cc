// In-memory query caching layer
// Keeps duplicate requests off the wire and remembers the last result

pub mod query;

pub use query::{FetchError, Query, QueryCache, QuerySnapshot, BOOKS_QUERY_KEY};

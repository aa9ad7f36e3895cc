// Client for the hosted books collection
pub mod models;
pub mod supabase;

// Re-export common types
pub use models::{parse_published_date, Book, BookDraft, DateParseError};
pub use supabase::{StoreError, SupabaseClient};

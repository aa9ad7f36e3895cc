// Core business logic lives here - the brain of the operation
pub mod categorize;
pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod store;

pub use categorize::{categorize, CategoryMap};
pub use config::Config;
pub use error::Error;
pub use library::Library;
pub use models::{Book, BookDraft};
pub use store::{BookStore, RemoteStore, WriteError, WriteOutcome};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;

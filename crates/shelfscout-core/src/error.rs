use thiserror::Error;

/// All the ways things can go wrong in shelfscout
///
/// We use thiserror here because it generates the boilerplate for us.
/// Life's too short to manually implement Display and Error traits.
///
/// Write failures deliberately do NOT live here - they come back as
/// [`crate::store::WriteOutcome`] values instead of errors, so the
/// caller always gets the normalized `{rows, error, status}` shape.
#[derive(Error, Debug)]
pub enum Error {
    #[error("remote store error: {0}")]
    StoreError(#[from] shelfscout_api::StoreError),

    #[error("cache operation failed: {0}")]
    CacheError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

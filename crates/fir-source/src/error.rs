//! Data-source errors.

/// Error returned by a [`Source`](crate::Source).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SourceError {
    /// Document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection name.
        collection: String,
        /// Document id.
        id: String,
    },
    /// Document id is empty or contains `/`.
    #[error("invalid document id {0:?}")]
    InvalidId(String),
    /// Collection name is empty or contains `/`.
    #[error("invalid collection name {0:?}")]
    InvalidCollection(String),
    /// Backend cannot serve the request.
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Check a collection name and document id.
    ///
    /// Backends call this before touching storage.
    pub fn check_key(collection: &str, id: &str) -> Result<(), Self> {
        if collection.is_empty() || collection.contains('/') {
            return Err(Self::InvalidCollection(collection.to_owned()));
        }
        if id.is_empty() || id.contains('/') {
            return Err(Self::InvalidId(id.to_owned()));
        }
        Ok(())
    }
}

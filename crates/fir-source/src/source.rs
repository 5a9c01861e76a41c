//! Data-source trait.

use crate::document::Document;
use crate::error::SourceError;
use crate::event::{SnapshotReceiver, SubscriptionHandle};
use crate::query::Query;

/// Document store consumed by views.
///
/// Implementations deliver snapshots synchronously through channels; a
/// view drains the receiver and reconciles one snapshot at a time.
pub trait Source: Send + Sync {
    /// Subscribe to the results of `query`.
    ///
    /// The first snapshot describes the current result with every document
    /// as [`ChangeKind::Added`](crate::ChangeKind::Added). Later snapshots
    /// carry only the changes. Delivery stops when the handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the query cannot be served.
    fn subscribe(&self, query: &Query)
    -> Result<(SnapshotReceiver, SubscriptionHandle), SourceError>;

    /// Fetch one document. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on an invalid key or an unavailable backend.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, SourceError>;

    /// Create or replace a document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on an invalid key or an unavailable backend.
    fn put(&self, collection: &str, doc: Document) -> Result<(), SourceError>;
}

//! In-memory source for tests and the command line.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError, mpsc};

use crate::document::Document;
use crate::error::SourceError;
use crate::event::{Change, ChangeKind, Snapshot, SnapshotReceiver, SubscriptionHandle};
use crate::query::Query;
use crate::source::Source;

struct Subscriber {
    query: Query,
    tx: mpsc::Sender<Snapshot>,
    shutdown: mpsc::Receiver<()>,
    /// Result delivered with the last snapshot.
    current: Vec<Document>,
}

impl Subscriber {
    fn is_cancelled(&self) -> bool {
        matches!(
            self.shutdown.try_recv(),
            Err(mpsc::TryRecvError::Disconnected)
        )
    }
}

#[derive(Default)]
struct State {
    collections: BTreeMap<String, BTreeMap<String, Document>>,
    subscribers: Vec<Subscriber>,
}

impl State {
    fn documents(&self, collection: &str) -> impl Iterator<Item = &Document> {
        self.collections
            .get(collection)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    /// Recompute every subscription on `collection` and send the differences.
    fn notify(&mut self, collection: &str, touched: &str) {
        let Self {
            collections,
            subscribers,
        } = self;
        let docs = collections.get(collection);

        subscribers.retain_mut(|subscriber| {
            if subscriber.is_cancelled() {
                return false;
            }
            if subscriber.query.collection != collection {
                return true;
            }

            let result = subscriber
                .query
                .apply(docs.into_iter().flat_map(BTreeMap::values));
            let changes = diff(&subscriber.current, &result, touched);
            if changes.is_empty() {
                return true;
            }

            let snapshot = Snapshot {
                size: result.len(),
                changes,
            };
            subscriber.current = result;
            subscriber.tx.send(snapshot).is_ok()
        });
    }
}

/// Changes turning `before` into `after`, where `touched` is the written id.
fn diff(before: &[Document], after: &[Document], touched: &str) -> Vec<Change> {
    let mut changes: Vec<Change> = after
        .iter()
        .filter_map(|doc| match before.iter().find(|old| old.id == doc.id) {
            None => Some(Change::new(ChangeKind::Added, doc.clone())),
            Some(old) if doc.id == touched && old != doc => {
                Some(Change::new(ChangeKind::Modified, doc.clone()))
            }
            Some(_) => None,
        })
        .collect();

    changes.extend(
        before
            .iter()
            .filter(|old| after.iter().all(|doc| doc.id != old.id))
            .map(|old| Change::new(ChangeKind::Removed, old.clone())),
    );
    changes
}

/// In-memory document source.
///
/// Every write is delivered to matching subscriptions right away, on the
/// writing thread.
///
/// # Example
///
/// ```
/// use fir_source::{Document, MockSource, Query, Source};
///
/// let source = MockSource::new()
///     .with_document("restaurants", Document::new("r1").with_field("name", "Deli Llama"));
///
/// let (rx, _handle) = source.subscribe(&Query::new("restaurants")).unwrap();
/// let snapshot = rx.try_recv().unwrap();
/// assert_eq!(snapshot.size, 1);
/// ```
#[derive(Default)]
pub struct MockSource {
    state: Mutex<State>,
}

impl MockSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document without notifying subscribers.
    #[must_use]
    pub fn with_document(self, collection: impl Into<String>, doc: Document) -> Self {
        self.lock()
            .collections
            .entry(collection.into())
            .or_default()
            .insert(doc.id.clone(), doc);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove a document, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NotFound`] when the document does not exist.
    pub fn remove(&self, collection: &str, id: &str) -> Result<Document, SourceError> {
        SourceError::check_key(collection, id)?;
        let mut state = self.lock();
        let removed = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .ok_or_else(|| SourceError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            })?;
        state.notify(collection, id);
        Ok(removed)
    }

    /// Apply a change as a write: additions and modifications are put,
    /// removals remove.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] from the underlying write.
    pub fn apply(&self, collection: &str, change: Change) -> Result<(), SourceError> {
        match change.kind {
            ChangeKind::Added | ChangeKind::Modified => self.put(collection, change.doc),
            ChangeKind::Removed => self.remove(collection, &change.doc.id).map(drop),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.lock();
        state.subscribers.retain(|subscriber| !subscriber.is_cancelled());
        state.subscribers.len()
    }
}

impl Source for MockSource {
    fn subscribe(
        &self,
        query: &Query,
    ) -> Result<(SnapshotReceiver, SubscriptionHandle), SourceError> {
        if query.collection.is_empty() || query.collection.contains('/') {
            return Err(SourceError::InvalidCollection(query.collection.clone()));
        }

        let (tx, rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel();

        let mut state = self.lock();
        let current = query.apply(state.documents(&query.collection));
        let initial = Snapshot {
            size: current.len(),
            changes: current
                .iter()
                .map(|doc| Change::new(ChangeKind::Added, doc.clone()))
                .collect(),
        };
        // The receiver is still in scope, so the send cannot fail.
        let _ = tx.send(initial);

        state.subscribers.push(Subscriber {
            query: query.clone(),
            tx,
            shutdown: shutdown_rx,
            current,
        });
        tracing::debug!(collection = %query.collection, "Subscription added");

        Ok((
            SnapshotReceiver::new(rx),
            SubscriptionHandle::new(shutdown_tx),
        ))
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, SourceError> {
        SourceError::check_key(collection, id)?;
        Ok(self
            .lock()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn put(&self, collection: &str, doc: Document) -> Result<(), SourceError> {
        SourceError::check_key(collection, &doc.id)?;
        let id = doc.id.clone();
        let mut state = self.lock();
        state
            .collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), doc);
        state.notify(collection, &id);
        Ok(())
    }
}

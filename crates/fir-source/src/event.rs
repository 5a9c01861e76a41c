//! Snapshot delivery for query subscriptions.

use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Kind of change to a query result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Document entered the result.
    Added,
    /// Document in the result was updated.
    Modified,
    /// Document left the result.
    Removed,
}

/// One change of a query result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Kind of change.
    pub kind: ChangeKind,
    /// Document state after the change (before it, for removals).
    pub doc: Document,
}

impl Change {
    /// Create a change.
    #[must_use]
    pub fn new(kind: ChangeKind, doc: Document) -> Self {
        Self { kind, doc }
    }
}

/// Query result update.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Snapshot {
    /// Number of documents in the result after the update.
    pub size: usize,
    /// Changes since the previous snapshot, in result order.
    pub changes: Vec<Change>,
}

impl Snapshot {
    /// True if the result holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Receiver for query snapshots.
///
/// Wraps a [`std::sync::mpsc::Receiver`]. Iteration ends when the source
/// drops the subscription.
pub struct SnapshotReceiver {
    rx: mpsc::Receiver<Snapshot>,
}

impl SnapshotReceiver {
    /// Create a receiver from a channel receiver.
    #[must_use]
    pub fn new(rx: mpsc::Receiver<Snapshot>) -> Self {
        Self { rx }
    }

    /// Wait for the next snapshot.
    ///
    /// Returns `None` when the sender is dropped.
    #[must_use]
    pub fn recv(&self) -> Option<Snapshot> {
        self.rx.recv().ok()
    }

    /// Take a snapshot if one is pending.
    #[must_use]
    pub fn try_recv(&self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }

    /// Blocking iterator over snapshots.
    pub fn iter(&self) -> impl Iterator<Item = Snapshot> + '_ {
        self.rx.iter()
    }

    /// Iterator over the snapshots already delivered, without blocking.
    pub fn try_iter(&self) -> impl Iterator<Item = Snapshot> + '_ {
        self.rx.try_iter()
    }
}

/// Handle keeping a subscription alive.
///
/// Dropping the handle cancels the subscription: the internal sender is
/// dropped and the source stops delivering snapshots.
pub struct SubscriptionHandle {
    shutdown: Option<mpsc::Sender<()>>,
}

impl SubscriptionHandle {
    /// Create a handle from the sending half of a shutdown channel.
    #[must_use]
    pub fn new(shutdown: mpsc::Sender<()>) -> Self {
        Self {
            shutdown: Some(shutdown),
        }
    }

    /// Handle of a subscription that needs no cancellation.
    #[must_use]
    pub fn no_op() -> Self {
        Self { shutdown: None }
    }

    /// Cancel the subscription now.
    pub fn stop(mut self) {
        self.shutdown.take();
    }

    /// True while the subscription has not been cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shutdown.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_change_kind_serde() {
        let change: Change = serde_json::from_str(
            r#"{"kind": "modified", "doc": {"id": "r1", "fields": {"name": "Deli"}}}"#,
        )
        .unwrap();

        assert_eq!(change.kind, ChangeKind::Modified);
        assert_eq!(change.doc.id, "r1");
        assert_eq!(
            serde_json::to_string(&ChangeKind::Removed).unwrap(),
            "\"removed\""
        );
    }

    #[test]
    fn test_receiver_recv() {
        let (tx, rx) = mpsc::channel();
        let receiver = SnapshotReceiver::new(rx);
        let snapshot = Snapshot {
            size: 1,
            changes: vec![Change::new(ChangeKind::Added, Document::new("r1"))],
        };

        tx.send(snapshot.clone()).unwrap();

        assert_eq!(receiver.recv(), Some(snapshot));
    }

    #[test]
    fn test_receiver_closed_channel() {
        let (tx, rx) = mpsc::channel::<Snapshot>();
        let receiver = SnapshotReceiver::new(rx);
        drop(tx);

        assert!(receiver.recv().is_none());
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_try_iter_drains_pending() {
        let (tx, rx) = mpsc::channel();
        let receiver = SnapshotReceiver::new(rx);
        tx.send(Snapshot::default()).unwrap();
        tx.send(Snapshot::default()).unwrap();

        assert_eq!(receiver.try_iter().count(), 2);
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_handle_drop_disconnects() {
        let (tx, rx) = mpsc::channel::<()>();
        let handle = SubscriptionHandle::new(tx);
        assert!(handle.is_active());

        drop(handle);

        assert_eq!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected));
    }

    #[test]
    fn test_handle_stop_disconnects() {
        let (tx, rx) = mpsc::channel::<()>();
        SubscriptionHandle::new(tx).stop();

        assert_eq!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected));
    }

    #[test]
    fn test_no_op_handle() {
        assert!(!SubscriptionHandle::no_op().is_active());
    }
}

//! Data-source contract for Fir views.
//!
//! Views never talk to the document database directly. They consume the
//! [`Source`] trait:
//!
//! - [`Source::subscribe`] delivers [`Snapshot`]s of a [`Query`] through a
//!   [`SnapshotReceiver`] until the [`SubscriptionHandle`] is dropped
//! - [`Source::get`] fetches one document
//! - [`Source::put`] creates or replaces one document
//!
//! [`MockSource`] keeps documents in memory and is available behind the
//! `mock` feature flag.

mod document;
mod error;
mod event;
#[cfg(feature = "mock")]
mod mock;
mod query;
mod source;

pub use document::Document;
pub use error::SourceError;
pub use event::{Change, ChangeKind, Snapshot, SnapshotReceiver, SubscriptionHandle};
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use query::{Direction, Filter, FilterOp, Order, Query};
pub use source::Source;

//! Change logs: one JSON change per line, replayed into a data source.
//!
//! ```text
//! {"collection": "restaurants", "kind": "added", "doc": {"id": "r1", "fields": {"name": "Deli Llama"}}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;

use fir_source::{Change, MockSource};
use serde::Deserialize;

use crate::error::CliError;

/// One change of a collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Event {
    pub(crate) collection: String,
    #[serde(flatten)]
    pub(crate) change: Change,
}

/// Parse a change log.
pub(crate) fn parse(content: &str, path: &Path) -> Result<Vec<Event>, CliError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| CliError::Json {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })
        })
        .collect()
}

/// Read and parse the change log at `path`.
pub(crate) fn load(path: &Path) -> Result<Vec<Event>, CliError> {
    let content = std::fs::read_to_string(path)?;
    parse(&content, path)
}

/// Replay `events` into `source` in order.
pub(crate) fn replay(source: &MockSource, events: Vec<Event>) -> Result<usize, CliError> {
    let count = events.len();
    for event in events {
        source.apply(&event.collection, event.change)?;
    }
    tracing::info!(count, "Change log replayed");
    Ok(count)
}

//! `fir list` command implementation.

use std::path::PathBuf;

use clap::Args;
use fir_dom::serialize;
use fir_source::{MockSource, Source};
use fir_view::{CardList, Filters, Rated, RatingOrder};

use super::LibraryArgs;
use crate::error::CliError;
use crate::events;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Change log to replay (one JSON change per line).
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Only restaurants in this city.
    #[arg(long)]
    city: Option<String>,

    /// Only restaurants of this category.
    #[arg(long)]
    category: Option<String>,

    /// Only restaurants of this price tier.
    #[arg(long)]
    price: Option<u8>,

    /// Rated filter: either, rated or unrated.
    #[arg(long, default_value = "either")]
    rated: Rated,

    /// Sort order: decreasing or increasing.
    #[arg(long, default_value = "decreasing")]
    order: RatingOrder,

    #[command(flatten)]
    library: LibraryArgs,
}

impl ListArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (_, renderer) = self.library.load()?;

        let filters = Filters {
            city: self.city,
            category: self.category,
            price: self.price,
            rated: self.rated,
            rating_order: self.order,
        };
        output.highlight(&format!("Showing {}", filters.describe()));

        // Subscribe before replaying so every change arrives as a snapshot.
        let source = MockSource::new();
        let (rx, handle) = source.subscribe(&filters.to_query())?;
        if let Some(path) = &self.events {
            events::replay(&source, events::load(path)?)?;
        }

        let mut cards = CardList::new(&renderer)
            .with_on_select(|id| tracing::info!(id, "Restaurant selected"));
        let snapshots = cards.drain(&rx);
        handle.stop();
        tracing::info!(snapshots, cards = cards.len(), "Restaurant list rendered");

        output.markup(&serialize(&cards.view()?))?;
        Ok(())
    }
}

//! `fir restaurant` command implementation.

use std::path::PathBuf;

use clap::Args;
use fir_dom::serialize;
use fir_source::{FilterOp, MockSource, Query, Source, SourceError};
use fir_view::render_restaurant;

use super::LibraryArgs;
use crate::error::CliError;
use crate::events;
use crate::output::Output;

/// Collection holding restaurants.
const RESTAURANTS: &str = "restaurants";
/// Collection holding reviews.
const RATINGS: &str = "ratings";
/// Review field naming the reviewed restaurant.
const RESTAURANT_REF: &str = "restaurantId";

/// Arguments for the restaurant command.
#[derive(Args)]
pub(crate) struct RestaurantArgs {
    /// Id of the restaurant document.
    id: String,

    /// Change log to replay (one JSON change per line).
    #[arg(short, long)]
    events: PathBuf,

    #[command(flatten)]
    library: LibraryArgs,
}

impl RestaurantArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let (_, renderer) = self.library.load()?;

        let source = MockSource::new();
        events::replay(&source, events::load(&self.events)?)?;

        let restaurant = source
            .get(RESTAURANTS, &self.id)?
            .ok_or_else(|| SourceError::NotFound {
                collection: RESTAURANTS.to_owned(),
                id: self.id.clone(),
            })?;

        let query = Query::new(RATINGS).filter(RESTAURANT_REF, FilterOp::Eq, self.id.as_str());
        let (rx, _handle) = source.subscribe(&query)?;
        let reviews: Vec<_> = rx
            .try_recv()
            .map(|snapshot| snapshot.changes.into_iter().map(|change| change.doc).collect())
            .unwrap_or_default();
        tracing::info!(id = %self.id, reviews = reviews.len(), "Rendering restaurant");

        let page = render_restaurant(&renderer, &restaurant, &reviews, None, None)?;
        output.markup(&serialize(&page.header))?;
        output.markup(&serialize(&page.main))?;
        Ok(())
    }
}

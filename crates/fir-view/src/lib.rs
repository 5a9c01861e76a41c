//! Views built on Fir templates.
//!
//! - [`CardList`] reconciles data-source snapshots into a list of rendered
//!   restaurant cards
//! - [`render_view`] renders a whole view, falling back to an error state
//! - [`render_restaurant`] renders a restaurant page with its reviews
//! - [`Filters`] turns list filters into a [`Query`](fir_source::Query) and a
//!   human-readable description

mod cards;
mod filters;
mod page;

pub use cards::{CARD_TEMPLATE, CARDS_ID, CardList, GO_TO_ACTION, NO_RESULTS_TEMPLATE, card_record};
pub use filters::{Filters, ParseFilterError, Rated, RatingOrder};
pub use page::{RestaurantPage, render_restaurant, render_view};

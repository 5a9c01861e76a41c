//! Whole-view rendering.

use fir_dom::{Callback, Element};
use fir_source::Document;
use fir_template::{Renderer, TemplateError, Value};

use crate::cards::{CARDS_ID, price_tier};

/// Template of the restaurant page header.
const HEADER_TEMPLATE: &str = "restaurant-header";
/// Template of the page body holding the review cards.
const MAIN_TEMPLATE: &str = "main";
/// Template of one review.
const REVIEW_TEMPLATE: &str = "review-card";
/// Template shown when a restaurant has no reviews.
const NO_RATINGS_TEMPLATE: &str = "no-ratings";

/// Render view `id`, falling back to `fallback_id` on any failure.
///
/// A view is all-or-nothing: when it fails, the caller gets the fallback
/// (an error or empty state) instead of a partial tree. When the fallback
/// fails too, the result is an empty `main` element.
pub fn render_view(
    renderer: &Renderer,
    id: &str,
    data: Option<&Value>,
    fallback_id: &str,
) -> Element {
    match renderer.render_template(id, data) {
        Ok(el) => el,
        Err(e) => {
            tracing::warn!(view = id, error = %e, "View failed, rendering fallback");
            renderer.render_template(fallback_id, None).unwrap_or_else(|e| {
                tracing::warn!(view = fallback_id, error = %e, "Fallback view failed");
                Element::new("main")
            })
        }
    }
}

/// Rendered restaurant page.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantPage {
    /// Header with name, rating and price.
    pub header: Element,
    /// Review list, or the no-ratings state.
    pub main: Element,
}

/// Render the page of `restaurant` with its `reviews`, newest first.
///
/// `on_add_review` is bound as `show_add_review` in the header and
/// `on_add_mock_data` as `add_mock_data` in the no-ratings state.
///
/// # Errors
///
/// Returns [`TemplateError`] if any template of the page fails.
pub fn render_restaurant(
    renderer: &Renderer,
    restaurant: &Document,
    reviews: &[Document],
    on_add_review: Option<Callback>,
    on_add_mock_data: Option<Callback>,
) -> Result<RestaurantPage, TemplateError> {
    let mut data = Value::from(restaurant.fields.clone());
    data.insert(
        "show_add_review",
        on_add_review.unwrap_or_else(|| Callback::new(|| {})),
    );

    let mut header = renderer.render_template(HEADER_TEMPLATE, Some(&data))?;
    if let Some(slot) = header.find_by_class_mut("rating") {
        let score = restaurant.f64_field("avgRating").unwrap_or(0.0);
        slot.replace_children(renderer.render_rating(score)?);
    }
    if let Some(slot) = header.find_by_class_mut("price") {
        slot.replace_children(renderer.render_price(price_tier(restaurant))?);
    }

    let main = if reviews.is_empty() {
        let data = Value::record([(
            "add_mock_data",
            on_add_mock_data.unwrap_or_else(|| Callback::new(|| {})),
        )]);
        renderer.render_template(NO_RATINGS_TEMPLATE, Some(&data))?
    } else {
        let mut main = renderer.render_template(MAIN_TEMPLATE, None)?;
        let mut cards = Vec::with_capacity(reviews.len());
        for review in reviews {
            let data = Value::from(review.fields.clone());
            let mut card = renderer.render_template(REVIEW_TEMPLATE, Some(&data))?;
            if let Some(slot) = card.find_by_class_mut("rating") {
                let score = review.f64_field("rating").unwrap_or(0.0);
                slot.replace_children(renderer.render_rating(score)?);
            }
            cards.push(card);
        }
        let host = main.find_by_id_mut(CARDS_ID).ok_or_else(|| {
            TemplateError::NotFound(format!("{MAIN_TEMPLATE}#{CARDS_ID}"))
        })?;
        for card in cards {
            host.append(card);
        }
        main
    };

    Ok(RestaurantPage { header, main })
}

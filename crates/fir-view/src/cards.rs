//! Restaurant card list kept in sync with a query subscription.

use std::rc::Rc;

use fir_dom::Element;
use fir_source::{ChangeKind, Document, Snapshot, SnapshotReceiver};
use fir_template::{Renderer, TemplateError, Value};

/// Template of one restaurant card.
pub const CARD_TEMPLATE: &str = "restaurant-card";
/// Template shown when the query has no results.
pub const NO_RESULTS_TEMPLATE: &str = "no-results";
/// Id of the element holding the cards.
pub const CARDS_ID: &str = "cards";
/// Record field holding the card's navigation action.
pub const GO_TO_ACTION: &str = "go_to_restaurant";

type SelectFn = Rc<dyn Fn(&str)>;

/// Build the record a card is rendered from.
///
/// The document fields are extended with the renderer's identity field and
/// the [`GO_TO_ACTION`] callback, which passes the document id to `on_select`.
pub fn card_record(renderer: &Renderer, doc: &Document, on_select: Option<&SelectFn>) -> Value {
    let mut record = Value::from(doc.fields.clone());
    record.insert(renderer.identity_field(), doc.id.as_str());

    let action = match on_select {
        Some(select) => {
            let select = Rc::clone(select);
            let id = doc.id.clone();
            Value::action(move || select(&id))
        }
        None => Value::action(|| {}),
    };
    record.insert(GO_TO_ACTION, action);
    record
}

/// Whole-number price tier of a document, rounded up.
pub(crate) fn price_tier(doc: &Document) -> usize {
    let price = doc.f64_field("price").unwrap_or(0.0);
    if !price.is_finite() || price <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let tier = price.ceil().min(f64::from(u8::MAX)) as usize;
    tier
}

/// List of rendered cards, updated one snapshot at a time.
///
/// Cards are keyed by element id (`prefix + document id`): a document that
/// changes again replaces its card in place instead of adding a second one.
/// A card that fails to render is logged and skipped.
pub struct CardList<'r> {
    renderer: &'r Renderer,
    template: String,
    container: Element,
    on_select: Option<SelectFn>,
    no_results: bool,
}

impl<'r> CardList<'r> {
    /// Create an empty list rendering [`CARD_TEMPLATE`] cards.
    #[must_use]
    pub fn new(renderer: &'r Renderer) -> Self {
        Self {
            renderer,
            template: CARD_TEMPLATE.to_owned(),
            container: Element::new("div").with_attr("id", CARDS_ID),
            on_select: None,
            no_results: false,
        }
    }

    /// Render cards from another template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Call `on_select` with the document id when a card is clicked.
    #[must_use]
    pub fn with_on_select(mut self, on_select: impl Fn(&str) + 'static) -> Self {
        self.on_select = Some(Rc::new(on_select));
        self
    }

    /// Element holding the cards.
    #[must_use]
    pub fn container(&self) -> &Element {
        &self.container
    }

    /// True after an empty snapshot, until the next non-empty one.
    #[must_use]
    pub fn is_no_results(&self) -> bool {
        self.no_results
    }

    /// Number of cards in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.container.child_elements().count()
    }

    /// True if the list holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Card of document `id`.
    #[must_use]
    pub fn card(&self, id: &str) -> Option<&Element> {
        self.container.find_by_id(&self.renderer.element_id(id))
    }

    /// Apply one snapshot. Returns the number of cards rendered.
    pub fn apply(&mut self, snapshot: &Snapshot) -> usize {
        if snapshot.is_empty() {
            tracing::debug!("Empty result, showing no-results state");
            self.no_results = true;
            self.container.clear_children();
            return 0;
        }
        self.no_results = false;

        let mut rendered = 0;
        for change in &snapshot.changes {
            match change.kind {
                ChangeKind::Added | ChangeKind::Modified => match self.upsert(&change.doc) {
                    Ok(()) => rendered += 1,
                    Err(e) => {
                        tracing::warn!(id = %change.doc.id, error = %e, "Skipping card");
                    }
                },
                ChangeKind::Removed => {
                    tracing::debug!(id = %change.doc.id, "Ignoring removed document");
                }
            }
        }
        rendered
    }

    /// Apply every snapshot already delivered to `rx`, without blocking.
    ///
    /// Returns the number of snapshots applied.
    pub fn drain(&mut self, rx: &SnapshotReceiver) -> usize {
        let mut count = 0;
        for snapshot in rx.try_iter() {
            self.apply(&snapshot);
            count += 1;
        }
        count
    }

    /// Render the card for `doc`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the card, rating or price template fails.
    pub fn render_card(&self, doc: &Document) -> Result<Element, TemplateError> {
        let record = card_record(self.renderer, doc, self.on_select.as_ref());
        let mut card = self.renderer.render_template(&self.template, Some(&record))?;

        if let Some(slot) = card.find_by_class_mut("rating") {
            let score = doc.f64_field("avgRating").unwrap_or(0.0);
            slot.replace_children(self.renderer.render_rating(score)?);
        }
        if let Some(slot) = card.find_by_class_mut("price") {
            slot.replace_children(self.renderer.render_price(price_tier(doc))?);
        }
        Ok(card)
    }

    fn upsert(&mut self, doc: &Document) -> Result<(), TemplateError> {
        let card = self.render_card(doc)?;
        let id = self.renderer.element_id(&doc.id);
        if let Err(card) = self.container.replace_by_id(&id, card) {
            self.container.append(card);
        }
        Ok(())
    }

    /// Element to show: the card container, or the no-results template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the no-results template is missing.
    pub fn view(&self) -> Result<Element, TemplateError> {
        if self.no_results {
            self.renderer.render_template(NO_RESULTS_TEMPLATE, None)
        } else {
            Ok(self.container.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use fir_source::{Change, Query, Source};
    use fir_template::Templates;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const LIBRARY: &str = r#"<div>
<div id="rating" class="template" hidden=""/>
<i id="star-icon" class="template" hidden="">star</i>
<i id="star-border-icon" class="template" hidden="">star_border</i>
<div id="price" class="template" hidden=""/>
<div id="no-results" class="template" hidden="">No results</div>
<div id="restaurant-card" class="template" hidden="">
  <h2 class="name" data-fir-content="name" data-fir-click="go_to_restaurant"/>
  <div class="rating"/>
  <div class="price"/>
</div>
<div id="broken-card" class="template" hidden="">
  <h2 data-fir-content="owner/name"/>
</div>
</div>"#;

    fn renderer() -> Renderer {
        Renderer::new(Templates::parse(LIBRARY, "template").unwrap())
    }

    fn restaurant(id: &str, name: &str, rating: f64, price: u32) -> Document {
        Document::new(id)
            .with_field("name", name)
            .with_field("avgRating", rating)
            .with_field("price", price)
    }

    fn added(doc: Document) -> Change {
        Change::new(ChangeKind::Added, doc)
    }

    fn names(list: &CardList<'_>) -> Vec<String> {
        list.container()
            .child_elements()
            .filter_map(|card| card.find_by_class("name"))
            .map(Element::text_content)
            .collect()
    }

    #[test]
    fn test_added_cards_are_appended_in_order() {
        let renderer = renderer();
        let mut list = CardList::new(&renderer);

        let rendered = list.apply(&Snapshot {
            size: 2,
            changes: vec![
                added(restaurant("a", "Deli Llama", 4.2, 2)),
                added(restaurant("b", "Burger Barn", 3.0, 1)),
            ],
        });

        assert_eq!(rendered, 2);
        assert_eq!(names(&list), vec!["Deli Llama", "Burger Barn"]);
        let card = list.card("a").unwrap();
        assert_eq!(card.id(), Some("fir-a"));
        assert_eq!(card.find_by_class("price").unwrap().text_content(), "$$");
        assert_eq!(
            card.find_by_class("rating").unwrap().text_content(),
            "starstarstarstarstar_border"
        );
    }

    #[test]
    fn test_modified_card_replaces_in_place() {
        let renderer = renderer();
        let mut list = CardList::new(&renderer);
        list.apply(&Snapshot {
            size: 2,
            changes: vec![
                added(restaurant("a", "Deli Llama", 4.0, 2)),
                added(restaurant("b", "Burger Barn", 3.0, 1)),
            ],
        });

        list.apply(&Snapshot {
            size: 2,
            changes: vec![Change::new(
                ChangeKind::Modified,
                restaurant("a", "Deli Llama II", 1.0, 3),
            )],
        });

        assert_eq!(list.len(), 2);
        assert_eq!(names(&list), vec!["Deli Llama II", "Burger Barn"]);
        let card = list.card("a").unwrap();
        assert_eq!(card.find_by_class("price").unwrap().text_content(), "$$$");
    }

    #[test]
    fn test_added_twice_does_not_duplicate() {
        let renderer = renderer();
        let mut list = CardList::new(&renderer);
        let snapshot = Snapshot {
            size: 1,
            changes: vec![added(restaurant("a", "Deli Llama", 4.0, 2))],
        };

        list.apply(&snapshot);
        list.apply(&snapshot);

        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_removed_is_ignored() {
        let renderer = renderer();
        let mut list = CardList::new(&renderer);
        list.apply(&Snapshot {
            size: 1,
            changes: vec![added(restaurant("a", "Deli Llama", 4.0, 2))],
        });

        let rendered = list.apply(&Snapshot {
            size: 1,
            changes: vec![Change::new(ChangeKind::Removed, Document::new("a"))],
        });

        assert_eq!(rendered, 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_empty_snapshot_shows_no_results() {
        let renderer = renderer();
        let mut list = CardList::new(&renderer);
        list.apply(&Snapshot {
            size: 1,
            changes: vec![added(restaurant("a", "Deli Llama", 4.0, 2))],
        });

        list.apply(&Snapshot::default());

        assert!(list.is_no_results());
        assert!(list.is_empty());
        assert_eq!(list.view().unwrap().text_content(), "No results");
    }

    #[test]
    fn test_failing_card_is_skipped() {
        let renderer = renderer();
        let mut list = CardList::new(&renderer).with_template("broken-card");

        let rendered = list.apply(&Snapshot {
            size: 1,
            changes: vec![added(restaurant("a", "Deli Llama", 4.0, 2))],
        });

        assert_eq!(rendered, 0);
        assert!(list.is_empty());
        assert!(!list.is_no_results());
    }

    #[test]
    fn test_failing_card_does_not_affect_others() {
        let renderer = renderer();
        let mut list = CardList::new(&renderer);

        let mut bad = restaurant("b", "ignored", 4.0, 2);
        bad.fields.insert("name".to_owned(), json!({"first": "Not", "last": "Text"}));

        let rendered = list.apply(&Snapshot {
            size: 3,
            changes: vec![
                added(restaurant("a", "Deli Llama", 4.0, 2)),
                added(bad),
                added(restaurant("c", "Taco Tuesday", 2.0, 1)),
            ],
        });

        assert_eq!(rendered, 2);
        assert_eq!(names(&list), vec!["Deli Llama", "Taco Tuesday"]);
    }

    #[test]
    fn test_click_selects_document() {
        let renderer = renderer();
        let selected = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&selected);
        let mut list =
            CardList::new(&renderer).with_on_select(move |id| log.borrow_mut().push(id.to_owned()));

        list.apply(&Snapshot {
            size: 1,
            changes: vec![added(restaurant("a", "Deli Llama", 4.0, 2))],
        });

        let name = list.card("a").unwrap().find_by_class("name").unwrap();
        assert!(name.click());
        assert_eq!(*selected.borrow(), vec!["a".to_owned()]);
    }

    #[test]
    fn test_price_tier_rounding() {
        assert_eq!(price_tier(&Document::new("x")), 0);
        assert_eq!(price_tier(&Document::new("x").with_field("price", 2)), 2);
        assert_eq!(price_tier(&Document::new("x").with_field("price", 1.2)), 2);
        assert_eq!(price_tier(&Document::new("x").with_field("price", -3)), 0);
    }

    #[test]
    fn test_drain_subscription() {
        let renderer = renderer();
        let source = fir_source::MockSource::new()
            .with_document("restaurants", restaurant("a", "Deli Llama", 4.0, 2));
        let (rx, _handle) = source.subscribe(&Query::new("restaurants")).unwrap();
        source
            .put("restaurants", restaurant("b", "Burger Barn", 3.0, 1))
            .unwrap();
        source
            .put("restaurants", restaurant("a", "Deli Llama", 5.0, 2))
            .unwrap();

        let mut list = CardList::new(&renderer);
        let applied = list.drain(&rx);

        assert_eq!(applied, 3);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.card("a")
                .unwrap()
                .find_by_class("rating")
                .unwrap()
                .text_content(),
            "starstarstarstarstar"
        );
    }
}

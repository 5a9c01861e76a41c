//! Declarative DOM templating for Fir.
//!
//! Templates are HTML fragments whose elements carry `data-fir-*` directive
//! attributes. A [`Renderer`] clones a registered fragment and evaluates its
//! directives against a [`Value`] record:
//!
//! | Attribute | Value | Effect |
//! |---|---|---|
//! | `data-fir-foreach` | list path | one clone per item, `~` bound to `list/i` |
//! | `data-fir-content` | path | replace children with the display string |
//! | `data-fir-click` | path | register the action as click listener |
//! | `data-fir-if` | path | hide when falsy |
//! | `data-fir-if-not` | path | hide when truthy |
//! | `data-fir-attr` | `name:path` | set attribute |
//! | `data-fir-style` | `property:path` | set style property |
//!
//! # Example
//!
//! ```
//! use fir_dom::serialize;
//! use fir_template::{Renderer, Templates, Value};
//!
//! let templates = Templates::parse(
//!     r#"<body><ul id="reviews" class="template"><li data-fir-foreach="reviews"><b data-fir-content="~/text"/></li></ul></body>"#,
//!     "template",
//! )
//! .unwrap();
//! let renderer = Renderer::new(templates);
//!
//! let data = Value::record([(
//!     "reviews",
//!     Value::from(vec![Value::record([("text", "Great")]), Value::record([("text", "Meh")])]),
//! )]);
//! let el = renderer.render_template("reviews", Some(&data)).unwrap();
//!
//! assert_eq!(el.text_content(), "GreatMeh");
//! assert!(serialize(&el).contains(r#"data-fir-content="reviews/1/text""#));
//! ```

mod composite;
mod directive;
mod engine;
mod error;
mod path;
mod templates;
mod value;

pub use composite::{
    PRICE_TEMPLATE, RATING_STARS, RATING_TEMPLATE, STAR_BORDER_TEMPLATE, STAR_TEMPLATE,
};
pub use directive::{ATTRIBUTE_PREFIX, Directive, DirectiveKind};
pub use engine::{Engine, ErrorPolicy, RenderOptions};
pub use error::{
    DirectiveError, DirectiveFailure, DirectiveValueError, PathError, RenderFailures,
    TemplateError,
};
pub use path::{FieldPath, PLACEHOLDER, Segment, resolve};
pub use templates::{
    DEFAULT_ID_PREFIX, DEFAULT_IDENTITY_FIELD, DEFAULT_TEMPLATE_CLASS, Renderer, Templates,
};
pub use value::{Record, Value};

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use fir_dom::{Element, serialize};
    use pretty_assertions::assert_eq;

    use super::*;

    const LIBRARY: &str = r#"<!DOCTYPE html>
<html>
<body>
<div id="templates" hidden="">
  <div id="rating" class="template rating" hidden=""/>
  <i id="star-icon" class="template material-icons" hidden="">star</i>
  <i id="star-border-icon" class="template material-icons" hidden="">star_border</i>
  <div id="price" class="template price" hidden=""/>

  <ul id="menu" class="template" hidden="">
    <li data-fir-foreach="items"><span class="name" data-fir-content="items/~/name"/></li>
  </ul>

  <div id="restaurant-card" class="template mdc-card" hidden="">
    <div class="img" data-fir-style="backgroundImage:photo"/>
    <h2 class="name" data-fir-content="name" data-fir-click="go_to_restaurant"/>
    <div class="rating"/>
    <span class="city" data-fir-content="city"/>
    <span class="category" data-fir-content="category"/>
    <div class="price"/>
  </div>

  <div id="header-base" class="template" hidden="">
    <div id="section-header" data-fir-if="hasSectionHeader"/>
    <div class="login" data-fir-if-not="hasSectionHeader">Sign in</div>
  </div>
</div>
</body>
</html>"#;

    fn renderer() -> Renderer {
        Renderer::new(Templates::parse(LIBRARY, "template").unwrap())
    }

    fn icons(el: &Element) -> Vec<String> {
        el.child_elements().map(Element::text_content).collect()
    }

    #[test]
    fn test_rating_three_point_seven() {
        let el = renderer().render_rating(3.7).unwrap();

        assert_eq!(
            icons(&el),
            vec!["star", "star", "star", "star_border", "star_border"]
        );
    }

    #[test]
    fn test_foreach_with_list_prefixed_placeholder() {
        let data = Value::from(serde_json::json!({
            "items": [{"name": "A"}, {"name": "B"}]
        }));

        let el = renderer().render_template("menu", Some(&data)).unwrap();
        let names: Vec<String> = el
            .find_all(&|el: &Element| el.has_class("name"))
            .into_iter()
            .map(Element::text_content)
            .collect();

        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(el.child_elements().count(), 2);
        assert!(el.find(&|el: &Element| el.has_attr("data-fir-foreach")).is_none());
    }

    #[test]
    fn test_foreach_clones_reference_own_index() {
        let data = Value::from(serde_json::json!({
            "items": [{"name": "A"}, {"name": "B"}, {"name": "C"}]
        }));

        let el = renderer().render_template("menu", Some(&data)).unwrap();
        let paths: Vec<&str> = el
            .find_all(&|el: &Element| el.has_class("name"))
            .into_iter()
            .filter_map(|el| el.attr("data-fir-content"))
            .collect();

        assert_eq!(paths, vec!["items/0/name", "items/1/name", "items/2/name"]);
    }

    #[test]
    fn test_price_three() {
        let el = renderer().render_price(3).unwrap();
        assert_eq!(el.text_content(), "$$$");
    }

    #[test]
    fn test_missing_template_leaves_registry_untouched() {
        let renderer = renderer();
        let before: Vec<String> = renderer.templates().ids().map(str::to_owned).collect();

        let err = renderer.render_template("missing-id", None).unwrap_err();

        assert!(matches!(err, TemplateError::NotFound(ref id) if id == "missing-id"));
        assert_eq!(err.to_string(), "template not found: missing-id");
        let after: Vec<String> = renderer.templates().ids().map(str::to_owned).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_restaurant_card() {
        let visited = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&visited);

        let mut data = Value::from(serde_json::json!({
            "name": "Deli Llama",
            "city": "Oakland",
            "category": "Deli",
            "photo": "https://example.com/deli.png",
            "avgRating": 4.2,
            "price": 2
        }));
        data.insert(".id", "abc123");
        data.insert(
            "go_to_restaurant",
            Value::action(move || log.borrow_mut().push("abc123".to_owned())),
        );

        let renderer = renderer();
        let mut card = renderer.render_template("restaurant-card", Some(&data)).unwrap();
        card.find_by_class_mut("rating")
            .unwrap()
            .append(renderer.render_rating(4.2).unwrap());
        card.find_by_class_mut("price")
            .unwrap()
            .append(renderer.render_price(2).unwrap());

        assert_eq!(card.id(), Some("fir-abc123"));
        assert_eq!(card.find_by_class("name").unwrap().text_content(), "Deli Llama");
        assert_eq!(card.find_by_class("city").unwrap().text_content(), "Oakland");
        assert_eq!(
            card.find_by_class("img").unwrap().style_property("background-image"),
            Some("url(https://example.com/deli.png)")
        );
        assert_eq!(card.find_by_class("price").unwrap().text_content(), "$$");

        assert!(card.find_by_class("name").unwrap().click());
        assert_eq!(*visited.borrow(), vec!["abc123".to_owned()]);

        let html = serialize(&card);
        assert!(html.starts_with(r#"<div id="fir-abc123" class="template mdc-card">"#));
        assert!(!html.contains("hidden"));
    }

    #[test]
    fn test_header_if_and_if_not() {
        let renderer = renderer();

        for has_header in [true, false] {
            let data = Value::record([("hasSectionHeader", has_header)]);
            let header = renderer.render_template("header-base", Some(&data)).unwrap();

            let section = header.find_by_id("section-header").unwrap();
            let login = header.find_by_class("login").unwrap();
            assert_eq!(section.is_hidden(), !has_header);
            assert_eq!(login.is_hidden(), has_header);
        }
    }

    #[test]
    fn test_missing_leaf_renders_empty() {
        let data = Value::record([("name", "Deli Llama"), ("go_to_restaurant", "x")]);
        let renderer = renderer();

        let err = renderer.render_template("restaurant-card", Some(&data)).unwrap_err();
        let TemplateError::Render { failures, .. } = err else {
            panic!("expected render failures");
        };

        // Only the click binding fails; missing leaves render as empty strings.
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures.first().unwrap().error,
            DirectiveError::Path(PathError::NotCallable { .. })
        ));
    }

    #[test]
    fn test_engine_fail_fast_through_renderer() {
        let templates = Templates::parse(
            r#"<div><ul id="list" class="template"><li data-fir-content="a/b"/><li data-fir-content="c/d"/></ul></div>"#,
            "template",
        )
        .unwrap();
        let data = Value::record([("x", 1)]);

        let collect = Renderer::new(templates.clone());
        let fail_fast = Renderer::new(templates)
            .with_options(RenderOptions::default().with_error_policy(ErrorPolicy::FailFast));

        let collected = collect.render_template("list", Some(&data)).unwrap_err();
        let stopped = fail_fast.render_template("list", Some(&data)).unwrap_err();

        let count = |err: TemplateError| match err {
            TemplateError::Render { failures, .. } => failures.len(),
            other => panic!("unexpected error: {other}"),
        };
        assert_eq!(count(collected), 2);
        assert_eq!(count(stopped), 1);
    }

    #[test]
    fn test_render_in_place() {
        let renderer = renderer();
        let mut root = fir_dom::parse_element(
            r#"<main><h1 data-fir-content="title"/><p data-fir-attr="data-count:count"/></main>"#,
        )
        .unwrap();

        renderer
            .render(&mut root, &Value::record([("title", Value::from("Reviews")), ("count", Value::from(12))]))
            .unwrap();

        assert_eq!(
            serialize(&root),
            r#"<main><h1 data-fir-content="title">Reviews</h1><p data-fir-attr="data-count:count" data-count="12"></p></main>"#
        );
    }
}

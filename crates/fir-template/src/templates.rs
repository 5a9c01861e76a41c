//! Template registry and instantiation.

use std::collections::BTreeMap;
use std::path::Path;

use fir_dom::{Element, parse_document};

use crate::engine::{Engine, RenderOptions};
use crate::error::{RenderFailures, TemplateError};
use crate::value::Value;

/// Default class marking an element as a template.
pub const DEFAULT_TEMPLATE_CLASS: &str = "template";
/// Default prefix of element ids assigned from a record identity.
pub const DEFAULT_ID_PREFIX: &str = "fir-";
/// Default record field holding a document identity.
pub const DEFAULT_IDENTITY_FIELD: &str = ".id";

/// Named template fragments, immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    fragments: BTreeMap<String, Element>,
}

impl Templates {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every element of `document` carrying `class`, keyed by id.
    ///
    /// Elements without an id are skipped. When two templates share an id
    /// the later one wins.
    #[must_use]
    pub fn from_document(document: &Element, class: &str) -> Self {
        let mut templates = Self::new();
        for el in document.find_all(&|el: &Element| el.has_class(class)) {
            let Some(id) = el.id() else {
                tracing::warn!(tag = %el.tag, "Template without id skipped");
                continue;
            };
            if templates.insert(id, el.clone()).is_some() {
                tracing::warn!(id, "Duplicate template id, keeping the last one");
            }
        }
        tracing::debug!(count = templates.len(), "Templates loaded");
        templates
    }

    /// Parse `html` and collect its templates.
    pub fn parse(html: &str, class: &str) -> Result<Self, TemplateError> {
        let document = parse_document(html)?;
        Ok(Self::from_document(&document, class))
    }

    /// Read and parse the template library at `path`.
    pub fn load(path: &Path, class: &str) -> Result<Self, TemplateError> {
        let html = std::fs::read_to_string(path)?;
        Self::parse(&html, class)
    }

    /// Register a template, returning the one it replaced.
    pub fn insert(&mut self, id: impl Into<String>, template: Element) -> Option<Element> {
        self.fragments.insert(id.into(), template)
    }

    /// Template registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.fragments.get(id)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fragments.keys().map(String::as_str)
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// True if no template is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Rendering context: the template registry plus render settings.
///
/// Built once at startup and passed to views explicitly.
///
/// # Example
///
/// ```
/// use fir_template::{Renderer, Templates, Value};
///
/// let templates = Templates::parse(
///     r#"<div><h1 id="title" class="template" hidden=""><span data-fir-content="name"/></h1></div>"#,
///     "template",
/// )
/// .unwrap();
/// let renderer = Renderer::new(templates);
///
/// let data = Value::record([("name", "Deli Llama"), (".id", "r1")]);
/// let el = renderer.render_template("title", Some(&data)).unwrap();
///
/// assert_eq!(el.id(), Some("fir-r1"));
/// assert_eq!(el.text_content(), "Deli Llama");
/// assert!(!el.has_attr("hidden"));
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    templates: Templates,
    engine: Engine,
    id_prefix: String,
    identity_field: String,
}

impl Renderer {
    /// Create a renderer over `templates` with default settings.
    #[must_use]
    pub fn new(templates: Templates) -> Self {
        Self {
            templates,
            engine: Engine::default(),
            id_prefix: DEFAULT_ID_PREFIX.to_owned(),
            identity_field: DEFAULT_IDENTITY_FIELD.to_owned(),
        }
    }

    /// Set render options.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.engine = Engine::new(options);
        self
    }

    /// Set the prefix of assigned element ids.
    #[must_use]
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Set the record field holding a document identity.
    #[must_use]
    pub fn with_identity_field(mut self, field: impl Into<String>) -> Self {
        self.identity_field = field.into();
        self
    }

    /// Replace the registry with the templates found in `document`.
    pub fn init_templates(&mut self, document: &Element, class: &str) {
        self.templates = Templates::from_document(document, class);
    }

    /// Template registry.
    #[must_use]
    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Render options.
    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.engine.options()
    }

    /// Prefix of assigned element ids.
    #[must_use]
    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    /// Record field holding a document identity.
    #[must_use]
    pub fn identity_field(&self) -> &str {
        &self.identity_field
    }

    /// Instantiate template `id` against `data`.
    ///
    /// The result is a deep copy without the `hidden` attribute. Directives
    /// are evaluated only when `data` is a non-empty record. When the record
    /// carries the identity field, the root id becomes `prefix + identity`.
    pub fn render_template(
        &self,
        id: &str,
        data: Option<&Value>,
    ) -> Result<Element, TemplateError> {
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_owned()))?;

        let mut el = template.clone();
        el.remove_attr("hidden");

        let Some(data) = data.filter(|data| !data.is_empty()) else {
            return Ok(el);
        };

        if let Some(identity) = self.identity_of(data) {
            el.set_id(self.element_id(&identity));
        }

        self.engine
            .render(&mut el, data)
            .map_err(|failures| TemplateError::Render {
                id: id.to_owned(),
                failures,
            })?;

        Ok(el)
    }

    /// Evaluate directives under `root` against `data`.
    pub fn render(&self, root: &mut Element, data: &Value) -> Result<(), RenderFailures> {
        self.engine.render(root, data)
    }

    /// Element id assigned to the document with `identity`.
    #[must_use]
    pub fn element_id(&self, identity: &str) -> String {
        format!("{}{identity}", self.id_prefix)
    }

    /// Identity carried by `data`, if any.
    #[must_use]
    pub fn identity_of(&self, data: &Value) -> Option<String> {
        data.get(&self.identity_field)
            .and_then(Value::to_display)
            .filter(|identity| !identity.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use fir_dom::serialize;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::{DirectiveError, PathError};
    use crate::value::Record;

    const LIBRARY: &str = r#"<html><body>
<div id="templates">
  <div id="restaurant-card" class="template" hidden="">
    <h2 class="name" data-fir-content="name"></h2>
    <span class="city" data-fir-content="city"></span>
  </div>
  <p class="template">no id</p>
  <div id="no-results" class="template mdc-card" hidden="">Nothing here</div>
</div>
</body></html>"#;

    fn renderer() -> Renderer {
        Renderer::new(Templates::parse(LIBRARY, DEFAULT_TEMPLATE_CLASS).unwrap())
    }

    #[test]
    fn test_from_document_collects_by_class() {
        let renderer = renderer();
        assert_eq!(
            renderer.templates().ids().collect::<Vec<_>>(),
            vec!["no-results", "restaurant-card"]
        );
    }

    #[test]
    fn test_render_unknown_template() {
        let err = renderer().render_template("missing", None).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(ref id) if id == "missing"));
    }

    #[test]
    fn test_render_without_data_is_bare_clone() {
        let renderer = renderer();
        let el = renderer.render_template("no-results", None).unwrap();

        assert!(!el.has_attr("hidden"));
        assert_eq!(el.text_content(), "Nothing here");
        assert_eq!(el.id(), Some("no-results"));
    }

    #[test]
    fn test_empty_record_skips_directives() {
        let renderer = renderer();
        let el = renderer
            .render_template("restaurant-card", Some(&Value::Record(Record::new())))
            .unwrap();

        let name = el.find_by_class("name").unwrap();
        assert_eq!(name.attr("data-fir-content"), Some("name"));
        assert_eq!(name.text_content(), "");
    }

    #[test]
    fn test_render_does_not_mutate_registry() {
        let renderer = renderer();
        let before = renderer.templates().get("restaurant-card").cloned().unwrap();

        let data = Value::record([("name", "Deli Llama"), ("city", "Oakland"), (".id", "abc")]);
        let first = renderer.render_template("restaurant-card", Some(&data)).unwrap();
        let second = renderer.render_template("restaurant-card", Some(&data)).unwrap();

        assert_eq!(renderer.templates().get("restaurant-card"), Some(&before));
        assert!(before.has_attr("hidden"));
        assert_eq!(serialize(&first), serialize(&second));
    }

    #[test]
    fn test_identity_sets_prefixed_id() {
        let renderer = renderer().with_id_prefix("restaurant-");
        let data = Value::record([("name", "Deli Llama"), (".id", "abc")]);

        let el = renderer.render_template("restaurant-card", Some(&data)).unwrap();

        assert_eq!(el.id(), Some("restaurant-abc"));
        assert_eq!(el.find_by_class("name").unwrap().text_content(), "Deli Llama");
        assert_eq!(el.find_by_class("city").unwrap().text_content(), "");
    }

    #[test]
    fn test_custom_identity_field() {
        let renderer = renderer().with_identity_field("_id");
        let data = Value::record([("_id", "r9")]);

        let el = renderer.render_template("restaurant-card", Some(&data)).unwrap();
        assert_eq!(el.id(), Some("fir-r9"));
    }

    #[test]
    fn test_directive_failure_is_render_error() {
        let renderer = renderer();
        let data = Value::record([("name", Value::record([("first", "x")]))]);

        let err = renderer.render_template("restaurant-card", Some(&data)).unwrap_err();
        let TemplateError::Render { id, failures } = err else {
            panic!("expected render error, got {err:?}");
        };
        assert_eq!(id, "restaurant-card");
        assert!(matches!(
            failures.first().unwrap().error,
            DirectiveError::Path(PathError::NotDisplayable { .. })
        ));
    }

    #[test]
    fn test_init_templates_replaces_registry() {
        let mut renderer = renderer();
        let document = fir_dom::parse_document(
            r#"<div><section id="main" class="fir-template"/></div>"#,
        )
        .unwrap();

        renderer.init_templates(&document, "fir-template");

        assert_eq!(renderer.templates().ids().collect::<Vec<_>>(), vec!["main"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, LIBRARY).unwrap();

        let templates = Templates::load(&path, DEFAULT_TEMPLATE_CLASS).unwrap();
        assert_eq!(templates.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Templates::load(Path::new("/nonexistent/index.html"), "template").unwrap_err();
        assert!(matches!(err, TemplateError::Io(_)));
    }
}

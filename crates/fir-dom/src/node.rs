//! Element tree representation.

use std::fmt;
use std::rc::Rc;

/// Tag of the synthetic element wrapping a parsed document.
pub const DOCUMENT_TAG: &str = "#document";

/// Zero-argument callback attached to an element or carried by a data record.
///
/// Cloning shares the underlying closure.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    /// Wrap a closure.
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self) {
        (self.0)();
    }

    /// True if both callbacks share the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Node in an element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Element node.
    Element(Element),
    /// Text node.
    Text(String),
}

impl Node {
    /// Element inside this node, if any.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Mutable element inside this node, if any.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// Element with ordered attributes, inline style, children and listeners.
///
/// The `style` attribute is kept parsed as an ordered property list and is
/// not visible through [`attr`](Self::attr).
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Element tag name.
    pub tag: String,
    /// Child nodes.
    pub children: Vec<Node>,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
    listeners: Vec<(String, Callback)>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.attrs == other.attrs
            && self.style == other.style
            && self.children == other.children
            && self.listeners.len() == other.listeners.len()
            && self
                .listeners
                .iter()
                .zip(&other.listeners)
                .all(|((a_event, a), (b_event, b))| a_event == b_event && a.ptr_eq(b))
    }
}

impl Element {
    /// Create an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    /// Append a text node.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.append_text(text);
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether an attribute is present.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    /// Iterate over attributes in document order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute, keeping its position when it already exists.
    ///
    /// Setting `style` replaces the inline style declarations.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if name == "style" {
            self.style = parse_style(&value);
            return;
        }
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(pos).1)
    }

    /// Element id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Set the element id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.set_attr("id", id);
    }

    /// Check whether the `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Inline style property value.
    #[must_use]
    pub fn style_property(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over inline style declarations in order.
    pub fn style(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an inline style property.
    pub fn set_style_property(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        if let Some(slot) = self.style.iter_mut().find(|(key, _)| *key == property) {
            slot.1 = value;
        } else {
            self.style.push((property, value));
        }
    }

    /// Hide the element with `display: none`.
    pub fn hide(&mut self) {
        self.set_style_property("display", "none");
    }

    /// True if the element carries `display: none`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.style_property("display") == Some("none")
    }

    /// Append a child node.
    pub fn append(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Append text, merging with a trailing text node.
    pub fn append_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }

    /// Remove all children.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Replace all children with `content`.
    pub fn replace_children(&mut self, content: Element) {
        self.children = vec![Node::Element(content)];
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.append_text(text);
    }

    /// Iterate over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// All descendant elements in document order, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// First descendant matching `pred`, in document order.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find(pred) {
                return Some(found);
            }
        }
        None
    }

    /// First descendant matching `pred`, mutably.
    pub fn find_mut(&mut self, pred: &dyn Fn(&Element) -> bool) -> Option<&mut Element> {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if pred(el) {
                    return Some(el);
                }
                if let Some(found) = el.find_mut(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// All descendants matching `pred`, in document order.
    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        self.descendants().into_iter().filter(|el| pred(el)).collect()
    }

    /// Descendant with the given id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.find(&|el: &Element| el.id() == Some(id))
    }

    /// Descendant with the given id, mutably.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.find_mut(&|el: &Element| el.id() == Some(id))
    }

    /// First descendant carrying `class`.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        self.find(&|el: &Element| el.has_class(class))
    }

    /// First descendant carrying `class`, mutably.
    pub fn find_by_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        self.find_mut(&|el: &Element| el.has_class(class))
    }

    /// Replace the descendant with the given id, keeping its position.
    ///
    /// Returns the replaced element, or gives `replacement` back when no
    /// descendant carries the id.
    pub fn replace_by_id(&mut self, id: &str, replacement: Element) -> Result<Element, Element> {
        for child in &mut self.children {
            let Node::Element(el) = child else { continue };
            if el.id() == Some(id) {
                return Ok(std::mem::replace(el, replacement));
            }
        }
        let mut replacement = replacement;
        for child in &mut self.children {
            let Node::Element(el) = child else { continue };
            match el.replace_by_id(id, replacement) {
                Ok(old) => return Ok(old),
                Err(back) => replacement = back,
            }
        }
        Err(replacement)
    }

    /// Register `callback` as the listener for `event`, replacing an earlier one.
    pub fn set_listener(&mut self, event: impl Into<String>, callback: Callback) {
        let event = event.into();
        if let Some(slot) = self.listeners.iter_mut().find(|(name, _)| *name == event) {
            slot.1 = callback;
        } else {
            self.listeners.push((event, callback));
        }
    }

    /// Listener registered for `event`.
    #[must_use]
    pub fn listener(&self, event: &str) -> Option<&Callback> {
        self.listeners
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, callback)| callback)
    }

    /// Invoke the click listener. Returns `false` when none is registered.
    pub fn click(&self) -> bool {
        self.dispatch("click")
    }

    /// Invoke the listener for `event`. Returns `false` when none is registered.
    pub fn dispatch(&self, event: &str) -> bool {
        match self.listener(event) {
            Some(callback) => {
                callback.call();
                true
            }
            None => false,
        }
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

fn collect_descendants<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        out.push(child);
        collect_descendants(child, out);
    }
}

/// Parse `prop: value; prop: value` declarations.
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            if prop.is_empty() {
                return None;
            }
            Some((prop.to_owned(), value.trim().to_owned()))
        })
        .collect()
}

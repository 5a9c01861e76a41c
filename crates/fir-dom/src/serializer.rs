//! HTML serializer for [`Element`] trees.

use std::fmt::Write;

use crate::node::{DOCUMENT_TAG, Element, Node};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// True for elements that never have content or an end tag.
pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(tag))
}

/// Serialize an element to HTML.
///
/// A document element (tag [`DOCUMENT_TAG`]) serializes its children only.
/// Inline style declarations are written as a trailing `style` attribute.
/// Listeners are not serialized.
pub fn serialize(el: &Element) -> String {
    let mut out = String::with_capacity(1024);
    if el.tag == DOCUMENT_TAG {
        for child in &el.children {
            serialize_node(child, &mut out);
        }
    } else {
        serialize_element(el, &mut out);
    }
    out
}

fn serialize_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => serialize_element(el, out),
        Node::Text(text) => out.push_str(&escape_text(text)),
    }
}

fn serialize_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);

    for (key, value) in el.attrs() {
        write!(out, r#" {}="{}""#, key, escape_attr(value)).unwrap();
    }

    let style = el
        .style()
        .map(|(prop, value)| format!("{prop}: {value}"))
        .collect::<Vec<_>>()
        .join("; ");
    if !style.is_empty() {
        write!(out, r#" style="{}""#, escape_attr(&style)).unwrap();
    }

    if is_void_element(&el.tag) && el.children.is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &el.children {
        serialize_node(child, out);
    }
    write!(out, "</{}>", el.tag).unwrap();
}

fn escape_text(text: &str) -> String {
    escape_html(text, false)
}

fn escape_attr(text: &str) -> String {
    escape_html(text, true)
}

fn escape_html(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

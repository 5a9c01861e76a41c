//! HTML parser producing an [`Element`] tree.
//!
//! Markup is read with an XML reader, relaxed for the HTML a template
//! library is written in: void elements (`<img>`, `<input>`) need no end tag,
//! attributes may have no value and a bare `&` is plain text.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::entities::convert_html_entities;
use crate::error::ParseError;
use crate::node::{DOCUMENT_TAG, Element, Node};
use crate::serializer::is_void_element;

/// XML-safe name of the synthetic wrapper element.
const WRAPPER_TAG: &str = "fir-document";

/// Parse markup into a document element.
///
/// The returned element has tag [`DOCUMENT_TAG`] and holds the top-level
/// nodes of `html` as children. HTML named entities are converted to
/// Unicode first.
///
/// # Errors
///
/// Returns an error if an element other than a void element is left
/// unclosed or closed by the wrong end tag.
pub fn parse_document(html: &str) -> Result<Element, ParseError> {
    let html = convert_html_entities(strip_doctype(html));
    let wrapped = format!("<{WRAPPER_TAG}>{html}</{WRAPPER_TAG}>");

    let mut reader = Reader::from_str(&wrapped);
    let config = reader.config_mut();
    config.trim_text(false);
    // End tags are matched by `parse_children`, which knows void elements.
    config.check_end_names = false;

    let mut document = Element::new(DOCUMENT_TAG);
    // Skip the synthetic wrapper start tag.
    loop {
        match reader.read_event()? {
            Event::Start(_) => break,
            Event::Eof => return Ok(document),
            _ => {}
        }
    }
    document.children = parse_children(&mut reader, WRAPPER_TAG)?;
    Ok(document)
}

/// Parse markup containing a single root element.
///
/// Whitespace around the element is ignored.
///
/// # Errors
///
/// Returns an error if the markup does not parse or has no element.
pub fn parse_element(html: &str) -> Result<Element, ParseError> {
    let document = parse_document(html)?;
    document
        .children
        .into_iter()
        .find_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
        .ok_or(ParseError::NoElement)
}

/// Drop a leading `<!DOCTYPE ...>`, which is only valid at document level.
fn strip_doctype(html: &str) -> &str {
    let trimmed = html.trim_start();
    let is_doctype = trimmed
        .get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<!doctype"));
    if !is_doctype {
        return html;
    }
    trimmed.find('>').map_or(html, |end| &trimmed[end + 1..])
}

/// Parse nodes until the end tag of `parent`.
fn parse_children(reader: &mut Reader<&[u8]>, parent: &str) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mut el = start_element(reader, &e)?;
                if !is_void_element(&el.tag) {
                    el.children = parse_children(reader, &el.tag)?;
                }
                nodes.push(Node::Element(el));
            }
            Event::Empty(e) => {
                nodes.push(Node::Element(start_element(reader, &e)?));
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?.into_owned();
                push_text(&mut nodes, &text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?.into_owned();
                push_text(&mut nodes, &decode_entity(&entity));
            }
            Event::CData(e) => {
                push_text(&mut nodes, &String::from_utf8_lossy(&e));
            }
            Event::End(e) => {
                let qname = e.name();
                let name = reader.decoder().decode(qname.as_ref())?;
                if name == parent {
                    return Ok(nodes);
                }
                // `<img></img>`: the void element was already closed.
                if !is_void_element(&name) {
                    return Err(ParseError::MismatchedEndTag {
                        expected: parent.to_owned(),
                        found: name.into_owned(),
                    });
                }
            }
            Event::Eof => return Err(ParseError::Unclosed(parent.to_owned())),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }
}

fn start_element(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<Element, ParseError> {
    let tag = reader.decoder().decode(e.name().as_ref())?.into_owned();
    let mut el = Element::new(tag);

    for attr in e.html_attributes().flatten() {
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_or_else(
                |_| String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                Cow::into_owned,
            );
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            Cow::into_owned,
        );
        el.set_attr(key, value);
    }

    Ok(el)
}

/// Append text, merging with a preceding text node.
fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_owned()));
    }
}

/// Decode an XML entity reference to its character value.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

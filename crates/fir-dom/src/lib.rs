//! In-memory DOM for Fir templates.
//!
//! Templates are authored as HTML. This crate parses them into an
//! owned [`Element`] tree, offers the handful of DOM operations the templating
//! engine needs (deep clone, attribute and style access, queries by id, class
//! and attribute, text content, click listeners) and serializes the tree back
//! to HTML.
//!
//! # Example
//!
//! ```
//! use fir_dom::{parse_element, serialize};
//!
//! let mut card = parse_element(r#"<div class="card"><h2 class="name">Old</h2></div>"#).unwrap();
//! card.find_by_class_mut("name").unwrap().set_text_content("Deli Llama");
//!
//! assert_eq!(serialize(&card), r#"<div class="card"><h2 class="name">Deli Llama</h2></div>"#);
//! ```

mod entities;
mod error;
mod node;
mod parser;
mod serializer;

pub use entities::convert_html_entities;
pub use error::ParseError;
pub use node::{Callback, DOCUMENT_TAG, Element, Node};
pub use parser::{parse_document, parse_element};
pub use serializer::serialize;

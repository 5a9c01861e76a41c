//! Field paths and their resolution against data records.
//!
//! A field path is a `/`-delimited list of segments. Records are indexed by
//! key and lists by decimal position, so `items/0/name` addresses the `name`
//! of the first item.
//!
//! The segment `~` is the repetition placeholder. Inside a
//! `data-fir-foreach` element it is bound to `<list path>/<index>` for each
//! clone, or to just `<index>` when the path already starts with the list
//! path (`items/~/name`). Only a segment that is exactly `~` is a
//! placeholder; a key such as `a~b` is an ordinary key.
//!
//! # Missing fields
//!
//! A missing final segment resolves to [`Value::Null`]. A missing segment
//! anywhere else is an error, as is looking up a segment inside a scalar.

use std::fmt;

use crate::error::{DirectiveValueError, PathError};
use crate::value::Value;

/// Repetition placeholder token.
pub const PLACEHOLDER: &str = "~";

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Record key or list index.
    Key(String),
    /// Repetition placeholder, bound by `data-fir-foreach`.
    Placeholder,
}

/// Parsed `/`-delimited field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a raw path. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveValueError::EmptyPath`] for an empty or blank path.
    pub fn parse(raw: &str) -> Result<Self, DirectiveValueError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DirectiveValueError::EmptyPath);
        }
        let segments = raw
            .split('/')
            .map(|segment| {
                if segment == PLACEHOLDER {
                    Segment::Placeholder
                } else {
                    Segment::Key(segment.to_owned())
                }
            })
            .collect();
        Ok(Self { segments })
    }

    /// Path segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if any segment is still a placeholder.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.segments.contains(&Segment::Placeholder)
    }

    /// Bind the first placeholder to `list/index`.
    ///
    /// When the segments before the placeholder already spell out `list`
    /// (`items/~/name` inside `items`), the placeholder becomes just the
    /// index. Returns `false` and leaves the path unchanged when it has no
    /// placeholder.
    pub fn bind(&mut self, list: &FieldPath, index: usize) -> bool {
        let Some(pos) = self
            .segments
            .iter()
            .position(|segment| *segment == Segment::Placeholder)
        else {
            return false;
        };
        let index = Segment::Key(index.to_string());
        if self.segments[..pos] == list.segments[..] {
            self.segments[pos] = index;
        } else {
            let replacement = list.segments.iter().cloned().chain(std::iter::once(index));
            self.segments.splice(pos..=pos, replacement);
        }
        true
    }

    /// Resolve this path against `record`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when a non-final segment is missing, a segment is
    /// applied to a scalar, or a placeholder is still unbound.
    pub fn resolve(&self, record: &Value) -> Result<Value, PathError> {
        let mut current = record;
        let last = self.segments.len() - 1;

        for (i, segment) in self.segments.iter().enumerate() {
            let Segment::Key(key) = segment else {
                return Err(PathError::UnboundPlaceholder {
                    path: self.to_string(),
                });
            };

            let next = match current {
                Value::Record(fields) => fields.get(key),
                Value::List(items) => key.parse::<usize>().ok().and_then(|idx| items.get(idx)),
                _ => {
                    return Err(PathError::NotIndexable {
                        path: self.to_string(),
                        segment: key.clone(),
                    });
                }
            };

            match next {
                Some(value) => current = value,
                None if i == last => return Ok(Value::Null),
                None => {
                    return Err(PathError::Missing {
                        path: self.to_string(),
                        segment: key.clone(),
                    });
                }
            }
        }

        Ok(current.clone())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match segment {
                Segment::Key(key) => f.write_str(key)?,
                Segment::Placeholder => f.write_str(PLACEHOLDER)?,
            }
        }
        Ok(())
    }
}

/// Resolve a raw `/`-delimited path against `record`.
///
/// # Errors
///
/// Returns [`PathError`] as described for [`FieldPath::resolve`], and
/// [`PathError::Empty`] for an empty or blank path.
pub fn resolve(record: &Value, path: &str) -> Result<Value, PathError> {
    FieldPath::parse(path)
        .map_err(|_| PathError::Empty)?
        .resolve(record)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn restaurant() -> Value {
        Value::record([
            ("name", Value::from("Deli Llama")),
            (
                "location",
                Value::record([("city", "Oakland"), ("street", "Main St")]),
            ),
            (
                "reviews",
                Value::from(vec![
                    Value::record([("text", Value::from("Great")), ("rating", Value::from(5))]),
                    Value::record([("text", Value::from("Meh")), ("rating", Value::from(2))]),
                ]),
            ),
        ])
    }

    #[test]
    fn test_parse_segments() {
        let path = FieldPath::parse("reviews/~/text").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("reviews".to_owned()),
                Segment::Placeholder,
                Segment::Key("text".to_owned()),
            ]
        );
        assert_eq!(path.to_string(), "reviews/~/text");
    }

    #[test]
    fn test_tilde_inside_key_is_not_placeholder() {
        let path = FieldPath::parse("a~b/c").unwrap();
        assert!(!path.has_placeholder());
    }

    #[test]
    fn test_parse_empty_path_fails() {
        assert_eq!(FieldPath::parse(""), Err(DirectiveValueError::EmptyPath));
        assert_eq!(FieldPath::parse("  "), Err(DirectiveValueError::EmptyPath));
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        assert_eq!(
            FieldPath::parse(" location/city\t").unwrap(),
            FieldPath::parse("location/city").unwrap()
        );
    }

    #[test]
    fn test_resolve_empty_path_fails() {
        let data = restaurant();
        assert_eq!(resolve(&data, ""), Err(PathError::Empty));
        assert_eq!(resolve(&data, " "), Err(PathError::Empty));
    }

    #[test]
    fn test_resolve_matches_manual_lookup() {
        let data = restaurant();
        let manual = data
            .get("location")
            .and_then(|location| location.get("city"))
            .cloned()
            .unwrap();
        assert_eq!(resolve(&data, "location/city").unwrap(), manual);
        assert_eq!(resolve(&data, "name").unwrap(), Value::from("Deli Llama"));
    }

    #[test]
    fn test_resolve_list_index() {
        let data = restaurant();
        assert_eq!(resolve(&data, "reviews/1/text").unwrap(), Value::from("Meh"));
        assert_eq!(resolve(&data, "reviews/0/rating").unwrap(), Value::from(5));
    }

    #[test]
    fn test_resolve_missing_leaf_is_null() {
        let data = restaurant();
        assert_eq!(resolve(&data, "phone").unwrap(), Value::Null);
        assert_eq!(resolve(&data, "location/zip").unwrap(), Value::Null);
        assert_eq!(resolve(&data, "reviews/7").unwrap(), Value::Null);
    }

    #[test]
    fn test_resolve_missing_intermediate_fails() {
        let data = restaurant();
        let err = resolve(&data, "owner/name").unwrap_err();
        assert_eq!(
            err,
            PathError::Missing {
                path: "owner/name".to_owned(),
                segment: "owner".to_owned(),
            }
        );
        assert!(matches!(
            resolve(&data, "reviews/9/text"),
            Err(PathError::Missing { .. })
        ));
    }

    #[test]
    fn test_resolve_through_scalar_fails() {
        let data = restaurant();
        let err = resolve(&data, "name/first").unwrap_err();
        assert!(matches!(err, PathError::NotIndexable { ref segment, .. } if segment == "first"));
    }

    #[test]
    fn test_resolve_unbound_placeholder_fails() {
        let data = restaurant();
        assert!(matches!(
            resolve(&data, "reviews/~/text"),
            Err(PathError::UnboundPlaceholder { .. })
        ));
    }

    #[test]
    fn test_bind_first_placeholder_only() {
        let list = FieldPath::parse("reviews").unwrap();
        let mut path = FieldPath::parse("reviews/~/tags/~").unwrap();

        assert!(path.bind(&list, 1));
        assert_eq!(path.to_string(), "reviews/1/tags/~");
    }

    #[test]
    fn test_bind_relative_placeholder_is_prefixed() {
        let list = FieldPath::parse("menu/dishes").unwrap();
        let mut path = FieldPath::parse("photos/~").unwrap();

        assert!(path.bind(&list, 0));
        assert_eq!(path.to_string(), "photos/menu/dishes/0");
    }

    #[test]
    fn test_bind_placeholder_root() {
        let list = FieldPath::parse("items").unwrap();
        let mut path = FieldPath::parse("~/name").unwrap();

        assert!(path.bind(&list, 0));
        assert_eq!(path.to_string(), "items/0/name");
        assert_eq!(
            path.resolve(&Value::record([(
                "items",
                Value::from(vec![Value::record([("name", "A")])])
            )]))
            .unwrap(),
            Value::from("A")
        );
    }

    #[test]
    fn test_bind_without_placeholder_is_noop() {
        let list = FieldPath::parse("items").unwrap();
        let mut path = FieldPath::parse("title").unwrap();
        assert!(!path.bind(&list, 3));
        assert_eq!(path.to_string(), "title");
    }
}

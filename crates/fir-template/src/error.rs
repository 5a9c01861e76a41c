//! Error types for template rendering.

use std::fmt;

use crate::directive::DirectiveKind;

/// Field path could not be resolved against a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PathError {
    /// Path has no segments.
    #[error("empty field path")]
    Empty,
    /// A non-final segment does not exist.
    #[error("{path}: no field {segment:?}")]
    Missing {
        /// Full path being resolved.
        path: String,
        /// Segment that was not found.
        segment: String,
    },
    /// A segment was applied to a value that has no fields.
    #[error("{path}: cannot look up {segment:?} in a scalar value")]
    NotIndexable {
        /// Full path being resolved.
        path: String,
        /// Segment applied to the scalar.
        segment: String,
    },
    /// Path still holds a repetition placeholder.
    #[error("{path}: placeholder is not bound to a repetition index")]
    UnboundPlaceholder {
        /// Full path being resolved.
        path: String,
    },
    /// `data-fir-click` resolved to something other than an action.
    #[error("{path}: value is not callable")]
    NotCallable {
        /// Full path being resolved.
        path: String,
    },
    /// Value has no display form (record or action).
    #[error("{path}: value cannot be displayed as text")]
    NotDisplayable {
        /// Full path being resolved.
        path: String,
    },
    /// `data-fir-foreach` resolved to something other than a list.
    #[error("{path}: value is not a list")]
    NotAList {
        /// Full path being resolved.
        path: String,
    },
}

/// Raw directive attribute value is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DirectiveValueError {
    /// `name:path` value without a `:`.
    #[error("expected \"name:path\", got {raw:?}")]
    MissingSeparator {
        /// Raw attribute value.
        raw: String,
    },
    /// `name:path` value with an empty name.
    #[error("empty name in {raw:?}")]
    EmptyName {
        /// Raw attribute value.
        raw: String,
    },
    /// Empty field path.
    #[error("empty field path")]
    EmptyPath,
}

/// Failure of a single directive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// Path resolution failed.
    #[error(transparent)]
    Path(#[from] PathError),
    /// Directive value is malformed.
    #[error(transparent)]
    Value(#[from] DirectiveValueError),
}

/// Directive failure located on an element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}=\"{raw}\" on <{tag}>: {error}")]
pub struct DirectiveFailure {
    /// Directive kind.
    pub kind: DirectiveKind,
    /// Attribute value as seen by the pass.
    pub raw: String,
    /// Tag of the element carrying the directive.
    pub tag: String,
    /// Underlying error.
    #[source]
    pub error: DirectiveError,
}

/// Failures collected during one render pass.
///
/// Elements that rendered successfully keep their effects; the failures
/// describe the elements that did not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderFailures {
    failures: Vec<DirectiveFailure>,
}

impl RenderFailures {
    pub(crate) fn new(failures: Vec<DirectiveFailure>) -> Self {
        Self { failures }
    }

    /// Number of failed directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// True if no directive failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Iterate over failures in the order they were detected.
    pub fn iter(&self) -> std::slice::Iter<'_, DirectiveFailure> {
        self.failures.iter()
    }

    /// First failure detected.
    #[must_use]
    pub fn first(&self) -> Option<&DirectiveFailure> {
        self.failures.first()
    }
}

impl fmt::Display for RenderFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} directive(s) failed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RenderFailures {}

impl<'a> IntoIterator for &'a RenderFailures {
    type Item = &'a DirectiveFailure;
    type IntoIter = std::slice::Iter<'a, DirectiveFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

/// Error from template instantiation.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// No template registered under the id.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Directives failed while rendering the template.
    #[error("failed to render template {id}")]
    Render {
        /// Template id.
        id: String,
        /// Directive failures of the pass.
        #[source]
        failures: RenderFailures,
    },

    /// Template markup could not be parsed.
    #[error("template markup error")]
    Parse(#[from] fir_dom::ParseError),

    /// Template file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

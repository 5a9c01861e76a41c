//! Directive attributes and their parsed form.
//!
//! Directives are `data-fir-<selector>` attributes. The set of selectors is
//! closed; each maps to one [`DirectiveKind`].

use std::fmt;

use crate::error::DirectiveValueError;
use crate::path::FieldPath;

/// Prefix shared by every directive attribute.
pub const ATTRIBUTE_PREFIX: &str = "data-fir-";

/// Kind of directive, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// Repeat the element once per list item.
    Foreach,
    /// Replace the element's children with a display string.
    Content,
    /// Register an action as the click listener.
    Click,
    /// Hide the element when the value is falsy.
    If,
    /// Hide the element when the value is truthy.
    IfNot,
    /// Set an attribute from a value.
    Attr,
    /// Set a style property from a value.
    Style,
}

impl DirectiveKind {
    /// All kinds in registry order.
    pub const ALL: [Self; 7] = [
        Self::Foreach,
        Self::Content,
        Self::Click,
        Self::If,
        Self::IfNot,
        Self::Attr,
        Self::Style,
    ];

    /// Kinds evaluated after the repetition pre-pass, in order.
    pub const EVALUATION_ORDER: [Self; 6] = [
        Self::Content,
        Self::Click,
        Self::If,
        Self::IfNot,
        Self::Attr,
        Self::Style,
    ];

    /// Selector following the attribute prefix.
    #[must_use]
    pub fn selector(self) -> &'static str {
        match self {
            Self::Foreach => "foreach",
            Self::Content => "content",
            Self::Click => "click",
            Self::If => "if",
            Self::IfNot => "if-not",
            Self::Attr => "attr",
            Self::Style => "style",
        }
    }

    /// Full attribute name, e.g. `data-fir-content`.
    #[must_use]
    pub fn attribute(self) -> String {
        format!("{ATTRIBUTE_PREFIX}{}", self.selector())
    }

    /// Kind for a full attribute name.
    #[must_use]
    pub fn from_attribute(name: &str) -> Option<Self> {
        let selector = name.strip_prefix(ATTRIBUTE_PREFIX)?;
        Self::ALL.into_iter().find(|kind| kind.selector() == selector)
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ATTRIBUTE_PREFIX}{}", self.selector())
    }
}

/// Parsed directive attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `data-fir-foreach="path"`.
    Foreach(FieldPath),
    /// `data-fir-content="path"`.
    Content(FieldPath),
    /// `data-fir-click="path"`.
    Click(FieldPath),
    /// `data-fir-if="path"`.
    If(FieldPath),
    /// `data-fir-if-not="path"`.
    IfNot(FieldPath),
    /// `data-fir-attr="name:path"`.
    Attr {
        /// Attribute to set.
        name: String,
        /// Value path.
        path: FieldPath,
    },
    /// `data-fir-style="property:path"`.
    Style {
        /// Style property as written (camelCase or kebab-case).
        property: String,
        /// Value path.
        path: FieldPath,
    },
}

impl Directive {
    /// Parse the raw attribute value of a directive of `kind`.
    ///
    /// `attr` and `style` values are split at the first `:`.
    pub fn parse(kind: DirectiveKind, raw: &str) -> Result<Self, DirectiveValueError> {
        Ok(match kind {
            DirectiveKind::Foreach => Self::Foreach(FieldPath::parse(raw)?),
            DirectiveKind::Content => Self::Content(FieldPath::parse(raw)?),
            DirectiveKind::Click => Self::Click(FieldPath::parse(raw)?),
            DirectiveKind::If => Self::If(FieldPath::parse(raw)?),
            DirectiveKind::IfNot => Self::IfNot(FieldPath::parse(raw)?),
            DirectiveKind::Attr => {
                let (name, path) = split_pair(raw)?;
                Self::Attr { name, path }
            }
            DirectiveKind::Style => {
                let (property, path) = split_pair(raw)?;
                Self::Style { property, path }
            }
        })
    }

    /// Kind of this directive.
    #[must_use]
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Self::Foreach(_) => DirectiveKind::Foreach,
            Self::Content(_) => DirectiveKind::Content,
            Self::Click(_) => DirectiveKind::Click,
            Self::If(_) => DirectiveKind::If,
            Self::IfNot(_) => DirectiveKind::IfNot,
            Self::Attr { .. } => DirectiveKind::Attr,
            Self::Style { .. } => DirectiveKind::Style,
        }
    }

    /// Field path the directive reads.
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Foreach(path)
            | Self::Content(path)
            | Self::Click(path)
            | Self::If(path)
            | Self::IfNot(path)
            | Self::Attr { path, .. }
            | Self::Style { path, .. } => path,
        }
    }

    fn path_mut(&mut self) -> &mut FieldPath {
        match self {
            Self::Foreach(path)
            | Self::Content(path)
            | Self::Click(path)
            | Self::If(path)
            | Self::IfNot(path)
            | Self::Attr { path, .. }
            | Self::Style { path, .. } => path,
        }
    }

    /// Bind the first placeholder of the path to `list/index`.
    ///
    /// Returns `false` when the path has no placeholder.
    pub fn bind(&mut self, list: &FieldPath, index: usize) -> bool {
        self.path_mut().bind(list, index)
    }

    /// Attribute value that parses back into this directive.
    #[must_use]
    pub fn raw_value(&self) -> String {
        match self {
            Self::Attr { name, path } => format!("{name}:{path}"),
            Self::Style { property, path } => format!("{property}:{path}"),
            _ => self.path().to_string(),
        }
    }
}

fn split_pair(raw: &str) -> Result<(String, FieldPath), DirectiveValueError> {
    let (name, path) = raw
        .split_once(':')
        .ok_or_else(|| DirectiveValueError::MissingSeparator {
            raw: raw.to_owned(),
        })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(DirectiveValueError::EmptyName {
            raw: raw.to_owned(),
        });
    }
    Ok((name.to_owned(), FieldPath::parse(path.trim())?))
}

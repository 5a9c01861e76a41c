//! Error types for DOM parsing.

/// Error while parsing template markup.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parse error")]
    XmlParse(#[from] quick_xml::Error),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// End tag does not close the innermost open element.
    #[error("expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        /// Innermost open element.
        expected: String,
        /// End tag found instead.
        found: String,
    },

    /// Markup ended inside an open element.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// Markup contained no element where one was required.
    #[error("markup contains no element")]
    NoElement,
}

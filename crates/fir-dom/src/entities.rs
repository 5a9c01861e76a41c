//! HTML entity to Unicode conversion.
//!
//! Template files use HTML named entities that an XML reader does not know.
//! They are converted to Unicode before parsing. Standard XML entities (amp,
//! lt, gt, quot, apos) and numeric references are left for the reader. A
//! bare `&` that starts no reference, valid in HTML, is escaped as `&amp;`.

use std::sync::LazyLock;

use regex::Regex;

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:([a-zA-Z][a-zA-Z0-9]*);|(#[0-9]+;|#[xX][0-9a-fA-F]+;))?")
        .expect("invalid entity regex")
});

/// Convert HTML named entities to Unicode characters.
///
/// Unknown entities, the five XML entities and numeric references are
/// preserved as written. Bare ampersands become `&amp;`.
pub fn convert_html_entities(html: &str) -> String {
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| match caps.get(1) {
            Some(name) => entity_to_unicode(name.as_str())
                .map_or_else(|| caps[0].to_owned(), String::from),
            None if caps.get(2).is_some() => caps[0].to_owned(),
            None => "&amp;".to_owned(),
        })
        .into_owned()
}

fn entity_to_unicode(name: &str) -> Option<&'static str> {
    Some(match name {
        // Spacing and punctuation
        "nbsp" => "\u{00a0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "middot" => "\u{00b7}",
        "bull" => "\u{2022}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",

        // Ratings
        "star" => "\u{2606}",
        "starf" => "\u{2605}",

        // Currency
        "cent" => "\u{00a2}",
        "pound" => "\u{00a3}",
        "yen" => "\u{00a5}",
        "euro" => "\u{20ac}",

        // Arrows
        "larr" => "\u{2190}",
        "rarr" => "\u{2192}",
        "uarr" => "\u{2191}",
        "darr" => "\u{2193}",

        // Misc
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "deg" => "\u{00b0}",
        "times" => "\u{00d7}",

        _ => return None,
    })
}

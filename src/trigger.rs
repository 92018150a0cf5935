//! Directive region matching
//!
//! A [`Matcher`] scans source text for directive regions and reports each one
//! as a [`TriggerMatch`]. The rest of the pipeline only sees match records, so
//! alternative trigger syntaxes can be plugged in without touching
//! normalization, naming or rewriting.
//!
//! Two matchers are provided:
//!
//! - [`DirectiveMatcher`] recognizes quoted strings starting with a marker such
//!   as `:uno:` (optionally `:uno-name:`), e.g. `class=":uno: flex p-1"`.
//! - [`PatternMatcher`] takes a user regular expression with a `body` group
//!   and an optional `name` group.

use std::ops::Range;

use regex::Regex;
use thiserror::Error;

/// Default directive marker.
pub const DEFAULT_MARKER: &str = ":uno:";

/// Quote characters that may delimit a directive region.
pub const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Name of the capture group holding the directive body.
pub const BODY_GROUP: &str = "body";

/// Name of the capture group holding an explicit class name.
pub const NAME_GROUP: &str = "name";

/// Error building a matcher.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum TriggerError {
    /// The directive marker is empty
    #[error("directive marker must not be empty")]
    EmptyMarker,
    /// The trigger pattern is not a valid regular expression
    #[error("invalid trigger pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    /// The trigger pattern has no group to take the body from
    #[error("trigger pattern '{0}' must have a `body` group or at least one capture group")]
    MissingBodyGroup(String),
}

/// One directive region found in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Byte range of the whole directive literal, delimiters included.
    pub range: Range<usize>,
    /// Quote character delimiting the literal, if any.
    pub delimiter: Option<char>,
    /// Explicit class name captured from the directive.
    pub name: Option<String>,
    /// Raw body text (untrimmed).
    pub body: String,
}

impl TriggerMatch {
    /// The byte range that is rewritten: the literal without its delimiters.
    ///
    /// Replacing this range is equivalent to replacing [`TriggerMatch::range`]
    /// with the replacement wrapped in the same delimiter.
    pub fn content_range(&self) -> Range<usize> {
        match self.delimiter {
            Some(q) => self.range.start + q.len_utf8()..self.range.end - q.len_utf8(),
            None => self.range.clone(),
        }
    }
}

/// Finds directive regions in source text.
pub trait Matcher: Send + Sync {
    /// Return all non-overlapping matches in left-to-right order.
    fn find_all(&self, source: &str) -> Vec<TriggerMatch>;
}

/// Matches quoted strings that begin with a directive marker.
///
/// The region is `<q><marker><ws><body><q>` where `<q>` is one of
/// [`QUOTES`] and the closing quote is the first occurrence of the same
/// character after the marker. When naming is enabled and the marker ends
/// with `:`, an explicit name may be embedded before that colon:
/// `:uno-card_title:`. Names consist of word characters, `_` and `-`.
///
/// # Example
///
/// ```
/// use compile_class::trigger::{DirectiveMatcher, Matcher};
///
/// let matcher = DirectiveMatcher::new(":uno:", true).unwrap();
/// let found = matcher.find_all(r#"<div class=":uno-card: p-1 m-2">"#);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name.as_deref(), Some("card"));
/// assert_eq!(found[0].body.trim(), "p-1 m-2");
/// ```
#[derive(Debug, Clone)]
pub struct DirectiveMatcher {
    marker: String,
    head: Regex,
}

impl DirectiveMatcher {
    /// Build a matcher for `marker`, optionally accepting embedded names.
    pub fn new(marker: &str, named: bool) -> Result<Self, TriggerError> {
        if marker.is_empty() {
            return Err(TriggerError::EmptyMarker);
        }

        let marker_pattern = match marker.strip_suffix(':') {
            Some(stem) if named && !stem.is_empty() => {
                format!(r"{}(?:-(?P<{}>[\w-]+))?:", regex::escape(stem), NAME_GROUP)
            }
            _ => regex::escape(marker),
        };
        let head = Regex::new(&format!(r#"(?P<quote>["'`]){}\s"#, marker_pattern))?;

        Ok(Self { marker: marker.to_string(), head })
    }

    /// The literal marker this matcher looks for.
    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Matcher for DirectiveMatcher {
    fn find_all(&self, source: &str) -> Vec<TriggerMatch> {
        let mut matches = Vec::new();
        let mut pos = 0;

        while pos < source.len() {
            let Some(caps) = self.head.captures_at(source, pos) else {
                break;
            };
            let Some(head) = caps.get(0) else {
                break;
            };
            let quote_match = &caps["quote"];
            let quote = quote_match.chars().next().unwrap_or('"');

            // The whitespace after the marker belongs to the body
            let body_start = head.end() - trailing_char_len(head.as_str());
            match source[head.end()..].find(quote) {
                Some(rel) => {
                    let close = head.end() + rel;
                    matches.push(TriggerMatch {
                        range: head.start()..close + quote.len_utf8(),
                        delimiter: Some(quote),
                        name: caps.name(NAME_GROUP).map(|m| m.as_str().to_string()),
                        body: source[body_start..close].to_string(),
                    });
                    pos = close + quote.len_utf8();
                }
                None => {
                    // Unterminated: skip this opening quote and keep scanning
                    pos = head.start() + quote.len_utf8();
                }
            }
        }

        matches
    }
}

fn trailing_char_len(s: &str) -> usize {
    s.chars().last().map_or(0, char::len_utf8)
}

/// Matches regions with a user-supplied regular expression.
///
/// The body is taken from the `body` group, or from the last capture group
/// when there is no group of that name. An explicit name is taken from the
/// optional `name` group. If the whole match starts and ends with the same
/// quote character, that character is treated as the delimiter and kept when
/// the region is rewritten.
///
/// # Example
///
/// ```
/// use compile_class::trigger::{Matcher, PatternMatcher};
///
/// let matcher = PatternMatcher::new(r#""@apply\((?P<body>[^)]*)\)""#).unwrap();
/// let found = matcher.find_all(r#"<a class="@apply(p-1 m-2)">"#);
/// assert_eq!(found[0].body, "p-1 m-2");
/// assert_eq!(found[0].delimiter, Some('"'));
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Regex,
    body_group: usize,
}

impl PatternMatcher {
    /// Compile `pattern` into a matcher.
    pub fn new(pattern: &str) -> Result<Self, TriggerError> {
        let regex = Regex::new(pattern)?;
        let groups = regex.captures_len();
        let body_group = regex
            .capture_names()
            .position(|name| name == Some(BODY_GROUP))
            .or_else(|| (groups > 1).then(|| groups - 1))
            .ok_or_else(|| TriggerError::MissingBodyGroup(pattern.to_string()))?;

        Ok(Self { pattern: regex, body_group })
    }

    /// The source of the compiled pattern.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Matcher for PatternMatcher {
    fn find_all(&self, source: &str) -> Vec<TriggerMatch> {
        self.pattern
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let body = caps.get(self.body_group).map_or("", |m| m.as_str());
                Some(TriggerMatch {
                    range: whole.range(),
                    delimiter: enclosing_quote(whole.as_str()),
                    name: caps.name(NAME_GROUP).map(|m| m.as_str().to_string()),
                    body: body.to_string(),
                })
            })
            .collect()
    }
}

/// Return the quote character wrapping `s` on both ends, if any.
fn enclosing_quote(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    (first == last && QUOTES.contains(&first)).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive() -> DirectiveMatcher {
        DirectiveMatcher::new(DEFAULT_MARKER, true).unwrap()
    }

    #[test]
    fn test_basic_double_quotes() {
        let src = r#"<div class=":uno: flex p-1">"#;
        let found = directive().find_all(src);
        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(&src[m.range.clone()], r#"":uno: flex p-1""#);
        assert_eq!(&src[m.content_range()], ":uno: flex p-1");
        assert_eq!(m.delimiter, Some('"'));
        assert_eq!(m.name, None);
        assert_eq!(m.body.trim(), "flex p-1");
    }

    #[test]
    fn test_single_and_backtick_quotes() {
        let src = "a(':uno: p-1') b(`:uno: m-2`)";
        let found = directive().find_all(src);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].delimiter, Some('\''));
        assert_eq!(found[0].body.trim(), "p-1");
        assert_eq!(found[1].delimiter, Some('`'));
        assert_eq!(found[1].body.trim(), "m-2");
    }

    #[test]
    fn test_closing_quote_must_match_opening() {
        // The single quote inside does not close a double-quoted region
        let src = r#"x=":uno: content-['a'] p-1""#;
        let found = directive().find_all(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].body.trim(), "content-['a'] p-1");
    }

    #[test]
    fn test_explicit_names() {
        let src = r#"<a class=":uno-foo: p-1"><b class=":uno-foo_bar-baz: m-1">"#;
        let found = directive().find_all(src);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name.as_deref(), Some("foo"));
        assert_eq!(found[1].name.as_deref(), Some("foo_bar-baz"));
        assert_eq!(found[1].body.trim(), "m-1");
    }

    #[test]
    fn test_names_disabled() {
        let matcher = DirectiveMatcher::new(DEFAULT_MARKER, false).unwrap();
        let found = matcher.find_all(r#"<a class=":uno-foo: p-1"><b class=":uno: m-1">"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, None);
        assert_eq!(found[0].body.trim(), "m-1");
    }

    #[test]
    fn test_requires_whitespace_after_marker() {
        assert!(directive().find_all(r#"<a class=":uno:p-1">"#).is_empty());
    }

    #[test]
    fn test_non_trigger_text_ignored() {
        let src = r#"<div class="foo bar"><div class="uno: p-1">"#;
        assert!(directive().find_all(src).is_empty());
    }

    #[test]
    fn test_body_may_span_lines() {
        let src = "<div class=\":uno: flex\n  p-1\">";
        let found = directive().find_all(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].body.split_whitespace().count(), 2);
    }

    #[test]
    fn test_unterminated_region_is_skipped() {
        let src = r#"<a class=":uno: p-1> <b class=':uno: m-1'>"#;
        let found = directive().find_all(src);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].body.trim(), "m-1");
    }

    #[test]
    fn test_matches_do_not_overlap() {
        let src = r#"":uno: a"":uno: b""#;
        let found = directive().find_all(src);
        assert_eq!(found.len(), 2);
        assert!(found[0].range.end <= found[1].range.start);
    }

    #[test]
    fn test_custom_marker_is_escaped() {
        let matcher = DirectiveMatcher::new("@cc:", true).unwrap();
        let found = matcher.find_all(r#"<a class="@cc-x: p-1"><b class="@cc: m-1">"#);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name.as_deref(), Some("x"));
        assert_eq!(matcher.marker(), "@cc:");
    }

    #[test]
    fn test_empty_marker_rejected() {
        assert!(matches!(DirectiveMatcher::new("", true), Err(TriggerError::EmptyMarker)));
    }

    #[test]
    fn test_pattern_matcher_named_groups() {
        let matcher =
            PatternMatcher::new(r#""cc(?:-(?P<name>\w+))?\[(?P<body>[^\]]*)\]""#).unwrap();
        let found = matcher.find_all(r#"<a class="cc-btn[p-1 m-1]"><b class="cc[w-1]">"#);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name.as_deref(), Some("btn"));
        assert_eq!(found[0].body, "p-1 m-1");
        assert_eq!(found[1].name, None);
        assert_eq!(found[1].delimiter, Some('"'));
    }

    #[test]
    fn test_pattern_matcher_uses_last_group() {
        let matcher = PatternMatcher::new(r"@apply\s+(\S+)\s+([^;]*);").unwrap();
        let found = matcher.find_all("@apply ignored p-1 m-1;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].body, "p-1 m-1");
        assert_eq!(found[0].delimiter, None);
        assert_eq!(found[0].content_range(), found[0].range);
    }

    #[test]
    fn test_pattern_matcher_requires_group() {
        let err = PatternMatcher::new(r"@apply").unwrap_err();
        assert!(matches!(err, TriggerError::MissingBodyGroup(_)));
    }

    #[test]
    fn test_pattern_matcher_invalid_regex() {
        let err = PatternMatcher::new(r"(unclosed").unwrap_err();
        assert!(matches!(err, TriggerError::InvalidPattern(_)));
    }
}

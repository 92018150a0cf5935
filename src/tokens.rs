//! Utility token normalization
//!
//! A directive body is a whitespace-separated list of utility tokens. Two bodies
//! that contain the same tokens, in any order and with any repetition, compile
//! to the same class. [`TokenSet`] is that canonical form.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::variant_group::expand_variant_groups;

/// Canonical, duplicate-free, order-independent set of utility tokens.
///
/// Tokens keep their literal text; no case folding or alias resolution is
/// performed. Iteration yields tokens sorted by their UTF-16 code units, which
/// is also the order used by [`TokenSet::canonical`]. This differs from plain
/// `str` ordering only when astral characters meet BMP characters at or above
/// U+E000.
///
/// # Example
///
/// ```
/// use compile_class::tokens::TokenSet;
///
/// let a = TokenSet::parse("w-1 h-1 w-1");
/// let b = TokenSet::parse("h-1   w-1");
/// assert_eq!(a, b);
/// assert_eq!(a.canonical(), "h-1 w-1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSet {
    tokens: BTreeSet<String>,
}

impl TokenSet {
    /// Create an empty token set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `body` on whitespace runs into a token set.
    ///
    /// Variant groups are not expanded; use [`TokenSet::from_body`] for raw
    /// directive bodies.
    pub fn parse(body: &str) -> Self {
        body.split_whitespace().collect()
    }

    /// Normalize a raw directive body: trim, expand variant groups, split.
    pub fn from_body(body: &str) -> Self {
        Self::parse(&expand_variant_groups(body.trim()))
    }

    /// Add a token. Empty and whitespace-only tokens are ignored.
    ///
    /// Returns `true` if the token was not present before.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if token.trim().is_empty() {
            return false;
        }
        self.tokens.insert(token)
    }

    /// Check whether `token` is a member.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the set has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over tokens in canonical (UTF-16 sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let mut sorted: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        sorted.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
        sorted.into_iter()
    }

    /// Canonical string form: sorted tokens joined by a single space.
    ///
    /// This is the input to the name digest and the body handed to the style
    /// generator.
    pub fn canonical(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

//! Boundary with the style generation engine
//!
//! The transform never produces CSS itself. It asks the generator which tokens
//! it understands and hands every newly compiled class over as a [`Shortcut`]:
//! a name plus the canonical token body the generator should expand under it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::registry::CompiledClass;

/// A named alias for a set of utility tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    /// Compiled class name
    pub name: String,
    /// Canonical token body: sorted tokens joined by a single space
    pub body: String,
    /// Layer to emit the shortcut rules into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl Shortcut {
    pub fn from_class(class: &CompiledClass, layer: Option<&str>) -> Self {
        Self { name: class.name.clone(), body: class.body(), layer: layer.map(str::to_string) }
    }

    /// Tokens of the body, in canonical order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.body.split_whitespace()
    }
}

/// A style generator that accepts shortcut definitions.
pub trait StyleGenerator {
    /// Whether the generator produces rules for `token`.
    ///
    /// Only consulted when unknown tokens are kept out of compiled classes.
    fn is_known(&self, _token: &str) -> bool {
        true
    }

    /// Register a shortcut definition.
    fn add_shortcut(&mut self, shortcut: Shortcut);
}

/// In-memory [`StyleGenerator`] that records shortcuts in registration order.
///
/// By default every token is known; [`ShortcutTable::with_known_tokens`]
/// restricts recognition to a fixed vocabulary.
///
/// # Example
///
/// ```
/// use compile_class::generator::{Shortcut, ShortcutTable, StyleGenerator};
///
/// let mut table = ShortcutTable::with_known_tokens(["p-1", "m-1"]);
/// assert!(table.is_known("p-1"));
/// assert!(!table.is_known("my-widget"));
///
/// table.add_shortcut(Shortcut { name: "uno-a".into(), body: "m-1 p-1".into(), layer: None });
/// assert_eq!(table.get("uno-a").unwrap().body, "m-1 p-1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShortcutTable {
    shortcuts: Vec<Shortcut>,
    known: Option<HashSet<String>>,
}

impl ShortcutTable {
    /// Create a table that recognizes every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table that recognizes only `tokens`.
    pub fn with_known_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { shortcuts: Vec::new(), known: Some(tokens.into_iter().map(Into::into).collect()) }
    }

    /// Recorded shortcuts in registration order.
    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// Get the most recent shortcut registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().rev().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }
}

impl StyleGenerator for ShortcutTable {
    fn is_known(&self, token: &str) -> bool {
        self.known.as_ref().map_or(true, |known| known.contains(token))
    }

    fn add_shortcut(&mut self, shortcut: Shortcut) {
        self.shortcuts.push(shortcut);
    }
}

//! Compiled class name resolution.

use std::fmt;

use crate::hash;
use crate::registry::NameOrigin;
use crate::tokens::TokenSet;

/// Default prefix prepended to every compiled class name.
pub const DEFAULT_CLASS_PREFIX: &str = "uno-";

/// Function turning a canonical token string into a short digest.
pub type HashFn = fn(&str) -> String;

/// Derives compiled class names from explicit names or token digests.
///
/// # Example
///
/// ```
/// use compile_class::naming::NameResolver;
/// use compile_class::registry::NameOrigin;
/// use compile_class::tokens::TokenSet;
///
/// let resolver = NameResolver::default();
/// let tokens = TokenSet::parse("w-1 h-1");
///
/// assert_eq!(resolver.resolve(None, &tokens), ("uno-prhvrm".to_string(), NameOrigin::Derived));
/// assert_eq!(resolver.resolve(Some("card"), &tokens), ("uno-card".to_string(), NameOrigin::Explicit));
/// ```
#[derive(Clone)]
pub struct NameResolver {
    prefix: String,
    hasher: HashFn,
}

impl fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameResolver").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS_PREFIX)
    }
}

impl NameResolver {
    /// Create a resolver using the default digest.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), hasher: hash::digest }
    }

    /// Replace the digest function.
    pub fn with_hasher(mut self, hasher: HashFn) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve the class name for a region.
    ///
    /// An explicit name is used verbatim after the prefix. Otherwise the name
    /// is the prefix followed by the digest of the canonical token string.
    pub fn resolve(&self, explicit: Option<&str>, tokens: &TokenSet) -> (String, NameOrigin) {
        match explicit {
            Some(name) => (format!("{}{}", self.prefix, name), NameOrigin::Explicit),
            None => (
                format!("{}{}", self.prefix, (self.hasher)(&tokens.canonical())),
                NameOrigin::Derived,
            ),
        }
    }
}

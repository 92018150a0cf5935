//! Compiled class registry for conflict detection
//!
//! The registry maps compiled class names to the token sets they stand for.
//! Reusing a name is allowed only when it denotes the same token set; any other
//! reuse is a [`RegistryError::NameConflict`]. This applies to explicit names
//! and hash-derived names alike, so a digest collision is reported the same way
//! as two regions that picked the same manual name.
//!
//! Entries are enumerated in first-registration order so that shortcut output
//! is deterministic.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tokens::TokenSet;

/// Where a compiled class name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameOrigin {
    /// Supplied in the directive (`:uno-name:`)
    Explicit,
    /// Digest of the canonical token set
    Derived,
}

impl fmt::Display for NameOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameOrigin::Explicit => f.write_str("explicit"),
            NameOrigin::Derived => f.write_str("derived"),
        }
    }
}

/// A compiled class: one name standing for a set of utility tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledClass {
    pub name: String,
    pub tokens: TokenSet,
    pub origin: NameOrigin,
}

impl CompiledClass {
    pub fn new(name: impl Into<String>, tokens: TokenSet, origin: NameOrigin) -> Self {
        Self { name: name.into(), tokens, origin }
    }

    /// Canonical body handed to the style generator.
    pub fn body(&self) -> String {
        self.tokens.canonical()
    }
}

/// Error raised when a name is reused for a different token set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Name already registered with different tokens
    #[error("duplicate compile class name '{name}', please choose different class name")]
    NameConflict { name: String, existing: TokenSet, requested: TokenSet },
}

impl RegistryError {
    /// The conflicting class name.
    pub fn name(&self) -> &str {
        match self {
            RegistryError::NameConflict { name, .. } => name,
        }
    }
}

/// Ordered mapping from compiled class name to [`CompiledClass`].
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    entries: Vec<CompiledClass>,
    index: HashMap<String, usize>,
}

impl ClassRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a class by name.
    pub fn get(&self, name: &str) -> Option<&CompiledClass> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Check if a class with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Iterate over classes in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledClass> {
        self.entries.iter()
    }

    /// Iterate over class names in first-registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name.as_str())
    }

    /// Check `name` against the registry without modifying it.
    ///
    /// Returns the existing entry when `name` is registered with the same
    /// tokens, `None` when it is free, and an error when it is taken by a
    /// different token set.
    pub fn lookup(
        &self,
        name: &str,
        tokens: &TokenSet,
    ) -> Result<Option<&CompiledClass>, RegistryError> {
        match self.get(name) {
            None => Ok(None),
            Some(existing) if existing.tokens == *tokens => Ok(Some(existing)),
            Some(existing) => Err(RegistryError::NameConflict {
                name: name.to_string(),
                existing: existing.tokens.clone(),
                requested: tokens.clone(),
            }),
        }
    }

    /// Register `name` for `tokens`, or reuse the identical existing entry.
    ///
    /// An existing entry keeps its original origin.
    pub fn resolve(
        &mut self,
        name: &str,
        tokens: TokenSet,
        origin: NameOrigin,
    ) -> Result<&CompiledClass, RegistryError> {
        match self.index.get(name).copied() {
            Some(i) => {
                if self.entries[i].tokens != tokens {
                    return Err(RegistryError::NameConflict {
                        name: name.to_string(),
                        existing: self.entries[i].tokens.clone(),
                        requested: tokens,
                    });
                }
                Ok(&self.entries[i])
            }
            None => {
                let i = self.entries.len();
                self.entries.push(CompiledClass::new(name, tokens, origin));
                self.index.insert(name.to_string(), i);
                Ok(&self.entries[i])
            }
        }
    }

    /// Move every entry of `other` into this registry.
    ///
    /// All entries are checked before any is inserted, so on error this
    /// registry is unchanged. Returns the names that were newly added.
    pub fn merge(&mut self, other: ClassRegistry) -> Result<Vec<String>, RegistryError> {
        for class in other.iter() {
            self.lookup(&class.name, &class.tokens)?;
        }

        let mut added = Vec::new();
        for class in other.entries {
            if !self.contains(&class.name) {
                added.push(class.name.clone());
                let i = self.entries.len();
                self.index.insert(class.name.clone(), i);
                self.entries.push(class);
            }
        }
        Ok(added)
    }
}

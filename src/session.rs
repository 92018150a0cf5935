//! Transform session state
//!
//! A [`Session`] owns everything that must stay consistent across the files of
//! one build: the compiled class registry and the token-tracking set used by
//! the host for cache invalidation. It is passed explicitly (`&mut`) into every
//! transform pass, so independent builds never share mappings by accident.

use std::collections::HashSet;

use crate::generator::{Shortcut, StyleGenerator};
use crate::registry::{ClassRegistry, RegistryError};

/// Registry and tracking state for one build session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    registry: ClassRegistry,
    tracked: HashSet<String>,
}

impl Session {
    /// Create a new empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled classes registered so far.
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Class names recorded for downstream cache invalidation.
    ///
    /// The transform only inserts into this set.
    pub fn tracked_tokens(&self) -> &HashSet<String> {
        &self.tracked
    }

    /// Commit classes staged by a successful pass.
    ///
    /// Returns the names that were new to the session. On error nothing is
    /// committed.
    pub(crate) fn commit(&mut self, staged: ClassRegistry) -> Result<Vec<String>, RegistryError> {
        let names: Vec<String> = staged.names().map(str::to_string).collect();
        let added = self.registry.merge(staged)?;
        self.tracked.extend(names);
        Ok(added)
    }

    /// All registered classes as shortcut definitions, in registration order.
    pub fn shortcuts(&self, layer: Option<&str>) -> Vec<Shortcut> {
        self.registry.iter().map(|class| Shortcut::from_class(class, layer)).collect()
    }

    /// Register every class with `generator`.
    pub fn register_all<G: StyleGenerator + ?Sized>(&self, generator: &mut G, layer: Option<&str>) {
        for shortcut in self.shortcuts(layer) {
            generator.add_shortcut(shortcut);
        }
    }

    /// Serialize all shortcut definitions as a JSON array.
    pub fn to_json(&self, layer: Option<&str>) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.shortcuts(layer))
    }

    /// Drop all registered classes and tracked tokens.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.tracked.clear();
    }
}

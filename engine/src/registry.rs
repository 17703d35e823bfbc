//! Tag registry: collision-free bit position assignment.
//!
//! Scenarios are registered first, then operations, each taking the next
//! position starting at 1. The namespace of a name is fixed at registration,
//! so a lookup returns a tagged [`TagLookup`] instead of re-deriving the kind
//! from the string on every query.

use std::collections::HashMap;

use capmatrix_types::{BitVector, NONE_SCENARIO, Position, ScenarioSet, TagKind};

#[derive(Debug, Clone)]
struct TagEntry {
    kind: TagKind,
    position: Position,
    vector: BitVector,
}

/// Result of resolving a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLookup<'a> {
    Operation(&'a BitVector),
    Scenario(&'a BitVector),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct TagRegistry {
    entries: HashMap<String, TagEntry>,
    order: Vec<String>,
    none: BitVector,
}

impl TagRegistry {
    /// Register `scenarios` then `operations` in order.
    ///
    /// A name that is already registered keeps its first position; the later
    /// registration is dropped with a warning.
    pub fn build<S: AsRef<str>>(scenarios: &ScenarioSet, operations: &[S]) -> Self {
        let mut registry = Self {
            entries: HashMap::with_capacity(scenarios.len() + operations.len()),
            order: Vec::with_capacity(scenarios.len() + operations.len()),
            none: BitVector::zero(),
        };

        for name in scenarios.iter() {
            registry.register(name, TagKind::Scenario);
        }
        for name in operations {
            registry.register(name.as_ref(), TagKind::Operation);
        }

        // ScenarioSet always carries the sentinel and scenarios register first,
        // so this lookup cannot miss.
        if let Some(entry) = registry.entries.get(NONE_SCENARIO) {
            registry.none = entry.vector.clone();
        }
        registry
    }

    fn register(&mut self, name: &str, kind: TagKind) {
        if let Some(existing) = self.entries.get(name) {
            tracing::warn!(
                tag = name,
                kind = kind.as_str(),
                registered_as = existing.kind.as_str(),
                position = existing.position.get(),
                "Duplicate tag ignored"
            );
            return;
        }

        let position = match Position::from_index(self.order.len()) {
            Ok(position) => position,
            Err(err) => {
                tracing::warn!(tag = name, "Tag not registered: {err}");
                return;
            }
        };
        self.entries.insert(
            name.to_string(),
            TagEntry {
                kind,
                position,
                vector: BitVector::encode_bit(position),
            },
        );
        self.order.push(name.to_string());
    }

    #[must_use]
    pub fn resolve(&self, name: &str) -> TagLookup<'_> {
        match self.entries.get(name) {
            Some(TagEntry {
                kind: TagKind::Operation,
                vector,
                ..
            }) => TagLookup::Operation(vector),
            Some(TagEntry {
                kind: TagKind::Scenario,
                vector,
                ..
            }) => TagLookup::Scenario(vector),
            None => TagLookup::Unknown,
        }
    }

    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&BitVector> {
        match self.resolve(name) {
            TagLookup::Operation(vector) => Some(vector),
            _ => None,
        }
    }

    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&BitVector> {
        match self.resolve(name) {
            TagLookup::Scenario(vector) => Some(vector),
            _ => None,
        }
    }

    /// Vector of the `none` scenario sentinel.
    #[must_use]
    pub fn none(&self) -> &BitVector {
        &self.none
    }

    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<Position> {
        self.entries.get(name).map(|entry| entry.position)
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<TagKind> {
        self.entries.get(name).map(|entry| entry.kind)
    }

    /// Registered names in position order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.names_of(TagKind::Scenario)
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.names_of(TagKind::Operation)
    }

    fn names_of(&self, kind: TagKind) -> impl Iterator<Item = &str> {
        self.names()
            .filter(move |name| self.kind_of(name) == Some(kind))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

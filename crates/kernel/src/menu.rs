//! Navigation menu metadata.
//!
//! Menus carry route metadata for navigation chrome; visibility is
//! decided per actor by probing the access gate, so revoked entries
//! disappear without touching the route tables.

use serde::{Deserialize, Serialize};

use crate::gate::AccessGate;
use crate::policy::AccessError;

/// One navigation entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Literal path or pattern template opened by the entry.
    pub path: String,
    /// Human-readable title.
    pub title: String,
    /// Sort weight (lower = earlier).
    #[serde(default)]
    pub weight: i32,
    /// Whether this appears in navigation at all.
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

impl MenuEntry {
    /// Create a visible entry with weight 0.
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            weight: 0,
            visible: true,
        }
    }

    /// Set the sort weight.
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Hide the entry from navigation.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Registry of menu entries, ordered by weight.
#[derive(Debug, Default)]
pub struct MenuRegistry {
    entries: Vec<MenuEntry>,
}

impl MenuRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, keeping the registry sorted by weight. Entries with
    /// equal weight keep insertion order.
    pub fn add(&mut self, entry: MenuEntry) {
        let at = self
            .entries
            .partition_point(|existing| existing.weight <= entry.weight);
        self.entries.insert(at, entry);
    }

    /// All entries in weight order, including hidden ones.
    pub fn all(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Entries the current actor may open, in weight order.
    ///
    /// Hidden entries are skipped. Public paths always pass; a denial
    /// hides the entry; a predicate evaluation error propagates, since it
    /// is a policy bug rather than an answer.
    pub fn visible<'a>(&'a self, gate: &AccessGate) -> Result<Vec<&'a MenuEntry>, AccessError> {
        let mut shown = Vec::new();
        for entry in &self.entries {
            if !entry.visible {
                continue;
            }
            match gate.authorize_path(&entry.path, None) {
                Ok(_) => shown.push(entry),
                Err(AccessError::Denied(_)) => {}
                Err(err @ AccessError::Evaluation(_)) => return Err(err),
            }
        }
        Ok(shown)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn entries_sorted_by_weight() {
        let mut registry = MenuRegistry::new();
        registry.add(MenuEntry::new("/b", "B").with_weight(10));
        registry.add(MenuEntry::new("/a", "A").with_weight(-5));
        registry.add(MenuEntry::new("/c", "C"));

        let paths: Vec<&str> = registry.all().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/a", "/c", "/b"]);
    }

    #[test]
    fn equal_weight_keeps_insertion_order() {
        let mut registry = MenuRegistry::new();
        registry.add(MenuEntry::new("/first", "First"));
        registry.add(MenuEntry::new("/second", "Second"));

        let paths: Vec<&str> = registry.all().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/first", "/second"]);
    }

    #[test]
    fn entry_deserializes_with_defaults() {
        let entry: MenuEntry =
            serde_json::from_str(r#"{"path": "/dashboard", "title": "Home"}"#).unwrap();
        assert_eq!(entry.weight, 0);
        assert!(entry.visible);
    }
}

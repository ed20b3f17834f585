//! View results produced by route handlers.

use serde::{Deserialize, Serialize};

/// A rendered panel, handed to the view host after a successful dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    /// Machine name of the panel (e.g., "staff_edit").
    pub name: String,
    /// Human-readable title.
    pub title: String,
    /// Model data for the panel renderer.
    #[serde(default)]
    pub model: serde_json::Value,
}

impl View {
    /// Create a view with an empty model.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            model: serde_json::Value::Null,
        }
    }

    /// Attach model data.
    pub fn with_model(mut self, model: serde_json::Value) -> Self {
        self.model = model;
        self
    }
}

/// Host that displays the active view.
///
/// The router commits a view here only after the handler has produced it,
/// so a failed dispatch never leaves the host half-switched. Rendering
/// itself is the host's concern and is infallible from the kernel's side.
pub trait ViewHost: Send + Sync {
    /// Swap the active view for `view`.
    fn replace(&self, view: View);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn view_builder() {
        let view = View::new("staff_edit", "Edit staff")
            .with_model(serde_json::json!({ "id": "7" }));
        assert_eq!(view.name, "staff_edit");
        assert_eq!(view.model["id"], "7");
    }

    #[test]
    fn view_serializes_model() {
        let json = serde_json::to_value(View::new("dashboard", "Dashboard")).unwrap();
        assert_eq!(json["name"], "dashboard");
        assert!(json["model"].is_null());
    }
}

//! Property references for accessibility-tree queries.
//!
//! The query engine addresses element attributes by string key. Rather than
//! resolving arbitrary key paths at runtime, the supported set is a closed
//! enum: every variant maps to exactly one key, checked exhaustively at
//! compile time, so an unresolvable reference is unrepresentable.

use serde::{Deserialize, Serialize};

/// A queryable attribute of a UI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementProperty {
    /// Current displayed value (text fields, sliders, etc.)
    Value,
    /// Accessibility label
    Label,
    /// Title (windows, buttons)
    Title,
    /// Accessibility identifier
    Identifier,
    /// Placeholder text of an empty input
    Placeholder,
    /// Whether the element accepts interaction
    Enabled,
    /// Whether the element is selected
    Selected,
    /// Element kind (window, button, ...)
    Kind,
    /// Geometric frame in screen coordinates
    Frame,
    /// Number of direct children
    Count,
    /// Whether the element is present in the tree
    Exists,
}

impl ElementProperty {
    /// The stable string key used by the underlying query engine.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Label => "label",
            Self::Title => "title",
            Self::Identifier => "identifier",
            Self::Placeholder => "placeholderValue",
            Self::Enabled => "enabled",
            Self::Selected => "selected",
            Self::Kind => "elementType",
            Self::Frame => "frame",
            Self::Count => "count",
            Self::Exists => "exists",
        }
    }

    /// All supported property references.
    #[must_use]
    pub const fn all() -> [Self; 11] {
        [
            Self::Value,
            Self::Label,
            Self::Title,
            Self::Identifier,
            Self::Placeholder,
            Self::Enabled,
            Self::Selected,
            Self::Kind,
            Self::Frame,
            Self::Count,
            Self::Exists,
        ]
    }
}

impl std::fmt::Display for ElementProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_keys() {
        assert_eq!(ElementProperty::Value.key(), "value");
        assert_eq!(ElementProperty::Label.key(), "label");
        assert_eq!(ElementProperty::Title.key(), "title");
        assert_eq!(ElementProperty::Identifier.key(), "identifier");
        assert_eq!(ElementProperty::Placeholder.key(), "placeholderValue");
        assert_eq!(ElementProperty::Enabled.key(), "enabled");
        assert_eq!(ElementProperty::Selected.key(), "selected");
        assert_eq!(ElementProperty::Kind.key(), "elementType");
        assert_eq!(ElementProperty::Frame.key(), "frame");
        assert_eq!(ElementProperty::Count.key(), "count");
        assert_eq!(ElementProperty::Exists.key(), "exists");
    }

    #[test]
    fn test_every_property_has_a_unique_key() {
        let keys: Vec<&str> = ElementProperty::all().iter().map(|p| p.key()).collect();
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(keys.len(), deduped.len());
        for key in keys {
            assert!(!key.is_empty());
        }
    }

    #[test]
    fn test_property_display() {
        assert_eq!(format!("{}", ElementProperty::Value), "value");
        assert_eq!(format!("{}", ElementProperty::Kind), "elementType");
    }

    #[test]
    fn test_property_equality() {
        assert_eq!(ElementProperty::Value, ElementProperty::Value);
        assert_ne!(ElementProperty::Value, ElementProperty::Label);
    }
}

//! The accessibility-tree seam.
//!
//! The underlying query engine (element discovery, OS bridges) is external.
//! This module defines the trait it plugs into and the runtime value types a
//! resolved property can carry. Elements are cheap handles over live tree
//! state; every `resolve` call re-reads current state, since the tree is
//! mutated externally by the application under test.

use serde::{Deserialize, Serialize};

use crate::property::ElementProperty;
use crate::value::Number;

/// Kind of a UI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ElementKind {
    /// Top-level window
    Window,
    /// Push button
    Button,
    /// Editable text field
    TextField,
    /// Non-editable text
    StaticText,
    /// Image
    Image,
    /// Hyperlink
    Link,
    /// Checkbox
    CheckBox,
    /// Pop-up button / dropdown
    PopUpButton,
    /// Sheet attached to a window
    Sheet,
    /// Modal dialog
    Dialog,
    /// Anything else
    #[default]
    Other,
}

impl ElementKind {
    /// The kind name as the query engine spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Window => "window",
            Self::Button => "button",
            Self::TextField => "textField",
            Self::StaticText => "staticText",
            Self::Image => "image",
            Self::Link => "link",
            Self::CheckBox => "checkBox",
            Self::PopUpButton => "popUpButton",
            Self::Sheet => "sheet",
            Self::Dialog => "dialog",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An element's frame in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the point is inside this rect (edges included).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// The runtime value of a resolved element property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// String value
    Str(String),
    /// Signed integer value
    Int(i64),
    /// Unsigned integer value
    UInt(u64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Element kind
    Kind(ElementKind),
    /// Geometric frame
    Frame(Rect),
}

impl PropertyValue {
    /// The numeric view of this value, if it is numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Int(i) => Some(Number::Int(*i)),
            Self::UInt(u) => Some(Number::UInt(*u)),
            Self::Float(f) => Some(Number::Float(*f)),
            Self::Str(_) | Self::Bool(_) | Self::Kind(_) | Self::Frame(_) => None,
        }
    }

    /// The plain string rendering, used by string predicates and the lenient
    /// cross-kind fallback.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::UInt(u) => u.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Kind(k) => k.as_str().to_string(),
            Self::Frame(r) => format!("({}, {}, {}, {})", r.x, r.y, r.width, r.height),
        }
    }
}

/// A handle to one element of the live accessibility tree.
///
/// Implementations re-read current tree state on every call: a property's
/// value may change between two resolutions within one predicate evaluation,
/// which is an accepted property of the underlying tree, not something this
/// layer papers over.
pub trait UiElement: Clone + std::fmt::Debug {
    /// Resolve a property to its current runtime value. `None` means the
    /// element does not report that property.
    fn resolve(&self, property: ElementProperty) -> Option<PropertyValue>;

    /// Whether the element is currently present in the tree.
    fn exists(&self) -> bool;

    /// Direct children, for descendant-matching filters.
    fn children(&self) -> Vec<Self>
    where
        Self: Sized;

    /// Short human-readable description for log and assertion messages.
    fn describe(&self) -> String;

    /// The element kind, if reported.
    fn kind(&self) -> Option<ElementKind> {
        match self.resolve(ElementProperty::Kind) {
            Some(PropertyValue::Kind(kind)) => Some(kind),
            _ => None,
        }
    }
}

/// Resolve a property uniformly, covering the two derived properties:
/// `Exists` always answers from the element's liveness, and `Count` falls
/// back to the direct child count when the element does not report one.
pub(crate) fn resolve_property<E: UiElement>(
    element: &E,
    property: ElementProperty,
) -> Option<PropertyValue> {
    match property {
        ElementProperty::Exists => Some(PropertyValue::Bool(element.exists())),
        ElementProperty::Count => element
            .resolve(property)
            .or_else(|| Some(PropertyValue::UInt(element.children().len() as u64))),
        _ => element.resolve(property),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod kind_tests {
        use super::*;

        #[test]
        fn test_kind_names() {
            assert_eq!(ElementKind::Window.as_str(), "window");
            assert_eq!(ElementKind::TextField.as_str(), "textField");
            assert_eq!(ElementKind::PopUpButton.as_str(), "popUpButton");
            assert_eq!(ElementKind::Other.as_str(), "other");
        }

        #[test]
        fn test_kind_default() {
            assert_eq!(ElementKind::default(), ElementKind::Other);
        }

        #[test]
        fn test_kind_display() {
            assert_eq!(format!("{}", ElementKind::Button), "button");
        }
    }

    mod rect_tests {
        use super::*;

        #[test]
        fn test_center() {
            let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
            assert_eq!(rect.center(), (50.0, 25.0));
        }

        #[test]
        fn test_contains_edges() {
            let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
            assert!(rect.contains(10.0, 10.0));
            assert!(rect.contains(30.0, 30.0));
            assert!(rect.contains(20.0, 20.0));
            assert!(!rect.contains(9.9, 10.0));
            assert!(!rect.contains(30.1, 30.0));
        }
    }

    mod property_value_tests {
        use super::*;

        #[test]
        fn test_as_number() {
            assert_eq!(PropertyValue::Int(3).as_number(), Some(Number::Int(3)));
            assert_eq!(PropertyValue::UInt(3).as_number(), Some(Number::UInt(3)));
            assert_eq!(
                PropertyValue::Float(1.5).as_number(),
                Some(Number::Float(1.5))
            );
            assert_eq!(PropertyValue::Bool(true).as_number(), None);
            assert_eq!(PropertyValue::Str("3".to_string()).as_number(), None);
        }

        #[test]
        fn test_render() {
            assert_eq!(PropertyValue::Str("ok".to_string()).render(), "ok");
            assert_eq!(PropertyValue::Bool(false).render(), "false");
            assert_eq!(PropertyValue::Kind(ElementKind::Button).render(), "button");
            assert_eq!(
                PropertyValue::Frame(Rect::new(1.0, 2.0, 3.0, 4.0)).render(),
                "(1, 2, 3, 4)"
            );
        }
    }
}

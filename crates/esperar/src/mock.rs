//! In-memory accessibility tree for harness tests.
//!
//! Test the code, not the model: waits and predicates are exercised against
//! a fake tree whose state can be flipped from another thread mid-wait, the
//! same shape the live tree takes from this layer's point of view. Exported
//! so consumers can test their own harness glue without an application
//! under test.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::element::{ElementKind, PropertyValue, Rect, UiElement};
use crate::property::ElementProperty;
use crate::query::{ElementQuery, ElementSource};

#[derive(Debug, Clone)]
struct MockState {
    exists: bool,
    value: Option<String>,
    label: Option<String>,
    title: Option<String>,
    identifier: Option<String>,
    placeholder: Option<String>,
    enabled: bool,
    selected: bool,
    kind: ElementKind,
    frame: Option<Rect>,
    children: Vec<MockElement>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            exists: true,
            value: None,
            label: None,
            title: None,
            identifier: None,
            placeholder: None,
            enabled: true,
            selected: false,
            kind: ElementKind::Other,
            frame: None,
            children: Vec::new(),
        }
    }
}

/// A cheap cloneable handle to one fake element. All clones share state, so
/// a mutation through any handle is visible to every poll in flight.
#[derive(Debug, Clone)]
pub struct MockElement {
    id: Uuid,
    state: Arc<Mutex<MockState>>,
}

impl MockElement {
    /// Create a new element of the given kind.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(MockState {
                kind,
                ..MockState::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stable identity of this element.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Set the value (builder form).
    #[must_use]
    pub fn with_value(self, value: impl Into<String>) -> Self {
        self.lock().value = Some(value.into());
        self
    }

    /// Set the label (builder form).
    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.lock().label = Some(label.into());
        self
    }

    /// Set the title (builder form).
    #[must_use]
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.lock().title = Some(title.into());
        self
    }

    /// Set the identifier (builder form).
    #[must_use]
    pub fn with_identifier(self, identifier: impl Into<String>) -> Self {
        self.lock().identifier = Some(identifier.into());
        self
    }

    /// Set the placeholder (builder form).
    #[must_use]
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.lock().placeholder = Some(placeholder.into());
        self
    }

    /// Set enabled state (builder form).
    #[must_use]
    pub fn with_enabled(self, enabled: bool) -> Self {
        self.lock().enabled = enabled;
        self
    }

    /// Set selected state (builder form).
    #[must_use]
    pub fn with_selected(self, selected: bool) -> Self {
        self.lock().selected = selected;
        self
    }

    /// Set the kind (builder form).
    #[must_use]
    pub fn with_kind(self, kind: ElementKind) -> Self {
        self.lock().kind = kind;
        self
    }

    /// Set the frame (builder form).
    #[must_use]
    pub fn with_frame(self, frame: Rect) -> Self {
        self.lock().frame = Some(frame);
        self
    }

    /// Attach a child (builder form).
    #[must_use]
    pub fn with_child(self, child: MockElement) -> Self {
        self.lock().children.push(child);
        self
    }

    /// Update the value on the live element.
    pub fn set_value(&self, value: impl Into<String>) {
        self.lock().value = Some(value.into());
    }

    /// Update the label on the live element.
    pub fn set_label(&self, label: impl Into<String>) {
        self.lock().label = Some(label.into());
    }

    /// Update the title on the live element.
    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().title = Some(title.into());
    }

    /// Update enabled state on the live element.
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    /// Update selected state on the live element.
    pub fn set_selected(&self, selected: bool) {
        self.lock().selected = selected;
    }

    /// Make the element appear or disappear.
    pub fn set_exists(&self, exists: bool) {
        self.lock().exists = exists;
    }

    /// Attach a child to the live element.
    pub fn add_child(&self, child: MockElement) {
        self.lock().children.push(child);
    }
}

impl UiElement for MockElement {
    fn resolve(&self, property: ElementProperty) -> Option<PropertyValue> {
        let state = self.lock();
        match property {
            ElementProperty::Value => state.value.clone().map(PropertyValue::Str),
            ElementProperty::Label => state.label.clone().map(PropertyValue::Str),
            ElementProperty::Title => state.title.clone().map(PropertyValue::Str),
            ElementProperty::Identifier => state.identifier.clone().map(PropertyValue::Str),
            ElementProperty::Placeholder => state.placeholder.clone().map(PropertyValue::Str),
            ElementProperty::Enabled => Some(PropertyValue::Bool(state.enabled)),
            ElementProperty::Selected => Some(PropertyValue::Bool(state.selected)),
            ElementProperty::Kind => Some(PropertyValue::Kind(state.kind)),
            ElementProperty::Frame => state.frame.map(PropertyValue::Frame),
            ElementProperty::Count => Some(PropertyValue::UInt(state.children.len() as u64)),
            ElementProperty::Exists => Some(PropertyValue::Bool(state.exists)),
        }
    }

    fn exists(&self) -> bool {
        self.lock().exists
    }

    fn children(&self) -> Vec<Self> {
        self.lock().children.clone()
    }

    fn describe(&self) -> String {
        let state = self.lock();
        match &state.identifier {
            Some(identifier) => format!("{} \"{}\"", state.kind, identifier),
            None => format!("{} [{}]", state.kind, &self.id.simple().to_string()[..8]),
        }
    }
}

/// A root collection of fake elements, usable as an [`ElementSource`] so
/// query waits observe elements appearing and disappearing.
#[derive(Debug, Clone, Default)]
pub struct MockTree {
    roots: Arc<Mutex<Vec<MockElement>>>,
}

impl MockTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MockElement>> {
        self.roots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a root element.
    pub fn push(&self, element: MockElement) {
        self.lock().push(element);
    }

    /// Remove a root element by id. Returns whether it was present.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut roots = self.lock();
        let before = roots.len();
        roots.retain(|e| e.id() != id);
        roots.len() != before
    }

    /// Number of root elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the tree has no root elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl ElementSource for MockTree {
    type Element = MockElement;

    fn elements(&self) -> Vec<MockElement> {
        self.lock().clone()
    }
}

impl MockTree {
    /// A live query over the tree's current roots.
    #[must_use]
    pub fn query(&self) -> ElementQuery<MockElement> {
        let tree = self.clone();
        ElementQuery::live(move || tree.elements())
    }
}

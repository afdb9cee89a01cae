//! Lazily-evaluated element collections.
//!
//! UI trees are deep and change between polls; filtering by declarative
//! property match is resilient to reordering where positional indexing is
//! not. A query holds element handles plus a filter stack; nothing resolves
//! properties until a terminal accessor runs, and single-match accessors
//! stop at the first hit rather than evaluating the whole collection.

use std::sync::Arc;

use crate::element::{ElementKind, UiElement};
use crate::predicate::Predicate;
use crate::property::ElementProperty;
use crate::value::ComparisonValue;

/// A provider of root-level element handles. Fetching handles is cheap;
/// the expensive part is resolving their properties, which the query layer
/// defers.
pub trait ElementSource {
    /// Element handle type produced by this source.
    type Element: UiElement;

    /// Current root-level element handles.
    fn elements(&self) -> Vec<Self::Element>;
}

/// One step of a query's filter stack.
#[derive(Debug, Clone)]
pub enum QueryFilter {
    /// Keep elements matching the predicate themselves
    Matching(Predicate),
    /// Keep elements with any descendant matching the predicate
    Containing(Predicate),
    /// Keep elements of the given kind
    OfKind(ElementKind),
}

#[derive(Clone)]
enum ElementSet<E> {
    Fixed(Vec<E>),
    Live(Arc<dyn Fn() -> Vec<E> + Send + Sync>),
}

impl<E> std::fmt::Debug for ElementSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(elements) => f
                .debug_tuple("Fixed")
                .field(&format_args!("{} elements", elements.len()))
                .finish(),
            Self::Live(_) => f.write_str("Live(..)"),
        }
    }
}

/// A filterable, lazily-evaluated set of UI elements reachable from a root.
#[derive(Debug, Clone)]
pub struct ElementQuery<E: UiElement> {
    set: ElementSet<E>,
    filters: Vec<QueryFilter>,
}

impl<E: UiElement> ElementQuery<E> {
    /// Query over a fixed set of handles.
    #[must_use]
    pub fn new(elements: Vec<E>) -> Self {
        Self {
            set: ElementSet::Fixed(elements),
            filters: Vec::new(),
        }
    }

    /// Query snapshotting a source's current handles.
    #[must_use]
    pub fn from_source<S: ElementSource<Element = E>>(source: &S) -> Self {
        Self::new(source.elements())
    }

    /// Query that re-fetches handles from the provider on every terminal
    /// access, so polling waits observe elements appearing and disappearing.
    #[must_use]
    pub fn live<F>(provider: F) -> Self
    where
        E: 'static,
        F: Fn() -> Vec<E> + Send + Sync + 'static,
    {
        Self {
            set: ElementSet::Live(Arc::new(provider)),
            filters: Vec::new(),
        }
    }

    /// Narrow to elements matching the predicate themselves.
    #[must_use]
    pub fn matching(mut self, predicate: Predicate) -> Self {
        self.filters.push(QueryFilter::Matching(predicate));
        self
    }

    /// Narrow to elements of the given kind.
    #[must_use]
    pub fn matching_kind(mut self, kind: ElementKind) -> Self {
        self.filters.push(QueryFilter::OfKind(kind));
        self
    }

    /// Narrow to elements whose property equals the value.
    #[must_use]
    pub fn matching_property(
        self,
        property: ElementProperty,
        value: impl Into<ComparisonValue>,
    ) -> Self {
        self.matching(Predicate::equals(property, value))
    }

    /// Narrow to elements with any descendant matching the predicate.
    #[must_use]
    pub fn containing(mut self, predicate: Predicate) -> Self {
        self.filters.push(QueryFilter::Containing(predicate));
        self
    }

    /// Narrow to elements with any descendant whose property contains the
    /// substring.
    #[must_use]
    pub fn containing_property(
        self,
        property: ElementProperty,
        substring: impl Into<String>,
    ) -> Self {
        self.containing(Predicate::contains(property, substring))
    }

    /// Narrow to elements with any descendant whose property equals the
    /// value.
    #[must_use]
    pub fn containing_equals(
        self,
        property: ElementProperty,
        value: impl Into<ComparisonValue>,
    ) -> Self {
        self.containing(Predicate::equals(property, value))
    }

    /// Narrow to elements with any descendant of the given kind matching
    /// the predicate.
    #[must_use]
    pub fn containing_kind(self, kind: ElementKind, predicate: Predicate) -> Self {
        self.containing(Predicate::equals(ElementProperty::Kind, kind.as_str()).and(predicate))
    }

    fn fetch(&self) -> Vec<E> {
        match &self.set {
            ElementSet::Fixed(elements) => elements.clone(),
            ElementSet::Live(provider) => provider(),
        }
    }

    fn passes(&self, element: &E) -> bool {
        self.filters.iter().all(|filter| match filter {
            QueryFilter::Matching(predicate) => predicate.evaluate(element),
            QueryFilter::Containing(predicate) => descendant_matches(element, predicate),
            QueryFilter::OfKind(kind) => element.kind() == Some(*kind),
        })
    }

    /// Lazy iterator over current matches, in source order.
    pub fn iter(&self) -> impl Iterator<Item = E> + '_ {
        self.fetch().into_iter().filter(|e| self.passes(e))
    }

    /// First element matching the additional predicate. Stops evaluating at
    /// the first hit.
    #[must_use]
    pub fn element_matching(&self, predicate: &Predicate) -> Option<E> {
        self.fetch()
            .into_iter()
            .find(|e| self.passes(e) && predicate.evaluate(e))
    }

    /// First current match.
    #[must_use]
    pub fn first(&self) -> Option<E> {
        self.iter().next()
    }

    /// All current matches, preserving source order.
    #[must_use]
    pub fn all(&self) -> Vec<E> {
        self.iter().collect()
    }

    /// Number of current matches.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether there are no current matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

fn descendant_matches<E: UiElement>(element: &E, predicate: &Predicate) -> bool {
    element
        .children()
        .iter()
        .any(|child| predicate.evaluate(child) || descendant_matches(child, predicate))
}

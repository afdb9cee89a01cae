//! Declarative predicates over element properties.
//!
//! A [`Predicate`] is an immutable boolean query over one element's
//! properties: leaf comparisons composed under AND/OR/NOT. It is constructed
//! once per assertion or wait call, evaluated possibly many times during
//! polling, and discarded when the wait resolves. Composition is purely
//! structural; leaf predicates are pure single-property reads, so evaluation
//! order is unobservable and short-circuiting is fair game.
//!
//! Rendering a predicate with `Display` produces the query-engine format
//! string (`value CONTAINS[c] "abc"`), which the waiters reuse as the
//! human-readable description of what was waited for.

use serde::{Deserialize, Serialize};

use crate::element::{resolve_property, PropertyValue, UiElement};
use crate::property::ElementProperty;
use crate::value::{ComparisonValue, NumericRange};

/// A single comparison applied to one resolved property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Comparison {
    /// Property equals the value
    Equals(ComparisonValue),
    /// Property falls within the numeric range
    InRange(NumericRange),
    /// Property's text contains the substring (case-insensitive)
    Contains(String),
    /// Property's text begins with the prefix (case-insensitive)
    BeginsWith(String),
    /// Property's text ends with the suffix (case-insensitive)
    EndsWith(String),
    /// Property's text matches the regular expression (case-insensitive)
    Matches(String),
    /// Property equals one of the values
    In(Vec<ComparisonValue>),
}

impl Comparison {
    /// Evaluate against a resolved property value.
    #[must_use]
    pub fn evaluate(&self, actual: &PropertyValue) -> bool {
        match self {
            Self::Equals(expected) => lenient_equals(actual, expected),
            Self::InRange(range) => actual.as_number().is_some_and(|n| range.contains(n)),
            Self::Contains(needle) => {
                actual.render().to_lowercase().contains(&needle.to_lowercase())
            }
            Self::BeginsWith(prefix) => actual
                .render()
                .to_lowercase()
                .starts_with(&prefix.to_lowercase()),
            Self::EndsWith(suffix) => actual
                .render()
                .to_lowercase()
                .ends_with(&suffix.to_lowercase()),
            Self::Matches(pattern) => {
                match regex::RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(re) => re.is_match(&actual.render()),
                    Err(error) => {
                        tracing::warn!(%pattern, %error, "unparsable MATCHES pattern, treating as no match");
                        false
                    }
                }
            }
            Self::In(values) => values.iter().any(|v| lenient_equals(actual, v)),
        }
    }
}

/// Equality with lenient cross-kind degradation: numeric families unify
/// through widening, same-kind scalars compare exactly, and a genuinely
/// cross-kind pair falls back to comparing rendered string forms.
fn lenient_equals(actual: &PropertyValue, expected: &ComparisonValue) -> bool {
    if let (Some(a), Some(b)) = (actual.as_number(), expected.as_number()) {
        return a == b;
    }
    match (actual, expected) {
        (PropertyValue::Str(a), ComparisonValue::Str(b)) => a == b,
        (PropertyValue::Bool(a), ComparisonValue::Bool(b)) => a == b,
        _ => actual.render() == expected.render(),
    }
}

/// An immutable, composable boolean query over one element's properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Leaf comparison on one property
    Compare {
        /// Property to resolve
        property: ElementProperty,
        /// Comparison to apply
        comparison: Comparison,
    },
    /// All sub-predicates hold (vacuously true when empty)
    And(Vec<Predicate>),
    /// Any sub-predicate holds (false when empty)
    Or(Vec<Predicate>),
    /// Sub-predicate does not hold
    Not(Box<Predicate>),
}

impl Predicate {
    fn compare(property: ElementProperty, comparison: Comparison) -> Self {
        Self::Compare {
            property,
            comparison,
        }
    }

    /// Property equals the value. Dispatch on the value's concrete variant
    /// happens inside [`Comparison::evaluate`] with an exhaustive match.
    #[must_use]
    pub fn equals(property: ElementProperty, value: impl Into<ComparisonValue>) -> Self {
        Self::compare(property, Comparison::Equals(value.into()))
    }

    /// Property falls within the range. Accepts `NumericRange` or any std
    /// range form (`1..5`, `1..=5`, `1..`, `..5`, `..=5`).
    #[must_use]
    pub fn in_range(property: ElementProperty, range: impl Into<NumericRange>) -> Self {
        Self::compare(property, Comparison::InRange(range.into()))
    }

    /// Property's text contains the substring, case-insensitively.
    #[must_use]
    pub fn contains(property: ElementProperty, substring: impl Into<String>) -> Self {
        Self::compare(property, Comparison::Contains(substring.into()))
    }

    /// Property's text begins with the prefix, case-insensitively.
    #[must_use]
    pub fn begins_with(property: ElementProperty, prefix: impl Into<String>) -> Self {
        Self::compare(property, Comparison::BeginsWith(prefix.into()))
    }

    /// Property's text ends with the suffix, case-insensitively.
    #[must_use]
    pub fn ends_with(property: ElementProperty, suffix: impl Into<String>) -> Self {
        Self::compare(property, Comparison::EndsWith(suffix.into()))
    }

    /// Property's text matches the regular expression, case-insensitively.
    /// An unparsable pattern degrades to no-match at evaluation time.
    #[must_use]
    pub fn matches(property: ElementProperty, pattern: impl Into<String>) -> Self {
        Self::compare(property, Comparison::Matches(pattern.into()))
    }

    /// Property equals one of the values.
    #[must_use]
    pub fn is_in<I, V>(property: ElementProperty, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ComparisonValue>,
    {
        Self::compare(
            property,
            Comparison::In(values.into_iter().map(Into::into).collect()),
        )
    }

    /// The element is present in the tree.
    #[must_use]
    pub fn exists() -> Self {
        Self::equals(ElementProperty::Exists, true)
    }

    /// The element is absent from the tree.
    #[must_use]
    pub fn not_exists() -> Self {
        Self::exists().not()
    }

    /// Both predicates hold. Adjacent `And` nodes are flattened.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), right) => {
                left.push(right);
                Self::And(left)
            }
            (left, Self::And(mut right)) => {
                right.insert(0, left);
                Self::And(right)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }

    /// Either predicate holds. Adjacent `Or` nodes are flattened.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), right) => {
                left.push(right);
                Self::Or(left)
            }
            (left, Self::Or(mut right)) => {
                right.insert(0, left);
                Self::Or(right)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }

    /// The predicate does not hold. Double negation collapses.
    #[must_use]
    pub fn not(self) -> Self {
        match self {
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// All predicates hold; vacuously true for an empty list.
    #[must_use]
    pub fn all(predicates: impl IntoIterator<Item = Self>) -> Self {
        Self::And(predicates.into_iter().collect())
    }

    /// Any predicate holds; false for an empty list.
    #[must_use]
    pub fn any(predicates: impl IntoIterator<Item = Self>) -> Self {
        Self::Or(predicates.into_iter().collect())
    }

    /// Evaluate against an element's current state. A property the element
    /// does not report makes the leaf comparison false, never a panic.
    #[must_use]
    pub fn evaluate<E: UiElement>(&self, element: &E) -> bool {
        match self {
            Self::Compare {
                property,
                comparison,
            } => resolve_property(element, *property)
                .is_some_and(|actual| comparison.evaluate(&actual)),
            Self::And(predicates) => predicates.iter().all(|p| p.evaluate(element)),
            Self::Or(predicates) => predicates.iter().any(|p| p.evaluate(element)),
            Self::Not(inner) => !inner.evaluate(element),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compare {
                property,
                comparison,
            } => fmt_comparison(f, property.key(), comparison),
            Self::And(predicates) => fmt_joined(f, predicates, " AND ", "TRUEPREDICATE"),
            Self::Or(predicates) => fmt_joined(f, predicates, " OR ", "FALSEPREDICATE"),
            Self::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}

fn fmt_joined(
    f: &mut std::fmt::Formatter<'_>,
    predicates: &[Predicate],
    separator: &str,
    empty: &str,
) -> std::fmt::Result {
    match predicates {
        [] => write!(f, "{empty}"),
        [single] => write!(f, "{single}"),
        _ => {
            write!(f, "(")?;
            for (i, predicate) in predicates.iter().enumerate() {
                if i > 0 {
                    write!(f, "{separator}")?;
                }
                write!(f, "{predicate}")?;
            }
            write!(f, ")")
        }
    }
}

fn fmt_comparison(
    f: &mut std::fmt::Formatter<'_>,
    key: &str,
    comparison: &Comparison,
) -> std::fmt::Result {
    match comparison {
        Comparison::Equals(value) => write!(f, "{key} == {value}"),
        Comparison::InRange(range) => match (&range.lower, &range.upper) {
            (Some(lo), Some(hi)) => write!(
                f,
                "({key} {} {} AND {key} {} {})",
                if lo.inclusive { ">=" } else { ">" },
                lo.value,
                if hi.inclusive { "<=" } else { "<" },
                hi.value,
            ),
            (Some(lo), None) => {
                write!(f, "{key} {} {}", if lo.inclusive { ">=" } else { ">" }, lo.value)
            }
            (None, Some(hi)) => {
                write!(f, "{key} {} {}", if hi.inclusive { "<=" } else { "<" }, hi.value)
            }
            (None, None) => write!(f, "TRUEPREDICATE"),
        },
        Comparison::Contains(s) => write!(f, "{key} CONTAINS[c] {s:?}"),
        Comparison::BeginsWith(s) => write!(f, "{key} BEGINSWITH[c] {s:?}"),
        Comparison::EndsWith(s) => write!(f, "{key} ENDSWITH[c] {s:?}"),
        Comparison::Matches(s) => write!(f, "{key} MATCHES[c] {s:?}"),
        Comparison::In(values) => {
            write!(f, "{key} IN {{")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
            write!(f, "}}")
        }
    }
}

//! Comparison values and numeric ranges for predicate construction.
//!
//! The comparison side of a predicate is a closed sum type. Each
//! predicate-construction function dispatches on the concrete variant with a
//! single exhaustive match, rather than switching on a runtime type with an
//! implicit fallback branch.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A numeric scalar of any supported width class.
///
/// Integer comparisons across signedness are exact; any comparison involving
/// a float promotes through `f64`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Number {
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point
    Float(f64),
}

impl Number {
    /// Promote to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(i) => *i as f64,
            Self::UInt(u) => *u as f64,
            Self::Float(f) => *f,
        }
    }

    fn order(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::UInt(a), Self::UInt(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::UInt(b)) => {
                if *a < 0 {
                    Some(Ordering::Less)
                } else {
                    Some((*a as u64).cmp(b))
                }
            }
            (Self::UInt(a), Self::Int(b)) => {
                if *b < 0 {
                    Some(Ordering::Greater)
                } else {
                    Some(a.cmp(&(*b as u64)))
                }
            }
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.order(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.order(other)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

macro_rules! number_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(value: $t) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! number_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(value: $t) -> Self {
                Self::UInt(u64::from(value))
            }
        })*
    };
}

number_from_int!(i8, i16, i32, i64);
number_from_uint!(u8, u16, u32, u64);

impl From<usize> for Number {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A typed scalar to compare an element property against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComparisonValue {
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
}

impl ComparisonValue {
    /// The numeric view of this value, if it is numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Int(i) => Some(Number::Int(*i)),
            Self::UInt(u) => Some(Number::UInt(*u)),
            Self::Float(f) => Some(Number::Float(*f)),
            Self::Str(_) | Self::Bool(_) => None,
        }
    }

    /// The plain string rendering, used by the lenient cross-kind fallback.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::UInt(u) => u.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl std::fmt::Display for ComparisonValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ComparisonValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ComparisonValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for ComparisonValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! comparison_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for ComparisonValue {
            fn from(value: $t) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

macro_rules! comparison_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for ComparisonValue {
            fn from(value: $t) -> Self {
                Self::UInt(u64::from(value))
            }
        })*
    };
}

comparison_from_int!(i8, i16, i32, i64);
comparison_from_uint!(u8, u16, u32, u64);

impl From<usize> for ComparisonValue {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f32> for ComparisonValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for ComparisonValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One end of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBound {
    /// Bound value
    pub value: Number,
    /// Whether the bound itself is included
    pub inclusive: bool,
}

/// A numeric range with independently optional, independently inclusive
/// bounds.
///
/// Covers closed ranges, half-open ranges, and the one-sided forms
/// (greater-or-equal-only, less-than-only, less-or-equal-only). A range
/// whose lower bound exceeds its upper bound is empty and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    /// Lower bound, if any
    pub lower: Option<RangeBound>,
    /// Upper bound, if any
    pub upper: Option<RangeBound>,
}

impl NumericRange {
    /// Range including both bounds (`lo..=hi`).
    #[must_use]
    pub fn closed(lower: impl Into<Number>, upper: impl Into<Number>) -> Self {
        Self {
            lower: Some(RangeBound {
                value: lower.into(),
                inclusive: true,
            }),
            upper: Some(RangeBound {
                value: upper.into(),
                inclusive: true,
            }),
        }
    }

    /// Range including the lower bound, excluding the upper (`lo..hi`).
    #[must_use]
    pub fn half_open(lower: impl Into<Number>, upper: impl Into<Number>) -> Self {
        Self {
            lower: Some(RangeBound {
                value: lower.into(),
                inclusive: true,
            }),
            upper: Some(RangeBound {
                value: upper.into(),
                inclusive: false,
            }),
        }
    }

    /// Greater-or-equal-only range (`lo..`).
    #[must_use]
    pub fn at_least(lower: impl Into<Number>) -> Self {
        Self {
            lower: Some(RangeBound {
                value: lower.into(),
                inclusive: true,
            }),
            upper: None,
        }
    }

    /// Less-or-equal-only range (`..=hi`).
    #[must_use]
    pub fn at_most(upper: impl Into<Number>) -> Self {
        Self {
            lower: None,
            upper: Some(RangeBound {
                value: upper.into(),
                inclusive: true,
            }),
        }
    }

    /// Less-than-only range (`..hi`).
    #[must_use]
    pub fn less_than(upper: impl Into<Number>) -> Self {
        Self {
            lower: None,
            upper: Some(RangeBound {
                value: upper.into(),
                inclusive: false,
            }),
        }
    }

    /// Whether `n` falls within this range, honoring bound inclusivity.
    #[must_use]
    pub fn contains(&self, n: Number) -> bool {
        if let Some(lower) = &self.lower {
            match n.partial_cmp(&lower.value) {
                Some(Ordering::Greater) => {}
                Some(Ordering::Equal) if lower.inclusive => {}
                _ => return false,
            }
        }
        if let Some(upper) = &self.upper {
            match n.partial_cmp(&upper.value) {
                Some(Ordering::Less) => {}
                Some(Ordering::Equal) if upper.inclusive => {}
                _ => return false,
            }
        }
        true
    }
}

impl<T: Into<Number>> From<std::ops::Range<T>> for NumericRange {
    fn from(range: std::ops::Range<T>) -> Self {
        Self::half_open(range.start, range.end)
    }
}

impl<T: Into<Number>> From<std::ops::RangeInclusive<T>> for NumericRange {
    fn from(range: std::ops::RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        Self::closed(start, end)
    }
}

impl<T: Into<Number>> From<std::ops::RangeFrom<T>> for NumericRange {
    fn from(range: std::ops::RangeFrom<T>) -> Self {
        Self::at_least(range.start)
    }
}

impl<T: Into<Number>> From<std::ops::RangeTo<T>> for NumericRange {
    fn from(range: std::ops::RangeTo<T>) -> Self {
        Self::less_than(range.end)
    }
}

impl<T: Into<Number>> From<std::ops::RangeToInclusive<T>> for NumericRange {
    fn from(range: std::ops::RangeToInclusive<T>) -> Self {
        Self::at_most(range.end)
    }
}

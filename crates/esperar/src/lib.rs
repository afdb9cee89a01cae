//! Esperar: declarative accessibility-tree predicates and bounded polling
//! waits for UI test harnesses.
//!
//! Esperar (Spanish: "to wait / to expect") lets test code say "wait until
//! this element's property matches a condition" without hand-rolled polling
//! loops, against any accessibility tree plugged in behind the
//! [`UiElement`] seam.
//!
//! # Architecture
//!
//! ```text
//! test case ──► collection filter / waiter ──► predicate
//!                     │                            │
//!                     ▼                            ▼
//!               polling loop ◄────────── accessibility tree (external)
//! ```
//!
//! A [`Predicate`] is built once per assertion, evaluated many times while
//! polling, and rendered into the wait's log and failure messages. Waits
//! return boolean [`WaitOutcome`]s (timeout is a result to branch on, not
//! an exception), and the [`expect`] layer turns outcomes into hard
//! assertions when that is what the test wants.
//!
//! # Example
//!
//! ```
//! use esperar::mock::{MockElement, MockTree};
//! use esperar::{ElementKind, ElementProperty, ElementWaitExt, Predicate, WaitOptions};
//!
//! let tree = MockTree::new();
//! tree.push(MockElement::new(ElementKind::Button).with_title("Accept All"));
//!
//! let options = WaitOptions::new().with_timeout(500).with_poll_interval(10);
//! let banner_button = tree
//!     .query()
//!     .matching_kind(ElementKind::Button)
//!     .element_matching(&Predicate::contains(ElementProperty::Title, "accept"))
//!     .expect("button is present");
//!
//! let outcome = banner_button.wait_for_existence(&options);
//! assert!(outcome.success);
//! ```

#![warn(missing_docs)]

mod assertion;
mod element;
mod predicate;
mod property;
mod query;
mod result;
mod value;
mod wait;

/// In-memory accessibility tree for harness tests.
pub mod mock;

pub use assertion::{expect, expect_query, ExpectElement, ExpectQuery};
pub use element::{ElementKind, PropertyValue, Rect, UiElement};
pub use predicate::{Comparison, Predicate};
pub use property::ElementProperty;
pub use query::{ElementQuery, ElementSource, QueryFilter};
pub use result::{EsperarError, EsperarResult};
pub use value::{ComparisonValue, Number, NumericRange, RangeBound};
pub use wait::{
    ElementWaitExt, QueryWaitExt, WaitOptions, WaitOutcome, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};

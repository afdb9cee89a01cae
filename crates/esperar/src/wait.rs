//! Bounded polling waits over elements and queries.
//!
//! The underlying accessibility tree offers no change-notification hook, so
//! every wait is a bounded polling loop: evaluate, sleep one interval,
//! repeat, until the condition holds or the deadline passes. Timeout is not
//! an error; it is a [`WaitOutcome`] the caller branches or asserts on, so
//! the same primitives serve "assert eventually true" and "assert
//! eventually false" without exception-driven control flow. A wait never
//! blocks past its timeout plus one polling interval of slack.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::element::UiElement;
use crate::predicate::Predicate;
use crate::property::ElementProperty;
use crate::query::ElementQuery;
use crate::value::{ComparisonValue, NumericRange};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration. A zero interval is clamped to 1ms so
    /// a wait always yields between poll attempts.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Terminal result of a wait operation.
#[derive(Debug, Clone)]
pub struct WaitOutcome {
    /// Whether the condition was met before the deadline
    pub success: bool,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitOutcome {
    /// Condition met.
    #[must_use]
    pub fn success(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            success: true,
            elapsed,
            waited_for: waited_for.into(),
        }
    }

    /// Deadline passed with the condition still unmet.
    #[must_use]
    pub fn timed_out(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            success: false,
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

impl std::fmt::Display for WaitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.success {
            write!(
                f,
                "condition met after {}ms: {}",
                self.elapsed.as_millis(),
                self.waited_for
            )
        } else {
            write!(
                f,
                "timed out after {}ms waiting for: {}",
                self.elapsed.as_millis(),
                self.waited_for
            )
        }
    }
}

// =============================================================================
// POLLING CORE
// =============================================================================

/// The polling core: check, sleep, repeat. The check runs once more after
/// the final sleep, so a condition that becomes true during the last
/// interval is still observed before the timeout verdict.
fn poll_until<F>(
    mut check: F,
    options: &WaitOptions,
    waited_for: impl Into<String>,
) -> WaitOutcome
where
    F: FnMut() -> bool,
{
    let waited_for = waited_for.into();
    let start = Instant::now();
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();

    loop {
        if check() {
            let outcome = WaitOutcome::success(start.elapsed(), waited_for);
            tracing::debug!(
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                condition = %outcome.waited_for,
                "wait satisfied"
            );
            return outcome;
        }
        if start.elapsed() >= timeout {
            let outcome = WaitOutcome::timed_out(start.elapsed(), waited_for);
            tracing::warn!(
                timeout_ms = options.timeout_ms,
                condition = %outcome.waited_for,
                "wait timed out"
            );
            return outcome;
        }
        std::thread::sleep(poll_interval);
    }
}

// =============================================================================
// ELEMENT WAITERS
// =============================================================================

/// Polling waits on a single element, exposed uniformly on every
/// [`UiElement`] implementation.
pub trait ElementWaitExt: UiElement {
    /// The canonical primitive: poll the predicate against this element
    /// until it holds or the timeout elapses.
    fn wait_for(&self, predicate: &Predicate, options: &WaitOptions) -> WaitOutcome {
        poll_until(
            || predicate.evaluate(self),
            options,
            format!("{} on {}", predicate, self.describe()),
        )
    }

    /// Wait until the element is present in the tree.
    fn wait_for_existence(&self, options: &WaitOptions) -> WaitOutcome {
        poll_until(
            || self.exists(),
            options,
            format!("{} to exist", self.describe()),
        )
    }

    /// Wait until the element is absent from the tree.
    fn wait_for_non_existence(&self, options: &WaitOptions) -> WaitOutcome {
        poll_until(
            || !self.exists(),
            options,
            format!("{} to not exist", self.describe()),
        )
    }

    /// Keypath-equality shorthand: build the predicate and delegate.
    fn wait_for_property(
        &self,
        property: ElementProperty,
        value: impl Into<ComparisonValue>,
        options: &WaitOptions,
    ) -> WaitOutcome {
        self.wait_for(&Predicate::equals(property, value), options)
    }

    /// Range shorthand: build the predicate and delegate.
    fn wait_for_property_in(
        &self,
        property: ElementProperty,
        range: impl Into<NumericRange>,
        options: &WaitOptions,
    ) -> WaitOutcome {
        self.wait_for(&Predicate::in_range(property, range), options)
    }
}

impl<E: UiElement> ElementWaitExt for E {}

// =============================================================================
// QUERY WAITERS
// =============================================================================

/// Polling waits on an element collection.
pub trait QueryWaitExt {
    /// Wait until some element in the collection matches the predicate.
    fn wait_for_match(&self, predicate: &Predicate, options: &WaitOptions) -> WaitOutcome;

    /// Wait until the collection's match count equals `expected`.
    fn wait_for_count(&self, expected: usize, options: &WaitOptions) -> WaitOutcome;

    /// Wait until the collection has no matches.
    fn wait_until_empty(&self, options: &WaitOptions) -> WaitOutcome;
}

impl<E: UiElement> QueryWaitExt for ElementQuery<E> {
    fn wait_for_match(&self, predicate: &Predicate, options: &WaitOptions) -> WaitOutcome {
        poll_until(
            || self.element_matching(predicate).is_some(),
            options,
            format!("any element matching {predicate}"),
        )
    }

    fn wait_for_count(&self, expected: usize, options: &WaitOptions) -> WaitOutcome {
        poll_until(
            || self.count() == expected,
            options,
            format!("element count == {expected}"),
        )
    }

    fn wait_until_empty(&self, options: &WaitOptions) -> WaitOutcome {
        poll_until(|| self.is_empty(), options, "no matching elements")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::mock::{MockElement, MockTree};

    fn fast_options() -> WaitOptions {
        WaitOptions::new().with_timeout(500).with_poll_interval(10)
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_chained() {
            let opts = WaitOptions::new().with_timeout(2_000).with_poll_interval(25);
            assert_eq!(opts.timeout(), Duration::from_millis(2_000));
            assert_eq!(opts.poll_interval(), Duration::from_millis(25));
        }

        #[test]
        fn test_zero_poll_interval_is_clamped() {
            let opts = WaitOptions::new().with_poll_interval(0);
            assert_eq!(opts.poll_interval(), Duration::from_millis(1));
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_outcome_constructors() {
            let ok = WaitOutcome::success(Duration::from_millis(120), "value == \"x\"");
            assert!(ok.success);
            assert_eq!(ok.elapsed, Duration::from_millis(120));
            let bad = WaitOutcome::timed_out(Duration::from_millis(500), "value == \"x\"");
            assert!(!bad.success);
        }

        #[test]
        fn test_outcome_display() {
            let ok = WaitOutcome::success(Duration::from_millis(120), "c");
            assert_eq!(ok.to_string(), "condition met after 120ms: c");
            let bad = WaitOutcome::timed_out(Duration::from_millis(500), "c");
            assert_eq!(bad.to_string(), "timed out after 500ms waiting for: c");
        }
    }

    mod element_wait_tests {
        use super::*;

        #[test]
        fn test_wait_resolves_immediately_when_condition_holds() {
            let element = MockElement::new(ElementKind::Button).with_title("Go");
            let outcome = element.wait_for(
                &Predicate::equals(ElementProperty::Title, "Go"),
                &fast_options(),
            );
            assert!(outcome.success);
            assert!(outcome.elapsed < Duration::from_millis(100));
        }

        #[test]
        fn test_wait_resolves_on_success_before_timeout() {
            let element = MockElement::new(ElementKind::TextField).with_value("loading");
            let handle = element.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(100));
                handle.set_value("done");
            });

            let options = WaitOptions::new().with_timeout(2_000).with_poll_interval(10);
            let outcome = element.wait_for_property(ElementProperty::Value, "done", &options);
            assert!(outcome.success);
            // Materially less than the full timeout: no artificial stall.
            assert!(outcome.elapsed < Duration::from_millis(1_000));
        }

        #[test]
        fn test_wait_respects_timeout_on_failure() {
            let element = MockElement::new(ElementKind::TextField).with_value("never");
            let options = WaitOptions::new().with_timeout(200).with_poll_interval(20);
            let start = Instant::now();
            let outcome = element.wait_for_property(ElementProperty::Value, "done", &options);
            assert!(!outcome.success);
            // Timeout plus one polling interval of slack, with scheduler headroom.
            assert!(start.elapsed() >= Duration::from_millis(200));
            assert!(start.elapsed() < Duration::from_millis(400));
        }

        #[test]
        fn test_wait_for_existence_and_non_existence_are_negations() {
            let present = MockElement::new(ElementKind::Sheet);
            assert!(present.wait_for_existence(&fast_options()).success);
            assert!(!present.wait_for_non_existence(&fast_options()).success);

            let absent = MockElement::new(ElementKind::Sheet);
            absent.set_exists(false);
            assert!(!absent.wait_for_existence(&fast_options()).success);
            assert!(absent.wait_for_non_existence(&fast_options()).success);
        }

        #[test]
        fn test_wait_for_element_disappearing() {
            let element = MockElement::new(ElementKind::Dialog);
            let handle = element.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(80));
                handle.set_exists(false);
            });
            let outcome = element.wait_for_non_existence(&fast_options());
            assert!(outcome.success);
        }

        #[test]
        fn test_wait_for_property_in_range() {
            let element = MockElement::new(ElementKind::Window);
            let handle = element.clone();
            std::thread::spawn(move || {
                for _ in 0..3 {
                    std::thread::sleep(Duration::from_millis(30));
                    handle.add_child(MockElement::new(ElementKind::Button));
                }
            });
            let outcome =
                element.wait_for_property_in(ElementProperty::Count, 2..=3, &fast_options());
            assert!(outcome.success);
        }
    }

    mod query_wait_tests {
        use super::*;

        #[test]
        fn test_wait_for_match_sees_new_elements() {
            let tree = MockTree::new();
            let query = tree.query();
            let writer = tree.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(80));
                writer.push(MockElement::new(ElementKind::Button).with_title("Accept"));
            });
            let outcome = query.wait_for_match(
                &Predicate::contains(ElementProperty::Title, "accept"),
                &fast_options(),
            );
            assert!(outcome.success);
        }

        #[test]
        fn test_wait_for_count() {
            let tree = MockTree::new();
            tree.push(MockElement::new(ElementKind::Window));
            tree.push(MockElement::new(ElementKind::Window));
            let outcome = tree.query().wait_for_count(2, &fast_options());
            assert!(outcome.success);
        }

        #[test]
        fn test_wait_until_empty_observes_removal() {
            let tree = MockTree::new();
            let element = MockElement::new(ElementKind::Sheet);
            let id = element.id();
            tree.push(element);
            let writer = tree.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(80));
                writer.remove(id);
            });
            let outcome = tree.query().wait_until_empty(&fast_options());
            assert!(outcome.success);
        }

        #[test]
        fn test_wait_for_match_times_out_when_nothing_matches() {
            let tree = MockTree::new();
            tree.push(MockElement::new(ElementKind::Button).with_title("Decline"));
            let options = WaitOptions::new().with_timeout(150).with_poll_interval(20);
            let outcome = tree.query().wait_for_match(
                &Predicate::contains(ElementProperty::Title, "accept"),
                &options,
            );
            assert!(!outcome.success);
        }
    }
}

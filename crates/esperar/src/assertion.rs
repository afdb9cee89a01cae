//! Eventually-assertions layered on the boolean waiters.
//!
//! Waits are soft: they return outcomes. Tests usually want a hard
//! assertion on top, with a descriptive failure message. `expect` wraps an
//! element (or query) and converts a timed-out wait into
//! [`EsperarError::AssertionFailed`], carrying the element description, the
//! rendered condition, and the elapsed time. A caller-supplied message
//! replaces the generated one.

use crate::element::UiElement;
use crate::predicate::Predicate;
use crate::property::ElementProperty;
use crate::query::ElementQuery;
use crate::result::{EsperarError, EsperarResult};
use crate::value::ComparisonValue;
use crate::wait::{ElementWaitExt, QueryWaitExt, WaitOptions, WaitOutcome};

/// Assertion builder over a single element.
#[derive(Debug)]
pub struct ExpectElement<'a, E: UiElement> {
    element: &'a E,
    message: Option<String>,
}

/// Create an assertion builder for an element.
#[must_use]
pub fn expect<E: UiElement>(element: &E) -> ExpectElement<'_, E> {
    ExpectElement {
        element,
        message: None,
    }
}

impl<E: UiElement> ExpectElement<'_, E> {
    /// Replace the generated failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Assert the element eventually satisfies the predicate.
    pub fn to_satisfy(&self, predicate: &Predicate, options: &WaitOptions) -> EsperarResult<()> {
        let outcome = self.element.wait_for(predicate, options);
        self.verdict(&outcome)
    }

    /// Assert the element eventually exists.
    pub fn to_exist(&self, options: &WaitOptions) -> EsperarResult<()> {
        let outcome = self.element.wait_for_existence(options);
        self.verdict(&outcome)
    }

    /// Assert the element eventually disappears.
    pub fn to_not_exist(&self, options: &WaitOptions) -> EsperarResult<()> {
        let outcome = self.element.wait_for_non_existence(options);
        self.verdict(&outcome)
    }

    /// Assert a property eventually equals the value.
    pub fn to_have(
        &self,
        property: ElementProperty,
        value: impl Into<ComparisonValue>,
        options: &WaitOptions,
    ) -> EsperarResult<()> {
        let outcome = self.element.wait_for_property(property, value, options);
        self.verdict(&outcome)
    }

    fn verdict(&self, outcome: &WaitOutcome) -> EsperarResult<()> {
        to_result(outcome, self.message.as_deref())
    }
}

/// Assertion builder over an element collection.
#[derive(Debug)]
pub struct ExpectQuery<'a, E: UiElement> {
    query: &'a ElementQuery<E>,
    message: Option<String>,
}

/// Create an assertion builder for a query.
#[must_use]
pub fn expect_query<E: UiElement>(query: &ElementQuery<E>) -> ExpectQuery<'_, E> {
    ExpectQuery {
        query,
        message: None,
    }
}

impl<E: UiElement> ExpectQuery<'_, E> {
    /// Replace the generated failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Assert the collection eventually contains a match.
    pub fn to_contain_match(
        &self,
        predicate: &Predicate,
        options: &WaitOptions,
    ) -> EsperarResult<()> {
        let outcome = self.query.wait_for_match(predicate, options);
        to_result(&outcome, self.message.as_deref())
    }

    /// Assert the collection's match count eventually equals `expected`.
    pub fn to_have_count(&self, expected: usize, options: &WaitOptions) -> EsperarResult<()> {
        let outcome = self.query.wait_for_count(expected, options);
        to_result(&outcome, self.message.as_deref())
    }
}

fn to_result(outcome: &WaitOutcome, message: Option<&str>) -> EsperarResult<()> {
    if outcome.success {
        return Ok(());
    }
    let message = match message {
        Some(custom) => custom.to_string(),
        None => outcome.to_string(),
    };
    Err(EsperarError::AssertionFailed { message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::mock::{MockElement, MockTree};

    fn fast_options() -> WaitOptions {
        WaitOptions::new().with_timeout(150).with_poll_interval(10)
    }

    #[test]
    fn test_to_exist_passes_for_present_element() {
        let element = MockElement::new(ElementKind::Button);
        assert!(expect(&element).to_exist(&fast_options()).is_ok());
    }

    #[test]
    fn test_to_satisfy_failure_carries_condition_and_elapsed() {
        let element = MockElement::new(ElementKind::TextField).with_value("no");
        let result = expect(&element).to_satisfy(
            &Predicate::equals(ElementProperty::Value, "yes"),
            &fast_options(),
        );
        let error = result.unwrap_err();
        let message = error.to_string();
        assert!(message.contains("timed out"));
        assert!(message.contains("value == \"yes\""));
    }

    #[test]
    fn test_with_message_overrides_generated_message() {
        let element = MockElement::new(ElementKind::Sheet);
        let result = expect(&element)
            .with_message("cookie banner should have dismissed itself")
            .to_not_exist(&fast_options());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("cookie banner should have dismissed itself"));
        assert!(!message.contains("timed out"));
    }

    #[test]
    fn test_to_have_passes_once_property_matches() {
        let element = MockElement::new(ElementKind::TextField).with_value("ready");
        assert!(expect(&element)
            .to_have(ElementProperty::Value, "ready", &fast_options())
            .is_ok());
    }

    #[test]
    fn test_query_assertions() {
        let tree = MockTree::new();
        tree.push(MockElement::new(ElementKind::Button).with_title("Accept"));
        let query = tree.query();
        assert!(expect_query(&query)
            .to_contain_match(
                &Predicate::contains(ElementProperty::Title, "accept"),
                &fast_options(),
            )
            .is_ok());
        assert!(expect_query(&query).to_have_count(1, &fast_options()).is_ok());
        assert!(expect_query(&query).to_have_count(2, &fast_options()).is_err());
    }
}

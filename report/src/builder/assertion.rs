use serde_json::Value;
use tracing::debug;

use crate::model::{Assertion, EarlResult, Outcome, Test, TestSubject};
use crate::rollup::rollup;

/// Builds an [`Assertion`].
///
/// The result is `pass` until a result or child assertions are supplied.
/// Once the assertion has children its result is always the rollup of
/// those children, whatever was set through [`Self::with_result`].
#[derive(Debug, Clone)]
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl Default for AssertionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssertionBuilder {
    /// Starts an assertion with a passing result.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assertion: Assertion {
                type_: "earl:assertion".to_owned(),
                asserted_by: None,
                mode: None,
                test: None,
                result: EarlResult::outcome(Outcome::Pass),
                assertions: None,
                test_subject: None,
            },
        }
    }

    /// Sets the agent that made the assertion.
    #[must_use]
    pub fn with_asserted_by(mut self, assertor: impl Into<Value>) -> Self {
        self.assertion.asserted_by = Some(assertor.into());
        self
    }

    /// Sets the assertion mode, e.g. `automatic`.
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.assertion.mode = Some(mode.into());
        self
    }

    /// Sets the rule that was checked.
    #[must_use]
    pub fn with_test(mut self, test: Test) -> Self {
        self.assertion.test = Some(test);
        self
    }

    /// Sets the directly observed result.
    #[must_use]
    pub fn with_result(mut self, result: EarlResult) -> Self {
        self.assertion.result = result;
        self
    }

    /// Sets the target of this assertion.
    #[must_use]
    pub fn with_test_subject(mut self, subject: TestSubject) -> Self {
        self.assertion.test_subject = Some(subject);
        self
    }

    /// Makes sure the assertion has a (possibly empty) child list.
    #[must_use]
    pub fn with_sub_assertions(mut self) -> Self {
        self.assertion.assertions.get_or_insert_with(Vec::new);
        self
    }

    /// Appends child assertions and recomputes the result from the full
    /// child list.
    #[must_use]
    pub fn with_assertions(mut self, assertions: impl IntoIterator<Item = Assertion>) -> Self {
        let children = self.assertion.assertions.get_or_insert_with(Vec::new);
        children.extend(assertions);
        self.assertion.result = rollup(children);
        debug!(
            children = children.len(),
            outcome = %self.assertion.result.outcome,
            "assertion children updated"
        );
        self
    }

    /// Returns the finished assertion.
    #[must_use]
    pub fn build(mut self) -> Assertion {
        if let Some(children) = self.assertion.assertions.as_deref() {
            if !children.is_empty() {
                self.assertion.result = rollup(children);
            }
        }
        self.assertion
    }
}

//! Outcome rollup shared by assertions and reports.

use crate::model::{Assertion, EarlResult, Outcome};

/// Derives a parent result from its direct children.
///
/// The outcome is `fail` if any child failed and `pass` otherwise, including
/// for an empty slice. Grandchildren are not inspected: a child's own result
/// already reflects its subtree. The synthesized result carries no
/// description, snippet or pointer.
#[must_use]
pub fn rollup(assertions: &[Assertion]) -> EarlResult {
    let outcome = if assertions.iter().any(|a| a.result.is_failure()) {
        Outcome::Fail
    } else {
        Outcome::Pass
    };
    EarlResult::outcome(outcome)
}

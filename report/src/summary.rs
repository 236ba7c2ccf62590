//! Violation summary: tallies of assertions by rule category and severity.
//!
//! Tallying is additive on the category rows. The grand-total row is never
//! incremented directly; it is re-derived from the five category rows after
//! every batch, so for each severity `k`:
//!
//! `total[k] == wcag2a[k] + wcag2aa[k] + EPUB[k] + best-practice[k] + other[k]`
//!
//! A test tagged with several recognized categories is counted once in each
//! of them, so `total.total` counts category hits, not assertions.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ReportError;
use crate::model::{Assertion, Impact, Test};

/// Rule category a tally row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RulesetCategory {
    /// WCAG 2.0 level A.
    Wcag2a,
    /// WCAG 2.0 level AA.
    Wcag2aa,
    /// EPUB-specific rules.
    Epub,
    /// Best practices beyond WCAG.
    BestPractice,
    /// Anything not in a recognized category.
    Other,
}

impl RulesetCategory {
    /// Categories a ruleset tag can name directly.
    pub const RECOGNIZED: [RulesetCategory; 4] = [
        RulesetCategory::Wcag2a,
        RulesetCategory::Wcag2aa,
        RulesetCategory::Epub,
        RulesetCategory::BestPractice,
    ];

    /// Maps a ruleset tag to its category, or `None` for an unrecognized tag.
    ///
    /// Matching is exact and case-sensitive. [`RulesetCategory::Other`] is
    /// never returned: `"other"` as a tag is itself unrecognized.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::RECOGNIZED.into_iter().find(|c| c.as_str() == tag)
    }

    /// Returns the key used for this row in `violationSummary`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RulesetCategory::Wcag2a => "wcag2a",
            RulesetCategory::Wcag2aa => "wcag2aa",
            RulesetCategory::Epub => "EPUB",
            RulesetCategory::BestPractice => "best-practice",
            RulesetCategory::Other => "other",
        }
    }

    /// Categories a test is tallied under: every recognized tag it carries,
    /// in tag order, or `[Other]` if it carries none.
    #[must_use]
    pub fn for_test(test: &Test) -> Vec<Self> {
        let mut categories: Vec<Self> = Vec::new();
        for category in test.ruleset_tags.iter().filter_map(|t| Self::from_tag(t)) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        if categories.is_empty() {
            categories.push(RulesetCategory::Other);
        }
        categories
    }
}

/// One row of the violation summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Critical violations.
    pub critical: u32,
    /// Serious violations.
    pub serious: u32,
    /// Moderate violations.
    pub moderate: u32,
    /// Minor violations.
    pub minor: u32,
    /// All violations in this row.
    pub total: u32,
}

impl SeverityCounts {
    /// Returns the counter for one severity.
    #[must_use]
    pub fn get(&self, impact: Impact) -> u32 {
        match impact {
            Impact::Critical => self.critical,
            Impact::Serious => self.serious,
            Impact::Moderate => self.moderate,
            Impact::Minor => self.minor,
        }
    }

    fn slot(&mut self, impact: Impact) -> &mut u32 {
        match impact {
            Impact::Critical => &mut self.critical,
            Impact::Serious => &mut self.serious,
            Impact::Moderate => &mut self.moderate,
            Impact::Minor => &mut self.minor,
        }
    }

    /// Counts one violation: the severity counter and `total` both go up by one.
    pub fn increment(&mut self, impact: Impact) {
        *self.slot(impact) += 1;
        self.total += 1;
    }

    fn add(self, other: SeverityCounts) -> SeverityCounts {
        SeverityCounts {
            critical: self.critical + other.critical,
            serious: self.serious + other.serious,
            moderate: self.moderate + other.moderate,
            minor: self.minor + other.minor,
            total: self.total + other.total,
        }
    }
}

/// Assertions handed to a report in one call.
///
/// Checkers hand over either a flat list of assertions or a single
/// container assertion (e.g. one per content document) whose children are
/// the individual rule assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertionBatch {
    /// Plain sequence; each element is tallied.
    Flat(Vec<Assertion>),
    /// One container; its direct children are tallied, the container itself
    /// is not.
    Container(Assertion),
}

impl AssertionBatch {
    /// Assertions the violation summary should count, or `None` for a
    /// container that has no child list.
    #[must_use]
    pub fn tallied(&self) -> Option<&[Assertion]> {
        match self {
            AssertionBatch::Flat(assertions) => Some(assertions),
            AssertionBatch::Container(container) => container.assertions.as_deref(),
        }
    }

    /// Assertions to append to the parent's assertion sequence.
    #[must_use]
    pub fn into_assertions(self) -> Vec<Assertion> {
        match self {
            AssertionBatch::Flat(assertions) => assertions,
            AssertionBatch::Container(container) => vec![container],
        }
    }

    /// Returns true if `assertion` is a container: it has a child list but
    /// no test of its own, as checkers emit for each content document.
    #[must_use]
    pub fn is_container(assertion: &Assertion) -> bool {
        assertion.test.is_none() && assertion.assertions.is_some()
    }

    /// Splits a mixed sequence of checker output into batches, keeping
    /// order: each container becomes a [`AssertionBatch::Container`], each
    /// run of other assertions a [`AssertionBatch::Flat`].
    #[must_use]
    pub fn group(assertions: Vec<Assertion>) -> Vec<AssertionBatch> {
        let mut batches: Vec<AssertionBatch> = Vec::new();
        let mut leaves: Vec<Assertion> = Vec::new();
        for assertion in assertions {
            if Self::is_container(&assertion) {
                if !leaves.is_empty() {
                    batches.push(AssertionBatch::Flat(std::mem::take(&mut leaves)));
                }
                batches.push(AssertionBatch::Container(assertion));
            } else {
                leaves.push(assertion);
            }
        }
        if !leaves.is_empty() {
            batches.push(AssertionBatch::Flat(leaves));
        }
        batches
    }

    /// Returns true if the batch supplies nothing to append.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, AssertionBatch::Flat(assertions) if assertions.is_empty())
    }
}

impl From<Vec<Assertion>> for AssertionBatch {
    fn from(assertions: Vec<Assertion>) -> Self {
        AssertionBatch::Flat(assertions)
    }
}

impl From<Assertion> for AssertionBatch {
    fn from(container: Assertion) -> Self {
        AssertionBatch::Container(container)
    }
}

/// Violation tallies for a report (`violationSummary`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationSummary {
    /// WCAG 2.0 level A.
    pub wcag2a: SeverityCounts,
    /// WCAG 2.0 level AA.
    pub wcag2aa: SeverityCounts,
    /// EPUB-specific rules.
    #[serde(rename = "EPUB")]
    pub epub: SeverityCounts,
    /// Best practices.
    #[serde(rename = "best-practice")]
    pub best_practice: SeverityCounts,
    /// Unrecognized categories.
    pub other: SeverityCounts,
    /// Sum of the five rows above.
    pub total: SeverityCounts,
}

impl ViolationSummary {
    /// Returns the row for one category.
    #[must_use]
    pub fn category(&self, category: RulesetCategory) -> &SeverityCounts {
        match category {
            RulesetCategory::Wcag2a => &self.wcag2a,
            RulesetCategory::Wcag2aa => &self.wcag2aa,
            RulesetCategory::Epub => &self.epub,
            RulesetCategory::BestPractice => &self.best_practice,
            RulesetCategory::Other => &self.other,
        }
    }

    fn category_mut(&mut self, category: RulesetCategory) -> &mut SeverityCounts {
        match category {
            RulesetCategory::Wcag2a => &mut self.wcag2a,
            RulesetCategory::Wcag2aa => &mut self.wcag2aa,
            RulesetCategory::Epub => &mut self.epub,
            RulesetCategory::BestPractice => &mut self.best_practice,
            RulesetCategory::Other => &mut self.other,
        }
    }

    /// Tallies one test under every category it belongs to.
    ///
    /// Does not touch the grand-total row; see [`Self::with_recomputed_totals`].
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingImpact`] if the test has no impact.
    pub fn tally(&mut self, test: &Test) -> Result<(), ReportError> {
        let impact = impact_of(test)?;
        for category in RulesetCategory::for_test(test) {
            self.category_mut(category).increment(impact);
        }
        Ok(())
    }

    /// Re-derives the grand-total row from the five category rows.
    #[must_use]
    pub fn with_recomputed_totals(mut self) -> Self {
        self.total = [
            self.wcag2a,
            self.wcag2aa,
            self.epub,
            self.best_practice,
            self.other,
        ]
        .into_iter()
        .fold(SeverityCounts::default(), SeverityCounts::add);
        self
    }

    /// Tallies every assertion of a batch, then re-derives the grand totals.
    ///
    /// A container without child assertions is skipped. Every tallied
    /// assertion is checked before any counter moves, so on error the
    /// summary is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingTest`] or [`ReportError::MissingImpact`]
    /// for an assertion that cannot be classified.
    pub fn add_batch(&mut self, batch: &AssertionBatch) -> Result<(), ReportError> {
        let Some(assertions) = batch.tallied() else {
            warn!("assertion container has no child assertions, violation summary unchanged");
            return Ok(());
        };
        if assertions.is_empty() {
            return Ok(());
        }

        let tests = tests_of(assertions)?;
        let mut next = *self;
        for test in tests {
            next.tally(test)?;
        }
        *self = next.with_recomputed_totals();
        debug!(
            tallied = assertions.len(),
            total = self.total.total,
            "violation summary updated"
        );
        Ok(())
    }

    /// Returns true if the grand-total row equals the sum of the category rows.
    #[must_use]
    pub fn totals_consistent(&self) -> bool {
        self.with_recomputed_totals().total == self.total
    }
}

fn impact_of(test: &Test) -> Result<Impact, ReportError> {
    test.impact.ok_or_else(|| ReportError::MissingImpact {
        title: test.title.clone().unwrap_or_default(),
    })
}

/// Collects the test of every assertion, failing on the first one that
/// cannot be tallied.
fn tests_of(assertions: &[Assertion]) -> Result<Vec<&Test>, ReportError> {
    assertions
        .iter()
        .enumerate()
        .map(|(position, assertion)| {
            let test = assertion
                .test
                .as_ref()
                .ok_or(ReportError::MissingTest { position })?;
            impact_of(test)?;
            Ok(test)
        })
        .collect()
}

//! Report model types.
//!
//! Every node of the EARL report tree as a typed Rust value. Field names on
//! the wire are the JSON-LD compact IRIs (`earl:`, `dct:`, `doap:`) consumed
//! by downstream report viewers, so each field carries an explicit
//! `serde(rename)`. Values are produced by the builders in
//! [`crate::builder`] and are not mutated after being embedded in a parent.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ReportError;
use crate::summary::ViolationSummary;

/// JSON-LD context document every report refers to.
pub const REPORT_CONTEXT: &str = "http://daisy.github.io/ace/ace-report-1.0.jsonld";

/// Outcome of applying one test to one target (`earl:outcome`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// The target satisfies the test.
    Pass,
    /// The target violates the test.
    Fail,
    /// The checker could not decide.
    #[serde(alias = "cannotTell")]
    CantTell,
    /// The test does not apply to the target.
    Inapplicable,
    /// The test was not carried out.
    Untested,
}

impl Outcome {
    /// Returns the string value used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::CantTell => "cantTell",
            Outcome::Inapplicable => "inapplicable",
            Outcome::Untested => "untested",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass" => Ok(Outcome::Pass),
            "fail" => Ok(Outcome::Fail),
            "cantTell" | "cannotTell" => Ok(Outcome::CantTell),
            "inapplicable" => Ok(Outcome::Inapplicable),
            "untested" => Ok(Outcome::Untested),
            other => Err(ReportError::UnknownOutcome(other.to_owned())),
        }
    }
}

/// Severity of a failing check (`earl:impact`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Blocks access for some users.
    Critical,
    /// Seriously hinders access.
    Serious,
    /// Some users will have difficulty.
    Moderate,
    /// Annoyance rather than barrier.
    Minor,
}

impl Impact {
    /// All severities, most severe first.
    pub const ALL: [Impact; 4] = [
        Impact::Critical,
        Impact::Serious,
        Impact::Moderate,
        Impact::Minor,
    ];

    /// Returns the string value used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Impact::Critical => "critical",
            Impact::Serious => "serious",
            Impact::Moderate => "moderate",
            Impact::Minor => "minor",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Impact::Critical),
            "serious" => Ok(Impact::Serious),
            "moderate" => Ok(Impact::Moderate),
            "minor" => Ok(Impact::Minor),
            other => Err(ReportError::UnknownImpact(other.to_owned())),
        }
    }
}

/// Locator into the tested document (`earl:pointer`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pointer {
    /// CSS selectors of the offending element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub css: Vec<String>,
    /// EPUB canonical fragment identifier of the offending element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfi: Option<String>,
}

/// Outcome of one applied test (`earl:result`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlResult {
    /// Pass, fail, and so on.
    #[serde(rename = "earl:outcome")]
    pub outcome: Outcome,
    /// Human-readable explanation.
    #[serde(rename = "dct:description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rendered HTML snippet of the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Where in the publication the target lives.
    #[serde(rename = "earl:pointer", default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<Pointer>,
}

impl EarlResult {
    /// A result consisting solely of an outcome.
    #[must_use]
    pub fn outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            description: None,
            html: None,
            pointer: None,
        }
    }

    /// Returns true if the outcome is [`Outcome::Fail`].
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Fail
    }
}

/// Help reference attached to a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Help {
    /// Where the rule is documented.
    pub url: String,
    /// Title of the help page.
    #[serde(rename = "dct:title")]
    pub title: String,
    /// Summary of the help page.
    #[serde(rename = "dct:description")]
    pub description: String,
}

/// Static metadata describing which rule was checked (`earl:test`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    /// Severity classification.
    #[serde(rename = "earl:impact", default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
    /// Rule title.
    #[serde(rename = "dct:title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Rule description.
    #[serde(rename = "dct:description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Help reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<Help>,
    /// Rule-category tags, free-form, without duplicates.
    #[serde(rename = "rulesetTags", default)]
    pub ruleset_tags: Vec<String>,
}

/// The thing under test (`earl:testSubject`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSubject {
    /// Location of the subject, possibly relative to the report directory.
    pub url: String,
    /// Publication title.
    #[serde(rename = "dct:title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Publication identifier.
    #[serde(rename = "dct:identifier", default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Package metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Package links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

fn assertion_type() -> String {
    "earl:assertion".to_owned()
}

/// A test paired with its result for one run (`earl:assertion`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    /// Always `earl:assertion`.
    #[serde(rename = "@type", default = "assertion_type")]
    pub type_: String,
    /// Agent that made the assertion.
    #[serde(rename = "earl:assertedBy", default, skip_serializing_if = "Option::is_none")]
    pub asserted_by: Option<Value>,
    /// How the assertion was made (e.g. `automatic`).
    #[serde(rename = "earl:mode", default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Rule that was checked.
    #[serde(rename = "earl:test", default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Test>,
    /// Outcome; the rollup of `assertions` whenever children are present.
    #[serde(rename = "earl:result")]
    pub result: EarlResult,
    /// Nested sub-assertions of a composite check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertions: Option<Vec<Assertion>>,
    /// Target of this assertion, e.g. one content document.
    #[serde(rename = "earl:testSubject", default, skip_serializing_if = "Option::is_none")]
    pub test_subject: Option<TestSubject>,
}

/// Release information inside the assertor descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Version string.
    #[serde(rename = "doap:revision")]
    pub revision: String,
}

/// The software that asserted the report (`earl:assertedBy`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertor {
    /// Always `earl:software`.
    #[serde(rename = "@type")]
    pub type_: String,
    /// Product name.
    #[serde(rename = "doap:name")]
    pub name: String,
    /// Product description.
    #[serde(rename = "doap:description")]
    pub description: String,
    /// Product homepage.
    #[serde(rename = "doap:homepage")]
    pub homepage: String,
    /// Date the product was created.
    #[serde(rename = "doap:created")]
    pub created: String,
    /// Release of the product that produced the report.
    #[serde(rename = "doap:release")]
    pub release: Release,
}

impl Assertor {
    /// The fixed descriptor of this checker, versioned with the crate.
    #[must_use]
    pub fn ace() -> Self {
        Self {
            type_: "earl:software".to_owned(),
            name: "DAISY Ace".to_owned(),
            description: "DAISY Accessibility Checker for EPUB".to_owned(),
            homepage: "http://daisy.github.io/ace".to_owned(),
            created: "2017-07-01".to_owned(),
            release: Release {
                revision: env!("CARGO_PKG_VERSION").to_owned(),
            },
        }
    }
}

/// Document outlines extracted from the publication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outlines {
    /// Table-of-contents outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<Value>,
    /// Headings outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headings: Option<Value>,
    /// Raw HTML outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<Value>,
}

/// The report document root (`earl:report`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Always `earl:report`.
    #[serde(rename = "@type")]
    pub type_: String,
    /// Always [`REPORT_CONTEXT`].
    #[serde(rename = "@context")]
    pub context: String,
    /// Report title.
    #[serde(rename = "dct:title")]
    pub title: String,
    /// Report description.
    #[serde(rename = "dct:description")]
    pub description: String,
    /// Creation timestamp.
    #[serde(rename = "dct:date")]
    pub date: String,
    /// The checker that produced the report.
    #[serde(rename = "earl:assertedBy")]
    pub asserted_by: Assertor,
    /// The publication under test.
    #[serde(rename = "earl:testSubject", default, skip_serializing_if = "Option::is_none")]
    pub test_subject: Option<TestSubject>,
    /// Document outlines.
    pub outlines: Outlines,
    /// Auxiliary data (images, audio, extracted metadata, ...).
    pub data: Map<String, Value>,
    /// Boolean publication properties.
    pub properties: BTreeMap<String, bool>,
    /// Accessibility metadata declared by the publication.
    #[serde(rename = "a11y-metadata", default, skip_serializing_if = "Option::is_none")]
    pub a11y_metadata: Option<Value>,
    /// Top-level assertions, in insertion order.
    pub assertions: Vec<Assertion>,
    /// Rollup of the top-level assertions.
    #[serde(rename = "earl:result")]
    pub result: EarlResult,
    /// Violation tallies by rule category and severity.
    #[serde(rename = "violationSummary")]
    pub violation_summary: ViolationSummary,
}

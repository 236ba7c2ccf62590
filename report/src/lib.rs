//! Assembly of EARL accessibility reports for EPUB publications.
//!
//! The checker decides pass/fail and impact for each rule; this crate takes
//! those already-computed results and composes them into a single JSON-LD
//! report: a tree of assertions with a rolled-up outcome and a violation
//! summary tallied by rule category and severity.
//!
//! # Entry Point
//!
//! ```
//! use ace_report::{
//!     AssertionBuilder, Impact, Outcome, ReportBuilder, ReportConfig, ResultBuilder,
//!     TestBuilder,
//! };
//!
//! let test = TestBuilder::new()
//!     .with_title("color-contrast")
//!     .with_impact(Impact::Critical)
//!     .with_ruleset_tags(["wcag2aa"])
//!     .build();
//! let assertion = AssertionBuilder::new()
//!     .with_test(test)
//!     .with_result(ResultBuilder::new(Outcome::Fail).build())
//!     .build();
//!
//! let mut builder = ReportBuilder::new(ReportConfig::default());
//! builder.with_assertions(vec![assertion])?;
//! let report = builder.build();
//!
//! assert_eq!(report.result.outcome, Outcome::Fail);
//! assert_eq!(report.violation_summary.wcag2aa.critical, 1);
//! # Ok::<(), ace_report::ReportError>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! # use ace_report::{ReportBuilder, ReportConfig};
//! let report = ReportBuilder::new(ReportConfig::default()).build();
//! let json_ld = ace_report::serializer::jsonld::to_json_ld(&report)?;
//! assert_eq!(json_ld["@type"], "earl:report");
//! # Ok::<(), ace_report::ReportError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod rollup;
pub mod serializer;
pub mod subject;
pub mod summary;

pub use builder::{AssertionBuilder, ReportBuilder, ResultBuilder, TestBuilder};
pub use config::ReportConfig;
pub use error::ReportError;
pub use model::{
    Assertion, Assertor, EarlResult, Help, Impact, Outcome, Outlines, Pointer, Report, Test,
    TestSubject,
};
pub use rollup::rollup;
pub use summary::{AssertionBatch, RulesetCategory, SeverityCounts, ViolationSummary};

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::model::{Assertor, EarlResult, Outcome, Outlines, Report, TestSubject, REPORT_CONTEXT};
use crate::rollup::rollup;
use crate::subject::relative_url;
use crate::summary::{AssertionBatch, ViolationSummary};

/// Title used by [`ReportBuilder::new`].
pub const DEFAULT_TITLE: &str = "Ace Report";

/// Description used by [`ReportBuilder::new`].
pub const DEFAULT_DESCRIPTION: &str = "Report on automated accessibility checks for EPUB";

/// Accumulates a [`Report`] across several calls.
///
/// A builder belongs to the single caller assembling one report. Results of
/// parallel checks are merged in from that caller, one batch at a time.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    report: Report,
    config: ReportConfig,
    outdir: Option<PathBuf>,
}

impl ReportBuilder {
    /// Starts a report with the default title and description.
    #[must_use]
    pub fn new(config: ReportConfig) -> Self {
        Self::titled(DEFAULT_TITLE, DEFAULT_DESCRIPTION, config)
    }

    /// Starts a report with the given title and description.
    #[must_use]
    pub fn titled(
        title: impl Into<String>,
        description: impl Into<String>,
        config: ReportConfig,
    ) -> Self {
        Self {
            report: Report {
                type_: "earl:report".to_owned(),
                context: REPORT_CONTEXT.to_owned(),
                title: title.into(),
                description: description.into(),
                date: format_date(&Local::now()),
                asserted_by: Assertor::ace(),
                test_subject: None,
                outlines: Outlines::default(),
                data: Map::new(),
                properties: BTreeMap::new(),
                a11y_metadata: None,
                assertions: Vec::new(),
                result: EarlResult::outcome(Outcome::Pass),
                violation_summary: ViolationSummary::default(),
            },
            config,
            outdir: None,
        }
    }

    /// Overrides the creation timestamp.
    pub fn with_date(&mut self, date: impl Into<String>) -> &mut Self {
        self.report.date = date.into();
        self
    }

    /// Sets the directory the report is written to. Only used to rewrite
    /// test-subject urls when relative paths are enabled.
    pub fn set_outdir(&mut self, outdir: impl Into<PathBuf>) -> &mut Self {
        self.outdir = Some(outdir.into());
        self
    }

    /// Sets the publication under test.
    ///
    /// With relative paths enabled and a non-empty output directory, the url
    /// is stored relative to that directory. A url that cannot be related
    /// to it is stored as given.
    pub fn with_test_subject(&mut self, mut subject: TestSubject) -> &mut Self {
        if self.config.use_relative_paths {
            if let Some(outdir) = self.outdir.as_deref().filter(|d| !d.as_os_str().is_empty()) {
                match relative_url(outdir, &subject.url) {
                    Some(relative) => subject.url = relative,
                    None => warn!(
                        url = %subject.url,
                        outdir = %outdir.display(),
                        "test subject cannot be made relative to the output directory"
                    ),
                }
            }
        }
        self.report.test_subject = Some(subject);
        self
    }

    /// Appends top-level assertions, then recomputes the report result and
    /// the violation summary.
    ///
    /// A flat batch appends each of its assertions; a container batch
    /// appends the container itself and tallies its children. An empty flat
    /// batch changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingTest`] or [`ReportError::MissingImpact`]
    /// if a tallied assertion cannot be classified. The builder is left
    /// unchanged in that case.
    pub fn with_assertions(
        &mut self,
        batch: impl Into<AssertionBatch>,
    ) -> Result<&mut Self, ReportError> {
        let batch = batch.into();
        if batch.is_empty() {
            return Ok(self);
        }

        let mut summary = self.report.violation_summary;
        summary.add_batch(&batch)?;
        self.report.violation_summary = summary;

        self.report.assertions.extend(batch.into_assertions());
        self.report.result = rollup(&self.report.assertions);
        debug!(
            assertions = self.report.assertions.len(),
            outcome = %self.report.result.outcome,
            "report assertions updated"
        );
        Ok(self)
    }

    /// Sets the table-of-contents outline; `null` is ignored.
    pub fn with_epub_outline(&mut self, outline: Value) -> &mut Self {
        if !outline.is_null() {
            self.report.outlines.toc = Some(outline);
        }
        self
    }

    /// Sets the headings outline; `null` is ignored.
    pub fn with_headings_outline(&mut self, outline: Value) -> &mut Self {
        if !outline.is_null() {
            self.report.outlines.headings = Some(outline);
        }
        self
    }

    /// Sets the raw HTML outline; `null` is ignored.
    pub fn with_html_outline(&mut self, outline: Value) -> &mut Self {
        if !outline.is_null() {
            self.report.outlines.html = Some(outline);
        }
        self
    }

    /// Stores the publication's accessibility metadata; `null` is ignored.
    pub fn with_a11y_meta(&mut self, metadata: Value) -> &mut Self {
        if !metadata.is_null() {
            self.report.a11y_metadata = Some(metadata);
        }
        self
    }

    /// Merges auxiliary data. A key whose stored value is an array has the
    /// new value appended (array elements individually); any other stored
    /// value is replaced.
    pub fn with_data(&mut self, data: Map<String, Value>) -> &mut Self {
        for (key, value) in data {
            match self.report.data.get_mut(&key) {
                Some(Value::Array(existing)) => match value {
                    Value::Array(items) => existing.extend(items),
                    item => existing.push(item),
                },
                _ => {
                    self.report.data.insert(key, value);
                }
            }
        }
        self
    }

    /// Replaces `data[key]` by `f(data[key])` if the key is present.
    pub fn clean_data<F>(&mut self, key: &str, f: F) -> &mut Self
    where
        F: FnOnce(Value) -> Value,
    {
        if let Some(slot) = self.report.data.get_mut(key) {
            *slot = f(slot.take());
        }
        self
    }

    /// Merges boolean properties. A property, once true, stays true; values
    /// are coerced with [`truthy`].
    pub fn with_properties(&mut self, properties: Map<String, Value>) -> &mut Self {
        for (key, value) in properties {
            let flag = truthy(&value);
            self.report
                .properties
                .entry(key)
                .and_modify(|existing| *existing = *existing || flag)
                .or_insert(flag);
        }
        self
    }

    /// Returns the accumulated report.
    #[must_use]
    pub fn build(self) -> Report {
        self.report
    }
}

/// Boolean coercion for property values: `null`, `false`, `0`, `NaN` and
/// `""` are false, everything else (including empty arrays and objects) is
/// true.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn format_date(date: &DateTime<Local>) -> String {
    date.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{AssertionBuilder, ResultBuilder, TestBuilder};
    use crate::model::{Assertion, Impact};
    use chrono::TimeZone;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn checked(tags: &[&str], impact: Impact, outcome: Outcome) -> Assertion {
        AssertionBuilder::new()
            .with_test(
                TestBuilder::new()
                    .with_impact(impact)
                    .with_ruleset_tags(tags.iter().copied())
                    .build(),
            )
            .with_result(ResultBuilder::new(outcome).build())
            .build()
    }

    #[test]
    fn fresh_report_passes_with_empty_summary() {
        let report = ReportBuilder::new(ReportConfig::default()).build();
        assert_eq!(report.result.outcome, Outcome::Pass);
        assert_eq!(report.violation_summary, ViolationSummary::default());
        assert_eq!(report.title, DEFAULT_TITLE);
        assert_eq!(report.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn data_arrays_append_and_scalars_replace() {
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder
            .with_data(object(json!({ "x": [1], "y": "a" })))
            .with_data(object(json!({ "x": [2], "y": "b" })))
            .with_data(object(json!({ "x": 3 })));
        let report = builder.build();
        assert_eq!(report.data["x"], json!([1, 2, 3]));
        assert_eq!(report.data["y"], "b");
    }

    #[test]
    fn clean_data_rewrites_existing_key_only() {
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder
            .with_data(object(json!({ "images": [{ "src": "a.png" }, { "src": "a.png" }] })))
            .clean_data("images", |v| match v {
                Value::Array(mut items) => {
                    items.dedup();
                    Value::Array(items)
                }
                other => other,
            })
            .clean_data("audios", |_| json!("unreachable"));
        let report = builder.build();
        assert_eq!(report.data["images"], json!([{ "src": "a.png" }]));
        assert!(!report.data.contains_key("audios"));
    }

    #[test]
    fn properties_are_monotonic_true() {
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder.with_properties(object(json!({ "p": false, "hasMathML": 0 })));
        builder.with_properties(object(json!({ "p": true })));
        builder.with_properties(object(json!({ "p": false, "hasMathML": "yes" })));
        let report = builder.build();
        assert_eq!(report.properties.get("p"), Some(&true));
        assert_eq!(report.properties.get("hasMathML"), Some(&true));
    }

    #[test]
    fn truthy_follows_loose_boolean_rules() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!(0.5)));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
    }

    #[test]
    fn outlines_last_write_wins_and_null_is_ignored() {
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder
            .with_epub_outline(json!("<ol>first</ol>"))
            .with_epub_outline(json!("<ol>second</ol>"))
            .with_epub_outline(Value::Null)
            .with_headings_outline(json!("<ul>h</ul>"));
        let report = builder.build();
        assert_eq!(report.outlines.toc, Some(json!("<ol>second</ol>")));
        assert_eq!(report.outlines.headings, Some(json!("<ul>h</ul>")));
        assert_eq!(report.outlines.html, None);
    }

    #[test]
    fn subject_url_is_made_relative_to_outdir() {
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder
            .set_outdir("/work/report")
            .with_test_subject(TestSubject::new("/work/books/moby.epub"));
        let report = builder.build();
        assert_eq!(
            report.test_subject.map(|s| s.url).as_deref(),
            Some("../books/moby.epub")
        );
    }

    #[test]
    fn subject_url_kept_when_relative_paths_disabled() {
        let config = ReportConfig {
            use_relative_paths: false,
        };
        let mut builder = ReportBuilder::new(config);
        builder
            .set_outdir("/work/report")
            .with_test_subject(TestSubject::new("/work/books/moby.epub"));
        let report = builder.build();
        assert_eq!(
            report.test_subject.map(|s| s.url).as_deref(),
            Some("/work/books/moby.epub")
        );
    }

    #[test]
    fn subject_url_kept_without_outdir() {
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder.with_test_subject(TestSubject::new("/work/books/moby.epub"));
        assert_eq!(
            builder.build().test_subject.map(|s| s.url).as_deref(),
            Some("/work/books/moby.epub")
        );
    }

    #[test]
    fn subject_url_kept_with_empty_outdir() {
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder
            .set_outdir("")
            .with_test_subject(TestSubject::new("/work/books/moby.epub"));
        assert_eq!(
            builder.build().test_subject.map(|s| s.url).as_deref(),
            Some("/work/books/moby.epub")
        );
    }

    #[test]
    fn rejected_batch_leaves_builder_unchanged() {
        let mut builder = ReportBuilder::new(ReportConfig::default());
        let untagged = AssertionBuilder::new()
            .with_test(TestBuilder::new().with_title("no-impact").build())
            .with_result(ResultBuilder::new(Outcome::Fail).build())
            .build();
        let err = builder.with_assertions(vec![untagged]).map(|_| ());
        assert!(matches!(err, Err(ReportError::MissingImpact { .. })));
        let report = builder.build();
        assert!(report.assertions.is_empty());
        assert_eq!(report.result.outcome, Outcome::Pass);
    }

    #[test]
    fn container_batch_appends_container_and_tallies_children() {
        let container = AssertionBuilder::new()
            .with_test_subject(TestSubject::new("EPUB/c1.xhtml"))
            .with_assertions([checked(&["wcag2a"], Impact::Serious, Outcome::Fail)])
            .build();
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder.with_assertions(container).expect("container batch");
        let report = builder.build();
        assert_eq!(report.assertions.len(), 1);
        assert_eq!(report.result.outcome, Outcome::Fail);
        assert_eq!(report.violation_summary.wcag2a.serious, 1);
        assert_eq!(report.violation_summary.total.total, 1);
    }

    #[test]
    fn childless_container_is_appended_but_not_tallied() {
        let container = AssertionBuilder::new()
            .with_result(ResultBuilder::new(Outcome::Fail).build())
            .build();
        let mut builder = ReportBuilder::new(ReportConfig::default());
        builder.with_assertions(container).expect("container batch");
        let report = builder.build();
        assert_eq!(report.assertions.len(), 1);
        assert_eq!(report.result.outcome, Outcome::Fail);
        assert_eq!(report.violation_summary, ViolationSummary::default());
    }

    #[test]
    fn date_is_locale_style() {
        let date = Local
            .with_ymd_and_hms(2017, 7, 1, 14, 5, 9)
            .single()
            .expect("unambiguous local time");
        assert_eq!(format_date(&date), "7/1/2017, 2:05:09 PM");
    }
}

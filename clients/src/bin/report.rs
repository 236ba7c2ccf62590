//! `ace-report` — Assembles checker output into an EARL accessibility report.
//!
//! Reads a run file produced by the rule engine:
//!
//! ```json
//! {
//!   "testSubject": { "url": "/books/moby.epub", "title": "Moby Dick" },
//!   "assertions": [ { "earl:test": { ... }, "earl:result": { ... } } ],
//!   "data": { "images": [] },
//!   "properties": { "hasMathML": false },
//!   "a11y-metadata": { "present": [], "missing": [] },
//!   "outlines": { "toc": "<ol>...</ol>" }
//! }
//! ```
//!
//! and writes `<outdir>/report.json`, or prints the report when no output
//! directory is given.
//!
//! **Usage:**
//! ```
//! ace-report --input <run.json> [--outdir <path>] [--config <ace.toml>] [--strict]
//! ```
//!
//! With `--strict`, exits non-zero if the report outcome is `fail`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use ace_report::serializer::jsonld;
use ace_report::{
    Assertion, AssertionBatch, Outcome, Outlines, Report, ReportBuilder, ReportConfig,
    TestSubject,
};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Assemble an Ace accessibility report.
#[derive(Parser)]
#[command(
    name = "ace-report",
    about = "Assemble checker output into an EARL accessibility report"
)]
struct Args {
    /// Run file holding the test subject and checker assertions.
    #[arg(long)]
    input: PathBuf,

    /// Directory to write report.json into (default: print to stdout).
    #[arg(long)]
    outdir: Option<PathBuf>,

    /// TOML configuration file with a [report] table.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report title.
    #[arg(long, default_value = ace_report::builder::DEFAULT_TITLE)]
    title: String,

    /// Report description.
    #[arg(long, default_value = ace_report::builder::DEFAULT_DESCRIPTION)]
    description: String,

    /// Exit with status 1 when the report outcome is fail.
    #[arg(long)]
    strict: bool,
}

/// Checker output for one publication.
#[derive(Debug, Deserialize)]
struct RunFile {
    #[serde(rename = "testSubject")]
    test_subject: SubjectInput,
    #[serde(default)]
    assertions: Vec<Assertion>,
    #[serde(default)]
    data: Map<String, Value>,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(rename = "a11y-metadata", default)]
    a11y_metadata: Value,
    #[serde(default)]
    outlines: Outlines,
}

#[derive(Debug, Deserialize)]
struct SubjectInput {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    identifier: String,
    #[serde(default)]
    metadata: Value,
    #[serde(default)]
    links: Value,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    let run = read_run(&args.input)?;
    let report = assemble(run, &args, config)?;

    let text = jsonld::to_string_pretty(&report).context("Failed to serialize report")?;
    match &args.outdir {
        Some(outdir) => {
            fs::create_dir_all(outdir).with_context(|| {
                format!("Failed to create output directory: {}", outdir.display())
            })?;
            let path = outdir.join("report.json");
            fs::write(&path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{text}"),
    }

    let summary = &report.violation_summary.total;
    info!(
        outcome = %report.result.outcome,
        critical = summary.critical,
        serious = summary.serious,
        moderate = summary.moderate,
        minor = summary.minor,
        "report assembled"
    );

    if args.strict && report.result.outcome == Outcome::Fail {
        eprintln!(
            "Accessibility check FAILED: {} violation(s).",
            summary.total
        );
        process::exit(1);
    }
    Ok(())
}

fn read_run(path: &Path) -> Result<RunFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as a run file", path.display()))
}

fn assemble(run: RunFile, args: &Args, config: ReportConfig) -> Result<Report> {
    let subject = run.test_subject;
    let mut builder = ReportBuilder::titled(&args.title, &args.description, config);
    if let Some(outdir) = &args.outdir {
        builder.set_outdir(outdir);
    }
    builder
        .with_test_subject(
            TestSubject::new(subject.url)
                .with_title(subject.title)
                .with_identifier(subject.identifier)
                .with_metadata(subject.metadata)
                .with_links(subject.links),
        )
        .with_a11y_meta(run.a11y_metadata)
        .with_data(run.data)
        .with_properties(run.properties);
    if let Some(toc) = run.outlines.toc {
        builder.with_epub_outline(toc);
    }
    if let Some(headings) = run.outlines.headings {
        builder.with_headings_outline(headings);
    }
    if let Some(html) = run.outlines.html {
        builder.with_html_outline(html);
    }
    for batch in AssertionBatch::group(run.assertions) {
        builder
            .with_assertions(batch)
            .context("Failed to add checker assertions to the report")?;
    }
    Ok(builder.build())
}

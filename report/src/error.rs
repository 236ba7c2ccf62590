//! Error type for report assembly.

use std::path::PathBuf;

/// Errors raised while assembling, configuring, or serializing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// An outcome string is not one of the EARL outcome values.
    #[error("unknown outcome '{0}' (expected pass, fail, cantTell, inapplicable or untested)")]
    UnknownOutcome(String),

    /// An impact string is not one of the severity levels.
    #[error("unknown impact '{0}' (expected critical, serious, moderate or minor)")]
    UnknownImpact(String),

    /// An assertion handed to the violation summary carries no test.
    #[error("assertion {position} of the batch has no test to classify")]
    MissingTest {
        /// Zero-based position within the tallied batch.
        position: usize,
    },

    /// A test handed to the violation summary carries no impact.
    #[error("test '{title}' has no impact, cannot tally it in the violation summary")]
    MissingImpact {
        /// Title of the offending test, or an empty string if it has none.
        title: String,
    },

    /// The configuration file is not valid TOML for [`crate::ReportConfig`].
    #[error("invalid report configuration in {}: {source}", path.display())]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

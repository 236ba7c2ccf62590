//! Report configuration.
//!
//! Read from the `[report]` table of a TOML file:
//!
//! ```toml
//! [report]
//! use-relative-paths = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ReportError;

/// Options that affect how a report is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReportConfig {
    /// Rewrite test-subject urls relative to the report output directory.
    pub use_relative_paths: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_relative_paths: true,
        }
    }
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    report: ReportConfig,
}

impl ReportConfig {
    /// Parses the `[report]` table of a TOML document. Missing keys take
    /// their defaults; unrelated tables are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the document is not valid TOML or
    /// a recognized key has the wrong type.
    pub fn from_toml_str(source: &str, path: &Path) -> Result<Self, ReportError> {
        let file: ConfigFile = toml::from_str(source).map_err(|source| ReportError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.report)
    }

    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file cannot be read, or
    /// [`ReportError::Config`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let source = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_relative_paths() {
        assert!(ReportConfig::default().use_relative_paths);
        let config = ReportConfig::from_toml_str("", Path::new("ace.toml")).expect("parse");
        assert!(config.use_relative_paths);
    }

    #[test]
    fn reads_report_table() {
        let config = ReportConfig::from_toml_str(
            "[cache]\ndir = \"/tmp\"\n\n[report]\nuse-relative-paths = false\n",
            Path::new("ace.toml"),
        )
        .expect("parse");
        assert!(!config.use_relative_paths);
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        let err = ReportConfig::from_toml_str(
            "[report]\nuse-relative-paths = \"yes\"\n",
            Path::new("ace.toml"),
        );
        assert!(matches!(err, Err(ReportError::Config { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ReportConfig::load(Path::new("/nonexistent/ace-report/config.toml"));
        assert!(matches!(err, Err(ReportError::Io { .. })));
    }
}

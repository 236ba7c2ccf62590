//! Test-subject construction and url rewriting.

use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::model::TestSubject;

impl TestSubject {
    /// A subject identified only by its url.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            identifier: None,
            metadata: None,
            links: None,
        }
    }

    /// Sets the title; an empty title is omitted.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(title.into());
        self
    }

    /// Sets the identifier; an empty identifier is omitted.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = non_empty(identifier.into());
        self
    }

    /// Sets the package metadata; `null` is omitted.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = non_null(metadata);
        self
    }

    /// Sets the package links; `null` is omitted.
    #[must_use]
    pub fn with_links(mut self, links: Value) -> Self {
        self.links = non_null(links);
        self
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn non_null(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}

/// Rewrites `url` as a path relative to `outdir`.
///
/// Relative inputs are first resolved against the current directory. Returns
/// `None` if the current directory is unavailable; see [`relative_url_from`]
/// for the rest.
#[must_use]
pub fn relative_url(outdir: &Path, url: &str) -> Option<String> {
    let cwd = std::env::current_dir().ok()?;
    relative_url_from(&cwd, outdir, url)
}

/// Rewrites `url` as a path relative to `outdir`, resolving relative inputs
/// against `cwd`.
///
/// Both paths are made absolute, `.` is dropped and `..` removes the
/// preceding component (stopping at the root). Returns `None` only when the
/// two paths live under different prefixes (e.g. drives), where no relative
/// path exists.
#[must_use]
pub fn relative_url_from(cwd: &Path, outdir: &Path, url: &str) -> Option<String> {
    let base = resolve(cwd, outdir);
    let target = resolve(cwd, Path::new(url));
    if base.prefix != target.prefix {
        return None;
    }

    let common = base
        .parts
        .iter()
        .zip(target.parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.parts.len() {
        relative.push("..");
    }
    for part in &target.parts[common..] {
        relative.push(part);
    }
    Some(relative.to_string_lossy().into_owned())
}

struct Resolved {
    prefix: Option<String>,
    parts: Vec<String>,
}

fn resolve(cwd: &Path, path: &Path) -> Resolved {
    let joined = cwd.join(path);
    let mut resolved = Resolved {
        prefix: None,
        parts: Vec::new(),
    };
    for component in joined.components() {
        match component {
            Component::Prefix(p) => {
                resolved.prefix = Some(p.as_os_str().to_string_lossy().into_owned());
            }
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                resolved.parts.pop();
            }
            Component::Normal(p) => resolved.parts.push(p.to_string_lossy().into_owned()),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_title_and_identifier_are_omitted() {
        let subject = TestSubject::new("book.epub")
            .with_title("")
            .with_identifier("")
            .with_metadata(Value::Null);
        assert_eq!(subject, TestSubject::new("book.epub"));
        let json = serde_json::to_value(&subject).expect("serialize");
        assert_eq!(json, json!({ "url": "book.epub" }));
    }

    #[test]
    fn present_fields_use_dublin_core_keys() {
        let subject = TestSubject::new("book.epub")
            .with_title("Moby Dick")
            .with_identifier("urn:isbn:123")
            .with_links(json!({ "dc:source": "print" }));
        let json = serde_json::to_value(&subject).expect("serialize");
        assert_eq!(json["dct:title"], "Moby Dick");
        assert_eq!(json["dct:identifier"], "urn:isbn:123");
        assert_eq!(json["links"]["dc:source"], "print");
    }

    const CWD: &str = "/w/c";

    fn relative(outdir: &str, url: &str) -> Option<String> {
        relative_url_from(Path::new(CWD), Path::new(outdir), url)
    }

    #[test]
    fn relative_url_descends_into_subdirectory() {
        let rel = relative("/work/out", "/work/out/epub/book.epub");
        assert_eq!(rel.as_deref(), Some("epub/book.epub"));
    }

    #[test]
    fn relative_url_climbs_out_of_outdir() {
        let rel = relative("/work/out/report", "/work/books/book.epub");
        assert_eq!(rel.as_deref(), Some("../../books/book.epub"));
    }

    #[test]
    fn relative_url_handles_relative_inputs() {
        let rel = relative("./out", "books/./book.epub");
        assert_eq!(rel.as_deref(), Some("../books/book.epub"));
    }

    #[test]
    fn relative_url_same_path_is_empty() {
        assert_eq!(relative("/a/b", "/a/b").as_deref(), Some(""));
    }

    #[test]
    fn outdir_above_cwd_resolves_through_cwd() {
        assert_eq!(relative("../out", "book.epub").as_deref(), Some("../c/book.epub"));
    }

    #[test]
    fn relative_outdir_with_absolute_url() {
        assert_eq!(relative("out", "/w/c/book.epub").as_deref(), Some("../book.epub"));
        assert_eq!(
            relative("out", "/books/book.epub").as_deref(),
            Some("../../../books/book.epub")
        );
    }

    #[test]
    fn absolute_outdir_with_relative_url() {
        assert_eq!(relative("/w/out", "book.epub").as_deref(), Some("../c/book.epub"));
    }

    #[test]
    fn parent_of_root_stays_at_root() {
        assert_eq!(relative("/../out", "/book.epub").as_deref(), Some("../book.epub"));
    }

    #[test]
    fn relative_url_uses_current_directory() {
        let cwd = std::env::current_dir().expect("current directory");
        let url = cwd.join("books").join("book.epub");
        let rel = relative_url(Path::new("out"), &url.to_string_lossy());
        assert_eq!(rel.as_deref(), Some("../books/book.epub"));
    }
}

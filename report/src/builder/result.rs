use crate::error::ReportError;
use crate::model::{EarlResult, Outcome, Pointer};

/// Builds an [`EarlResult`].
#[derive(Debug, Clone)]
pub struct ResultBuilder {
    result: EarlResult,
}

impl ResultBuilder {
    /// Starts a result with the given outcome.
    #[must_use]
    pub fn new(outcome: Outcome) -> Self {
        Self {
            result: EarlResult::outcome(outcome),
        }
    }

    /// Starts a result from an outcome string such as `"fail"`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownOutcome`] for an unrecognized outcome.
    pub fn parse(outcome: &str) -> Result<Self, ReportError> {
        Ok(Self::new(outcome.parse()?))
    }

    /// Attaches a human-readable explanation.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.result.description = Some(description.into());
        self
    }

    /// Attaches the rendered HTML snippet of the target.
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.result.html = Some(html.into());
        self
    }

    /// Attaches a locator: CSS selectors and an optional fragment identifier.
    #[must_use]
    pub fn with_pointer<I, S>(mut self, css: I, cfi: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.result.pointer = Some(Pointer {
            css: css.into_iter().map(Into::into).collect(),
            cfi,
        });
        self
    }

    /// Returns the finished result.
    #[must_use]
    pub fn build(self) -> EarlResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_full_result() {
        let result = ResultBuilder::new(Outcome::Fail)
            .with_description("Images must have alternate text")
            .with_html("<img src=\"cover.jpg\">")
            .with_pointer(["img"], Some("/4/2[cover]".to_owned()))
            .build();
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(
            json,
            json!({
                "earl:outcome": "fail",
                "dct:description": "Images must have alternate text",
                "html": "<img src=\"cover.jpg\">",
                "earl:pointer": { "css": ["img"], "cfi": "/4/2[cover]" }
            })
        );
    }

    #[test]
    fn parse_rejects_unknown_outcome() {
        assert!(ResultBuilder::parse("inapplicable").is_ok());
        assert!(matches!(
            ResultBuilder::parse("maybe"),
            Err(ReportError::UnknownOutcome(_))
        ));
    }

    #[test]
    fn pointer_without_cfi_keeps_selectors() {
        let result = ResultBuilder::new(Outcome::CantTell)
            .with_pointer(Vec::<String>::new(), None)
            .build();
        assert_eq!(result.pointer, Some(Pointer::default()));
    }
}

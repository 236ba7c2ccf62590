//! Builders for each node of the report tree.
//!
//! Nodes are composed bottom-up: [`ResultBuilder`] and [`TestBuilder`] produce
//! the leaves, [`AssertionBuilder`] pairs them (optionally nesting child
//! assertions), and [`ReportBuilder`] collects assertions into the document
//! root. Each builder owns its accumulator; `build` hands over the finished
//! value.

mod assertion;
mod report;
mod result;

pub use assertion::AssertionBuilder;
pub use report::{truthy, ReportBuilder, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
pub use result::ResultBuilder;
pub use test::TestBuilder;

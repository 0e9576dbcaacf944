//! # docbatch
//!
//! Index-tracking document construction for offset-addressed document APIs.
//!
//! Remote document APIs in the style of Google Docs `batchUpdate` address
//! every insertion and style change by a UTF-16 offset into the document
//! body. This library keeps a running offset while appending headings,
//! paragraphs, lists, tables, images and breaks, so a whole document can be
//! assembled into one batch without reading the document back between
//! operations.
//!
//! ## Quick Start
//!
//! ```
//! use docbatch::{DocumentBuilder, Heading, Paragraph, TableSpec};
//!
//! fn main() -> docbatch::Result<()> {
//!     let mut builder = DocumentBuilder::at(1);
//!     builder.push(&Heading::new(1, "Sales").into())?;
//!     builder.push(&Paragraph::with_text("Figures for Q3.").into())?;
//!
//!     let table = TableSpec::from_records(["Region", "Total"], [["North", "120"]]);
//!     let placed = builder.push(&table.into())?;
//!     assert_eq!(placed.table.unwrap().cells().len(), 4);
//!
//!     let batch = builder.finish()?;
//!     println!("{}", docbatch::to_request_json(&batch, true)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Offset tracking**: UTF-16 offsets, predicted table cell positions
//! - **Style resolution**: loose style descriptors to API payloads and field masks
//! - **One-shot submission**: whole batches with rate-limit backoff
//! - **Inspection**: read back cell offsets and compare with the prediction
//! - **Simulation**: an in-memory document service for offline runs

pub mod api;
pub mod builder;
pub mod error;
pub mod inspect;
pub mod layout;
pub mod model;
pub mod ops;
pub mod report;
pub mod service;
pub mod style;

// Re-export commonly used types
pub use builder::{BuildReport, DocumentBuilder, Placement, Rejection};
pub use error::{Error, Result, SubmissionOutcome};
pub use inspect::{compare, inspect_table, CellIndexMap, TableSelector};
pub use layout::{LayoutConstants, TableLayout};
pub use model::{
    Color, Element, ElementKind, Heading, Image, ListBlock, ListItem, Paragraph, SectionType,
    StyleDescriptor, TableSpec, TextRun,
};
pub use ops::{Batch, Operation, Span};
pub use report::ReportSpec;
#[cfg(feature = "http")]
pub use service::HttpDocumentService;
pub use service::{BatchAssembler, DocumentService, MemoryDocumentService, RetryPolicy};

use std::path::Path;

/// Build a batch from elements, appending at `origin`.
///
/// Rejected elements are listed in the returned report and left out of the
/// batch.
///
/// # Example
///
/// ```
/// use docbatch::{plan, Element, Paragraph};
///
/// let elements: Vec<Element> = vec![Paragraph::with_text("Hello").into()];
/// let (report, batch) = plan(&elements, 1)?;
/// assert!(report.is_clean());
/// assert_eq!(batch.extent(), 7);
/// # Ok::<(), docbatch::Error>(())
/// ```
pub fn plan(elements: &[Element], origin: usize) -> Result<(BuildReport, Batch)> {
    plan_with_constants(elements, origin, LayoutConstants::default())
}

/// Build a batch from elements with custom layout constants.
pub fn plan_with_constants(
    elements: &[Element],
    origin: usize,
    constants: LayoutConstants,
) -> Result<(BuildReport, Batch)> {
    let mut builder = DocumentBuilder::with_constants(origin, constants);
    let report = builder.extend(elements)?;
    Ok((report, builder.finish()?))
}

/// Build a batch from a report file, appending at `origin`.
///
/// Layout constants pinned by the report are used, defaults otherwise.
///
/// # Example
///
/// ```no_run
/// use docbatch::plan_report_file;
///
/// let (report, batch) = plan_report_file("report.json", 1)?;
/// println!("{} operations, {} rejected", batch.len(), report.rejections.len());
/// # Ok::<(), docbatch::Error>(())
/// ```
pub fn plan_report_file<P: AsRef<Path>>(path: P, origin: usize) -> Result<(BuildReport, Batch)> {
    let spec = ReportSpec::from_file(path)?;
    let constants = spec.layout.unwrap_or_default();
    let mut builder = DocumentBuilder::with_constants(origin, constants);
    let report = spec.build(&mut builder)?;
    Ok((report, builder.finish()?))
}

/// Serialize a batch as a `batchUpdate` request body.
pub fn to_request_json(batch: &Batch, pretty: bool) -> Result<String> {
    let body = batch.to_request_body();
    let json = if pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_skips_rejected() {
        let elements: Vec<Element> = vec![
            Paragraph::with_text("a").into(),
            TableSpec::new().into(),
            Paragraph::with_text("b").into(),
        ];
        let (report, batch) = plan(&elements, 1).unwrap();
        assert_eq!(report.rejections.len(), 1);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.extent(), 5);
    }

    #[test]
    fn test_request_json() {
        let elements: Vec<Element> = vec![Element::PageBreak];
        let (_, batch) = plan(&elements, 1).unwrap();
        let json = to_request_json(&batch, false).unwrap();
        assert_eq!(
            json,
            r#"{"requests":[{"insertPageBreak":{"location":{"index":1}}}]}"#
        );
    }
}

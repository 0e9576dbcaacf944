//! Remote document API model.
//!
//! Serde types for the subset of the document resource the engine reads:
//! the body's structural elements, paragraphs and tables with their
//! offsets. Unknown fields are ignored.

mod document;

pub use document::{
    document_url, BatchUpdateResponse, Body, Document, Paragraph, ParagraphElement,
    StructuralElement, Table, TableCell, TableRow, TextRun, DOCUMENT_URL_BASE,
};

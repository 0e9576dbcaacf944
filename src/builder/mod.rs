//! Document construction.
//!
//! [`DocumentBuilder`] turns logical elements into offset-addressed
//! operations. It owns the [`Cursor`] and the [`Batch`]; every element is
//! validated and planned before any offset is reserved, so a rejected
//! element leaves both untouched.
//!
//! # Example
//!
//! ```
//! use docbatch::builder::DocumentBuilder;
//! use docbatch::model::{Heading, Paragraph};
//!
//! let mut builder = DocumentBuilder::new();
//! builder.push(&Heading::new(1, "Title").into())?;
//! let body = builder.push(&Paragraph::with_text("Body").into())?;
//! assert_eq!(body.span.start, 6);
//! assert_eq!(builder.current_end(), 11);
//! # Ok::<(), docbatch::Error>(())
//! ```

mod plan;
mod text;

pub use text::{clean_text, strip_nesting_tabs};

use crate::error::{Error, Result};
use crate::layout::{Cursor, LayoutConstants, TableLayout};
use crate::model::{Element, ElementKind};
use crate::ops::{Batch, Span};
use plan::plan_element;
use serde::Serialize;

/// Where an element landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Position of the element in push order
    pub index: usize,
    pub kind: ElementKind,
    /// Offsets the element occupies once its own inserts are applied
    pub span: Span,
    /// Predicted cell layout for tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableLayout>,
}

/// An element that failed validation.
#[derive(Debug)]
pub struct Rejection {
    /// Position of the element in push order
    pub index: usize,
    pub kind: ElementKind,
    pub error: Error,
}

/// Outcome of [`DocumentBuilder::extend`].
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Elements that were placed
    pub placements: Vec<Placement>,
    /// Elements that were rejected
    pub rejections: Vec<Rejection>,
}

impl BuildReport {
    /// Check if every element was placed.
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// Builds one batch for one document, appending elements in order.
#[derive(Debug)]
pub struct DocumentBuilder {
    cursor: Cursor,
    batch: Batch,
    constants: LayoutConstants,
    placements: Vec<Placement>,
    next_index: usize,
    poisoned: bool,
}

impl DocumentBuilder {
    /// Builder for an empty document model starting at offset 0.
    pub fn new() -> Self {
        Self::at(0)
    }

    /// Builder appending at `origin`, usually the document's append point.
    pub fn at(origin: usize) -> Self {
        Self::with_constants(origin, LayoutConstants::default())
    }

    /// Builder with custom layout constants.
    pub fn with_constants(origin: usize, constants: LayoutConstants) -> Self {
        Self {
            cursor: Cursor::new(origin),
            batch: Batch::new(origin, constants),
            constants,
            placements: Vec::new(),
            next_index: 0,
            poisoned: false,
        }
    }

    /// Offset where the next element will start.
    pub fn current_end(&self) -> usize {
        self.cursor.current_end()
    }

    /// The cursor and its reservation history.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Operations accumulated so far.
    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    /// Layout constants in use.
    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    /// Placements of every accepted element.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Index the next pushed element will get.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Check if an offset fault aborted the session.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Append one element.
    ///
    /// Validation errors leave the builder unchanged and usable. Any other
    /// error aborts the session and later calls fail with
    /// [`Error::SessionAborted`].
    pub fn push(&mut self, element: &Element) -> Result<Placement> {
        if self.poisoned {
            return Err(Error::SessionAborted);
        }

        let index = self.next_index;
        self.next_index += 1;
        let kind = element.kind();
        let context = format!("{} {}", kind, index);

        let start = self.cursor.current_end();
        let plan = match plan_element(element, start, &self.constants, &context) {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(e)),
        };

        if let Err(e) = self.commit(start, plan.length, plan.ops) {
            return Err(self.fail(e));
        }

        let placement = Placement {
            index,
            kind,
            span: Span::new(start, start + plan.length),
            table: plan.table,
        };
        log::debug!("placed {} at {}", context, placement.span);
        self.placements.push(placement.clone());
        Ok(placement)
    }

    /// Append many elements, collecting validation failures per element.
    ///
    /// Stops at the first error that aborts the session.
    pub fn extend<'a, I>(&mut self, elements: I) -> Result<BuildReport>
    where
        I: IntoIterator<Item = &'a Element>,
    {
        let mut report = BuildReport::default();
        for element in elements {
            let index = self.next_index;
            match self.push(element) {
                Ok(placement) => report.placements.push(placement),
                Err(error) if error.is_recoverable() => {
                    log::warn!("rejected {} {}: {}", element.kind(), index, error);
                    report.rejections.push(Rejection {
                        index,
                        kind: element.kind(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(report)
    }

    /// Record a rejection for an element that never reached the builder,
    /// such as one whose description failed to convert.
    pub fn reject(&mut self, kind: ElementKind, error: Error) -> Rejection {
        let index = self.next_index;
        self.next_index += 1;
        log::warn!("rejected {} {}: {}", kind, index, error);
        Rejection { index, kind, error }
    }

    /// Finish the session and hand over the batch.
    pub fn finish(self) -> Result<Batch> {
        if self.poisoned {
            return Err(Error::SessionAborted);
        }
        Ok(self.batch)
    }

    fn commit(&mut self, start: usize, length: usize, ops: Vec<crate::ops::Operation>) -> Result<()> {
        if self.batch.extent() != start {
            return Err(Error::OffsetConsistencyFault(format!(
                "cursor at {} but batch extent at {}",
                start,
                self.batch.extent()
            )));
        }
        self.cursor.reserve(length)?;
        for op in ops {
            self.batch.push(op)?;
        }
        if self.batch.extent() != self.cursor.current_end() {
            return Err(Error::OffsetConsistencyFault(format!(
                "batch extent {} disagrees with cursor {}",
                self.batch.extent(),
                self.cursor.current_end()
            )));
        }
        Ok(())
    }

    fn fail(&mut self, error: Error) -> Error {
        if !error.is_recoverable() {
            log::warn!("construction session aborted: {}", error);
            self.poisoned = true;
        }
        error
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

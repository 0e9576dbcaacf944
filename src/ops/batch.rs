//! The append-only operation batch.

use super::{CellRef, Operation, Span};
use crate::error::{Error, Result};
use crate::layout::LayoutConstants;
use serde_json::{json, Value};

/// An ordered, append-only sequence of operations.
///
/// The batch simulates the extent of the content its operations produce
/// and refuses any operation that addresses offsets outside of it.
#[derive(Debug, Clone)]
pub struct Batch {
    origin: usize,
    extent: usize,
    constants: LayoutConstants,
    operations: Vec<Operation>,
    /// `(table_start, rows, columns)` of every inserted table
    tables: Vec<(usize, usize, usize)>,
}

impl Batch {
    /// Create an empty batch whose content starts at `origin`.
    pub fn new(origin: usize, constants: LayoutConstants) -> Self {
        Self {
            origin,
            extent: origin,
            constants,
            operations: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Offset the batch's content starts at.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// One past the last offset produced by the batch so far.
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// Layout constants used to size structural inserts.
    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    /// Operations in submission order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Iterate over operations in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the batch has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Check an operation against the current extent without appending it.
    pub fn check(&self, op: &Operation) -> Result<usize> {
        if let Some(location) = op.insert_location() {
            if location < self.origin || location > self.extent {
                return Err(Error::OffsetConsistencyFault(format!(
                    "{} at {} is outside [{}, {}]",
                    op.name(),
                    location,
                    self.origin,
                    self.extent
                )));
            }
            if let Operation::InsertText { text, .. } = op {
                if text.is_empty() {
                    return Err(Error::OffsetConsistencyFault(format!(
                        "empty insertText at {}",
                        location
                    )));
                }
            }
        }

        if let Some(range) = op.range() {
            self.check_range(op, range)?;
            if op.removed_length() > range.len() {
                return Err(Error::OffsetConsistencyFault(format!(
                    "{} removes {} tabs from a range of {}",
                    op.name(),
                    op.removed_length(),
                    range.len()
                )));
            }
        }

        if let Operation::UpdateTableCellStyle { cell, .. } = op {
            self.check_cell(cell)?;
        }

        let length = op.inserted_length(&self.constants).ok_or_else(|| {
            Error::OffsetConsistencyFault(format!("{} length overflows", op.name()))
        })?;
        self.extent
            .checked_add(length)
            .and_then(|extent| extent.checked_sub(op.removed_length()))
            .ok_or_else(|| {
                Error::OffsetConsistencyFault(format!(
                    "extent {} plus {} overflows",
                    self.extent, length
                ))
            })
    }

    /// Append an operation, moving the extent by its net length.
    pub fn push(&mut self, op: Operation) -> Result<()> {
        let extent = self.check(&op)?;
        if let Operation::InsertTable {
            location,
            rows,
            columns,
        } = &op
        {
            self.tables.push((*location, *rows, *columns));
        }
        self.extent = extent;
        self.operations.push(op);
        Ok(())
    }

    /// Request body for a `batchUpdate` call.
    pub fn to_request_body(&self) -> Value {
        let requests: Vec<Value> = self.operations.iter().map(Operation::to_request).collect();
        json!({ "requests": requests })
    }

    fn check_range(&self, op: &Operation, range: Span) -> Result<()> {
        let bounds = Span::new(self.origin, self.extent);
        if range.is_empty() || !bounds.contains(&range) {
            return Err(Error::OffsetConsistencyFault(format!(
                "{} range {} is outside {}",
                op.name(),
                range,
                bounds
            )));
        }
        Ok(())
    }

    fn check_cell(&self, cell: &CellRef) -> Result<()> {
        let found = self
            .tables
            .iter()
            .any(|&(start, rows, columns)| {
                start == cell.table_start && cell.row < rows && cell.column < columns
            });
        if !found {
            return Err(Error::OffsetConsistencyFault(format!(
                "no cell ({}, {}) in a table inserted at {}",
                cell.row, cell.column, cell.table_start
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

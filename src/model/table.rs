//! Table specs.

use super::{StyleDescriptor, TextRun};
use crate::error::{Error, Result};

/// A table to be inserted: a rectangular grid of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSpec {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Number of header rows (0 = no header)
    pub header_rows: usize,

    /// Default style for header cells
    pub header_style: Option<StyleDescriptor>,

    /// Default style for body cells
    pub body_style: Option<StyleDescriptor>,
}

impl TableSpec {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header and rows of strings.
    ///
    /// The header becomes a single header row; an empty header yields a
    /// body-only table.
    pub fn from_records<H, R, S>(header: H, rows: R) -> Self
    where
        H: IntoIterator<Item = S>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        let header = TableRow::from_texts(header);
        if !header.cells.is_empty() {
            table.rows.push(header);
            table.header_rows = 1;
        }
        for row in rows {
            table.rows.push(TableRow::from_texts(row));
        }
        table
    }

    pub fn with_header_rows(mut self, count: usize) -> Self {
        self.header_rows = count;
        self
    }

    pub fn with_header_style(mut self, style: StyleDescriptor) -> Self {
        self.header_style = Some(style);
        self
    }

    pub fn with_body_style(mut self, style: StyleDescriptor) -> Self {
        self.body_style = Some(style);
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check the grid is non-empty and rectangular, returning `(rows, columns)`.
    pub fn dimensions(&self) -> Result<(usize, usize)> {
        let rows = self.row_count();
        let columns = self.column_count();
        if rows == 0 || columns == 0 {
            return Err(Error::invalid_table(format!(
                "table must have at least one row and one column, got {}x{}",
                rows, columns
            )));
        }
        if let Some((index, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.cells.len() != columns)
        {
            return Err(Error::invalid_table(format!(
                "row {} has {} cells, expected {}",
                index,
                row.cells.len(),
                columns
            )));
        }
        Ok((rows, columns))
    }

    /// Cell at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    /// Header or body default merged with the cell's own style.
    pub fn effective_style(&self, row: usize, column: usize) -> StyleDescriptor {
        let base = if row < self.header_rows {
            self.header_style.clone()
        } else {
            self.body_style.clone()
        }
        .unwrap_or_default();

        match self.cell(row, column).and_then(|c| c.style.as_ref()) {
            Some(style) => base.merged(style),
            None => base,
        }
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Row of plain-text cells.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(TableCell::with_text).collect(),
        }
    }

    /// Add a cell to the row.
    pub fn add_cell(&mut self, cell: TableCell) {
        self.cells.push(cell);
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    /// Text runs; empty for an empty cell
    pub runs: Vec<TextRun>,

    /// Cell-specific style, merged over the header/body default
    pub style: Option<StyleDescriptor>,
}

impl TableCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun::plain(text)]
        };
        Self { runs, style: None }
    }

    pub fn with_style(mut self, style: StyleDescriptor) -> Self {
        self.style = Some(style);
        self
    }

    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

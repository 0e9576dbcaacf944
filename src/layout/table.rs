//! Table layout engine.
//!
//! Cells of a freshly inserted table are pre-allocated in row-major order,
//! each consuming `cell_overhead` offsets. Filling cell `k` shifts every
//! later cell by the inserted length, so the start of a cell is
//!
//! ```text
//! content_start + k * cell_overhead + sum(len of cells before k)
//! ```
//!
//! as long as cells are filled strictly in row-major order.

use super::LayoutConstants;
use crate::error::{Error, Result};
use crate::ops::{utf16_len, CellRef, Operation, Span};
use crate::style::{ParagraphStyle, TableCellStyle, TextStyle};
use serde::{Deserialize, Serialize};

/// Predicted position of one cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLayout {
    pub row: usize,
    pub column: usize,
    /// First offset of the cell content
    pub start: usize,
    /// One past the last offset of the cell content
    pub end: usize,
}

impl CellLayout {
    /// Content range `[start, end)`.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Content length.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the cell has no content.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Predicted layout of a filled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    /// Offset the table was inserted at
    pub origin: usize,
    pub rows: usize,
    pub columns: usize,
    /// Offset of the first cell
    pub content_start: usize,
    /// One past the table's last offset once all cells are filled
    pub end: usize,
    cells: Vec<CellLayout>,
}

impl TableLayout {
    /// Compute the layout from per-cell content lengths in row-major order.
    pub fn compute(
        origin: usize,
        rows: usize,
        columns: usize,
        lengths: &[usize],
        constants: &LayoutConstants,
    ) -> Result<Self> {
        let count = rows
            .checked_mul(columns)
            .ok_or_else(|| Error::invalid_table(format!("{}x{} table is too large", rows, columns)))?;
        if count == 0 {
            return Err(Error::invalid_table(format!(
                "table must have at least one row and one column, got {}x{}",
                rows, columns
            )));
        }
        if lengths.len() != count {
            return Err(Error::invalid_table(format!(
                "expected {} cell lengths, got {}",
                count,
                lengths.len()
            )));
        }

        let overflow = || Error::OffsetConsistencyFault(format!("table at {} overflows", origin));
        let content_start = origin.checked_add(constants.table_lead).ok_or_else(overflow)?;

        let mut cells = Vec::with_capacity(count);
        let mut next = content_start;
        for (index, &length) in lengths.iter().enumerate() {
            let end = next.checked_add(length).ok_or_else(overflow)?;
            cells.push(CellLayout {
                row: index / columns,
                column: index % columns,
                start: next,
                end,
            });
            next = end.checked_add(constants.cell_overhead).ok_or_else(overflow)?;
        }
        let end = next.checked_add(constants.table_trail).ok_or_else(overflow)?;

        Ok(Self {
            origin,
            rows,
            columns,
            content_start,
            end,
            cells,
        })
    }

    /// Layout of the cell at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellLayout> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[CellLayout] {
        &self.cells
    }

    /// Iterate over cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, CellLayout> {
        self.cells.iter()
    }

    /// Reference used by cell style operations.
    pub fn cell_ref(&self, row: usize, column: usize) -> CellRef {
        CellRef {
            table_start: self.origin,
            row,
            column,
        }
    }

    /// Total length of the filled table.
    pub fn length(&self) -> usize {
        self.end - self.origin
    }

    /// Grid of predicted cell starts.
    pub fn start_grid(&self) -> Vec<Vec<usize>> {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().map(|c| c.start).collect())
            .collect()
    }
}

/// Sanitised content and resolved styles for one cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellContent {
    /// Text to insert; empty cells get no insert
    pub text: String,
    /// Style for the whole cell text
    pub text_style: Option<TextStyle>,
    /// Run styles, with spans relative to the cell start
    pub runs: Vec<(Span, TextStyle)>,
    /// Style for the cell's paragraph
    pub paragraph_style: Option<ParagraphStyle>,
    /// Style for the cell itself
    pub cell_style: Option<TableCellStyle>,
}

impl CellContent {
    /// Unstyled cell.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Lay out a table at `origin` and emit its operations.
///
/// Emits the table insert, then every cell's content in row-major order,
/// then every cell's styles. Style operations use the final cell ranges.
pub fn emit_table(
    origin: usize,
    rows: usize,
    columns: usize,
    cells: &[CellContent],
    constants: &LayoutConstants,
) -> Result<(TableLayout, Vec<Operation>)> {
    let lengths: Vec<usize> = cells.iter().map(|c| utf16_len(&c.text)).collect();
    let layout = TableLayout::compute(origin, rows, columns, &lengths, constants)?;

    let mut ops = Vec::with_capacity(1 + cells.len() * 2);
    ops.push(Operation::InsertTable {
        location: origin,
        rows,
        columns,
    });

    for (cell, content) in layout.iter().zip(cells) {
        if !content.text.is_empty() {
            ops.push(Operation::InsertText {
                location: cell.start,
                text: content.text.clone(),
            });
        }
    }

    for (cell, content) in layout.iter().zip(cells) {
        if !cell.is_empty() {
            if let Some(style) = &content.text_style {
                ops.push(Operation::UpdateTextStyle {
                    range: cell.span(),
                    style: style.clone(),
                });
            }
            for (relative, style) in &content.runs {
                if relative.is_empty() {
                    continue;
                }
                ops.push(Operation::UpdateTextStyle {
                    range: Span::new(cell.start + relative.start, cell.start + relative.end),
                    style: style.clone(),
                });
            }
        }
        // The cell paragraph's terminator is part of the cell overhead.
        if constants.cell_overhead > 0 {
            if let Some(style) = &content.paragraph_style {
                ops.push(Operation::UpdateParagraphStyle {
                    range: Span::new(cell.start, cell.end + 1),
                    style: style.clone(),
                });
            }
        }
        if let Some(style) = &content.cell_style {
            ops.push(Operation::UpdateTableCellStyle {
                cell: layout.cell_ref(cell.row, cell.column),
                style: style.clone(),
            });
        }
    }

    Ok((layout, ops))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> LayoutConstants {
        LayoutConstants::default()
    }

    #[test]
    fn test_two_by_two_layout() {
        // content start 10 with the default lead of 1
        let layout = TableLayout::compute(9, 2, 2, &[1, 2, 3, 1], &constants()).unwrap();
        assert_eq!(layout.content_start, 10);
        let starts: Vec<_> = layout.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![10, 13, 17, 22]);
        assert_eq!(layout.end, 25);
        assert_eq!(layout.cell(1, 0).map(|c| c.end), Some(20));
        assert_eq!(layout.start_grid(), vec![vec![10, 13], vec![17, 22]]);
    }

    #[test]
    fn test_empty_table_matches_estimate() {
        let layout = TableLayout::compute(1, 3, 4, &[0; 12], &constants()).unwrap();
        assert_eq!(layout.length(), 3 * 4 * 2 + 1);
    }

    #[test]
    fn test_row_major_law() {
        let c = LayoutConstants::new().with_cell_overhead(3).with_table_lead(2);
        let lengths = [4, 0, 7, 1, 1, 0, 12, 5, 2];
        let layout = TableLayout::compute(100, 3, 3, &lengths, &c).unwrap();
        for cell in layout.iter() {
            let k = cell.row * 3 + cell.column;
            let before: usize = lengths[..k].iter().sum();
            assert_eq!(cell.start, 102 + cell.row * 3 * 3 + cell.column * 3 + before);
        }
    }

    #[test]
    fn test_rejects_zero_cells() {
        assert!(matches!(
            TableLayout::compute(0, 0, 3, &[], &constants()),
            Err(Error::InvalidTableSpec { .. })
        ));
        assert!(TableLayout::compute(0, 2, 2, &[1, 1, 1], &constants()).is_err());
    }

    #[test]
    fn test_out_of_range_cell() {
        let layout = TableLayout::compute(0, 1, 2, &[0, 0], &constants()).unwrap();
        assert!(layout.cell(0, 2).is_none());
        assert!(layout.cell(1, 0).is_none());
    }

    #[test]
    fn test_emit_order() {
        let cells = vec![
            CellContent {
                cell_style: Some(TableCellStyle {
                    content_alignment: Some("TOP".into()),
                    ..Default::default()
                }),
                ..CellContent::text("A")
            },
            CellContent::text(""),
        ];
        let (layout, ops) = emit_table(1, 1, 2, &cells, &constants()).unwrap();

        assert_eq!(ops[0].name(), "insertTable");
        assert_eq!(
            ops[1],
            Operation::InsertText {
                location: 2,
                text: "A".into()
            }
        );
        assert_eq!(ops[2].name(), "updateTableCellStyle");
        assert_eq!(ops.len(), 3);
        assert_eq!(layout.end, 1 + 1 + 1 + 2 * 2);
    }

    #[test]
    fn test_emit_run_ranges_are_absolute() {
        let bold = TextStyle {
            bold: Some(true),
            ..Default::default()
        };
        let cells = vec![
            CellContent::text("xx"),
            CellContent {
                runs: vec![(Span::new(1, 3), bold.clone())],
                ..CellContent::text("abc")
            },
        ];
        let (layout, ops) = emit_table(0, 1, 2, &cells, &constants()).unwrap();
        assert_eq!(layout.cell(0, 1).map(|c| c.start), Some(5));
        assert!(ops.contains(&Operation::UpdateTextStyle {
            range: Span::new(6, 8),
            style: bold,
        }));
    }
}

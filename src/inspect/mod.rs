//! Cell index inspection.
//!
//! Reads the cell offsets of a table in an already rendered document. This
//! is a pure read of the structural tree; comparing the result with a
//! [`TableLayout`] checks the layout engine against reality.

use crate::api::{Document, StructuralElement, Table};
use crate::error::{CellMismatch, Error, Result};
use crate::layout::TableLayout;
use serde::{Deserialize, Serialize};

/// Which table of a document to inspect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableSelector {
    /// The first table
    #[default]
    First,
    /// The last table
    Last,
    /// The table at a zero-based position in document order
    Nth(usize),
    /// The first table starting at or after an offset
    AtOrAfter(usize),
}

/// Observed range of one cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

/// Observed cell offsets of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellIndexMap {
    /// Start offset of the table element
    pub table_start: usize,
    pub rows: usize,
    pub columns: usize,
    /// Cells with indexed content, row-major
    pub cells: Vec<CellPosition>,
    /// `(row, column)` of cells without indexed content
    #[serde(default)]
    pub missing: Vec<(usize, usize)>,
}

impl CellIndexMap {
    /// Observed position of a cell.
    pub fn get(&self, row: usize, column: usize) -> Option<&CellPosition> {
        self.cells.iter().find(|c| c.row == row && c.column == column)
    }

    /// Grid of cell start offsets, `None` for missing cells.
    pub fn to_grid(&self) -> Vec<Vec<Option<usize>>> {
        let mut grid = vec![vec![None; self.columns]; self.rows];
        for cell in &self.cells {
            if let Some(slot) = grid.get_mut(cell.row).and_then(|r| r.get_mut(cell.column)) {
                *slot = Some(cell.start);
            }
        }
        grid
    }
}

/// Find a table and read the offsets of all of its cells.
pub fn inspect_table(document: &Document, selector: TableSelector) -> Result<CellIndexMap> {
    let (element, table) = select(document, selector)?;

    let mut map = CellIndexMap {
        table_start: element.start(),
        rows: table.table_rows.len(),
        columns: table
            .table_rows
            .iter()
            .map(|r| r.table_cells.len())
            .max()
            .unwrap_or(0),
        ..Default::default()
    };

    for (row, table_row) in table.table_rows.iter().enumerate() {
        for (column, cell) in table_row.table_cells.iter().enumerate() {
            match cell.content_start() {
                Some(start) => map.cells.push(CellPosition {
                    row,
                    column,
                    start,
                    end: start + cell.text_length(),
                }),
                None => map.missing.push((row, column)),
            }
        }
    }

    log::debug!(
        "inspected {}x{} table at {}: {} cells, {} missing",
        map.rows,
        map.columns,
        map.table_start,
        map.cells.len(),
        map.missing.len()
    );
    Ok(map)
}

fn select(document: &Document, selector: TableSelector) -> Result<(&StructuralElement, &Table)> {
    let mut tables = document.tables();
    let found = match selector {
        TableSelector::First => tables.next(),
        TableSelector::Last => tables.last(),
        TableSelector::Nth(n) => tables.nth(n),
        TableSelector::AtOrAfter(offset) => tables.find(|(e, _)| e.start() >= offset),
    };
    found.ok_or_else(|| {
        let what = match selector {
            TableSelector::First | TableSelector::Last => "document has no tables".to_string(),
            TableSelector::Nth(n) => format!("no table at position {}", n),
            TableSelector::AtOrAfter(offset) => format!("no table at or after offset {}", offset),
        };
        Error::TableNotFound(what)
    })
}

/// Check observed offsets against a predicted layout.
///
/// Returns [`Error::InspectionMismatch`] listing every predicted cell whose
/// observed range differs or is missing.
pub fn compare(layout: &TableLayout, observed: &CellIndexMap) -> Result<()> {
    let mismatches: Vec<CellMismatch> = layout
        .iter()
        .filter_map(|predicted| {
            let seen = observed
                .get(predicted.row, predicted.column)
                .map(|c| (c.start, c.end));
            let expected = (predicted.start, predicted.end);
            (seen != Some(expected)).then_some(CellMismatch {
                row: predicted.row,
                column: predicted.column,
                expected,
                observed: seen,
            })
        })
        .collect();

    if observed.rows != layout.rows || observed.columns != layout.columns {
        log::warn!(
            "observed table is {}x{}, predicted {}x{}",
            observed.rows,
            observed.columns,
            layout.rows,
            layout.columns
        );
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(Error::InspectionMismatch { mismatches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConstants;
    use serde_json::json;

    fn cell(start: usize, text: &str) -> serde_json::Value {
        let end = start + text.len();
        json!({ "startIndex": start - 1, "endIndex": end, "content": [
            { "startIndex": start, "endIndex": end, "paragraph": { "elements": [
                { "startIndex": start, "endIndex": end, "textRun": { "content": text } }
            ] } }
        ] })
    }

    fn doc() -> Document {
        serde_json::from_value(json!({ "body": { "content": [
            { "startIndex": 1, "endIndex": 3, "paragraph": { "elements": [] } },
            { "startIndex": 9, "endIndex": 25, "table": { "rows": 2, "columns": 2, "tableRows": [
                { "tableCells": [cell(10, "A\n"), cell(13, "BB\n")] },
                { "tableCells": [cell(17, "CCC\n"), { "content": [] }] }
            ] } },
            { "startIndex": 25, "endIndex": 30, "table": { "rows": 1, "columns": 1, "tableRows": [
                { "tableCells": [cell(27, "x\n")] }
            ] } }
        ] } }))
        .unwrap()
    }

    #[test]
    fn test_inspect_first_table() {
        let map = inspect_table(&doc(), TableSelector::First).unwrap();
        assert_eq!(map.table_start, 9);
        assert_eq!((map.rows, map.columns), (2, 2));
        assert_eq!(
            map.get(1, 0),
            Some(&CellPosition {
                row: 1,
                column: 0,
                start: 17,
                end: 20
            })
        );
        assert_eq!(map.missing, vec![(1, 1)]);
        assert_eq!(
            map.to_grid(),
            vec![vec![Some(10), Some(13)], vec![Some(17), None]]
        );
    }

    #[test]
    fn test_selectors() {
        let d = doc();
        assert_eq!(inspect_table(&d, TableSelector::Last).unwrap().table_start, 25);
        assert_eq!(inspect_table(&d, TableSelector::Nth(1)).unwrap().table_start, 25);
        assert_eq!(inspect_table(&d, TableSelector::AtOrAfter(10)).unwrap().table_start, 25);
        assert!(matches!(
            inspect_table(&d, TableSelector::Nth(2)),
            Err(Error::TableNotFound(_))
        ));
        assert!(inspect_table(&Document::default(), TableSelector::First).is_err());
    }

    #[test]
    fn test_compare_reports_every_mismatch() {
        let observed = inspect_table(&doc(), TableSelector::First).unwrap();
        let layout = TableLayout::compute(9, 2, 2, &[1, 2, 3, 1], &LayoutConstants::default()).unwrap();

        match compare(&layout, &observed) {
            Err(Error::InspectionMismatch { mismatches }) => {
                assert_eq!(mismatches.len(), 1);
                assert_eq!((mismatches[0].row, mismatches[0].column), (1, 1));
                assert_eq!(mismatches[0].observed, None);
            }
            other => panic!("unexpected {:?}", other),
        }

        let matching = TableLayout::compute(9, 2, 2, &[1, 2, 3, 0], &LayoutConstants::default());
        // (1, 1) is still missing from the observed table
        assert!(compare(&matching.unwrap(), &observed).is_err());
    }

    #[test]
    fn test_serializes_records() {
        let map = inspect_table(&doc(), TableSelector::Last).unwrap();
        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(
            value["cells"][0],
            json!({ "row": 0, "column": 0, "start": 27, "end": 28 })
        );
    }
}

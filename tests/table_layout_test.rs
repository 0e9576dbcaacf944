//! Integration tests for table layout prediction.

use docbatch::layout::{emit_table, CellContent, LayoutConstants, TableLayout};
use docbatch::model::{StyleDescriptor, TableSpec};
use docbatch::ops::Operation;
use docbatch::{DocumentBuilder, Error};

#[test]
fn test_two_by_two_layout() {
    // content starts at 10 with the default lead of 1
    let constants = LayoutConstants::default();
    let layout = TableLayout::compute(9, 2, 2, &[1, 2, 3, 1], &constants).unwrap();

    assert_eq!(layout.content_start, 10);
    let starts: Vec<usize> = layout.iter().map(|c| c.start).collect();
    assert_eq!(starts, vec![10, 13, 17, 22]);
    assert_eq!(layout.end, 25);
    assert_eq!(layout.start_grid(), vec![vec![10, 13], vec![17, 22]]);
}

#[test]
fn test_row_major_offset_law() {
    let constants = LayoutConstants::default().with_cell_overhead(3).with_table_lead(2);
    let (rows, columns) = (3, 4);
    let lengths: Vec<usize> = (0..rows * columns).map(|k| (k * 7) % 5).collect();
    let origin = 40;
    let layout = TableLayout::compute(origin, rows, columns, &lengths, &constants).unwrap();
    let overhead = constants.cell_overhead;

    for r in 0..rows {
        for c in 0..columns {
            let k = r * columns + c;
            let before: usize = lengths[..k].iter().sum();
            let expected = layout.content_start + r * columns * overhead + c * overhead + before;
            let cell = layout.cell(r, c).unwrap();
            assert_eq!(cell.start, expected, "cell ({}, {})", r, c);
            assert_eq!(cell.len(), lengths[k]);
        }
    }

    let last = layout.cell(rows - 1, columns - 1).unwrap();
    assert_eq!(layout.end, last.end + overhead + constants.table_trail);
    assert_eq!(layout.length(), layout.end - origin);
}

#[test]
fn test_empty_table_matches_estimate() {
    let constants = LayoutConstants::default();
    let layout = TableLayout::compute(1, 3, 5, &[0; 15], &constants).unwrap();
    assert_eq!(Some(layout.length()), constants.empty_table_length(3, 5));
    assert_eq!(layout.length(), 3 * 5 * 2 + 1);
}

#[test]
fn test_emit_table_order() {
    let cells = vec![
        CellContent::text("A"),
        CellContent::text(""),
        CellContent::text("CCC"),
        CellContent::text("D"),
    ];
    let (layout, ops) = emit_table(9, 2, 2, &cells, &LayoutConstants::default()).unwrap();

    assert_eq!(
        ops[0],
        Operation::InsertTable {
            location: 9,
            rows: 2,
            columns: 2
        }
    );
    // empty cells get no insert
    let inserts: Vec<(usize, String)> = ops
        .iter()
        .filter_map(|op| match op {
            Operation::InsertText { location, text } => Some((*location, text.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        inserts,
        vec![
            (10, "A".to_string()),
            (15, "CCC".to_string()),
            (20, "D".to_string())
        ]
    );
    assert_eq!(layout.end, 23);
}

#[test]
fn test_cell_refs_use_table_origin() {
    let table = TableSpec::from_records(["h1", "h2"], [["a", "b"]])
        .with_header_style(StyleDescriptor::new().bold().background(docbatch::Color::YELLOW));
    let mut builder = DocumentBuilder::at(12);
    let placement = builder.push(&table.into()).unwrap();
    let layout = placement.table.unwrap();

    let cell_styles: Vec<&Operation> = builder
        .batch()
        .iter()
        .filter(|op| op.name() == "updateTableCellStyle")
        .collect();
    assert_eq!(cell_styles.len(), 2);
    for op in cell_styles {
        if let Operation::UpdateTableCellStyle { cell, .. } = op {
            assert_eq!(cell.table_start, 12);
            assert_eq!(cell.row, 0);
        }
    }
    assert_eq!(layout.cell_ref(1, 1).table_start, 12);
}

#[test]
fn test_degenerate_tables_are_rejected() {
    let constants = LayoutConstants::default();
    assert!(matches!(
        TableLayout::compute(1, 0, 3, &[], &constants),
        Err(Error::InvalidTableSpec { .. })
    ));
    assert!(matches!(
        TableLayout::compute(1, 2, 2, &[1, 2, 3], &constants),
        Err(Error::InvalidTableSpec { .. })
    ));

    let mut builder = DocumentBuilder::at(1);
    let err = builder.push(&TableSpec::new().into()).unwrap_err();
    assert!(err.to_string().contains("at least one row and one column"));
    assert_eq!(builder.current_end(), 1);
}

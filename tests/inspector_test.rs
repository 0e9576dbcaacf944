//! Integration tests comparing layout predictions with inspected documents.

use std::sync::Arc;

use docbatch::api::Document;
use docbatch::inspect::CellIndexMap;
use docbatch::model::{Heading, Image, ListBlock, Paragraph, StyleDescriptor, TableCell, TableSpec};
use docbatch::{
    compare, inspect_table, BatchAssembler, DocumentBuilder, DocumentService, Element, Error,
    LayoutConstants, MemoryDocumentService, RetryPolicy, TableLayout, TableSelector,
};

fn report_elements() -> Vec<Element> {
    let mut mixed = TableSpec::from_records(
        ["Name", "Note"],
        [["Zo\u{eb}", ""], ["\u{1F600} smile", "multi\u{2028}part"]],
    );
    mixed.rows[1].cells[1] = TableCell::with_text("").with_style(StyleDescriptor::new().italic());

    vec![
        Heading::title("Company Report").into(),
        Paragraph::with_text("Overview of the quarter.").into(),
        TableSpec::from_records(["Region", "Q1", "Q2"], [["North", "10", "12"], ["South", "7", ""]])
            .with_header_style(StyleDescriptor::new().bold())
            .into(),
        ListBlock::bulleted(["alpha", "beta"]).into(),
        Element::PageBreak,
        mixed.into(),
        Image::new("https://example.com/logo.png").into(),
        TableSpec::from_records(Vec::<&str>::new(), [["only"]]).into(),
        Paragraph::with_text("The end.").into(),
    ]
}

/// Build and submit to a fresh simulated document, returning predicted
/// table layouts and the document id.
fn simulate(
    service: &Arc<MemoryDocumentService>,
    constants: LayoutConstants,
) -> (Vec<TableLayout>, String) {
    let id = service.create_document("Inspection");
    let assembler = BatchAssembler::new(service.clone()).with_retry(RetryPolicy::none());
    let (report, receipt) = assembler.append(&id, &report_elements(), constants).unwrap();
    assert!(report.is_clean());
    assert_eq!(receipt.attempts, 1);

    let layouts = report
        .placements
        .into_iter()
        .filter_map(|p| p.table)
        .collect();
    (layouts, id)
}

#[test]
fn test_predictions_match_simulated_document() {
    let service = Arc::new(MemoryDocumentService::new());
    let (layouts, id) = simulate(&service, LayoutConstants::default());
    assert_eq!(layouts.len(), 3);

    let doc = service.get_document(&id).unwrap();
    assert_eq!(doc.tables().count(), 3);
    for (n, layout) in layouts.iter().enumerate() {
        let observed = inspect_table(&doc, TableSelector::Nth(n)).unwrap();
        assert_eq!(observed.rows, layout.rows);
        assert_eq!(observed.columns, layout.columns);
        assert!(observed.missing.is_empty());
        compare(layout, &observed).unwrap();
    }
}

#[test]
fn test_predictions_match_with_custom_constants() {
    let constants = LayoutConstants::default()
        .with_cell_overhead(3)
        .with_table_trail(1);
    let service = Arc::new(MemoryDocumentService::with_constants(constants));
    let (layouts, id) = simulate(&service, constants);

    let doc = service.get_document(&id).unwrap();
    for (n, layout) in layouts.iter().enumerate() {
        let observed = inspect_table(&doc, TableSelector::Nth(n)).unwrap();
        compare(layout, &observed).unwrap();
    }
}

#[test]
fn test_selectors_find_tables_by_offset() {
    let service = Arc::new(MemoryDocumentService::new());
    let (layouts, id) = simulate(&service, LayoutConstants::default());
    let doc = service.get_document(&id).unwrap();

    let second = inspect_table(&doc, TableSelector::AtOrAfter(layouts[0].origin + 1)).unwrap();
    assert_eq!(second.table_start, layouts[1].origin);

    let last = inspect_table(&doc, TableSelector::Last).unwrap();
    assert_eq!(last.table_start, layouts[2].origin);
    assert_eq!(last.to_grid(), vec![vec![Some(layouts[2].content_start)]]);

    assert!(matches!(
        inspect_table(&doc, TableSelector::Nth(3)),
        Err(Error::TableNotFound(_))
    ));
}

#[test]
fn test_shifted_prediction_reports_every_cell() {
    let service = Arc::new(MemoryDocumentService::new());
    let (layouts, id) = simulate(&service, LayoutConstants::default());
    let doc = service.get_document(&id).unwrap();
    let observed = inspect_table(&doc, TableSelector::First).unwrap();

    let predicted = &layouts[0];
    let lengths: Vec<usize> = predicted.iter().map(|c| c.len()).collect();
    let shifted = TableLayout::compute(
        predicted.origin + 1,
        predicted.rows,
        predicted.columns,
        &lengths,
        &LayoutConstants::default(),
    )
    .unwrap();

    match compare(&shifted, &observed) {
        Err(Error::InspectionMismatch { mismatches }) => {
            assert_eq!(mismatches.len(), 9);
            assert_eq!(mismatches[0].expected.0, observed.cells[0].start + 1);
            assert_eq!(mismatches[0].observed, Some((observed.cells[0].start, observed.cells[0].end)));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_cell_map_written_to_file() {
    let service = Arc::new(MemoryDocumentService::new());
    let (_, id) = simulate(&service, LayoutConstants::default());
    let doc = service.get_document(&id).unwrap();
    let map = inspect_table(&doc, TableSelector::Nth(1)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.json");
    std::fs::write(&path, serde_json::to_string_pretty(&map).unwrap()).unwrap();

    let read: CellIndexMap = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(read, map);
    assert_eq!(read.cells.len(), 6);
}

#[test]
fn test_predictions_match_api_response_fixture() {
    let document: Document =
        serde_json::from_str(include_str!("fixtures/table_document.json")).unwrap();

    let mut builder = DocumentBuilder::at(1);
    builder.push(&Paragraph::with_text("Hi").into()).unwrap();
    let placed = builder
        .push(&TableSpec::from_records(Vec::<&str>::new(), [["A", "BB"], ["CCC", ""]]).into())
        .unwrap();
    let layout = placed.table.unwrap();
    let batch = builder.finish().unwrap();

    let observed = inspect_table(&document, TableSelector::First).unwrap();
    assert_eq!(observed.table_start, layout.origin);
    let ranges: Vec<(usize, usize)> = observed.cells.iter().map(|c| (c.start, c.end)).collect();
    assert_eq!(ranges, vec![(5, 6), (8, 10), (12, 15), (17, 17)]);
    compare(&layout, &observed).unwrap();
    assert_eq!(document.append_offset(), batch.extent());
}

//! In-memory document simulator.
//!
//! Applies batches to a flat sequence of pieces sized with the same
//! [`LayoutConstants`] as the builder, and renders the structural tree the
//! remote API would return. Batches are atomic: an operation addressing
//! offsets that do not exist rejects the whole batch.

use super::{not_applied, DocumentService};
use crate::api::{self, BatchUpdateResponse, Document, StructuralElement};
use crate::error::{Error, Result};
use crate::layout::LayoutConstants;
use crate::ops::{utf16_len, Batch, CellRef, Operation, Span};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectKind {
    Image,
    PageBreak,
    SectionBreak,
}

#[derive(Debug, Clone, PartialEq)]
struct SimTable {
    rows: usize,
    columns: usize,
    cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Text(String),
    Table(SimTable),
    Object(ObjectKind),
    /// Zero-length marker opening a bulleted paragraph at a nesting level
    Bullet(usize),
}

#[derive(Debug, Clone)]
struct SimDocument {
    title: String,
    pieces: Vec<Piece>,
    submissions: usize,
}

/// A [`DocumentService`] backed by in-memory documents.
#[derive(Debug, Default)]
pub struct MemoryDocumentService {
    constants: LayoutConstants,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    documents: HashMap<String, SimDocument>,
    next_id: usize,
}

impl MemoryDocumentService {
    /// Create a simulator with default layout constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator with custom layout constants.
    pub fn with_constants(constants: LayoutConstants) -> Self {
        Self {
            constants,
            state: Mutex::default(),
        }
    }

    /// Create an empty document and return its id.
    ///
    /// Like a fresh remote document it holds a section break followed by
    /// one empty paragraph, so its append point is offset 1.
    pub fn create_document(&self, title: impl Into<String>) -> String {
        let mut state = self.lock();
        state.next_id += 1;
        let id = format!("memory-{}", state.next_id);
        state.documents.insert(
            id.clone(),
            SimDocument {
                title: title.into(),
                pieces: vec![Piece::Object(ObjectKind::SectionBreak), Piece::Text("\n".into())],
                submissions: 0,
            },
        );
        id
    }

    /// Number of batches applied to a document.
    pub fn submissions(&self, document_id: &str) -> Option<usize> {
        self.lock().documents.get(document_id).map(|d| d.submissions)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentService for MemoryDocumentService {
    fn get_document(&self, document_id: &str) -> Result<Document> {
        let state = self.lock();
        let document = state
            .documents
            .get(document_id)
            .ok_or_else(|| Error::Http(format!("404 Not Found: no document {}", document_id)))?;
        Ok(render(document_id, document, &self.constants))
    }

    fn batch_update(&self, document_id: &str, batch: &Batch) -> Result<BatchUpdateResponse> {
        let mut state = self.lock();
        let document = state
            .documents
            .get_mut(document_id)
            .ok_or_else(|| not_applied("Requested entity was not found.", Some(404)))?;

        let mut pieces = document.pieces.clone();
        for (index, op) in batch.iter().enumerate() {
            apply(&mut pieces, op, &self.constants).map_err(|reason| {
                not_applied(
                    format!("Invalid requests[{}].{}: {}", index, op.name(), reason),
                    Some(400),
                )
            })?;
        }

        document.pieces = pieces;
        document.submissions += 1;
        log::debug!("applied {} operations to {}", batch.len(), document_id);

        Ok(BatchUpdateResponse {
            document_id: document_id.to_string(),
            replies: batch.iter().map(|_| json!({})).collect(),
        })
    }
}

fn piece_length(piece: &Piece, c: &LayoutConstants) -> usize {
    match piece {
        Piece::Text(text) => utf16_len(text),
        Piece::Table(table) => {
            let content: usize = table.cells.iter().map(|t| utf16_len(t)).sum();
            c.table_lead + table.cells.len() * c.cell_overhead + content + c.table_trail
        }
        Piece::Object(ObjectKind::Image) => c.image_length,
        Piece::Object(ObjectKind::PageBreak) => c.page_break_length,
        Piece::Object(ObjectKind::SectionBreak) => c.section_break_length,
        Piece::Bullet(_) => 0,
    }
}

fn total_length(pieces: &[Piece], c: &LayoutConstants) -> usize {
    pieces.iter().map(|p| piece_length(p, c)).sum()
}

/// Start offset of every cell's content in a table starting at `start`.
fn cell_starts(table: &SimTable, start: usize, c: &LayoutConstants) -> Vec<usize> {
    let mut next = start + c.table_lead;
    table
        .cells
        .iter()
        .map(|text| {
            let cell_start = next;
            next += utf16_len(text) + c.cell_overhead;
            cell_start
        })
        .collect()
}

/// Byte index of a UTF-16 offset within `text`.
fn byte_index(text: &str, offset: usize) -> std::result::Result<usize, String> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == offset {
            return Ok(byte);
        }
        units += ch.len_utf16();
        if units > offset {
            return Err(format!("offset {} splits a surrogate pair", offset));
        }
    }
    if units == offset {
        Ok(text.len())
    } else {
        Err(format!("offset {} is past the text end", offset))
    }
}

/// Find the table cell whose content range contains `offset`.
///
/// Returns `Ok(None)` when the offset is outside every table and an error
/// when it falls on table structure.
fn locate_cell(
    pieces: &[Piece],
    offset: usize,
    c: &LayoutConstants,
) -> std::result::Result<Option<(usize, usize, usize)>, String> {
    let mut start = 0;
    for (index, piece) in pieces.iter().enumerate() {
        let end = start + piece_length(piece, c);
        if let Piece::Table(table) = piece {
            let inside = (start < offset && offset < end) || (offset == start && c.table_lead == 0);
            if inside {
                for (k, cell_start) in cell_starts(table, start, c).into_iter().enumerate() {
                    let len = utf16_len(&table.cells[k]);
                    if cell_start <= offset && offset <= cell_start + len {
                        return Ok(Some((index, k, offset - cell_start)));
                    }
                }
                return Err(format!("index {} falls on table structure", offset));
            }
        }
        start = end;
    }
    Ok(None)
}

/// Index in `pieces` where content inserted at `offset` goes, splitting a
/// text piece when needed.
fn split_at(
    pieces: &mut Vec<Piece>,
    offset: usize,
    c: &LayoutConstants,
) -> std::result::Result<usize, String> {
    let mut start = 0;
    for index in 0..pieces.len() {
        if offset == start {
            return Ok(index);
        }
        let end = start + piece_length(&pieces[index], c);
        if offset < end {
            return match &pieces[index] {
                Piece::Text(text) => {
                    let at = byte_index(text, offset - start)?;
                    let tail = text[at..].to_string();
                    let head = text[..at].to_string();
                    pieces[index] = Piece::Text(head);
                    pieces.insert(index + 1, Piece::Text(tail));
                    Ok(index + 1)
                }
                _ => Err(format!("index {} falls inside a structural element", offset)),
            };
        }
        start = end;
    }
    if offset == start {
        Ok(pieces.len())
    } else {
        Err(format!(
            "index {} must be less than the end index of the referenced segment, {}",
            offset, start
        ))
    }
}

fn insert_text(
    pieces: &mut Vec<Piece>,
    offset: usize,
    text: &str,
    c: &LayoutConstants,
) -> std::result::Result<(), String> {
    if let Some((index, k, relative)) = locate_cell(pieces, offset, c)? {
        if let Piece::Table(table) = &mut pieces[index] {
            let cell = &mut table.cells[k];
            let at = byte_index(cell, relative)?;
            cell.insert_str(at, text);
        }
        return Ok(());
    }

    let index = split_at(pieces, offset, c)?;
    if index > 0 {
        if let Piece::Text(previous) = &mut pieces[index - 1] {
            previous.push_str(text);
            return Ok(());
        }
    }
    pieces.insert(index, Piece::Text(text.to_string()));
    Ok(())
}

fn insert_piece(
    pieces: &mut Vec<Piece>,
    offset: usize,
    piece: Piece,
    c: &LayoutConstants,
) -> std::result::Result<(), String> {
    if locate_cell(pieces, offset, c)?.is_some() {
        return Err("nested structures inside table cells are not supported".into());
    }
    let index = split_at(pieces, offset, c)?;
    pieces.insert(index, piece);
    Ok(())
}

fn check_range(pieces: &[Piece], range: Span, c: &LayoutConstants) -> std::result::Result<(), String> {
    let length = total_length(pieces, c);
    if range.is_empty() || range.end > length {
        return Err(format!(
            "range {} is invalid for a segment of length {}",
            range, length
        ));
    }
    Ok(())
}

fn check_cell(pieces: &[Piece], cell: &CellRef, c: &LayoutConstants) -> std::result::Result<(), String> {
    let mut start = 0;
    for piece in pieces {
        if start == cell.table_start {
            if let Piece::Table(table) = piece {
                if cell.row < table.rows && cell.column < table.columns {
                    return Ok(());
                }
                return Err(format!(
                    "cell ({}, {}) is outside a {}x{} table",
                    cell.row, cell.column, table.rows, table.columns
                ));
            }
        }
        start += piece_length(piece, c);
    }
    Err(format!("no table starts at index {}", cell.table_start))
}

/// Check if content following `piece` begins a new paragraph.
fn ends_paragraph(piece: Option<&Piece>) -> bool {
    match piece {
        None | Some(Piece::Table(_)) | Some(Piece::Bullet(_)) => true,
        Some(Piece::Object(kind)) => *kind == ObjectKind::SectionBreak,
        Some(Piece::Text(text)) => text.ends_with('\n'),
    }
}

/// Bullet every body paragraph starting inside `range`, turning its leading
/// tabs into a nesting level and deleting them.
fn bullet_paragraphs(pieces: Vec<Piece>, range: Span, c: &LayoutConstants) -> Vec<Piece> {
    let mut out: Vec<Piece> = Vec::with_capacity(pieces.len() + 4);
    let mut offset = 0;

    for piece in pieces {
        let length = piece_length(&piece, c);
        let text = match piece {
            Piece::Text(text) => text,
            other => {
                out.push(other);
                offset += length;
                continue;
            }
        };

        let mut pending = String::new();
        let mut paragraph_start = ends_paragraph(out.last());
        let mut position = offset;
        for segment in text.split_inclusive('\n') {
            let segment_length = utf16_len(segment);
            if paragraph_start && range.start <= position && position < range.end {
                if !pending.is_empty() {
                    out.push(Piece::Text(std::mem::take(&mut pending)));
                }
                let body = segment.trim_start_matches('\t');
                if let Some(Piece::Bullet(_)) = out.last() {
                    out.pop();
                }
                out.push(Piece::Bullet(segment.len() - body.len()));
                pending.push_str(body);
            } else {
                pending.push_str(segment);
            }
            paragraph_start = segment.ends_with('\n');
            position += segment_length;
        }
        if !pending.is_empty() {
            out.push(Piece::Text(pending));
        }
        offset += length;
    }
    out
}

fn apply(pieces: &mut Vec<Piece>, op: &Operation, c: &LayoutConstants) -> std::result::Result<(), String> {
    match op {
        Operation::InsertText { location, text } => insert_text(pieces, *location, text, c),
        Operation::InsertTable {
            location,
            rows,
            columns,
        } => {
            if *rows == 0 || *columns == 0 {
                return Err("a table needs at least one row and one column".into());
            }
            let table = SimTable {
                rows: *rows,
                columns: *columns,
                cells: vec![String::new(); rows * columns],
            };
            insert_piece(pieces, *location, Piece::Table(table), c)
        }
        Operation::InsertInlineImage { location, .. } => {
            insert_piece(pieces, *location, Piece::Object(ObjectKind::Image), c)
        }
        Operation::InsertPageBreak { location } => {
            insert_piece(pieces, *location, Piece::Object(ObjectKind::PageBreak), c)
        }
        Operation::InsertSectionBreak { location, .. } => {
            insert_piece(pieces, *location, Piece::Object(ObjectKind::SectionBreak), c)
        }
        Operation::UpdateTextStyle { range, .. }
        | Operation::UpdateParagraphStyle { range, .. } => check_range(pieces, *range, c),
        Operation::CreateParagraphBullets { range, .. } => {
            check_range(pieces, *range, c)?;
            *pieces = bullet_paragraphs(std::mem::take(pieces), *range, c);
            Ok(())
        }
        Operation::UpdateTableCellStyle { cell, .. } => check_cell(pieces, cell, c),
    }
}

/// Paragraph being written: start offset, elements and nesting level.
type OpenParagraph = (usize, Vec<api::ParagraphElement>, Option<usize>);

/// Accumulates paragraph elements until a newline closes the paragraph.
struct ParagraphWriter {
    content: Vec<StructuralElement>,
    open: Option<OpenParagraph>,
    bullet: Option<usize>,
}

impl ParagraphWriter {
    fn new() -> Self {
        Self {
            content: Vec::new(),
            open: None,
            bullet: None,
        }
    }

    /// Bullet the open paragraph, or the next one if none is open.
    fn set_bullet(&mut self, level: usize) {
        match &mut self.open {
            Some((_, _, bullet)) => *bullet = Some(level),
            None => self.bullet = Some(level),
        }
    }

    fn push_element(&mut self, start: usize, element: api::ParagraphElement) {
        let pending = &mut self.bullet;
        self.open
            .get_or_insert_with(|| (start, Vec::new(), pending.take()))
            .1
            .push(element);
    }

    fn push_text(&mut self, mut offset: usize, text: &str) {
        for segment in text.split_inclusive('\n') {
            let end = offset + utf16_len(segment);
            self.push_element(
                offset,
                api::ParagraphElement {
                    start_index: Some(offset),
                    end_index: end,
                    text_run: Some(api::TextRun {
                        content: segment.to_string(),
                        text_style: None,
                    }),
                    ..Default::default()
                },
            );
            if segment.ends_with('\n') {
                self.flush(end);
            }
            offset = end;
        }
    }

    fn flush(&mut self, end: usize) {
        if let Some((start, elements, bullet)) = self.open.take() {
            self.content.push(StructuralElement {
                start_index: Some(start),
                end_index: end,
                paragraph: Some(api::Paragraph {
                    elements,
                    bullet: bullet.map(bullet_json),
                    ..Default::default()
                }),
                ..Default::default()
            });
        }
    }

    fn push_structural(&mut self, offset: usize, element: StructuralElement) {
        self.flush(offset);
        self.content.push(element);
    }

    fn finish(mut self, end: usize) -> Vec<StructuralElement> {
        self.flush(end);
        self.content
    }
}

fn render(document_id: &str, document: &SimDocument, c: &LayoutConstants) -> Document {
    let mut writer = ParagraphWriter::new();
    let mut offset = 0;
    let mut objects = 0;

    for piece in &document.pieces {
        let end = offset + piece_length(piece, c);
        match piece {
            Piece::Text(text) => writer.push_text(offset, text),
            Piece::Object(ObjectKind::SectionBreak) => writer.push_structural(
                offset,
                StructuralElement {
                    start_index: (offset > 0).then_some(offset),
                    end_index: end,
                    section_break: Some(json!({})),
                    ..Default::default()
                },
            ),
            Piece::Object(kind) => {
                let mut element = api::ParagraphElement {
                    start_index: Some(offset),
                    end_index: end,
                    ..Default::default()
                };
                if *kind == ObjectKind::Image {
                    objects += 1;
                    element.inline_object_element =
                        Some(json!({ "inlineObjectId": format!("kix.memory{}", objects) }));
                } else {
                    element.page_break = Some(json!({}));
                }
                writer.push_element(offset, element);
            }
            Piece::Table(table) => {
                writer.push_structural(offset, render_table(table, offset, end, c));
            }
            Piece::Bullet(level) => writer.set_bullet(*level),
        }
        offset = end;
    }

    Document {
        document_id: document_id.to_string(),
        title: document.title.clone(),
        body: api::Body {
            content: writer.finish(offset),
        },
    }
}

/// The API omits the nesting level of top-level items.
fn bullet_json(level: usize) -> serde_json::Value {
    if level == 0 {
        json!({ "listId": "kix.memory.list" })
    } else {
        json!({ "listId": "kix.memory.list", "nestingLevel": level })
    }
}

fn render_table(table: &SimTable, start: usize, end: usize, c: &LayoutConstants) -> StructuralElement {
    let marker = c.cell_overhead.saturating_sub(1);
    let terminator = if c.cell_overhead > 0 { "\n" } else { "" };
    let starts = cell_starts(table, start, c);

    let mut rows = Vec::with_capacity(table.rows);
    for r in 0..table.rows {
        let mut cells = Vec::with_capacity(table.columns);
        for col in 0..table.columns {
            let k = r * table.columns + col;
            let content_start = starts[k];
            let text = format!("{}{}", table.cells[k], terminator);
            let content_end = content_start + utf16_len(&text);

            let mut writer = ParagraphWriter::new();
            writer.push_text(content_start, &text);
            cells.push(api::TableCell {
                start_index: Some(content_start.saturating_sub(marker)),
                end_index: content_end,
                content: writer.finish(content_end),
            });
        }
        rows.push(api::TableRow {
            start_index: cells.first().and_then(|cell| cell.start_index),
            end_index: cells.last().map(|cell| cell.end_index).unwrap_or(start),
            table_cells: cells,
        });
    }

    StructuralElement {
        start_index: Some(start),
        end_index: end,
        table: Some(api::Table {
            rows: table.rows,
            columns: table.columns,
            table_rows: rows,
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubmissionOutcome;
    use crate::ops::BulletPreset;

    fn batch(ops: Vec<Operation>) -> Batch {
        let mut b = Batch::new(1, LayoutConstants::default());
        for op in ops {
            b.push(op).unwrap();
        }
        b
    }

    #[test]
    fn test_new_document_shape() {
        let service = MemoryDocumentService::new();
        let id = service.create_document("Empty");
        let doc = service.get_document(&id).unwrap();
        assert_eq!(doc.title, "Empty");
        assert_eq!(doc.body.content.len(), 2);
        assert!(doc.body.content[0].section_break.is_some());
        assert_eq!(doc.append_offset(), 1);
    }

    #[test]
    fn test_insert_text_splits_paragraphs() {
        let service = MemoryDocumentService::new();
        let id = service.create_document("t");
        service
            .batch_update(
                &id,
                &batch(vec![Operation::InsertText {
                    location: 1,
                    text: "One\nTwo\n".into(),
                }]),
            )
            .unwrap();

        let doc = service.get_document(&id).unwrap();
        assert_eq!(doc.plain_text(), "One\nTwo\n\n");
        assert_eq!(doc.body.content[2].start(), 5);
        assert_eq!(doc.append_offset(), 9);
        assert_eq!(service.submissions(&id), Some(1));
    }

    #[test]
    fn test_table_cells_are_filled_in_place() {
        let service = MemoryDocumentService::new();
        let id = service.create_document("t");
        service
            .batch_update(
                &id,
                &batch(vec![
                    Operation::InsertTable {
                        location: 1,
                        rows: 1,
                        columns: 2,
                    },
                    Operation::InsertText {
                        location: 2,
                        text: "ab".into(),
                    },
                    Operation::InsertText {
                        location: 6,
                        text: "c".into(),
                    },
                ]),
            )
            .unwrap();

        let doc = service.get_document(&id).unwrap();
        let (element, table) = doc.tables().next().unwrap();
        assert_eq!(element.start(), 1);
        assert_eq!(element.end_index, 1 + 1 + 2 * 2 + 3);
        let cells = &table.table_rows[0].table_cells;
        assert_eq!(cells[0].content_start(), Some(2));
        assert_eq!(cells[0].text_length(), 2);
        assert_eq!(cells[1].content_start(), Some(6));
        assert_eq!(cells[1].end_index, 8);
    }

    #[test]
    fn test_invalid_batch_is_not_applied() {
        let service = MemoryDocumentService::new();
        let id = service.create_document("t");
        // offset 4 is the overhead between the two empty cells
        let b = batch(vec![
            Operation::InsertText {
                location: 1,
                text: "x".into(),
            },
            Operation::InsertTable {
                location: 2,
                rows: 1,
                columns: 2,
            },
            Operation::InsertText {
                location: 4,
                text: "y".into(),
            },
        ]);

        match service.batch_update(&id, &b) {
            Err(Error::BatchSubmissionFailure {
                outcome, status, message,
            }) => {
                assert_eq!(outcome, SubmissionOutcome::NotApplied);
                assert_eq!(status, Some(400));
                assert!(message.starts_with("Invalid requests[2].insertText"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(service.submissions(&id), Some(0));
        assert_eq!(service.get_document(&id).unwrap().plain_text(), "\n");
    }

    #[test]
    fn test_text_cannot_land_on_table_structure() {
        let service = MemoryDocumentService::new();
        let id = service.create_document("t");
        let result = service.batch_update(
            &id,
            &batch(vec![
                Operation::InsertTable {
                    location: 1,
                    rows: 1,
                    columns: 2,
                },
                Operation::InsertText {
                    location: 3,
                    text: "x".into(),
                },
            ]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bullets_consume_leading_tabs() {
        let service = MemoryDocumentService::new();
        let id = service.create_document("t");
        service
            .batch_update(
                &id,
                &batch(vec![
                    Operation::InsertText {
                        location: 1,
                        text: "a\n\tb\n".into(),
                    },
                    Operation::CreateParagraphBullets {
                        range: Span::new(1, 6),
                        preset: BulletPreset::Disc,
                        nesting_tabs: 1,
                    },
                ]),
            )
            .unwrap();

        let doc = service.get_document(&id).unwrap();
        assert_eq!(doc.plain_text(), "a\nb\n\n");
        assert_eq!(doc.append_offset(), 5);
        let levels: Vec<Option<usize>> = doc
            .body
            .content
            .iter()
            .filter_map(|e| e.paragraph.as_ref())
            .map(|p| p.nesting_level())
            .collect();
        assert_eq!(levels, vec![Some(0), Some(1), None]);
    }

    #[test]
    fn test_unknown_document() {
        let service = MemoryDocumentService::new();
        assert!(matches!(service.get_document("nope"), Err(Error::Http(_))));
        assert!(service.batch_update("nope", &batch(vec![])).is_err());
    }

    #[test]
    fn test_byte_index_handles_surrogates() {
        assert_eq!(byte_index("a😀b", 3), Ok(5));
        assert!(byte_index("a😀b", 2).is_err());
        assert_eq!(byte_index("ab", 2), Ok(2));
    }
}

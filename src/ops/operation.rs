//! Atomic edit operations.

use crate::layout::LayoutConstants;
use crate::model::{ImageSize, SectionType};
use crate::style::{field_mask, ParagraphStyle, TableCellStyle, TextStyle};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Number of UTF-16 code units in `text`, the unit offsets are counted in.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// A half-open offset range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of offsets covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    fn to_request(self) -> Value {
        json!({ "startIndex": self.start, "endIndex": self.end })
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A table cell addressed by the table's insertion offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// Offset the table was inserted at
    pub table_start: usize,
    pub row: usize,
    pub column: usize,
}

/// Bullet glyph preset for list paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletPreset {
    Disc,
    Decimal,
}

impl BulletPreset {
    pub fn api_name(&self) -> &'static str {
        match self {
            BulletPreset::Disc => "BULLET_DISC_CIRCLE_SQUARE",
            BulletPreset::Decimal => "NUMBERED_DECIMAL_ALPHA_ROMAN",
        }
    }
}

/// One atomic, offset-addressed edit.
///
/// Offsets are interpreted after every preceding operation of the same
/// batch has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    InsertText {
        location: usize,
        text: String,
    },
    InsertTable {
        location: usize,
        rows: usize,
        columns: usize,
    },
    UpdateTextStyle {
        range: Span,
        style: TextStyle,
    },
    UpdateParagraphStyle {
        range: Span,
        style: ParagraphStyle,
    },
    UpdateTableCellStyle {
        cell: CellRef,
        style: TableCellStyle,
    },
    /// Bullets every paragraph in `range`. The API turns each paragraph's
    /// leading tabs into its nesting level and deletes them.
    CreateParagraphBullets {
        range: Span,
        preset: BulletPreset,
        /// Leading tabs the request deletes
        nesting_tabs: usize,
    },
    InsertInlineImage {
        location: usize,
        uri: String,
        size: Option<ImageSize>,
    },
    InsertPageBreak {
        location: usize,
    },
    InsertSectionBreak {
        location: usize,
        section_type: SectionType,
    },
}

impl Operation {
    /// Request name in the remote API.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::InsertText { .. } => "insertText",
            Operation::InsertTable { .. } => "insertTable",
            Operation::UpdateTextStyle { .. } => "updateTextStyle",
            Operation::UpdateParagraphStyle { .. } => "updateParagraphStyle",
            Operation::UpdateTableCellStyle { .. } => "updateTableCellStyle",
            Operation::CreateParagraphBullets { .. } => "createParagraphBullets",
            Operation::InsertInlineImage { .. } => "insertInlineImage",
            Operation::InsertPageBreak { .. } => "insertPageBreak",
            Operation::InsertSectionBreak { .. } => "insertSectionBreak",
        }
    }

    /// Offset an insert targets, `None` for style operations.
    pub fn insert_location(&self) -> Option<usize> {
        match self {
            Operation::InsertText { location, .. }
            | Operation::InsertTable { location, .. }
            | Operation::InsertInlineImage { location, .. }
            | Operation::InsertPageBreak { location }
            | Operation::InsertSectionBreak { location, .. } => Some(*location),
            _ => None,
        }
    }

    /// Range a style operation targets.
    pub fn range(&self) -> Option<Span> {
        match self {
            Operation::UpdateTextStyle { range, .. }
            | Operation::UpdateParagraphStyle { range, .. }
            | Operation::CreateParagraphBullets { range, .. } => Some(*range),
            _ => None,
        }
    }

    /// Check if the operation only restyles existing content.
    pub fn is_style(&self) -> bool {
        self.insert_location().is_none()
    }

    /// How much the operation grows the document, `None` on overflow.
    pub fn inserted_length(&self, constants: &LayoutConstants) -> Option<usize> {
        match self {
            Operation::InsertText { text, .. } => Some(utf16_len(text)),
            Operation::InsertTable { rows, columns, .. } => {
                constants.empty_table_length(*rows, *columns)
            }
            Operation::InsertInlineImage { .. } => Some(constants.image_length),
            Operation::InsertPageBreak { .. } => Some(constants.page_break_length),
            Operation::InsertSectionBreak { .. } => Some(constants.section_break_length),
            _ => Some(0),
        }
    }

    /// How much the operation shrinks the document.
    pub fn removed_length(&self) -> usize {
        match self {
            Operation::CreateParagraphBullets { nesting_tabs, .. } => *nesting_tabs,
            _ => 0,
        }
    }

    /// Serialize to the remote API's request JSON.
    pub fn to_request(&self) -> Value {
        let body = match self {
            Operation::InsertText { location, text } => json!({
                "location": location_json(*location),
                "text": text,
            }),
            Operation::InsertTable {
                location,
                rows,
                columns,
            } => json!({
                "location": location_json(*location),
                "rows": rows,
                "columns": columns,
            }),
            Operation::UpdateTextStyle { range, style } => json!({
                "range": range.to_request(),
                "textStyle": style,
                "fields": field_mask(style),
            }),
            Operation::UpdateParagraphStyle { range, style } => json!({
                "range": range.to_request(),
                "paragraphStyle": style,
                "fields": field_mask(style),
            }),
            Operation::UpdateTableCellStyle { cell, style } => json!({
                "tableRange": {
                    "tableCellLocation": {
                        "tableStartLocation": location_json(cell.table_start),
                        "rowIndex": cell.row,
                        "columnIndex": cell.column,
                    },
                    "rowSpan": 1,
                    "columnSpan": 1,
                },
                "tableCellStyle": style,
                "fields": field_mask(style),
            }),
            Operation::CreateParagraphBullets { range, preset, .. } => json!({
                "range": range.to_request(),
                "bulletPreset": preset.api_name(),
            }),
            Operation::InsertInlineImage {
                location,
                uri,
                size,
            } => {
                let mut body = json!({
                    "location": location_json(*location),
                    "uri": uri,
                });
                if let (Some(size), Value::Object(map)) = (size, &mut body) {
                    map.insert(
                        "objectSize".into(),
                        json!({
                            "width": { "magnitude": size.width, "unit": "PT" },
                            "height": { "magnitude": size.height, "unit": "PT" },
                        }),
                    );
                }
                body
            }
            Operation::InsertPageBreak { location } => json!({
                "location": location_json(*location),
            }),
            Operation::InsertSectionBreak {
                location,
                section_type,
            } => json!({
                "location": location_json(*location),
                "sectionType": section_type.api_name(),
            }),
        };

        let mut request = serde_json::Map::new();
        request.insert(self.name().to_string(), body);
        Value::Object(request)
    }
}

fn location_json(index: usize) -> Value {
    json!({ "index": index })
}

//! Structural tree of a remote document.

use crate::ops::utf16_len;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base URL for opening a document in a browser.
pub const DOCUMENT_URL_BASE: &str = "https://docs.google.com/document/d";

/// Browser URL of a document.
pub fn document_url(document_id: &str) -> String {
    format!("{}/{}/edit", DOCUMENT_URL_BASE, document_id)
}

/// A document as returned by `documents.get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Body,
}

impl Document {
    /// Offset new content is appended at: just before the final newline.
    pub fn append_offset(&self) -> usize {
        self.body
            .content
            .last()
            .map(|e| e.end_index.saturating_sub(1))
            .unwrap_or(0)
    }

    /// Top-level tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = (&StructuralElement, &Table)> {
        self.body
            .content
            .iter()
            .filter_map(|e| e.table.as_ref().map(|t| (e, t)))
    }

    /// Plain text of the body, tables included.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.body.content, &mut out);
        out
    }

    /// Browser URL of the document.
    pub fn url(&self) -> String {
        document_url(&self.document_id)
    }
}

fn collect_text(content: &[StructuralElement], out: &mut String) {
    for element in content {
        if let Some(paragraph) = &element.paragraph {
            out.push_str(&paragraph.text());
        }
        if let Some(table) = &element.table {
            for row in &table.table_rows {
                for cell in &row.table_cells {
                    collect_text(&cell.content, out);
                }
            }
        }
    }
}

/// Document body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// A paragraph, table or section break with its offsets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    /// Absent on the document's leading section break
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default)]
    pub end_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_break: Option<Value>,
}

impl StructuralElement {
    /// Start offset, 0 when the API omits it.
    pub fn start(&self) -> usize {
        self.start_index.unwrap_or(0)
    }
}

/// A paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<Value>,
}

impl Paragraph {
    /// Nesting level of a bulleted paragraph, `None` when not bulleted.
    pub fn nesting_level(&self) -> Option<usize> {
        self.bullet.as_ref().map(|bullet| {
            bullet
                .get("nestingLevel")
                .and_then(Value::as_u64)
                .map_or(0, |level| level as usize)
        })
    }

    /// Text of all text runs, including the trailing newline.
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| e.text_run.as_ref())
            .map(|r| r.content.as_str())
            .collect()
    }
}

/// An element inside a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default)]
    pub end_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_object_element: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_break: Option<Value>,
}

/// A run of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<Value>,
}

/// A table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub rows: usize,
    #[serde(default)]
    pub columns: usize,
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default)]
    pub end_index: usize,
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default)]
    pub end_index: usize,
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

impl TableCell {
    /// Start offset of the first content element, if any is indexed.
    pub fn content_start(&self) -> Option<usize> {
        self.content.first().and_then(|e| e.start_index)
    }

    /// Text length in UTF-16 code units, without the final paragraph newline.
    pub fn text_length(&self) -> usize {
        let mut text = String::new();
        collect_text(&self.content, &mut text);
        let len = utf16_len(&text);
        if text.ends_with('\n') {
            len - 1
        } else {
            len
        }
    }
}

/// Response of `documents.batchUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub replies: Vec<Value>,
}

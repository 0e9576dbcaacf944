//! Layout constants.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Structural lengths the remote document assigns to non-text content.
///
/// All lengths are in UTF-16 code units. The defaults reproduce the
/// long-standing `R*C*2 + 1` estimate for an empty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConstants {
    /// Offset consumed by every cell before its content
    pub cell_overhead: usize,

    /// Offset from a table's insertion point to its first cell
    pub table_lead: usize,

    /// Offset after the last cell of a table
    pub table_trail: usize,

    /// Length of an inline image
    pub image_length: usize,

    /// Length of a page break
    pub page_break_length: usize,

    /// Length of a section break
    pub section_break_length: usize,
}

impl LayoutConstants {
    /// Create constants with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-cell overhead.
    pub fn with_cell_overhead(mut self, overhead: usize) -> Self {
        self.cell_overhead = overhead;
        self
    }

    /// Set the table lead overhead.
    pub fn with_table_lead(mut self, lead: usize) -> Self {
        self.table_lead = lead;
        self
    }

    /// Set the table trail overhead.
    pub fn with_table_trail(mut self, trail: usize) -> Self {
        self.table_trail = trail;
        self
    }

    /// Set the inline image length.
    pub fn with_image_length(mut self, length: usize) -> Self {
        self.image_length = length;
        self
    }

    /// Set the page break length.
    pub fn with_page_break_length(mut self, length: usize) -> Self {
        self.page_break_length = length;
        self
    }

    /// Set the section break length.
    pub fn with_section_break_length(mut self, length: usize) -> Self {
        self.section_break_length = length;
        self
    }

    /// Length of an empty `rows` x `columns` table, `None` on overflow.
    pub fn empty_table_length(&self, rows: usize, columns: usize) -> Option<usize> {
        rows.checked_mul(columns)?
            .checked_mul(self.cell_overhead)?
            .checked_add(self.table_lead)?
            .checked_add(self.table_trail)
    }

    /// Parse constants from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load constants from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        Self::from_json(&json)
    }
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            cell_overhead: 2,
            table_lead: 1,
            table_trail: 0,
            image_length: 1,
            page_break_length: 1,
            section_break_length: 1,
        }
    }
}

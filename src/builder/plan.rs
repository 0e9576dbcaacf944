//! Per-element operation planning.
//!
//! Planning validates an element and produces its operations for a given
//! start offset without touching any builder state.

use super::text::{clean_text, strip_nesting_tabs};
use crate::error::{Error, Result};
use crate::layout::{emit_table, CellContent, LayoutConstants, TableLayout};
use crate::model::{
    Element, Heading, Image, ListBlock, ListKind, Paragraph, StyleDescriptor, TableSpec, TextRun,
    MAX_NESTING_LEVEL,
};
use crate::ops::{utf16_len, BulletPreset, Operation, Span};
use crate::style::{resolve, ParagraphStyle, StyleScope, TextStyle};

/// Operations for one element, addressed from its start offset.
#[derive(Debug, Clone)]
pub(crate) struct Plan {
    pub ops: Vec<Operation>,
    pub length: usize,
    pub table: Option<TableLayout>,
}

pub(crate) fn plan_element(
    element: &Element,
    start: usize,
    constants: &LayoutConstants,
    context: &str,
) -> Result<Plan> {
    let (ops, table) = match element {
        Element::Heading(heading) => (plan_heading(heading, start, context)?, None),
        Element::Paragraph(paragraph) => {
            let unit = TextUnit::prepare(paragraph, &StyleDescriptor::new(), false, context)?;
            (unit.emit(start), None)
        }
        Element::List(list) => (plan_list(list, start, context)?, None),
        Element::Table(table) => {
            let (layout, ops) = plan_table(table, start, constants, context)?;
            (ops, Some(layout))
        }
        Element::Image(image) => (vec![plan_image(image, start)?], None),
        Element::PageBreak => (vec![Operation::InsertPageBreak { location: start }], None),
        Element::SectionBreak(section_type) => (
            vec![Operation::InsertSectionBreak {
                location: start,
                section_type: *section_type,
            }],
            None,
        ),
    };

    let length = ops.iter().try_fold(0usize, |total, op| {
        op.inserted_length(constants)
            .and_then(|len| total.checked_add(len))
            .and_then(|total| total.checked_sub(op.removed_length()))
            .ok_or_else(|| Error::OffsetConsistencyFault(format!("{} length overflows", context)))
    })?;

    Ok(Plan { ops, length, table })
}

/// A paragraph unit with its sanitised text and resolved styles.
struct TextUnit {
    text: String,
    text_style: Option<TextStyle>,
    paragraph_style: Option<ParagraphStyle>,
    runs: Vec<(Span, TextStyle)>,
}

impl TextUnit {
    fn prepare(
        paragraph: &Paragraph,
        base: &StyleDescriptor,
        strip_tabs: bool,
        context: &str,
    ) -> Result<Self> {
        let payload = resolve(&base.merged(&paragraph.style), StyleScope::Paragraph, context)?;
        let (text, runs) = prepare_runs(&paragraph.runs, strip_tabs, context)?;
        Ok(Self {
            text,
            text_style: payload.text,
            paragraph_style: payload.paragraph,
            runs,
        })
    }

    /// Text length without the terminator.
    fn len(&self) -> usize {
        utf16_len(&self.text)
    }

    fn insert(&self, location: usize) -> Operation {
        self.insert_nested(location, 0)
    }

    /// Insert preceded by `level` tabs for the bullets request to consume.
    fn insert_nested(&self, location: usize, level: usize) -> Operation {
        Operation::InsertText {
            location,
            text: format!("{}{}\n", "\t".repeat(level), self.text),
        }
    }

    fn styles(&self, start: usize, ops: &mut Vec<Operation>) {
        let len = self.len();
        if let Some(style) = &self.paragraph_style {
            ops.push(Operation::UpdateParagraphStyle {
                range: Span::new(start, start.saturating_add(len + 1)),
                style: style.clone(),
            });
        }
        if len > 0 {
            if let Some(style) = &self.text_style {
                ops.push(Operation::UpdateTextStyle {
                    range: Span::new(start, start.saturating_add(len)),
                    style: style.clone(),
                });
            }
        }
        for (relative, style) in &self.runs {
            ops.push(Operation::UpdateTextStyle {
                range: Span::new(
                    start.saturating_add(relative.start),
                    start.saturating_add(relative.end),
                ),
                style: style.clone(),
            });
        }
    }

    fn emit(&self, start: usize) -> Vec<Operation> {
        let mut ops = vec![self.insert(start)];
        self.styles(start, &mut ops);
        ops
    }
}

/// Concatenate sanitised runs, returning styled spans relative to the text.
fn prepare_runs(
    runs: &[TextRun],
    strip_tabs: bool,
    context: &str,
) -> Result<(String, Vec<(Span, TextStyle)>)> {
    let mut text = String::new();
    let mut styled = Vec::new();
    let mut offset = 0;
    let mut line_start = true;

    for (index, run) in runs.iter().enumerate() {
        let mut cleaned = clean_text(&run.text);
        if strip_tabs {
            (cleaned, line_start) = strip_nesting_tabs(&cleaned, line_start);
        }
        let len = utf16_len(&cleaned);

        if let Some(style) = &run.style {
            let run_context = format!("{} run {}", context, index);
            let payload = resolve(style, StyleScope::Run, &run_context)?;
            if let (Some(text_style), true) = (payload.text, len > 0) {
                styled.push((Span::new(offset, offset + len), text_style));
            }
        }

        offset += len;
        text.push_str(&cleaned);
    }

    Ok((text, styled))
}

fn plan_heading(heading: &Heading, start: usize, context: &str) -> Result<Vec<Operation>> {
    let named = heading.kind.named_style().ok_or_else(|| {
        Error::invalid_style(
            context,
            format!("heading level must be between 1 and 6, got {:?}", heading.kind),
        )
    })?;
    let base = StyleDescriptor::new().named(named);
    let unit = TextUnit::prepare(&heading.content, &base, false, context)?;
    Ok(unit.emit(start))
}

fn plan_list(list: &ListBlock, start: usize, context: &str) -> Result<Vec<Operation>> {
    if list.items.is_empty() {
        return Err(Error::InvalidElement(format!("{} has no items", context)));
    }

    let mut units = Vec::with_capacity(list.items.len());
    for (i, item) in list.items.iter().enumerate() {
        let item_context = format!("{} item {}", context, i);
        if item.level > MAX_NESTING_LEVEL {
            return Err(Error::InvalidElement(format!(
                "{} nesting level {} exceeds {}",
                item_context, item.level, MAX_NESTING_LEVEL
            )));
        }
        let unit = TextUnit::prepare(&item.content, &StyleDescriptor::new(), true, &item_context)?;
        units.push((unit, item.level));
    }

    // tabs are inserted ahead of each item and deleted again by the bullets
    // request, so item styles address the offsets left after the deletion
    let mut ops = Vec::new();
    let mut starts = Vec::with_capacity(units.len());
    let mut position = start;
    let mut settled = start;
    let mut nesting_tabs = 0;
    for (unit, level) in &units {
        ops.push(unit.insert_nested(position, *level));
        position = position.saturating_add(level + unit.len() + 1);
        starts.push(settled);
        settled = settled.saturating_add(unit.len() + 1);
        nesting_tabs += level;
    }

    let preset = match list.kind {
        ListKind::Bulleted => BulletPreset::Disc,
        ListKind::Numbered => BulletPreset::Decimal,
    };
    ops.push(Operation::CreateParagraphBullets {
        range: Span::new(start, position),
        preset,
        nesting_tabs,
    });

    for ((unit, _), &item_start) in units.iter().zip(&starts) {
        unit.styles(item_start, &mut ops);
    }
    Ok(ops)
}

fn plan_table(
    table: &TableSpec,
    start: usize,
    constants: &LayoutConstants,
    context: &str,
) -> Result<(TableLayout, Vec<Operation>)> {
    let (rows, columns) = table.dimensions()?;

    let mut cells = Vec::with_capacity(rows * columns);
    for (r, row) in table.rows.iter().enumerate() {
        for (c, cell) in row.cells.iter().enumerate() {
            let cell_context = format!("{} cell ({}, {})", context, r, c);
            let payload =
                resolve(&table.effective_style(r, c), StyleScope::TableCell, &cell_context)?;
            let (text, runs) = prepare_runs(&cell.runs, false, &cell_context)?;
            cells.push(CellContent {
                text,
                text_style: payload.text,
                runs,
                paragraph_style: payload.paragraph,
                cell_style: payload.cell,
            });
        }
    }

    emit_table(start, rows, columns, &cells, constants)
}

fn plan_image(image: &Image, start: usize) -> Result<Operation> {
    if image.uri.trim().is_empty() {
        return Err(Error::InvalidElement("image URI is empty".into()));
    }
    if let Some(size) = image.size {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(size.width) || !valid(size.height) {
            return Err(Error::InvalidElement(format!(
                "image size must be positive, got {}x{}",
                size.width, size.height
            )));
        }
    }
    Ok(Operation::InsertInlineImage {
        location: start,
        uri: image.uri.clone(),
        size: image.size,
    })
}

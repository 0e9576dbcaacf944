//! Report descriptions.
//!
//! A report is a JSON document listing elements in order, with styles given
//! as loose maps:
//!
//! ```json
//! {
//!   "title": "Quarterly Report",
//!   "elements": [
//!     { "type": "heading", "level": 1, "text": "Sales" },
//!     { "type": "table", "header": ["Region", "Total"], "rows": [["North", "120"]],
//!       "header_style": { "bold": true, "background_color": "#1A73E8" } }
//!   ]
//! }
//! ```
//!
//! Each element converts on its own, so a malformed style rejects only the
//! element that carries it.

use crate::builder::{BuildReport, DocumentBuilder, Rejection};
use crate::error::{Error, Result};
use crate::layout::LayoutConstants;
use crate::model::{
    Element, ElementKind, Heading, HeadingKind, Image, ListBlock, ListItem, ListKind,
    Paragraph, SectionType, StyleDescriptor, TableSpec, TextRun,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Loose style map as written in report files.
pub type StyleMap = Map<String, Value>;

/// A report: a title and its elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSpec {
    #[serde(default)]
    pub title: String,

    /// Layout constants to build with, when the report pins them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConstants>,

    #[serde(default)]
    pub elements: Vec<ReportElement>,
}

impl ReportSpec {
    /// Parse a report from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a report from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Convert every element, keeping failures per element.
    pub fn to_elements(&self) -> Vec<Result<Element>> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| e.to_element(&format!("{} {}", e.kind(), i)))
            .collect()
    }

    /// Convert and push every element into `builder`.
    ///
    /// Conversion and validation failures are collected in the report;
    /// offset faults abort.
    pub fn build(&self, builder: &mut DocumentBuilder) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        for (description, converted) in self.elements.iter().zip(self.to_elements()) {
            let kind = description.kind();
            let element = match converted {
                Ok(element) => element,
                Err(error) if error.is_recoverable() => {
                    report.rejections.push(builder.reject(kind, error));
                    continue;
                }
                Err(error) => return Err(error),
            };

            let index = builder.next_index();
            match builder.push(&element) {
                Ok(placement) => report.placements.push(placement),
                Err(error) if error.is_recoverable() => {
                    log::warn!("rejected {} {}: {}", kind, index, error);
                    report.rejections.push(Rejection { index, kind, error });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(report)
    }
}

/// A text run in a paragraph description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
}

/// A list item: plain text, or text with a nesting level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItemSpec {
    Text(String),
    Nested {
        text: String,
        #[serde(default)]
        level: usize,
    },
}

impl ListItemSpec {
    fn parts(&self) -> (&str, usize) {
        match self {
            ListItemSpec::Text(text) => (text, 0),
            ListItemSpec::Nested { text, level } => (text, *level),
        }
    }
}

/// Style override for one table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStyleSpec {
    pub row: usize,
    pub column: usize,
    pub style: StyleMap,
}

/// One element of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportElement {
    Title {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    Subtitle {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    Heading {
        #[serde(default = "default_level")]
        level: u8,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    Paragraph {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        runs: Vec<RunSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    List {
        #[serde(default)]
        kind: ListKind,
        items: Vec<ListItemSpec>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<StyleMap>,
    },
    Table {
        #[serde(default)]
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header_style: Option<StyleMap>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body_style: Option<StyleMap>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        cell_styles: Vec<CellStyleSpec>,
    },
    Image {
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f32>,
    },
    PageBreak,
    SectionBreak {
        #[serde(default)]
        section_type: SectionType,
    },
}

fn default_level() -> u8 {
    1
}

fn style(context: &str, map: &Option<StyleMap>) -> Result<StyleDescriptor> {
    match map {
        Some(map) => StyleDescriptor::from_map(context, map),
        None => Ok(StyleDescriptor::new()),
    }
}

fn optional_style(context: &str, map: &Option<StyleMap>) -> Result<Option<StyleDescriptor>> {
    map.as_ref()
        .map(|m| StyleDescriptor::from_map(context, m))
        .transpose()
}

impl ReportElement {
    /// Kind of the element this description converts to.
    pub fn kind(&self) -> ElementKind {
        match self {
            ReportElement::Title { .. }
            | ReportElement::Subtitle { .. }
            | ReportElement::Heading { .. } => ElementKind::Heading,
            ReportElement::Paragraph { .. } => ElementKind::Paragraph,
            ReportElement::List { .. } => ElementKind::List,
            ReportElement::Table { .. } => ElementKind::Table,
            ReportElement::Image { .. } => ElementKind::Image,
            ReportElement::PageBreak => ElementKind::PageBreak,
            ReportElement::SectionBreak { .. } => ElementKind::SectionBreak,
        }
    }

    /// Convert to a logical element. `context` names it in errors.
    pub fn to_element(&self, context: &str) -> Result<Element> {
        let element = match self {
            ReportElement::Title { text, style: s } => Heading {
                kind: HeadingKind::Title,
                content: Paragraph::with_text(text).with_style(style(context, s)?),
            }
            .into(),
            ReportElement::Subtitle { text, style: s } => Heading {
                kind: HeadingKind::Subtitle,
                content: Paragraph::with_text(text).with_style(style(context, s)?),
            }
            .into(),
            ReportElement::Heading {
                level,
                text,
                style: s,
            } => Heading::new(*level, text.clone())
                .with_style(style(context, s)?)
                .into(),
            ReportElement::Paragraph {
                text,
                runs,
                style: s,
            } => {
                let mut paragraph = Paragraph::new().with_style(style(context, s)?);
                if !text.is_empty() {
                    paragraph.add_text(text.clone());
                }
                for (i, run) in runs.iter().enumerate() {
                    let run_context = format!("{} run {}", context, i);
                    paragraph.add_run(TextRun {
                        text: run.text.clone(),
                        style: optional_style(&run_context, &run.style)?,
                    });
                }
                paragraph.into()
            }
            ReportElement::List {
                kind,
                items,
                style: s,
            } => {
                let item_style = style(context, s)?;
                ListBlock {
                    kind: *kind,
                    items: items
                        .iter()
                        .map(|item| {
                            let (text, level) = item.parts();
                            ListItem::new(Paragraph::with_text(text).with_style(item_style.clone()))
                                .at_level(level)
                        })
                        .collect(),
                }
                .into()
            }
            ReportElement::Table {
                header,
                rows,
                header_style,
                body_style,
                cell_styles,
            } => {
                let mut table = TableSpec::from_records(header.iter().cloned(), rows.iter().cloned());
                table.header_style = optional_style(&format!("{} header", context), header_style)?;
                table.body_style = optional_style(&format!("{} body", context), body_style)?;
                for spec in cell_styles {
                    // cell coordinates count the header row
                    let cell_context = format!("{} cell ({}, {})", context, spec.row, spec.column);
                    let descriptor = StyleDescriptor::from_map(&cell_context, &spec.style)?;
                    let cell = table
                        .rows
                        .get_mut(spec.row)
                        .and_then(|r| r.cells.get_mut(spec.column))
                        .ok_or_else(|| {
                            Error::invalid_table(format!("{} does not exist", cell_context))
                        })?;
                    cell.style = Some(descriptor);
                }
                table.into()
            }
            ReportElement::Image { uri, width, height } => {
                let image = Image::new(uri.clone());
                match (width, height) {
                    (Some(w), Some(h)) => image.with_size(*w, *h),
                    (None, None) => image,
                    _ => {
                        return Err(Error::InvalidElement(format!(
                            "{} needs both width and height",
                            context
                        )))
                    }
                }
                .into()
            }
            ReportElement::PageBreak => Element::PageBreak,
            ReportElement::SectionBreak { section_type } => Element::SectionBreak(*section_type),
        };
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r##"{
        "title": "Team Report",
        "elements": [
            { "type": "title", "text": "Team Report" },
            { "type": "heading", "level": 2, "text": "Members", "style": { "foreground_color": "#333333" } },
            { "type": "paragraph", "text": "Intro. ", "runs": [{ "text": "bold", "style": { "bold": true } }] },
            { "type": "list", "kind": "numbered", "items": ["one", { "text": "one.a", "level": 1 }] },
            { "type": "table", "header": ["Name", "Role"], "rows": [["Ana", "Lead"]],
              "header_style": { "bold": true },
              "cell_styles": [{ "row": 1, "column": 1, "style": { "italic": true } }] },
            { "type": "page_break" },
            { "type": "section_break", "section_type": "continuous" }
        ]
    }"##;

    #[test]
    fn test_parse_and_convert() {
        let spec = ReportSpec::from_json(REPORT).unwrap();
        assert_eq!(spec.title, "Team Report");
        assert_eq!(spec.elements.len(), 7);

        let elements: Vec<Element> = spec.to_elements().into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(elements[0].kind(), ElementKind::Heading);
        match &elements[2] {
            Element::Paragraph(p) => {
                assert_eq!(p.runs.len(), 2);
                assert_eq!(p.plain_text(), "Intro. bold");
            }
            other => panic!("unexpected {:?}", other),
        }
        match &elements[4] {
            Element::Table(t) => {
                assert_eq!(t.header_rows, 1);
                assert!(t.cell(1, 1).unwrap().style.is_some());
                assert!(t.header_style.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
        match &elements[3] {
            Element::List(list) => {
                assert_eq!(list.items[0].level, 0);
                assert_eq!(list.items[1].level, 1);
                assert_eq!(list.items[1].content.plain_text(), "one.a");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(elements[6], Element::SectionBreak(SectionType::Continuous));
    }

    #[test]
    fn test_bad_style_rejects_only_its_element() {
        let json = r#"{ "elements": [
            { "type": "paragraph", "text": "kept" },
            { "type": "paragraph", "text": "dropped", "style": { "sparkle": true } },
            { "type": "paragraph", "text": "kept too" }
        ] }"#;
        let spec = ReportSpec::from_json(json).unwrap();
        let mut builder = DocumentBuilder::at(1);
        let report = spec.build(&mut builder).unwrap();

        assert_eq!(report.placements.len(), 2);
        assert_eq!(report.rejections.len(), 1);
        assert_eq!(report.rejections[0].index, 1);
        assert!(matches!(report.rejections[0].error, Error::InvalidStyleSpec { .. }));
        assert_eq!(report.placements[1].index, 2);
        assert_eq!(report.placements[1].span.start, 6);
    }

    #[test]
    fn test_missing_cell_style_target() {
        let element = ReportElement::Table {
            header: Vec::new(),
            rows: vec![vec!["a".to_string()]],
            header_style: None,
            body_style: None,
            cell_styles: vec![CellStyleSpec {
                row: 3,
                column: 0,
                style: Map::new(),
            }],
        };
        let err = element.to_element("table 0").unwrap_err();
        assert!(matches!(err, Error::InvalidTableSpec { .. }));
    }

    #[test]
    fn test_image_needs_both_dimensions() {
        let element = ReportElement::Image {
            uri: "https://example.com/chart.png".to_string(),
            width: Some(100.0),
            height: None,
        };
        assert!(element.to_element("image 0").is_err());
    }
}

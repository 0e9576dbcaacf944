//! Logical document elements.

use super::{NamedStyle, StyleDescriptor, TableSpec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A run of text with an optional style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Text content
    pub text: String,

    /// Style applied to this run only
    pub style: Option<StyleDescriptor>,
}

impl TextRun {
    /// Create an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// Create a styled run.
    pub fn styled(text: impl Into<String>, style: StyleDescriptor) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }
}

/// A paragraph of text runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Text runs in order
    pub runs: Vec<TextRun>,

    /// Paragraph-level style; text axes apply to the whole paragraph text
    pub style: StyleDescriptor,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Set the paragraph-level style.
    pub fn with_style(mut self, style: StyleDescriptor) -> Self {
        self.style = style;
        self
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.runs.push(TextRun::plain(text));
    }

    /// Add a run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Heading level or named title style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingKind {
    Title,
    Subtitle,
    /// Level 1-6; anything else is rejected at build time
    Level(u8),
}

impl HeadingKind {
    /// Named paragraph style for this heading, `None` for a bad level.
    pub fn named_style(&self) -> Option<NamedStyle> {
        match self {
            HeadingKind::Title => Some(NamedStyle::Title),
            HeadingKind::Subtitle => Some(NamedStyle::Subtitle),
            HeadingKind::Level(level) => NamedStyle::heading(*level),
        }
    }
}

/// A heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Level or title style
    pub kind: HeadingKind,

    /// Heading text and style
    pub content: Paragraph,
}

impl Heading {
    /// Heading of the given level.
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            kind: HeadingKind::Level(level),
            content: Paragraph::with_text(text),
        }
    }

    /// Document title.
    pub fn title(text: impl Into<String>) -> Self {
        Self {
            kind: HeadingKind::Title,
            content: Paragraph::with_text(text),
        }
    }

    /// Document subtitle.
    pub fn subtitle(text: impl Into<String>) -> Self {
        Self {
            kind: HeadingKind::Subtitle,
            content: Paragraph::with_text(text),
        }
    }

    /// Set the style.
    pub fn with_style(mut self, style: StyleDescriptor) -> Self {
        self.content.style = style;
        self
    }
}

/// List marker kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Bulleted,
    Numbered,
}

/// Deepest nesting level the remote API supports.
pub const MAX_NESTING_LEVEL: usize = 8;

/// One list entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    /// Zero-based nesting depth
    pub level: usize,

    pub content: Paragraph,
}

impl ListItem {
    pub fn new(content: Paragraph) -> Self {
        Self { level: 0, content }
    }

    /// Item with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(Paragraph::with_text(text))
    }

    /// Set the nesting depth.
    pub fn at_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }
}

impl From<Paragraph> for ListItem {
    fn from(content: Paragraph) -> Self {
        Self::new(content)
    }
}

/// A list of items, possibly nested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListBlock {
    /// Marker kind
    pub kind: ListKind,

    /// One paragraph per item
    pub items: Vec<ListItem>,
}

impl ListBlock {
    /// Empty list of the given kind.
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn bulleted<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ListKind::Bulleted).with_items(items)
    }

    pub fn numbered<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ListKind::Numbered).with_items(items)
    }

    fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(ListItem::with_text).collect();
        self
    }

    /// Append a plain item at `level`.
    pub fn add_item(&mut self, text: impl Into<String>, level: usize) -> &mut Self {
        self.items.push(ListItem::with_text(text).at_level(level));
        self
    }

    /// Append an item.
    pub fn push_item(&mut self, item: impl Into<ListItem>) -> &mut Self {
        self.items.push(item.into());
        self
    }
}

/// Image size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

/// An inline image referenced by URI.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Publicly fetchable image URI
    pub uri: String,

    /// Display size, `None` for the intrinsic size
    pub size: Option<ImageSize>,
}

impl Image {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            size: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(ImageSize { width, height });
        self
    }
}

/// Where the section after a section break starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    #[default]
    NextPage,
    Continuous,
}

impl SectionType {
    pub fn api_name(&self) -> &'static str {
        match self {
            SectionType::NextPage => "NEXT_PAGE",
            SectionType::Continuous => "CONTINUOUS",
        }
    }
}

/// A logical element appended to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Heading(Heading),
    Paragraph(Paragraph),
    List(ListBlock),
    Table(TableSpec),
    Image(Image),
    SectionBreak(SectionType),
    PageBreak,
}

impl Element {
    /// The element's kind tag.
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Heading(_) => ElementKind::Heading,
            Element::Paragraph(_) => ElementKind::Paragraph,
            Element::List(_) => ElementKind::List,
            Element::Table(_) => ElementKind::Table,
            Element::Image(_) => ElementKind::Image,
            Element::SectionBreak(_) => ElementKind::SectionBreak,
            Element::PageBreak => ElementKind::PageBreak,
        }
    }
}

impl From<Heading> for Element {
    fn from(h: Heading) -> Self {
        Element::Heading(h)
    }
}

impl From<Paragraph> for Element {
    fn from(p: Paragraph) -> Self {
        Element::Paragraph(p)
    }
}

impl From<ListBlock> for Element {
    fn from(l: ListBlock) -> Self {
        Element::List(l)
    }
}

impl From<TableSpec> for Element {
    fn from(t: TableSpec) -> Self {
        Element::Table(t)
    }
}

impl From<Image> for Element {
    fn from(i: Image) -> Self {
        Element::Image(i)
    }
}

/// Element kind tag, used in placements and log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Heading,
    Paragraph,
    List,
    Table,
    Image,
    SectionBreak,
    PageBreak,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Heading => "heading",
            ElementKind::Paragraph => "paragraph",
            ElementKind::List => "list",
            ElementKind::Table => "table",
            ElementKind::Image => "image",
            ElementKind::SectionBreak => "section break",
            ElementKind::PageBreak => "page break",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let mut p = Paragraph::with_text("Hello, ");
        p.add_run(TextRun::styled("World", StyleDescriptor::new().bold()));
        assert_eq!(p.plain_text(), "Hello, World");
        assert_eq!(p.runs.len(), 2);
    }

    #[test]
    fn test_heading_named_style() {
        assert_eq!(
            Heading::new(2, "x").kind.named_style(),
            Some(NamedStyle::Heading2)
        );
        assert_eq!(Heading::title("x").kind.named_style(), Some(NamedStyle::Title));
        assert_eq!(HeadingKind::Level(0).named_style(), None);
        assert_eq!(HeadingKind::Level(7).named_style(), None);
    }

    #[test]
    fn test_element_kind() {
        assert_eq!(Element::PageBreak.kind(), ElementKind::PageBreak);
        assert_eq!(
            Element::from(ListBlock::numbered(["a", "b"])).kind(),
            ElementKind::List
        );
        assert_eq!(ElementKind::SectionBreak.to_string(), "section break");
    }

    #[test]
    fn test_nested_list_items() {
        let mut list = ListBlock::new(ListKind::Numbered);
        list.add_item("Revenue", 0).add_item("Domestic", 1);
        list.push_item(Paragraph::with_text("Costs"));

        let levels: Vec<usize> = list.items.iter().map(|item| item.level).collect();
        assert_eq!(levels, vec![0, 1, 0]);
        assert_eq!(list.items[1].content.plain_text(), "Domestic");
    }
}

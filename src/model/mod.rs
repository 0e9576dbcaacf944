//! Logical document model.
//!
//! These types describe what to append to a document, in document order,
//! without any knowledge of offsets. The builder turns them into operations.

mod element;
mod style;
mod table;

pub use element::{
    Element, ElementKind, Heading, HeadingKind, Image, ImageSize, ListBlock, ListItem, ListKind,
    Paragraph, SectionType, TextRun, MAX_NESTING_LEVEL,
};
pub use style::{
    Alignment, BaselineOffset, Border, CellAlignment, Color, DashStyle, NamedStyle, Side,
    StyleAxis, StyleDescriptor, StyleProperty,
};
pub use table::{TableCell, TableRow, TableSpec};

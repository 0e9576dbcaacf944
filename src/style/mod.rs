//! Style resolution.
//!
//! Maps [`StyleDescriptor`](crate::model::StyleDescriptor) values to the
//! style payloads of the remote API. Resolution is pure: it knows nothing
//! about offsets and never touches the cursor or the batch.

mod payload;
mod resolver;

pub use payload::{
    field_mask, CellBorder, ColorValue, Dimension, Link, OptionalColor, ParagraphBorder,
    ParagraphStyle, StylePayload, TableCellStyle, TextStyle, WeightedFontFamily,
};
pub use resolver::{resolve, StyleScope};

//! Style payloads in the remote API's wire shape.
//!
//! Every field is optional and skipped when unset, so the serialized keys
//! of a payload are exactly the fields it sets. [`field_mask`] relies on
//! this to build the `fields` parameter of style requests.

use crate::model::Color;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A length in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub magnitude: f32,
    pub unit: String,
}

impl Dimension {
    pub fn pt(magnitude: f32) -> Self {
        Self {
            magnitude,
            unit: "PT".to_string(),
        }
    }
}

/// `{ "color": { "rgbColor": { .. } } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionalColor {
    pub color: ColorValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorValue {
    pub rgb_color: Color,
}

impl From<Color> for OptionalColor {
    fn from(rgb_color: Color) -> Self {
        Self {
            color: ColorValue { rgb_color },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedFontFamily {
    pub font_family: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Character-level style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_caps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_font_family: Option<WeightedFontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_offset: Option<String>,
}

/// A paragraph border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphBorder {
    pub color: OptionalColor,
    pub width: Dimension,
    pub padding: Dimension,
    pub dash_style: String,
}

/// Paragraph-level style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    /// Percent, 100 = single spacing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_above: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_below: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_start: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_first_line: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<ParagraphBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<ParagraphBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<ParagraphBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<ParagraphBorder>,
}

/// A table cell border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBorder {
    pub color: OptionalColor,
    pub width: Dimension,
    pub dash_style: String,
}

/// Table cell style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<CellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<CellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<CellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<CellBorder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_alignment: Option<String>,
}

/// Resolved payloads for one descriptor; `None` where nothing is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePayload {
    pub text: Option<TextStyle>,
    pub paragraph: Option<ParagraphStyle>,
    pub cell: Option<TableCellStyle>,
}

impl StylePayload {
    /// Check if no payload is set.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.paragraph.is_none() && self.cell.is_none()
    }
}

/// Comma-separated list of the top-level fields a payload sets.
pub fn field_mask<T: Serialize>(payload: &T) -> String {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map.keys().cloned().collect::<Vec<_>>().join(","),
        _ => String::new(),
    }
}

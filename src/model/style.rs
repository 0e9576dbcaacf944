//! Style descriptors.
//!
//! A [`StyleDescriptor`] is an ordered list of [`StyleProperty`] values, one
//! closed variant per style axis. Descriptors carry no offsets; the style
//! resolver turns them into API payloads.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

/// An RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub red: f32,
    /// Green component
    pub green: f32,
    /// Blue component
    pub blue: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GRAY: Color = Color::rgb(0.8, 0.8, 0.8);
    pub const DARK_GRAY: Color = Color::rgb(0.3, 0.3, 0.3);
    /// Default hyperlink blue.
    pub const LINK_BLUE: Color = Color::rgb(0.11, 0.46, 0.98);

    /// Create a color from unit-interval components.
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Create a color from 0-255 components.
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
        )
    }

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        static HEX: OnceLock<Regex> = OnceLock::new();
        let re = HEX.get_or_init(|| {
            Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$")
                .expect("hex color pattern is valid")
        });

        let caps = re
            .captures(hex.trim())
            .ok_or_else(|| Error::invalid_style("color", format!("malformed hex color '{}'", hex)))?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).unwrap_or(0);
        Ok(Self::from_rgb8(channel(1), channel(2), channel(3)))
    }

    /// Check that every component is finite and inside `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        [self.red, self.green, self.blue]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }
}

/// Named paragraph styles understood by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedStyle {
    NormalText,
    Title,
    Subtitle,
    #[serde(rename = "heading_1")]
    Heading1,
    #[serde(rename = "heading_2")]
    Heading2,
    #[serde(rename = "heading_3")]
    Heading3,
    #[serde(rename = "heading_4")]
    Heading4,
    #[serde(rename = "heading_5")]
    Heading5,
    #[serde(rename = "heading_6")]
    Heading6,
}

impl NamedStyle {
    /// Heading style for a level in `1..=6`.
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(NamedStyle::Heading1),
            2 => Some(NamedStyle::Heading2),
            3 => Some(NamedStyle::Heading3),
            4 => Some(NamedStyle::Heading4),
            5 => Some(NamedStyle::Heading5),
            6 => Some(NamedStyle::Heading6),
            _ => None,
        }
    }

    /// Wire name used by the remote API.
    pub fn api_name(&self) -> &'static str {
        match self {
            NamedStyle::NormalText => "NORMAL_TEXT",
            NamedStyle::Title => "TITLE",
            NamedStyle::Subtitle => "SUBTITLE",
            NamedStyle::Heading1 => "HEADING_1",
            NamedStyle::Heading2 => "HEADING_2",
            NamedStyle::Heading3 => "HEADING_3",
            NamedStyle::Heading4 => "HEADING_4",
            NamedStyle::Heading5 => "HEADING_5",
            NamedStyle::Heading6 => "HEADING_6",
        }
    }
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
    Justify,
}

impl Alignment {
    pub fn api_name(&self) -> &'static str {
        match self {
            Alignment::Start => "START",
            Alignment::Center => "CENTER",
            Alignment::End => "END",
            Alignment::Justify => "JUSTIFIED",
        }
    }
}

/// Vertical offset of text from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineOffset {
    None,
    Subscript,
    Superscript,
}

impl BaselineOffset {
    pub fn api_name(&self) -> &'static str {
        match self {
            BaselineOffset::None => "NONE",
            BaselineOffset::Subscript => "SUBSCRIPT",
            BaselineOffset::Superscript => "SUPERSCRIPT",
        }
    }
}

/// Vertical alignment of content inside a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl CellAlignment {
    pub fn api_name(&self) -> &'static str {
        match self {
            CellAlignment::Top => "TOP",
            CellAlignment::Middle => "MIDDLE",
            CellAlignment::Bottom => "BOTTOM",
        }
    }
}

/// Border dash pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashStyle {
    #[default]
    Solid,
    Dot,
    Dash,
}

impl DashStyle {
    pub fn api_name(&self) -> &'static str {
        match self {
            DashStyle::Solid => "SOLID",
            DashStyle::Dot => "DOT",
            DashStyle::Dash => "DASH",
        }
    }
}

/// One side of a paragraph or cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];
}

/// A border line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Line color
    #[serde(default = "default_border_color")]
    pub color: Color,
    /// Line width in points
    #[serde(default = "default_border_width")]
    pub width: f32,
    /// Dash pattern
    #[serde(default)]
    pub dash: DashStyle,
}

fn default_border_color() -> Color {
    Color::BLACK
}

fn default_border_width() -> f32 {
    1.0
}

impl Border {
    /// Solid border of the given color and width.
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: DashStyle::Solid,
        }
    }
}

impl Default for Border {
    fn default() -> Self {
        Self::solid(Color::BLACK, 1.0)
    }
}

/// The closed set of style axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleAxis {
    FontFamily,
    FontSize,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    SmallCaps,
    ForegroundColor,
    BackgroundColor,
    Link,
    BaselineOffset,
    NamedStyle,
    Alignment,
    LineSpacing,
    SpaceAbove,
    SpaceBelow,
    IndentStart,
    IndentFirstLine,
    Border(Side),
    Padding,
    VerticalAlignment,
}

impl StyleAxis {
    /// Key used for this axis in loose style maps.
    pub fn name(&self) -> &'static str {
        match self {
            StyleAxis::FontFamily => "font_family",
            StyleAxis::FontSize => "font_size",
            StyleAxis::Bold => "bold",
            StyleAxis::Italic => "italic",
            StyleAxis::Underline => "underline",
            StyleAxis::Strikethrough => "strikethrough",
            StyleAxis::SmallCaps => "small_caps",
            StyleAxis::ForegroundColor => "foreground_color",
            StyleAxis::BackgroundColor => "background_color",
            StyleAxis::Link => "link",
            StyleAxis::BaselineOffset => "baseline_offset",
            StyleAxis::NamedStyle => "named_style",
            StyleAxis::Alignment => "alignment",
            StyleAxis::LineSpacing => "line_spacing",
            StyleAxis::SpaceAbove => "space_above",
            StyleAxis::SpaceBelow => "space_below",
            StyleAxis::IndentStart => "indent_start",
            StyleAxis::IndentFirstLine => "indent_first_line",
            StyleAxis::Border(Side::Top) => "border_top",
            StyleAxis::Border(Side::Bottom) => "border_bottom",
            StyleAxis::Border(Side::Left) => "border_left",
            StyleAxis::Border(Side::Right) => "border_right",
            StyleAxis::Padding => "padding",
            StyleAxis::VerticalAlignment => "vertical_alignment",
        }
    }

    /// Whether the axis only makes sense on a table cell.
    pub fn is_cell_only(&self) -> bool {
        matches!(self, StyleAxis::Padding | StyleAxis::VerticalAlignment)
    }

    /// Whether the axis styles characters rather than paragraphs or cells.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            StyleAxis::FontFamily
                | StyleAxis::FontSize
                | StyleAxis::Bold
                | StyleAxis::Italic
                | StyleAxis::Underline
                | StyleAxis::Strikethrough
                | StyleAxis::SmallCaps
                | StyleAxis::ForegroundColor
                | StyleAxis::BackgroundColor
                | StyleAxis::Link
                | StyleAxis::BaselineOffset
        )
    }
}

impl fmt::Display for StyleAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single style setting.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleProperty {
    FontFamily(String),
    /// Size in points
    FontSize(f32),
    Bold(bool),
    Italic(bool),
    Underline(bool),
    Strikethrough(bool),
    SmallCaps(bool),
    ForegroundColor(Color),
    /// Text highlight, or cell background when applied to a table cell
    BackgroundColor(Color),
    Link(String),
    BaselineOffset(BaselineOffset),
    NamedStyle(NamedStyle),
    Alignment(Alignment),
    /// Multiplier, 1.0 = single spacing
    LineSpacing(f32),
    /// Points
    SpaceAbove(f32),
    /// Points
    SpaceBelow(f32),
    /// Points
    IndentStart(f32),
    /// Points
    IndentFirstLine(f32),
    Border(Side, Border),
    /// Cell padding on all sides, in points
    Padding(f32),
    VerticalAlignment(CellAlignment),
}

impl StyleProperty {
    /// The axis this property sets.
    pub fn axis(&self) -> StyleAxis {
        match self {
            StyleProperty::FontFamily(_) => StyleAxis::FontFamily,
            StyleProperty::FontSize(_) => StyleAxis::FontSize,
            StyleProperty::Bold(_) => StyleAxis::Bold,
            StyleProperty::Italic(_) => StyleAxis::Italic,
            StyleProperty::Underline(_) => StyleAxis::Underline,
            StyleProperty::Strikethrough(_) => StyleAxis::Strikethrough,
            StyleProperty::SmallCaps(_) => StyleAxis::SmallCaps,
            StyleProperty::ForegroundColor(_) => StyleAxis::ForegroundColor,
            StyleProperty::BackgroundColor(_) => StyleAxis::BackgroundColor,
            StyleProperty::Link(_) => StyleAxis::Link,
            StyleProperty::BaselineOffset(_) => StyleAxis::BaselineOffset,
            StyleProperty::NamedStyle(_) => StyleAxis::NamedStyle,
            StyleProperty::Alignment(_) => StyleAxis::Alignment,
            StyleProperty::LineSpacing(_) => StyleAxis::LineSpacing,
            StyleProperty::SpaceAbove(_) => StyleAxis::SpaceAbove,
            StyleProperty::SpaceBelow(_) => StyleAxis::SpaceBelow,
            StyleProperty::IndentStart(_) => StyleAxis::IndentStart,
            StyleProperty::IndentFirstLine(_) => StyleAxis::IndentFirstLine,
            StyleProperty::Border(side, _) => StyleAxis::Border(*side),
            StyleProperty::Padding(_) => StyleAxis::Padding,
            StyleProperty::VerticalAlignment(_) => StyleAxis::VerticalAlignment,
        }
    }
}

/// An ordered set of style properties.
///
/// Later properties override earlier ones on the same axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDescriptor {
    properties: Vec<StyleProperty>,
}

impl StyleDescriptor {
    /// Create an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property and return self.
    pub fn with(mut self, property: StyleProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Append a property.
    pub fn push(&mut self, property: StyleProperty) {
        self.properties.push(property);
    }

    pub fn bold(self) -> Self {
        self.with(StyleProperty::Bold(true))
    }

    pub fn italic(self) -> Self {
        self.with(StyleProperty::Italic(true))
    }

    pub fn underline(self) -> Self {
        self.with(StyleProperty::Underline(true))
    }

    pub fn font_family(self, family: impl Into<String>) -> Self {
        self.with(StyleProperty::FontFamily(family.into()))
    }

    pub fn font_size(self, points: f32) -> Self {
        self.with(StyleProperty::FontSize(points))
    }

    pub fn color(self, color: Color) -> Self {
        self.with(StyleProperty::ForegroundColor(color))
    }

    pub fn background(self, color: Color) -> Self {
        self.with(StyleProperty::BackgroundColor(color))
    }

    pub fn align(self, alignment: Alignment) -> Self {
        self.with(StyleProperty::Alignment(alignment))
    }

    pub fn named(self, style: NamedStyle) -> Self {
        self.with(StyleProperty::NamedStyle(style))
    }

    /// Set the same border on all four sides.
    pub fn border(mut self, border: Border) -> Self {
        for side in Side::ALL {
            self.properties.push(StyleProperty::Border(side, border));
        }
        self
    }

    /// Hyperlink style: link target, link blue, underlined.
    pub fn link(url: impl Into<String>) -> Self {
        Self::new()
            .with(StyleProperty::Link(url.into()))
            .color(Color::LINK_BLUE)
            .underline()
    }

    /// All properties in insertion order.
    pub fn properties(&self) -> &[StyleProperty] {
        &self.properties
    }

    /// Check if the descriptor sets nothing.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The effective property for an axis (the last one set).
    pub fn get(&self, axis: StyleAxis) -> Option<&StyleProperty> {
        self.properties.iter().rev().find(|p| p.axis() == axis)
    }

    /// Combine two descriptors; `other` wins on shared axes.
    pub fn merged(&self, other: &StyleDescriptor) -> StyleDescriptor {
        let mut properties = self.properties.clone();
        properties.extend(other.properties.iter().cloned());
        StyleDescriptor { properties }
    }

    /// Parse a loose string-keyed map.
    ///
    /// Keys are [`StyleAxis::name`] values plus `border` (all four sides).
    /// `context` names the owning element in error messages.
    pub fn from_map(context: &str, map: &Map<String, Value>) -> Result<Self> {
        let mut descriptor = StyleDescriptor::new();
        for (key, value) in map {
            let bad = |reason: String| Error::invalid_style(context, format!("{}: {}", key, reason));
            let property = match key.as_str() {
                "font_family" => StyleProperty::FontFamily(parse(value).map_err(bad)?),
                "font_size" => StyleProperty::FontSize(parse(value).map_err(bad)?),
                "bold" => StyleProperty::Bold(parse(value).map_err(bad)?),
                "italic" => StyleProperty::Italic(parse(value).map_err(bad)?),
                "underline" => StyleProperty::Underline(parse(value).map_err(bad)?),
                "strikethrough" => StyleProperty::Strikethrough(parse(value).map_err(bad)?),
                "small_caps" => StyleProperty::SmallCaps(parse(value).map_err(bad)?),
                "foreground_color" => StyleProperty::ForegroundColor(parse_color(context, value)?),
                "background_color" => StyleProperty::BackgroundColor(parse_color(context, value)?),
                "link" => StyleProperty::Link(parse(value).map_err(bad)?),
                "baseline_offset" => StyleProperty::BaselineOffset(parse(value).map_err(bad)?),
                "named_style" => StyleProperty::NamedStyle(parse(value).map_err(bad)?),
                "alignment" => StyleProperty::Alignment(parse(value).map_err(bad)?),
                "line_spacing" => StyleProperty::LineSpacing(parse(value).map_err(bad)?),
                "space_above" => StyleProperty::SpaceAbove(parse(value).map_err(bad)?),
                "space_below" => StyleProperty::SpaceBelow(parse(value).map_err(bad)?),
                "indent_start" => StyleProperty::IndentStart(parse(value).map_err(bad)?),
                "indent_first_line" => StyleProperty::IndentFirstLine(parse(value).map_err(bad)?),
                "border_top" => StyleProperty::Border(Side::Top, parse_border(context, value)?),
                "border_bottom" => StyleProperty::Border(Side::Bottom, parse_border(context, value)?),
                "border_left" => StyleProperty::Border(Side::Left, parse_border(context, value)?),
                "border_right" => StyleProperty::Border(Side::Right, parse_border(context, value)?),
                "border" => {
                    descriptor = descriptor.border(parse_border(context, value)?);
                    continue;
                }
                "padding" => StyleProperty::Padding(parse(value).map_err(bad)?),
                "vertical_alignment" => StyleProperty::VerticalAlignment(parse(value).map_err(bad)?),
                other => {
                    return Err(Error::invalid_style(
                        context,
                        format!("unknown style axis '{}'", other),
                    ))
                }
            };
            descriptor.push(property);
        }
        Ok(descriptor)
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: &Value) -> std::result::Result<T, String> {
    serde_json::from_value(value.clone()).map_err(|e| e.to_string())
}

/// Colors are either `"#RRGGBB"` or `{ "red": .., "green": .., "blue": .. }`.
fn parse_color(context: &str, value: &Value) -> Result<Color> {
    match value {
        Value::String(hex) => Color::from_hex(hex).map_err(|_| {
            Error::invalid_style(context, format!("malformed hex color '{}'", hex))
        }),
        other => parse::<Color>(other)
            .map_err(|e| Error::invalid_style(context, format!("malformed color: {}", e))),
    }
}

fn parse_border(context: &str, value: &Value) -> Result<Border> {
    let Value::Object(map) = value else {
        return Err(Error::invalid_style(context, "border must be an object"));
    };
    let mut border = Border::default();
    for (key, field) in map {
        match key.as_str() {
            "color" => border.color = parse_color(context, field)?,
            "width" => {
                border.width = parse(field)
                    .map_err(|e| Error::invalid_style(context, format!("border width: {}", e)))?
            }
            "dash" => {
                border.dash = parse(field)
                    .map_err(|e| Error::invalid_style(context, format!("border dash: {}", e)))?
            }
            other => {
                return Err(Error::invalid_style(
                    context,
                    format!("unknown border field '{}'", other),
                ))
            }
        }
    }
    Ok(border)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF8000").unwrap();
        assert_eq!(c.red, 1.0);
        assert!((c.green - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.blue, 0.0);

        assert!(Color::from_hex("ff8000").is_ok());
        assert!(Color::from_hex("#FF80").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_color_validity() {
        assert!(Color::BLUE.is_valid());
        assert!(!Color::rgb(1.5, 0.0, 0.0).is_valid());
        assert!(!Color::rgb(f32::NAN, 0.0, 0.0).is_valid());
    }

    #[test]
    fn test_last_property_wins() {
        let style = StyleDescriptor::new().font_size(11.0).bold().font_size(14.0);
        assert_eq!(
            style.get(StyleAxis::FontSize),
            Some(&StyleProperty::FontSize(14.0))
        );
    }

    #[test]
    fn test_merged_overrides() {
        let base = StyleDescriptor::new().font_family("Arial").color(Color::BLACK);
        let header = StyleDescriptor::new().color(Color::WHITE).bold();
        let merged = base.merged(&header);

        assert_eq!(
            merged.get(StyleAxis::ForegroundColor),
            Some(&StyleProperty::ForegroundColor(Color::WHITE))
        );
        assert_eq!(
            merged.get(StyleAxis::FontFamily),
            Some(&StyleProperty::FontFamily("Arial".into()))
        );
    }

    #[test]
    fn test_from_map() {
        let style = StyleDescriptor::from_map(
            "heading",
            &map(json!({
                "bold": true,
                "font_size": 18,
                "foreground_color": "#333333",
                "alignment": "center",
                "named_style": "heading_2",
                "border": { "width": 2, "dash": "dot" }
            })),
        )
        .unwrap();

        assert_eq!(style.get(StyleAxis::Bold), Some(&StyleProperty::Bold(true)));
        assert_eq!(
            style.get(StyleAxis::NamedStyle),
            Some(&StyleProperty::NamedStyle(NamedStyle::Heading2))
        );
        assert_eq!(
            style.get(StyleAxis::Alignment),
            Some(&StyleProperty::Alignment(Alignment::Center))
        );
        match style.get(StyleAxis::Border(Side::Left)) {
            Some(StyleProperty::Border(_, border)) => {
                assert_eq!(border.width, 2.0);
                assert_eq!(border.dash, DashStyle::Dot);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_from_map_unknown_axis() {
        let err = StyleDescriptor::from_map("paragraph 3", &map(json!({ "colour": "#000000" })))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStyleSpec { .. }));
        assert!(err.to_string().contains("colour"));
        assert!(err.to_string().contains("paragraph 3"));
    }

    #[test]
    fn test_from_map_malformed_values() {
        assert!(StyleDescriptor::from_map("p", &map(json!({ "bold": "yes" }))).is_err());
        assert!(
            StyleDescriptor::from_map("p", &map(json!({ "foreground_color": "#12" }))).is_err()
        );
        assert!(StyleDescriptor::from_map("p", &map(json!({ "alignment": "middle" }))).is_err());
        assert!(StyleDescriptor::from_map("p", &map(json!({ "border": 3 }))).is_err());
    }

    #[test]
    fn test_axis_names_round_trip_through_from_map() {
        let style =
            StyleDescriptor::from_map("p", &map(json!({ "border_right": {}, "padding": 4 })))
                .unwrap();
        let names: Vec<_> = style.properties().iter().map(|p| p.axis().name()).collect();
        assert!(names.contains(&"border_right"));
        assert!(names.contains(&"padding"));
    }

    #[test]
    fn test_border_sides_are_distinct_axes() {
        let style = Side::ALL
            .iter()
            .fold(StyleDescriptor::new().bold(), |style, side| {
                style.with(StyleProperty::Border(*side, Border::default()))
            });
        let axes: std::collections::HashSet<StyleAxis> =
            style.properties().iter().map(StyleProperty::axis).collect();
        assert_eq!(axes.len(), 5);
        assert!(axes.contains(&StyleAxis::Border(Side::Bottom)));
    }
}

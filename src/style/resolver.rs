//! Descriptor to payload resolution.

use super::payload::*;
use crate::error::{Error, Result};
use crate::model::{Border, Color, Side, StyleDescriptor, StyleProperty};

/// Where a resolved style will be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleScope {
    /// A text run inside a paragraph; character axes only.
    Run,
    /// A whole paragraph, heading or list item.
    Paragraph,
    /// A table cell and the paragraph inside it.
    TableCell,
}

/// Resolve a descriptor into API payloads.
///
/// Properties are applied in order so the last one on an axis wins.
/// `context` names the element in error messages.
pub fn resolve(descriptor: &StyleDescriptor, scope: StyleScope, context: &str) -> Result<StylePayload> {
    let mut text = TextStyle::default();
    let mut paragraph = ParagraphStyle::default();
    let mut cell = TableCellStyle::default();

    for property in descriptor.properties() {
        let axis = property.axis();
        if scope == StyleScope::Run && !axis.is_text() {
            return Err(Error::invalid_style(
                context,
                format!("'{}' cannot be applied to a text run", axis),
            ));
        }
        if scope != StyleScope::TableCell && axis.is_cell_only() {
            return Err(Error::invalid_style(
                context,
                format!("'{}' only applies to table cells", axis),
            ));
        }

        match property {
            StyleProperty::FontFamily(family) => {
                if family.trim().is_empty() {
                    return Err(Error::invalid_style(context, "font family is empty"));
                }
                text.weighted_font_family = Some(WeightedFontFamily {
                    font_family: family.clone(),
                });
            }
            StyleProperty::FontSize(size) => {
                text.font_size = Some(positive(context, "font size", *size)?);
            }
            StyleProperty::Bold(v) => text.bold = Some(*v),
            StyleProperty::Italic(v) => text.italic = Some(*v),
            StyleProperty::Underline(v) => text.underline = Some(*v),
            StyleProperty::Strikethrough(v) => text.strikethrough = Some(*v),
            StyleProperty::SmallCaps(v) => text.small_caps = Some(*v),
            StyleProperty::ForegroundColor(c) => {
                text.foreground_color = Some(color(context, "foreground color", *c)?);
            }
            StyleProperty::BackgroundColor(c) => {
                let value = color(context, "background color", *c)?;
                if scope == StyleScope::TableCell {
                    cell.background_color = Some(value);
                } else {
                    text.background_color = Some(value);
                }
            }
            StyleProperty::Link(url) => {
                if url.trim().is_empty() {
                    return Err(Error::invalid_style(context, "link is empty"));
                }
                text.link = Some(Link { url: url.clone() });
            }
            StyleProperty::BaselineOffset(offset) => {
                text.baseline_offset = Some(offset.api_name().to_string());
            }
            StyleProperty::NamedStyle(named) => {
                paragraph.named_style_type = Some(named.api_name().to_string());
            }
            StyleProperty::Alignment(alignment) => {
                paragraph.alignment = Some(alignment.api_name().to_string());
            }
            StyleProperty::LineSpacing(multiplier) => {
                let spacing = positive(context, "line spacing", *multiplier)?;
                paragraph.line_spacing = Some(spacing.magnitude * 100.0);
            }
            StyleProperty::SpaceAbove(v) => {
                paragraph.space_above = Some(non_negative(context, "space above", *v)?);
            }
            StyleProperty::SpaceBelow(v) => {
                paragraph.space_below = Some(non_negative(context, "space below", *v)?);
            }
            StyleProperty::IndentStart(v) => {
                paragraph.indent_start = Some(non_negative(context, "start indent", *v)?);
            }
            StyleProperty::IndentFirstLine(v) => {
                paragraph.indent_first_line =
                    Some(non_negative(context, "first line indent", *v)?);
            }
            StyleProperty::Border(side, border) => {
                let width = positive(context, "border width", border.width)?;
                let border_color = color(context, "border color", border.color)?;
                if scope == StyleScope::TableCell {
                    let value = CellBorder {
                        color: border_color,
                        width,
                        dash_style: border.dash.api_name().to_string(),
                    };
                    set_cell_border(&mut cell, *side, value);
                } else {
                    let value = paragraph_border(border, border_color, width);
                    set_paragraph_border(&mut paragraph, *side, value);
                }
            }
            StyleProperty::Padding(v) => {
                let padding = non_negative(context, "padding", *v)?;
                cell.padding_top = Some(padding.clone());
                cell.padding_bottom = Some(padding.clone());
                cell.padding_left = Some(padding.clone());
                cell.padding_right = Some(padding);
            }
            StyleProperty::VerticalAlignment(alignment) => {
                cell.content_alignment = Some(alignment.api_name().to_string());
            }
        }
    }

    Ok(StylePayload {
        text: (text != TextStyle::default()).then_some(text),
        paragraph: (paragraph != ParagraphStyle::default()).then_some(paragraph),
        cell: (cell != TableCellStyle::default()).then_some(cell),
    })
}

fn color(context: &str, what: &str, value: Color) -> Result<OptionalColor> {
    if !value.is_valid() {
        return Err(Error::invalid_style(
            context,
            format!(
                "{} components must be in [0, 1], got ({}, {}, {})",
                what, value.red, value.green, value.blue
            ),
        ));
    }
    Ok(value.into())
}

fn positive(context: &str, what: &str, value: f32) -> Result<Dimension> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid_style(
            context,
            format!("{} must be positive, got {}", what, value),
        ));
    }
    Ok(Dimension::pt(value))
}

fn non_negative(context: &str, what: &str, value: f32) -> Result<Dimension> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_style(
            context,
            format!("{} must not be negative, got {}", what, value),
        ));
    }
    Ok(Dimension::pt(value))
}

fn paragraph_border(border: &Border, color: OptionalColor, width: Dimension) -> ParagraphBorder {
    ParagraphBorder {
        color,
        width,
        padding: Dimension::pt(0.0),
        dash_style: border.dash.api_name().to_string(),
    }
}

fn set_paragraph_border(style: &mut ParagraphStyle, side: Side, border: ParagraphBorder) {
    match side {
        Side::Top => style.border_top = Some(border),
        Side::Bottom => style.border_bottom = Some(border),
        Side::Left => style.border_left = Some(border),
        Side::Right => style.border_right = Some(border),
    }
}

fn set_cell_border(style: &mut TableCellStyle, side: Side, border: CellBorder) {
    match side {
        Side::Top => style.border_top = Some(border),
        Side::Bottom => style.border_bottom = Some(border),
        Side::Left => style.border_left = Some(border),
        Side::Right => style.border_right = Some(border),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, CellAlignment, NamedStyle};

    #[test]
    fn test_empty_descriptor_resolves_to_nothing() {
        let payload = resolve(&StyleDescriptor::new(), StyleScope::Paragraph, "p").unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_paragraph_scope_splits_text_and_paragraph_axes() {
        let style = StyleDescriptor::new()
            .bold()
            .font_size(12.0)
            .named(NamedStyle::Heading1)
            .align(Alignment::Center);
        let payload = resolve(&style, StyleScope::Paragraph, "heading").unwrap();

        let text = payload.text.unwrap();
        assert_eq!(text.bold, Some(true));
        assert_eq!(text.font_size, Some(Dimension::pt(12.0)));
        assert_eq!(field_mask(&text), "bold,fontSize");

        let paragraph = payload.paragraph.unwrap();
        assert_eq!(paragraph.named_style_type.as_deref(), Some("HEADING_1"));
        assert_eq!(paragraph.alignment.as_deref(), Some("CENTER"));
        assert!(payload.cell.is_none());
    }

    #[test]
    fn test_background_depends_on_scope() {
        let style = StyleDescriptor::new().background(Color::BLUE);

        let paragraph = resolve(&style, StyleScope::Paragraph, "p").unwrap();
        assert!(paragraph.text.unwrap().background_color.is_some());
        assert!(paragraph.cell.is_none());

        let cell = resolve(&style, StyleScope::TableCell, "cell (0, 0)").unwrap();
        assert!(cell.text.is_none());
        assert_eq!(
            cell.cell.unwrap().background_color,
            Some(OptionalColor::from(Color::BLUE))
        );
    }

    #[test]
    fn test_border_depends_on_scope() {
        let style = StyleDescriptor::new().border(Border::solid(Color::BLACK, 1.0));

        let paragraph = resolve(&style, StyleScope::Paragraph, "p").unwrap().paragraph.unwrap();
        assert_eq!(
            field_mask(&paragraph),
            "borderBottom,borderLeft,borderRight,borderTop"
        );

        let cell = resolve(&style, StyleScope::TableCell, "c").unwrap().cell.unwrap();
        assert_eq!(cell.border_top.map(|b| b.dash_style), Some("SOLID".into()));
    }

    #[test]
    fn test_cell_only_axes_rejected_outside_cells() {
        let style = StyleDescriptor::new().with(StyleProperty::VerticalAlignment(CellAlignment::Middle));
        let err = resolve(&style, StyleScope::Paragraph, "paragraph 4").unwrap_err();
        assert!(err.to_string().contains("vertical_alignment"));
        assert!(resolve(&style, StyleScope::TableCell, "c").is_ok());

        let padded = StyleDescriptor::new().with(StyleProperty::Padding(3.0));
        assert!(resolve(&padded, StyleScope::Paragraph, "p").is_err());
    }

    #[test]
    fn test_run_scope_only_takes_text_axes() {
        let ok = StyleDescriptor::new().italic().color(Color::RED);
        assert!(resolve(&ok, StyleScope::Run, "run").is_ok());

        let bad = StyleDescriptor::new().align(Alignment::End);
        assert!(matches!(
            resolve(&bad, StyleScope::Run, "run"),
            Err(Error::InvalidStyleSpec { .. })
        ));
    }

    #[test]
    fn test_value_validation() {
        let cases = [
            StyleDescriptor::new().color(Color::rgb(1.2, 0.0, 0.0)),
            StyleDescriptor::new().font_size(0.0),
            StyleDescriptor::new().font_family("  "),
            StyleDescriptor::new().with(StyleProperty::SpaceAbove(-1.0)),
            StyleDescriptor::new().with(StyleProperty::Link(String::new())),
            StyleDescriptor::new().border(Border::solid(Color::BLACK, 0.0)),
        ];
        for style in cases {
            assert!(
                resolve(&style, StyleScope::Paragraph, "p").is_err(),
                "accepted {:?}",
                style
            );
        }
    }

    #[test]
    fn test_line_spacing_is_percent() {
        let style = StyleDescriptor::new().with(StyleProperty::LineSpacing(1.5));
        let payload = resolve(&style, StyleScope::Paragraph, "p").unwrap();
        assert_eq!(payload.paragraph.unwrap().line_spacing, Some(150.0));
    }

    #[test]
    fn test_last_property_wins_in_payload() {
        let style = StyleDescriptor::new().color(Color::RED).color(Color::GREEN);
        let text = resolve(&style, StyleScope::Run, "run").unwrap().text.unwrap();
        assert_eq!(text.foreground_color, Some(OptionalColor::from(Color::GREEN)));
    }
}

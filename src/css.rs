//! Conversion of Figma paints, effects and text settings into CSS values.

use palette::Srgba;

use crate::extract::predicates::{is_valid_effect, is_valid_gradient};
use crate::geometry::{linear_gradient_params, radial_gradient_params, GeometryError};
use crate::types::{Color, Effect, EffectKind, Paint, PaintKind, TextCase, TextDecoration};

/// CSS rendition of a stack of fills.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssPaint {
    /// Comma-separated layers, topmost first
    pub value: String,
    /// `background-blend-mode` list matching `value`
    pub blend: String,
}

fn to_u8(color: &Color) -> Srgba<u8> {
    Srgba::new(color.r, color.g, color.b, color.a).into_format::<u8, u8>()
}

/// `#rrggbb`, with an alpha byte appended when alpha is not 1 and does not
/// round to `ff`.
pub fn figma_color_to_hex(color: &Color) -> String {
    let rgba = to_u8(color);
    let mut hex = format!("#{:02x}{:02x}{:02x}", rgba.red, rgba.green, rgba.blue);
    if color.a != 1.0 {
        let alpha = format!("{:x}", rgba.alpha);
        if alpha.len() == 1 {
            hex.push('0');
            hex.push_str(&alpha);
        } else if alpha != "ff" {
            hex.push_str(&alpha);
        }
    }
    hex
}

/// `rgba(r, g, b, a)` with 0-255 channels.
pub fn figma_color_to_rgba(color: &Color) -> String {
    let rgba = to_u8(color);
    format!(
        "rgba({}, {}, {}, {})",
        rgba.red,
        rgba.green,
        rgba.blue,
        format_number(round2(color.a))
    )
}

/// Hex for opaque colors, `rgba()` otherwise.
pub fn figma_color_to_css(color: &Color) -> String {
    if color.a == 1.0 {
        figma_color_to_hex(color)
    } else {
        figma_color_to_rgba(color)
    }
}

/// `color` with its alpha scaled by the paint opacity.
fn paint_color(color: &Color, opacity: f64) -> Color {
    Color {
        a: color.a * opacity,
        ..*color
    }
}

/// CSS for a single paint. `as_gradient` renders solids as a flat
/// `linear-gradient()` so they can be stacked. Unsupported kinds yield `None`.
pub fn paint_to_css(paint: &Paint, as_gradient: bool) -> Result<Option<String>, GeometryError> {
    match paint.kind {
        PaintKind::Solid => {
            let Some(color) = paint.color else {
                return Ok(None);
            };
            let css = figma_color_to_css(&paint_color(&color, paint.opacity));
            Ok(Some(if as_gradient {
                format!("linear-gradient(0deg, {css}, {css})")
            } else {
                css
            }))
        }
        PaintKind::GradientLinear => {
            let params = linear_gradient_params(paint)?;
            let stops: Vec<String> = paint
                .gradient_stops
                .iter()
                .zip(params.iter().skip(1))
                .map(|(stop, position)| {
                    format!(
                        "{} {}%",
                        figma_color_to_css(&paint_color(&stop.color, paint.opacity)),
                        format_number(*position)
                    )
                })
                .collect();
            Ok(Some(format!(
                "linear-gradient({}deg, {})",
                format_number(params[0]),
                stops.join(", ")
            )))
        }
        PaintKind::GradientRadial => {
            let [rx, ry, cx, cy] = radial_gradient_params(paint)?;
            let stops: Vec<String> = paint
                .gradient_stops
                .iter()
                .map(|stop| {
                    format!(
                        "{} {}%",
                        figma_color_to_css(&paint_color(&stop.color, paint.opacity)),
                        format_number(round2(stop.position * 100.0))
                    )
                })
                .collect();
            Ok(Some(format!(
                "radial-gradient({}% {}% at {}% {}%, {})",
                format_number(rx),
                format_number(ry),
                format_number(cx),
                format_number(cy),
                stops.join(", ")
            )))
        }
        _ => Ok(None),
    }
}

/// Renders a Figma fill stack (bottom first) as CSS layers (top first).
/// Every layer but the last is a gradient so the list is a valid `background`.
pub fn fills_to_css(fills: &[Paint]) -> Result<CssPaint, GeometryError> {
    let layers: Vec<&Paint> = fills
        .iter()
        .filter(|paint| {
            paint.visible && (paint.kind == PaintKind::Solid || is_valid_gradient(paint))
        })
        .rev()
        .collect();

    let mut values = Vec::with_capacity(layers.len());
    let mut blends = Vec::with_capacity(layers.len());
    for (index, paint) in layers.iter().enumerate() {
        let as_gradient = index + 1 < layers.len();
        if let Some(value) = paint_to_css(paint, as_gradient)? {
            values.push(value);
            blends.push(paint.blend_mode.to_lowercase().replace('_', "-"));
        }
    }
    Ok(CssPaint {
        value: values.join(", "),
        blend: blends.join(", "),
    })
}

/// `box-shadow` fragment for a shadow effect; empty for hidden or non-shadow effects.
pub fn effect_to_css(effect: &Effect) -> String {
    if !effect.visible || !is_valid_effect(effect) {
        return String::new();
    }
    let offset = effect.offset.unwrap_or_default();
    let spread = effect
        .spread
        .map(|s| format!("{}px ", format_number(s)))
        .unwrap_or_default();
    let color = figma_color_to_rgba(&effect.color.unwrap_or_default());
    let inset = if effect.kind == EffectKind::InnerShadow {
        " inset"
    } else {
        ""
    };
    format!(
        "{}px {}px {}px {}{}{}",
        format_number(offset.x),
        format_number(offset.y),
        format_number(effect.radius),
        spread,
        color,
        inset
    )
}

/// Comma-joined `box-shadow` list of the visible shadows.
pub fn effects_to_css(effects: &[Effect]) -> String {
    effects
        .iter()
        .map(effect_to_css)
        .filter(|css| !css.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn text_decoration_to_css(decoration: TextDecoration) -> &'static str {
    match decoration {
        TextDecoration::Underline => "underline",
        TextDecoration::Strikethrough => "line-through",
        TextDecoration::None => "none",
    }
}

pub fn text_case_to_css(case: TextCase) -> &'static str {
    match case {
        TextCase::Upper => "uppercase",
        TextCase::Lower => "lowercase",
        TextCase::Title => "capitalize",
        _ => "none",
    }
}

/// Shortest decimal form: `90`, `33.5`, `-2`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColorStop, Vector};

    fn rgba(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color { r, g, b, a }
    }

    #[test]
    fn hex_for_opaque_colors() {
        assert_eq!(figma_color_to_hex(&rgba(1.0, 0.0, 0.0, 1.0)), "#ff0000");
        assert_eq!(figma_color_to_hex(&rgba(0.0, 0.5, 1.0, 1.0)), "#0080ff");
    }

    #[test]
    fn hex_alpha_suffix() {
        assert_eq!(figma_color_to_hex(&rgba(0.0, 0.0, 0.0, 0.5)), "#00000080");
        // single hex digit is zero padded
        assert_eq!(figma_color_to_hex(&rgba(0.0, 0.0, 0.0, 0.02)), "#00000005");
        // rounds to ff: no suffix
        assert_eq!(figma_color_to_hex(&rgba(1.0, 1.0, 1.0, 0.999)), "#ffffff");
        assert_eq!(figma_color_to_hex(&rgba(1.0, 1.0, 1.0, 0.0)), "#ffffff00");
    }

    #[test]
    fn css_color_switches_to_rgba() {
        assert_eq!(figma_color_to_css(&rgba(1.0, 1.0, 1.0, 1.0)), "#ffffff");
        assert_eq!(
            figma_color_to_css(&rgba(1.0, 0.0, 0.0, 0.5)),
            "rgba(255, 0, 0, 0.5)"
        );
    }

    #[test]
    fn solid_paint_applies_opacity() {
        let mut paint = Paint::solid(rgba(0.0, 0.0, 1.0, 1.0));
        paint.opacity = 0.25;
        assert_eq!(
            paint_to_css(&paint, false).unwrap().unwrap(),
            "rgba(0, 0, 255, 0.25)"
        );
    }

    #[test]
    fn stacked_fills_reverse_and_force_gradients() {
        let bottom = Paint::solid(rgba(1.0, 1.0, 1.0, 1.0));
        let mut top = Paint::solid(rgba(0.0, 0.0, 0.0, 1.0));
        top.blend_mode = "MULTIPLY".into();
        let mut hidden = Paint::solid(rgba(1.0, 0.0, 0.0, 1.0));
        hidden.visible = false;

        let css = fills_to_css(&[bottom, top, hidden]).unwrap();
        assert_eq!(
            css.value,
            "linear-gradient(0deg, #000000, #000000), #ffffff"
        );
        assert_eq!(css.blend, "multiply, normal");
    }

    #[test]
    fn linear_gradient_css() {
        let paint = Paint {
            kind: PaintKind::GradientLinear,
            gradient_handle_positions: vec![
                Vector { x: 0.0, y: 0.5 },
                Vector { x: 1.0, y: 0.5 },
                Vector { x: 0.0, y: 1.0 },
            ],
            gradient_stops: vec![
                ColorStop {
                    position: 0.0,
                    color: rgba(1.0, 0.0, 0.0, 1.0),
                },
                ColorStop {
                    position: 1.0,
                    color: rgba(0.0, 0.0, 1.0, 0.5),
                },
            ],
            ..Paint::default()
        };
        assert_eq!(
            paint_to_css(&paint, false).unwrap().unwrap(),
            "linear-gradient(90deg, #ff0000 0%, rgba(0, 0, 255, 0.5) 100%)"
        );
    }

    #[test]
    fn radial_gradient_css() {
        let paint = Paint {
            kind: PaintKind::GradientRadial,
            gradient_handle_positions: vec![
                Vector { x: 0.5, y: 0.5 },
                Vector { x: 1.0, y: 0.5 },
                Vector { x: 0.5, y: 1.0 },
            ],
            gradient_stops: vec![
                ColorStop {
                    position: 0.0,
                    color: rgba(1.0, 1.0, 1.0, 1.0),
                },
                ColorStop {
                    position: 1.0,
                    color: rgba(0.0, 0.0, 0.0, 1.0),
                },
            ],
            ..Paint::default()
        };
        assert_eq!(
            paint_to_css(&paint, false).unwrap().unwrap(),
            "radial-gradient(50% 50% at 50% 50%, #ffffff 0%, #000000 100%)"
        );
    }

    #[test]
    fn gradient_with_missing_handles_errors() {
        let paint = Paint {
            kind: PaintKind::GradientLinear,
            ..Paint::default()
        };
        assert!(paint_to_css(&paint, false).is_err());
    }

    #[test]
    fn shadow_css() {
        let shadow = Effect {
            kind: EffectKind::DropShadow,
            visible: true,
            radius: 4.0,
            color: Some(rgba(0.0, 0.0, 0.0, 0.25)),
            offset: Some(Vector { x: 0.0, y: 2.0 }),
            spread: None,
            blend_mode: None,
        };
        assert_eq!(effect_to_css(&shadow), "0px 2px 4px rgba(0, 0, 0, 0.25)");

        let inner = Effect {
            kind: EffectKind::InnerShadow,
            spread: Some(1.0),
            ..shadow.clone()
        };
        assert_eq!(
            effect_to_css(&inner),
            "0px 2px 4px 1px rgba(0, 0, 0, 0.25) inset"
        );

        let hidden = Effect {
            visible: false,
            ..shadow.clone()
        };
        assert_eq!(effect_to_css(&hidden), "");
        assert_eq!(
            effects_to_css(&[shadow, hidden, inner]),
            "0px 2px 4px rgba(0, 0, 0, 0.25), 0px 2px 4px 1px rgba(0, 0, 0, 0.25) inset"
        );
    }

    #[test]
    fn text_mappings() {
        assert_eq!(text_decoration_to_css(TextDecoration::Strikethrough), "line-through");
        assert_eq!(text_decoration_to_css(TextDecoration::None), "none");
        assert_eq!(text_case_to_css(TextCase::Title), "capitalize");
        assert_eq!(text_case_to_css(TextCase::SmallCaps), "none");
    }
}

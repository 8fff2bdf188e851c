//! Token sets: kind-tagged bundles of visual properties extracted from one node.
//!
//! Every field is optional so that two extractions of the same kind can be
//! merged: a present value on the right replaces the left one, an absent
//! value never erases anything.

use serde::{Deserialize, Serialize};

use super::node::{
    Effect, Paint, TextAlignHorizontal, TextAlignVertical, TextCase, TextDecoration,
};

/// Visual property kind an exportable rule can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    Fill,
    Border,
    Spacing,
    Effect,
    Typography,
    Background,
    Opacity,
    Size,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 8] = [
        PropertyKind::Fill,
        PropertyKind::Border,
        PropertyKind::Spacing,
        PropertyKind::Effect,
        PropertyKind::Typography,
        PropertyKind::Background,
        PropertyKind::Opacity,
        PropertyKind::Size,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Fill => "FILL",
            PropertyKind::Border => "BORDER",
            PropertyKind::Spacing => "SPACING",
            PropertyKind::Effect => "EFFECT",
            PropertyKind::Typography => "TYPOGRAPHY",
            PropertyKind::Background => "BACKGROUND",
            PropertyKind::Opacity => "OPACITY",
            PropertyKind::Size => "SIZE",
        }
    }

    pub fn from_name(name: &str) -> Option<PropertyKind> {
        PropertyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenSet {
    Fill(FillTokenSet),
    Border(BorderTokenSet),
    Spacing(SpacingTokenSet),
    Effect(EffectTokenSet),
    Typography(TypographyTokenSet),
    Background(BackgroundTokenSet),
    Opacity(OpacityTokenSet),
    Size(SizeTokenSet),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillTokenSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<Paint>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderTokenSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Vec<Paint>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingTokenSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    /// Gap between children
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectTokenSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<Vec<Effect>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyTokenSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<TextAlignHorizontal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<TextAlignVertical>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<TextCase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundTokenSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Vec<Paint>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpacityTokenSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeTokenSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl TokenSet {
    /// A token set of `kind` with every field absent.
    pub fn empty(kind: PropertyKind) -> TokenSet {
        match kind {
            PropertyKind::Fill => TokenSet::Fill(FillTokenSet::default()),
            PropertyKind::Border => TokenSet::Border(BorderTokenSet::default()),
            PropertyKind::Spacing => TokenSet::Spacing(SpacingTokenSet::default()),
            PropertyKind::Effect => TokenSet::Effect(EffectTokenSet::default()),
            PropertyKind::Typography => TokenSet::Typography(TypographyTokenSet::default()),
            PropertyKind::Background => TokenSet::Background(BackgroundTokenSet::default()),
            PropertyKind::Opacity => TokenSet::Opacity(OpacityTokenSet::default()),
            PropertyKind::Size => TokenSet::Size(SizeTokenSet::default()),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            TokenSet::Fill(_) => PropertyKind::Fill,
            TokenSet::Border(_) => PropertyKind::Border,
            TokenSet::Spacing(_) => PropertyKind::Spacing,
            TokenSet::Effect(_) => PropertyKind::Effect,
            TokenSet::Typography(_) => PropertyKind::Typography,
            TokenSet::Background(_) => PropertyKind::Background,
            TokenSet::Opacity(_) => PropertyKind::Opacity,
            TokenSet::Size(_) => PropertyKind::Size,
        }
    }

    /// Merges `other` into `self`: present values in `other` win, absent
    /// ones keep what `self` had. Sets of different kinds leave `self` as is.
    pub fn merge(self, other: TokenSet) -> TokenSet {
        match (self, other) {
            (TokenSet::Fill(a), TokenSet::Fill(b)) => TokenSet::Fill(FillTokenSet {
                color: b.color.or(a.color),
            }),
            (TokenSet::Border(a), TokenSet::Border(b)) => TokenSet::Border(BorderTokenSet {
                weight: b.weight.or(a.weight),
                radius: b.radius.or(a.radius),
                strokes: b.strokes.or(a.strokes),
            }),
            (TokenSet::Spacing(a), TokenSet::Spacing(b)) => TokenSet::Spacing(SpacingTokenSet {
                padding_top: b.padding_top.or(a.padding_top),
                padding_right: b.padding_right.or(a.padding_right),
                padding_bottom: b.padding_bottom.or(a.padding_bottom),
                padding_left: b.padding_left.or(a.padding_left),
                spacing: b.spacing.or(a.spacing),
            }),
            (TokenSet::Effect(a), TokenSet::Effect(b)) => TokenSet::Effect(EffectTokenSet {
                effect: b.effect.or(a.effect),
            }),
            (TokenSet::Typography(a), TokenSet::Typography(b)) => {
                TokenSet::Typography(TypographyTokenSet {
                    font_family: b.font_family.or(a.font_family),
                    font_size: b.font_size.or(a.font_size),
                    font_weight: b.font_weight.or(a.font_weight),
                    line_height: b.line_height.or(a.line_height),
                    letter_spacing: b.letter_spacing.or(a.letter_spacing),
                    text_align_horizontal: b.text_align_horizontal.or(a.text_align_horizontal),
                    text_align_vertical: b.text_align_vertical.or(a.text_align_vertical),
                    text_decoration: b.text_decoration.or(a.text_decoration),
                    text_case: b.text_case.or(a.text_case),
                    characters: b.characters.or(a.characters),
                })
            }
            (TokenSet::Background(a), TokenSet::Background(b)) => {
                TokenSet::Background(BackgroundTokenSet {
                    background: b.background.or(a.background),
                })
            }
            (TokenSet::Opacity(a), TokenSet::Opacity(b)) => TokenSet::Opacity(OpacityTokenSet {
                opacity: b.opacity.or(a.opacity),
            }),
            (TokenSet::Size(a), TokenSet::Size(b)) => TokenSet::Size(SizeTokenSet {
                width: b.width.or(a.width),
                height: b.height.or(a.height),
            }),
            (unchanged, _) => unchanged,
        }
    }
}

//! Token-set extraction from resolved nodes.

use crate::types::{
    BackgroundTokenSet, BorderTokenSet, EffectTokenSet, ExportablePart, FillTokenSet, Node,
    OpacityTokenSet, PropertyKind, SizeTokenSet, SpacingTokenSet, TokenSet, TypeStyle,
    TypographyTokenSet,
};

use super::path_query::PathQuery;
use super::predicates::is_valid_effect;

/// Projects `node` onto the token set of `kind`.
///
/// Properties missing from the node fall back to zero values (`0`, empty
/// lists, `LEFT`/`NONE`/`ORIGINAL`); opacity falls back to fully opaque.
pub fn extract_token_set(node: &Node, kind: PropertyKind) -> TokenSet {
    match kind {
        PropertyKind::Fill => TokenSet::Fill(FillTokenSet {
            color: Some(node.fills.clone()),
        }),
        PropertyKind::Border => TokenSet::Border(BorderTokenSet {
            weight: Some(node.stroke_weight.unwrap_or(0.0)),
            radius: Some(node.corner_radius.unwrap_or(0.0)),
            strokes: Some(node.strokes.clone()),
        }),
        PropertyKind::Spacing => TokenSet::Spacing(SpacingTokenSet {
            padding_top: Some(node.padding_top.unwrap_or(0.0)),
            padding_right: Some(node.padding_right.unwrap_or(0.0)),
            padding_bottom: Some(node.padding_bottom.unwrap_or(0.0)),
            padding_left: Some(node.padding_left.unwrap_or(0.0)),
            spacing: Some(node.item_spacing.unwrap_or(0.0)),
        }),
        PropertyKind::Effect => TokenSet::Effect(EffectTokenSet {
            effect: Some(
                node.effects
                    .iter()
                    .filter(|effect| is_valid_effect(effect))
                    .cloned()
                    .collect(),
            ),
        }),
        PropertyKind::Typography => {
            let style = node.style.clone().unwrap_or_else(TypeStyle::default);
            TokenSet::Typography(TypographyTokenSet {
                font_family: Some(style.font_family),
                font_size: Some(style.font_size),
                font_weight: Some(style.font_weight),
                line_height: Some(style.line_height_px),
                letter_spacing: Some(style.letter_spacing),
                text_align_horizontal: Some(style.text_align_horizontal),
                text_align_vertical: Some(style.text_align_vertical),
                text_decoration: Some(style.text_decoration),
                text_case: Some(style.text_case),
                characters: node.characters.clone(),
            })
        }
        PropertyKind::Background => TokenSet::Background(BackgroundTokenSet {
            background: Some(node.fills.clone()),
        }),
        PropertyKind::Opacity => TokenSet::Opacity(OpacityTokenSet {
            opacity: Some(node.opacity.unwrap_or(1.0)),
        }),
        PropertyKind::Size => {
            let bounds = node.absolute_bounding_box.unwrap_or_default();
            TokenSet::Size(SizeTokenSet {
                width: Some(bounds.width),
                height: Some(bounds.height),
            })
        }
    }
}

/// Runs every rule of `part` against `root`, keeping one token set per
/// kind. Rules whose path query does not resolve are skipped.
pub fn extract_part_tokens(root: &Node, part: &ExportablePart, activity: Option<&str>) -> Vec<TokenSet> {
    let mut sets: Vec<TokenSet> = Vec::new();
    for rule in &part.rules {
        let Some(node) = PathQuery::parse(&rule.from).resolve(root, activity) else {
            tracing::debug!(part = %part.id, query = %rule.from, node = %root.id, "path query did not resolve");
            continue;
        };
        for kind in &rule.export {
            let extracted = extract_token_set(node, *kind);
            match sets.iter_mut().find(|set| set.kind() == *kind) {
                Some(existing) => {
                    let previous = std::mem::replace(existing, TokenSet::empty(*kind));
                    *existing = previous.merge(extracted);
                }
                None => sets.push(extracted),
            }
        }
    }
    sets
}

//! Colors, typography and effects from the file's published styles.

use std::collections::HashMap;

use crate::css::{effect_to_css, figma_color_to_hex, fills_to_css};
use crate::error::Result;
use crate::figma_client::{DesignApi, StyleMetadata};
use crate::types::{
    ColorObject, DesignObject, EffectObject, EffectValue, Node, NodeKind, PaintKind,
    TypographyObject,
};

use super::predicates::{is_type, is_valid_effect, is_valid_gradient, normalize_name_part};

/// Fetches the style nodes in one batch and converts them into design tokens.
pub async fn extract_design_tokens(api: &dyn DesignApi) -> Result<DesignObject> {
    let mut styles = api.get_file_styles().await?;
    if styles.is_empty() {
        return Ok(DesignObject::default());
    }
    sort_styles(&mut styles);
    let ids: Vec<String> = styles.iter().map(|s| s.node_id.clone()).collect();
    let nodes = api.get_file_nodes(&ids).await?;
    design_object_from_nodes(&styles, &nodes)
}

/// Ascending by `sort_position`; styles without one keep their relative order at the end.
fn sort_styles(styles: &mut [StyleMetadata]) {
    styles.sort_by(|a, b| match (a.sort_position.is_empty(), b.sort_position.is_empty()) {
        (false, false) => a.sort_position.cmp(&b.sort_position),
        (empty_a, empty_b) => empty_a.cmp(&empty_b),
    });
}

pub fn design_object_from_nodes(
    styles: &[StyleMetadata],
    nodes: &HashMap<String, Node>,
) -> Result<DesignObject> {
    let mut design = DesignObject::default();
    for style in styles {
        let Some(node) = nodes.get(&style.node_id) else {
            tracing::debug!(style = %style.name, node = %style.node_id, "style node missing from response");
            continue;
        };
        let (group, name) = split_group(&node.name);
        let machine_name = normalize_name_part(&name);

        if is_type(node, NodeKind::Rectangle) {
            let shadows: Vec<EffectValue> = node
                .effects
                .iter()
                .filter(|effect| is_valid_effect(effect))
                .map(|effect| EffectValue {
                    kind: effect.kind,
                    value: effect_to_css(effect),
                })
                .collect();
            if !shadows.is_empty() {
                design.effect.push(EffectObject {
                    id: node.id.clone(),
                    sass: sass_name("effect", group.as_deref(), &machine_name),
                    name,
                    machine_name,
                    group,
                    effects: shadows,
                });
            } else if node
                .fills
                .iter()
                .any(|paint| paint.kind == PaintKind::Solid || is_valid_gradient(paint))
            {
                let css = fills_to_css(&node.fills)?;
                design.color.push(ColorObject {
                    id: node.id.clone(),
                    sass: sass_name("color", group.as_deref(), &machine_name),
                    name,
                    machine_name,
                    group,
                    value: css.value,
                    blend: css.blend,
                });
            }
        } else if is_type(node, NodeKind::Text) {
            let color = node
                .fills
                .iter()
                .find(|paint| paint.kind == PaintKind::Solid)
                .and_then(|paint| paint.color.as_ref())
                .map(figma_color_to_hex)
                .unwrap_or_default();
            design.typography.push(TypographyObject {
                id: node.id.clone(),
                sass: sass_name("typography", group.as_deref(), &machine_name),
                name,
                machine_name,
                group,
                values: node.style.clone().unwrap_or_default(),
                color,
            });
        }
    }
    Ok(design)
}

/// `Primary/Blue 500` -> (`Some("Primary")`, `Blue 500`).
fn split_group(raw: &str) -> (Option<String>, String) {
    match raw.split_once('/') {
        Some((group, name)) => (Some(group.trim().to_string()), name.trim().to_string()),
        None => (None, raw.trim().to_string()),
    }
}

fn sass_name(prefix: &str, group: Option<&str>, machine_name: &str) -> String {
    match group.map(normalize_name_part).filter(|g| !g.is_empty()) {
        Some(group) => format!("${prefix}-{group}-{machine_name}"),
        None => format!("${prefix}-{machine_name}"),
    }
}

//! Pure predicates and searches over a node tree.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Effect, Node, NodeKind, Paint, PropertyKind, VariantProperty};

pub fn is_type(node: &Node, kind: NodeKind) -> bool {
    node.kind == kind
}

pub fn filter_by_type(kind: NodeKind) -> impl Fn(&&Node) -> bool {
    move |node| is_type(node, kind)
}

/// Depth-first, pre-order: `node` itself is checked before its children.
pub fn find_first_descendant_of_type(node: &Node, kind: NodeKind) -> Option<&Node> {
    if is_type(node, kind) {
        return Some(node);
    }
    node.children
        .iter()
        .find_map(|child| find_first_descendant_of_type(child, kind))
}

/// Like [`find_first_descendant_of_type`], also requiring a case-insensitive name match.
pub fn find_first_descendant_of_type_and_name<'a>(
    node: &'a Node,
    kind: NodeKind,
    name: &str,
) -> Option<&'a Node> {
    if is_type(node, kind) && node.name.eq_ignore_ascii_case(name) {
        return Some(node);
    }
    node.children
        .iter()
        .find_map(|child| find_first_descendant_of_type_and_name(child, kind, name))
}

/// Value of `key` in a variant name such as `Theme=Light, State=Hover`.
/// The key is matched case-sensitively.
pub fn extract_variant_name_part<'a>(raw_name: &'a str, key: &str) -> Option<&'a str> {
    raw_name.split(',').find_map(|segment| {
        segment
            .trim()
            .strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

pub fn is_valid_variant_property(name: &str) -> bool {
    VariantProperty::from_name(name).is_some()
}

pub fn is_valid_exportable_kind(name: &str) -> bool {
    PropertyKind::from_name(name).is_some()
}

pub fn is_valid_node_kind(name: &str) -> bool {
    NodeKind::from_name(name).is_some()
}

/// Only shadows have a CSS rendition; blurs are ignored.
pub fn is_valid_effect(effect: &Effect) -> bool {
    effect.kind.is_shadow()
}

pub fn is_valid_gradient(paint: &Paint) -> bool {
    paint.kind.is_supported_gradient()
}

/// Lowercases and collapses every non-alphanumeric run into one hyphen.
pub fn normalize_name_part(value: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));
    re.replace_all(&value.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

//! Builds normalized components from Figma variant nodes.
//!
//! Variant nodes encode their identity in the name (`Theme=Light, State=Hover`).
//! Each node becomes one [`Component`]: layout components when a layout or
//! size axis is present, design components otherwise. States declared as
//! shared (`STATE(disabled)`) are authored once and projected onto every
//! theme/type/activity combination that has a `default` state.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{HandoffError, Result};
use crate::types::{
    Component, ComponentParts, DesignComponent, ExportableDefinition, LayoutComponent, Node,
    NodeKind, VariantProperty, VariantValues,
};

use super::predicates::{extract_variant_name_part, find_first_descendant_of_type, normalize_name_part};
use super::token_sets::extract_part_tokens;

const DEFAULT_STATE: &str = "default";

/// Shared-state components keyed by `(state, theme)`, in authoring order.
type SharedStates = IndexMap<(String, Option<String>), DesignComponent>;

/// A declared variant axis with its optional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantAxis {
    pub property: VariantProperty,
    pub params: Vec<String>,
}

/// Parses declarations like `THEME` or `STATE(disabled:loading)`.
/// Entries that do not parse or name an unknown axis are dropped.
pub fn parse_variant_axes(declared: &[String]) -> Vec<VariantAxis> {
    static AXIS: OnceLock<Regex> = OnceLock::new();
    let re = AXIS.get_or_init(|| Regex::new(r"^([^:(]+)(?:\(([^)]+)\))?$").expect("valid regex"));

    declared
        .iter()
        .filter_map(|raw| {
            let Some(caps) = re.captures(raw.trim()) else {
                tracing::debug!(axis = %raw, "dropping malformed variant axis");
                return None;
            };
            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            let Some(property) = VariantProperty::from_name(name) else {
                tracing::debug!(axis = %raw, "dropping unknown variant axis");
                return None;
            };
            let params = caps
                .get(2)
                .map(|m| {
                    m.as_str()
                        .split(':')
                        .map(normalize_name_part)
                        .filter(|p| !p.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            Some(VariantAxis { property, params })
        })
        .collect()
}

/// Normalized axis values of `raw_name` for the supported axes only.
pub fn variant_values(raw_name: &str, axes: &[VariantAxis]) -> VariantValues {
    let mut values = VariantValues::default();
    for axis in axes {
        let value = extract_variant_name_part(raw_name, axis.property.figma_key())
            .map(normalize_name_part)
            .filter(|v| !v.is_empty());
        values.set(axis.property, value);
    }
    values
}

/// Builds the components of `exportable` from its variant nodes.
///
/// `descriptions` maps node ids to component descriptions. Fails when a
/// design variant has no instance to extract from.
pub fn build_components(
    exportable: &ExportableDefinition,
    nodes: &[Node],
    descriptions: &HashMap<String, String>,
) -> Result<Vec<Component>> {
    let axes = parse_variant_axes(&exportable.supported_variant_props);
    let shared_states: Vec<String> = axes
        .iter()
        .filter(|axis| axis.property == VariantProperty::State)
        .flat_map(|axis| axis.params.iter().cloned())
        .collect();

    let mut emitted: Vec<Component> = Vec::new();
    let mut shared: SharedStates = IndexMap::new();

    for node in nodes {
        let Some(component) = build_component(exportable, node, &axes, descriptions)? else {
            tracing::debug!(exportable = %exportable.id, node = %node.name, "dropping component without parts");
            continue;
        };
        match component {
            Component::Design(design)
                if design
                    .state
                    .as_ref()
                    .is_some_and(|state| shared_states.contains(state)) =>
            {
                let state = design.state.clone().unwrap_or_default();
                shared.entry((state, design.theme.clone())).or_insert(design);
            }
            other => emitted.push(other),
        }
    }

    let projected = project_shared_states(&emitted, &shared_states, &shared);
    emitted.extend(projected);

    let mut seen = HashSet::new();
    emitted.retain(|component| seen.insert(component.id().to_string()));
    Ok(emitted)
}

fn build_component(
    exportable: &ExportableDefinition,
    node: &Node,
    axes: &[VariantAxis],
    descriptions: &HashMap<String, String>,
) -> Result<Option<Component>> {
    if exportable.parts.is_empty() {
        return Ok(None);
    }

    let values = variant_values(&node.name, axes);
    let anchor = if values.is_layout() {
        node
    } else {
        find_first_descendant_of_type(node, NodeKind::Instance).ok_or_else(|| {
            HandoffError::missing_instance(format!("{} ({})", exportable.id, node.name))
        })?
    };

    let mut parts = ComponentParts::new();
    for part in &exportable.parts {
        parts.insert(
            part.id.clone(),
            extract_part_tokens(anchor, part, values.activity.as_deref()),
        );
    }

    let id = values.component_id();
    let description = descriptions.get(&node.id).cloned().unwrap_or_default();
    let component = if values.is_layout() {
        Component::Layout(LayoutComponent {
            id,
            name: exportable.id.clone(),
            description,
            layout: values.layout,
            size: values.size,
            parts,
        })
    } else {
        Component::Design(DesignComponent {
            id,
            name: exportable.id.clone(),
            description,
            theme: values.theme,
            r#type: values.r#type,
            state: values.state,
            activity: values.activity,
            parts,
        })
    };
    Ok(Some(component))
}

/// Clones every shared state onto each emitted `default` design component,
/// keeping the shared parts and taking theme/type/activity from the default.
/// The source for each state is the one authored for the default's theme,
/// else the theme-less one, else the first one authored.
fn project_shared_states(
    emitted: &[Component],
    shared_states: &[String],
    shared: &SharedStates,
) -> Vec<Component> {
    let mut projected = Vec::new();
    for component in emitted {
        let Component::Design(default) = component else {
            continue;
        };
        if default.state.as_deref() != Some(DEFAULT_STATE) {
            continue;
        }
        for state in shared_states {
            let source = shared
                .get(&(state.clone(), default.theme.clone()))
                .or_else(|| shared.get(&(state.clone(), None)))
                .or_else(|| {
                    shared
                        .iter()
                        .find(|((shared_state, _), _)| shared_state == state)
                        .map(|(_, component)| component)
                });
            let Some(source) = source else {
                continue;
            };
            let values = VariantValues {
                theme: default.theme.clone(),
                r#type: default.r#type.clone(),
                state: Some(state.clone()),
                activity: default.activity.clone(),
                ..VariantValues::default()
            };
            projected.push(Component::Design(DesignComponent {
                id: values.component_id(),
                name: source.name.clone(),
                description: source.description.clone(),
                theme: values.theme,
                r#type: values.r#type,
                state: values.state,
                activity: values.activity,
                parts: source.parts.clone(),
            }));
        }
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExportablePart, PropertyKind, TokenRule, TokenSet, TransformerOptions};

    fn exportable(props: &[&str]) -> ExportableDefinition {
        ExportableDefinition {
            id: "button".into(),
            group: None,
            search: "Buttons".into(),
            supported_variant_props: props.iter().map(|p| p.to_string()).collect(),
            transformer: TransformerOptions::default(),
            parts: vec![ExportablePart {
                id: "$".into(),
                rules: vec![TokenRule {
                    from: "$".into(),
                    export: vec![PropertyKind::Opacity],
                }],
            }],
        }
    }

    fn variant(id: &str, name: &str, opacity: f64) -> Node {
        let mut instance = Node::new(format!("{id}-i"), "Button", NodeKind::Instance);
        instance.opacity = Some(opacity);
        Node::new(id, name, NodeKind::Component).with_children(vec![instance])
    }

    fn opacity_of(component: &Component) -> Option<f64> {
        match component.parts().get("$")?.first()? {
            TokenSet::Opacity(o) => o.opacity,
            _ => None,
        }
    }

    #[test]
    fn parses_axes_with_params() {
        let axes = parse_variant_axes(&[
            "THEME".into(),
            "STATE(disabled:Loading)".into(),
            "COLOR".into(),
            "TYPE(".into(),
        ]);
        assert_eq!(
            axes,
            vec![
                VariantAxis {
                    property: VariantProperty::Theme,
                    params: vec![]
                },
                VariantAxis {
                    property: VariantProperty::State,
                    params: vec!["disabled".into(), "loading".into()]
                },
            ]
        );
    }

    #[test]
    fn normalizes_variant_name() {
        let axes = parse_variant_axes(&["THEME".into(), "STATE".into()]);
        let values = variant_values("Theme=Light, State=Hover", &axes);
        assert_eq!(values.theme.as_deref(), Some("light"));
        assert_eq!(values.state.as_deref(), Some("hover"));
        assert_eq!(values.component_id(), "design-theme-light-state-hover");
    }

    #[test]
    fn unsupported_axes_stay_unset() {
        let axes = parse_variant_axes(&["THEME".into()]);
        let values = variant_values("Theme=Dark, Size=Large", &axes);
        assert!(values.size.is_none());
        assert!(!values.is_layout());
    }

    #[test]
    fn layout_components_anchor_on_the_node() {
        let def = exportable(&["LAYOUT", "SIZE"]);
        let mut node = Node::new("1", "Layout=Horizontal, Size=LG", NodeKind::Component);
        node.opacity = Some(0.4);
        let components = build_components(&def, &[node], &HashMap::new()).unwrap();
        assert_eq!(components.len(), 1);
        assert!(matches!(components[0], Component::Layout(_)));
        assert_eq!(components[0].id(), "layout-layout-horizontal-size-lg");
        assert_eq!(opacity_of(&components[0]), Some(0.4));
    }

    #[test]
    fn design_without_instance_fails() {
        let def = exportable(&["THEME"]);
        let node = Node::new("1", "Theme=Light", NodeKind::Component);
        let err = build_components(&def, &[node], &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("button"));
    }

    #[test]
    fn exportable_without_parts_emits_nothing() {
        let mut def = exportable(&["THEME"]);
        def.parts.clear();
        let node = Node::new("1", "Theme=Light", NodeKind::Component);
        assert!(build_components(&def, &[node], &HashMap::new()).unwrap().is_empty());
    }

    #[test]
    fn shared_state_is_projected_onto_each_theme() {
        let def = exportable(&["THEME", "STATE(disabled)"]);
        let nodes = vec![
            variant("1", "Theme=Light, State=Default", 1.0),
            variant("2", "Theme=Dark, State=Default", 0.9),
            variant("3", "State=Disabled", 0.3),
            variant("4", "Theme=Light, State=Hover", 0.8),
        ];
        let mut descriptions = HashMap::new();
        descriptions.insert("3".to_string(), "Disabled look".to_string());

        let components = build_components(&def, &nodes, &descriptions).unwrap();
        let ids: Vec<&str> = components.iter().map(|c| c.id()).collect();
        assert_eq!(
            ids,
            vec![
                "design-theme-light-state-default",
                "design-theme-dark-state-default",
                "design-theme-light-state-hover",
                "design-theme-light-state-disabled",
                "design-theme-dark-state-disabled",
            ]
        );
        for component in &components[3..] {
            assert_eq!(opacity_of(component), Some(0.3));
            match component {
                Component::Design(d) => assert_eq!(d.description, "Disabled look"),
                other => panic!("unexpected {other:?}"),
            }
        }
        match &components[4] {
            Component::Design(d) => assert_eq!(d.theme.as_deref(), Some("dark")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn theme_specific_shared_state_wins() {
        let def = exportable(&["THEME", "STATE(disabled)"]);
        let nodes = vec![
            variant("1", "Theme=Dark, State=Default", 1.0),
            variant("2", "State=Disabled", 0.3),
            variant("3", "Theme=Dark, State=Disabled", 0.1),
        ];
        let components = build_components(&def, &nodes, &HashMap::new()).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(opacity_of(&components[1]), Some(0.1));
    }

    #[test]
    fn single_theme_shared_state_reaches_other_themes() {
        let def = exportable(&["THEME", "STATE(disabled)"]);
        let nodes = vec![
            variant("1", "Theme=Light, State=Default", 1.0),
            variant("2", "Theme=Dark, State=Default", 0.9),
            variant("3", "Theme=Light, State=Disabled", 0.3),
        ];
        let components = build_components(&def, &nodes, &HashMap::new()).unwrap();
        let ids: Vec<&str> = components.iter().map(|c| c.id()).collect();
        assert_eq!(
            ids,
            vec![
                "design-theme-light-state-default",
                "design-theme-dark-state-default",
                "design-theme-light-state-disabled",
                "design-theme-dark-state-disabled",
            ]
        );
        assert_eq!(opacity_of(&components[3]), Some(0.3));
    }

    #[test]
    fn first_authored_shared_state_wins() {
        let def = exportable(&["THEME", "STATE(disabled)"]);
        let nodes = vec![
            variant("1", "Theme=Light, State=Default", 1.0),
            variant("2", "Theme=Light, State=Disabled", 0.3),
            variant("3", "Theme=Light, State=Disabled", 0.6),
        ];
        let components = build_components(&def, &nodes, &HashMap::new()).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[1].id(), "design-theme-light-state-disabled");
        assert_eq!(opacity_of(&components[1]), Some(0.3));
    }

    #[test]
    fn duplicate_input_is_deduplicated() {
        let def = exportable(&["THEME", "STATE(disabled)"]);
        let nodes = vec![
            variant("1", "Theme=Light, State=Default", 1.0),
            variant("2", "State=Disabled", 0.3),
        ];
        let once = build_components(&def, &nodes, &HashMap::new()).unwrap();
        let doubled: Vec<Node> = nodes.iter().chain(nodes.iter()).cloned().collect();
        let twice = build_components(&def, &doubled, &HashMap::new()).unwrap();
        assert_eq!(once, twice);
    }
}

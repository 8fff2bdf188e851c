//! Assembles the documentation object from a Figma file.

use std::collections::HashMap;

use crate::error::{HandoffError, Result};
use crate::extract::{build_components, export_assets, extract_design_tokens, ICONS_FRAME, LOGOS_FRAME};
use crate::figma_client::{ComponentMetadata, DesignApi};
use crate::types::{AssetsObject, DocumentationObject, ExportableDefinition, Node, NodeKind};

/// Runs the full extraction: components per exportable, design tokens,
/// icons and logos.
///
/// Failing to list component sets is fatal; an empty listing is logged and
/// the run continues with design tokens and assets only.
pub async fn build_documentation_object(
    api: &dyn DesignApi,
    exportables: &[ExportableDefinition],
    asset_batch_size: usize,
) -> Result<DocumentationObject> {
    let sets = api.get_component_sets().await.map_err(|err| match err {
        HandoffError::FigmaApi { status, message } => HandoffError::figma_api(
            status,
            format!("could not list component sets: {message}"),
        ),
        other => HandoffError::figma_api(None, format!("could not list component sets: {other}")),
    })?;

    let mut doc = DocumentationObject {
        timestamp: chrono::Utc::now().to_rfc3339(),
        ..DocumentationObject::default()
    };

    if sets.is_empty() {
        tracing::warn!("the file has no component sets; exporting design tokens and assets only");
    } else {
        let descriptions: HashMap<String, String> = api
            .get_file_components()
            .await?
            .into_iter()
            .map(|c| (c.node_id, c.description))
            .collect();
        for exportable in exportables {
            let nodes = variant_nodes(api, &sets, exportable).await?;
            if nodes.is_empty() {
                tracing::warn!(exportable = %exportable.id, search = %exportable.search, "no component set matched");
                continue;
            }
            let components = build_components(exportable, &nodes, &descriptions)?;
            tracing::info!(exportable = %exportable.id, count = components.len(), "built components");
            doc.components.insert(exportable.id.clone(), components);
        }
    }

    let (design, icons, logos) = tokio::try_join!(
        extract_design_tokens(api),
        export_assets(api, ICONS_FRAME, asset_batch_size),
        export_assets(api, LOGOS_FRAME, asset_batch_size),
    )?;
    doc.design = design;
    doc.assets = AssetsObject { icons, logos };
    Ok(doc)
}

/// COMPONENT children of every set whose frame name contains the
/// exportable's search term, in set order.
async fn variant_nodes(
    api: &dyn DesignApi,
    sets: &[ComponentMetadata],
    exportable: &ExportableDefinition,
) -> Result<Vec<Node>> {
    let search = exportable.search.to_lowercase();
    let ids: Vec<String> = sets
        .iter()
        .filter(|set| set.frame_name().to_lowercase().contains(&search))
        .map(|set| set.node_id.clone())
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut fetched = api.get_component_set_nodes(&ids).await?;
    Ok(ids
        .iter()
        .filter_map(|id| fetched.remove(id))
        .flat_map(|set| set.children)
        .filter(|child| child.kind == NodeKind::Component)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma_client::{ContainingFrame, ImageFormat, StyleMetadata};
    use crate::types::{Color, Component, ExportablePart, Paint, PropertyKind, TokenRule, TransformerOptions};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory Figma file.
    #[derive(Default)]
    struct FakeApi {
        components: Vec<ComponentMetadata>,
        sets: Vec<ComponentMetadata>,
        styles: Vec<StyleMetadata>,
        nodes: HashMap<String, Node>,
        svgs: HashMap<String, String>,
        fail_sets: bool,
        url_calls: AtomicUsize,
    }

    fn metadata(node_id: &str, name: &str, frame: &str) -> ComponentMetadata {
        ComponentMetadata {
            node_id: node_id.into(),
            name: name.into(),
            containing_frame: Some(ContainingFrame {
                name: Some(frame.into()),
                ..ContainingFrame::default()
            }),
            ..ComponentMetadata::default()
        }
    }

    fn pick(nodes: &HashMap<String, Node>, ids: &[String]) -> HashMap<String, Node> {
        ids.iter()
            .filter_map(|id| nodes.get(id).map(|n| (id.clone(), n.clone())))
            .collect()
    }

    #[async_trait]
    impl DesignApi for FakeApi {
        async fn get_file_components(&self) -> Result<Vec<ComponentMetadata>> {
            Ok(self.components.clone())
        }

        async fn get_file_nodes(&self, ids: &[String]) -> Result<HashMap<String, Node>> {
            Ok(pick(&self.nodes, ids))
        }

        async fn get_asset_urls(
            &self,
            ids: &[String],
            _format: ImageFormat,
        ) -> Result<HashMap<String, Option<String>>> {
            self.url_calls.fetch_add(1, Ordering::SeqCst);
            Ok(ids
                .iter()
                .map(|id| (id.clone(), Some(format!("https://cdn.test/{id}"))))
                .collect())
        }

        async fn get_file_styles(&self) -> Result<Vec<StyleMetadata>> {
            Ok(self.styles.clone())
        }

        async fn get_component_sets(&self) -> Result<Vec<ComponentMetadata>> {
            if self.fail_sets {
                return Err(HandoffError::figma_api(
                    Some(reqwest::StatusCode::FORBIDDEN),
                    "Invalid token",
                ));
            }
            Ok(self.sets.clone())
        }

        async fn get_component_set_nodes(&self, ids: &[String]) -> Result<HashMap<String, Node>> {
            Ok(pick(&self.nodes, ids))
        }

        async fn download_text(&self, url: &str) -> Result<String> {
            let id = url.trim_start_matches("https://cdn.test/");
            self.svgs
                .get(id)
                .cloned()
                .ok_or_else(|| HandoffError::figma_api(None, format!("no svg for {id}")))
        }
    }

    fn button() -> ExportableDefinition {
        ExportableDefinition {
            id: "button".into(),
            group: None,
            search: "buttons".into(),
            supported_variant_props: vec!["THEME".into(), "STATE".into()],
            transformer: TransformerOptions::default(),
            parts: vec![ExportablePart {
                id: "$".into(),
                rules: vec![TokenRule {
                    from: "$".into(),
                    export: vec![PropertyKind::Background],
                }],
            }],
        }
    }

    fn fixture() -> FakeApi {
        let mut instance = Node::new("10:1", "Button", NodeKind::Instance);
        instance.fills = vec![Paint::solid(Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 })];
        let variant = Node::new("10:0", "Theme=Light, State=Default", NodeKind::Component)
            .with_children(vec![instance]);
        let stray = Node::new("10:9", "Notes", NodeKind::Text);
        let set = Node::new("9:0", "Button", NodeKind::ComponentSet)
            .with_children(vec![variant, stray]);

        let mut swatch = Node::new("20:0", "Brand/Red", NodeKind::Rectangle);
        swatch.fills = vec![Paint::solid(Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 })];

        let mut components = vec![
            metadata("10:0", "Theme=Light, State=Default", "Buttons"),
            metadata("30:2", "Arrow", "Icons"),
            metadata("30:1", "Close", "Icons"),
            metadata("40:1", "Brand Mark", "Logo"),
        ];
        components[0].description = "Primary action".into();

        FakeApi {
            components,
            sets: vec![metadata("9:0", "Button", "Buttons"), metadata("8:0", "Card", "Cards")],
            styles: vec![StyleMetadata {
                node_id: "20:0".into(),
                style_type: "FILL".into(),
                sort_position: "a".into(),
                ..StyleMetadata::default()
            }],
            nodes: [set, swatch].into_iter().map(|n| (n.id.clone(), n)).collect(),
            svgs: [
                ("30:1", "<svg>close</svg>"),
                ("30:2", "<svg>arrow</svg>"),
                ("40:1", "<svg>\nlogo</svg>"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            ..FakeApi::default()
        }
    }

    #[tokio::test]
    async fn builds_full_documentation_object() {
        let api = fixture();
        let doc = build_documentation_object(&api, &[button()], 1).await.unwrap();

        let components = &doc.components["button"];
        assert_eq!(components.len(), 1);
        match &components[0] {
            Component::Design(d) => {
                assert_eq!(d.id, "design-theme-light-state-default");
                assert_eq!(d.description, "Primary action");
            }
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(doc.design.color.len(), 1);
        assert_eq!(doc.design.color[0].sass, "$color-brand-red");

        let icons: Vec<&str> = doc.assets.icons.iter().map(|a| a.path.as_str()).collect();
        assert_eq!(icons, vec!["close.svg", "arrow.svg"]);
        assert_eq!(doc.assets.logos[0].data, "<svg>logo</svg>");
        assert_eq!(api.url_calls.load(Ordering::SeqCst), 3);
        assert!(chrono::DateTime::parse_from_rfc3339(&doc.timestamp).is_ok());
    }

    #[tokio::test]
    async fn empty_component_sets_are_not_fatal() {
        let api = FakeApi {
            sets: Vec::new(),
            ..fixture()
        };
        let doc = build_documentation_object(&api, &[button()], 50).await.unwrap();
        assert!(doc.components.is_empty());
        assert_eq!(doc.design.color.len(), 1);
    }

    #[tokio::test]
    async fn component_set_failure_is_fatal() {
        let api = FakeApi {
            fail_sets: true,
            ..fixture()
        };
        let err = build_documentation_object(&api, &[button()], 50).await.unwrap_err();
        assert!(err.to_string().contains("component sets"));
        assert!(err.to_payload().remediation.unwrap_or_default().contains("token"));
    }

    #[tokio::test]
    async fn missing_svg_aborts_the_run() {
        let mut api = fixture();
        api.svgs.remove("30:1");
        assert!(build_documentation_object(&api, &[button()], 50).await.is_err());
    }
}

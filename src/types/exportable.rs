//! User-authored exportable definitions.
//!
//! A definition names the component set to pull from Figma (`search`), the
//! variant axes it is authored with, and which sub-nodes feed which token
//! sets. Files are read as [`RawExportable`] and resolved against the global
//! defaults into an [`ExportableDefinition`].

use serde::{Deserialize, Serialize};

use super::tokens::PropertyKind;

/// Exporter options; `None` falls back to the global default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExporterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(
        alias = "supported_variant_props",
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_variant_props: Option<Vec<String>>,
}

impl ExporterOptions {
    /// Field-by-field overlay of `self` on `base`; `self` wins where set.
    pub fn merge_over(&self, base: &ExporterOptions) -> ExporterOptions {
        ExporterOptions {
            search: self.search.clone().or_else(|| base.search.clone()),
            supported_variant_props: self
                .supported_variant_props
                .clone()
                .or_else(|| base.supported_variant_props.clone()),
        }
    }
}

/// Options for CSS/SCSS generation; `None` falls back to the global default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformerOptions {
    #[serde(alias = "root_selector", skip_serializing_if = "Option::is_none")]
    pub root_selector: Option<String>,
    #[serde(alias = "token_prefix", skip_serializing_if = "Option::is_none")]
    pub token_prefix: Option<String>,
}

impl TransformerOptions {
    pub fn merge_over(&self, base: &TransformerOptions) -> TransformerOptions {
        TransformerOptions {
            root_selector: self
                .root_selector
                .clone()
                .or_else(|| base.root_selector.clone()),
            token_prefix: self
                .token_prefix
                .clone()
                .or_else(|| base.token_prefix.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportableOptions {
    pub exporter: ExporterOptions,
    pub transformer: TransformerOptions,
}

/// An exportable as written in a definition file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExportable {
    pub id: Option<String>,
    pub group: Option<String>,
    pub options: ExportableOptions,
    pub parts: Vec<RawExportablePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawExportablePart {
    pub id: String,
    pub tokens: Vec<RawTokenRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTokenRule {
    pub from: String,
    pub export: Vec<String>,
}

/// A resolved exportable, ready for extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportableDefinition {
    pub id: String,
    pub group: Option<String>,
    /// Substring matched against the containing frame name.
    pub search: String,
    /// Raw axis declarations such as `STATE(disabled)`.
    pub supported_variant_props: Vec<String>,
    pub transformer: TransformerOptions,
    pub parts: Vec<ExportablePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportablePart {
    pub id: String,
    pub rules: Vec<TokenRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRule {
    /// Path query locating the node, e.g. `$ > FRAME[name="Label"]`.
    pub from: String,
    pub export: Vec<PropertyKind>,
}

impl RawExportable {
    /// Resolves against `defaults`. Fails when `id` or the merged
    /// `search` is missing; unknown property kinds are dropped.
    pub fn resolve(self, defaults: &ExportableOptions) -> Result<ExportableDefinition, String> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| "exportable is missing `id`".to_string())?;
        let exporter = self.options.exporter.merge_over(&defaults.exporter);
        let transformer = self.options.transformer.merge_over(&defaults.transformer);
        let search = exporter
            .search
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| format!("exportable `{id}` is missing `options.exporter.search`"))?;

        let parts = self
            .parts
            .into_iter()
            .map(|part| ExportablePart {
                id: part.id,
                rules: part
                    .tokens
                    .into_iter()
                    .map(|rule| TokenRule {
                        from: rule.from,
                        export: rule
                            .export
                            .iter()
                            .filter_map(|name| {
                                let kind = PropertyKind::from_name(name);
                                if kind.is_none() {
                                    tracing::debug!(exportable = %id, property = %name, "ignoring unknown property kind");
                                }
                                kind
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Ok(ExportableDefinition {
            id,
            group: self.group,
            search,
            supported_variant_props: exporter.supported_variant_props.unwrap_or_default(),
            transformer,
            parts,
        })
    }
}

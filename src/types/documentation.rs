//! The documentation object: complete output of one extraction run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::component::Component;
use super::node::{EffectKind, TypeStyle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationObject {
    pub timestamp: String,
    pub design: DesignObject,
    /// Components per exportable id.
    #[serde(default)]
    pub components: IndexMap<String, Vec<Component>>,
    #[serde(default)]
    pub assets: AssetsObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignObject {
    pub color: Vec<ColorObject>,
    pub typography: Vec<TypographyObject>,
    pub effect: Vec<EffectObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsObject {
    pub icons: Vec<AssetObject>,
    pub logos: Vec<AssetObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorObject {
    pub id: String,
    pub name: String,
    pub machine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// CSS value: hex, rgba() or gradient list
    pub value: String,
    /// CSS blend modes, one per layer
    pub blend: String,
    pub sass: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyObject {
    pub id: String,
    pub name: String,
    pub machine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub values: TypeStyle,
    /// Hex color of the first solid fill, empty when there is none
    #[serde(default)]
    pub color: String,
    pub sass: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectObject {
    pub id: String,
    pub name: String,
    pub machine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub effects: Vec<EffectValue>,
    pub sass: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectValue {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    /// CSS `box-shadow` fragment
    pub value: String,
}

/// An exported SVG icon or logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetObject {
    pub path: String,
    pub name: String,
    pub index: String,
    #[serde(default)]
    pub description: String,
    pub size: usize,
    pub data: String,
}

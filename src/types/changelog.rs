//! Changelog records produced by diffing two documentation objects.

use serde::{Deserialize, Serialize};

use super::documentation::{AssetObject, ColorObject, TypographyObject};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChangeEntry<T> {
    Add { object: T },
    Change { old: T, new: T },
    Delete { object: T },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogRecord {
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<DesignChanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetChanges>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<ChangeEntry<ColorObject>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<Vec<ChangeEntry<TypographyObject>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<ChangeEntry<AssetObject>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logos: Option<Vec<ChangeEntry<AssetObject>>>,
}

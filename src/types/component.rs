//! Normalized component records built from Figma variant nodes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::tokens::TokenSet;

/// Token sets per part id, in declaration order.
pub type ComponentParts = IndexMap<String, Vec<TokenSet>>;

/// One named dimension of a component's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantProperty {
    Theme,
    Type,
    State,
    Activity,
    Layout,
    Size,
}

impl VariantProperty {
    pub const ALL: [VariantProperty; 6] = [
        VariantProperty::Theme,
        VariantProperty::Type,
        VariantProperty::State,
        VariantProperty::Activity,
        VariantProperty::Layout,
        VariantProperty::Size,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantProperty::Theme => "THEME",
            VariantProperty::Type => "TYPE",
            VariantProperty::State => "STATE",
            VariantProperty::Activity => "ACTIVITY",
            VariantProperty::Layout => "LAYOUT",
            VariantProperty::Size => "SIZE",
        }
    }

    /// Key used in Figma variant names, e.g. `Theme` in `Theme=Light`.
    pub fn figma_key(&self) -> &'static str {
        match self {
            VariantProperty::Theme => "Theme",
            VariantProperty::Type => "Type",
            VariantProperty::State => "State",
            VariantProperty::Activity => "Activity",
            VariantProperty::Layout => "Layout",
            VariantProperty::Size => "Size",
        }
    }

    pub fn from_name(name: &str) -> Option<VariantProperty> {
        VariantProperty::ALL
            .into_iter()
            .find(|prop| prop.as_str() == name)
    }
}

/// Normalized axis values of one variant; unset axes stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantValues {
    pub theme: Option<String>,
    pub r#type: Option<String>,
    pub state: Option<String>,
    pub activity: Option<String>,
    pub layout: Option<String>,
    pub size: Option<String>,
}

impl VariantValues {
    pub fn get(&self, property: VariantProperty) -> Option<&str> {
        match property {
            VariantProperty::Theme => self.theme.as_deref(),
            VariantProperty::Type => self.r#type.as_deref(),
            VariantProperty::State => self.state.as_deref(),
            VariantProperty::Activity => self.activity.as_deref(),
            VariantProperty::Layout => self.layout.as_deref(),
            VariantProperty::Size => self.size.as_deref(),
        }
    }

    pub fn set(&mut self, property: VariantProperty, value: Option<String>) {
        let slot = match property {
            VariantProperty::Theme => &mut self.theme,
            VariantProperty::Type => &mut self.r#type,
            VariantProperty::State => &mut self.state,
            VariantProperty::Activity => &mut self.activity,
            VariantProperty::Layout => &mut self.layout,
            VariantProperty::Size => &mut self.size,
        };
        *slot = value;
    }

    pub fn is_layout(&self) -> bool {
        self.layout.is_some() || self.size.is_some()
    }

    /// Axes that make up the id of this variant, in id order.
    pub fn id_axes(&self) -> &'static [VariantProperty] {
        if self.is_layout() {
            &[VariantProperty::Layout, VariantProperty::Size]
        } else {
            &[
                VariantProperty::Theme,
                VariantProperty::Type,
                VariantProperty::State,
                VariantProperty::Activity,
            ]
        }
    }

    /// Deterministic id built from the present axis values, e.g.
    /// `design-theme-light-state-hover`.
    pub fn component_id(&self) -> String {
        let mut id = String::from(if self.is_layout() { "layout" } else { "design" });
        for property in self.id_axes() {
            if let Some(value) = self.get(*property) {
                id.push('-');
                id.push_str(&property.as_str().to_ascii_lowercase());
                id.push('-');
                id.push_str(value);
            }
        }
        id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "componentType", rename_all = "lowercase")]
pub enum Component {
    Design(DesignComponent),
    Layout(LayoutComponent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignComponent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(default)]
    pub parts: ComponentParts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutComponent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub parts: ComponentParts,
}

impl Component {
    pub fn id(&self) -> &str {
        match self {
            Component::Design(c) => &c.id,
            Component::Layout(c) => &c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Component::Design(c) => &c.name,
            Component::Layout(c) => &c.name,
        }
    }

    pub fn parts(&self) -> &ComponentParts {
        match self {
            Component::Design(c) => &c.parts,
            Component::Layout(c) => &c.parts,
        }
    }

    pub fn variant_values(&self) -> VariantValues {
        match self {
            Component::Design(c) => VariantValues {
                theme: c.theme.clone(),
                r#type: c.r#type.clone(),
                state: c.state.clone(),
                activity: c.activity.clone(),
                ..VariantValues::default()
            },
            Component::Layout(c) => VariantValues {
                layout: c.layout.clone(),
                size: c.size.clone(),
                ..VariantValues::default()
            },
        }
    }
}

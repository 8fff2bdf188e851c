//! Figma document node types.
//!
//! These mirror the subset of the Figma REST API node payload that the
//! extractors read. Nodes are rebuilt on every fetch and never mutated.

use serde::{Deserialize, Serialize};

/// Kind of a Figma node (`type` in the API payload).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Canvas,
    #[default]
    Frame,
    Group,
    Vector,
    BooleanOperation,
    Star,
    Line,
    Ellipse,
    RegularPolygon,
    Rectangle,
    Text,
    Slice,
    Component,
    ComponentSet,
    Instance,
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    pub const ALL: [NodeKind; 16] = [
        NodeKind::Document,
        NodeKind::Canvas,
        NodeKind::Frame,
        NodeKind::Group,
        NodeKind::Vector,
        NodeKind::BooleanOperation,
        NodeKind::Star,
        NodeKind::Line,
        NodeKind::Ellipse,
        NodeKind::RegularPolygon,
        NodeKind::Rectangle,
        NodeKind::Text,
        NodeKind::Slice,
        NodeKind::Component,
        NodeKind::ComponentSet,
        NodeKind::Instance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "DOCUMENT",
            NodeKind::Canvas => "CANVAS",
            NodeKind::Frame => "FRAME",
            NodeKind::Group => "GROUP",
            NodeKind::Vector => "VECTOR",
            NodeKind::BooleanOperation => "BOOLEAN_OPERATION",
            NodeKind::Star => "STAR",
            NodeKind::Line => "LINE",
            NodeKind::Ellipse => "ELLIPSE",
            NodeKind::RegularPolygon => "REGULAR_POLYGON",
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Text => "TEXT",
            NodeKind::Slice => "SLICE",
            NodeKind::Component => "COMPONENT",
            NodeKind::ComponentSet => "COMPONENT_SET",
            NodeKind::Instance => "INSTANCE",
            NodeKind::Unknown => "UNKNOWN",
        }
    }

    /// Whitelisted kind for an API/query type name. `UNKNOWN` is never valid.
    pub fn from_name(name: &str) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Kinds that lay out children and therefore carry padding/spacing.
    pub fn has_auto_layout(&self) -> bool {
        matches!(
            self,
            NodeKind::Frame | NodeKind::Component | NodeKind::ComponentSet | NodeKind::Instance
        )
    }
}

/// A single node of a Figma document tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    /// Text style (TEXT nodes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<TypeStyle>,
    /// Text content (TEXT nodes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<Rectangle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

/// 2D point or vector in Figma's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// RGBA color with channels in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    #[default]
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Emoji,
    Video,
    #[serde(other)]
    Unknown,
}

impl PaintKind {
    /// Only linear and radial gradients have a CSS rendition.
    pub fn is_supported_gradient(&self) -> bool {
        matches!(self, PaintKind::GradientLinear | PaintKind::GradientRadial)
    }
}

/// A fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: PaintKind,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default = "default_blend_mode")]
    pub blend_mode: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradient_handle_positions: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradient_stops: Vec<ColorStop>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            kind: PaintKind::Solid,
            visible: true,
            opacity: default_opacity(),
            color: None,
            blend_mode: default_blend_mode(),
            gradient_handle_positions: Vec::new(),
            gradient_stops: Vec::new(),
        }
    }
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    InnerShadow,
    DropShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Unknown,
}

impl EffectKind {
    pub fn is_shadow(&self) -> bool {
        matches!(self, EffectKind::InnerShadow | EffectKind::DropShadow)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    #[default]
    Left,
    Right,
    Center,
    Justified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignVertical {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
    SmallCapsForced,
}

/// Figma text style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeStyle {
    pub font_family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_post_script_name: Option<String>,
    pub font_weight: f64,
    pub font_size: f64,
    pub line_height_px: f64,
    pub letter_spacing: f64,
    pub text_align_horizontal: TextAlignHorizontal,
    pub text_align_vertical: TextAlignVertical,
    pub text_decoration: TextDecoration,
    pub text_case: TextCase,
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

fn default_blend_mode() -> String {
    "NORMAL".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "id": "1:2",
            "name": "Button",
            "type": "INSTANCE",
            "paddingLeft": 16,
            "fills": [{"type": "SOLID", "color": {"r": 1, "g": 0, "b": 0, "a": 1}}],
            "children": [
                {"id": "1:3", "name": "Label", "type": "TEXT", "characters": "Click",
                 "style": {"fontFamily": "Inter", "fontSize": 14, "fontWeight": 500,
                           "textDecoration": "UNDERLINE"}},
                {"id": "1:4", "name": "Sticker", "type": "STICKY"}
            ]
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind, NodeKind::Instance);
        assert_eq!(node.padding_left, Some(16.0));
        assert!(node.fills[0].visible);
        assert_eq!(node.fills[0].blend_mode, "NORMAL");
        let style = node.children[0].style.as_ref().unwrap();
        assert_eq!(style.text_decoration, TextDecoration::Underline);
        assert_eq!(style.text_case, TextCase::Original);
        assert_eq!(node.children[1].kind, NodeKind::Unknown);
    }

    #[test]
    fn from_name_rejects_unknown_kinds() {
        assert_eq!(NodeKind::from_name("FRAME"), Some(NodeKind::Frame));
        assert_eq!(NodeKind::from_name("frame"), None);
        assert_eq!(NodeKind::from_name("UNKNOWN"), None);
    }
}

//! Data types used throughout the Handoff library.
//!
//! This module is organized by domain:
//! - [`node`] - Figma document nodes (paints, effects, text styles)
//! - [`exportable`] - User-authored exportable definitions
//! - [`tokens`] - Token sets extracted from nodes
//! - [`component`] - Normalized component records
//! - [`documentation`] - The documentation object and its design tokens/assets
//! - [`changelog`] - Changelog records

pub mod changelog;
pub mod component;
pub mod documentation;
pub mod exportable;
pub mod node;
pub mod tokens;

pub use changelog::{AssetChanges, ChangeEntry, ChangelogRecord, DesignChanges};
pub use component::{
    Component, ComponentParts, DesignComponent, LayoutComponent, VariantProperty, VariantValues,
};
pub use documentation::{
    AssetObject, AssetsObject, ColorObject, DesignObject, DocumentationObject, EffectObject,
    EffectValue, TypographyObject,
};
pub use exportable::{
    ExportableDefinition, ExportableOptions, ExportablePart, ExporterOptions, RawExportable,
    TokenRule, TransformerOptions,
};
pub use node::{
    Color, ColorStop, Effect, EffectKind, Node, NodeKind, Paint, PaintKind, Rectangle,
    TextAlignHorizontal, TextAlignVertical, TextCase, TextDecoration, TypeStyle, Vector,
};
pub use tokens::{
    BackgroundTokenSet, BorderTokenSet, EffectTokenSet, FillTokenSet, OpacityTokenSet,
    PropertyKind, SizeTokenSet, SpacingTokenSet, TokenSet, TypographyTokenSet,
};

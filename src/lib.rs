//! Handoff: design tokens, component variants and assets from Figma.
//!
//! The pipeline fetches a Figma file through [`DesignApi`], reduces variant
//! component sets into normalized [`Component`]s, extracts colors,
//! typography and effects from published styles, exports icons and logos,
//! and assembles everything into a [`DocumentationObject`]. Two snapshots
//! diff into a [`ChangelogRecord`]; [`transform_tokens`] renders CSS/SCSS.

pub mod changelog;
pub mod config;
pub mod css;
pub mod documentation;
pub mod error;
pub mod extract;
pub mod figma_client;
pub mod geometry;
pub mod logging;
pub mod output;
pub mod transform;
pub mod types;

pub use changelog::{diff, generate_changelog};
pub use config::{load_exportables, resolve_token, Config, FigmaSettings};
pub use documentation::build_documentation_object;
pub use error::{ErrorCategory, ErrorPayload, HandoffError, Result};
pub use extract::{zip_assets, PathQuery};
pub use figma_client::{ComponentMetadata, DesignApi, FigmaClient, ImageFormat, StyleMetadata};
pub use geometry::GeometryError;
pub use output::{
    DiffOutput, ErrorOutput, ExtractionCounts, FetchOutput, HandoffOutput, TransformOutput,
    HANDOFF_OUTPUT_VERSION,
};
pub use transform::{transform_tokens, TransformedTokens};
pub use types::{
    ChangelogRecord, Component, DocumentationObject, ExportableDefinition, Node, TokenSet,
};

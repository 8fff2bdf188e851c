//! Extraction of components, design tokens and assets from Figma nodes.
//!
//! - [`predicates`] - node tests and depth-first searches
//! - [`path_query`] - the `FRAME[name="X"] > TEXT` locator grammar
//! - [`token_sets`] - token sets from resolved nodes
//! - [`variants`] - variant names to normalized components
//! - [`design`] - colors, typography and effects from published styles
//! - [`assets`] - icon/logo SVG export and zipping

pub mod assets;
pub mod design;
pub mod path_query;
pub mod predicates;
pub mod token_sets;
pub mod variants;

pub use assets::{export_assets, zip_assets, ICONS_FRAME, LOGOS_FRAME};
pub use design::{design_object_from_nodes, extract_design_tokens};
pub use path_query::{PathQuery, Segment};
pub use token_sets::{extract_part_tokens, extract_token_set};
pub use variants::{build_components, parse_variant_axes, variant_values, VariantAxis};

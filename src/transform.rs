//! CSS custom properties and SCSS variables from a documentation object.
//!
//! Design tokens become one block under the default root selector. Each
//! exportable's components become a block under that exportable's selector,
//! one variable per CSS property:
//! `--{prefix}-{exportable}-{axis values}-{part}-{property}`, where the root
//! part `$` adds no segment.

use std::fmt::Write as FmtWrite;

use crate::css::{effects_to_css, fills_to_css, format_number, text_case_to_css, text_decoration_to_css};
use crate::error::Result;
use crate::types::{
    Component, DocumentationObject, ExportableDefinition, TextAlignHorizontal, TokenSet,
    TransformerOptions,
};

const ROOT_PART: &str = "$";
const DEFAULT_ROOT_SELECTOR: &str = ":root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenVariable {
    /// Name without the `--`/`$` sigil
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBlock {
    /// `design` or an exportable id
    pub label: String,
    pub selector: String,
    pub variables: Vec<TokenVariable>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformedTokens {
    pub blocks: Vec<TokenBlock>,
}

impl TransformedTokens {
    pub fn variable_count(&self) -> usize {
        self.blocks.iter().map(|b| b.variables.len()).sum()
    }

    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if !out.is_empty() {
                out.push('\n');
            }
            writeln!(out, "/* {} */", block.label).ok();
            writeln!(out, "{} {{", block.selector).ok();
            for var in &block.variables {
                writeln!(out, "  --{}: {};", var.name, var.value).ok();
            }
            out.push_str("}\n");
        }
        out
    }

    pub fn to_scss(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            if !out.is_empty() {
                out.push('\n');
            }
            writeln!(out, "// {}", block.label).ok();
            for var in &block.variables {
                writeln!(out, "${}: {};", var.name, var.value).ok();
            }
        }
        out
    }
}

/// Transforms `doc`, taking per-exportable selector and prefix from
/// `exportables` and falling back to `defaults` for unknown ids.
pub fn transform_tokens(
    doc: &DocumentationObject,
    exportables: &[ExportableDefinition],
    defaults: &TransformerOptions,
) -> Result<TransformedTokens> {
    let root = defaults
        .root_selector
        .clone()
        .unwrap_or_else(|| DEFAULT_ROOT_SELECTOR.to_string());

    let mut blocks = vec![TokenBlock {
        label: "design".to_string(),
        selector: root,
        variables: design_variables(doc),
    }];

    for (exportable_id, components) in &doc.components {
        let options = exportables
            .iter()
            .find(|e| &e.id == exportable_id)
            .map(|e| e.transformer.merge_over(defaults))
            .unwrap_or_else(|| defaults.clone());
        let mut variables = Vec::new();
        for component in components {
            variables.extend(component_variables(
                exportable_id,
                options.token_prefix.as_deref(),
                component,
            )?);
        }
        blocks.push(TokenBlock {
            label: exportable_id.clone(),
            selector: options
                .root_selector
                .unwrap_or_else(|| DEFAULT_ROOT_SELECTOR.to_string()),
            variables,
        });
    }
    Ok(TransformedTokens { blocks })
}

fn design_variables(doc: &DocumentationObject) -> Vec<TokenVariable> {
    let mut vars = Vec::new();
    for color in &doc.design.color {
        vars.push(variable(sass_base(&color.sass), color.value.clone()));
    }
    for typography in &doc.design.typography {
        let base = sass_base(&typography.sass);
        let style = &typography.values;
        vars.push(variable(format!("{base}-font-family"), style.font_family.clone()));
        vars.push(variable(format!("{base}-font-size"), px(style.font_size)));
        vars.push(variable(format!("{base}-font-weight"), format_number(style.font_weight)));
        vars.push(variable(format!("{base}-line-height"), px(style.line_height_px)));
        vars.push(variable(format!("{base}-letter-spacing"), px(style.letter_spacing)));
    }
    for effect in &doc.design.effect {
        let value = effect
            .effects
            .iter()
            .map(|e| e.value.as_str())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        vars.push(variable(sass_base(&effect.sass), value));
    }
    vars
}

/// One variable per CSS property of every token set of `component`.
pub fn component_variables(
    exportable_id: &str,
    prefix: Option<&str>,
    component: &Component,
) -> Result<Vec<TokenVariable>> {
    let mut base: Vec<String> = Vec::new();
    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        base.push(prefix.to_string());
    }
    base.push(exportable_id.to_string());
    let values = component.variant_values();
    for axis in values.id_axes() {
        if let Some(value) = values.get(*axis) {
            base.push(value.to_string());
        }
    }

    let mut vars = Vec::new();
    for (part, sets) in component.parts() {
        let mut segments = base.clone();
        if part != ROOT_PART {
            segments.push(part.clone());
        }
        let stem = segments.join("-");
        for set in sets {
            for (property, value) in token_set_properties(set)? {
                vars.push(variable(format!("{stem}-{property}"), value));
            }
        }
    }
    Ok(vars)
}

/// CSS property/value pairs of one token set; absent or empty values are skipped.
pub fn token_set_properties(set: &TokenSet) -> Result<Vec<(&'static str, String)>> {
    let mut props: Vec<(&'static str, String)> = Vec::new();
    match set {
        TokenSet::Fill(fill) => {
            if let Some(paints) = &fill.color {
                push_non_empty(&mut props, "color", fills_to_css(paints)?.value);
            }
        }
        TokenSet::Background(bg) => {
            if let Some(paints) = &bg.background {
                push_non_empty(&mut props, "background", fills_to_css(paints)?.value);
            }
        }
        TokenSet::Border(border) => {
            if let Some(weight) = border.weight {
                props.push(("border-width", px(weight)));
            }
            if let Some(radius) = border.radius {
                props.push(("border-radius", px(radius)));
            }
            if let Some(strokes) = &border.strokes {
                push_non_empty(&mut props, "border-color", fills_to_css(strokes)?.value);
            }
        }
        TokenSet::Spacing(spacing) => {
            for (name, value) in [
                ("padding-top", spacing.padding_top),
                ("padding-right", spacing.padding_right),
                ("padding-bottom", spacing.padding_bottom),
                ("padding-left", spacing.padding_left),
                ("gap", spacing.spacing),
            ] {
                if let Some(value) = value {
                    props.push((name, px(value)));
                }
            }
        }
        TokenSet::Typography(t) => {
            if let Some(family) = &t.font_family {
                push_non_empty(&mut props, "font-family", family.clone());
            }
            if let Some(size) = t.font_size {
                props.push(("font-size", px(size)));
            }
            if let Some(weight) = t.font_weight {
                props.push(("font-weight", format_number(weight)));
            }
            if let Some(line_height) = t.line_height {
                props.push(("line-height", px(line_height)));
            }
            if let Some(spacing) = t.letter_spacing {
                props.push(("letter-spacing", px(spacing)));
            }
            if let Some(align) = t.text_align_horizontal {
                props.push(("text-align", text_align_to_css(align).to_string()));
            }
            if let Some(decoration) = t.text_decoration {
                props.push(("text-decoration", text_decoration_to_css(decoration).to_string()));
            }
            if let Some(case) = t.text_case {
                props.push(("text-transform", text_case_to_css(case).to_string()));
            }
        }
        TokenSet::Effect(effect) => {
            if let Some(effects) = &effect.effect {
                push_non_empty(&mut props, "box-shadow", effects_to_css(effects));
            }
        }
        TokenSet::Opacity(opacity) => {
            if let Some(value) = opacity.opacity {
                props.push(("opacity", format_number(value)));
            }
        }
        TokenSet::Size(size) => {
            if let Some(width) = size.width {
                props.push(("width", px(width)));
            }
            if let Some(height) = size.height {
                props.push(("height", px(height)));
            }
        }
    }
    Ok(props)
}

fn text_align_to_css(align: TextAlignHorizontal) -> &'static str {
    match align {
        TextAlignHorizontal::Left => "left",
        TextAlignHorizontal::Right => "right",
        TextAlignHorizontal::Center => "center",
        TextAlignHorizontal::Justified => "justify",
    }
}

fn push_non_empty(props: &mut Vec<(&'static str, String)>, name: &'static str, value: String) {
    if !value.is_empty() {
        props.push((name, value));
    }
}

fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

fn sass_base(sass: &str) -> String {
    sass.trim_start_matches('$').to_string()
}

fn variable(name: String, value: String) -> TokenVariable {
    TokenVariable { name, value }
}

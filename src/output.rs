//! Machine-readable command output.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::types::ChangelogRecord;

pub const HANDOFF_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum HandoffOutput {
    Fetch(FetchOutput),
    Diff(DiffOutput),
    Transform(TransformOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionCounts {
    pub colors: usize,
    pub typography: usize,
    pub effects: usize,
    pub components: usize,
    pub icons: usize,
    pub logos: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutput {
    pub version: String,
    pub project_id: String,
    pub output_dir: PathBuf,
    pub counts: ExtractionCounts,
    /// Whether a changelog entry was recorded for this run
    pub changelog: bool,
    pub requests: u64,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffOutput {
    pub version: String,
    pub prev: PathBuf,
    pub new: PathBuf,
    /// `null` when the snapshots are equivalent
    pub changelog: Option<ChangelogRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub version: String,
    pub input: PathBuf,
    pub variables: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

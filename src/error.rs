use crate::geometry::GeometryError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("No instance node found for component `{component}`")]
    MissingInstance { component: String },

    #[error("Exportable error: {0}")]
    Exportable(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl HandoffError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        HandoffError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn missing_instance(component: impl Into<String>) -> Self {
        HandoffError::MissingInstance {
            component: component.into(),
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            HandoffError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            HandoffError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            HandoffError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify the Figma base URL (e.g., https://api.figma.com/v1/).",
            ),
            HandoffError::FigmaApi { status, message } => ErrorPayload::new(
                ErrorCategory::Figma,
                format!("Figma API error (status {:?}): {}", status, message),
                "Check the Figma file id, the access token and that the token can read the file.",
            ),
            HandoffError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON inputs (tokens.json, exportables); run with --verbose for details.",
            ),
            HandoffError::Geometry(e) => ErrorPayload::new(
                ErrorCategory::Figma,
                e.to_string(),
                "A gradient in the Figma file has malformed handles; recreate it and retry.",
            ),
            HandoffError::MissingInstance { .. } => ErrorPayload::new(
                ErrorCategory::Exportable,
                self.to_string(),
                "Each design variant needs an instance inside it; check the exportable definition.",
            ),
            HandoffError::Exportable(msg) => ErrorPayload::new(
                ErrorCategory::Exportable,
                msg.to_string(),
                "Check the exportable definition files.",
            ),
            HandoffError::Archive(e) => ErrorPayload::new(
                ErrorCategory::Figma,
                e.to_string(),
                "Icon or logo data could not be packed; check the asset components in the Icons/Logo frames.",
            ),
            HandoffError::Config(msg) => ErrorPayload::new(
                ErrorCategory::Config,
                msg.to_string(),
                "Check flags/paths and the HANDOFF_* environment variables.",
            ),
            HandoffError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, HandoffError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Figma,
    Exportable,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

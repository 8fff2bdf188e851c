//! Figma REST API client.
//!
//! [`DesignApi`] is the surface the extractors use; [`FigmaClient`] is the
//! HTTP implementation. Transient failures (connection errors, 429, 5xx) are
//! retried with exponential backoff; everything else surfaces as
//! [`HandoffError::FigmaApi`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::FigmaSettings;
use crate::error::{HandoffError, Result};
use crate::types::Node;

const TOKEN_HEADER: &str = "X-Figma-Token";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    #[serde(default)]
    pub key: String,
    pub node_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing_frame: Option<ContainingFrame>,
}

impl ComponentMetadata {
    pub fn frame_name(&self) -> &str {
        self.containing_frame
            .as_ref()
            .and_then(|frame| frame.name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainingFrame {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub page_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleMetadata {
    #[serde(default)]
    pub key: String,
    pub node_id: String,
    #[serde(default)]
    pub style_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_position: String,
}

#[derive(Debug, Deserialize)]
struct ComponentsResponse {
    meta: ComponentsMeta,
}

#[derive(Debug, Default, Deserialize)]
struct ComponentsMeta {
    #[serde(default)]
    components: Vec<ComponentMetadata>,
    #[serde(default)]
    component_sets: Vec<ComponentMetadata>,
}

#[derive(Debug, Deserialize)]
struct StylesResponse {
    meta: StylesMeta,
}

#[derive(Debug, Default, Deserialize)]
struct StylesMeta {
    #[serde(default)]
    styles: Vec<StyleMetadata>,
}

#[derive(Debug, Deserialize)]
struct NodesResponse {
    #[serde(default)]
    nodes: HashMap<String, Option<NodeDocument>>,
}

#[derive(Debug, Deserialize)]
struct NodeDocument {
    document: Node,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    images: HashMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
    Jpg,
    Pdf,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

/// Read access to one Figma file.
#[async_trait]
pub trait DesignApi: Send + Sync {
    async fn get_file_components(&self) -> Result<Vec<ComponentMetadata>>;

    /// Document nodes by id; ids Figma returns as `null` are left out.
    async fn get_file_nodes(&self, ids: &[String]) -> Result<HashMap<String, Node>>;

    /// Render URLs by node id.
    async fn get_asset_urls(
        &self,
        ids: &[String],
        format: ImageFormat,
    ) -> Result<HashMap<String, Option<String>>>;

    async fn get_file_styles(&self) -> Result<Vec<StyleMetadata>>;

    async fn get_component_sets(&self) -> Result<Vec<ComponentMetadata>>;

    async fn get_component_set_nodes(&self, ids: &[String]) -> Result<HashMap<String, Node>>;

    /// Plain GET of an asset URL returned by [`DesignApi::get_asset_urls`].
    async fn download_text(&self, url: &str) -> Result<String>;
}

pub struct FigmaClient {
    http: reqwest::Client,
    base_url: Url,
    file_id: String,
    token: String,
    retries: u32,
    retry_backoff: Duration,
    requests: AtomicU64,
}

impl FigmaClient {
    pub fn new(
        file_id: impl Into<String>,
        token: impl Into<String>,
        settings: &FigmaSettings,
    ) -> Result<Self> {
        let mut base = settings.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            file_id: file_id.into(),
            token: token.into(),
            retries: settings.retries,
            retry_backoff: settings.retry_backoff,
            requests: AtomicU64::new(0),
        })
    }

    /// Requests sent so far, retries included.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.send(url, true).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send(&self, url: Url, authorize: bool) -> Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            self.requests.fetch_add(1, Ordering::Relaxed);
            let mut request = self.http.get(url.clone());
            if authorize {
                request = request.header(TOKEN_HEADER, &self.token);
            }
            match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if is_retryable(response.status()) && attempt < self.retries => {
                    tracing::warn!(
                        "GET {} returned {}; retrying ({}/{})",
                        url.path(),
                        response.status(),
                        attempt + 1,
                        self.retries
                    );
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(HandoffError::figma_api(Some(status), error_message(&body)));
                }
                Err(err) if (err.is_connect() || err.is_timeout()) && attempt < self.retries => {
                    tracing::warn!(
                        "GET {} failed: {}; retrying ({}/{})",
                        url.path(),
                        err,
                        attempt + 1,
                        self.retries
                    );
                }
                Err(err) => return Err(err.into()),
            }
            tokio::time::sleep(self.retry_backoff * 2u32.saturating_pow(attempt)).await;
            attempt += 1;
        }
    }

    async fn nodes(&self, ids: &[String]) -> Result<HashMap<String, Node>> {
        let url = self.endpoint(
            &format!("files/{}/nodes", self.file_id),
            &[("ids", ids.join(","))],
        )?;
        let response: NodesResponse = self.get_json(url).await?;
        Ok(response
            .nodes
            .into_iter()
            .filter_map(|(id, doc)| doc.map(|doc| (id, doc.document)))
            .collect())
    }
}

#[async_trait]
impl DesignApi for FigmaClient {
    async fn get_file_components(&self) -> Result<Vec<ComponentMetadata>> {
        let url = self.endpoint(&format!("files/{}/components", self.file_id), &[])?;
        let response: ComponentsResponse = self.get_json(url).await?;
        Ok(response.meta.components)
    }

    async fn get_file_nodes(&self, ids: &[String]) -> Result<HashMap<String, Node>> {
        self.nodes(ids).await
    }

    async fn get_asset_urls(
        &self,
        ids: &[String],
        format: ImageFormat,
    ) -> Result<HashMap<String, Option<String>>> {
        let url = self.endpoint(
            &format!("images/{}", self.file_id),
            &[("ids", ids.join(",")), ("format", format.as_str().to_string())],
        )?;
        let response: ImagesResponse = self.get_json(url).await?;
        if let Some(err) = response.err.filter(|e| !e.is_empty()) {
            return Err(HandoffError::figma_api(None, err));
        }
        Ok(response.images)
    }

    async fn get_file_styles(&self) -> Result<Vec<StyleMetadata>> {
        let url = self.endpoint(&format!("files/{}/styles", self.file_id), &[])?;
        let response: StylesResponse = self.get_json(url).await?;
        Ok(response.meta.styles)
    }

    async fn get_component_sets(&self) -> Result<Vec<ComponentMetadata>> {
        let url = self.endpoint(&format!("files/{}/component_sets", self.file_id), &[])?;
        let response: ComponentsResponse = self.get_json(url).await?;
        Ok(response.meta.component_sets)
    }

    async fn get_component_set_nodes(&self, ids: &[String]) -> Result<HashMap<String, Node>> {
        self.nodes(ids).await
    }

    async fn download_text(&self, url: &str) -> Result<String> {
        let response = self.send(Url::parse(url)?, false).await?;
        Ok(response.text().await?)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.err.or(b.message))
        .unwrap_or_else(|| body.trim().to_string())
}

//! Run configuration and exportable definition loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HandoffError, Result};
use crate::types::{
    ExportableDefinition, ExportableOptions, ExporterOptions, RawExportable, TransformerOptions,
};

pub const DEFAULT_FIGMA_BASE_URL: &str = "https://api.figma.com/v1/";
pub const ENV_BASE_URL: &str = "HANDOFF_FIGMA_BASE_URL";
pub const ENV_PROJECT_ID: &str = "HANDOFF_FIGMA_PROJECT_ID";
pub const ENV_ACCESS_TOKEN: &str = "HANDOFF_DEV_ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Figma file id
    pub project_id: Option<String>,
    pub exportables_dir: PathBuf,
    pub output_dir: PathBuf,
    pub figma: FigmaSettings,
    /// Defaults for every exportable's `options.exporter`
    pub exporter: ExporterOptions,
    /// Defaults for every exportable's `options.transformer`
    pub transformer: TransformerOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigmaSettings {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub retries: u32,
    #[serde(with = "humantime_serde")]
    pub retry_backoff: Duration,
    pub asset_batch_size: usize,
}

impl Default for FigmaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FIGMA_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retries: 3,
            retry_backoff: Duration::from_millis(500),
            asset_batch_size: 50,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            exportables_dir: PathBuf::from("exportables"),
            output_dir: PathBuf::from("exported"),
            figma: FigmaSettings::default(),
            exporter: ExporterOptions {
                search: None,
                supported_variant_props: Some(vec![
                    "THEME".to_string(),
                    "TYPE".to_string(),
                    "STATE".to_string(),
                    "ACTIVITY".to_string(),
                ]),
            },
            transformer: TransformerOptions {
                root_selector: Some(":root".to_string()),
                token_prefix: None,
            },
        }
    }
}

impl Config {
    pub fn from_toml_file(path: &Path) -> std::result::Result<Self, String> {
        let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        toml::from_str(&raw).map_err(|e| e.to_string())
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.figma.base_url.trim().is_empty() {
            return Err("figma.base_url must not be empty".to_string());
        }
        url::Url::parse(&self.figma.base_url)
            .map_err(|e| format!("figma.base_url is not a valid URL: {e}"))?;
        if self.figma.asset_batch_size == 0 {
            return Err("figma.asset_batch_size must be at least 1".to_string());
        }
        Ok(())
    }

    /// Applies `HANDOFF_*` overrides. `lookup` is usually `std::env::var(..).ok()`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.figma.base_url = base_url;
        }
        if let Some(project_id) = lookup(ENV_PROJECT_ID).filter(|v| !v.is_empty()) {
            self.project_id = Some(project_id);
        }
    }

    pub fn exportable_defaults(&self) -> ExportableOptions {
        ExportableOptions {
            exporter: self.exporter.clone(),
            transformer: self.transformer.clone(),
        }
    }
}

/// Access token from the flag, falling back to `HANDOFF_DEV_ACCESS_TOKEN`.
pub fn resolve_token(
    cli: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    cli.or_else(|| lookup(ENV_ACCESS_TOKEN))
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            HandoffError::Config(format!(
                "Missing Figma access token; pass --token or set {ENV_ACCESS_TOKEN}"
            ))
        })
}

/// Loads every `*.json`, `*.yaml` and `*.yml` definition in `dir`, sorted by
/// file name. Definitions that fail to parse or resolve are logged and skipped.
pub fn load_exportables(dir: &Path, defaults: &ExportableOptions) -> Result<Vec<ExportableDefinition>> {
    if !dir.exists() {
        tracing::warn!("exportables directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("json" | "yaml" | "yml")
            )
        })
        .collect();
    paths.sort();

    let mut exportables = Vec::new();
    for path in paths {
        match read_exportable(&path).and_then(|raw| raw.resolve(defaults)) {
            Ok(def) => exportables.push(def),
            Err(err) => {
                tracing::error!("skipping exportable {}: {}", path.display(), err);
            }
        }
    }
    Ok(exportables)
}

fn read_exportable(path: &Path) -> std::result::Result<RawExportable, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&raw).map_err(|e| e.to_string()),
        _ => serde_yaml::from_str(&raw).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn parses_toml_with_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("handoff.toml");
        std::fs::write(
            &path,
            r#"
project_id = "abc"
[figma]
timeout = "5s"
retry_backoff = "100ms"
[exporter]
supported_variant_props = ["THEME", "STATE(disabled)"]
"#,
        )
        .unwrap();
        let cfg = Config::from_toml_file(&path).unwrap();
        assert_eq!(cfg.project_id.as_deref(), Some("abc"));
        assert_eq!(cfg.figma.timeout, Duration::from_secs(5));
        assert_eq!(cfg.figma.retry_backoff, Duration::from_millis(100));
        assert_eq!(cfg.figma.retries, 3);
        assert_eq!(
            cfg.exporter.supported_variant_props,
            Some(vec!["THEME".to_string(), "STATE(disabled)".to_string()])
        );
        assert_eq!(cfg.transformer.root_selector.as_deref(), Some(":root"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut cfg = Config::default();
        cfg.figma.base_url = "not a url".into();
        assert!(cfg.validate().is_err());
        cfg.figma.base_url = DEFAULT_FIGMA_BASE_URL.into();
        cfg.figma.asset_batch_size = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://localhost:9999/v1/"),
            (ENV_PROJECT_ID, "from-env"),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config {
            project_id: Some("from-file".into()),
            ..Config::default()
        };
        cfg.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.project_id.as_deref(), Some("from-env"));
        assert_eq!(cfg.figma.base_url, "http://localhost:9999/v1/");
    }

    #[test]
    fn token_prefers_flag() {
        let env = |key: &str| (key == ENV_ACCESS_TOKEN).then(|| "env-token".to_string());
        assert_eq!(resolve_token(Some("flag".into()), env).unwrap(), "flag");
        assert_eq!(resolve_token(None, env).unwrap(), "env-token");
        assert!(resolve_token(None, |_| None).is_err());
    }

    #[test]
    fn loads_and_skips_exportables() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(
            dir.path().join("a-button.json"),
            r#"{"id": "button", "options": {"exporter": {"search": "Buttons"}}, "parts": []}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b-alert.yaml"),
            "id: alert\noptions:\n  exporter:\n    search: Alerts\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("c-broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("d-nosearch.json"), r#"{"id": "modal"}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let defaults = Config::default().exportable_defaults();
        let loaded = load_exportables(dir.path(), &defaults).unwrap();
        let ids: Vec<&str> = loaded.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["button", "alert"]);
        assert_eq!(loaded[0].supported_variant_props.len(), 4);
    }

    #[test]
    fn missing_exportables_dir_is_empty() {
        let loaded = load_exportables(
            Path::new("/nonexistent/exportables"),
            &ExportableOptions::default(),
        )
        .unwrap();
        assert!(loaded.is_empty());
    }
}

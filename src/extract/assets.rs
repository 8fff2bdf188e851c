//! Icon and logo export: SVG download and zip packaging.

use std::collections::{HashMap, HashSet};
use std::io::{Seek, Write};

use futures::future::try_join_all;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::figma_client::{ComponentMetadata, DesignApi, ImageFormat};
use crate::types::AssetObject;

use super::predicates::normalize_name_part;

pub const ICONS_FRAME: &str = "Icons";
pub const LOGOS_FRAME: &str = "Logo";

/// Exports every component whose containing frame name contains `frame`.
///
/// URL batches and SVG bodies are fetched concurrently; any failed request
/// aborts the whole category. Output order follows the node ids.
pub async fn export_assets(
    api: &dyn DesignApi,
    frame: &str,
    batch_size: usize,
) -> Result<Vec<AssetObject>> {
    let components = api.get_file_components().await?;
    let mut selected: Vec<ComponentMetadata> = components
        .into_iter()
        .filter(|c| c.frame_name().contains(frame))
        .collect();
    if selected.is_empty() {
        tracing::debug!(frame, "no assets found");
        return Ok(Vec::new());
    }
    selected.sort_by_key(|c| node_id_key(&c.node_id));

    let ids: Vec<String> = selected.iter().map(|c| c.node_id.clone()).collect();
    let batches = try_join_all(
        ids.chunks(batch_size.max(1))
            .map(|chunk| api.get_asset_urls(chunk, ImageFormat::Svg)),
    )
    .await?;
    let urls: HashMap<String, Option<String>> = batches.into_iter().flatten().collect();

    let downloads = selected.iter().filter_map(|component| {
        let url = urls.get(&component.node_id).cloned().flatten();
        if url.is_none() {
            tracing::warn!(asset = %component.name, node = %component.node_id, "no render URL returned");
        }
        url.map(|url| async move {
            let svg = api.download_text(&url).await?;
            Ok::<_, crate::error::HandoffError>(to_asset(component, &svg))
        })
    });
    let mut assets = try_join_all(downloads).await?;
    dedupe_paths(&mut assets);
    tracing::info!(frame, count = assets.len(), "exported assets");
    Ok(assets)
}

fn to_asset(component: &ComponentMetadata, svg: &str) -> AssetObject {
    let slug = normalize_name_part(&component.name);
    let data = svg.replace(['\r', '\n'], "");
    AssetObject {
        path: format!("{slug}.svg"),
        name: component.name.clone(),
        index: slug,
        description: component.description.clone(),
        size: data.len(),
        data,
    }
}

/// Suffixes colliding slugs (`arrow-left.svg`, `arrow-left-2.svg`) so every
/// path names one zip entry and one changelog key.
fn dedupe_paths(assets: &mut [AssetObject]) {
    let mut taken = HashSet::new();
    for asset in assets.iter_mut() {
        if taken.insert(asset.path.clone()) {
            continue;
        }
        let base = asset.index.clone();
        let mut n = 2;
        while taken.contains(&format!("{base}-{n}.svg")) {
            n += 1;
        }
        tracing::warn!(asset = %asset.name, slug = %base, suffix = n, "duplicate asset name");
        asset.index = format!("{base}-{n}");
        asset.path = format!("{}.svg", asset.index);
        taken.insert(asset.path.clone());
    }
}

/// Numeric parts of a node id (`12:345` -> `[12, 345]`); non-numeric parts sort first.
fn node_id_key(node_id: &str) -> Vec<u64> {
    node_id
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

/// Writes one deflated entry per asset, named by its path.
pub fn zip_assets<W: Write + Seek>(writer: W, assets: &[AssetObject]) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));
    for asset in assets {
        zip.start_file(asset.path.as_str(), options)?;
        zip.write_all(asset.data.as_bytes())?;
    }
    Ok(zip.finish()?)
}

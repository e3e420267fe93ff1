use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;
use xxhash_rust::xxh3::xxh3_64;

use crate::models::PhotoRecord;

/// Wire shape of a photo manifest, as exported by the gallery API.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    photos: Vec<PhotoRecord>,
}

fn synthesize_photo_id(url: &str, name: &str) -> String {
    format!("{:016x}", xxh3_64(format!("{}|{}", url, name).as_bytes()))
}

/// A source string naming an http(s) endpoint is fetched; everything else
/// is treated as a local path.
fn is_http_source(source: &str) -> bool {
    Url::parse(source)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Try to load one manifest source; return Ok(None) when the file or
/// endpoint is missing, so a sparse source list degrades instead of
/// failing the run.
pub async fn load_source_opt(client: &Client, source: &str) -> Result<Option<Vec<PhotoRecord>>> {
    let start = std::time::Instant::now();

    let manifest = if is_http_source(source) {
        fetch_manifest_opt(client, source).await?
    } else {
        read_manifest_opt(source)?
    };
    let Some(manifest) = manifest else {
        return Ok(None);
    };

    let photos = normalize_photos(manifest.photos);
    let elapsed = start.elapsed();
    info!(
        "Manifest loaded - source={}, duration={:.2}s, photos={}",
        source,
        elapsed.as_secs_f32(),
        photos.len()
    );
    Ok(Some(photos))
}

async fn fetch_manifest_opt(client: &Client, url: &str) -> Result<Option<Manifest>> {
    debug!("Fetching manifest - url={}", url);

    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request failed for {}", url))?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        warn!("Manifest not found (404) - {}", url);
        return Ok(None);
    }

    let resp = resp
        .error_for_status()
        .with_context(|| format!("HTTP error for {}", url))?;

    let manifest = resp
        .json()
        .await
        .with_context(|| format!("Decoding JSON for {}", url))?;
    Ok(Some(manifest))
}

fn read_manifest_opt(path: &str) -> Result<Option<Manifest>> {
    debug!("Reading manifest - path={}", path);

    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("Manifest not found - {}", path);
            return Ok(None);
        }
        Err(err) => return Err(err).with_context(|| format!("Reading {}", path)),
    };

    let manifest =
        serde_json::from_slice(&raw).with_context(|| format!("Decoding JSON for {}", path))?;
    Ok(Some(manifest))
}

/// Trims display names and synthesizes ids for records that arrive without
/// one, so no photo is dropped over sparse metadata.
pub fn normalize_photos(mut photos: Vec<PhotoRecord>) -> Vec<PhotoRecord> {
    for photo in photos.iter_mut() {
        photo.name = photo.name.trim().to_string();
        if photo.id.trim().is_empty() {
            photo.id = synthesize_photo_id(&photo.url, &photo.name);
            debug!("Synthesized photo id - id={}, name={}", photo.id, photo.name);
        }
    }
    photos
}

/// Pools every source's batch into one collection, keeping the first record
/// seen for each id (the same photo may appear in several manifests).
pub fn pool_unique(batches: Vec<Vec<PhotoRecord>>) -> Vec<PhotoRecord> {
    let mut photos: Vec<PhotoRecord> = batches.into_iter().flatten().collect();
    let before = photos.len();

    let mut seen: HashSet<String> = HashSet::new();
    photos.retain(|photo| seen.insert(photo.id.clone()));

    let removed = before - photos.len();
    if removed > 0 {
        info!(
            "Deduplication - removed={} duplicates, retained={} unique photos",
            removed,
            photos.len()
        );
    } else {
        debug!("Deduplication - no duplicates found, retained={} photos", photos.len());
    }
    photos
}

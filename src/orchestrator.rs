use anyhow::{Context, Result};
use chrono::Utc;
use itertools::Itertools;
use reqwest::Client;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::cluster::{self, Cluster};
use crate::color;
use crate::fetch;
use crate::models::{CurationAlgorithm, CurationOptions, EnrichedPhoto, PhotoRecord};
use crate::out_models::Album;
use crate::render::render_run_markdown;
use crate::roles::NarrativeRole;
use crate::score;
use crate::sequence;

/// Curates a photo collection into one or more ordered albums, best first.
/// Pure and synchronous: input records are never mutated, no input shape
/// errors or panics, and an empty collection yields an empty list.
pub fn curate(photos: &[PhotoRecord], options: &CurationOptions) -> Vec<Album> {
    if photos.is_empty() {
        debug!("Curation skipped - empty photo collection");
        return Vec::new();
    }
    let max_photos = options.max_photos.max(1);
    debug!(
        "Curation started - algorithm={}, photos={}, max_photos={}",
        options.algorithm,
        photos.len(),
        max_photos
    );

    match options.algorithm {
        CurationAlgorithm::BestShots => vec![curate_best_shots(photos, max_photos)],
        CurationAlgorithm::Chronological => vec![curate_chronological(photos, max_photos)],
        CurationAlgorithm::ColorStory => {
            curate_color_story(photos, max_photos, options.color_threshold)
        }
        CurationAlgorithm::ArtisticFlow => curate_artistic_flow(photos, max_photos),
    }
}

fn curate_best_shots(photos: &[PhotoRecord], max_photos: usize) -> Album {
    let mut enriched = enrich(photos);
    sequence::by_overall_score(&mut enriched);
    enriched.truncate(max_photos);
    let algorithm = CurationAlgorithm::BestShots;
    assemble_album(algorithm.label().to_string(), algorithm, strip(enriched))
}

fn curate_chronological(photos: &[PhotoRecord], max_photos: usize) -> Album {
    let mut enriched = enrich(photos);
    sequence::by_capture_order(&mut enriched);
    enriched.truncate(max_photos);
    let algorithm = CurationAlgorithm::Chronological;
    assemble_album(algorithm.label().to_string(), algorithm, strip(enriched))
}

fn curate_color_story(
    photos: &[PhotoRecord],
    max_photos: usize,
    color_threshold: f32,
) -> Vec<Album> {
    let algorithm = CurationAlgorithm::ColorStory;
    let mut enriched = enrich(photos);
    for photo in enriched.iter_mut() {
        photo.base_color = color::parse_first(&photo.traits.dominant_colors);
    }

    if enriched.iter().all(|p| p.base_color.is_none()) {
        info!("No parseable colors in the collection - returning an uncurated album");
        return vec![fallback_album(photos, algorithm, max_photos)];
    }

    score::score_all_for_color_story(&mut enriched);
    let clusters = cluster::cluster_by_color(&enriched, max_photos, color_threshold);
    let ranked = rank_clusters(clusters, |members| {
        score::color_cluster_score(members, &enriched, max_photos)
    });

    let mut families: HashMap<&'static str, usize> = HashMap::new();
    ranked
        .into_iter()
        .map(|cluster| {
            let mut members = materialize(&cluster, &enriched);
            sequence::by_quality(&mut members);
            let name = color_story_name(&members, &mut families);
            assemble_album(name, algorithm, strip(members))
        })
        .collect()
}

fn curate_artistic_flow(photos: &[PhotoRecord], max_photos: usize) -> Vec<Album> {
    let algorithm = CurationAlgorithm::ArtisticFlow;
    let mut enriched = enrich(photos);
    for photo in enriched.iter_mut() {
        let role = NarrativeRole::classify(&photo.traits.scene, photo.traits.people_count);
        photo.role = Some(role);
        photo.quality = score::score_for_artistic_flow(photo, role);
    }

    let clusters = cluster::cluster_by_role(&enriched, max_photos);
    if clusters.is_empty() {
        info!("No viable narrative clusters - returning an uncurated album");
        return vec![fallback_album(photos, algorithm, max_photos)];
    }
    let ranked = rank_clusters(clusters, |members| {
        score::artistic_cluster_score(members, &enriched)
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, cluster)| {
            let mut members = materialize(&cluster, &enriched);
            sequence::by_narrative_arc(&mut members);
            let name = if rank == 0 {
                algorithm.label().to_string()
            } else {
                format!("{} {}", algorithm.label(), rank + 1)
            };
            assemble_album(name, algorithm, strip(members))
        })
        .collect()
}

fn enrich(photos: &[PhotoRecord]) -> Vec<EnrichedPhoto> {
    photos.iter().cloned().map(EnrichedPhoto::new).collect()
}

/// Sorts clusters by their composite score, best first. The sort is stable,
/// so equal scores keep discovery order.
fn rank_clusters<F>(clusters: Vec<Cluster>, score_of: F) -> Vec<Cluster>
where
    F: Fn(&[usize]) -> f32,
{
    let mut scored: Vec<(Cluster, f32)> = clusters
        .into_iter()
        .map(|cluster| {
            let score = score_of(&cluster.members);
            (cluster, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (rank, (cluster, score)) in scored.iter().enumerate() {
        debug!(
            "Cluster ranked - rank={}, size={}, score={:.1}",
            rank + 1,
            cluster.members.len(),
            score
        );
    }
    scored.into_iter().map(|(cluster, _)| cluster).collect()
}

fn materialize(cluster: &Cluster, enriched: &[EnrichedPhoto]) -> Vec<EnrichedPhoto> {
    cluster.members.iter().map(|&i| enriched[i].clone()).collect()
}

fn strip(photos: Vec<EnrichedPhoto>) -> Vec<PhotoRecord> {
    photos.into_iter().map(|photo| photo.record).collect()
}

/// The unclustered album returned when a strategy finds nothing viable:
/// the first `max_photos` records in input order.
fn fallback_album(
    photos: &[PhotoRecord],
    algorithm: CurationAlgorithm,
    max_photos: usize,
) -> Album {
    let kept: Vec<PhotoRecord> = photos.iter().take(max_photos).cloned().collect();
    assemble_album(algorithm.label().to_string(), algorithm, kept)
}

/// Names a color-story album after the dictionary family nearest its mean
/// color; repeat families get a running number in rank order.
fn color_story_name(
    members: &[EnrichedPhoto],
    families: &mut HashMap<&'static str, usize>,
) -> String {
    let colors: Vec<color::Rgb> = members.iter().filter_map(|p| p.base_color).collect();
    let family = match color::mean_color(&colors) {
        Some(mean) => color::family_name(mean),
        None => "neutral",
    };
    let count = families.entry(family).and_modify(|n| *n += 1).or_insert(1);
    if *count == 1 {
        format!("Color Story — {}", family)
    } else {
        format!("Color Story — {} {}", family, count)
    }
}

fn album_id(algorithm: CurationAlgorithm, photos: &[PhotoRecord]) -> String {
    let seed = std::iter::once(algorithm.slug())
        .chain(photos.iter().map(|photo| photo.id.as_str()))
        .join("|");
    format!("{:016x}", xxh3_64(seed.as_bytes()))
}

fn assemble_album(name: String, algorithm: CurationAlgorithm, photos: Vec<PhotoRecord>) -> Album {
    let now = Utc::now();
    Album {
        id: album_id(algorithm, &photos),
        name,
        description: algorithm.blurb().to_string(),
        algorithm,
        cover_photo_id: photos.first().map(|photo| photo.id.clone()),
        photos,
        created_at: now,
        updated_at: now,
    }
}

fn album_index_min(albums: &[Album]) -> String {
    let mini: Vec<_> = albums
        .iter()
        .map(|a| json!({ "id": a.id, "name": a.name, "photos": a.photos.len() }))
        .collect();
    serde_json::to_string_pretty(&mini).unwrap()
}

/// The CLI pipeline: load every manifest source, pool and dedup the photos,
/// curate, and persist albums as JSON plus a Markdown summary.
pub async fn run(sources: &[String], options: &CurationOptions, output_dir: &str) -> Result<()> {
    let pipeline_start = std::time::Instant::now();
    info!(
        "Pipeline started - algorithm={}, sources={}, max_photos={}",
        options.algorithm,
        sources.len(),
        options.max_photos
    );

    let client = Client::builder().build()?;

    // 1) load all manifest sources in parallel; missing ones degrade to warnings
    let fetch_start = std::time::Instant::now();
    let tasks: Vec<_> = sources
        .iter()
        .map(|source| fetch::load_source_opt(&client, source))
        .collect();
    let results = futures::future::join_all(tasks).await;

    let mut batches = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result? {
            Some(photos) => {
                debug!("Source loaded - source={}, photos={}", source, photos.len());
                batches.push(photos);
            }
            None => {
                warn!("Missing manifest source - {}", source);
            }
        }
    }
    let fetch_elapsed = fetch_start.elapsed();
    info!(
        "Manifest fetch completed - duration={:.2}s, loaded={}/{} sources",
        fetch_elapsed.as_secs_f32(),
        batches.len(),
        sources.len()
    );

    // 2) pool + dedup by photo id
    let photos = fetch::pool_unique(batches);
    if photos.is_empty() {
        warn!("No photos pooled from any source - outputs will be empty");
    }

    // 3) curate
    let curate_start = std::time::Instant::now();
    let albums = curate(&photos, options);
    let curate_elapsed = curate_start.elapsed();
    info!(
        "Curation completed - duration={:.2}s, albums={}, photos={}",
        curate_elapsed.as_secs_f32(),
        albums.len(),
        photos.len()
    );

    // 4) persist
    let persist_start = std::time::Instant::now();
    let out_dir = std::path::Path::new(output_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Creating output directory {}", out_dir.display()))?;
    debug!("Output directory: {}", out_dir.display());

    std::fs::write(out_dir.join("albums.json"), serde_json::to_vec_pretty(&albums)?)?;
    debug!("Wrote albums.json");

    std::fs::write(out_dir.join("albums.index.json"), album_index_min(&albums))?;
    debug!("Wrote albums.index.json");

    let summary_md = render_run_markdown(&albums, options);
    std::fs::write(out_dir.join("albums.md"), summary_md.as_bytes())?;
    debug!("Wrote albums.md");

    let persist_elapsed = persist_start.elapsed();
    info!(
        "Output persisted - duration={:.2}s, directory={}",
        persist_elapsed.as_secs_f32(),
        out_dir.display()
    );

    let pipeline_elapsed = pipeline_start.elapsed();
    info!(
        "Pipeline completed successfully - total_duration={:.2}s, albums={}, photos={}",
        pipeline_elapsed.as_secs_f32(),
        albums.len(),
        photos.len()
    );
    Ok(())
}

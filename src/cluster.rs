use rayon::prelude::*;
use tracing::{debug, info};

use crate::color;
use crate::models::EnrichedPhoto;

/// A group of photos destined for one album. Members index into the
/// enriched slice the clusterer was given, in admission order.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub members: Vec<usize>,
}

/// Smallest color cluster worth keeping: half the album size, never
/// below a pair.
pub fn color_viability_floor(max_photos: usize) -> usize {
    max_photos.div_ceil(2).max(2)
}

/// Greedy color clustering. Seeds walk the pool best-quality first; each
/// seed grows an album in three passes (strict threshold, threshold * 1.5,
/// then nearest-by-distance fill) and keeps it only if it clears the
/// viability floor. Photos without a base color never participate.
pub fn cluster_by_color(
    photos: &[EnrichedPhoto],
    max_photos: usize,
    color_threshold: f32,
) -> Vec<Cluster> {
    let order = quality_order(photos, |p| p.base_color.is_some());
    debug!(
        "Color clustering started - candidates={}, max_photos={}, threshold={}",
        order.len(),
        max_photos,
        color_threshold
    );

    let mut used = vec![false; photos.len()];
    let mut in_cluster = vec![false; photos.len()];
    let mut clusters = Vec::new();
    let floor = color_viability_floor(max_photos);
    let total = order.len();

    for (pos, &seed) in order.iter().enumerate() {
        if pos % 50 == 0 && pos > 0 {
            let pct = (pos as f32 / total as f32 * 100.0) as u32;
            info!(
                "Color clustering progress - processed={}/{} ({}%), clusters={}",
                pos,
                total,
                pct,
                clusters.len()
            );
        }
        if used[seed] {
            continue;
        }

        let mut members = vec![seed];
        in_cluster[seed] = true;

        grow_within(
            &mut members,
            &mut in_cluster,
            &order,
            &used,
            photos,
            max_photos,
            color_threshold,
        );
        if members.len() < max_photos {
            // Relax by half before resorting to pure distance fill.
            grow_within(
                &mut members,
                &mut in_cluster,
                &order,
                &used,
                photos,
                max_photos,
                color_threshold * 1.5,
            );
        }
        if members.len() < max_photos {
            fill_nearest(&mut members, &mut in_cluster, &order, &used, photos, max_photos);
        }

        if members.len() >= floor {
            for &m in &members {
                used[m] = true;
                in_cluster[m] = false;
            }
            clusters.push(Cluster { members });
        } else {
            debug!(
                "Discarding color cluster below viability - size={}, floor={}",
                members.len(),
                floor
            );
            for &m in &members {
                in_cluster[m] = false;
            }
        }
    }

    if clusters.is_empty() {
        let fallback: Vec<usize> = order.iter().copied().filter(|&i| !used[i]).take(max_photos).collect();
        if !fallback.is_empty() {
            info!(
                "No viable color clusters - falling back to top {} photos by quality",
                fallback.len()
            );
            clusters.push(Cluster { members: fallback });
        }
    }

    log_size_distribution("color", &clusters);
    clusters
}

/// Adds candidates that sit within `threshold` of any current member,
/// walking the pool best-quality first, until the album fills.
fn grow_within(
    members: &mut Vec<usize>,
    in_cluster: &mut [bool],
    order: &[usize],
    used: &[bool],
    photos: &[EnrichedPhoto],
    max_photos: usize,
    threshold: f32,
) {
    for &candidate in order {
        if members.len() >= max_photos {
            break;
        }
        if used[candidate] || in_cluster[candidate] {
            continue;
        }
        let Some(color) = photos[candidate].base_color else {
            continue;
        };
        let close = members.iter().any(|&m| {
            photos[m]
                .base_color
                .map_or(false, |mc| color::euclidean_distance(color, mc) < threshold)
        });
        if close {
            members.push(candidate);
            in_cluster[candidate] = true;
        }
    }
}

/// Tops an underfull album up with whatever unused photos sit closest to
/// it, nearest first.
fn fill_nearest(
    members: &mut Vec<usize>,
    in_cluster: &mut [bool],
    order: &[usize],
    used: &[bool],
    photos: &[EnrichedPhoto],
    max_photos: usize,
) {
    let current: Vec<usize> = members.clone();
    let mut remaining: Vec<(usize, f32)> = order
        .par_iter()
        .filter(|&&candidate| !used[candidate] && !in_cluster[candidate])
        .filter_map(|&candidate| {
            let color = photos[candidate].base_color?;
            let min_dist = current
                .iter()
                .filter_map(|&m| photos[m].base_color)
                .map(|mc| color::euclidean_distance(color, mc))
                .fold(f32::INFINITY, f32::min);
            Some((candidate, min_dist))
        })
        .collect();
    remaining.sort_by(|a, b| a.1.total_cmp(&b.1));

    let open_slots = max_photos.saturating_sub(members.len());
    for (candidate, _) in remaining.into_iter().take(open_slots) {
        members.push(candidate);
        in_cluster[candidate] = true;
    }
}

/// Greedy role-balanced clustering for artistic flow. Each seed admits
/// photos toward per-role quotas, with slack while the album is under 80%
/// full. Clusters below viability release their members back to the pool.
pub fn cluster_by_role(photos: &[EnrichedPhoto], max_photos: usize) -> Vec<Cluster> {
    let order = quality_order(photos, |p| p.role.is_some());
    debug!(
        "Role clustering started - candidates={}, max_photos={}",
        order.len(),
        max_photos
    );

    let mut used = vec![false; photos.len()];
    let mut clusters = Vec::new();
    // Viability in tenths: at least min(5, 30% of max_photos) members.
    let viability_tenths = (max_photos * 3).min(50);

    for &seed in &order {
        if used[seed] {
            continue;
        }
        let Some(seed_role) = photos[seed].role else {
            continue;
        };

        let mut members = vec![seed];
        used[seed] = true;
        let mut counts = [0usize; 4];
        counts[seed_role.order() as usize] = 1;

        for &candidate in &order {
            if members.len() >= max_photos {
                break;
            }
            if used[candidate] {
                continue;
            }
            let Some(role) = photos[candidate].role else {
                continue;
            };
            let slot = role.order() as usize;
            // Quota first; loose admission while the album is under 80%.
            if counts[slot] < role.quota(max_photos) || members.len() * 10 < max_photos * 8 {
                members.push(candidate);
                used[candidate] = true;
                counts[slot] += 1;
            }
        }

        if members.len() * 10 >= viability_tenths {
            clusters.push(Cluster { members });
        } else {
            debug!(
                "Releasing role cluster below viability - size={}, max_photos={}",
                members.len(),
                max_photos
            );
            for &m in &members {
                used[m] = false;
            }
        }
    }

    log_size_distribution("role", &clusters);
    clusters
}

/// Indices of photos passing `keep`, best quality first. The sort is
/// stable, so equal scores keep input order.
fn quality_order<F>(photos: &[EnrichedPhoto], keep: F) -> Vec<usize>
where
    F: Fn(&EnrichedPhoto) -> bool,
{
    let mut order: Vec<usize> = (0..photos.len()).filter(|&i| keep(&photos[i])).collect();
    order.sort_by(|&a, &b| photos[b].quality.total_cmp(&photos[a].quality));
    order
}

fn log_size_distribution(kind: &str, clusters: &[Cluster]) {
    let sizes: Vec<usize> = clusters.iter().map(|c| c.members.len()).collect();
    if let (Some(min), Some(max)) = (sizes.iter().min(), sizes.iter().max()) {
        let avg = sizes.iter().sum::<usize>() as f32 / sizes.len() as f32;
        debug!(
            "Cluster size distribution ({}) - count={}, min={}, max={}, avg={:.1}",
            kind,
            sizes.len(),
            min,
            max,
            avg
        );
    }
}

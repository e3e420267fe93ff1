use itertools::Itertools;
use rayon::prelude::*;

use crate::color::{self, Rgb};
use crate::models::EnrichedPhoto;
use crate::roles::{scene_mentions, NarrativeRole};

/// RGB distance under which two base colors count as the same look.
const SIMILAR_COLOR_DISTANCE: f32 = 60.0;

/// Scores every photo for the color-story strategy. Photos without a base
/// color keep quality 0 and stay out of the uniqueness counts.
pub fn score_all_for_color_story(photos: &mut [EnrichedPhoto]) {
    let colors: Vec<Option<Rgb>> = photos.iter().map(|p| p.base_color).collect();
    // The uniqueness term needs every pairwise distance, so scan in parallel.
    let similar_counts: Vec<usize> = colors
        .par_iter()
        .map(|color| match color {
            Some(base) => colors
                .iter()
                .flatten()
                .filter(|other| color::euclidean_distance(*base, **other) < SIMILAR_COLOR_DISTANCE)
                .count(),
            None => 0,
        })
        .collect();

    for (photo, similar) in photos.iter_mut().zip(similar_counts) {
        photo.quality = score_for_color_story(photo, similar);
    }
}

/// Color-story quality of one photo. `similar_count` is how many photos in
/// the pool (this one included) sit within [`SIMILAR_COLOR_DISTANCE`] of its
/// base color.
pub fn score_for_color_story(photo: &EnrichedPhoto, similar_count: usize) -> f32 {
    if photo.base_color.is_none() {
        return 0.0;
    }
    let traits = &photo.traits;
    let mut score = 0.0f32;

    // Vibrancy is judged on the first listed color only; mid-tone, saturated
    // primaries score best. Unparseable primaries get a flat 5.
    match traits
        .dominant_colors
        .first()
        .and_then(|text| color::parse_color(text))
    {
        Some(primary) => {
            let (saturation, lightness) = color::saturation_lightness(primary);
            score += saturation * 20.0;
            score += (1.0 - (lightness - 0.5).abs() * 2.0) * 10.0;
        }
        None => score += 5.0,
    }

    // Up to four listed colors count.
    score += (traits.dominant_colors.len() as f32 * 5.0).min(20.0);

    // Rarer base colors score higher.
    score += (25.0 - (similar_count as f32 - 1.0) * 2.0).max(0.0);

    let scene = traits.scene.as_str();
    if scene_mentions(scene, &["portrait", "people"]) {
        score += 8.0;
    }
    if scene_mentions(scene, &["landscape", "nature"]) {
        score += 7.0;
    }
    if scene_mentions(scene, &["coast", "beach"]) {
        score += 6.0;
    }
    if traits.people_count > 0 {
        score += 5.0;
    }

    let description_len = traits.description.chars().count();
    if description_len > 50 {
        score += 10.0;
    } else if description_len > 0 {
        score += 5.0;
    }

    round_to_tenth(score)
}

/// Artistic-flow quality of one photo under its assigned role.
pub fn score_for_artistic_flow(photo: &EnrichedPhoto, role: NarrativeRole) -> f32 {
    let traits = &photo.traits;
    let scene = traits.scene.as_str();
    let people = traits.people_count;

    let mut score = role_fit(role, scene, people);

    if people > 0 {
        score += (people as f32 * 3.0).min(20.0);
        if scene.contains("portrait") {
            score += 5.0;
        }
    } else if matches!(role, NarrativeRole::Intro | NarrativeRole::Closing) {
        // Empty scenes work as bookends.
        score += 15.0;
    } else {
        score += 10.0;
    }

    if scene.contains("portrait") {
        score += 10.0;
    }
    if scene_mentions(scene, &["landscape", "nature"]) {
        score += 8.0;
    }
    if scene_mentions(scene, &["coast", "beach"]) {
        score += 7.0;
    }
    if scene_mentions(scene, &["night", "sunset"]) {
        score += 6.0;
    }
    if scene_mentions(scene, &["indoor", "subway", "escalator"]) {
        score += 5.0;
    }

    let description_len = traits.description.chars().count();
    if description_len > 100 {
        score += 15.0;
    } else if description_len > 50 {
        score += 10.0;
    } else if description_len > 0 {
        score += 5.0;
    }

    match traits.dominant_colors.len() {
        n if n >= 3 => score += 10.0,
        2 => score += 5.0,
        _ => {}
    }

    round_to_tenth(score)
}

/// How well a photo fits the role it was assigned.
fn role_fit(role: NarrativeRole, scene: &str, people: u32) -> f32 {
    match role {
        NarrativeRole::Intro => {
            if scene_mentions(scene, &["coast", "landscape", "nature"]) {
                25.0
            } else if people == 0 {
                15.0
            } else {
                5.0
            }
        }
        NarrativeRole::Transition => {
            if (1..=3).contains(&people) {
                20.0
            } else if people == 0 {
                15.0
            } else {
                10.0
            }
        }
        NarrativeRole::Climax => {
            if people > 5 {
                30.0
            } else if scene_mentions(scene, &["portrait", "people"]) {
                25.0
            } else if people > 0 {
                20.0
            } else {
                5.0
            }
        }
        NarrativeRole::Closing => {
            if scene_mentions(scene, &["night", "sunset", "dusk"]) {
                30.0
            } else if people == 0 && scene_mentions(scene, &["landscape", "nature"]) {
                20.0
            } else if people == 0 {
                15.0
            } else {
                5.0
            }
        }
    }
}

/// Rank score for a color cluster: member quality, plus a strong push
/// toward full-size albums, plus a harmony bonus for tight palettes.
pub fn color_cluster_score(members: &[usize], photos: &[EnrichedPhoto], max_photos: usize) -> f32 {
    if members.is_empty() {
        return 0.0;
    }
    let size = members.len();
    let avg = members.iter().map(|&i| photos[i].quality).sum::<f32>() / size as f32;
    let size_bonus = size as f32 / max_photos.max(1) as f32 * 100.0;
    let size_penalty = if size < max_photos.div_ceil(2) { -50.0 } else { 0.0 };

    let mut harmony = 0.0;
    if size > 1 {
        let colors: Vec<Rgb> = members.iter().filter_map(|&i| photos[i].base_color).collect();
        if let Some(mean) = color::mean_color(&colors) {
            let variance = colors
                .iter()
                .map(|c| {
                    let dist = color::euclidean_distance(*c, mean);
                    dist * dist
                })
                .sum::<f32>()
                / colors.len() as f32;
            harmony = (50.0 - variance * 0.5).max(0.0);
        }
    }

    avg + size_bonus + size_penalty + harmony
}

/// Rank score for an artistic cluster: member quality, a mild size bonus,
/// and how close the role mix sits to the ideal narrative arc.
pub fn artistic_cluster_score(members: &[usize], photos: &[EnrichedPhoto]) -> f32 {
    if members.is_empty() {
        return 0.0;
    }
    let total = members.len() as f32;
    let avg = members.iter().map(|&i| photos[i].quality).sum::<f32>() / total;
    let size_bonus = total * 0.5;

    let counts = members.iter().filter_map(|&i| photos[i].role).counts();
    let mut distribution = 0.0;
    for role in NarrativeRole::ALL {
        let actual = counts.get(&role).copied().unwrap_or(0) as f32 / total;
        distribution += (1.0 - (role.ideal_share() - actual).abs()) * 30.0;
    }

    avg + size_bonus + distribution
}

fn round_to_tenth(score: f32) -> f32 {
    (score * 10.0).round() / 10.0
}

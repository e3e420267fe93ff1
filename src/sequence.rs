use crate::models::EnrichedPhoto;
use crate::roles::role_order;

/// Orders an album along the narrative arc: intro, transition, climax,
/// closing, best quality first within a role.
pub fn by_narrative_arc(photos: &mut [EnrichedPhoto]) {
    photos.sort_by(|a, b| {
        role_order(a.role)
            .cmp(&role_order(b.role))
            .then_with(|| b.quality.total_cmp(&a.quality))
    });
}

/// Orders an album best quality first.
pub fn by_quality(photos: &mut [EnrichedPhoto]) {
    photos.sort_by(|a, b| b.quality.total_cmp(&a.quality));
}

/// Orders an album by the analyzer's overall score, best first.
pub fn by_overall_score(photos: &mut [EnrichedPhoto]) {
    photos.sort_by(|a, b| b.traits.overall_score.total_cmp(&a.traits.overall_score));
}

/// Chronological order. Capture timestamps are used only when every photo
/// carries one; otherwise file names decide, with ids as the final tie.
pub fn by_capture_order(photos: &mut [EnrichedPhoto]) {
    let all_timestamped = photos.iter().all(|p| p.traits.captured_at.is_some());
    if all_timestamped {
        photos.sort_by(|a, b| {
            a.traits
                .captured_at
                .cmp(&b.traits.captured_at)
                .then_with(|| a.record.name.cmp(&b.record.name))
        });
    } else {
        photos.sort_by(|a, b| {
            a.record
                .name
                .cmp(&b.record.name)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
    }
}

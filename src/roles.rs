use serde::{Deserialize, Serialize};

/// Story position a photo plays inside an artistic-flow album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeRole {
    Intro,
    Transition,
    Climax,
    Closing,
}

impl NarrativeRole {
    pub const ALL: [NarrativeRole; 4] = [
        NarrativeRole::Intro,
        NarrativeRole::Transition,
        NarrativeRole::Climax,
        NarrativeRole::Closing,
    ];

    /// Assigns a role from the analyzed scene text and people count.
    /// Scene keywords only matter on the branch the people count selects,
    /// so a crowded coast shot is still a climax.
    pub fn classify(scene: &str, people_count: u32) -> Self {
        let scene = scene.to_lowercase();
        if people_count == 0 {
            if scene_mentions(&scene, &["coast", "landscape", "nature"]) {
                NarrativeRole::Intro
            } else if scene_mentions(&scene, &["night", "sunset", "dusk"]) {
                NarrativeRole::Closing
            } else {
                NarrativeRole::Transition
            }
        } else if people_count > 5 || scene_mentions(&scene, &["portrait", "people"]) {
            NarrativeRole::Climax
        } else {
            NarrativeRole::Transition
        }
    }

    /// Position in the narrative arc, lowest first.
    pub fn order(self) -> u8 {
        match self {
            NarrativeRole::Intro => 0,
            NarrativeRole::Transition => 1,
            NarrativeRole::Climax => 2,
            NarrativeRole::Closing => 3,
        }
    }

    /// Ideal fraction of an album this role should occupy.
    pub fn ideal_share(self) -> f32 {
        self.share_tenths() as f32 / 10.0
    }

    /// Per-album admission quota: the ideal share of `max_photos`, rounded
    /// up. Integer arithmetic keeps the boundary exact.
    pub fn quota(self, max_photos: usize) -> usize {
        (max_photos * self.share_tenths()).div_ceil(10)
    }

    fn share_tenths(self) -> usize {
        match self {
            NarrativeRole::Intro => 2,
            NarrativeRole::Transition => 3,
            NarrativeRole::Climax => 3,
            NarrativeRole::Closing => 2,
        }
    }
}

/// Arc position for sorting; photos without a role sort with transitions.
pub fn role_order(role: Option<NarrativeRole>) -> u8 {
    role.map(NarrativeRole::order).unwrap_or(1)
}

/// True when the scene text mentions any of the keywords. Callers pass
/// lowercased scene text.
pub(crate) fn scene_mentions(scene: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| scene.contains(keyword))
}

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::PhotoTraits;
use crate::color::Rgb;
use crate::roles::NarrativeRole;

/// One photo row as exported by the gallery, analysis payload attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "thumbnailUrl", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Raw analysis payload; kept opaque so a malformed entry never sinks
    /// the whole manifest.
    #[serde(default)]
    pub data: Value,
}

/// A photo plus everything curation derives for it. The record itself is
/// never mutated; side values accumulate here.
#[derive(Debug, Clone)]
pub struct EnrichedPhoto {
    pub record: PhotoRecord,
    pub traits: PhotoTraits,
    /// Parsed primary color, when any dominant-color entry parses.
    pub base_color: Option<Rgb>,
    /// Narrative role, assigned only on the artistic-flow path.
    pub role: Option<NarrativeRole>,
    /// Algorithm-specific quality score, 0 until scored.
    pub quality: f32,
}

impl EnrichedPhoto {
    pub fn new(record: PhotoRecord) -> Self {
        let traits = PhotoTraits::from_payload(&record.data);
        EnrichedPhoto {
            record,
            traits,
            base_color: None,
            role: None,
            quality: 0.0,
        }
    }
}

/// Album curation strategies, mirroring the generation panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CurationAlgorithm {
    BestShots,
    Chronological,
    ColorStory,
    ArtisticFlow,
}

impl CurationAlgorithm {
    /// Stable machine identifier, also the serialized form.
    pub fn slug(self) -> &'static str {
        match self {
            CurationAlgorithm::BestShots => "best-shots",
            CurationAlgorithm::Chronological => "chronological",
            CurationAlgorithm::ColorStory => "color-story",
            CurationAlgorithm::ArtisticFlow => "artistic-flow",
        }
    }

    /// Display name used for album titles.
    pub fn label(self) -> &'static str {
        match self {
            CurationAlgorithm::BestShots => "Best Shots",
            CurationAlgorithm::Chronological => "Chronological",
            CurationAlgorithm::ColorStory => "Color Story",
            CurationAlgorithm::ArtisticFlow => "Artistic Flow",
        }
    }

    /// One-line description shown alongside generated albums.
    pub fn blurb(self) -> &'static str {
        match self {
            CurationAlgorithm::BestShots => {
                "AI selects the highest quality photos based on composition, lighting, and technical excellence"
            }
            CurationAlgorithm::Chronological => {
                "Organizes photos in the order they were taken, perfect for event coverage"
            }
            CurationAlgorithm::ColorStory => {
                "Creates visual harmony by grouping photos with complementary colors and tones"
            }
            CurationAlgorithm::ArtisticFlow => {
                "Curates photos to create a compelling visual narrative with emotional pacing"
            }
        }
    }
}

impl std::fmt::Display for CurationAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Tunables for a curation run.
#[derive(Debug, Clone)]
pub struct CurationOptions {
    pub algorithm: CurationAlgorithm,
    /// Cap on photos per album; floored to 1 by the orchestrator.
    pub max_photos: usize,
    /// RGB distance below which two colors cluster together.
    pub color_threshold: f32,
}

impl Default for CurationOptions {
    fn default() -> Self {
        CurationOptions {
            algorithm: CurationAlgorithm::BestShots,
            max_photos: 50,
            color_threshold: 80.0,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CurationAlgorithm, PhotoRecord};

/// A finished album as handed back to the application: photos in their
/// curated order with all enrichment stripped back off. Field casing
/// matches the gallery's album JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Stable hash of the strategy and the ordered member photo ids.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub algorithm: CurationAlgorithm,
    /// First photo of the album, mirrored out for gallery covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo_id: Option<String>,
    pub photos: Vec<PhotoRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

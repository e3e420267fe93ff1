use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Traits pulled out of a photo's analysis payload. Every field degrades
/// independently: a wrong-typed or missing entry leaves its default in
/// place without touching the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoTraits {
    /// Free-text description, trimmed, original casing.
    pub description: String,
    /// Scene text, NFC-normalized and lowercased for keyword matching.
    pub scene: String,
    /// Dominant color descriptions in payload order, empties dropped.
    pub dominant_colors: Vec<String>,
    pub people_count: u32,
    /// Overall quality score as reported by the analyzer.
    pub overall_score: f32,
    /// Capture timestamp as an opaque sortable string, when present.
    pub captured_at: Option<String>,
}

impl PhotoTraits {
    pub fn from_payload(payload: &Value) -> Self {
        let mut traits = PhotoTraits::default();
        let Some(data) = payload.as_object() else {
            return traits;
        };

        if let Some(text) = data.get("description").and_then(Value::as_str) {
            traits.description = text.trim().to_string();
        }
        if let Some(text) = data.get("scene").and_then(Value::as_str) {
            traits.scene = normalize_scene(text);
        }
        if let Some(colors) = data.get("dominant_colors").and_then(Value::as_array) {
            traits.dominant_colors = colors
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .collect();
        }
        traits.people_count = count_field(data.get("people_count"));
        if let Some(score) = data
            .get("scores")
            .and_then(|scores| scores.get("overall"))
            .and_then(Value::as_f64)
        {
            traits.overall_score = score as f32;
        }
        if let Some(text) = data.get("captured_at").and_then(Value::as_str) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                traits.captured_at = Some(trimmed.to_string());
            }
        }

        traits
    }
}

fn normalize_scene(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_lowercase()
}

/// Non-negative integer read that tolerates floats and rejects everything
/// else.
fn count_field(value: Option<&Value>) -> u32 {
    match value {
        Some(v) => {
            if let Some(n) = v.as_u64() {
                n.min(u32::MAX as u64) as u32
            } else if let Some(f) = v.as_f64() {
                if f.is_finite() && f > 0.0 {
                    (f as u64).min(u32::MAX as u64) as u32
                } else {
                    0
                }
            } else {
                0
            }
        }
        None => 0,
    }
}

use palette::{Clamp, FromColor, Hsl, Lch, Srgb};
use unicode_normalization::UnicodeNormalization;

/// RGB triple on the raw 0-255 scale used for all distance math.
pub type Rgb = [f32; 3];

/// Fallback dictionary for color descriptions the direct parser rejects.
/// Values mirror the ones the analysis payloads were tuned against.
const BASE_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("dark gray", [0x4a, 0x4a, 0x4a]),
    ("dark grey", [0x4a, 0x4a, 0x4a]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("light gray", [0xd3, 0xd3, 0xd3]),
    ("light grey", [0xd3, 0xd3, 0xd3]),
    ("white", [0xff, 0xff, 0xff]),
    ("soft white", [0xf5, 0xf5, 0xf5]),
    ("off white", [0xf8, 0xf8, 0xf2]),
    ("ivory", [0xff, 0xff, 0xf0]),
    ("beige", [0xf5, 0xf5, 0xdc]),
    ("cream", [0xff, 0xfd, 0xd0]),
    ("red", [0xff, 0x00, 0x00]),
    ("blue", [0x00, 0x00, 0xff]),
    ("green", [0x00, 0x80, 0x00]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("orange", [0xff, 0xa5, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("pink", [0xff, 0xc0, 0xcb]),
    ("brown", [0x8b, 0x45, 0x13]),
    ("teal", [0x00, 0x80, 0x80]),
    ("cyan", [0x00, 0xff, 0xff]),
    ("magenta", [0xff, 0x00, 0xff]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("navy", [0x00, 0x00, 0x80]),
    ("indigo", [0x4b, 0x00, 0x82]),
    ("violet", [0xee, 0x82, 0xee]),
    ("gold", [0xff, 0xd7, 0x00]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("bronze", [0xcd, 0x7f, 0x32]),
];

/// Intensity/tone words stripped before the dictionary retry.
const TONE_ADJECTIVES: &[&str] = &[
    "soft", "dark", "light", "muted", "deep", "rich", "bright", "pale", "warm", "cool",
];

/// Lightness/chroma step for adjective adjustments, expressed in Lch units.
const LCH_STEP: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Darken,
    Brighten,
    Desaturate,
}

/// Converts a free-text color description ("navy", "#4a4a4a", "soft white",
/// "dark red") into an RGB triple. Returns `None` for anything unparseable;
/// never panics.
pub fn parse_color(text: &str) -> Option<Rgb> {
    let value = normalize(text);
    if value.is_empty() {
        return None;
    }

    if let Some(rgb) = parse_direct(&value) {
        return Some(rgb);
    }

    // Exact dictionary keys are returned as stored; the multi-word entries
    // ("dark gray", "soft white") already encode their tone.
    if let Some(base) = lookup_base(&value) {
        return Some(base);
    }

    let words: Vec<&str> = value
        .split_whitespace()
        .filter(|word| !TONE_ADJECTIVES.contains(word))
        .collect();
    let adjustment = adjustment_for(&value);

    let stripped = words.join(" ");
    if let Some(base) = lookup_base(&stripped) {
        return Some(apply(base, adjustment));
    }

    for word in &words {
        if let Some(base) = lookup_base(word) {
            return Some(apply(base, adjustment));
        }
    }

    None
}

/// First parseable entry of a dominant-color list, if any.
pub fn parse_first(descriptions: &[String]) -> Option<Rgb> {
    descriptions.iter().find_map(|text| parse_color(text))
}

/// Euclidean distance on raw 0-255 RGB components, no weighting.
pub fn euclidean_distance(a: Rgb, b: Rgb) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Component-wise mean of a set of colors; `None` for an empty slice.
pub fn mean_color(colors: &[Rgb]) -> Option<Rgb> {
    if colors.is_empty() {
        return None;
    }
    let n = colors.len() as f32;
    let mut sum = [0.0f32; 3];
    for c in colors {
        sum[0] += c[0];
        sum[1] += c[1];
        sum[2] += c[2];
    }
    Some([sum[0] / n, sum[1] / n, sum[2] / n])
}

/// HSL saturation and lightness (both 0..1) of an RGB triple.
pub fn saturation_lightness(rgb: Rgb) -> (f32, f32) {
    let hsl = Hsl::from_color(to_srgb(rgb));
    (hsl.saturation, hsl.lightness)
}

/// Name of the dictionary base color nearest to `rgb`, for album titles.
pub fn family_name(rgb: Rgb) -> &'static str {
    BASE_COLORS
        .iter()
        .map(|(name, base)| (*name, euclidean_distance(rgb, to_rgb_u8(*base))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name)
        .unwrap_or("neutral")
}

fn normalize(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_lowercase()
}

fn parse_direct(value: &str) -> Option<Rgb> {
    if let Some(named) = palette::named::from_str(value) {
        return Some(to_rgb_u8([named.red, named.green, named.blue]));
    }
    value
        .parse::<Srgb<u8>>()
        .ok()
        .map(|hex| to_rgb_u8([hex.red, hex.green, hex.blue]))
}

fn lookup_base(key: &str) -> Option<Rgb> {
    BASE_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, rgb)| to_rgb_u8(*rgb))
}

/// Which adjustment the description asks for, if any. At most one applies
/// per parse, in this priority order.
fn adjustment_for(value: &str) -> Option<Adjustment> {
    if value.contains("dark") {
        Some(Adjustment::Darken)
    } else if value.contains("light") || value.contains("soft") || value.contains("pale") {
        Some(Adjustment::Brighten)
    } else if value.contains("muted") {
        Some(Adjustment::Desaturate)
    } else {
        None
    }
}

fn apply(base: Rgb, adjustment: Option<Adjustment>) -> Rgb {
    let Some(adjustment) = adjustment else {
        return base;
    };
    let mut lch = Lch::from_color(to_srgb(base));
    match adjustment {
        Adjustment::Darken => lch.l = (lch.l - LCH_STEP).max(0.0),
        Adjustment::Brighten => lch.l = (lch.l + LCH_STEP * 0.8).min(100.0),
        Adjustment::Desaturate => lch.chroma = (lch.chroma - LCH_STEP).max(0.0),
    }
    let back = Srgb::from_color(lch).clamp();
    [back.red * 255.0, back.green * 255.0, back.blue * 255.0]
}

fn to_srgb(rgb: Rgb) -> Srgb<f32> {
    Srgb::new(rgb[0] / 255.0, rgb[1] / 255.0, rgb[2] / 255.0)
}

fn to_rgb_u8(rgb: [u8; 3]) -> Rgb {
    [rgb[0] as f32, rgb[1] as f32, rgb[2] as f32]
}

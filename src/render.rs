// src/render.rs
use crate::models::CurationOptions;
use crate::out_models::Album;

/// Photos listed per album section before the rest is elided.
const PHOTOS_PER_SECTION: usize = 12;

pub fn render_run_markdown(albums: &[Album], options: &CurationOptions) -> String {
    let mut md = String::new();
    md.push_str("# Curated Albums\n\n");

    md.push_str(&format!(
        "Strategy: **{}** — {}\n\n",
        options.algorithm.label(),
        options.algorithm.blurb()
    ));

    let total: usize = albums.iter().map(|a| a.photos.len()).sum();
    md.push_str(&format!("Albums: {} | Photos: {}\n", albums.len(), total));

    for (rank, album) in albums.iter().enumerate() {
        md.push_str(&format!("\n## {}. {}\n\n", rank + 1, album.name));
        if !album.description.is_empty() {
            md.push_str(&format!("{}\n\n", album.description.trim()));
        }
        md.push_str(&format!("{} photos\n", album.photos.len()));
        for photo in album.photos.iter().take(PHOTOS_PER_SECTION) {
            let name = if photo.name.is_empty() { &photo.id } else { &photo.name };
            let cover = if album.cover_photo_id.as_deref() == Some(photo.id.as_str()) {
                " (cover)"
            } else {
                ""
            };
            md.push_str(&format!("- **{}**{} — {}\n", name, cover, photo.url));
        }
        if album.photos.len() > PHOTOS_PER_SECTION {
            md.push_str(&format!("- … and {} more\n", album.photos.len() - PHOTOS_PER_SECTION));
        }
    }

    md
}

use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;

use viewfinder_curate::analysis::PhotoTraits;
use viewfinder_curate::{
    curate, orchestrator, Album, CurationAlgorithm, CurationOptions, NarrativeRole, PhotoRecord,
};

fn photo(id: &str, name: &str, data: serde_json::Value) -> PhotoRecord {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "url": format!("https://photos.example/{id}.jpg"),
        "data": data,
    }))
    .unwrap()
}

fn options(algorithm: CurationAlgorithm, max_photos: usize) -> CurationOptions {
    CurationOptions { algorithm, max_photos, ..CurationOptions::default() }
}

fn ids(album: &Album) -> Vec<&str> {
    album.photos.iter().map(|p| p.id.as_str()).collect()
}

/// A weekend's worth of analyzed photos: ten with parseable palettes across
/// four color families, five the color parser can do nothing with.
fn weekend_collection() -> Vec<PhotoRecord> {
    vec![
        photo("pier", "pier_blue_hour.jpg", json!({
            "scene": "harbor at dusk",
            "dominant_colors": ["#1a2a6c", "navy"],
            "scores": { "overall": 82.0 },
        })),
        photo("hull", "fishing_hull.jpg", json!({
            "scene": "boats at the quay",
            "dominant_colors": ["#223a7a"],
            "scores": { "overall": 74.5 },
        })),
        photo("anchor", "anchor_chain.jpg", json!({
            "dominant_colors": ["#16205c", "dark blue"],
            "scores": { "overall": 61.0 },
        })),
        photo("field", "rapeseed_field.jpg", json!({
            "scene": "nature in bloom",
            "dominant_colors": ["gold", "#e8c03a"],
            "scores": { "overall": 88.0 },
        })),
        photo("lantern", "paper_lantern.jpg", json!({
            "dominant_colors": ["#f0c040"],
            "scores": { "overall": 69.0 },
        })),
        photo("ferns", "fern_undergrowth.jpg", json!({
            "scene": "forest nature walk",
            "dominant_colors": ["#1d5a2f", "green"],
            "scores": { "overall": 77.0 },
        })),
        photo("moss", "mossy_steps.jpg", json!({
            "dominant_colors": ["#2a6e3c"],
            "scores": { "overall": 58.5 },
        })),
        photo("scarf", "red_scarf.jpg", json!({
            "scene": "portrait in the old town",
            "dominant_colors": ["crimson", "#b01020"],
            "people_count": 1,
            "scores": { "overall": 91.0 },
        })),
        photo("kiosk", "news_kiosk.jpg", json!({
            "dominant_colors": ["#c01828"],
            "scores": { "overall": 66.0 },
        })),
        photo("awning", "cafe_awning.jpg", json!({
            "dominant_colors": ["#a81525", "maroon"],
            "scores": { "overall": 72.0 },
        })),
        photo("fog", "fog_bank.jpg", json!({
            "scene": "morning fog",
            "dominant_colors": ["luminous haze"],
            "scores": { "overall": 80.0 },
        })),
        photo("mist", "river_mist.jpg", json!({
            "dominant_colors": [],
            "scores": { "overall": 64.0 },
        })),
        photo("blur", "motion_blur.jpg", json!({
            "dominant_colors": ["   "],
            "scores": { "overall": 49.0 },
        })),
        photo("pending", "upload_pending.jpg", json!({})),
        photo("broken", "broken_row.jpg", json!("analysis pending")),
    ]
}

#[test]
fn every_strategy_curates_an_empty_collection_to_nothing() {
    for algorithm in [
        CurationAlgorithm::BestShots,
        CurationAlgorithm::Chronological,
        CurationAlgorithm::ColorStory,
        CurationAlgorithm::ArtisticFlow,
    ] {
        assert_eq!(curate(&[], &options(algorithm, 50)).len(), 0);
    }
}

#[test]
fn color_story_groups_matching_palettes_into_named_albums() {
    let photos = vec![
        photo("n1", "navy_pier.jpg", json!({ "dominant_colors": ["#000080"] })),
        photo("n2", "navy_hull.jpg", json!({ "dominant_colors": ["#000090"] })),
        photo("t1", "teal_door.jpg", json!({ "dominant_colors": ["teal"] })),
        photo("t2", "teal_tiles.jpg", json!({ "dominant_colors": ["#009898"] })),
    ];
    let albums = curate(&photos, &options(CurationAlgorithm::ColorStory, 2));
    assert_eq!(albums.len(), 2);

    // The navy pair holds the tighter palette, so it ranks first.
    assert_eq!(albums[0].name, "Color Story — navy");
    assert_eq!(ids(&albums[0]), vec!["n2", "n1"]);
    assert_eq!(albums[0].cover_photo_id.as_deref(), Some("n2"));

    assert_eq!(albums[1].name, "Color Story — teal");
    assert_eq!(ids(&albums[1]), vec!["t2", "t1"]);
}

#[test]
fn color_story_keeps_unparseable_photos_out_of_albums() {
    let colorless: HashSet<&str> = ["fog", "mist", "blur", "pending", "broken"].into();
    let albums = curate(&weekend_collection(), &options(CurationAlgorithm::ColorStory, 6));
    assert!(!albums.is_empty());

    let mut seen = HashSet::new();
    for album in &albums {
        assert!((1..=6).contains(&album.photos.len()));
        for p in &album.photos {
            assert!(seen.insert(p.id.clone()), "photo {} appears in two albums", p.id);
            assert!(!colorless.contains(p.id.as_str()), "colorless {} was clustered", p.id);
        }
    }
}

#[test]
fn small_pools_fall_back_to_one_album_at_the_default_size() {
    // Ten parseable photos cannot clear the viability floor of 25 when the
    // album size stays at the default 50, so the clusterer's fallback takes
    // the whole pool.
    let albums = curate(&weekend_collection(), &options(CurationAlgorithm::ColorStory, 50));
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].photos.len(), 10);
}

#[test]
fn artistic_flow_walks_the_narrative_arc() {
    let photos = vec![
        photo("ridge", "ridge.jpg", json!({ "scene": "mountain landscape at dawn", "people_count": 0 })),
        photo("market", "market.jpg", json!({ "scene": "crowded market square", "people_count": 7 })),
        photo("alley", "alley.jpg", json!({ "scene": "narrow alley with bicycles", "people_count": 0 })),
        photo("embers", "embers.jpg", json!({ "scene": "campfire at dusk", "people_count": 0 })),
        photo("meadow", "meadow.jpg", json!({ "scene": "wildflower nature meadow", "people_count": 0 })),
        photo("tram", "tram.jpg", json!({ "scene": "tram interior", "people_count": 1 })),
        photo("dancers", "dancers.jpg", json!({ "scene": "portrait of street dancers", "people_count": 4 })),
        photo("skyline", "skyline.jpg", json!({ "scene": "city night skyline", "people_count": 0 })),
    ];
    let albums = curate(&photos, &options(CurationAlgorithm::ArtisticFlow, 12));
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].name, "Artistic Flow");
    assert_eq!(albums[0].photos.len(), 8);

    let orders: Vec<u8> = albums[0]
        .photos
        .iter()
        .map(|p| {
            let traits = PhotoTraits::from_payload(&p.data);
            NarrativeRole::classify(&traits.scene, traits.people_count).order()
        })
        .collect();
    assert!(orders.windows(2).all(|w| w[0] <= w[1]), "arc out of order: {orders:?}");
    assert_eq!(orders.first().copied(), Some(0));
    assert_eq!(orders.last().copied(), Some(3));
}

#[test]
fn artistic_flow_returns_an_uncurated_album_for_tiny_pools() {
    let photos = vec![
        photo("one", "one.jpg", json!({ "scene": "tram interior", "people_count": 1 })),
        photo("two", "two.jpg", json!({ "scene": "empty platform", "people_count": 0 })),
    ];
    // Too few photos to clear viability at this album size.
    let albums = curate(&photos, &options(CurationAlgorithm::ArtisticFlow, 20));
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].name, "Artistic Flow");
    assert_eq!(ids(&albums[0]), vec!["one", "two"]);
}

#[test]
fn best_shots_ranks_by_the_analyzer_overall_score() {
    let photos = vec![
        photo("good", "a.jpg", json!({ "scores": { "overall": 88.5 } })),
        photo("best", "b.jpg", json!({ "scores": { "overall": 92.0 } })),
        photo("weak", "c.jpg", json!({ "scores": { "overall": 75.0 } })),
        photo("unscored", "d.jpg", json!({})),
        photo("fine", "e.jpg", json!({ "scores": { "overall": 81.0 } })),
    ];
    let albums = curate(&photos, &options(CurationAlgorithm::BestShots, 3));
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].name, "Best Shots");
    assert_eq!(ids(&albums[0]), vec!["best", "good", "fine"]);
}

#[test]
fn chronological_uses_timestamps_only_when_every_photo_has_one() {
    let stamped = vec![
        photo("noon", "z.jpg", json!({ "captured_at": "2025-06-14T12:00:00Z" })),
        photo("night_before", "a.jpg", json!({ "captured_at": "2025-06-13T21:10:00Z" })),
        photo("evening", "m.jpg", json!({ "captured_at": "2025-06-14T19:02:11Z" })),
    ];
    let albums = curate(&stamped, &options(CurationAlgorithm::Chronological, 10));
    assert_eq!(ids(&albums[0]), vec!["night_before", "noon", "evening"]);

    let gappy = vec![
        photo("late", "img_0300.jpg", json!({ "captured_at": "2025-06-14T19:00:00Z" })),
        photo("bare", "img_0100.jpg", json!({})),
    ];
    let albums = curate(&gappy, &options(CurationAlgorithm::Chronological, 10));
    assert_eq!(ids(&albums[0]), vec!["bare", "late"]);
}

#[test]
fn album_json_speaks_the_gallery_dialect() {
    let photos = vec![photo("solo", "solo.jpg", json!({ "scene": "rooftop" }))];
    let albums = curate(&photos, &options(CurationAlgorithm::BestShots, 5));
    let value = serde_json::to_value(&albums).unwrap();
    let album = &value[0];

    assert_eq!(album["algorithm"], "best-shots");
    assert_eq!(album["coverPhotoId"], "solo");
    assert!(album["createdAt"].is_string());
    assert!(album["updatedAt"].is_string());
    assert_eq!(album["id"].as_str().unwrap().len(), 16);

    let record = album["photos"][0].as_object().unwrap();
    assert!(!record.contains_key("quality"));
    assert!(!record.contains_key("role"));
    assert!(!record.contains_key("baseColor"));
    assert_eq!(record["data"]["scene"], "rooftop");
}

#[test]
fn curation_is_deterministic_across_runs() {
    let photos = weekend_collection();
    let opts = options(CurationAlgorithm::ColorStory, 6);
    let first = curate(&photos, &opts);
    let second = curate(&photos, &opts);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(ids(a), ids(b));
    }
}

#[tokio::test]
async fn pipeline_writes_albums_index_and_markdown() {
    let root = std::env::temp_dir().join(format!("viewfinder-curate-it-{}", std::process::id()));
    std::fs::create_dir_all(&root).unwrap();
    let manifest_path = root.join("manifest.json");
    let out_dir = root.join("out");

    let manifest = json!({
        "photos": [
            { "id": "m1", "name": "dawn.jpg", "url": "https://photos.example/m1.jpg",
              "data": { "scores": { "overall": 88.0 } } },
            { "id": "m2", "name": "noon.jpg", "url": "https://photos.example/m2.jpg",
              "data": { "scores": { "overall": 71.0 } } },
            { "id": "m3", "name": "dusk.jpg", "url": "https://photos.example/m3.jpg",
              "data": { "scores": { "overall": 94.5 } } },
            { "id": "m4", "name": "late.jpg", "url": "https://photos.example/m4.jpg",
              "data": { "scores": { "overall": 52.0 } } },
        ]
    });
    std::fs::write(&manifest_path, serde_json::to_vec(&manifest).unwrap()).unwrap();

    let sources = vec![manifest_path.to_string_lossy().into_owned()];
    let opts = options(CurationAlgorithm::BestShots, 3);
    orchestrator::run(&sources, &opts, out_dir.to_str().unwrap()).await.unwrap();

    let albums: Vec<Album> =
        serde_json::from_slice(&std::fs::read(out_dir.join("albums.json")).unwrap()).unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(ids(&albums[0]), vec!["m3", "m1", "m2"]);

    let index: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("albums.index.json")).unwrap())
            .unwrap();
    assert_eq!(index.as_array().map(Vec::len), Some(1));
    assert_eq!(index[0]["name"], "Best Shots");
    assert_eq!(index[0]["photos"], 3);
    assert_eq!(index[0]["id"], albums[0].id.as_str());

    let md = std::fs::read_to_string(out_dir.join("albums.md")).unwrap();
    assert!(md.starts_with("# Curated Albums"));
    assert!(md.contains("Strategy: **Best Shots**"));
    assert!(md.contains("## 1. Best Shots"));

    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn pipeline_degrades_when_a_source_is_missing() {
    let root = std::env::temp_dir()
        .join(format!("viewfinder-curate-it-{}-sparse", std::process::id()));
    std::fs::create_dir_all(&root).unwrap();
    let manifest_path = root.join("manifest.json");
    let out_dir = root.join("out");

    let manifest = json!({
        "photos": [
            { "id": "m1", "name": "one.jpg", "url": "https://photos.example/m1.jpg",
              "data": { "scores": { "overall": 60.0 } } },
            { "id": "m2", "name": "two.jpg", "url": "https://photos.example/m2.jpg",
              "data": { "scores": { "overall": 70.0 } } },
        ]
    });
    std::fs::write(&manifest_path, serde_json::to_vec(&manifest).unwrap()).unwrap();

    let sources = vec![
        manifest_path.to_string_lossy().into_owned(),
        root.join("nowhere.json").to_string_lossy().into_owned(),
    ];
    let opts = options(CurationAlgorithm::BestShots, 10);
    orchestrator::run(&sources, &opts, out_dir.to_str().unwrap()).await.unwrap();

    let albums: Vec<Album> =
        serde_json::from_slice(&std::fs::read(out_dir.join("albums.json")).unwrap()).unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(ids(&albums[0]), vec!["m2", "m1"]);

    let _ = std::fs::remove_dir_all(&root);
}

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use viewfinder_curate::{orchestrator, CurationAlgorithm, CurationOptions};

/// Viewfinder Curate - photo album curation pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Photo manifest sources: local JSON files or http(s) URLs
    sources: Vec<String>,

    /// Curation strategy to apply
    #[arg(
        short,
        long,
        value_enum,
        env = "CURATE_ALGORITHM",
        default_value_t = CurationAlgorithm::ColorStory
    )]
    algorithm: CurationAlgorithm,

    /// Maximum number of photos per album
    #[arg(short, long, env = "CURATE_MAX_PHOTOS", default_value_t = 50)]
    max_photos: usize,

    /// Color distance threshold for color-story grouping
    #[arg(long, env = "CURATE_COLOR_THRESHOLD", default_value_t = 80.0)]
    color_threshold: f32,

    /// Output directory for generated files (default: "out")
    #[arg(short, long, env = "CURATE_OUTPUT_DIR", default_value = "out")]
    output_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    info!("Starting viewfinder_curate");

    let args = Args::parse();

    if args.sources.is_empty() {
        bail!(
            "no photo manifest sources given\n\
             Pass one or more JSON manifest files or http(s) URLs, for example:\n\
             viewfinder-curate photos.json https://gallery.example/api/photos"
        );
    }

    let options = CurationOptions {
        algorithm: args.algorithm,
        max_photos: args.max_photos,
        color_threshold: args.color_threshold,
    };

    orchestrator::run(&args.sources, &options, &args.output_dir).await
}

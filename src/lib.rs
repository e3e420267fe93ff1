//! Photo curation engine: turns an analyzed photo collection into ordered
//! albums using one of four strategies (best shots, chronological, color
//! story, artistic flow). The core is pure and synchronous; manifest
//! loading and output writing live in `fetch` and `orchestrator::run`.

pub mod analysis;
pub mod cluster;
pub mod color;
pub mod fetch;
pub mod models;
pub mod orchestrator;
pub mod out_models;
pub mod render;
pub mod roles;
pub mod score;
pub mod sequence;

pub use models::{CurationAlgorithm, CurationOptions, EnrichedPhoto, PhotoRecord};
pub use orchestrator::curate;
pub use out_models::Album;
pub use roles::NarrativeRole;

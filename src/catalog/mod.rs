use std::path::Path;

mod entity;
mod parse;
mod sample;
mod store;

pub use entity::{CatalogError, Entity, Relationship};
pub use parse::load_catalog;
pub use sample::sample_entities;
pub use store::AssetStore;

/// Reads `path` when given, otherwise falls back to the bundled sample assets.
pub fn load_or_sample(path: Option<&Path>) -> anyhow::Result<Vec<Entity>> {
    match path {
        Some(path) => load_catalog(path),
        None => {
            tracing::info!("no catalog given, using sample assets");
            Ok(sample_entities())
        }
    }
}

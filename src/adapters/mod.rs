// Adapters layer: concrete catalog sources (memory, JSON file, admin HTTP API).

pub mod catalog;

pub use catalog::{catalog_from_config, HttpCatalog, InMemoryCatalog, JsonFileCatalog};

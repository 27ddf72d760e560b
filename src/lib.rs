pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpCatalog, InMemoryCatalog, JsonFileCatalog};
pub use config::store_config::StoreConfig;
pub use core::{
    cart::Cart,
    intake::OrderIntake,
    matcher::{resolve_line_items, ProductMatcher},
    message::{whatsapp_link, OrderMessageBuilder},
    parser::parse_order,
};
pub use utils::error::{OrderError, Result};

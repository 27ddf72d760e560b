pub mod cart;
pub mod intake;
pub mod matcher;
pub mod message;
pub mod parser;
pub mod sale;

pub use crate::domain::model::{
    CartItem, CatalogProduct, CustomerInfo, MatchTuning, ParsedLineItem, ParsedOrder,
    ResolvedLineItem, SaleDraft,
};
pub use crate::domain::ports::{CatalogSource, ConfigProvider};
pub use crate::utils::error::Result;

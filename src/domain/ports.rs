use crate::domain::model::{CatalogProduct, MatchTuning};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 提供一份目錄快照；每次呼叫都應回傳最新資料，核心不做快取
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Vec<CatalogProduct>>;
}

pub trait ConfigProvider: Send + Sync {
    fn store_name(&self) -> &str;
    fn whatsapp_number(&self) -> &str;
    fn match_tuning(&self) -> MatchTuning;
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 沒有 `Cliente:` 欄位時使用的客戶名稱
pub const DEFAULT_CUSTOMER_NAME: &str = "Sin nombre";

/// 比對名稱時，token 長度必須「大於」這個值才會被計分
pub const MIN_TOKEN_CHARS_EXCLUSIVE: usize = 2;

/// token 重疊的門檻；實際門檻是 `min(此值, 提示 token 數)`
pub const REQUIRED_TOKEN_OVERLAP: usize = 2;

/// Fuzzy matching thresholds. Defaults keep the storefront's historical behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTuning {
    pub min_token_chars: usize,
    pub required_overlap: usize,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            min_token_chars: MIN_TOKEN_CHARS_EXCLUSIVE,
            required_overlap: REQUIRED_TOKEN_OVERLAP,
        }
    }
}

/// 從訊息文字解析出的訂單，尚未對照商品目錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedOrder {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
    pub line_items: Vec<ParsedLineItem>,
}

impl Default for ParsedOrder {
    fn default() -> Self {
        Self {
            customer_name: DEFAULT_CUSTOMER_NAME.to_string(),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
            line_items: Vec::new(),
        }
    }
}

impl ParsedOrder {
    pub fn customer(&self) -> CustomerInfo {
        CustomerInfo {
            name: self.customer_name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// 一行商品。`unit_price_hint` 是 `Precio:` 後面寫的金額；
/// 店面產生的訊息裡，這個金額是整行的小計（單價 × 數量）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLineItem {
    pub explicit_product_id: Option<u64>,
    pub name_hint: String,
    pub quantity: u32,
    pub unit_price_hint: f64,
}

/// Read-only catalog entry. Accepts both the admin API (`precioVenta`) and
/// storefront (`price`) field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: u64,
    pub name: String,
    #[serde(alias = "precioVenta", alias = "price")]
    pub sale_price: f64,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl CatalogProduct {
    pub fn new(id: u64, name: impl Into<String>, sale_price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            sale_price,
            emoji: None,
            category: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLineItem {
    /// `None` 表示目錄中找不到，需要人工確認
    pub product_id: Option<u64>,
    pub resolved_name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub emoji: String,
    pub quantity: u32,
}

/// 交給銷售記錄端的草稿；庫存扣減不在這裡處理
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub nombre: String,
    pub customer: CustomerInfo,
    pub productos: Vec<ResolvedLineItem>,
    pub total: f64,
    pub total_productos: usize,
    pub total_unidades: u64,
    pub fecha: DateTime<Utc>,
}

use crate::config::store_config::{CatalogConfig, CatalogSourceKind};
use crate::domain::model::CatalogProduct;
use crate::domain::ports::CatalogSource;
use crate::utils::error::{OrderError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<CatalogProduct>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn load(&self) -> Result<Vec<CatalogProduct>> {
        Ok(self.products.clone())
    }
}

/// 從 JSON 陣列檔案讀取目錄（例如後台匯出的 `/api/products` 回應）
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn load(&self) -> Result<Vec<CatalogProduct>> {
        tracing::debug!("Reading catalog from: {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        let products: Vec<CatalogProduct> = serde_json::from_str(&content)?;
        Ok(products)
    }
}

/// 後台的 `GET /api/products`，需要登入後的 bearer token
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpCatalog {
    pub fn new(endpoint: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn load(&self) -> Result<Vec<CatalogProduct>> {
        tracing::debug!("Making catalog request to: {}", self.endpoint);

        let mut request = self.client.get(&self.endpoint);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Catalog response status: {}", status);

        if !status.is_success() {
            return Err(OrderError::CatalogError {
                message: format!("{} returned HTTP {}", self.endpoint, status),
            });
        }

        let products: Vec<CatalogProduct> = response.json().await?;
        tracing::info!("📦 Loaded {} product(s) from catalog endpoint", products.len());
        Ok(products)
    }
}

#[async_trait]
impl CatalogSource for Box<dyn CatalogSource> {
    async fn load(&self) -> Result<Vec<CatalogProduct>> {
        (**self).load().await
    }
}

/// 依設定檔 `[catalog]` 區段建立目錄來源
pub fn catalog_from_config(config: &CatalogConfig) -> Result<Box<dyn CatalogSource>> {
    match config.source {
        CatalogSourceKind::File => {
            let path = validate_required_field("catalog.path", &config.path)?;
            Ok(Box::new(JsonFileCatalog::new(path)))
        }
        CatalogSourceKind::Http => {
            let endpoint = validate_required_field("catalog.endpoint", &config.endpoint)?;
            let timeout =
                Duration::from_secs(config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));
            Ok(Box::new(HttpCatalog::new(
                endpoint.clone(),
                config.token.clone(),
                timeout,
            )?))
        }
    }
}

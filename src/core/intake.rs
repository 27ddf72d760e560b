use crate::core::matcher::ProductMatcher;
use crate::core::parser::parse_order;
use crate::domain::model::{MatchTuning, SaleDraft};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{OrderError, Result};
use chrono::Utc;

/// 把貼上的 WhatsApp 訊息轉成銷售草稿：解析、對照目錄、計算總額
pub struct OrderIntake<C: CatalogSource> {
    catalog: C,
    tuning: MatchTuning,
}

impl<C: CatalogSource> OrderIntake<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_tuning(catalog, MatchTuning::default())
    }

    pub fn with_tuning(catalog: C, tuning: MatchTuning) -> Self {
        Self { catalog, tuning }
    }

    pub async fn process(&self, text: &str) -> Result<SaleDraft> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OrderError::EmptyMessage);
        }

        let parsed = parse_order(text);
        if parsed.line_items.is_empty() {
            tracing::warn!("⚠️ No products found in order message");
            return Err(OrderError::NoProductsFound);
        }
        tracing::info!(
            "📝 Parsed order for '{}' with {} line item(s)",
            parsed.customer_name,
            parsed.line_items.len()
        );

        // 每次都重新載入目錄，價格以目錄為準
        let catalog = self.catalog.load().await?;
        tracing::debug!("Loaded catalog snapshot with {} product(s)", catalog.len());

        let resolved = ProductMatcher::with_tuning(&catalog, self.tuning).resolve_all(&parsed.line_items);
        let draft = SaleDraft::from_order(&parsed, resolved, Utc::now());

        let unmatched = draft.unmatched().len();
        if unmatched > 0 {
            tracing::warn!("⚠️ {} line item(s) need manual review (no catalog match)", unmatched);
        }
        tracing::info!(
            "✅ Sale draft '{}' ready: {} product(s), {} unit(s)",
            draft.nombre,
            draft.total_productos,
            draft.total_unidades
        );

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CatalogProduct;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCatalog {
        products: Vec<CatalogProduct>,
        loads: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSource for CountingCatalog {
        async fn load(&self) -> Result<Vec<CatalogProduct>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.products.clone())
        }
    }

    fn catalog() -> CountingCatalog {
        CountingCatalog {
            products: vec![CatalogProduct::new(5, "Carne para hamburguesa x4", 18000.0)],
            loads: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_process_builds_draft() {
        let intake = OrderIntake::new(catalog());
        let text = "Cliente: Ana\n--- PRODUCTOS ---\nID: 5 - Carne x4\nCantidad: 2\nPrecio: $36.000\nTOTAL: $36.000";

        let draft = intake.process(text).await.unwrap();
        assert_eq!(draft.nombre, "WhatsApp - Ana");
        assert_eq!(draft.total, 36000.0);
        assert!(draft.unmatched().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let intake = OrderIntake::new(catalog());
        assert!(matches!(intake.process("  \n ").await, Err(OrderError::EmptyMessage)));
    }

    #[tokio::test]
    async fn test_no_products_skips_catalog_load() {
        let intake = OrderIntake::new(catalog());
        let result = intake.process("Cliente: Ana\nHola, quiero pedir").await;

        assert!(matches!(result, Err(OrderError::NoProductsFound)));
        assert_eq!(intake.catalog.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_catalog_is_loaded_per_call() {
        let intake = OrderIntake::new(catalog());
        let text = "--- PRODUCTOS ---\nPan Cantidad: 1 Precio: $2.000";

        intake.process(text).await.unwrap();
        intake.process(text).await.unwrap();
        assert_eq!(intake.catalog.loads.load(Ordering::SeqCst), 2);
    }
}

use crate::domain::model::{CatalogProduct, MatchTuning, ParsedLineItem, ResolvedLineItem};

pub use crate::domain::model::{MIN_TOKEN_CHARS_EXCLUSIVE, REQUIRED_TOKEN_OVERLAP};

/// 將解析出的商品對照到目錄快照。只讀取快照，不保留任何狀態。
pub struct ProductMatcher<'a> {
    catalog: &'a [CatalogProduct],
    tuning: MatchTuning,
}

impl<'a> ProductMatcher<'a> {
    pub fn new(catalog: &'a [CatalogProduct]) -> Self {
        Self::with_tuning(catalog, MatchTuning::default())
    }

    pub fn with_tuning(catalog: &'a [CatalogProduct], tuning: MatchTuning) -> Self {
        Self { catalog, tuning }
    }

    /// 有明確編號時只依編號查找；找不到就交給人工確認，不再用名稱猜
    pub fn find(&self, item: &ParsedLineItem) -> Option<&'a CatalogProduct> {
        match item.explicit_product_id {
            Some(id) => {
                let found = self.catalog.iter().find(|p| p.id == id);
                if found.is_none() {
                    tracing::debug!("Product id {} not in catalog, leaving '{}' unmatched", id, item.name_hint);
                }
                found
            }
            None => self.find_by_name(&item.name_hint),
        }
    }

    /// Four tiers, first hit wins: exact, catalog contains hint, hint contains
    /// catalog name, then token overlap.
    pub fn find_by_name(&self, name_hint: &str) -> Option<&'a CatalogProduct> {
        let query = name_hint.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let lowered: Vec<(String, &'a CatalogProduct)> = self
            .catalog
            .iter()
            .map(|p| (p.name.to_lowercase(), p))
            .collect();

        if let Some((_, p)) = lowered.iter().find(|(name, _)| *name == query) {
            return Some(*p);
        }
        if let Some((_, p)) = lowered.iter().find(|(name, _)| name.contains(&query)) {
            return Some(*p);
        }
        if let Some((_, p)) = lowered.iter().find(|(name, _)| query.contains(name.as_str())) {
            return Some(*p);
        }

        self.best_token_overlap(&query, &lowered)
    }

    fn best_token_overlap(
        &self,
        query: &str,
        lowered: &[(String, &'a CatalogProduct)],
    ) -> Option<&'a CatalogProduct> {
        let words: Vec<&str> = query
            .split_whitespace()
            .filter(|w| w.chars().count() > self.tuning.min_token_chars)
            .collect();
        let required = self.tuning.required_overlap.min(words.len());

        let mut best = None;
        let mut best_score = 0;
        for (name, product) in lowered {
            let tokens: Vec<&str> = name.split_whitespace().collect();
            let score = words
                .iter()
                .filter(|w| tokens.iter().any(|t| t.contains(**w) || w.contains(*t)))
                .count();

            // 嚴格大於，同分時保留目錄中較前面的商品
            if score > best_score && score >= required {
                best_score = score;
                best = Some(*product);
            }
        }
        best
    }

    pub fn resolve(&self, item: &ParsedLineItem) -> ResolvedLineItem {
        match self.find(item) {
            Some(product) => ResolvedLineItem {
                product_id: Some(product.id),
                resolved_name: product.name.clone(),
                unit_price: product.sale_price,
                quantity: item.quantity,
                line_total: product.sale_price * f64::from(item.quantity),
            },
            None => {
                tracing::debug!("No catalog match for '{}'", item.name_hint);
                // 訊息中的 Precio 是整行小計，換算回單價
                let unit_price = if item.quantity > 0 {
                    (item.unit_price_hint / f64::from(item.quantity)).round()
                } else {
                    item.unit_price_hint
                };
                ResolvedLineItem {
                    product_id: None,
                    resolved_name: item.name_hint.clone(),
                    unit_price,
                    quantity: item.quantity,
                    line_total: unit_price * f64::from(item.quantity),
                }
            }
        }
    }

    pub fn resolve_all(&self, items: &[ParsedLineItem]) -> Vec<ResolvedLineItem> {
        items.iter().map(|item| self.resolve(item)).collect()
    }
}

/// 使用預設門檻對照整張訂單
pub fn resolve_line_items(
    items: &[ParsedLineItem],
    catalog: &[CatalogProduct],
) -> Vec<ResolvedLineItem> {
    ProductMatcher::new(catalog).resolve_all(items)
}

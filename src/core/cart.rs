use crate::domain::model::{CartItem, CatalogProduct};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 沒有 emoji 的商品在資料庫中的預設值
const DEFAULT_EMOJI: &str = "📦";

/// 店面購物車。由呼叫端持有並傳入，不使用全域狀態。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, product: &CatalogProduct) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == product.id) {
            existing.quantity += 1;
            return;
        }

        self.items.push(CartItem {
            id: product.id,
            name: product.name.clone(),
            price: product.sale_price,
            emoji: product
                .emoji
                .clone()
                .unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
            quantity: 1,
        });
    }

    /// 數量降到 0 以下時移除該商品。找不到商品時回傳 `false`。
    pub fn update_quantity(&mut self, product_id: u64, delta: i64) -> bool {
        let Some(index) = self.items.iter().position(|i| i.id == product_id) else {
            return false;
        };

        let quantity = i64::from(self.items[index].quantity) + delta;
        if quantity <= 0 {
            self.items.remove(index);
        } else {
            self.items[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        true
    }

    pub fn remove(&mut self, product_id: u64) {
        self.items.retain(|i| i.id != product_id);
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.price * f64::from(i.quantity))
            .sum()
    }

    /// 購物車可能存著舊的商品編號（例如目錄重建後）。
    /// 對目錄中已不存在的編號，改用同名商品（不分大小寫）的編號。
    pub fn reconcile_ids(&mut self, catalog: &[CatalogProduct]) -> bool {
        let by_name: HashMap<String, &CatalogProduct> = catalog
            .iter()
            .map(|p| (p.name.to_lowercase(), p))
            .collect();

        let mut changed = false;
        for item in &mut self.items {
            if catalog.iter().any(|p| p.id == item.id) {
                continue;
            }
            if let Some(product) = by_name.get(&item.name.to_lowercase()) {
                tracing::debug!(
                    "Cart item '{}' re-pointed from id {} to {}",
                    item.name,
                    item.id,
                    product.id
                );
                item.id = product.id;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burger() -> CatalogProduct {
        CatalogProduct {
            emoji: Some("🍔".to_string()),
            ..CatalogProduct::new(1, "Carne para hamburguesa x4", 18000.0)
        }
    }

    #[test]
    fn test_add_same_product_increments_quantity() {
        let mut cart = Cart::new();
        cart.add(&burger());
        cart.add(&burger());
        cart.add(&CatalogProduct::new(9, "Pan", 2000.0));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[0].emoji, "🍔");
        assert_eq!(cart.items()[1].emoji, "📦");
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), 38000.0);
    }

    #[test]
    fn test_update_quantity_removes_at_zero() {
        let mut cart = Cart::new();
        cart.add(&burger());

        assert!(cart.update_quantity(1, 2));
        assert_eq!(cart.items()[0].quantity, 3);

        assert!(cart.update_quantity(1, -3));
        assert!(cart.is_empty());
        assert!(!cart.update_quantity(1, 1));
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(&burger());
        cart.remove(1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_reconcile_ids_by_name() {
        let mut cart = Cart::from_items(vec![
            CartItem {
                id: 101,
                name: "carne para hamburguesa X4".to_string(),
                price: 18000.0,
                emoji: "🍔".to_string(),
                quantity: 1,
            },
            CartItem {
                id: 102,
                name: "Producto retirado".to_string(),
                price: 5000.0,
                emoji: String::new(),
                quantity: 1,
            },
        ]);

        assert!(cart.reconcile_ids(&[burger()]));
        assert_eq!(cart.items()[0].id, 1);
        assert_eq!(cart.items()[1].id, 102);

        // 第二次已經沒有需要修正的
        assert!(!cart.reconcile_ids(&[burger()]));
    }
}

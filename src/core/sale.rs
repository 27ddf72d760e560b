use crate::domain::model::{ParsedOrder, ResolvedLineItem, SaleDraft};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::io::Write;

impl SaleDraft {
    pub fn from_order(
        order: &ParsedOrder,
        productos: Vec<ResolvedLineItem>,
        fecha: DateTime<Utc>,
    ) -> Self {
        let total = productos.iter().map(|p| p.line_total).sum();
        let total_unidades = productos.iter().map(|p| u64::from(p.quantity)).sum();

        Self {
            nombre: format!("WhatsApp - {}", order.customer_name),
            customer: order.customer(),
            total_productos: productos.len(),
            productos,
            total,
            total_unidades,
            fecha,
        }
    }

    /// 目錄中找不到的商品，需要店員確認後才能扣庫存
    pub fn unmatched(&self) -> Vec<&ResolvedLineItem> {
        self.productos
            .iter()
            .filter(|p| p.product_id.is_none())
            .collect()
    }

    /// `POST /api/ventas` 的請求內容
    pub fn to_api_payload(&self) -> serde_json::Value {
        let productos: Vec<serde_json::Value> = self
            .productos
            .iter()
            .map(|p| {
                json!({
                    "productId": p.product_id,
                    "id": p.product_id,
                    "nombre": p.resolved_name,
                    "precioUnit": p.unit_price,
                    "precioVenta": p.unit_price,
                    "cantidad": p.quantity,
                    "total": p.line_total,
                })
            })
            .collect();

        json!({
            "nombre": self.nombre,
            "productos": productos,
            "total": self.total,
            "totalProductos": self.total_productos,
            "totalUnidades": self.total_unidades,
        })
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for line in &self.productos {
            csv_writer.serialize(line)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

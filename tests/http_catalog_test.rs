use anyhow::Result;
use httpmock::prelude::*;
use std::time::Duration;
use whatsapp_orders::core::CatalogSource;
use whatsapp_orders::{HttpCatalog, OrderError, OrderIntake};

fn admin_products() -> serde_json::Value {
    serde_json::json!([
        {"id": 1, "name": "Carne para hamburguesa x4", "emoji": "🍔", "category": "Carnes Preparadas",
         "precioCompra": 12000, "precioVenta": 18000, "cantidad": 20, "vendido": 4, "description": ""},
        {"id": 3, "name": "Albondigas de res x12", "emoji": "🧆", "category": "Carnes Preparadas",
         "precioCompra": 15000, "precioVenta": 22000, "cantidad": 8, "vendido": 1, "description": ""}
    ])
}

#[tokio::test]
async fn test_http_catalog_sends_bearer_token() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products")
                .header("Authorization", "Bearer token-admin");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(admin_products());
        })
        .await;

    let catalog = HttpCatalog::new(
        server.url("/api/products"),
        Some("token-admin".to_string()),
        Duration::from_secs(5),
    )?;
    let products = catalog.load().await?;

    api_mock.assert_async().await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].sale_price, 18000.0);
    assert_eq!(products[1].category.as_deref(), Some("Carnes Preparadas"));
    Ok(())
}

#[tokio::test]
async fn test_http_catalog_unauthorized() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products");
            then.status(401)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"error": "No autorizado"}));
        })
        .await;

    let catalog = HttpCatalog::new(server.url("/api/products"), None, Duration::from_secs(5))?;
    let err = catalog.load().await.unwrap_err();

    assert!(matches!(err, OrderError::CatalogError { .. }));
    assert!(err.to_string().contains("401"));
    Ok(())
}

#[tokio::test]
async fn test_intake_over_http_catalog() -> Result<()> {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(admin_products());
        })
        .await;

    let catalog = HttpCatalog::new(server.url("/api/products"), None, Duration::from_secs(5))?;
    let intake = OrderIntake::new(catalog);
    let text = "Cliente: Ana\nTelefono: 300\nDireccion: Calle 1\n--- PRODUCTOS ---\nID: 1 - 🍔 Carne x4\n   Cantidad: 3\n   Precio: $54.000\nTOTAL: $54.000";

    let draft = intake.process(text).await?;

    api_mock.assert_async().await;
    assert_eq!(draft.productos[0].resolved_name, "Carne para hamburguesa x4");
    assert_eq!(draft.total, 54000.0);
    Ok(())
}

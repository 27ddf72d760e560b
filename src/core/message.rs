use crate::core::cart::Cart;
use crate::domain::model::CustomerInfo;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{OrderError, Result};
use crate::utils::money::format_price;
use crate::utils::validation::validate_whatsapp_number;
use std::fmt::Write;
use url::Url;

/// 產生店面「Enviar por WhatsApp」送出的訂單訊息
pub struct OrderMessageBuilder<C: ConfigProvider> {
    config: C,
}

impl<C: ConfigProvider> OrderMessageBuilder<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    pub fn build(&self, customer: &CustomerInfo, cart: &Cart) -> Result<String> {
        validate_checkout(customer, cart)?;

        let mut message = String::new();
        // 寫入 String 不會失敗
        let _ = writeln!(message, "*NUEVO PEDIDO - {}*\n", self.config.store_name());
        let _ = writeln!(message, "*Cliente:* {}", customer.name.trim());
        let _ = writeln!(message, "*Telefono:* {}", customer.phone.trim());
        let _ = writeln!(message, "*Direccion:* {}", customer.address.trim());

        let notes = customer.notes.trim();
        if !notes.is_empty() {
            let _ = writeln!(message, "*Notas:* {}", notes);
        }

        message.push_str("\n*--- PRODUCTOS ---*\n");

        for item in cart.items() {
            let _ = writeln!(message, "ID: {} - {} {}", item.id, item.emoji, item.name);
            let _ = writeln!(message, "   Cantidad: {}", item.quantity);
            let _ = writeln!(
                message,
                "   Precio: ${}\n",
                format_price(item.price * f64::from(item.quantity))
            );
        }

        let _ = writeln!(message, "*TOTAL: ${}*\n", format_price(cart.total_price()));
        message.push_str("Gracias por tu pedido!");

        tracing::debug!(
            "Built order message with {} item(s) for '{}'",
            cart.items().len(),
            customer.name.trim()
        );
        Ok(message)
    }

    /// `https://wa.me/<número>?text=<訊息>`
    pub fn link(&self, message: &str) -> Result<String> {
        whatsapp_link(self.config.whatsapp_number(), message)
    }
}

/// 姓名、電話、地址為必填，購物車不能是空的
pub fn validate_checkout(customer: &CustomerInfo, cart: &Cart) -> Result<()> {
    if cart.is_empty() {
        return Err(OrderError::ValidationError {
            message: "El carrito está vacío".to_string(),
        });
    }
    if customer.name.trim().is_empty()
        || customer.phone.trim().is_empty()
        || customer.address.trim().is_empty()
    {
        return Err(OrderError::ValidationError {
            message: "Por favor completa todos los campos requeridos".to_string(),
        });
    }
    Ok(())
}

pub fn whatsapp_link(number: &str, message: &str) -> Result<String> {
    validate_whatsapp_number("whatsapp_number", number)?;

    let url = Url::parse_with_params(&format!("https://wa.me/{}", number), &[("text", message)])
        .map_err(|e| OrderError::ValidationError {
            message: format!("Invalid WhatsApp link: {}", e),
        })?;
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store_config::StoreConfig;
    use crate::domain::model::CartItem;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Ana".to_string(),
            phone: "3001234567".to_string(),
            address: "Calle 1 # 2-3".to_string(),
            notes: String::new(),
        }
    }

    fn cart() -> Cart {
        Cart::from_items(vec![CartItem {
            id: 5,
            name: "Carne para hamburguesa x4".to_string(),
            price: 18000.0,
            emoji: "🍔".to_string(),
            quantity: 2,
        }])
    }

    #[test]
    fn test_build_message_layout() {
        let builder = OrderMessageBuilder::new(StoreConfig::default());
        let message = builder.build(&customer(), &cart()).unwrap();

        let expected = "*NUEVO PEDIDO - Mi Tienda*\n\n\
                        *Cliente:* Ana\n\
                        *Telefono:* 3001234567\n\
                        *Direccion:* Calle 1 # 2-3\n\
                        \n*--- PRODUCTOS ---*\n\
                        ID: 5 - 🍔 Carne para hamburguesa x4\n   Cantidad: 2\n   Precio: $36.000\n\n\
                        *TOTAL: $36.000*\n\n\
                        Gracias por tu pedido!";
        assert_eq!(message, expected);
    }

    #[test]
    fn test_notes_line_only_when_present() {
        let builder = OrderMessageBuilder::new(StoreConfig::default());
        let mut with_notes = customer();
        with_notes.notes = "Sin cebolla".to_string();

        let message = builder.build(&with_notes, &cart()).unwrap();
        assert!(message.contains("*Notas:* Sin cebolla\n"));
        assert!(!builder.build(&customer(), &cart()).unwrap().contains("Notas"));
    }

    #[test]
    fn test_checkout_requires_fields_and_items() {
        let builder = OrderMessageBuilder::new(StoreConfig::default());

        let mut missing_address = customer();
        missing_address.address = "  ".to_string();
        assert!(matches!(
            builder.build(&missing_address, &cart()),
            Err(OrderError::ValidationError { .. })
        ));
        assert!(matches!(
            builder.build(&customer(), &Cart::new()),
            Err(OrderError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let link = whatsapp_link("573001234567", "Hola *Ana*\nTOTAL: $36.000").unwrap();
        let parsed = Url::parse(&link).unwrap();

        assert_eq!(parsed.host_str(), Some("wa.me"));
        assert_eq!(parsed.path(), "/573001234567");
        let text = parsed
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned());
        assert_eq!(text.as_deref(), Some("Hola *Ana*\nTOTAL: $36.000"));
    }

    #[test]
    fn test_whatsapp_link_rejects_formatted_number() {
        assert!(whatsapp_link("+57 300 123 4567", "hola").is_err());
    }
}

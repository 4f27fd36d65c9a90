use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderStatus};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OrderItemInput {
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// The generated human-readable reference.
    #[serde(rename = "orderId")]
    pub reference: String,
    pub order: Order,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_order_payload_rejects_unknown_fields() {
        let valid = serde_json::json!({
            "items": [{ "name": "Board", "quantity": 1, "price": 10.00, "image": null }],
            "email": "a@example.com",
            "firstName": "Sam",
            "lastName": "Builder",
            "address": "1 Timber Yard",
            "city": "Leeds",
            "postcode": "LS1 1AA"
        });
        assert!(serde_json::from_value::<CreateOrderRequest>(valid.clone()).is_ok());

        let mut stray = valid;
        stray["amountOverride"] = serde_json::json!(0.01);
        assert!(serde_json::from_value::<CreateOrderRequest>(stray).is_err());
    }

    #[test]
    fn status_payload_rejects_unknown_fields() {
        let valid = serde_json::json!({ "status": "shipped" });
        assert!(serde_json::from_value::<UpdateOrderStatusRequest>(valid).is_ok());

        let stray = serde_json::json!({ "status": "shipped", "amount": 1.00 });
        assert!(serde_json::from_value::<UpdateOrderStatusRequest>(stray).is_err());
    }
}

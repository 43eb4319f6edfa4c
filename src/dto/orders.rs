use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    domain::{OrderType, pricing::{LineCustomization, LineRequest}},
    models::{Address, Order, OrderItem, PaymentMethod},
};

fn known_order_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<OrderType>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("order_type");
        err.message = Some("Invalid order type".into());
        err
    })
}

fn known_payment_method(value: &str) -> Result<(), ValidationError> {
    value.parse::<PaymentMethod>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("payment_method");
        err.message = Some("Invalid payment method".into());
        err
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    #[serde(alias = "menuItemId")]
    pub menu_item: Uuid,
    #[validate(range(min = 1, max = 100, message = "Quantity must be between 1 and 100"))]
    pub quantity: i32,
    #[serde(default)]
    pub customizations: Vec<LineCustomization>,
    #[validate(length(max = 500, message = "Instructions cannot exceed 500 characters"))]
    pub special_instructions: Option<String>,
}

impl From<OrderLineInput> for LineRequest {
    fn from(input: OrderLineInput) -> Self {
        Self {
            menu_item_id: input.menu_item,
            quantity: input.quantity,
            customizations: input.customizations,
            special_instructions: input.special_instructions,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<OrderLineInput>,
    #[validate(custom(function = "known_order_type"))]
    pub order_type: String,
    #[validate(custom(function = "known_payment_method"))]
    pub payment_method: String,
    #[validate(nested)]
    pub delivery_address: Option<Address>,
    #[validate(length(max = 500, message = "Instructions cannot exceed 500 characters"))]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RateOrderRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 500, message = "Review cannot exceed 500 characters"))]
    pub review: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub orders: Vec<OrderWithItems>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: serde_json::Value) -> CreateOrderRequest {
        serde_json::from_value(json).expect("request body")
    }

    #[test]
    fn empty_items_fail_validation() {
        let req = body(serde_json::json!({
            "items": [],
            "orderType": "takeaway",
            "paymentMethod": "cash"
        }));
        let errors = req.validate().expect_err("empty order");
        assert!(errors.errors().contains_key("items"));
    }

    #[test]
    fn unknown_order_type_and_payment_method_fail_validation() {
        let req = body(serde_json::json!({
            "items": [{ "menuItem": Uuid::new_v4(), "quantity": 1 }],
            "orderType": "drive_through",
            "paymentMethod": "barter"
        }));
        let errors = req.validate().expect_err("bad enums");
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn hyphenated_dine_in_is_accepted() {
        let req = body(serde_json::json!({
            "items": [{ "menuItemId": Uuid::new_v4(), "quantity": 2, "customizations": [{ "name": "No onion" }] }],
            "orderType": "dine-in",
            "paymentMethod": "upi"
        }));
        assert!(req.validate().is_ok());
        assert_eq!(req.items[0].customizations[0].price, rust_decimal::Decimal::ZERO);
    }

    #[test]
    fn quantity_above_limit_fails_validation() {
        let req = body(serde_json::json!({
            "items": [{ "menuItem": Uuid::new_v4(), "quantity": 1_000_000_000 }],
            "orderType": "takeaway",
            "paymentMethod": "cash"
        }));
        let err: crate::error::AppError = req.validate().expect_err("huge quantity").into();
        match err {
            crate::error::AppError::Validation(fields) => {
                assert_eq!(fields[0].field, "items[0].quantity");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rating_outside_range_fails() {
        let req = RateOrderRequest {
            rating: 6,
            review: None,
        };
        assert!(req.validate().is_err());
    }
}

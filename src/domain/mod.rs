//! The order engine: pricing, the status lifecycle and order numbering.
//!
//! Everything here is free of I/O; `services::order_service` loads catalog
//! rows and persists the results inside a transaction.

pub mod order_number;
pub mod pricing;
pub mod rating;
pub mod status;

use thiserror::Error;
use uuid::Uuid;

pub use order_number::format_order_number;
pub use pricing::{CatalogEntry, LineRequest, OrderType, PricedLine, PricedOrder, price_order};
pub use rating::ensure_rateable;
pub use status::OrderStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("At least one item is required")]
    EmptyOrder,

    #[error("Menu item with ID {0} not found")]
    ItemNotFound(Uuid),

    #[error("Quantity for menu item {0} must be at least 1")]
    InvalidQuantity(Uuid),

    #[error("Order total exceeds the maximum of {0}")]
    AmountTooLarge(rust_decimal::Decimal),

    #[error("{0} is currently unavailable")]
    ItemUnavailable(String),

    #[error("Invalid status '{0}'")]
    InvalidStatus(String),

    #[error("Cannot change order status from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("Not authorized to rate this order")]
    NotAuthorized,

    #[error("Can only rate delivered orders")]
    OrderNotDeliverable,

    #[error("Order has already been rated")]
    AlreadyRated,
}

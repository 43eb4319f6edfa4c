use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::OrderError;

/// 5% sales tax.
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
/// Flat fee added to delivery orders.
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// Largest amount a NUMERIC(12, 2) money column holds: 9999999999.99.
pub const MAX_ORDER_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);
const CURRENCY_DP: u32 = 2;

text_enum! {
    pub enum OrderType {
        DineIn = "dine_in" | "dine-in",
        Takeaway = "takeaway",
        Delivery = "delivery",
    }
}

/// A chosen option on a line. Surcharges are recorded but not priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LineCustomization {
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
}

#[derive(Debug, Clone)]
pub struct LineRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub customizations: Vec<LineCustomization>,
    pub special_instructions: Option<String>,
}

/// What the engine needs to know about a catalog row.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub menu_item_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub customizations: Vec<LineCustomization>,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

pub fn tax_for(subtotal: Decimal) -> Decimal {
    round_currency(subtotal * TAX_RATE)
}

pub fn delivery_fee_for(order_type: OrderType) -> Decimal {
    match order_type {
        OrderType::Delivery => DELIVERY_FEE,
        OrderType::DineIn | OrderType::Takeaway => Decimal::ZERO,
    }
}

/// Resolves every requested line against `catalog` and computes the totals.
///
/// Lines are priced in submission order with the catalog price captured as
/// the unit price. The first missing or unavailable item aborts the whole
/// order.
pub fn price_order(
    order_type: OrderType,
    requests: &[LineRequest],
    catalog: &HashMap<Uuid, CatalogEntry>,
) -> Result<PricedOrder, OrderError> {
    if requests.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    let mut lines = Vec::with_capacity(requests.len());
    let mut subtotal = Decimal::ZERO;

    for request in requests {
        let entry = catalog
            .get(&request.menu_item_id)
            .ok_or(OrderError::ItemNotFound(request.menu_item_id))?;
        if !entry.is_available {
            return Err(OrderError::ItemUnavailable(entry.name.clone()));
        }
        if request.quantity < 1 {
            return Err(OrderError::InvalidQuantity(request.menu_item_id));
        }

        let line_total = entry.price * Decimal::from(request.quantity);
        subtotal += line_total;

        lines.push(PricedLine {
            menu_item_id: entry.id,
            name: entry.name.clone(),
            quantity: request.quantity,
            unit_price: entry.price,
            line_total,
            customizations: request.customizations.clone(),
            special_instructions: request.special_instructions.clone(),
        });
    }

    let subtotal = round_currency(subtotal);
    let tax = tax_for(subtotal);
    let delivery_fee = delivery_fee_for(order_type);
    let total = subtotal + tax + delivery_fee;
    if total > MAX_ORDER_AMOUNT {
        return Err(OrderError::AmountTooLarge(MAX_ORDER_AMOUNT));
    }

    Ok(PricedOrder {
        lines,
        subtotal,
        tax,
        delivery_fee,
        total,
    })
}

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{OrderStatus, OrderType, pricing::LineCustomization},
    entity::{
        menu_items::Model as MenuItemModel, order_items::Model as OrderItemModel,
        orders::Model as OrderModel, reservations::Model as ReservationModel,
        users::Model as UserModel,
    },
};

text_enum! {
    pub enum Role {
        Customer = "customer",
        Employee = "employee",
        Admin = "admin",
    }
}

impl Role {
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Employee | Role::Admin)
    }
}

text_enum! {
    pub enum MenuCategory {
        Appetizers = "appetizers",
        MainCourse = "main-course",
        Desserts = "desserts",
        Drinks = "drinks",
        Beverages = "beverages",
    }
}

text_enum! {
    pub enum Allergen {
        Nuts = "nuts",
        Dairy = "dairy",
        Eggs = "eggs",
        Soy = "soy",
        Wheat = "wheat",
        Fish = "fish",
        Shellfish = "shellfish",
    }
}

text_enum! {
    pub enum PaymentMethod {
        Cash = "cash",
        Card = "card",
        Upi = "upi",
        Online = "online",
    }
}

text_enum! {
    pub enum PaymentStatus {
        Pending = "pending",
        Paid = "paid",
        Failed = "failed",
        Refunded = "refunded",
    }
}

text_enum! {
    pub enum ReservationStatus {
        Pending = "pending",
        Confirmed = "confirmed",
        Cancelled = "cancelled",
        Completed = "completed",
    }
}

text_enum! {
    pub enum Occasion {
        Birthday = "birthday",
        Anniversary = "anniversary",
        Business = "business",
        Casual = "casual",
        Other = "other",
    }
}

/// Postal address; also used as the delivery address of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[validate(length(max = 200))]
    pub street: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 20))]
    pub zip_code: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

/// An option a menu item can be ordered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationOption {
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub is_required: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: MenuCategory,
    pub image: String,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_spicy: bool,
    pub allergens: Vec<Allergen>,
    pub preparation_time: i32,
    pub is_available: bool,
    pub popularity: i32,
    pub tags: Vec<String>,
    pub customizations: Vec<CustomizationOption>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_address: Option<Address>,
    pub special_instructions: Option<String>,
    pub estimated_delivery_time: Option<DateTime<Utc>>,
    pub actual_delivery_time: Option<DateTime<Utc>>,
    pub rating: Option<i32>,
    pub review: Option<String>,
    pub assigned_staff_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub customizations: Vec<LineCustomization>,
    pub special_instructions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub party_size: i32,
    pub table_number: Option<i32>,
    pub status: ReservationStatus,
    pub special_requests: Option<String>,
    pub occasion: Occasion,
    pub confirmation_code: String,
    pub assigned_staff_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// JSON columns are written by this crate only, so a shape mismatch means an
// old row; fall back to the empty value rather than failing the read.
fn from_json<T: DeserializeOwned + Default>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

fn from_json_opt<T: DeserializeOwned>(value: Option<serde_json::Value>) -> Option<T> {
    value.and_then(|v| serde_json::from_value(v).ok())
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            phone: model.phone,
            address: from_json_opt(model.address),
            is_active: model.is_active,
            last_login_at: model.last_login_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<MenuItemModel> for MenuItem {
    fn from(model: MenuItemModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            category: model.category,
            image: model.image,
            is_vegetarian: model.is_vegetarian,
            is_vegan: model.is_vegan,
            is_gluten_free: model.is_gluten_free,
            is_spicy: model.is_spicy,
            allergens: from_json(model.allergens),
            preparation_time: model.preparation_time,
            is_available: model.is_available,
            popularity: model.popularity,
            tags: from_json(model.tags),
            customizations: from_json(model.customizations),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<OrderModel> for Order {
    fn from(model: OrderModel) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            customer_id: model.customer_id,
            subtotal: model.subtotal,
            tax: model.tax,
            delivery_fee: model.delivery_fee,
            total_amount: model.total_amount,
            status: model.status,
            order_type: model.order_type,
            payment_method: model.payment_method,
            payment_status: model.payment_status,
            delivery_address: from_json_opt(model.delivery_address),
            special_instructions: model.special_instructions,
            estimated_delivery_time: model.estimated_delivery_time.map(|dt| dt.with_timezone(&Utc)),
            actual_delivery_time: model.actual_delivery_time.map(|dt| dt.with_timezone(&Utc)),
            rating: model.rating,
            review: model.review,
            assigned_staff_id: model.assigned_staff_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<OrderItemModel> for OrderItem {
    fn from(model: OrderItemModel) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            menu_item_id: model.menu_item_id,
            name: model.name,
            quantity: model.quantity,
            unit_price: model.unit_price,
            line_total: model.unit_price * Decimal::from(model.quantity),
            customizations: from_json(model.customizations),
            special_instructions: model.special_instructions,
        }
    }
}

impl From<ReservationModel> for Reservation {
    fn from(model: ReservationModel) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            date: model.date,
            time: model.time,
            party_size: model.party_size,
            table_number: model.table_number,
            status: model.status,
            special_requests: model.special_requests,
            occasion: model.occasion,
            confirmation_code: model.confirmation_code,
            assigned_staff_id: model.assigned_staff_id,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

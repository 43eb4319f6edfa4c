use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Allergen, CustomizationOption, MenuCategory, MenuItem};

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Price must be a positive number".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 10, max = 500, message = "Description must be between 10 and 500 characters"))]
    pub description: String,
    #[validate(custom(function = "non_negative_price"))]
    pub price: Decimal,
    #[serde(default = "default_category")]
    pub category: MenuCategory,
    #[validate(url(message = "Please provide a valid image URL"))]
    pub image: String,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_spicy: bool,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[validate(range(min = 0, max = 600, message = "Preparation time must be between 0 and 600 minutes"))]
    pub preparation_time: Option<i32>,
    pub is_available: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub customizations: Vec<CustomizationOption>,
}

fn default_category() -> MenuCategory {
    MenuCategory::MainCourse
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 10, max = 500, message = "Description must be between 10 and 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    pub price: Option<Decimal>,
    pub category: Option<MenuCategory>,
    #[validate(url(message = "Please provide a valid image URL"))]
    pub image: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub is_spicy: Option<bool>,
    pub allergens: Option<Vec<Allergen>>,
    #[validate(range(min = 0, max = 600, message = "Preparation time must be between 0 and 600 minutes"))]
    pub preparation_time: Option<i32>,
    pub is_available: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub customizations: Option<Vec<CustomizationOption>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemList {
    pub menu_items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub categories: Vec<MenuCategory>,
}

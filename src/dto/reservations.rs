use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::{Occasion, Reservation};

/// 24h `H:MM` or `HH:MM`.
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    let valid = value.split_once(':').is_some_and(|(h, m)| {
        let hour_ok = (1..=2).contains(&h.len())
            && h.chars().all(|c| c.is_ascii_digit())
            && h.parse::<u8>().is_ok_and(|h| h <= 23);
        let minute_ok = m.len() == 2
            && m.chars().all(|c| c.is_ascii_digit())
            && m.parse::<u8>().is_ok_and(|m| m <= 59);
        hour_ok && minute_ok
    });
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("time");
        err.message = Some("Please provide a valid time format (HH:MM)".into());
        Err(err)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(
        length(max = 100, message = "Name cannot exceed 100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(
        length(max = 20, message = "Phone cannot exceed 20 characters"),
        custom(function = "not_blank")
    )]
    pub phone: String,
    pub date: NaiveDate,
    #[validate(custom(function = "validate_time_of_day"))]
    pub time: String,
    #[validate(range(min = 1, max = 20, message = "Party size must be between 1 and 20"))]
    pub party_size: i32,
    #[validate(length(max = 500, message = "Special requests cannot exceed 500 characters"))]
    pub special_requests: Option<String>,
    pub occasion: Option<Occasion>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[validate(range(min = 1, message = "Table number must be at least 1"))]
    pub table_number: Option<i32>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReservationDateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationList {
    pub reservations: Vec<Reservation>,
}

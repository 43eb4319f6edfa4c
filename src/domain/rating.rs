use uuid::Uuid;

use super::{OrderError, OrderStatus};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Checks, in order, that `caller` owns the order, that it was delivered and
/// that it carries no rating yet.
pub fn ensure_rateable(
    owner: Uuid,
    status: OrderStatus,
    existing_rating: Option<i32>,
    caller: Uuid,
) -> Result<(), OrderError> {
    if owner != caller {
        return Err(OrderError::NotAuthorized);
    }
    if status != OrderStatus::Delivered {
        return Err(OrderError::OrderNotDeliverable);
    }
    if existing_rating.is_some() {
        return Err(OrderError::AlreadyRated);
    }
    Ok(())
}

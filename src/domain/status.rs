use super::{OrderError, OrderType};

text_enum! {
    pub enum OrderStatus {
        Pending = "pending",
        Confirmed = "confirmed",
        Preparing = "preparing",
        Ready = "ready",
        OutForDelivery = "out_for_delivery",
        Delivered = "delivered",
        Cancelled = "cancelled",
    }
}

impl OrderStatus {
    pub fn parse(value: &str) -> Result<Self, OrderError> {
        value
            .parse()
            .map_err(|_| OrderError::InvalidStatus(value.to_string()))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Successor states reachable in one step.
    ///
    /// Only delivery orders pass through `out_for_delivery`; dine-in and
    /// takeaway orders are handed over straight from `ready`.
    pub fn next_states(self, order_type: OrderType) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match (self, order_type) {
            (Pending, _) => &[Confirmed, Cancelled],
            (Confirmed, _) => &[Preparing, Cancelled],
            (Preparing, _) => &[Ready, Cancelled],
            (Ready, OrderType::Delivery) => &[OutForDelivery, Cancelled],
            (Ready, _) => &[Delivered, Cancelled],
            (OutForDelivery, _) => &[Delivered, Cancelled],
            (Delivered, _) | (Cancelled, _) => &[],
        }
    }

    pub fn can_transition_to(self, target: OrderStatus, order_type: OrderType) -> bool {
        self.next_states(order_type).contains(&target)
    }

    pub fn transition(self, target: OrderStatus, order_type: OrderType) -> Result<OrderStatus, OrderError> {
        if self.can_transition_to(target, order_type) {
            Ok(target)
        } else {
            Err(OrderError::IllegalTransition {
                from: self,
                to: target,
            })
        }
    }
}

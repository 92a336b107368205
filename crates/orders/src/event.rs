use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brewery_core::{BeerOrderId, CustomerId};
use brewery_events::Event;

use crate::order::OrderStatus;

/// Event: a beer order moved from one status to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerOrderStatusChangeEvent {
    pub order_id: BeerOrderId,
    pub customer_id: CustomerId,
    pub previous_status: OrderStatus,
    pub new_status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

impl Event for BeerOrderStatusChangeEvent {
    fn event_type(&self) -> &'static str {
        "beer_order.status_changed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl core::fmt::Display for BeerOrderStatusChangeEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "BeerOrderStatusChangeEvent(order={}, customer={}, {} -> {}, at={})",
            self.order_id,
            self.customer_id,
            self.previous_status,
            self.new_status,
            self.occurred_at.to_rfc3339()
        )
    }
}

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brewery_core::{
    BeerId, BeerOrderId, BeerOrderLineId, CustomerId, DomainError, DomainResult, Entity,
};

use crate::event::BeerOrderStatusChangeEvent;

/// Beer order status lifecycle.
///
/// - `NEW` -> `READY` | `PENDING_INVENTORY` | `PICKED_UP`
/// - `PENDING_INVENTORY` -> `READY`
/// - `READY` -> `PICKED_UP`
///
/// `PICKED_UP` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Ready,
    PendingInventory,
    PickedUp,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::Ready,
        OrderStatus::PendingInventory,
        OrderStatus::PickedUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Ready => "READY",
            OrderStatus::PendingInventory => "PENDING_INVENTORY",
            OrderStatus::PickedUp => "PICKED_UP",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::PickedUp)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (*self, next),
            (New, Ready)
                | (New, PendingInventory)
                | (New, PickedUp)
                | (PendingInventory, Ready)
                | (Ready, PickedUp)
        )
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown order status: {s}")))
    }
}

/// Requested line of a new order. The UPC is copied from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub beer_id: BeerId,
    pub upc: i64,
    pub order_quantity: i32,
}

/// Command: place a beer order for a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub customer_id: CustomerId,
    pub customer_ref: Option<String>,
    pub status_callback_url: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

/// Order line: beer, UPC and quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeerOrderLine {
    id: BeerOrderLineId,
    version: u32,
    beer_id: BeerId,
    upc: i64,
    order_quantity: i32,
    created_date: DateTime<Utc>,
    last_modified_date: DateTime<Utc>,
}

impl BeerOrderLine {
    pub fn id(&self) -> BeerOrderLineId {
        self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn beer_id(&self) -> BeerId {
        self.beer_id
    }

    pub fn upc(&self) -> i64 {
        self.upc
    }

    pub fn order_quantity(&self) -> i32 {
        self.order_quantity
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    pub fn last_modified_date(&self) -> DateTime<Utc> {
        self.last_modified_date
    }
}

/// Entity: BeerOrder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeerOrder {
    id: BeerOrderId,
    version: u32,
    customer_id: CustomerId,
    customer_ref: Option<String>,
    lines: Vec<BeerOrderLine>,
    status: OrderStatus,
    status_callback_url: Option<String>,
    created_date: DateTime<Utc>,
    last_modified_date: DateTime<Utc>,
}

impl BeerOrder {
    /// Place a new order. It starts in `NEW`.
    pub fn place(cmd: PlaceOrder, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut problems = Vec::new();
        if cmd.lines.is_empty() {
            problems.push("beerOrderLines must contain at least one line".to_string());
        }
        for (idx, line) in cmd.lines.iter().enumerate() {
            if line.order_quantity < 1 {
                problems.push(format!("beerOrderLines[{idx}].orderQuantity must be at least 1"));
            }
        }
        if let Some(url) = cmd.status_callback_url.as_deref() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                problems.push("orderStatusCallbackUrl must be an http(s) URL".to_string());
            }
        }
        DomainError::check_all(problems)?;

        let lines = cmd
            .lines
            .into_iter()
            .map(|line| BeerOrderLine {
                id: BeerOrderLineId::new(),
                version: 0,
                beer_id: line.beer_id,
                upc: line.upc,
                order_quantity: line.order_quantity,
                created_date: now,
                last_modified_date: now,
            })
            .collect();

        Ok(Self {
            id: BeerOrderId::new(),
            version: 0,
            customer_id: cmd.customer_id,
            customer_ref: cmd.customer_ref.filter(|r| !r.trim().is_empty()),
            lines,
            status: OrderStatus::New,
            status_callback_url: cmd.status_callback_url,
            created_date: now,
            last_modified_date: now,
        })
    }

    /// Move the order to `next`, returning the event describing the change.
    ///
    /// The order is left untouched when the transition is not allowed.
    pub fn change_status(
        &mut self,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<BeerOrderStatusChangeEvent> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::conflict(format!(
                "order {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }

        let previous_status = self.status;
        self.status = next;
        self.last_modified_date = now;
        self.version += 1;

        Ok(BeerOrderStatusChangeEvent {
            order_id: self.id,
            customer_id: self.customer_id,
            previous_status,
            new_status: next,
            occurred_at: now,
        })
    }

    /// Hand the order over to the customer.
    pub fn pick_up(&mut self, now: DateTime<Utc>) -> DomainResult<BeerOrderStatusChangeEvent> {
        self.change_status(OrderStatus::PickedUp, now)
    }

    pub fn belongs_to(&self, customer_id: CustomerId) -> bool {
        self.customer_id == customer_id
    }

    pub fn id_typed(&self) -> BeerOrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn customer_ref(&self) -> Option<&str> {
        self.customer_ref.as_deref()
    }

    pub fn lines(&self) -> &[BeerOrderLine] {
        &self.lines
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn status_callback_url(&self) -> Option<&str> {
        self.status_callback_url.as_deref()
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    pub fn last_modified_date(&self) -> DateTime<Utc> {
        self.last_modified_date
    }
}

impl Entity for BeerOrder {
    type Id = BeerOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u32 {
        self.version
    }
}

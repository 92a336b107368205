//! Beer order domain module.
//!
//! Orders are placed by customers, move through a small status lifecycle and
//! emit a [`BeerOrderStatusChangeEvent`] for every accepted status change.

pub mod event;
pub mod order;

pub use event::BeerOrderStatusChangeEvent;
pub use order::{BeerOrder, BeerOrderLine, NewOrderLine, OrderStatus, PlaceOrder};

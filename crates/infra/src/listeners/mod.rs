//! Event listeners run by background workers.

pub mod order_status;

pub use order_status::BeerOrderStatusChangeListener;

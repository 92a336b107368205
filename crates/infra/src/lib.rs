//! Infrastructure layer: in-memory stores, application services, the
//! order-status listener and the worker that runs it.

pub mod listeners;
pub mod repository;
pub mod seed;
pub mod services;
pub mod workers;

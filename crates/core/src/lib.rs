//! `brewery-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model, the entity contract and paging.

pub mod entity;
pub mod error;
pub mod id;
pub mod paging;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BeerId, BeerOrderId, BeerOrderLineId, CustomerId};
pub use paging::{PageRequest, PagedList};

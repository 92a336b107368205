//! Beer catalog domain module.
//!
//! This crate contains the business rules for beers, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod beer;

pub use beer::{Beer, BeerBuilder, BeerDraft, BeerFilter, BeerStyle};

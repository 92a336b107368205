//! Customer domain module (people and venues that place beer orders).

pub mod customer;

pub use customer::Customer;

//! Application services: the seam the HTTP layer talks to.
//!
//! Each service is a trait so callers (route handlers, tests) depend on the
//! behaviour, not on the in-memory wiring behind it.

pub mod beers;
pub mod customers;
pub mod orders;

pub use beers::{BeerService, BeerServiceImpl};
pub use customers::{CustomerService, CustomerServiceImpl};
pub use orders::{
    BeerOrderService, BeerOrderServiceImpl, OrderLineRequest, OrderRequest, StatusChangeEnvelope,
};

use thiserror::Error;

use brewery_core::DomainError;

use crate::repository::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

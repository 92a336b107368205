use axum::Router;

pub mod beers;
pub mod customers;
pub mod orders;
pub mod system;

/// Router for everything under the versioned API prefix.
pub fn router() -> Router {
    Router::new()
        .nest("/beer", beers::router())
        .nest("/customers", customers::router().merge(orders::router()))
}

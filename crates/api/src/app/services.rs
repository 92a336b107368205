//! Service wiring: in-memory stores, the order-status bus and its listener worker.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use brewery_beers::Beer;
use brewery_customers::Customer;
use brewery_events::InMemoryEventBus;
use brewery_infra::listeners::BeerOrderStatusChangeListener;
use brewery_infra::repository::InMemoryRepository;
use brewery_infra::seed;
use brewery_infra::services::{
    BeerOrderService, BeerOrderServiceImpl, BeerService, BeerServiceImpl, CustomerService,
    CustomerServiceImpl, StatusChangeEnvelope,
};
use brewery_infra::workers::{ListenerWorker, WorkerHandle};
use brewery_orders::BeerOrder;

/// Services shared by every request handler.
pub struct AppServices {
    pub beers: Arc<dyn BeerService>,
    pub customers: Arc<dyn CustomerService>,
    pub orders: Arc<dyn BeerOrderService>,
}

impl AppServices {
    pub fn new(
        beers: Arc<dyn BeerService>,
        customers: Arc<dyn CustomerService>,
        orders: Arc<dyn BeerOrderService>,
    ) -> Self {
        Self {
            beers,
            customers,
            orders,
        }
    }
}

/// Fully wired services plus the background worker that must be shut down on exit.
pub struct BreweryServices {
    pub services: Arc<AppServices>,
    pub status_listener: WorkerHandle,
    /// Bus carrying order status changes; extra subscribers (diagnostics, tests) attach here.
    pub status_events: Arc<InMemoryEventBus<StatusChangeEnvelope>>,
}

/// Wire the in-memory brewery and start the order-status listener.
///
/// With `seed_data`, empty stores are loaded with the default catalog.
pub fn build_services(seed_data: bool) -> anyhow::Result<BreweryServices> {
    let beer_repo = Arc::new(InMemoryRepository::<Beer>::new());
    let customer_repo = Arc::new(InMemoryRepository::<Customer>::new());
    let order_repo = Arc::new(InMemoryRepository::<BeerOrder>::new());
    let bus = Arc::new(InMemoryEventBus::<StatusChangeEnvelope>::new());

    let status_listener = ListenerWorker::spawn(
        "order-status-listener",
        &bus,
        BeerOrderStatusChangeListener::new(),
    )
    .context("failed to spawn order status listener thread")?;

    let beers = Arc::new(BeerServiceImpl::new(beer_repo.clone()));
    let customers = Arc::new(CustomerServiceImpl::new(customer_repo.clone()));
    let orders = Arc::new(BeerOrderServiceImpl::new(
        order_repo,
        beer_repo,
        customer_repo,
        bus.clone(),
    ));

    if seed_data {
        let loaded = seed::load_default_brewery(beers.as_ref(), customers.as_ref())
            .context("failed to load seed data")?;
        info!(loaded, "seed data check complete");
    }

    Ok(BreweryServices {
        services: Arc::new(AppServices::new(beers, customers, orders)),
        status_listener,
        status_events: bus,
    })
}

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use brewery_beers::Beer;
use brewery_core::{
    BeerId, BeerOrderId, CustomerId, DomainError, DomainResult, PageRequest, PagedList,
};
use brewery_customers::Customer;
use brewery_events::{EventBus, EventEnvelope};
use brewery_orders::{
    BeerOrder, BeerOrderStatusChangeEvent, NewOrderLine, OrderStatus, PlaceOrder,
};

use crate::repository::Repository;
use crate::services::{ServiceError, ServiceResult};

/// What travels on the order-status bus.
pub type StatusChangeEnvelope = EventEnvelope<BeerOrderStatusChangeEvent>;

/// One requested line of a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub beer_id: BeerId,
    pub order_quantity: i32,
}

/// A customer's request to place an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderRequest {
    pub customer_ref: Option<String>,
    pub status_callback_url: Option<String>,
    pub lines: Vec<OrderLineRequest>,
}

/// Beer order operations, always scoped to the owning customer.
pub trait BeerOrderService: Send + Sync {
    fn list_orders(
        &self,
        customer_id: CustomerId,
        page: PageRequest,
    ) -> ServiceResult<PagedList<BeerOrder>>;

    fn place_order(
        &self,
        customer_id: CustomerId,
        request: OrderRequest,
    ) -> ServiceResult<BeerOrder>;

    fn get_order_by_id(
        &self,
        customer_id: CustomerId,
        order_id: BeerOrderId,
    ) -> ServiceResult<BeerOrder>;

    /// Move an order to `status` and publish the resulting status-change event.
    fn change_order_status(
        &self,
        customer_id: CustomerId,
        order_id: BeerOrderId,
        status: OrderStatus,
    ) -> ServiceResult<BeerOrder>;

    fn pickup_order(&self, customer_id: CustomerId, order_id: BeerOrderId) -> ServiceResult<()>;
}

/// Repository-backed order service that announces status changes on a bus.
///
/// Publishing happens after the change is stored. A failed publish is logged
/// and does not undo or fail the change.
pub struct BeerOrderServiceImpl<B> {
    orders: Arc<dyn Repository<BeerOrder>>,
    beers: Arc<dyn Repository<Beer>>,
    customers: Arc<dyn Repository<Customer>>,
    bus: B,
    // Serializes read-modify-write of order status so each accepted
    // transition is stored and published exactly once.
    status_lock: Mutex<()>,
}

impl<B> BeerOrderServiceImpl<B>
where
    B: EventBus<StatusChangeEnvelope>,
{
    pub fn new(
        orders: Arc<dyn Repository<BeerOrder>>,
        beers: Arc<dyn Repository<Beer>>,
        customers: Arc<dyn Repository<Customer>>,
        bus: B,
    ) -> Self {
        Self {
            orders,
            beers,
            customers,
            bus,
            status_lock: Mutex::new(()),
        }
    }

    fn ensure_customer(&self, customer_id: CustomerId) -> ServiceResult<Customer> {
        self.customers
            .find_by_id(&customer_id)
            .ok_or_else(|| ServiceError::not_found("customer", customer_id))
    }

    /// Apply `transition` to a stored order under the status lock, store it,
    /// then publish the resulting event.
    fn apply_transition<F>(
        &self,
        customer_id: CustomerId,
        order_id: BeerOrderId,
        transition: F,
    ) -> ServiceResult<BeerOrder>
    where
        F: FnOnce(&mut BeerOrder, DateTime<Utc>) -> DomainResult<BeerOrderStatusChangeEvent>,
    {
        let (order, event) = {
            let _guard = self
                .status_lock
                .lock()
                .map_err(|_| DomainError::invariant("order status lock poisoned"))?;

            let mut order = self.get_order_by_id(customer_id, order_id)?;
            let event = transition(&mut order, Utc::now())?;
            (self.orders.save(order)?, event)
        };

        info!(
            %order_id,
            previous_status = %event.previous_status,
            new_status = %event.new_status,
            "beer order status changed"
        );
        self.publish(event);
        Ok(order)
    }

    fn publish(&self, event: BeerOrderStatusChangeEvent) {
        let envelope = EventEnvelope::wrap(event);
        let event_id = envelope.event_id();
        if let Err(err) = self.bus.publish(envelope) {
            warn!(%event_id, error = ?err, "failed to publish order status change");
        }
    }
}

impl<B> BeerOrderService for BeerOrderServiceImpl<B>
where
    B: EventBus<StatusChangeEnvelope>,
{
    fn list_orders(
        &self,
        customer_id: CustomerId,
        page: PageRequest,
    ) -> ServiceResult<PagedList<BeerOrder>> {
        self.ensure_customer(customer_id)?;
        let orders: Vec<BeerOrder> = self
            .orders
            .find_all()
            .into_iter()
            .filter(|o| o.belongs_to(customer_id))
            .collect();
        Ok(PagedList::from_all(orders, page))
    }

    fn place_order(
        &self,
        customer_id: CustomerId,
        request: OrderRequest,
    ) -> ServiceResult<BeerOrder> {
        self.ensure_customer(customer_id)?;

        let mut unknown = Vec::new();
        let mut lines = Vec::with_capacity(request.lines.len());
        for line in request.lines {
            match self.beers.find_by_id(&line.beer_id) {
                Some(beer) => lines.push(NewOrderLine {
                    beer_id: line.beer_id,
                    upc: beer.upc(),
                    order_quantity: line.order_quantity,
                }),
                None => unknown.push(format!("unknown beer: {}", line.beer_id)),
            }
        }
        DomainError::check_all(unknown)?;

        let order = BeerOrder::place(
            PlaceOrder {
                customer_id,
                customer_ref: request.customer_ref,
                status_callback_url: request.status_callback_url,
                lines,
            },
            Utc::now(),
        )?;

        info!(
            order_id = %order.id_typed(),
            %customer_id,
            lines = order.lines().len(),
            "beer order placed"
        );
        Ok(self.orders.save(order)?)
    }

    fn get_order_by_id(
        &self,
        customer_id: CustomerId,
        order_id: BeerOrderId,
    ) -> ServiceResult<BeerOrder> {
        self.ensure_customer(customer_id)?;
        self.orders
            .find_by_id(&order_id)
            .filter(|o| o.belongs_to(customer_id))
            .ok_or_else(|| ServiceError::not_found("beer order", order_id))
    }

    fn change_order_status(
        &self,
        customer_id: CustomerId,
        order_id: BeerOrderId,
        status: OrderStatus,
    ) -> ServiceResult<BeerOrder> {
        self.apply_transition(customer_id, order_id, |order, now| {
            order.change_status(status, now)
        })
    }

    fn pickup_order(&self, customer_id: CustomerId, order_id: BeerOrderId) -> ServiceResult<()> {
        self.apply_transition(customer_id, order_id, BeerOrder::pick_up)
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;
    use std::time::Duration;

    use bigdecimal::BigDecimal;
    use brewery_beers::{BeerDraft, BeerStyle};
    use brewery_core::Entity;
    use brewery_events::{InMemoryEventBus, Subscription};

    use super::*;
    use crate::repository::InMemoryRepository;

    struct Fixture {
        service: BeerOrderServiceImpl<Arc<InMemoryEventBus<StatusChangeEnvelope>>>,
        events: Subscription<StatusChangeEnvelope>,
        customer: Customer,
        beer: Beer,
    }

    fn fixture() -> Fixture {
        let beers: Arc<InMemoryRepository<Beer>> = Arc::new(InMemoryRepository::new());
        let customers: Arc<InMemoryRepository<Customer>> = Arc::new(InMemoryRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let events = bus.subscribe();

        let beer = beers.save(
            Beer::create(
                BeerDraft {
                    name: "Pinball Porter".to_string(),
                    style: BeerStyle::Porter,
                    upc: 83_783_375_213,
                    price: BigDecimal::from_str("11.95").unwrap(),
                    quantity_on_hand: 40,
                },
                Utc::now(),
            )
            .unwrap(),
        )
        .unwrap();
        let customer = customers
            .save(Customer::register("Tasting Room", Utc::now()).unwrap())
            .unwrap();

        let service = BeerOrderServiceImpl::new(
            Arc::new(InMemoryRepository::<BeerOrder>::new()),
            beers,
            customers,
            bus,
        );

        Fixture {
            service,
            events,
            customer,
            beer,
        }
    }

    fn request_for(beer: &Beer, qty: i32) -> OrderRequest {
        OrderRequest {
            customer_ref: Some("tab-12".to_string()),
            status_callback_url: None,
            lines: vec![OrderLineRequest {
                beer_id: beer.id_typed(),
                order_quantity: qty,
            }],
        }
    }

    #[test]
    fn placing_copies_upc_from_catalog_and_publishes_nothing() {
        let fx = fixture();
        let order = fx
            .service
            .place_order(fx.customer.id_typed(), request_for(&fx.beer, 3))
            .unwrap();

        assert_eq!(order.status(), OrderStatus::New);
        assert_eq!(order.lines()[0].upc(), fx.beer.upc());
        assert!(fx.events.try_recv().is_err());
    }

    #[test]
    fn unknown_beer_is_a_validation_error() {
        let fx = fixture();
        let mut request = request_for(&fx.beer, 1);
        request.lines[0].beer_id = BeerId::new();

        let err = fx.service.place_order(fx.customer.id_typed(), request).unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
    }

    #[test]
    fn unknown_customer_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .place_order(CustomerId::new(), request_for(&fx.beer, 1))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "customer", .. }));
    }

    #[test]
    fn pickup_publishes_exactly_one_event() {
        let fx = fixture();
        let customer_id = fx.customer.id_typed();
        let order = fx.service.place_order(customer_id, request_for(&fx.beer, 2)).unwrap();

        fx.service.pickup_order(customer_id, order.id_typed()).unwrap();

        let envelope = fx.events.recv_timeout(Duration::from_secs(1)).unwrap();
        let event = envelope.payload();
        assert_eq!(event.order_id, order.id_typed());
        assert_eq!(event.previous_status, OrderStatus::New);
        assert_eq!(event.new_status, OrderStatus::PickedUp);
        assert!(fx.events.try_recv().is_err());

        let stored = fx.service.get_order_by_id(customer_id, order.id_typed()).unwrap();
        assert_eq!(stored.status(), OrderStatus::PickedUp);
        assert_eq!(stored.version(), 1);
    }

    #[test]
    fn rejected_transition_publishes_nothing() {
        let fx = fixture();
        let customer_id = fx.customer.id_typed();
        let order = fx.service.place_order(customer_id, request_for(&fx.beer, 2)).unwrap();
        fx.service.pickup_order(customer_id, order.id_typed()).unwrap();
        let _ = fx.events.recv_timeout(Duration::from_secs(1)).unwrap();

        let err = fx
            .service
            .change_order_status(customer_id, order.id_typed(), OrderStatus::Ready)
            .unwrap_err();

        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));
        assert!(fx.events.try_recv().is_err());
    }

    #[test]
    fn orders_are_invisible_to_other_customers() {
        let fx = fixture();
        let order = fx
            .service
            .place_order(fx.customer.id_typed(), request_for(&fx.beer, 1))
            .unwrap();

        let stranger = fx
            .service
            .customers
            .save(Customer::register("Other Bar", Utc::now()).unwrap())
            .unwrap();
        let err = fx
            .service
            .get_order_by_id(stranger.id_typed(), order.id_typed())
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "beer order", .. }));

        let page = fx
            .service
            .list_orders(stranger.id_typed(), PageRequest::default())
            .unwrap();
        assert_eq!(page.total_elements(), 0);
    }

    #[test]
    fn second_pickup_is_a_conflict_and_publishes_nothing() {
        let fx = fixture();
        let customer_id = fx.customer.id_typed();
        let order = fx.service.place_order(customer_id, request_for(&fx.beer, 2)).unwrap();
        fx.service.pickup_order(customer_id, order.id_typed()).unwrap();
        let _ = fx.events.recv_timeout(Duration::from_secs(1)).unwrap();

        let err = fx.service.pickup_order(customer_id, order.id_typed()).unwrap_err();

        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));
        assert!(fx.events.try_recv().is_err());
        let stored = fx.service.get_order_by_id(customer_id, order.id_typed()).unwrap();
        assert_eq!(stored.version(), 1);
    }

    #[test]
    fn pickup_of_a_ready_order_reports_ready_as_previous_status() {
        let fx = fixture();
        let customer_id = fx.customer.id_typed();
        let order = fx.service.place_order(customer_id, request_for(&fx.beer, 2)).unwrap();
        fx.service
            .change_order_status(customer_id, order.id_typed(), OrderStatus::Ready)
            .unwrap();
        let _ = fx.events.recv_timeout(Duration::from_secs(1)).unwrap();

        fx.service.pickup_order(customer_id, order.id_typed()).unwrap();

        let envelope = fx.events.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(envelope.payload().previous_status, OrderStatus::Ready);
        assert_eq!(envelope.payload().new_status, OrderStatus::PickedUp);
    }
}

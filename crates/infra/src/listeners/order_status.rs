use core::convert::Infallible;

use tracing::info;

use brewery_events::EventListener;

use crate::services::StatusChangeEnvelope;

/// Records every beer order status change as a structured log line.
///
/// It never fails and does not look at the event beyond logging it.
#[derive(Debug, Default)]
pub struct BeerOrderStatusChangeListener {
    handled: u64,
}

impl BeerOrderStatusChangeListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events seen so far.
    pub fn handled(&self) -> u64 {
        self.handled
    }
}

impl EventListener<StatusChangeEnvelope> for BeerOrderStatusChangeListener {
    type Error = Infallible;

    fn on_event(&mut self, envelope: &StatusChangeEnvelope) -> Result<(), Self::Error> {
        let event = envelope.payload();
        self.handled += 1;

        info!(
            event_id = %envelope.event_id(),
            event_type = envelope.event_type(),
            order_id = %event.order_id,
            customer_id = %event.customer_id,
            previous_status = %event.previous_status,
            new_status = %event.new_status,
            %event,
            "I got an order status change event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use brewery_core::{BeerOrderId, CustomerId};
    use brewery_events::EventEnvelope;
    use brewery_orders::{BeerOrderStatusChangeEvent, OrderStatus};

    use super::*;

    fn envelope(new_status: OrderStatus) -> StatusChangeEnvelope {
        EventEnvelope::wrap(BeerOrderStatusChangeEvent {
            order_id: BeerOrderId::new(),
            customer_id: CustomerId::new(),
            previous_status: OrderStatus::New,
            new_status,
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn accepts_every_event() {
        let mut listener = BeerOrderStatusChangeListener::new();

        assert!(listener.on_event(&envelope(OrderStatus::Ready)).is_ok());
        assert!(listener.on_event(&envelope(OrderStatus::PickedUp)).is_ok());
        assert_eq!(listener.handled(), 2);
    }
}

/// Consumer of published events.
///
/// A listener is driven by a worker that owns a bus subscription, so
/// `on_event` runs on the worker's thread, never on the publisher's.
/// Returning an error only affects logging: the worker reports it and moves
/// on to the next event.
pub trait EventListener<M>: Send + 'static {
    type Error: core::fmt::Debug + Send + 'static;

    fn on_event(&mut self, event: &M) -> Result<(), Self::Error>;
}

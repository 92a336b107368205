//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus distributes events to every interested consumer (listeners,
//! workers, tests). It makes minimal assumptions:
//!
//! - **Fire-and-forget**: `publish` hands the event over and returns; it never
//!   waits for a consumer to finish.
//! - **Broadcast**: each subscription receives its own copy of every event.
//! - **No ordering guarantees across subscribers**: consumers run independently.
//! - **No persistence**: the stores are the source of truth, the bus only
//!   distributes notifications about changes already stored.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to an event stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let subscription = bus.subscribe();
///
/// loop {
///     match subscription.recv_timeout(Duration::from_millis(250)) {
///         Ok(event) => handle(event),
///         Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,  // Check for shutdown
///         Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,  // Bus closed
///     }
/// }
/// ```
///
/// Subscriptions are designed for single-threaded consumption: move one into
/// the thread that processes it.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// ```text
/// Service (store change) → Event Bus (publish) → Subscriptions
///                                                  ├─ ListenerWorker threads
///                                                  └─ tests / diagnostics
/// ```
///
/// `publish()` can fail (e.g. the bus is poisoned). Failures are surfaced to the
/// caller, which decides whether to log and continue. Listener failures are
/// never reported through `publish()`: delivery ends at the subscriber channel.
///
/// The trait requires `Send + Sync`, so a bus can be shared across request
/// handlers and publish concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}

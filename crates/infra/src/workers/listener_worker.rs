use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, warn};

use brewery_events::{EventBus, EventListener, Subscription};

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|j| j.is_finished())
    }
}

/// Runs one [`EventListener`] on its own thread, fed by a bus subscription.
///
/// - The publisher never waits on the listener
/// - Listener errors are logged and the next event is processed
/// - A panicking listener is logged and kept running
/// - Stops on [`WorkerHandle::shutdown`] or when the bus goes away
#[derive(Debug)]
pub struct ListenerWorker;

impl ListenerWorker {
    /// Subscribe `listener` to `bus` and start consuming on a named thread.
    ///
    /// The subscription is taken before this returns, so anything published
    /// afterwards reaches the listener.
    pub fn spawn<M, B, L>(name: &'static str, bus: &B, listener: L) -> std::io::Result<WorkerHandle>
    where
        M: Send + 'static,
        B: EventBus<M> + ?Sized,
        L: EventListener<M>,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub: Subscription<M> = bus.subscribe();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, sub, shutdown_rx, listener))?;

        debug!(worker = name, "listener worker started");
        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

fn worker_loop<M, L>(
    name: &'static str,
    sub: Subscription<M>,
    shutdown_rx: mpsc::Receiver<()>,
    mut listener: L,
) where
    L: EventListener<M>,
{
    let tick = Duration::from_millis(250);

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(msg) => match catch_unwind(AssertUnwindSafe(|| listener.on_event(&msg))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(worker = name, error = ?err, "event listener failed");
                }
                Err(panic) => {
                    let panic = panic_message(&*panic);
                    error!(worker = name, panic, "event listener panicked");
                }
            },
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(worker = name, "listener worker stopped");
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

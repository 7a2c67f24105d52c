use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::trace;

use crate::timer::{self, TimerHandle};

/// Holds back a changing value until it has been stable for `delay`.
///
/// Every [`Debounced::set`] restarts the wait. Subscribers only see the
/// value once the wait elapses, and only if it differs from what they saw
/// last. Dropping the `Debounced` discards a pending value.
#[derive(Debug)]
pub struct Debounced<T> {
    output: Arc<watch::Sender<T>>,
    delay: Duration,
    pending: Option<TimerHandle>,
}

impl<T> Debounced<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> (Self, watch::Receiver<T>) {
        let (tx, rx) = watch::channel(initial);
        (
            Self {
                output: Arc::new(tx),
                delay,
                pending: None,
            },
            rx,
        )
    }

    pub fn set(&mut self, value: T) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }

        if self.delay.is_zero() {
            publish(&self.output, value);
            return;
        }

        let output = Arc::clone(&self.output);
        self.pending = Some(timer::schedule(self.delay, move || {
            publish(&output, value);
        }));
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(TimerHandle::is_pending)
    }
}

fn publish<T: PartialEq>(output: &watch::Sender<T>, value: T) {
    let changed = output.send_if_modified(|current| {
        if *current == value {
            return false;
        }
        *current = value;
        true
    });
    trace!(changed, "debounced value settled");
}

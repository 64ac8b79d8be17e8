//! Fan-out point for `OperationFailed` notifications.
//!
//! A [`FailureRelay`] is owned by a service component and delivers each
//! reported failure to every subscriber, synchronously, in subscription
//! order. With no subscribers a report is dropped.
//!
//! Observers run outside the subscriber lock on a snapshot of the list, so
//! they can subscribe or unsubscribe from inside a callback; such changes
//! apply from the next report. A panicking observer is logged and skipped,
//! the remaining observers still receive the event.

use crate::domain::model::{FailureCause, FailureEvent, SubscriptionId};
use crate::domain::ports::FailureObserver;
use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Subscriber = (SubscriptionId, Arc<dyn FailureObserver>);

pub struct FailureRelay {
    sender: String,
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl FailureRelay {
    /// `sender` identifies the owning component in every event it raises.
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn subscribe<O>(&self, observer: O) -> SubscriptionId
    where
        O: FailureObserver + 'static,
    {
        self.subscribe_arc(Arc::new(observer))
    }

    pub fn subscribe_arc(&self, observer: Arc<dyn FailureObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, observer));
        tracing::debug!(sender = %self.sender, subscription = %id, "failure observer subscribed");
        id
    }

    /// Returns `false` if `id` was not (or no longer) subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        before != subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Reports that `operation_name` failed because of `cause`.
    pub fn report_failure<E>(&self, operation_name: &str, cause: E)
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let cause: Box<dyn Error + Send + Sync + 'static> = cause.into();
        self.report_failure_shared(operation_name, Arc::from(cause));
    }

    pub fn report_failure_shared(&self, operation_name: &str, cause: FailureCause) {
        let snapshot: Vec<Subscriber> = self.lock().clone();

        if snapshot.is_empty() {
            tracing::debug!(
                sender = %self.sender,
                operation = operation_name,
                "failure reported with no observers: {}",
                cause
            );
            return;
        }

        let event = FailureEvent::new(self.sender.as_str(), operation_name, cause);
        for (id, observer) in &snapshot {
            let delivered = catch_unwind(AssertUnwindSafe(|| observer.on_operation_failed(&event)));
            if let Err(payload) = delivered {
                tracing::error!(
                    sender = %self.sender,
                    operation = operation_name,
                    subscription = %id,
                    "failure observer panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    /// Reports the error of `result`, if any, under `operation_name`.
    ///
    /// The error comes back shared with the observers that received it.
    pub fn observe<T, E>(&self, operation_name: &str, result: Result<T, E>) -> Result<T, Arc<E>>
    where
        E: Error + Send + Sync + 'static,
    {
        result.map_err(|err| {
            let shared = Arc::new(err);
            let cause: FailureCause = shared.clone();
            self.report_failure_shared(operation_name, cause);
            shared
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for FailureRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureRelay")
            .field("sender", &self.sender)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

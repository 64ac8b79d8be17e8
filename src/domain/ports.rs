use crate::collections::OrderedStringMap;
use crate::core::relay::FailureRelay;
use crate::domain::model::{FailureCause, FailureEvent, SubscriptionId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;

/// Receives `OperationFailed` notifications.
///
/// Any `Fn(&FailureEvent) + Send + Sync` closure is an observer.
pub trait FailureObserver: Send + Sync {
    fn on_operation_failed(&self, event: &FailureEvent);
}

impl<F> FailureObserver for F
where
    F: Fn(&FailureEvent) + Send + Sync,
{
    fn on_operation_failed(&self, event: &FailureEvent) {
        self(event)
    }
}

/// A service component that reports failed operations to subscribers.
///
/// Implementors hold a [`FailureRelay`] and hand it out; every other method
/// has a default that goes through it.
pub trait FailableService {
    fn failure_relay(&self) -> &FailureRelay;

    fn subscribe_failures<O>(&self, observer: O) -> SubscriptionId
    where
        O: FailureObserver + 'static,
        Self: Sized,
    {
        self.failure_relay().subscribe(observer)
    }

    fn subscribe_failures_arc(&self, observer: Arc<dyn FailureObserver>) -> SubscriptionId {
        self.failure_relay().subscribe_arc(observer)
    }

    fn unsubscribe_failures(&self, id: SubscriptionId) -> bool {
        self.failure_relay().unsubscribe(id)
    }

    fn report_failure<E>(&self, operation_name: &str, cause: E)
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
        Self: Sized,
    {
        self.failure_relay().report_failure(operation_name, cause)
    }

    fn report_failure_shared(&self, operation_name: &str, cause: FailureCause) {
        self.failure_relay().report_failure_shared(operation_name, cause)
    }
}

/// Issues JSON GET requests with ordered query parameters.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_json(
        &self,
        operation: &str,
        path: &str,
        params: &OrderedStringMap,
    ) -> Result<serde_json::Value>;
}

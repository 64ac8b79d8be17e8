use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Opaque cause of a failed operation, shared by every observer of one event.
pub type FailureCause = Arc<dyn Error + Send + Sync + 'static>;

/// One failed operation, as delivered to failure observers.
#[derive(Debug, Clone)]
pub struct FailureEvent {
    pub sender: String,
    pub operation_name: String,
    pub cause: FailureCause,
    pub occurred_at: DateTime<Utc>,
}

impl FailureEvent {
    pub fn new(
        sender: impl Into<String>,
        operation_name: impl Into<String>,
        cause: FailureCause,
    ) -> Self {
        Self {
            sender: sender.into(),
            operation_name: operation_name.into(),
            cause,
            occurred_at: Utc::now(),
        }
    }

    /// Looks at the cause as a concrete error type, if it is one.
    pub fn cause_as<E: Error + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }
}

impl fmt::Display for FailureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: operation '{}' failed: {}",
            self.sender, self.operation_name, self.cause
        )
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

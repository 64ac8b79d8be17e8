pub mod api_client;
pub mod relay;

pub use crate::domain::model::{FailureCause, FailureEvent, SubscriptionId};
pub use crate::domain::ports::{FailableService, FailureObserver, Fetcher};
pub use crate::utils::error::Result;
pub use api_client::ApiClient;
pub use relay::FailureRelay;

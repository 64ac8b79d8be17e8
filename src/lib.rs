pub mod collections;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use collections::OrderedStringMap;
pub use config::{ServiceConfig, TomlConfig};
pub use crate::core::{
    ApiClient, FailableService, FailureCause, FailureEvent, FailureObserver, FailureRelay,
    Fetcher, SubscriptionId,
};
pub use utils::error::{Result, SvcError};

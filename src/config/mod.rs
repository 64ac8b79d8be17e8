pub mod toml_config;

use crate::collections::OrderedStringMap;
use crate::utils::error::{Result, SvcError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};

#[cfg(feature = "cli")]
use crate::utils::validation::parse_key_value;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub use toml_config::TomlConfig;

/// Fully resolved settings for one service call.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub name: String,
    pub endpoint: String,
    pub path: String,
    pub operation: String,
    pub timeout_seconds: u64,
    pub headers: OrderedStringMap,
    pub params: OrderedStringMap,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "small-svc".to_string(),
            endpoint: String::new(),
            path: String::new(),
            operation: "fetch".to_string(),
            timeout_seconds: 30,
            headers: OrderedStringMap::new(),
            params: OrderedStringMap::new(),
        }
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        if self.endpoint.trim().is_empty() {
            return Err(SvcError::MissingConfigError {
                field: "endpoint".to_string(),
            });
        }
        validate_url("endpoint", &self.endpoint)?;
        validate_non_empty_string("operation", &self.operation)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "small-svc")]
#[command(about = "Call a JSON endpoint with ordered parameters and report failures")]
pub struct CliConfig {
    #[arg(long, help = "Base URL of the service")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Path appended to the endpoint")]
    pub path: Option<String>,

    #[arg(long = "param", help = "Query parameter as key=value, repeatable, order kept")]
    pub params: Vec<String>,

    #[arg(long = "header", help = "Request header as key=value, repeatable")]
    pub headers: Vec<String>,

    #[arg(long, help = "Operation name used in failure reports")]
    pub operation: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "TOML configuration file; flags override it")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges the optional config file with the flags.
    ///
    /// Flag parameters and headers are applied after the file's, so a repeated
    /// key keeps the file's position and takes the flag's value.
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut service = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_service_config(),
            None => ServiceConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            service.endpoint = endpoint.clone();
        }
        if let Some(path) = &self.path {
            service.path = path.clone();
        }
        if let Some(operation) = &self.operation {
            service.operation = operation.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            service.timeout_seconds = timeout;
        }

        for raw in &self.params {
            let (key, value) = parse_key_value("param", raw)?;
            service.params.set(key, value);
        }
        for raw in &self.headers {
            let (key, value) = parse_key_value("header", raw)?;
            service.headers.set(key, value);
        }

        service.validate()?;
        Ok(service)
    }
}

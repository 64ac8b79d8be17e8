use crate::collections::OrderedStringMap;
use crate::config::ServiceConfig;
use crate::utils::error::{Result, SvcError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk configuration.
///
/// ```toml
/// [service]
/// name = "profile-service"
/// endpoint = "https://api.example.com/v1"
/// timeout_seconds = 10
///
/// [headers]
/// Accept = "application/json"
///
/// [params]
/// timestamp = "1700000000"
/// nonce = "abc"
/// ```
///
/// `[headers]` and `[params]` keep the order they are written in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceSection,
    pub headers: Option<OrderedStringMap>,
    pub params: Option<OrderedStringMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSection {
    pub name: Option<String>,
    pub endpoint: String,
    pub path: Option<String>,
    pub operation: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SvcError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn into_service_config(self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            name: self.service.name.unwrap_or(defaults.name),
            endpoint: self.service.endpoint,
            path: self.service.path.unwrap_or(defaults.path),
            operation: self.service.operation.unwrap_or(defaults.operation),
            timeout_seconds: self
                .service
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            headers: self.headers.unwrap_or_default(),
            params: self.params.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_param_order() {
        let config = TomlConfig::from_toml_str(
            r#"
[service]
endpoint = "https://api.example.com"
timeout_seconds = 5

[params]
zeta = "1"
alpha = "2"
mid = "3"
"#,
        )
        .unwrap();

        let params = config.params.clone().unwrap();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);

        let service = config.into_service_config();
        assert_eq!(service.timeout_seconds, 5);
        assert_eq!(service.name, "small-svc");
        assert!(service.headers.is_empty());
    }

    #[test]
    fn test_missing_service_section_is_error() {
        let err = TomlConfig::from_toml_str("[params]\na = \"1\"\n").unwrap_err();
        assert!(matches!(err, SvcError::TomlParseError(_)));
    }
}

use serde::Deserialize;

use crate::error::BrokerError;

/// Broker configuration, parsed from TOML. Every field has a default, so an
/// empty file is valid.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name the contract is bound under; clients resolve it by this name.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Topics created at startup.
    #[serde(default)]
    pub topics: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    9092
}

fn default_service_name() -> String {
    kaska_api::DEFAULT_SERVICE_NAME.into()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service_name: default_service_name(),
            topics: Vec::new(),
        }
    }
}

impl BrokerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, BrokerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BrokerError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, BrokerError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| BrokerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), BrokerError> {
        if self.service_name.is_empty() || self.service_name.contains('/') {
            return Err(BrokerError::Config(format!(
                "service_name '{}' must be non-empty and contain no '/'",
                self.service_name
            )));
        }
        Ok(())
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

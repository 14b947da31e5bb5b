//! Pipeline configuration.
//!
//! Canonical forms, decided once instead of tolerated everywhere: broker
//! addresses are bare `host:port`, the schema registry address always carries
//! a scheme (a bare `host:port` is normalized to `http://host:port` at
//! validation time).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::LogClientConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("schema registry address cannot be empty")]
    EmptyRegistry,

    #[error("at least one broker must be configured")]
    EmptyBrokers,

    #[error("invalid broker address '{0}' (expected host:port)")]
    InvalidBroker(String),

    #[error("a log client is required to build the pipeline")]
    MissingLogClient,
}

/// Everything the pipeline needs at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Schema registry address; `host:port` or a full URL.
    pub schema_registry: String,
    /// Delivery-layer configuration handed to the log client.
    pub log: LogClientConfig,
    /// Deadline for a synchronous submit, broker acknowledgment included.
    pub request_timeout: Duration,
    /// How long shutdown may wait for in-flight asynchronous sends.
    pub shutdown_grace: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema_registry: "localhost:8081".to_string(),
            log: LogClientConfig::default(),
            request_timeout: Duration::from_secs(30),
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_registry.trim().is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        if self.log.brokers.is_empty() {
            return Err(ConfigError::EmptyBrokers);
        }
        for broker in &self.log.brokers {
            if broker.trim().is_empty() || !broker.contains(':') {
                return Err(ConfigError::InvalidBroker(broker.clone()));
            }
        }

        Ok(())
    }

    /// The registry base URL in canonical, scheme-full form.
    pub fn registry_base_url(&self) -> String {
        let address = self.schema_registry.trim().trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        }
    }
}

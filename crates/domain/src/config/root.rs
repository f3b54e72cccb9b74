use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use crate::dns_protocol::{ResolverEndpoint, TransportProtocol, UpstreamAddr};

/// Run configuration, built once at startup and shared read-only by every worker.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Size of the worker pool
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Strip the trailing root dot from reverse names
    #[serde(default)]
    pub domain_only: bool,

    /// Resolver selection (system or custom endpoint)
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Diagnostic logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            domain_only: false,
            resolver: ResolverConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then apply CLI overrides.
    ///
    /// Without a path the built-in defaults are used.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(threads) = overrides.threads {
            self.threads = threads;
        }
        if let Some(address) = overrides.resolver_address {
            self.resolver.address = Some(address);
        }
        if let Some(port) = overrides.port {
            self.resolver.port = port;
        }
        if let Some(protocol) = overrides.protocol {
            self.resolver.protocol = protocol;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.resolver.timeout_ms = Some(timeout_ms);
        }
        if overrides.domain_only {
            self.domain_only = true;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::Validation(
                "Thread count must be at least 1".to_string(),
            ));
        }

        if self.endpoint()?.is_some() && self.resolver.port == 0 {
            return Err(ConfigError::Validation(
                "Resolver port cannot be 0".to_string(),
            ));
        }

        if self.resolver.timeout_ms == Some(0) {
            return Err(ConfigError::Validation(
                "Query timeout cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The custom resolver endpoint, or `None` for the system resolver.
    ///
    /// Only an unset or empty address selects the system resolver.
    pub fn endpoint(&self) -> Result<Option<ResolverEndpoint>, ConfigError> {
        let address = self
            .resolver
            .address
            .as_deref()
            .filter(|a| !a.is_empty());

        match address {
            None => Ok(None),
            Some(address) => {
                let addr = UpstreamAddr::parse(address, self.resolver.port)?;
                Ok(Some(ResolverEndpoint::new(addr, self.resolver.protocol)))
            }
        }
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.resolver.timeout_ms.map(Duration::from_millis)
    }
}

fn default_threads() -> usize {
    8
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub threads: Option<usize>,
    pub resolver_address: Option<String>,
    pub port: Option<u16>,
    pub protocol: Option<TransportProtocol>,
    pub timeout_ms: Option<u64>,
    pub domain_only: bool,
    pub log_level: Option<String>,
}

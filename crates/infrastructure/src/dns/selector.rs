use super::endpoint::EndpointLookup;
use crate::system::SystemLookup;
use ferrous_rdns_application::ports::{HostLookup, LookupFactory};
use ferrous_rdns_domain::{Config, ConfigError, ResolverEndpoint};
use std::sync::Arc;
use std::time::Duration;

/// Chooses the lookup backend for every worker.
///
/// A configured endpoint means queries go to that server only; otherwise the
/// operating system resolver is used.
#[derive(Debug, Clone)]
pub struct ResolverSelector {
    endpoint: Option<ResolverEndpoint>,
    timeout: Option<Duration>,
}

impl ResolverSelector {
    pub fn new(endpoint: Option<ResolverEndpoint>, timeout: Option<Duration>) -> Self {
        Self { endpoint, timeout }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.endpoint()?, config.query_timeout()))
    }

    pub fn describe(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.to_string(),
            None => "system".to_string(),
        }
    }

    pub fn build(&self) -> Arc<dyn HostLookup> {
        match &self.endpoint {
            Some(endpoint) => Arc::new(EndpointLookup::new(endpoint.clone(), self.timeout)),
            None => Arc::new(SystemLookup::new(self.timeout)),
        }
    }
}

impl LookupFactory for ResolverSelector {
    fn create(&self) -> Arc<dyn HostLookup> {
        self.build()
    }
}

use crate::dns_protocol::TransportProtocol;
use serde::{Deserialize, Serialize};

/// Custom resolver settings. With no `address` the system resolver is used.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub protocol: TransportProtocol,

    /// Per-query deadline in milliseconds. Unset means queries may wait forever.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            protocol: TransportProtocol::default(),
            timeout_ms: None,
        }
    }
}

fn default_port() -> u16 {
    53
}

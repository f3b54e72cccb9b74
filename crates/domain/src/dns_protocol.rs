use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

/// Represents a resolver address that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    /// Builds an address from the resolver option and port.
    ///
    /// IP literals (bracketed IPv6 included) are resolved immediately. Any other
    /// non-empty string is kept verbatim for lookup at dial time, so a bad
    /// address fails each query rather than the run.
    pub fn parse(address: &str, port: u16) -> Result<Self, ConfigError> {
        if address.is_empty() {
            return Err(ConfigError::InvalidResolverAddress(
                "resolver address is empty".to_string(),
            ));
        }

        let literal = address
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(address);

        if let Ok(ip) = literal.parse::<IpAddr>() {
            return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, port)));
        }

        Ok(UpstreamAddr::Unresolved {
            hostname: Arc::from(address),
            port,
        })
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

/// Transport used to reach a custom resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    #[default]
    Udp,
    Tcp,
}

impl TransportProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportProtocol::Udp => "udp",
            TransportProtocol::Tcp => "tcp",
        }
    }
}

impl FromStr for TransportProtocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "udp" => Ok(TransportProtocol::Udp),
            "tcp" => Ok(TransportProtocol::Tcp),
            other => Err(ConfigError::InvalidProtocol(other.to_string())),
        }
    }
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-specified resolver: every query dials `addr` over `protocol`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolverEndpoint {
    pub addr: UpstreamAddr,
    pub protocol: TransportProtocol,
}

impl ResolverEndpoint {
    pub fn new(addr: UpstreamAddr, protocol: TransportProtocol) -> Self {
        Self { addr, protocol }
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol, self.addr)
    }
}

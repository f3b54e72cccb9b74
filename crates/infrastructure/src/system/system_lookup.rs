//! Lookups through the operating system resolver (`getaddrinfo` / `getnameinfo`).

use async_trait::async_trait;
use dns_lookup::lookup_addr;
use ferrous_rdns_application::ports::HostLookup;
use ferrous_rdns_domain::DomainError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing::debug;

use crate::dns::transport::with_deadline;

pub struct SystemLookup {
    timeout: Option<Duration>,
}

impl SystemLookup {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// Blocking reverse lookup. The system answers with at most one name,
    /// returned fully qualified; a numeric echo of the address counts as no name.
    pub fn reverse_lookup(ip: Ipv4Addr) -> Result<Vec<String>, DomainError> {
        let hostname = lookup_addr(&IpAddr::V4(ip))
            .map_err(|e| DomainError::IoError(format!("Reverse lookup of {} failed: {}", ip, e)))?;

        if hostname.is_empty() || hostname == ip.to_string() {
            return Ok(Vec::new());
        }

        Ok(vec![Self::fully_qualified(hostname)])
    }

    fn fully_qualified(mut hostname: String) -> String {
        if !hostname.ends_with('.') {
            hostname.push('.');
        }
        hostname
    }

    /// Keeps IPv4 answers only, first occurrence order.
    fn collect_ipv4(addrs: impl Iterator<Item = SocketAddr>) -> Vec<Ipv4Addr> {
        let mut ipv4 = Vec::new();
        for addr in addrs {
            if let IpAddr::V4(ip) = addr.ip() {
                if !ipv4.contains(&ip) {
                    ipv4.push(ip);
                }
            }
        }
        ipv4
    }
}

#[async_trait]
impl HostLookup for SystemLookup {
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, DomainError> {
        if host.trim().is_empty() {
            return Err(DomainError::InvalidDomainName(host.to_string()));
        }

        let target = format!("{}:0", host);
        let addrs = with_deadline(self.timeout, tokio::net::lookup_host(target))
            .await
            .ok_or(DomainError::QueryTimeout)?
            .map_err(|e| DomainError::IoError(format!("Lookup of {} failed: {}", host, e)))?;

        let ipv4 = Self::collect_ipv4(addrs);
        debug!(host = %host, addresses = ipv4.len(), "System forward lookup");

        if ipv4.is_empty() {
            return Err(DomainError::NoAddresses(host.to_string()));
        }
        Ok(ipv4)
    }

    async fn lookup_ptr(&self, ip: Ipv4Addr) -> Result<Vec<String>, DomainError> {
        let handle = tokio::task::spawn_blocking(move || Self::reverse_lookup(ip));

        with_deadline(self.timeout, handle)
            .await
            .ok_or(DomainError::QueryTimeout)?
            .map_err(|e| DomainError::IoError(format!("Reverse lookup task failed: {}", e)))?
    }

    fn name(&self) -> &'static str {
        "system"
    }
}

use ferrous_rdns_domain::{DomainError, UpstreamAddr};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

use super::with_deadline;

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6).
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Option<Duration>,
) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);

    let addrs_iter = with_deadline(timeout, tokio::net::lookup_host(&target))
        .await
        .ok_or_else(|| DomainError::TransportTimeout {
            server: target.clone(),
        })?
        .map_err(|e| {
            DomainError::InvalidDomainName(format!("DNS resolution failed for {}: {}", target, e))
        })?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(DomainError::NoAddresses(target));
    }

    Ok(addrs)
}

/// Resolver address that may still need a hostname lookup.
///
/// The first successful lookup is cached for the lifetime of the value;
/// failures are not cached, so the next query tries again.
pub struct EndpointAddr {
    upstream: UpstreamAddr,
    resolved: OnceCell<SocketAddr>,
}

impl EndpointAddr {
    pub fn new(upstream: UpstreamAddr) -> Self {
        let resolved = match upstream.socket_addr() {
            Some(addr) => OnceCell::new_with(Some(addr)),
            None => OnceCell::new(),
        };
        Self { upstream, resolved }
    }

    pub fn upstream(&self) -> &UpstreamAddr {
        &self.upstream
    }

    pub async fn socket_addr(&self, timeout: Option<Duration>) -> Result<SocketAddr, DomainError> {
        let addr = self
            .resolved
            .get_or_try_init(|| async {
                let (hostname, port) = self.upstream.unresolved_parts().ok_or_else(|| {
                    DomainError::ConfigError(format!("Unusable resolver address {}", self.upstream))
                })?;
                let addrs = resolve_all(hostname, port, timeout).await?;
                let chosen = addrs
                    .iter()
                    .find(|a| a.is_ipv4())
                    .copied()
                    .unwrap_or(addrs[0]);
                debug!(resolver = %self.upstream, resolved = %chosen, "Resolver hostname resolved");
                Ok::<SocketAddr, DomainError>(chosen)
            })
            .await?;
        Ok(*addr)
    }
}

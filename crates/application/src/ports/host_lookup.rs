use async_trait::async_trait;
use ferrous_rdns_domain::DomainError;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// A resolution client usable for forward and reverse queries.
#[async_trait]
pub trait HostLookup: Send + Sync {
    /// Forward lookup restricted to IPv4, in answer order.
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, DomainError>;

    /// Reverse lookup. An empty vector means the address has no PTR names.
    async fn lookup_ptr(&self, ip: Ipv4Addr) -> Result<Vec<String>, DomainError>;

    fn name(&self) -> &'static str;
}

/// Builds one lookup client per worker.
pub trait LookupFactory: Send + Sync {
    fn create(&self) -> Arc<dyn HostLookup>;
}

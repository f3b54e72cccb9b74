use crate::ports::HostLookup;
use ferrous_rdns_domain::{select_reverse_name, DomainError, HostRecord, ResolvedAddress};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::debug;

/// Forward-then-reverse resolution of a single hostname.
///
/// Lookup errors never escape: a failed forward lookup yields a record with no
/// addresses, and an address whose reverse lookup fails is left out.
pub struct ResolveHostUseCase {
    lookup: Arc<dyn HostLookup>,
    domain_only: bool,
}

impl ResolveHostUseCase {
    pub fn new(lookup: Arc<dyn HostLookup>, domain_only: bool) -> Self {
        Self {
            lookup,
            domain_only,
        }
    }

    pub async fn execute(&self, host: &str) -> HostRecord {
        let mut record = HostRecord::new(host);

        let addresses = match self.forward(host).await {
            Ok(addresses) => addresses,
            Err(e) => {
                debug!(
                    host = %host,
                    resolver = self.lookup.name(),
                    transport = e.is_transport_error(),
                    error = %e,
                    "Forward lookup failed"
                );
                return record;
            }
        };

        for ip in addresses {
            match self.lookup.lookup_ptr(ip).await {
                Ok(names) => match select_reverse_name(&names, self.domain_only) {
                    Some(reverse_name) => record.push(ResolvedAddress::new(ip, reverse_name)),
                    None => debug!(host = %host, ip = %ip, "PTR lookup returned no records"),
                },
                Err(e) => {
                    debug!(
                        host = %host,
                        ip = %ip,
                        resolver = self.lookup.name(),
                        error = %e,
                        "PTR lookup failed"
                    );
                }
            }
        }

        record
    }

    /// Address literals are answered locally; everything else goes to the resolver.
    async fn forward(&self, host: &str) -> Result<Vec<Ipv4Addr>, DomainError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return match ip {
                IpAddr::V4(v4) => Ok(vec![v4]),
                IpAddr::V6(v6) => v6
                    .to_ipv4_mapped()
                    .map(|v4| vec![v4])
                    .ok_or_else(|| DomainError::NoAddresses(host.to_string())),
            };
        }

        self.lookup.lookup_ipv4(host).await
    }
}

use super::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use super::transport::{create_transport, tcp::TcpTransport, DnsTransport, Transport};
use async_trait::async_trait;
use ferrous_rdns_application::ports::HostLookup;
use ferrous_rdns_domain::{DomainError, RecordType, ResolverEndpoint, TransportProtocol};
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;

/// Lookup client bound to one configured resolver.
///
/// Each instance owns its transport, so connections are never shared
/// between workers. Truncated UDP answers are retried over TCP.
pub struct EndpointLookup {
    endpoint: ResolverEndpoint,
    transport: Transport,
    tcp_fallback: Option<TcpTransport>,
    timeout: Option<Duration>,
}

impl EndpointLookup {
    pub fn new(endpoint: ResolverEndpoint, timeout: Option<Duration>) -> Self {
        let transport = create_transport(&endpoint);
        let tcp_fallback = match endpoint.protocol {
            TransportProtocol::Udp => Some(TcpTransport::new(endpoint.addr.clone())),
            TransportProtocol::Tcp => None,
        };

        Self {
            endpoint,
            transport,
            tcp_fallback,
            timeout,
        }
    }

    pub fn ip_to_reverse_domain(ip: Ipv4Addr) -> String {
        let octets = ip.octets();
        format!(
            "{}.{}.{}.{}.in-addr.arpa.",
            octets[3], octets[2], octets[1], octets[0]
        )
    }

    async fn query(&self, name: &str, record_type: RecordType) -> Result<DnsResponse, DomainError> {
        let query_bytes = MessageBuilder::build_query(name, &record_type)?;

        let response = self.transport.send(&query_bytes, self.timeout).await?;
        let mut parsed = ResponseParser::parse(&response.bytes)?;

        if parsed.truncated {
            if let Some(tcp) = &self.tcp_fallback {
                debug!(
                    name = %name,
                    record_type = %record_type,
                    resolver = %self.endpoint,
                    "Truncated UDP response, retrying over TCP"
                );
                let retry = tcp.send(&query_bytes, self.timeout).await?;
                parsed = ResponseParser::parse(&retry.bytes)?;
            }
        }

        debug!(
            name = %name,
            record_type = %record_type,
            protocol = response.protocol_used,
            status = ResponseParser::rcode_to_status(parsed.rcode),
            "Query answered"
        );

        if parsed.is_nxdomain() {
            return Err(DomainError::NxDomain);
        }
        if parsed.rcode != hickory_proto::op::ResponseCode::NoError {
            return Err(DomainError::ServerFailure(format!(
                "{} answered {} for {}",
                self.endpoint,
                ResponseParser::rcode_to_status(parsed.rcode),
                name
            )));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl HostLookup for EndpointLookup {
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, DomainError> {
        if host.trim().is_empty() {
            return Err(DomainError::InvalidDomainName(host.to_string()));
        }

        let response = self.query(host, RecordType::A).await?;
        if response.ipv4.is_empty() {
            return Err(DomainError::NoAddresses(host.to_string()));
        }

        Ok(response.ipv4)
    }

    async fn lookup_ptr(&self, ip: Ipv4Addr) -> Result<Vec<String>, DomainError> {
        let reverse_domain = Self::ip_to_reverse_domain(ip);
        let response = self.query(&reverse_domain, RecordType::PTR).await?;
        Ok(response.ptr_names)
    }

    fn name(&self) -> &'static str {
        self.transport.protocol_name()
    }
}

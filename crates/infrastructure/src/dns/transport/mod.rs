pub mod resolver;
pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use ferrous_rdns_domain::{DomainError, ResolverEndpoint, TransportProtocol};
use std::future::Future;
use std::io;
use std::time::Duration;

pub use resolver::EndpointAddr;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

/// Sends one DNS message and returns the raw answer.
///
/// `timeout` bounds each network step; `None` waits as long as the peer takes.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
        }
    }
}

pub fn create_transport(endpoint: &ResolverEndpoint) -> Transport {
    match endpoint.protocol {
        TransportProtocol::Udp => Transport::Udp(udp::UdpTransport::new(endpoint.addr.clone())),
        TransportProtocol::Tcp => Transport::Tcp(tcp::TcpTransport::new(endpoint.addr.clone())),
    }
}

/// Runs `fut` under an optional deadline. `None` from the result means it expired.
pub(crate) async fn with_deadline<F: Future>(
    timeout: Option<Duration>,
    fut: F,
) -> Option<F::Output> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}

pub(crate) fn map_io_error(server: &str, context: &str, e: io::Error) -> DomainError {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
            DomainError::TransportConnectionReset {
                server: server.to_string(),
            }
        }
        io::ErrorKind::TimedOut => DomainError::TransportTimeout {
            server: server.to_string(),
        },
        _ => DomainError::IoError(format!("{} {}: {}", context, server, e)),
    }
}

/// Checks that a response carries the ID of the query it answers.
pub fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: &str,
) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Message from {} too short to carry an ID",
            server
        )));
    }

    if query[0..2] != response[0..2] {
        return Err(DomainError::InvalidDnsResponse(format!(
            "DNS ID mismatch from {}: expected {:02x}{:02x}, got {:02x}{:02x}",
            server, query[0], query[1], response[0], response[1]
        )));
    }

    Ok(())
}

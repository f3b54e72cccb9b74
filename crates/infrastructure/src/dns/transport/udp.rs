//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is over a connected ephemeral socket.
//! Datagrams whose ID does not match the query are dropped and the read continues.
//! If the response has the TC bit set, the caller should retry via TCP.

use super::resolver::EndpointAddr;
use super::{map_io_error, validate_response_id, with_deadline, DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_rdns_domain::{DomainError, UpstreamAddr};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    endpoint: EndpointAddr,
}

impl UdpTransport {
    pub fn new(upstream_addr: UpstreamAddr) -> Self {
        Self {
            endpoint: EndpointAddr::new(upstream_addr),
        }
    }

    async fn exchange(
        socket: &UdpSocket,
        server_addr: SocketAddr,
        message_bytes: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        let server = server_addr.to_string();

        let bytes_sent = socket
            .send(message_bytes)
            .await
            .map_err(|e| map_io_error(&server, "Failed to send UDP query to", e))?;

        debug!(server = %server_addr, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let bytes_received = socket
                .recv(&mut recv_buf)
                .await
                .map_err(|e| map_io_error(&server, "Failed to receive UDP response from", e))?;

            let datagram = &recv_buf[..bytes_received];
            if let Err(e) = validate_response_id(message_bytes, datagram, &server) {
                warn!(server = %server_addr, error = %e, "Dropping unexpected UDP datagram");
                continue;
            }

            debug!(
                server = %server_addr,
                bytes_received = bytes_received,
                "UDP response received"
            );
            return Ok(datagram.to_vec());
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError> {
        let server_addr = self.endpoint.socket_addr(timeout).await?;
        let server = server_addr.to_string();

        let bind_addr = if server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| map_io_error(&server, "Failed to bind UDP socket for", e))?;
        socket
            .connect(server_addr)
            .await
            .map_err(|e| map_io_error(&server, "Failed to connect UDP socket to", e))?;

        let bytes = with_deadline(timeout, Self::exchange(&socket, server_addr, message_bytes))
            .await
            .ok_or(DomainError::TransportTimeout { server })??;

        Ok(TransportResponse {
            bytes,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

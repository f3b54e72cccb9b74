//! TCP Transport for DNS queries (RFC 1035 §4.2.2)
//!
//! Every message is framed with a two-byte big-endian length prefix.

use super::resolver::EndpointAddr;
use super::{map_io_error, validate_response_id, with_deadline, DnsTransport, TransportResponse};
use async_trait::async_trait;
use ferrous_rdns_domain::{DomainError, UpstreamAddr};
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;
const MAX_IDLE_TCP: usize = 2;

pub struct TcpTransport {
    endpoint: EndpointAddr,
    idle: Mutex<Vec<TcpStream>>,
}

impl TcpTransport {
    pub fn new(upstream_addr: UpstreamAddr) -> Self {
        Self {
            endpoint: EndpointAddr::new(upstream_addr),
            idle: Mutex::new(Vec::new()),
        }
    }

    fn take_pooled(&self) -> Option<TcpStream> {
        self.idle.lock().ok()?.pop()
    }

    fn return_to_pool(&self, stream: TcpStream) {
        if let Ok(mut idle) = self.idle.lock() {
            if idle.len() < MAX_IDLE_TCP {
                idle.push(stream);
            }
        }
    }

    async fn connect_new(
        server_addr: SocketAddr,
        timeout: Option<Duration>,
    ) -> Result<TcpStream, DomainError> {
        let server = server_addr.to_string();

        let stream = with_deadline(timeout, TcpStream::connect(server_addr))
            .await
            .ok_or_else(|| DomainError::TransportTimeout {
                server: server.clone(),
            })?
            .map_err(|e| map_io_error(&server, "Failed to connect to TCP server", e))?;

        stream
            .set_nodelay(true)
            .map_err(|e| map_io_error(&server, "Failed to set TCP_NODELAY on", e))?;

        Ok(stream)
    }

    async fn exchange(
        stream: &mut TcpStream,
        message_bytes: &[u8],
        timeout: Option<Duration>,
        server: &str,
    ) -> Result<Vec<u8>, DomainError> {
        with_deadline(timeout, async {
            send_with_length_prefix(stream, message_bytes).await?;
            read_with_length_prefix(stream).await
        })
        .await
        .ok_or_else(|| DomainError::TransportTimeout {
            server: server.to_string(),
        })?
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse, DomainError> {
        let server_addr = self.endpoint.socket_addr(timeout).await?;
        let server = server_addr.to_string();

        // A pooled stream may have been closed by the server; retry once on a fresh one.
        let (stream, response_bytes) = match self.take_pooled() {
            Some(mut pooled) => {
                match Self::exchange(&mut pooled, message_bytes, timeout, &server).await {
                    Ok(bytes) => (pooled, bytes),
                    Err(e) => {
                        debug!(server = %server_addr, error = %e, "Pooled TCP connection failed, reconnecting");
                        let mut fresh = Self::connect_new(server_addr, timeout).await?;
                        let bytes =
                            Self::exchange(&mut fresh, message_bytes, timeout, &server).await?;
                        (fresh, bytes)
                    }
                }
            }
            None => {
                let mut fresh = Self::connect_new(server_addr, timeout).await?;
                let bytes = Self::exchange(&mut fresh, message_bytes, timeout, &server).await?;
                (fresh, bytes)
            }
        };

        validate_response_id(message_bytes, &response_bytes, &server)?;

        debug!(
            server = %server_addr,
            response_len = response_bytes.len(),
            "TCP response received"
        );

        self.return_to_pool(stream);

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    if message_bytes.len() > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Query too large for TCP framing: {} bytes",
            message_bytes.len()
        )));
    }

    let length_bytes = (message_bytes.len() as u16).to_be_bytes();

    stream
        .write_all(&length_bytes)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to write length prefix: {}", e)))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to write DNS message: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to read response length: {}", e)))?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to read response body: {}", e)))?;

    Ok(response)
}

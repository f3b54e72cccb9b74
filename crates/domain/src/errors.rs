use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Upstream server failure: {0}")]
    ServerFailure(String),

    #[error("No addresses found for {0}")]
    NoAddresses(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Work queue closed")]
    QueueClosed,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Lookup failures that say nothing about the name itself.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            DomainError::QueryTimeout
                | DomainError::TransportTimeout { .. }
                | DomainError::TransportConnectionRefused { .. }
                | DomainError::TransportConnectionReset { .. }
                | DomainError::IoError(_)
        )
    }
}

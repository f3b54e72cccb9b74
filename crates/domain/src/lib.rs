//! Ferrous RDNS Domain Layer
pub mod config;
pub mod dns_protocol;
pub mod dns_record;
pub mod errors;
pub mod host_record;

pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig};
pub use dns_protocol::{ResolverEndpoint, TransportProtocol, UpstreamAddr};
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use host_record::{select_reverse_name, HostRecord, ResolvedAddress};

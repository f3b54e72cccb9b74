use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// One forward-resolved address together with its reverse name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "RDNS")]
    pub reverse_name: String,
}

impl ResolvedAddress {
    pub fn new(address: Ipv4Addr, reverse_name: impl Into<String>) -> Self {
        Self {
            address: address.to_string(),
            reverse_name: reverse_name.into(),
        }
    }
}

/// Output record for a single input hostname.
///
/// `addresses` keeps the order the forward lookup returned and only holds
/// addresses whose reverse lookup produced a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    #[serde(rename = "Host")]
    pub host: String,

    #[serde(rename = "IPs")]
    pub addresses: Vec<ResolvedAddress>,
}

impl HostRecord {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            addresses: Vec::new(),
        }
    }

    pub fn push(&mut self, address: ResolvedAddress) {
        self.addresses.push(address);
    }

    pub fn is_resolved(&self) -> bool {
        !self.addresses.is_empty()
    }
}

/// Picks the reverse name to store for an address.
///
/// The last name of the answer wins. In domain-only mode one trailing root
/// label separator is removed.
pub fn select_reverse_name<S: AsRef<str>>(names: &[S], domain_only: bool) -> Option<String> {
    let name = names.last()?.as_ref();
    if domain_only {
        Some(name.strip_suffix('.').unwrap_or(name).to_string())
    } else {
        Some(name.to_string())
    }
}

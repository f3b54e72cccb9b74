use async_trait::async_trait;
use ferrous_rdns_application::ports::{HostLookup, LookupFactory};
use ferrous_rdns_domain::DomainError;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MockLookup {
    forward: Arc<RwLock<HashMap<String, Vec<Ipv4Addr>>>>,
    reverse: Arc<RwLock<HashMap<Ipv4Addr, Vec<String>>>>,
    reverse_errors: Arc<RwLock<HashMap<Ipv4Addr, DomainError>>>,
    forward_calls: Arc<AtomicUsize>,
    reverse_calls: Arc<AtomicUsize>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(self, host: &str, addresses: &[Ipv4Addr]) -> Self {
        self.forward
            .write()
            .unwrap()
            .insert(host.to_string(), addresses.to_vec());
        self
    }

    pub fn with_ptr(self, ip: Ipv4Addr, names: &[&str]) -> Self {
        self.reverse
            .write()
            .unwrap()
            .insert(ip, names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_ptr_error(self, ip: Ipv4Addr, error: DomainError) -> Self {
        self.reverse_errors.write().unwrap().insert(ip, error);
        self
    }

    /// Resolves `localhost` to 127.0.0.1 and back to `localhost.`
    pub fn localhost() -> Self {
        Self::new()
            .with_host("localhost", &[Ipv4Addr::LOCALHOST])
            .with_ptr(Ipv4Addr::LOCALHOST, &["localhost."])
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostLookup for MockLookup {
    async fn lookup_ipv4(&self, host: &str) -> Result<Vec<Ipv4Addr>, DomainError> {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        self.forward
            .read()
            .unwrap()
            .get(host)
            .cloned()
            .ok_or(DomainError::NxDomain)
    }

    async fn lookup_ptr(&self, ip: Ipv4Addr) -> Result<Vec<String>, DomainError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.reverse_errors.read().unwrap().get(&ip).cloned() {
            return Err(err);
        }
        self.reverse
            .read()
            .unwrap()
            .get(&ip)
            .cloned()
            .ok_or(DomainError::NxDomain)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Hands out clones of one `MockLookup`, counting how many were created.
pub struct MockLookupFactory {
    lookup: MockLookup,
    created: AtomicUsize,
}

impl MockLookupFactory {
    pub fn new(lookup: MockLookup) -> Self {
        Self {
            lookup,
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl LookupFactory for MockLookupFactory {
    fn create(&self) -> Arc<dyn HostLookup> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Arc::new(self.lookup.clone())
    }
}

pub mod endpoint;
pub mod forwarding;
pub mod selector;
pub mod transport;

pub use endpoint::EndpointLookup;
pub use selector::ResolverSelector;

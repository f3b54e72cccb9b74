//! Ferrous RDNS Infrastructure Layer
//!
//! Adapters behind the application ports: DNS wire protocol and transports
//! for custom resolvers, the platform resolver, stdin input and JSON output.
pub mod dns;
pub mod input;
pub mod output;
pub mod system;

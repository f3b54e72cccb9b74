//! Ferrous RDNS Application Layer
//!
//! Ports the pipeline depends on, the work queue feeding the worker pool, and
//! the resolution use cases.
pub mod ports;
pub mod services;
pub mod use_cases;

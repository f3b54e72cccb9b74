#![allow(dead_code)]

mod mock_lookup;
mod mock_sink;

pub use mock_lookup::{MockLookup, MockLookupFactory};
pub use mock_sink::{CollectingSink, FailingSink};

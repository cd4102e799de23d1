mod client;
mod parse;
mod types;

pub use client::{HttpTopologySource, TopologySource};
pub use types::{BackendDescriptor, StatusSnapshot};

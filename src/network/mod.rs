pub mod client;
pub mod consensus;
pub mod peers;

pub use client::{ChainResponse, ChainSource, HttpChainSource, PeerError};
pub use consensus::Resolver;
pub use peers::NodeSet;

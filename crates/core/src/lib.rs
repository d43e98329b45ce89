//! Nexus Core - rate tables, currency conversion, and stock quote caching.
//!
//! This crate holds the domain logic. It talks to the network only through
//! the provider traits of `nexus-market-data` and persists rates only
//! through [`fx::RateCacheRepositoryTrait`], which the `storage-sqlite`
//! crate implements.

pub mod config;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod quotes;
pub mod utils;

pub use config::NexusConfig;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

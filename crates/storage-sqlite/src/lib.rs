//! SQLite storage for Nexus.
//!
//! Implements [`nexus_core::fx::RateCacheRepositoryTrait`] on top of Diesel.
//! This is the only crate that knows about Diesel; `nexus-core` works with
//! the trait alone.
//!
//! ```text
//!   nexus-core (FxService)
//!          │
//!          ▼
//!   storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod fx;
pub mod schema;

pub use db::{
    create_pool, get_connection, init, open, open_from_config, run_migrations, spawn_writer,
    DbConnection, DbPool, WriteHandle,
};
pub use errors::{IntoCore, StorageError};
pub use fx::RateCacheRepository;

pub use nexus_core::errors::{DatabaseError, Error, Result};

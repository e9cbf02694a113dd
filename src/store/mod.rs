//! Persistence layer for the local session cache.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlCache;
pub use traits::{RoleHintCache, cache_keys};

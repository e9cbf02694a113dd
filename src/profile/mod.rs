//! Marketplace profiles: models, store boundary, and the REST client.

pub mod model;
pub mod rest;
pub mod store;

pub use model::{NewProfile, ProfileRecord, UserRole};
pub use rest::RestProfileStore;
pub use store::ProfileStore;

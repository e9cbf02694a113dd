//! Identity provider boundary and REST client.

pub mod provider;
pub mod rest;

pub use provider::{Identity, IdentityProvider};
pub use rest::RestIdentityProvider;

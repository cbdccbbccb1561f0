//! Azion Core
//!
//! Host-facing contracts for the Azion provider: resource values, state,
//! attribute schemas and the `Provider` trait every lifecycle call goes through.

pub mod provider;
pub mod resource;
pub mod schema;

//! Service plumbing shared by Guidebook binaries.
//!
//! Nothing here knows about guides or users: config loading, tracing setup,
//! request ids, liveness and readiness checks and a few sea-orm query helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;

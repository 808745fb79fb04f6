//! Domain types shared across Guidebook crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod feedback;
pub mod media;
pub mod pagination;
pub mod phone;

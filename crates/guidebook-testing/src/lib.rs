//! Test utilities for Guidebook services.
//!
//! Provides `MockSession` for minting auth cookies and helpers for reading
//! `Set-Cookie` headers off responses.
//! Import in `#[cfg(test)]` blocks only; never in production code.

pub mod session;

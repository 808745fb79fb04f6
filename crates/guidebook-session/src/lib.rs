//! Session plumbing shared by the portal service and its test helpers.
//!
//! Provides cookie builders, the signed session and pending-activation
//! tokens, and one-shot flash messages.

pub mod cookie;
pub mod flash;
pub mod token;

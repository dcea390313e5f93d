//! Error types for vhost management.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;

//! Configuration module.
//!
//! Handles loading and validating configuration from TOML files and
//! resolving the owner applied to created artifacts.

mod owner;
mod settings;

pub use owner::resolve_owner;
pub use settings::*;

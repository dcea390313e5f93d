//! Input validation module.
//!
//! Provides validators for vhost names, database identifiers, bind addresses
//! and document-root subdirectories.

mod database;
mod name;
mod site;

pub use database::{validate_charset, validate_database_name};
pub use name::validate_vhost_name;
pub use site::{normalize_subdir, validate_bind_ip};

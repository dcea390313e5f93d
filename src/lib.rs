//! vhostctl library
//!
//! Manages local Apache virtual hosts: renders a configuration from templates,
//! lays out the site tree, enables the vhost through a link and a hosts entry,
//! and reverses each step on disable and remove.

pub mod actions;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod fs;
pub mod hosts;
pub mod templates;
pub mod validation;
pub mod vhost;

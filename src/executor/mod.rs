//! Command executor module.
//!
//! Handles subprocess spawning for the web server reload, the MySQL client
//! and the editor.

mod subprocess;

pub use subprocess::{run_command, SubprocessBuilder, SubprocessResult};

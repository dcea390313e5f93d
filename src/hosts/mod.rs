//! Local name-resolution file editing.

mod editor;

pub use editor::{line_matches, HostsFile, MatchMode};

//! Filesystem access used by the lifecycle manager and the hosts editor.
//!
//! Vhost state lives entirely in the filesystem, so every probe and mutation
//! goes through the [`Filesystem`] trait. [`LocalFs`] is the real
//! implementation; unit tests substitute an in-memory fake.

mod local;
#[cfg(test)]
pub(crate) mod memory;

use std::io;
use std::path::Path;

pub use local::LocalFs;

/// Numeric owner applied to created artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

/// Filesystem operations needed to manage vhosts.
pub trait Filesystem {
    /// Whether anything exists at `path`, without following a final symlink.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a symbolic link.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the contents of `path` in place.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Write to a sibling temp file, then rename over `path`.
    fn write_atomic(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Create `path` and any missing parents.
    ///
    /// Returns `false` when the directory already existed.
    fn create_dir(&self, path: &Path) -> io::Result<bool>;

    /// Create a symbolic link at `link` pointing to `target`.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Names of the entries directly inside `path`, sorted.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Change ownership of `path` itself (links are not followed).
    fn set_owner(&self, path: &Path, owner: Ownership) -> io::Result<()>;
}

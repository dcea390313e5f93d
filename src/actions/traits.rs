//! External side-effect trait definition.

use std::path::Path;

use crate::error::VhostError;

/// Side effects the lifecycle manager triggers outside the filesystem.
///
/// Failures are reported back to the manager, which logs them without
/// rolling back filesystem changes already made.
pub trait ExternalActions {
    /// Ask the web server to reload its configuration.
    fn reload(&self) -> Result<(), VhostError>;

    /// Create a database named after the vhost.
    fn create_database(&self, name: &str, charset: &str) -> Result<(), VhostError>;

    /// Drop the database if it exists.
    fn drop_database(&self, name: &str) -> Result<(), VhostError>;

    /// Whether a database with this name exists.
    fn database_exists(&self, name: &str) -> Result<bool, VhostError>;

    /// Open `path` in the configured editor.
    fn open_editor(&self, path: &Path) -> Result<(), VhostError>;
}

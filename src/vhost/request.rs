//! Options for lifecycle operations and their results.

use std::path::PathBuf;

use serde::Serialize;

use super::paths::VhostPaths;

/// Options for creating a vhost.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Address the vhost binds to, `*` for all.
    pub ip: String,
    /// Document root below `www/`.
    pub subdir: Option<String>,
    /// Render the SSL fragment and listen on 443.
    pub ssl: bool,
    /// Write a sample `index.html` into the document root.
    pub sample: bool,
    /// Create a database named after the vhost.
    pub mysql: bool,
    /// Only render the configuration, write nothing.
    pub dump: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            ip: "*".to_string(),
            subdir: None,
            ssl: false,
            sample: false,
            mysql: false,
            dump: false,
        }
    }
}

/// Options for removing a vhost.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOptions {
    /// Also delete the site root tree.
    pub purge: bool,
    /// Also drop the database named after the vhost.
    pub mysql: bool,
}

/// Which directory `list` enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListScope {
    #[default]
    Available,
    Enabled,
}

/// Result of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Config written and site tree prepared.
    Created { paths: VhostPaths },
    /// Dump mode: the rendered configuration, nothing written.
    Dumped { config: String },
}

/// Read-only report about a vhost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VhostInfo {
    pub name: String,
    pub site_name: String,
    pub config_path: PathBuf,
    pub enabled: bool,
    pub site_root: PathBuf,
    pub site_root_exists: bool,
    /// Only probed when requested; `None` otherwise or when the probe failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_exists: Option<bool>,
}

//! Vhost state derived from the filesystem.

use serde::Serialize;

use crate::fs::Filesystem;

use super::paths::VhostPaths;

/// Lifecycle state of a vhost.
///
/// Never stored: every operation probes the config file and the enabled link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VhostState {
    /// Neither config file nor enabled link exists.
    Absent,
    /// Config file exists, no enabled link.
    Available,
    /// Enabled link exists.
    Enabled,
}

impl VhostState {
    /// Probe the filesystem for the current state.
    ///
    /// The enabled link alone decides `Enabled`, even when its target is gone,
    /// so that a stale link can still be disabled.
    pub fn probe(fs: &dyn Filesystem, paths: &VhostPaths) -> Self {
        if fs.exists(&paths.enabled) {
            Self::Enabled
        } else if fs.exists(&paths.available) {
            Self::Available
        } else {
            Self::Absent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memory::MemoryFs;
    use std::path::PathBuf;

    fn paths() -> VhostPaths {
        VhostPaths {
            name: "foo".to_string(),
            site_name: "foo.local".to_string(),
            available: PathBuf::from("/avail/foo.conf"),
            enabled: PathBuf::from("/enabled/foo.conf"),
            site_root: PathBuf::from("/var/www/foo.local"),
        }
    }

    #[test]
    fn test_probe_states() {
        let fs = MemoryFs::new();
        fs.add_dir("/enabled");
        let paths = paths();

        assert_eq!(VhostState::probe(&fs, &paths), VhostState::Absent);

        fs.add_file("/avail/foo.conf", "config");
        assert_eq!(VhostState::probe(&fs, &paths), VhostState::Available);

        fs.symlink(&paths.available, &paths.enabled).unwrap();
        assert_eq!(VhostState::probe(&fs, &paths), VhostState::Enabled);
    }

    #[test]
    fn test_stale_link_counts_as_enabled() {
        let fs = MemoryFs::new();
        fs.add_dir("/enabled");
        let paths = paths();
        fs.symlink(&paths.available, &paths.enabled).unwrap();

        assert_eq!(VhostState::probe(&fs, &paths), VhostState::Enabled);
    }
}

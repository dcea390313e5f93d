//! Canonical paths of a vhost.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Settings;
use crate::error::VhostError;
use crate::validation::validate_vhost_name;

/// Directory layout shared by every vhost.
#[derive(Debug, Clone)]
pub struct Layout {
    pub available_dir: PathBuf,
    pub enabled_dir: PathBuf,
    pub sites_dir: PathBuf,
    pub domain: String,
    pub file_suffix: String,
}

impl Layout {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            available_dir: settings.apache.dir_hosts_available.clone(),
            enabled_dir: settings.apache.dir_hosts_enabled.clone(),
            sites_dir: settings.general.sites_dir.clone(),
            domain: settings.general.domain.clone(),
            file_suffix: settings.general.vhost_file_suffix.clone(),
        }
    }

    /// Compute every path derived from `name`, validating it first.
    pub fn paths(&self, name: &str) -> Result<VhostPaths, VhostError> {
        let name = validate_vhost_name(name)?;
        let site_name = format!("{}{}", name, self.domain);
        let file_name = format!("{}{}", name, self.file_suffix);

        Ok(VhostPaths {
            name: name.to_string(),
            available: self.available_dir.join(&file_name),
            enabled: self.enabled_dir.join(&file_name),
            site_root: self.sites_dir.join(&site_name),
            site_name,
        })
    }
}

/// Paths and names belonging to one vhost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VhostPaths {
    pub name: String,
    /// Name plus domain suffix, used for the hosts entry and the site root.
    pub site_name: String,
    /// Rendered configuration.
    pub available: PathBuf,
    /// Symlink to `available` while enabled.
    pub enabled: PathBuf,
    pub site_root: PathBuf,
}

impl VhostPaths {
    pub fn log_dir(&self) -> PathBuf {
        self.site_root.join("log")
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.site_root.join("tmp")
    }

    /// Document root: `www` plus the normalized subdirectory (`""` or `/sub`).
    pub fn document_root(&self, subdir: &str) -> PathBuf {
        let www = self.site_root.join("www");
        match subdir.trim_start_matches('/') {
            "" => www,
            sub => www.join(sub),
        }
    }

    /// Directories created for a new site, parents before children.
    pub fn site_dirs(&self, subdir: &str) -> Vec<PathBuf> {
        let mut dirs = vec![self.site_root.clone(), self.log_dir()];

        let www = self.site_root.join("www");
        let mut current = www.clone();
        dirs.push(www);
        for part in subdir.split('/').filter(|p| !p.is_empty()) {
            current = current.join(part);
            dirs.push(current.clone());
        }

        dirs.push(self.tmp_dir());
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout {
            available_dir: PathBuf::from("/etc/apache2/sites-available"),
            enabled_dir: PathBuf::from("/etc/apache2/sites-enabled"),
            sites_dir: PathBuf::from("/var/www"),
            domain: ".local".to_string(),
            file_suffix: ".conf".to_string(),
        }
    }

    #[test]
    fn test_paths_for_name() {
        let paths = layout().paths("foo").unwrap();
        assert_eq!(paths.site_name, "foo.local");
        assert_eq!(
            paths.available,
            PathBuf::from("/etc/apache2/sites-available/foo.conf")
        );
        assert_eq!(
            paths.enabled,
            PathBuf::from("/etc/apache2/sites-enabled/foo.conf")
        );
        assert_eq!(paths.site_root, PathBuf::from("/var/www/foo.local"));
    }

    #[test]
    fn test_invalid_name_rejected() {
        assert!(layout().paths("../foo").is_err());
        assert!(layout().paths("").is_err());
    }

    #[test]
    fn test_site_dirs_without_subdir() {
        let paths = layout().paths("foo").unwrap();
        assert_eq!(
            paths.site_dirs(""),
            vec![
                PathBuf::from("/var/www/foo.local"),
                PathBuf::from("/var/www/foo.local/log"),
                PathBuf::from("/var/www/foo.local/www"),
                PathBuf::from("/var/www/foo.local/tmp"),
            ]
        );
        assert_eq!(
            paths.document_root(""),
            PathBuf::from("/var/www/foo.local/www")
        );
    }

    #[test]
    fn test_site_dirs_with_nested_subdir() {
        let paths = layout().paths("foo").unwrap();
        let dirs = paths.site_dirs("/web/public");
        assert!(dirs.contains(&PathBuf::from("/var/www/foo.local/www/web")));
        assert!(dirs.contains(&PathBuf::from("/var/www/foo.local/www/web/public")));
        assert_eq!(
            paths.document_root("/web/public"),
            PathBuf::from("/var/www/foo.local/www/web/public")
        );
    }
}

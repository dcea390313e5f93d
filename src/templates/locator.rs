//! Template discovery over an ordered list of directories.

use std::path::PathBuf;

use tracing::debug;

use crate::error::VhostError;
use crate::fs::Filesystem;

/// The template files used when creating a vhost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Main virtual host configuration.
    Vhost,
    /// SSL fragment substituted into `%ssl%`.
    Ssl,
    /// Sample index page.
    Index,
}

impl TemplateKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Vhost => "vhost.conf",
            Self::Ssl => "ssl.conf",
            Self::Index => "index.html",
        }
    }
}

/// A located template and its text.
#[derive(Debug, Clone)]
pub struct Template {
    pub path: PathBuf,
    pub text: String,
}

/// Finds templates by searching directories in order; the first hit wins.
#[derive(Debug, Clone)]
pub struct TemplateLocator {
    search_dirs: Vec<PathBuf>,
}

impl TemplateLocator {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Path of the first existing candidate for `kind`.
    pub fn locate(&self, fs: &dyn Filesystem, kind: TemplateKind) -> Result<PathBuf, VhostError> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(kind.file_name()))
            .find(|candidate| fs.exists(candidate))
            .ok_or_else(|| {
                VhostError::template(format!(
                    "Could not find template '{}' in: {}",
                    kind.file_name(),
                    display_dirs(&self.search_dirs)
                ))
            })
    }

    /// Locate and read the template for `kind`.
    pub fn load(&self, fs: &dyn Filesystem, kind: TemplateKind) -> Result<Template, VhostError> {
        let path = self.locate(fs, kind)?;
        debug!(template = kind.file_name(), path = %path.display(), "Using template");
        let text = fs.read_to_string(&path).map_err(|e| {
            VhostError::template(format!(
                "Failed to read template '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(Template { path, text })
    }
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memory::MemoryFs;

    fn locator() -> TemplateLocator {
        TemplateLocator::new(vec![
            PathBuf::from("/home/dev/.vhost/share"),
            PathBuf::from("/etc/vhost/share"),
            PathBuf::from("/opt/vhost/share"),
        ])
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let fs = MemoryFs::new();
        fs.add_file("/etc/vhost/share/vhost.conf", "system");
        fs.add_file("/opt/vhost/share/vhost.conf", "local");

        let template = locator().load(&fs, TemplateKind::Vhost).unwrap();
        assert_eq!(template.path, PathBuf::from("/etc/vhost/share/vhost.conf"));
        assert_eq!(template.text, "system");
    }

    #[test]
    fn test_user_override_preferred() {
        let fs = MemoryFs::new();
        fs.add_file("/home/dev/.vhost/share/ssl.conf", "user");
        fs.add_file("/etc/vhost/share/ssl.conf", "system");

        let template = locator().load(&fs, TemplateKind::Ssl).unwrap();
        assert_eq!(template.text, "user");
    }

    #[test]
    fn test_missing_template() {
        let fs = MemoryFs::new();
        let result = locator().locate(&fs, TemplateKind::Index);
        match result {
            Err(VhostError::Template { message }) => assert!(message.contains("index.html")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

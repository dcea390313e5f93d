//! Idempotent editing of a single hostname entry in a hosts file.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::fs::Filesystem;

/// How an existing entry is recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The hostname must be one of the names listed after the address.
    #[default]
    Token,
    /// Any line containing the hostname text matches.
    ///
    /// `foo.local` also matches `foo.local2` in this mode.
    Substring,
}

/// Whether a single hosts line refers to `hostname`.
pub fn line_matches(line: &str, hostname: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => line.contains(hostname),
        MatchMode::Token => {
            let entry = line.split('#').next().unwrap_or_default();
            entry.split_whitespace().skip(1).any(|name| name == hostname)
        }
    }
}

/// A hosts file holding at most one entry per managed hostname.
///
/// Every mutation reads the whole file, edits it and writes it back.
pub struct HostsFile<'a> {
    fs: &'a dyn Filesystem,
    path: PathBuf,
    ip: String,
    mode: MatchMode,
}

impl<'a> HostsFile<'a> {
    pub fn new(fs: &'a dyn Filesystem, path: impl Into<PathBuf>, ip: &str, mode: MatchMode) -> Self {
        Self {
            fs,
            path: path.into(),
            ip: ip.to_string(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `hostname` already has an entry.
    pub fn contains(&self, hostname: &str) -> io::Result<bool> {
        let content = self.fs.read_to_string(&self.path)?;
        Ok(self.content_contains(&content, hostname))
    }

    fn content_contains(&self, content: &str, hostname: &str) -> bool {
        match self.mode {
            MatchMode::Substring => content.contains(hostname),
            MatchMode::Token => content
                .lines()
                .any(|line| line_matches(line, hostname, MatchMode::Token)),
        }
    }

    /// Append `<ip> <hostname>` unless an entry already exists.
    ///
    /// Returns `true` when the file was changed.
    pub fn add(&self, hostname: &str) -> io::Result<bool> {
        let mut content = self.fs.read_to_string(&self.path)?;
        if self.content_contains(&content, hostname) {
            debug!(hostname, path = %self.path.display(), "Hostname already in hosts file");
            return Ok(false);
        }

        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&format!("{} {}\n", self.ip, hostname));
        self.fs.write(&self.path, &content)?;

        debug!(hostname, path = %self.path.display(), "Added hostname to hosts file");
        Ok(true)
    }

    /// Drop every line referring to `hostname`, keeping the order of the rest.
    ///
    /// Returns `true` when the file was changed.
    pub fn remove(&self, hostname: &str) -> io::Result<bool> {
        let content = self.fs.read_to_string(&self.path)?;
        if !self.content_contains(&content, hostname) {
            debug!(hostname, path = %self.path.display(), "Hostname not in hosts file");
            return Ok(false);
        }

        let kept: String = content
            .split_inclusive('\n')
            .filter(|line| !line_matches(line.trim_end_matches(['\n', '\r']), hostname, self.mode))
            .collect();
        self.fs.write(&self.path, &kept)?;

        debug!(hostname, path = %self.path.display(), "Removed hostname from hosts file");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::memory::MemoryFs;

    const HOSTS: &str = "127.0.0.1 localhost\n::1 localhost ip6-localhost\n";

    fn hosts_fs(content: &str) -> MemoryFs {
        let fs = MemoryFs::new();
        fs.add_file("/etc/hosts", content);
        fs
    }

    #[test]
    fn test_add_appends_entry() {
        let fs = hosts_fs(HOSTS);
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Token);

        assert!(hosts.add("foo.local").unwrap());
        assert_eq!(
            fs.contents("/etc/hosts").unwrap(),
            format!("{}127.0.0.1 foo.local\n", HOSTS)
        );
        assert!(hosts.contains("foo.local").unwrap());
    }

    #[test]
    fn test_add_twice_keeps_single_entry() {
        let fs = hosts_fs(HOSTS);
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Token);

        assert!(hosts.add("foo.local").unwrap());
        assert!(!hosts.add("foo.local").unwrap());

        let content = fs.contents("/etc/hosts").unwrap();
        assert_eq!(content.matches("foo.local").count(), 1);
    }

    #[test]
    fn test_add_then_remove_restores_contents() {
        let fs = hosts_fs(HOSTS);
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Token);

        hosts.add("foo.local").unwrap();
        assert!(hosts.remove("foo.local").unwrap());
        assert_eq!(fs.contents("/etc/hosts").unwrap(), HOSTS);
    }

    #[test]
    fn test_round_trip_normalizes_missing_trailing_newline() {
        let fs = hosts_fs("127.0.0.1 localhost");
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Token);

        hosts.add("foo.local").unwrap();
        hosts.remove("foo.local").unwrap();
        assert_eq!(fs.contents("/etc/hosts").unwrap(), "127.0.0.1 localhost\n");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let fs = hosts_fs(HOSTS);
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Token);

        assert!(!hosts.remove("foo.local").unwrap());
        assert_eq!(fs.contents("/etc/hosts").unwrap(), HOSTS);
    }

    #[test]
    fn test_token_mode_distinguishes_prefixes() {
        let fs = hosts_fs("127.0.0.1 foo.local2\n");
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Token);

        assert!(!hosts.contains("foo.local").unwrap());
        assert!(hosts.add("foo.local").unwrap());
        assert!(hosts.remove("foo.local").unwrap());
        assert_eq!(fs.contents("/etc/hosts").unwrap(), "127.0.0.1 foo.local2\n");
    }

    #[test]
    fn test_substring_mode_matches_prefixes() {
        let fs = hosts_fs("127.0.0.1 foo.local2\n");
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Substring);

        assert!(hosts.contains("foo.local").unwrap());
        assert!(!hosts.add("foo.local").unwrap());
    }

    #[test]
    fn test_token_mode_ignores_comments() {
        assert!(!line_matches("# 127.0.0.1 foo.local", "foo.local", MatchMode::Token));
        assert!(line_matches("127.0.0.1 bar foo.local # dev", "foo.local", MatchMode::Token));
        assert!(!line_matches("foo.local", "foo.local", MatchMode::Token));
    }

    #[test]
    fn test_remove_keeps_order_of_other_lines() {
        let fs = hosts_fs("127.0.0.1 a.local\n127.0.0.1 foo.local\n127.0.0.1 b.local\n");
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Token);

        hosts.remove("foo.local").unwrap();
        assert_eq!(
            fs.contents("/etc/hosts").unwrap(),
            "127.0.0.1 a.local\n127.0.0.1 b.local\n"
        );
    }

    #[test]
    fn test_missing_hosts_file_is_an_error() {
        let fs = MemoryFs::new();
        let hosts = HostsFile::new(&fs, "/etc/hosts", "127.0.0.1", MatchMode::Token);
        assert!(hosts.add("foo.local").is_err());
    }
}

//! Configuration settings for vhost management.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::VhostError;
use crate::hosts::MatchMode;

/// Main configuration structure.
///
/// Built once at startup and handed to the lifecycle manager.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub general: GeneralConfig,
    pub apache: ApacheConfig,
    #[serde(default)]
    pub ssl: SslConfig,
    #[serde(default)]
    pub mysql: MysqlConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General settings: ownership, naming and the hosts file.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// User owning every created artifact.
    pub user: String,
    /// Group owning every created artifact.
    pub group: String,
    /// Domain suffix appended to the vhost name (e.g. ".local").
    #[serde(default = "default_domain")]
    pub domain: String,
    /// Local name-resolution file.
    #[serde(default = "default_hosts_file")]
    pub hosts_file: PathBuf,
    /// Address written into hosts entries.
    #[serde(default = "default_hosts_ip")]
    pub hosts_ip: String,
    /// How existing hosts entries are matched.
    #[serde(default)]
    pub hosts_match: MatchMode,
    /// Root directory holding one tree per site.
    #[serde(default = "default_sites_dir")]
    pub sites_dir: PathBuf,
    /// Extension of generated config files.
    #[serde(default = "default_vhost_file_suffix")]
    pub vhost_file_suffix: String,
    /// Program used to open a config for editing.
    #[serde(default = "default_editor")]
    pub editor: String,
}

/// Web server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApacheConfig {
    /// Command line run after a vhost is enabled or disabled.
    pub restart_command: String,
    #[serde(default = "default_dir_hosts_available")]
    pub dir_hosts_available: PathBuf,
    #[serde(default = "default_dir_hosts_enabled")]
    pub dir_hosts_enabled: PathBuf,
}

/// SSL certificate settings, only required when SSL is requested.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SslConfig {
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
}

/// MySQL client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MysqlConfig {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    #[serde(default = "default_charset")]
    pub charset: String,
}

/// Template discovery settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Directories searched in order; the first hit wins.
    #[serde(default = "default_template_dirs")]
    pub search_dirs: Vec<PathBuf>,
    /// Treat leftover `%placeholder%` tokens as an error.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("compact", "pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_domain() -> String {
    ".local".to_string()
}

fn default_hosts_file() -> PathBuf {
    PathBuf::from("/etc/hosts")
}

fn default_hosts_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_sites_dir() -> PathBuf {
    PathBuf::from("/var/www")
}

fn default_vhost_file_suffix() -> String {
    ".conf".to_string()
}

fn default_editor() -> String {
    "xdg-open".to_string()
}

fn default_dir_hosts_available() -> PathBuf {
    PathBuf::from("/etc/vhost/sites-available")
}

fn default_dir_hosts_enabled() -> PathBuf {
    PathBuf::from("/etc/vhost/sites-enabled")
}

fn default_charset() -> String {
    "utf8".to_string()
}

fn default_template_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = home_dir() {
        dirs.push(home.join(".vhost/share"));
    }
    dirs.push(PathBuf::from("/etc/vhost/share"));
    dirs.push(PathBuf::from("share"));
    dirs
}

fn default_strict() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            user: None,
            password: None,
            host: None,
            charset: default_charset(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            search_dirs: default_template_dirs(),
            strict: default_strict(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Candidate configuration files, lowest precedence first.
pub fn default_config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = home_dir() {
        candidates.push(home.join(".vhost/vhost.toml"));
    }
    candidates.push(PathBuf::from("/etc/vhost.toml"));
    candidates.push(PathBuf::from("vhost.toml"));
    candidates
}

impl Settings {
    /// Load settings from a single TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VhostError> {
        let table = read_table(path.as_ref())?;
        Self::from_table(table)
    }

    /// Load and merge every existing file among `candidates`.
    ///
    /// Later files override keys of earlier ones, section by section.
    pub fn discover(candidates: &[PathBuf]) -> Result<Self, VhostError> {
        let existing: Vec<&PathBuf> = candidates.iter().filter(|p| p.exists()).collect();
        if existing.is_empty() {
            return Err(VhostError::config(format!(
                "vhost is not configured, create one of: {}",
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        let mut merged = toml::Table::new();
        for path in existing {
            debug!(path = %path.display(), "Reading configuration");
            merge_tables(&mut merged, read_table(path)?);
        }
        Self::from_table(merged)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, VhostError> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| VhostError::config(format!("Failed to parse configuration: {}", e)))?;
        Self::from_table(table)
    }

    fn from_table(table: toml::Table) -> Result<Self, VhostError> {
        let settings: Settings = toml::Value::Table(table)
            .try_into()
            .map_err(|e| VhostError::config(format!("Invalid configuration: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), VhostError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(VhostError::config(format!(
                "Invalid log level '{}'. Valid levels: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["compact", "pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(VhostError::config(format!(
                "Invalid log format '{}'. Valid formats: {:?}",
                self.logging.format, valid_formats
            )));
        }

        if !self.general.domain.starts_with('.') || self.general.domain.len() < 2 {
            return Err(VhostError::config(format!(
                "Invalid domain suffix '{}'. Must start with '.' (e.g., '.local')",
                self.general.domain
            )));
        }

        if self.general.vhost_file_suffix.contains('/') {
            return Err(VhostError::config(format!(
                "Invalid vhost file suffix '{}'",
                self.general.vhost_file_suffix
            )));
        }

        // Enabled links point at the available path as configured
        for (key, dir) in [
            ("apache.dir_hosts_available", &self.apache.dir_hosts_available),
            ("apache.dir_hosts_enabled", &self.apache.dir_hosts_enabled),
            ("general.sites_dir", &self.general.sites_dir),
        ] {
            if !dir.is_absolute() {
                return Err(VhostError::config(format!(
                    "{} must be an absolute path, got '{}'",
                    key,
                    dir.display()
                )));
            }
        }

        if self.apache.restart_command.split_whitespace().next().is_none() {
            return Err(VhostError::config("apache.restart_command cannot be empty"));
        }

        Ok(())
    }
}

fn read_table(path: &Path) -> Result<toml::Table, VhostError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        VhostError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        VhostError::config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

//! Vhost lifecycle manager.
//!
//! Drives the `Absent -> Available -> Enabled` state machine across three
//! stores: the available-config directory, the enabled-link directory and the
//! hosts file. Nothing is cached; each call re-probes the filesystem.

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::actions::{ExternalActions, SystemActions};
use crate::config::Settings;
use crate::error::{PreconditionKind, VhostError, VhostResult};
use crate::fs::{Filesystem, LocalFs, Ownership};
use crate::hosts::HostsFile;
use crate::templates::{Placeholders, TemplateKind, TemplateLocator, TemplateRenderer};
use crate::validation::{
    normalize_subdir, validate_bind_ip, validate_charset, validate_database_name,
};

use super::paths::{Layout, VhostPaths};
use super::request::{CreateOptions, CreateOutcome, ListScope, RemoveOptions, VhostInfo};
use super::state::VhostState;

const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;

/// Everything rendered for a create request, computed before any write.
struct RenderedSite {
    config: String,
    subdir: String,
    index_page: Option<String>,
}

/// Owns the lifecycle of vhosts.
///
/// Filesystem access and external side effects are injected so the state
/// machine can run against fakes.
pub struct VhostManager<F = LocalFs, A = SystemActions> {
    settings: Settings,
    layout: Layout,
    owner: Ownership,
    locator: TemplateLocator,
    renderer: TemplateRenderer,
    fs: F,
    actions: A,
}

impl VhostManager<LocalFs, SystemActions> {
    /// Manager over the local filesystem and real processes.
    pub fn system(settings: Settings, owner: Ownership) -> Self {
        let actions = SystemActions::from_settings(&settings);
        Self::new(settings, owner, LocalFs, actions)
    }
}

impl<F: Filesystem, A: ExternalActions> VhostManager<F, A> {
    pub fn new(settings: Settings, owner: Ownership, fs: F, actions: A) -> Self {
        Self {
            layout: Layout::from_settings(&settings),
            locator: TemplateLocator::new(settings.templates.search_dirs.clone()),
            renderer: TemplateRenderer::new(settings.templates.strict),
            settings,
            owner,
            fs,
            actions,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    /// Canonical paths for `name`.
    pub fn paths(&self, name: &str) -> VhostResult<VhostPaths> {
        self.layout.paths(name)
    }

    /// Current state of `name`, probed from the filesystem.
    pub fn state(&self, name: &str) -> VhostResult<VhostState> {
        let paths = self.paths(name)?;
        Ok(VhostState::probe(&self.fs, &paths))
    }

    /// Whether the enabled link for `name` exists.
    pub fn is_enabled(&self, name: &str) -> VhostResult<bool> {
        let paths = self.paths(name)?;
        Ok(self.fs.exists(&paths.enabled))
    }

    fn hosts(&self) -> HostsFile<'_> {
        HostsFile::new(
            &self.fs,
            self.settings.general.hosts_file.clone(),
            &self.settings.general.hosts_ip,
            self.settings.general.hosts_match,
        )
    }

    /// Render the configuration (and sample page) without touching the filesystem.
    ///
    /// All SSL assets and templates are checked here so a failure leaves no
    /// partial state behind.
    fn render_site(
        &self,
        paths: &VhostPaths,
        options: &CreateOptions,
    ) -> VhostResult<RenderedSite> {
        let ip = validate_bind_ip(&options.ip)?;
        let subdir = normalize_subdir(options.subdir.as_deref())?;

        let vhost_template = self.locator.load(&self.fs, TemplateKind::Vhost)?;

        let (port, ssl) = if options.ssl {
            (HTTPS_PORT, self.render_ssl_fragment()?)
        } else {
            (HTTP_PORT, String::new())
        };

        let values = Placeholders::new()
            .with("name", paths.site_name.as_str())
            .with("sitesdir", self.layout.sites_dir.to_string_lossy())
            .with("ip", ip)
            .with("subdir", subdir.as_str())
            .with("port", port.to_string())
            .with("ssl", ssl);
        let config = self.renderer.render(
            &vhost_template.path.to_string_lossy(),
            &vhost_template.text,
            &values,
        )?;

        let index_page = if options.sample {
            let template = self.locator.load(&self.fs, TemplateKind::Index)?;
            let values = Placeholders::new().with("site", paths.site_name.as_str());
            Some(
                self.renderer
                    .render(&template.path.to_string_lossy(), &template.text, &values)?,
            )
        } else {
            None
        };

        Ok(RenderedSite {
            config,
            subdir,
            index_page,
        })
    }

    fn render_ssl_fragment(&self) -> VhostResult<String> {
        let template = self.locator.load(&self.fs, TemplateKind::Ssl)?;

        let ssl = &self.settings.ssl;
        let (Some(cert_file), Some(key_file)) = (&ssl.cert_file, &ssl.key_file) else {
            return Err(VhostError::config(
                "Either ssl.cert_file or ssl.key_file is not set in configuration",
            ));
        };

        for file in [cert_file, key_file] {
            if !self.fs.exists(file) {
                return Err(VhostError::config(format!(
                    "File not found: {}",
                    file.display()
                )));
            }
        }

        let values = Placeholders::new()
            .with("cert_file", cert_file.to_string_lossy())
            .with("key_file", key_file.to_string_lossy());
        self.renderer
            .render(&template.path.to_string_lossy(), &template.text, &values)
    }

    /// Create `path` if missing and hand it to the configured owner.
    ///
    /// Existing directories are left untouched, ownership included.
    fn ensure_dir(&self, path: &std::path::Path) -> VhostResult<()> {
        if self.fs.create_dir(path)? {
            self.fs.set_owner(path, self.owner)?;
            info!(path = %path.display(), "Created directory");
        } else {
            debug!(path = %path.display(), "Directory already exists");
        }
        Ok(())
    }

    /// Render the configuration and lay out the site tree.
    ///
    /// In dump mode nothing is written and the rendered text is returned.
    pub fn create(&self, name: &str, options: &CreateOptions) -> VhostResult<CreateOutcome> {
        let paths = self.paths(name)?;

        if options.mysql {
            validate_database_name(&paths.name)?;
            validate_charset(&self.settings.mysql.charset)?;
        }

        if !options.dump && self.fs.exists(&paths.available) {
            return Err(VhostError::precondition(PreconditionKind::AlreadyExists {
                name: paths.name,
            }));
        }

        info!(name = %paths.name, dump = options.dump, "Creating vhost");

        let site = self.render_site(&paths, options)?;

        if options.dump {
            return Ok(CreateOutcome::Dumped {
                config: site.config,
            });
        }

        self.fs.write_atomic(&paths.available, &site.config)?;
        self.fs.set_owner(&paths.available, self.owner)?;
        info!(path = %paths.available.display(), "Wrote vhost configuration");

        for dir in paths.site_dirs(&site.subdir) {
            self.ensure_dir(&dir)?;
        }

        if let Some(index_page) = &site.index_page {
            let index_path = paths.document_root(&site.subdir).join("index.html");
            self.fs.write(&index_path, index_page)?;
            self.fs.set_owner(&index_path, self.owner)?;
            info!(path = %index_path.display(), "Added sample index.html");
        }

        if options.mysql {
            let charset = &self.settings.mysql.charset;
            match self.actions.create_database(&paths.name, charset) {
                Ok(()) => info!(name = %paths.name, charset = %charset, "Created database"),
                Err(e) => error!(name = %paths.name, error = %e, "Failed to create database"),
            }
        }

        Ok(CreateOutcome::Created { paths })
    }

    /// Link the configuration into the enabled directory, register the
    /// hostname and reload the web server.
    pub fn enable(&self, name: &str) -> VhostResult<()> {
        let paths = self.paths(name)?;
        info!(name = %paths.name, "Enabling vhost");

        match VhostState::probe(&self.fs, &paths) {
            VhostState::Enabled => {
                return Err(VhostError::precondition(PreconditionKind::AlreadyEnabled {
                    name: paths.name,
                }));
            }
            VhostState::Absent => {
                return Err(VhostError::precondition(PreconditionKind::NotFound {
                    name: paths.name,
                }));
            }
            VhostState::Available => {}
        }

        self.fs.create_dir(&self.layout.enabled_dir)?;
        self.fs.symlink(&paths.available, &paths.enabled)?;
        debug!(
            available = %paths.available.display(),
            enabled = %paths.enabled.display(),
            "Created enabled link"
        );

        // The link exists now: finish the remaining steps before reporting
        let mut failure: Option<VhostError> = None;
        if let Err(e) = self.fs.set_owner(&paths.enabled, self.owner) {
            error!(path = %paths.enabled.display(), error = %e, "Failed to chown enabled link");
            failure = failure.or(Some(e.into()));
        }

        let hosts = self.hosts();
        match hosts.add(&paths.site_name) {
            Ok(true) => {
                info!(site = %paths.site_name, hosts_file = %hosts.path().display(), "Added hosts entry")
            }
            Ok(false) => {}
            Err(e) => {
                error!(hosts_file = %hosts.path().display(), error = %e, "Failed to add hosts entry");
                failure = failure.or(Some(e.into()));
            }
        }

        self.reload();
        failure.map_or(Ok(()), Err)
    }

    /// Remove the enabled link and hosts entry, then reload the web server.
    pub fn disable(&self, name: &str) -> VhostResult<()> {
        let paths = self.paths(name)?;
        info!(name = %paths.name, "Disabling vhost");

        match VhostState::probe(&self.fs, &paths) {
            VhostState::Absent => {
                return Err(VhostError::precondition(PreconditionKind::NotFound {
                    name: paths.name,
                }));
            }
            VhostState::Available => {
                return Err(VhostError::precondition(PreconditionKind::NotEnabled {
                    name: paths.name,
                }));
            }
            VhostState::Enabled => {}
        }

        if !self.fs.is_symlink(&paths.enabled) {
            return Err(VhostError::execution_failed(format!(
                "{} is not a symlink, refusing to remove it",
                paths.enabled.display()
            )));
        }
        self.fs.remove_file(&paths.enabled)?;
        debug!(enabled = %paths.enabled.display(), "Removed enabled link");

        let hosts = self.hosts();
        let result = match hosts.remove(&paths.site_name) {
            Ok(removed) => {
                if removed {
                    info!(site = %paths.site_name, hosts_file = %hosts.path().display(), "Removed hosts entry");
                }
                Ok(())
            }
            Err(e) => {
                error!(hosts_file = %hosts.path().display(), error = %e, "Failed to remove hosts entry");
                Err(e.into())
            }
        };

        self.reload();
        result
    }

    fn reload(&self) {
        if let Err(e) = self.actions.reload() {
            error!(error = %e, "Failed to reload web server");
        }
    }

    /// Disable if needed, delete the configuration and optionally the site
    /// tree and database.
    pub fn remove(&self, name: &str, options: &RemoveOptions) -> VhostResult<()> {
        let paths = self.paths(name)?;
        info!(name = %paths.name, purge = options.purge, "Removing vhost");

        // Errors past this point are reported after the cascade has run
        let mut failure: Option<VhostError> = None;
        match self.disable(name) {
            Ok(()) => {}
            Err(VhostError::Precondition { kind }) => debug!(reason = %kind, "Skipped disable"),
            Err(e) => {
                error!(name = %paths.name, error = %e, "Failed to disable vhost");
                failure = Some(e);
            }
        }

        if self.fs.exists(&paths.available) {
            match self.fs.remove_file(&paths.available) {
                Ok(()) => info!(path = %paths.available.display(), "Removed vhost configuration"),
                Err(e) => {
                    error!(path = %paths.available.display(), error = %e, "Failed to remove vhost configuration");
                    failure = failure.or(Some(e.into()));
                }
            }
        } else {
            warn!(path = %paths.available.display(), "Vhost configuration does not exist");
        }

        if options.purge {
            if self.fs.is_dir(&paths.site_root) {
                match self.fs.remove_dir_all(&paths.site_root) {
                    Ok(()) => info!(path = %paths.site_root.display(), "Removed site files"),
                    Err(e) => warn!(
                        path = %paths.site_root.display(),
                        error = %e,
                        "Failed to remove site files"
                    ),
                }
            } else {
                warn!(path = %paths.site_root.display(), "Site root does not exist");
            }
        }

        if options.mysql {
            match self.actions.drop_database(&paths.name) {
                Ok(()) => warn!(name = %paths.name, "Database has been dropped"),
                Err(e) => error!(name = %paths.name, error = %e, "Failed to drop database"),
            }
        }

        failure.map_or(Ok(()), Err)
    }

    /// Report paths, enabled status and optionally database existence.
    pub fn info(&self, name: &str, check_database: bool) -> VhostResult<VhostInfo> {
        let paths = self.paths(name)?;
        if !self.fs.exists(&paths.available) {
            return Err(VhostError::precondition(PreconditionKind::NotFound {
                name: paths.name,
            }));
        }

        let database_exists = if check_database {
            match self.actions.database_exists(&paths.name) {
                Ok(exists) => Some(exists),
                Err(e) => {
                    error!(name = %paths.name, error = %e, "Failed to query database");
                    None
                }
            }
        } else {
            None
        };

        Ok(VhostInfo {
            enabled: self.fs.exists(&paths.enabled),
            site_root_exists: self.fs.is_dir(&paths.site_root),
            name: paths.name,
            site_name: paths.site_name,
            config_path: paths.available,
            site_root: paths.site_root,
            database_exists,
        })
    }

    /// File names in the available or enabled directory.
    pub fn list(&self, scope: ListScope) -> VhostResult<Vec<String>> {
        let dir = match scope {
            ListScope::Available => &self.layout.available_dir,
            ListScope::Enabled => &self.layout.enabled_dir,
        };
        Ok(self.fs.list_dir(dir)?)
    }

    /// Open the configuration of `name` in the editor.
    pub fn alter(&self, name: &str) -> VhostResult<PathBuf> {
        let paths = self.paths(name)?;
        if !self.fs.exists(&paths.available) {
            return Err(VhostError::precondition(PreconditionKind::NotFound {
                name: paths.name,
            }));
        }

        if let Err(e) = self.actions.open_editor(&paths.available) {
            error!(path = %paths.available.display(), error = %e, "Failed to open editor");
        }
        Ok(paths.available)
    }

    /// Create, then enable when a config was actually written.
    ///
    /// Dump mode and any create failure stop before enabling.
    pub fn create_and_enable(
        &self,
        name: &str,
        options: &CreateOptions,
    ) -> VhostResult<CreateOutcome> {
        let outcome = self.create(name, options)?;
        if let CreateOutcome::Created { .. } = &outcome {
            self.enable(name)?;
        }
        Ok(outcome)
    }
}

//! Command-line arguments.
//!
//! One action flag per invocation; the remaining flags modify it.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::vhost::{CreateOptions, ListScope, RemoveOptions};

#[derive(Debug, Parser)]
#[command(name = "vhost", version, about = "Manage local Apache virtual hosts")]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["create", "enable", "disable", "alter", "remove", "list", "info"])
))]
pub struct Cli {
    /// Create the vhost configuration and site tree, then enable it
    #[arg(short = 'c', long)]
    pub create: bool,

    /// Enable an existing vhost
    #[arg(short = 'e', long)]
    pub enable: bool,

    /// Disable an enabled vhost
    #[arg(short = 'd', long)]
    pub disable: bool,

    /// Open the vhost configuration in the editor
    #[arg(short = 'a', long)]
    pub alter: bool,

    /// Disable and delete the vhost configuration
    #[arg(short = 'r', long)]
    pub remove: bool,

    /// List vhost configurations
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Show paths and status of a vhost
    #[arg(short = 'i', long)]
    pub info: bool,

    /// Vhost name
    #[arg(required_unless_present = "list")]
    pub name: Option<String>,

    /// Document root below www/
    #[arg(long, value_name = "DIR")]
    pub subdir: Option<String>,

    /// Add a sample index.html to the document root
    #[arg(long)]
    pub sample: bool,

    /// Address the vhost listens on
    #[arg(long, default_value = "*")]
    pub ip: String,

    /// Serve over HTTPS with the configured certificate
    #[arg(long)]
    pub ssl: bool,

    /// Print the rendered configuration and write nothing
    #[arg(long)]
    pub dump: bool,

    /// Create, drop or probe a database named after the vhost
    #[arg(long)]
    pub mysql: bool,

    /// Also delete the site root on remove
    #[arg(long)]
    pub purge: bool,

    /// List enabled vhosts instead of available ones
    #[arg(long)]
    pub enabled: bool,

    /// Configuration file, instead of searching the default locations
    #[arg(long, env = "VHOST_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format for list and info
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// The selected action with its vhost name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create(String),
    Enable(String),
    Disable(String),
    Alter(String),
    Remove(String),
    List,
    Info(String),
}

impl Action {
    /// Whether the action may run without root privileges.
    pub fn is_unprivileged(&self, dump: bool) -> bool {
        match self {
            Self::Create(_) => dump,
            Self::Alter(_) | Self::List | Self::Info(_) => true,
            Self::Enable(_) | Self::Disable(_) | Self::Remove(_) => false,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Enable(_) => "enable",
            Self::Disable(_) => "disable",
            Self::Alter(_) => "alter",
            Self::Remove(_) => "remove",
            Self::List => "list",
            Self::Info(_) => "info",
        }
    }
}

impl Cli {
    /// Resolve the action flag group into an [`Action`].
    ///
    /// Returns `None` only when clap's own checks were bypassed.
    pub fn action(&self) -> Option<Action> {
        if self.list {
            return Some(Action::List);
        }
        let name = self.name.clone()?;
        let action = if self.create {
            Action::Create(name)
        } else if self.enable {
            Action::Enable(name)
        } else if self.disable {
            Action::Disable(name)
        } else if self.alter {
            Action::Alter(name)
        } else if self.remove {
            Action::Remove(name)
        } else if self.info {
            Action::Info(name)
        } else {
            return None;
        };
        Some(action)
    }

    pub fn create_options(&self) -> CreateOptions {
        CreateOptions {
            ip: self.ip.clone(),
            subdir: self.subdir.clone(),
            ssl: self.ssl,
            sample: self.sample,
            mysql: self.mysql,
            dump: self.dump,
        }
    }

    pub fn remove_options(&self) -> RemoveOptions {
        RemoveOptions {
            purge: self.purge,
            mysql: self.mysql,
        }
    }

    pub fn list_scope(&self) -> ListScope {
        if self.enabled {
            ListScope::Enabled
        } else {
            ListScope::Available
        }
    }
}

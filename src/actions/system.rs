//! [`ExternalActions`] backed by real processes.

use std::path::Path;

use tracing::{info, warn};

use crate::config::{MysqlConfig, Settings};
use crate::error::VhostError;
use crate::executor::{run_command, SubprocessBuilder};
use crate::validation::{validate_charset, validate_database_name};

use super::traits::ExternalActions;

/// Runs the configured reload command, the `mysql` client and the editor.
#[derive(Debug, Clone)]
pub struct SystemActions {
    restart_command: String,
    mysql: MysqlConfig,
    editor: String,
}

impl SystemActions {
    pub fn new(restart_command: &str, mysql: MysqlConfig, editor: &str) -> Self {
        Self {
            restart_command: restart_command.to_string(),
            mysql,
            editor: editor.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.apache.restart_command,
            settings.mysql.clone(),
            &settings.general.editor,
        )
    }

    /// Run one SQL statement through the `mysql` client.
    ///
    /// The password travels in `MYSQL_PWD` so it never shows up in argv or logs.
    fn mysql(&self, sql: &str, batch: bool) -> Result<String, VhostError> {
        let mut args: Vec<&str> = Vec::new();
        if let Some(user) = &self.mysql.user {
            args.extend(["-u", user.as_str()]);
        }
        if let Some(host) = &self.mysql.host {
            args.extend(["-h", host.as_str()]);
        }
        if batch {
            args.extend(["-N", "-B"]);
        }
        args.extend(["-e", sql]);

        let result = match self.mysql.password.as_deref() {
            Some(password) => SubprocessBuilder::new("mysql")
                .args(args)
                .env("MYSQL_PWD", password)
                .sensitive()
                .run()?,
            None => run_command("mysql", &args)?,
        };
        Ok(result.check("mysql")?.stdout)
    }
}

/// Split a configured command line on whitespace into program and arguments.
pub fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

impl ExternalActions for SystemActions {
    fn reload(&self) -> Result<(), VhostError> {
        let (program, args) = split_command(&self.restart_command)
            .ok_or_else(|| VhostError::config("apache.restart_command cannot be empty"))?;

        info!(command = %self.restart_command, "Reloading web server");
        run_command(program, &args)?.check(program)?;
        Ok(())
    }

    fn create_database(&self, name: &str, charset: &str) -> Result<(), VhostError> {
        validate_database_name(name)?;
        validate_charset(charset)?;

        info!(name, charset, "Creating MySQL database");
        self.mysql(
            &format!("CREATE DATABASE `{}` CHARACTER SET {}", name, charset),
            false,
        )?;
        Ok(())
    }

    fn drop_database(&self, name: &str) -> Result<(), VhostError> {
        validate_database_name(name)?;

        warn!(name, "Dropping MySQL database (destructive operation)");
        self.mysql(&format!("DROP DATABASE IF EXISTS `{}`", name), false)?;
        Ok(())
    }

    fn database_exists(&self, name: &str) -> Result<bool, VhostError> {
        validate_database_name(name)?;

        let stdout = self.mysql(
            &format!(
                "SELECT COUNT(*) FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = '{}'",
                name
            ),
            true,
        )?;
        Ok(stdout.trim() == "1")
    }

    fn open_editor(&self, path: &Path) -> Result<(), VhostError> {
        let (program, args) = split_command(&self.editor)
            .ok_or_else(|| VhostError::config("general.editor cannot be empty"))?;

        SubprocessBuilder::new(program)
            .args(args)
            .arg(&path.to_string_lossy())
            .interactive()
            .run()?
            .check(program)?;
        Ok(())
    }
}

//! Subprocess execution.
//!
//! Provides utilities for running external commands with:
//! - No shell interpretation (direct exec)
//! - Captured stdout/stderr
//! - Environment control
//!
//! Commands run to completion; there is no timeout.

use std::collections::HashMap;
use std::process::{Command, Output, Stdio};
use std::time::Instant;

use tracing::debug;

use crate::error::VhostError;

/// Result of a subprocess execution.
#[derive(Debug, Clone)]
pub struct SubprocessResult {
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// The exit code, if available.
    pub exit_code: Option<i32>,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl SubprocessResult {
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Convert a non-zero exit into an execution error mentioning `what`.
    pub fn check(self, what: &str) -> Result<Self, VhostError> {
        if self.success {
            return Ok(self);
        }
        let detail = self.stderr.trim();
        Err(VhostError::execution_failed(format!(
            "{} exited with {}{}{}",
            what,
            self.exit_code
                .map(|c| format!("code {}", c))
                .unwrap_or_else(|| "a signal".to_string()),
            if detail.is_empty() { "" } else { ": " },
            detail
        )))
    }
}

/// Builder for subprocess execution.
pub struct SubprocessBuilder {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    /// If true, arguments will not be logged (for commands containing secrets)
    sensitive: bool,
    /// If true, the child shares this process's terminal instead of being captured
    interactive: bool,
}

impl SubprocessBuilder {
    /// Create a new subprocess builder.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            env: HashMap::new(),
            sensitive: false,
            interactive: false,
        }
    }

    /// Mark this command as containing sensitive data (e.g., passwords).
    /// When set, command arguments will not be logged.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Let the child use the inherited stdin/stdout/stderr.
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Add arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args.extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Execute the command and wait for completion.
    pub fn run(self) -> Result<SubprocessResult, VhostError> {
        if self.sensitive {
            debug!(
                program = %self.program,
                args = "[REDACTED]",
                "Executing subprocess (sensitive)"
            );
        } else {
            debug!(
                program = %self.program,
                args = ?self.args,
                "Executing subprocess"
            );
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if self.interactive {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        } else {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let start = Instant::now();
        let output = cmd.output().map_err(|e| {
            VhostError::execution_failed(format!("Failed to run {}: {}", self.program, e))
        })?;
        Ok(self.finish(output, start))
    }

    fn finish(&self, output: Output, start: Instant) -> SubprocessResult {
        let result = SubprocessResult::from_output(output);
        debug!(
            program = %self.program,
            success = result.success,
            exit_code = ?result.exit_code,
            duration_ms = start.elapsed().as_millis(),
            "Subprocess completed"
        );
        result
    }
}

/// Run a command with the given arguments and no timeout.
pub fn run_command(program: &str, args: &[&str]) -> Result<SubprocessResult, VhostError> {
    SubprocessBuilder::new(program)
        .args(args.iter().copied())
        .run()
}

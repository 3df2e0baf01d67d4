//! Blocking subprocess launcher.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{BackendError, Result};

/// A program invocation that is spawned and waited for.
///
/// Redirected log files are owned by the launcher and closed when [`run`]
/// returns, whether or not the program could be started.
///
/// [`run`]: Launcher::run
#[derive(Debug)]
pub struct Launcher {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Option<BTreeMap<String, String>>,
    stdout: Option<File>,
    stderr: Option<File>,
}

impl Launcher {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
            env: None,
            stdout: None,
            stderr: None,
        }
    }

    /// Working directory of the child.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Replace the child's environment with `env`.
    pub fn env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Redirect standard output to `file`.
    pub fn stdout(mut self, file: File) -> Self {
        self.stdout = Some(file);
        self
    }

    /// Redirect standard error to `file`.
    pub fn stderr(mut self, file: File) -> Self {
        self.stderr = Some(file);
        self
    }

    /// Spawn the program and block until it exits.
    pub fn run(self) -> Result<()> {
        let program = self.program.display().to_string();
        debug!(program = %program, args = ?self.args, cwd = ?self.cwd, "launching");

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(ref dir) = self.cwd {
            command.current_dir(dir);
        }
        if let Some(env) = self.env {
            command.env_clear().envs(env);
        }
        if let Some(file) = self.stdout {
            command.stdout(Stdio::from(file));
        }
        if let Some(file) = self.stderr {
            command.stderr(Stdio::from(file));
        }

        let status = command
            .status()
            .map_err(|source| BackendError::Launch {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(BackendError::SubprocessFailure { program, status });
        }
        Ok(())
    }
}

use anyhow::Context;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while driving an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{step}: could not start `{program}`: {source}")]
    Spawn {
        step: String,
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{}: `{}` failed ({}){}", .step, .command, .status, format_stderr(.stderr))]
    Failed {
        step: String,
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

/// A single external command: program, arguments and an optional working directory.
///
/// Commands are assembled as data first so they can be logged (and inspected in
/// tests) before anything is spawned. No shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Runs the command to completion and returns its captured output,
    /// whatever the exit status.
    pub fn output(&self, step: &str) -> Result<Output, ToolError> {
        debug!("{}: {}", step, self);
        self.command().output().map_err(|source| ToolError::Spawn {
            step: step.to_string(),
            program: self.program.to_string_lossy().into_owned(),
            source,
        })
    }

    /// Runs the command and fails unless it exits successfully.
    pub fn run_checked(&self, step: &str) -> Result<Output, ToolError> {
        info!("{}: {}", step, self);
        let output = self.output(step)?;
        if !output.status.success() {
            return Err(ToolError::Failed {
                step: step.to_string(),
                command: self.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output)
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(dir) = &self.current_dir {
            write!(f, "cd {} && ", dir.display())?;
        }
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Checks that `tool` can be started, pointing at `hint` when it can't.
pub fn check_tool(tool: &OsStr, hint: &str) -> anyhow::Result<()> {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("{} not found. {}", tool.to_string_lossy(), hint))
        .map(|_| ())
}

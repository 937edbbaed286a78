// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Invocation layer for the `warp-cli` control tool.
//!
//! The [`WarpCli`] trait is the only seam between the controller and the
//! outside world. [`ProcessCli`] runs the real executable; tests substitute a
//! scripted implementation.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use thiserror::Error;

use crate::state::ErrorKind;

/// Default program name looked up on the search path.
pub const DEFAULT_PROGRAM: &str = "warp-cli";

/// Subcommands understood by `warp-cli`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    Status,
    Connect,
    Disconnect,
}

impl Subcommand {
    /// Argument passed on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while invoking the control tool.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("`{program}` was not found on the search path")]
    NotFound { program: String },

    #[error("`{program} {subcommand}` exited with {}{}", describe_code(*.code), describe_stderr(.stderr))]
    Failed {
        program: String,
        subcommand: Subcommand,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    /// Collapse the error into the two kinds the status display distinguishes.
    ///
    /// Spawn failures other than "not found" (permission denied, bad format)
    /// mean the tool is present but unusable, so they count as invocation
    /// failures.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::ToolNotFound,
            Self::Failed { .. } | Self::Spawn { .. } => ErrorKind::ToolInvocationFailed,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// Something that can run `warp-cli` subcommands.
pub trait WarpCli {
    /// Run `subcommand` to completion and return its standard output.
    ///
    /// Blocks until the process exits. A non-zero exit status is an error.
    fn run(&self, subcommand: Subcommand) -> Result<String, CliError>;
}

impl<T: WarpCli + ?Sized> WarpCli for &T {
    fn run(&self, subcommand: Subcommand) -> Result<String, CliError> {
        (**self).run(subcommand)
    }
}

impl<T: WarpCli + ?Sized> WarpCli for Box<T> {
    fn run(&self, subcommand: Subcommand) -> Result<String, CliError> {
        (**self).run(subcommand)
    }
}

/// Runs the control tool as a child process.
#[derive(Debug, Clone)]
pub struct ProcessCli {
    program: PathBuf,
}

impl Default for ProcessCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl ProcessCli {
    /// Create an invoker for `program`, either a bare name resolved through
    /// `PATH` or a path to the executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program this invoker runs.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl WarpCli for ProcessCli {
    fn run(&self, subcommand: Subcommand) -> Result<String, CliError> {
        debug!("Running `{} {}`", self.program_name(), subcommand);

        let output = Command::new(&self.program)
            .arg(subcommand.as_str())
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    CliError::NotFound {
                        program: self.program_name(),
                    }
                } else {
                    CliError::Spawn {
                        program: self.program_name(),
                        source: e,
                    }
                }
            })?;

        if !output.status.success() {
            return Err(CliError::Failed {
                program: self.program_name(),
                subcommand,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

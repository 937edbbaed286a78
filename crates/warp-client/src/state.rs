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

//! Connection state model.

use std::fmt;

use thiserror::Error;

use crate::cli::{CliError, Subcommand};

/// Token in `warp-cli status` output that signals an active connection.
pub const CONNECTED_TOKEN: &str = "Connected";

/// Why the control tool could not report a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The executable is not on the search path.
    ToolNotFound,
    /// The executable ran but exited non-zero.
    ToolInvocationFailed,
}

/// Connection state as last reported by the control tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No poll has completed yet.
    #[default]
    Unknown,
    Connected,
    Disconnected,
    Error(ErrorKind),
}

impl ConnectionState {
    /// Derive the state from the outcome of a `status` invocation.
    #[must_use]
    pub fn from_status_result(result: &Result<String, CliError>) -> Self {
        match result {
            Ok(stdout) => classify_status_output(stdout),
            Err(e) => Self::Error(e.kind()),
        }
    }

    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Action a toggle performs from this state, if any.
    #[must_use]
    pub const fn toggle_action(self) -> Option<Action> {
        match self {
            Self::Connected => Some(Action::Disconnect),
            Self::Disconnected => Some(Action::Connect),
            Self::Unknown | Self::Error(_) => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Connected => f.write_str("connected"),
            Self::Disconnected => f.write_str("disconnected"),
            Self::Error(ErrorKind::ToolNotFound) => f.write_str("error (tool not found)"),
            Self::Error(ErrorKind::ToolInvocationFailed) => f.write_str("error (invocation failed)"),
        }
    }
}

/// Classify successful `status` output.
///
/// Any occurrence of [`CONNECTED_TOKEN`] wins, whatever else is present.
#[must_use]
pub fn classify_status_output(stdout: &str) -> ConnectionState {
    if stdout.contains(CONNECTED_TOKEN) {
        ConnectionState::Connected
    } else {
        ConnectionState::Disconnected
    }
}

/// Outbound action on the VPN connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Connect,
    Disconnect,
}

impl Action {
    #[must_use]
    pub const fn subcommand(self) -> Subcommand {
        match self {
            Self::Connect => Subcommand::Connect,
            Self::Disconnect => Subcommand::Disconnect,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("connect to"),
            Self::Disconnect => f.write_str("disconnect from"),
        }
    }
}

/// A connect or disconnect request the control tool rejected.
#[derive(Debug, Error)]
#[error("could not {action} WARP: {source}")]
pub struct ActionError {
    pub action: Action,
    #[source]
    pub source: CliError,
}

impl ActionError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    /// Copyable summary kept for display until the next poll.
    #[must_use]
    pub const fn failure(&self) -> ActionFailure {
        ActionFailure {
            action: self.action,
            kind: self.kind(),
        }
    }
}

/// What failed and why, without the underlying process error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionFailure {
    pub action: Action,
    pub kind: ErrorKind,
}

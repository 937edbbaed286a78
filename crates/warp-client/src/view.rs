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

//! Pure mapping from connection state to what the widget shows.
//!
//! Nothing here knows about a UI toolkit: the front end turns a
//! [`StatusView`] into widgets and colors.

use crate::state::{Action, ActionFailure, ConnectionState, ErrorKind};

/// Color family for the status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Good,
    Bad,
    Warning,
}

/// Text on the action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionLabel {
    #[default]
    Connect,
    Disconnect,
}

impl ActionLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "Connect",
            Self::Disconnect => "Disconnect",
        }
    }
}

/// Everything the widget needs to draw one frame of status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    /// "Status" for polled states, "Error" while an action failure is shown
    pub heading: &'static str,
    pub label: &'static str,
    pub tone: Tone,
    pub action_enabled: bool,
    /// `None` keeps whatever the button showed before.
    pub action_label: Option<ActionLabel>,
}

impl StatusView {
    /// Render `state`, or the pending action failure when there is one.
    ///
    /// An action failure is only ever pending between the failed action and
    /// the next poll.
    #[must_use]
    pub const fn render(state: ConnectionState, action_failure: Option<ActionFailure>) -> Self {
        match action_failure {
            Some(failure) => Self::for_action_failure(failure),
            None => Self::for_state(state),
        }
    }

    /// Display mapping for a polled state.
    #[must_use]
    pub const fn for_state(state: ConnectionState) -> Self {
        match state {
            ConnectionState::Unknown => Self {
                heading: "Status",
                label: "Checking...",
                tone: Tone::Neutral,
                action_enabled: false,
                action_label: Some(ActionLabel::Connect),
            },
            ConnectionState::Connected => Self {
                heading: "Status",
                label: "Connected",
                tone: Tone::Good,
                action_enabled: true,
                action_label: Some(ActionLabel::Disconnect),
            },
            ConnectionState::Disconnected => Self {
                heading: "Status",
                label: "Disconnected",
                tone: Tone::Bad,
                action_enabled: true,
                action_label: Some(ActionLabel::Connect),
            },
            ConnectionState::Error(ErrorKind::ToolInvocationFailed) => Self {
                heading: "Status",
                label: "Error checking status",
                tone: Tone::Warning,
                action_enabled: true,
                action_label: None,
            },
            ConnectionState::Error(ErrorKind::ToolNotFound) => Self {
                heading: "Status",
                label: "CLI not found",
                tone: Tone::Bad,
                action_enabled: false,
                action_label: None,
            },
        }
    }

    const fn for_action_failure(failure: ActionFailure) -> Self {
        let label = match failure.action {
            Action::Connect => "Could not connect to WARP",
            Action::Disconnect => "Could not disconnect from WARP",
        };
        Self {
            heading: "Error",
            label,
            tone: Tone::Bad,
            action_enabled: !matches!(failure.kind, ErrorKind::ToolNotFound),
            action_label: None,
        }
    }

    /// Heading and label as one line, e.g. "Status: Connected".
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{}: {}", self.heading, self.label)
    }

    /// Button text after applying this view to a button showing `current`.
    #[must_use]
    pub fn action_label_or(&self, current: ActionLabel) -> ActionLabel {
        self.action_label.unwrap_or(current)
    }
}

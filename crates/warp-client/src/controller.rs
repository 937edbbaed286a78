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

//! Status polling and connection control.

use log::{debug, error, info, warn};

use crate::cli::{Subcommand, WarpCli};
use crate::state::{Action, ActionError, ActionFailure, ConnectionState};
use crate::view::StatusView;

/// Owns the cached connection state and drives `warp-cli`.
///
/// Every call blocks on the child process. State only ever changes as the
/// result of [`poll`](Self::poll); actions refresh it by polling afterwards.
#[derive(Debug)]
pub struct StatusController<C> {
    cli: C,
    state: ConnectionState,
    action_failure: Option<ActionFailure>,
}

impl<C: WarpCli> StatusController<C> {
    /// Create a controller in the [`ConnectionState::Unknown`] state.
    pub const fn new(cli: C) -> Self {
        Self {
            cli,
            state: ConnectionState::Unknown,
            action_failure: None,
        }
    }

    /// State from the most recent poll.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Failure of the last action, cleared by the next poll.
    #[must_use]
    pub const fn action_failure(&self) -> Option<ActionFailure> {
        self.action_failure
    }

    /// What the widget should show right now.
    #[must_use]
    pub const fn view(&self) -> StatusView {
        StatusView::render(self.state, self.action_failure)
    }

    /// Query `warp-cli status` and cache the result.
    pub fn poll(&mut self) -> ConnectionState {
        debug!("Updating status...");

        let result = self.cli.run(Subcommand::Status);
        if let Err(e) = &result {
            error!("Error checking WARP status: {}", e);
        }

        let state = ConnectionState::from_status_result(&result);
        if state != self.state {
            info!("WARP status changed: {} -> {}", self.state, state);
        }

        self.state = state;
        self.action_failure = None;
        state
    }

    /// Run `warp-cli connect`, then poll on success.
    pub fn connect(&mut self) -> Result<(), ActionError> {
        self.perform(Action::Connect)
    }

    /// Run `warp-cli disconnect`, then poll on success.
    pub fn disconnect(&mut self) -> Result<(), ActionError> {
        self.perform(Action::Disconnect)
    }

    /// Disconnect when connected, connect when disconnected.
    ///
    /// Does nothing while the state is unknown or an error.
    pub fn toggle(&mut self) -> Result<(), ActionError> {
        info!("Toggling connection (current status: {})", self.state);

        match self.state.toggle_action() {
            Some(Action::Connect) => self.connect(),
            Some(Action::Disconnect) => self.disconnect(),
            None => {
                debug!("Nothing to toggle while status is {}", self.state);
                Ok(())
            }
        }
    }

    fn perform(&mut self, action: Action) -> Result<(), ActionError> {
        info!("Requesting WARP to {}", action.subcommand());

        match self.cli.run(action.subcommand()) {
            Ok(_) => {
                self.poll();
                Ok(())
            }
            Err(source) => {
                let err = ActionError { action, source };
                warn!("{}", err);
                self.action_failure = Some(err.failure());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    use super::*;
    use crate::cli::CliError;
    use crate::state::ErrorKind;
    use crate::view::ActionLabel;

    #[derive(Debug, Clone, Copy)]
    enum Reply {
        Stdout(&'static str),
        Exit(i32),
        Missing,
    }

    /// Replays canned replies per subcommand and records every invocation.
    #[derive(Debug, Default)]
    struct ScriptedCli {
        replies: RefCell<HashMap<Subcommand, VecDeque<Reply>>>,
        calls: RefCell<Vec<Subcommand>>,
    }

    impl ScriptedCli {
        fn reply(&self, subcommand: Subcommand, reply: Reply) -> &Self {
            self.replies
                .borrow_mut()
                .entry(subcommand)
                .or_default()
                .push_back(reply);
            self
        }

        fn calls(&self) -> Vec<Subcommand> {
            self.calls.borrow().clone()
        }
    }

    impl WarpCli for ScriptedCli {
        fn run(&self, subcommand: Subcommand) -> Result<String, CliError> {
            self.calls.borrow_mut().push(subcommand);
            let reply = self
                .replies
                .borrow_mut()
                .get_mut(&subcommand)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| panic!("unexpected `{subcommand}` invocation"));

            match reply {
                Reply::Stdout(out) => Ok(out.to_string()),
                Reply::Exit(code) => Err(CliError::Failed {
                    program: "warp-cli".to_string(),
                    subcommand,
                    code: Some(code),
                    stderr: String::new(),
                }),
                Reply::Missing => Err(CliError::NotFound {
                    program: "warp-cli".to_string(),
                }),
            }
        }
    }

    const CONNECTED: &str = "Status update: Connected\nNetwork: healthy\n";
    const DISCONNECTED: &str = "Status update: Disconnected\nReason: Manual Disconnection\n";

    #[test]
    fn test_starts_unknown() {
        let cli = ScriptedCli::default();
        let controller = StatusController::new(&cli);
        assert_eq!(controller.state(), ConnectionState::Unknown);
        assert_eq!(controller.view().label, "Checking...");
        assert!(!controller.view().action_enabled);
        assert!(cli.calls().is_empty());
    }

    #[test]
    fn test_poll_outcomes() {
        let cli = ScriptedCli::default();
        cli.reply(Subcommand::Status, Reply::Stdout(CONNECTED))
            .reply(Subcommand::Status, Reply::Stdout(DISCONNECTED))
            .reply(Subcommand::Status, Reply::Exit(1))
            .reply(Subcommand::Status, Reply::Missing);
        let mut controller = StatusController::new(&cli);

        assert_eq!(controller.poll(), ConnectionState::Connected);
        assert_eq!(controller.poll(), ConnectionState::Disconnected);
        assert_eq!(
            controller.poll(),
            ConnectionState::Error(ErrorKind::ToolInvocationFailed)
        );
        assert!(controller.view().action_enabled);
        assert_eq!(controller.poll(), ConnectionState::Error(ErrorKind::ToolNotFound));
        assert!(!controller.view().action_enabled);

        assert_eq!(cli.calls(), vec![Subcommand::Status; 4]);
    }

    #[test]
    fn test_toggle_when_connected_disconnects_then_polls() {
        let cli = ScriptedCli::default();
        cli.reply(Subcommand::Status, Reply::Stdout(CONNECTED))
            .reply(Subcommand::Disconnect, Reply::Stdout(""))
            .reply(Subcommand::Status, Reply::Stdout(DISCONNECTED));
        let mut controller = StatusController::new(&cli);
        controller.poll();

        controller.toggle().unwrap();

        assert_eq!(
            cli.calls(),
            vec![Subcommand::Status, Subcommand::Disconnect, Subcommand::Status]
        );
        assert_eq!(controller.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_toggle_without_known_state_is_noop() {
        let cli = ScriptedCli::default();
        let mut controller = StatusController::new(&cli);
        controller.toggle().unwrap();
        assert!(cli.calls().is_empty());

        cli.reply(Subcommand::Status, Reply::Exit(1))
            .reply(Subcommand::Status, Reply::Missing);

        controller.poll();
        controller.toggle().unwrap();
        controller.poll();
        controller.toggle().unwrap();

        assert_eq!(cli.calls(), vec![Subcommand::Status, Subcommand::Status]);
    }

    #[test]
    fn test_connect_sequence_updates_button() {
        let cli = ScriptedCli::default();
        cli.reply(Subcommand::Status, Reply::Stdout(DISCONNECTED))
            .reply(Subcommand::Connect, Reply::Stdout("Success"))
            .reply(Subcommand::Status, Reply::Stdout(CONNECTED));
        let mut controller = StatusController::new(&cli);
        let mut button = ActionLabel::default();

        controller.poll();
        button = controller.view().action_label_or(button);
        assert_eq!(button, ActionLabel::Connect);

        controller.toggle().unwrap();
        let view = controller.view();
        button = view.action_label_or(button);

        assert_eq!(controller.state(), ConnectionState::Connected);
        assert_eq!(button, ActionLabel::Disconnect);
        assert_eq!(button.as_str(), "Disconnect");
        assert!(view.action_enabled);
    }

    #[test]
    fn test_failed_action_is_reported_without_poll() {
        let cli = ScriptedCli::default();
        cli.reply(Subcommand::Status, Reply::Stdout(DISCONNECTED))
            .reply(Subcommand::Connect, Reply::Exit(1))
            .reply(Subcommand::Status, Reply::Stdout(DISCONNECTED));
        let mut controller = StatusController::new(&cli);
        controller.poll();

        let err = controller.toggle().unwrap_err();
        assert_eq!(err.action, Action::Connect);
        assert_eq!(err.kind(), ErrorKind::ToolInvocationFailed);
        assert_eq!(cli.calls(), vec![Subcommand::Status, Subcommand::Connect]);

        // state is untouched, the failure is shown instead
        assert_eq!(controller.state(), ConnectionState::Disconnected);
        assert_eq!(controller.view().label, "Could not connect to WARP");
        assert!(controller.view().action_enabled);

        controller.poll();
        assert_eq!(controller.action_failure(), None);
        assert_eq!(controller.view().label, "Disconnected");
    }

    #[test]
    fn test_disconnect_with_missing_tool_disables_button() {
        let cli = ScriptedCli::default();
        cli.reply(Subcommand::Disconnect, Reply::Missing);
        let mut controller = StatusController::new(&cli);

        let err = controller.disconnect().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ToolNotFound);
        assert_eq!(controller.view().label, "Could not disconnect from WARP");
        assert!(!controller.view().action_enabled);
        assert_eq!(controller.state(), ConnectionState::Unknown);
    }

    #[test]
    fn test_connect_does_not_check_state() {
        let cli = ScriptedCli::default();
        cli.reply(Subcommand::Connect, Reply::Stdout(""))
            .reply(Subcommand::Status, Reply::Stdout(CONNECTED));
        let mut controller = StatusController::new(&cli);

        controller.connect().unwrap();
        assert_eq!(cli.calls(), vec![Subcommand::Connect, Subcommand::Status]);
        assert_eq!(controller.state(), ConnectionState::Connected);
    }
}

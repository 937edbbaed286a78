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

mod app;
mod config;
mod event_log;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info, warn};

use app::{WarpApp, WINDOW_TITLE};
use config::AppConfig;
use warp_client::{ProcessCli, StatusController, WarpCli};

#[derive(Parser, Debug)]
#[command(name = "warp-status", version, about = "Desktop status widget for the Cloudflare WARP client")]
struct Cli {
    /// Path to the warp-cli executable (overrides the config file)
    #[arg(long = "cli", value_name = "PATH", global = true)]
    cli_path: Option<String>,

    /// Write command-line overrides back to the config file
    #[arg(long, global = true)]
    save_config: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Open the status widget (default)
    Gui,
    /// Print the current status once and exit
    Status,
    /// Connect or disconnect depending on the current status
    Toggle,
    /// Print the config file location
    ConfigPath,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = AppConfig::load_or_default().with_cli_path(cli.cli_path.clone());
    if cli.save_config {
        match config.save() {
            Ok(()) => info!("Configuration saved"),
            Err(e) => warn!("Failed to save configuration: {}", e),
        }
    }

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => {
            run_gui(config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => Ok(run_status(&config)),
        Command::Toggle => Ok(run_toggle(&config)),
        Command::ConfigPath => {
            println!("{}", AppConfig::get_config_path()?.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_gui(config: AppConfig) -> Result<(), eframe::Error> {
    info!("Starting WARP status widget...");

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([config.window_width, config.window_height])
        .with_title(WINDOW_TITLE);
    if config.always_on_top {
        viewport = viewport.with_window_level(egui::viewport::WindowLevel::AlwaysOnTop);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(WarpApp::new(cc, &config)))),
    )
}

/// Outcome of a headless command: the line to print and whether it succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
struct Report {
    line: String,
    success: bool,
}

impl Report {
    fn emit(&self) -> ExitCode {
        if self.success {
            println!("{}", self.line);
            ExitCode::SUCCESS
        } else {
            eprintln!("{}", self.line);
            ExitCode::FAILURE
        }
    }
}

fn status_report<C: WarpCli>(controller: &mut StatusController<C>) -> Report {
    let state = controller.poll();
    Report {
        line: controller.view().headline(),
        success: !state.is_error(),
    }
}

fn toggle_report<C: WarpCli>(controller: &mut StatusController<C>) -> Report {
    let state = controller.poll();

    if state.toggle_action().is_none() {
        return Report {
            line: format!("Cannot toggle while status is: {}", controller.view().label),
            success: false,
        };
    }

    match controller.toggle() {
        Ok(()) => Report {
            line: controller.view().headline(),
            success: !controller.state().is_error(),
        },
        Err(e) => {
            error!("{}", e);
            Report {
                line: controller.view().headline(),
                success: false,
            }
        }
    }
}

fn run_status(config: &AppConfig) -> ExitCode {
    let mut controller = StatusController::new(ProcessCli::new(&config.cli_path));
    status_report(&mut controller).emit()
}

fn run_toggle(config: &AppConfig) -> ExitCode {
    let mut controller = StatusController::new(ProcessCli::new(&config.cli_path));
    toggle_report(&mut controller).emit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use warp_client::{CliError, Subcommand};

    /// Answers invocations in order and records them
    #[derive(Debug, Default)]
    struct QueuedCli {
        replies: RefCell<VecDeque<Option<&'static str>>>,
        calls: RefCell<Vec<Subcommand>>,
        missing: bool,
    }

    impl QueuedCli {
        /// `Some(stdout)` succeeds, `None` exits with status 1
        fn new(replies: &[Option<&'static str>]) -> Self {
            Self {
                replies: RefCell::new(replies.iter().copied().collect()),
                ..Self::default()
            }
        }

        fn missing() -> Self {
            Self {
                missing: true,
                ..Self::default()
            }
        }
    }

    impl WarpCli for QueuedCli {
        fn run(&self, subcommand: Subcommand) -> Result<String, CliError> {
            self.calls.borrow_mut().push(subcommand);
            if self.missing {
                return Err(CliError::NotFound {
                    program: "warp-cli".to_string(),
                });
            }
            match self.replies.borrow_mut().pop_front().flatten() {
                Some(out) => Ok(out.to_string()),
                None => Err(CliError::Failed {
                    program: "warp-cli".to_string(),
                    subcommand,
                    code: Some(1),
                    stderr: String::new(),
                }),
            }
        }
    }

    fn status_of(cli: &QueuedCli) -> Report {
        status_report(&mut StatusController::new(cli))
    }

    #[test]
    fn test_status_exit_codes() {
        let report = status_of(&QueuedCli::new(&[Some("Status update: Connected")]));
        assert_eq!(report.line, "Status: Connected");
        assert!(report.success);

        let report = status_of(&QueuedCli::new(&[Some("Status update: Disconnected")]));
        assert_eq!(report.line, "Status: Disconnected");
        assert!(report.success);

        let report = status_of(&QueuedCli::new(&[None]));
        assert_eq!(report.line, "Status: Error checking status");
        assert!(!report.success);

        let report = status_of(&QueuedCli::missing());
        assert_eq!(report.line, "Status: CLI not found");
        assert!(!report.success);
    }

    #[test]
    fn test_toggle_refused_without_known_state() {
        let cli = QueuedCli::new(&[None]);
        let report = toggle_report(&mut StatusController::new(&cli));
        assert_eq!(report.line, "Cannot toggle while status is: Error checking status");
        assert!(!report.success);
        assert_eq!(*cli.calls.borrow(), vec![Subcommand::Status]);

        let cli = QueuedCli::missing();
        let report = toggle_report(&mut StatusController::new(&cli));
        assert!(!report.success);
        assert_eq!(*cli.calls.borrow(), vec![Subcommand::Status]);
    }

    #[test]
    fn test_toggle_connects() {
        let cli = QueuedCli::new(&[
            Some("Status update: Disconnected"),
            Some("Success"),
            Some("Status update: Connected"),
        ]);
        let report = toggle_report(&mut StatusController::new(&cli));
        assert_eq!(report.line, "Status: Connected");
        assert!(report.success);
        assert_eq!(
            *cli.calls.borrow(),
            vec![Subcommand::Status, Subcommand::Connect, Subcommand::Status]
        );
    }

    #[test]
    fn test_toggle_action_failure() {
        let cli = QueuedCli::new(&[Some("Status update: Connected"), None]);
        let report = toggle_report(&mut StatusController::new(&cli));
        assert_eq!(report.line, "Error: Could not disconnect from WARP");
        assert!(!report.success);
    }
}

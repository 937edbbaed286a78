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

//! Status polling and connection control for the Cloudflare WARP client.
//!
//! The crate wraps the `warp-cli` command-line tool and has no UI
//! dependency. It is split into small layers:
//!
//! - **Invocation**: [`WarpCli`] runs `status`, `connect` and `disconnect`;
//!   [`ProcessCli`] spawns the real executable
//! - **State**: [`ConnectionState`] and the errors a poll or action can yield
//! - **Controller**: [`StatusController`] caches the polled state and maps
//!   toggles onto actions
//! - **View**: [`StatusView`] is the pure display mapping for a front end
//! - **Ticker**: [`Ticker`] delivers the periodic poll trigger
//!
//! # Example
//!
//! ```no_run
//! use warp_client::{ProcessCli, StatusController, Ticker, TickerConfig};
//!
//! let mut controller = StatusController::new(ProcessCli::default());
//! controller.poll();
//!
//! let mut ticker = Ticker::spawn(TickerConfig::default(), || {}).unwrap();
//! loop {
//!     if ticker.ticked() {
//!         controller.poll();
//!         println!("{}", controller.view().label);
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! ```

pub mod cli;
pub mod controller;
pub mod state;
pub mod ticker;
pub mod view;

pub use cli::{CliError, ProcessCli, Subcommand, WarpCli, DEFAULT_PROGRAM};
pub use controller::StatusController;
pub use state::{
    classify_status_output, Action, ActionError, ActionFailure, ConnectionState, ErrorKind,
    CONNECTED_TOKEN,
};
pub use ticker::{Ticker, TickerConfig, POLL_INTERVAL};
pub use view::{ActionLabel, StatusView, Tone};

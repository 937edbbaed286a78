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

//! Periodic trigger for status polls.
//!
//! The ticker runs on its own thread with a small tokio runtime and posts
//! ticks into a bounded channel. The owner drains the channel from its own
//! thread and polls there, so the controller never leaves the UI thread.
//! Ticks that arrive while one is still pending are coalesced.

use std::io;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Interval between status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for a [`Ticker`].
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Time between ticks. The first tick fires one period after spawn.
    pub period: Duration,
    /// Thread name, shown in debuggers and panics.
    pub thread_name: String,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            period: POLL_INTERVAL,
            thread_name: "warp-ticker".to_string(),
        }
    }
}

/// Handle to a running ticker.
///
/// Dropping the handle stops the background thread.
pub struct Ticker {
    tick_rx: mpsc::Receiver<Instant>,
    cancel_token: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl Ticker {
    /// Start ticking. `on_tick` runs on the ticker thread after each tick is
    /// queued, typically to wake the UI so it drains the channel.
    pub fn spawn<F>(config: TickerConfig, on_tick: F) -> io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (tick_tx, tick_rx) = mpsc::channel(1);
        let cancel_token = CancellationToken::new();
        let task_cancel = cancel_token.clone();
        let period = config.period;

        let thread = std::thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to start ticker runtime: {}", e);
                        return;
                    }
                };
                rt.block_on(tick_loop(tick_tx, task_cancel, period, on_tick));
            })?;

        info!("Polling every {} seconds", period.as_secs_f32());

        Ok(Self {
            tick_rx,
            cancel_token,
            thread: Some(thread),
        })
    }

    /// Drain pending ticks. Returns true if at least one tick fired since the
    /// last call.
    pub fn ticked(&mut self) -> bool {
        let mut fired = false;
        loop {
            match self.tick_rx.try_recv() {
                Ok(_) => fired = true,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return fired,
            }
        }
    }

    /// Whether the background thread is still ticking.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.cancel_token.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn tick_loop<F>(
    tick_tx: mpsc::Sender<Instant>,
    cancel_token: CancellationToken,
    period: Duration,
    on_tick: F,
) where
    F: Fn(),
{
    let start = tokio::time::Instant::now() + period;
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match tick_tx.try_send(Instant::now()) {
                    Ok(()) => on_tick(),
                    Err(TrySendError::Full(_)) => {
                        debug!("Previous tick still pending, skipping");
                    }
                    Err(TrySendError::Closed(_)) => {
                        debug!("Tick receiver dropped");
                        return;
                    }
                }
            }

            () = cancel_token.cancelled() => {
                debug!("Ticker cancelled");
                return;
            }
        }
    }
}

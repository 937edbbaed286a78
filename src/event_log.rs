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

use chrono::{DateTime, Local};
use std::collections::VecDeque;

use warp_client::{ActionError, ConnectionState};

/// Upper bound on the up-front allocation, the limit itself comes from config
const INITIAL_CAPACITY: usize = 50;

/// Event log entry with timestamp
#[derive(Debug, Clone)]
pub struct Event {
    pub timestamp: DateTime<Local>,
    pub level: EventLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warning,
    Error,
}

/// Recent status transitions and action results shown under the widget
#[derive(Debug)]
pub struct EventLog {
    events: VecDeque<Event>,
    max_events: usize,
    last_state: ConnectionState,
    pub last_checked: Option<DateTime<Local>>,
}

impl EventLog {
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(INITIAL_CAPACITY)),
            max_events,
            last_state: ConnectionState::Unknown,
            last_checked: None,
        }
    }

    /// Record a poll result; only transitions produce an entry
    pub fn record_poll(&mut self, state: ConnectionState) {
        self.last_checked = Some(Local::now());

        if state == self.last_state {
            return;
        }
        self.last_state = state;

        let (level, message) = match state {
            ConnectionState::Unknown => return,
            ConnectionState::Connected => (EventLevel::Info, "Connected to WARP".to_string()),
            ConnectionState::Disconnected => (EventLevel::Warning, "Disconnected from WARP".to_string()),
            ConnectionState::Error(_) => (EventLevel::Error, format!("Status check failed: {state}")),
        };
        self.push(level, message);
    }

    /// Record the outcome of a connect or disconnect request
    pub fn record_action(&mut self, result: &Result<(), ActionError>) {
        if let Err(e) = result {
            self.push(EventLevel::Error, e.to_string());
        }
    }

    /// Record a toggle: `acted` is false when the state allowed no action.
    /// A successful action polled afterwards, so its state is logged too.
    pub fn record_toggle(&mut self, acted: bool, result: &Result<(), ActionError>, state: ConnectionState) {
        self.record_action(result);
        if acted && result.is_ok() {
            self.record_poll(state);
        }
    }

    pub fn push(&mut self, level: EventLevel, message: String) {
        if self.max_events == 0 {
            return;
        }

        self.events.push_back(Event {
            timestamp: Local::now(),
            level,
            message,
        });

        // Keep only the last N messages
        while self.events.len() > self.max_events {
            self.events.pop_front();
        }
    }

    /// Newest first
    pub fn iter_recent(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//! Countdown clock for a session.
//!
//! The clock does not own a timer; whoever drives the session calls
//! [`SessionClock::tick`] once per second while it is running. Expiry is
//! terminal: an expired clock never ticks or restarts again.

use serde::Serialize;

/// Default session budget: 60 minutes.
pub const DEFAULT_BUDGET_SECONDS: u32 = 3600;

/// Default low-time warning: 5 minutes remaining.
pub const DEFAULT_WARNING_THRESHOLD_SECONDS: u32 = 300;

/// Observable clock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockState {
    pub remaining_seconds: u32,
    pub budget_seconds: u32,
    pub warning_threshold: u32,
    pub expired: bool,
}

/// Notifications produced by a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the clock actually advanced.
    pub ticked: bool,
    pub remaining_seconds: u32,
    /// The low-time threshold was crossed on this tick.
    pub warning: bool,
    /// The budget ran out on this tick.
    pub expired: bool,
}

#[derive(Debug, Clone)]
pub struct SessionClock {
    budget_seconds: u32,
    warning_threshold: u32,
    remaining_seconds: u32,
    running: bool,
    warned: bool,
    expired: bool,
}

impl SessionClock {
    /// A stopped clock with the full budget. A zero budget is raised to 1s.
    pub fn new(budget_seconds: u32, warning_threshold: u32) -> Self {
        let budget_seconds = if budget_seconds == 0 {
            tracing::warn!("session budget of 0s clamped to 1s");
            1
        } else {
            budget_seconds
        };
        Self {
            budget_seconds,
            warning_threshold,
            remaining_seconds: budget_seconds,
            running: false,
            warned: false,
            expired: false,
        }
    }

    /// Begin counting down. No-op if already running or expired.
    pub fn start(&mut self) -> bool {
        if self.running || self.expired {
            return false;
        }
        self.running = true;
        true
    }

    /// Halt the countdown without expiring.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running || self.expired {
            return TickOutcome {
                remaining_seconds: self.remaining_seconds,
                ..TickOutcome::default()
            };
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        let mut outcome = TickOutcome {
            ticked: true,
            remaining_seconds: self.remaining_seconds,
            ..TickOutcome::default()
        };

        if !self.warned && self.remaining_seconds <= self.warning_threshold {
            self.warned = true;
            outcome.warning = true;
        }

        if self.remaining_seconds == 0 {
            self.expired = true;
            self.running = false;
            outcome.expired = true;
        }

        outcome
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn budget_seconds(&self) -> u32 {
        self.budget_seconds
    }

    /// Seconds consumed so far.
    pub fn elapsed_seconds(&self) -> u32 {
        self.budget_seconds - self.remaining_seconds
    }

    pub fn state(&self) -> ClockState {
        ClockState {
            remaining_seconds: self.remaining_seconds,
            budget_seconds: self.budget_seconds,
            warning_threshold: self.warning_threshold,
            expired: self.expired,
        }
    }
}

/// Format seconds as `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

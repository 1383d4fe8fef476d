use std::time::Duration;

use bevy::prelude::*;

use crate::config::DEFAULT_YEAR_PACE;
use crate::market_config::ConfigError;

/// Schedules year advances: single steps and paced multi-year runs.
///
/// Pacing only decides *when* a year is advanced. Results do not depend on
/// it, so a zero pace (one year per tick) replays the same trajectory.
#[derive(Resource, Debug, Clone)]
pub struct YearRunner {
    /// Years granted but not yet advanced.
    due: u32,
    /// Years of the active run not yet granted.
    remaining: u32,
    /// Years advanced so far in the active run.
    completed: u32,
    run_length: u32,
    finished: bool,
    pace: Timer,
}

impl Default for YearRunner {
    fn default() -> Self {
        Self::with_pace(DEFAULT_YEAR_PACE)
    }
}

impl YearRunner {
    pub fn with_pace(pace: Duration) -> Self {
        Self {
            due: 0,
            remaining: 0,
            completed: 0,
            run_length: 0,
            finished: false,
            pace: Timer::new(pace, TimerMode::Repeating),
        }
    }

    pub fn pace(&self) -> Duration {
        self.pace.duration()
    }

    pub fn set_pace(&mut self, pace: Duration) {
        self.pace = Timer::new(pace, TimerMode::Repeating);
    }

    /// True while a run still has years to grant or advance.
    pub fn is_running(&self) -> bool {
        self.remaining > 0 || (self.run_length > 0 && self.completed < self.run_length)
    }

    pub fn remaining(&self) -> u32 {
        self.run_length.saturating_sub(self.completed)
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Grant one year immediately.
    pub fn request_step(&mut self) -> Result<(), ConfigError> {
        if self.is_running() {
            return Err(ConfigError::RunInProgress);
        }
        self.due += 1;
        Ok(())
    }

    pub fn start_run(&mut self, years: u32) -> Result<(), ConfigError> {
        if self.is_running() {
            return Err(ConfigError::RunInProgress);
        }
        if years == 0 {
            return Err(ConfigError::InvalidYearsToRun(0));
        }
        self.remaining = years;
        self.run_length = years;
        self.completed = 0;
        self.finished = false;
        self.pace.reset();
        Ok(())
    }

    /// Drop everything not yet advanced. The last completed year stands.
    pub fn stop(&mut self) {
        self.due = 0;
        self.remaining = 0;
        self.completed = 0;
        self.run_length = 0;
        self.finished = false;
        self.pace.reset();
    }

    /// Grant run years for the time elapsed this tick.
    pub fn tick(&mut self, delta: Duration) {
        if self.remaining == 0 {
            return;
        }
        let granted = if self.pace.duration().is_zero() {
            1
        } else {
            self.pace.tick(delta);
            self.pace.times_finished_this_tick()
        };
        let granted = granted.min(self.remaining);
        self.remaining -= granted;
        self.due += granted;
    }

    /// Take one granted year, if any.
    pub fn take_due(&mut self) -> bool {
        if self.due == 0 {
            return false;
        }
        self.due -= 1;
        if self.run_length > 0 {
            self.completed += 1;
            if self.completed >= self.run_length {
                self.finished = true;
            }
        }
        true
    }

    /// Report (once) that the active run advanced its final year, and go idle.
    pub fn take_finished(&mut self) -> Option<u32> {
        if !self.finished {
            return None;
        }
        let years = self.run_length;
        self.stop();
        Some(years)
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Countdown clock counted in tenths of a second.
///
/// While running, `elapsed_tenths + remaining_tenths` is the time limit. Like the
/// rest of the game state it is updated by returning modified copies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub elapsed_tenths: u32,
    pub remaining_tenths: u32,
    pub running: bool,
}

impl TimerState {
    pub fn started(limit_tenths: u32) -> TimerState {
        TimerState {
            elapsed_tenths: 0,
            remaining_tenths: limit_tenths,
            running: true,
        }
    }

    pub fn limit_tenths(&self) -> u32 {
        self.elapsed_tenths + self.remaining_tenths
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_tenths == 0
    }

    /// One tenth of a second later. A stopped or expired timer does not move.
    pub fn ticked(&self) -> TimerState {
        let mut new_state = *self;
        if self.running && self.remaining_tenths > 0 {
            new_state.elapsed_tenths += 1;
            new_state.remaining_tenths -= 1;
        }
        new_state
    }

    pub fn stopped(&self) -> TimerState {
        let mut new_state = *self;
        new_state.running = false;
        new_state
    }

    pub fn elapsed_seconds(&self) -> f64 {
        f64::from(self.elapsed_tenths) / 10.0
    }

    pub fn remaining_seconds(&self) -> f64 {
        f64::from(self.remaining_tenths) / 10.0
    }

    pub fn elapsed_label(&self) -> String {
        format!("Time Elapsed: {:.1}s", self.elapsed_seconds())
    }

    pub fn remaining_label(&self) -> String {
        format!("Time Remaining: {:.1}s", self.remaining_seconds())
    }
}

pub fn tenths_from_duration(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis() / 100).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_keeps_total_constant() {
        let mut timer = TimerState::started(600);
        for _ in 0..250 {
            timer = timer.ticked();
            assert_eq!(timer.limit_tenths(), 600);
        }
        assert_eq!(timer.elapsed_tenths, 250);
        assert_eq!(timer.remaining_tenths, 350);
        assert_eq!(timer.elapsed_seconds(), 25.0);
    }

    #[test]
    fn test_stopped_timer_does_not_move() {
        let timer = TimerState::started(600).ticked().stopped();
        assert_eq!(timer.ticked(), timer);
    }

    #[test]
    fn test_expired_timer_saturates() {
        let timer = TimerState::started(1).ticked();
        assert!(timer.is_expired());
        assert_eq!(timer.ticked().remaining_tenths, 0);
        assert_eq!(timer.ticked().elapsed_tenths, 1);
    }

    #[test]
    fn test_labels() {
        let timer = TimerState::started(600).ticked().ticked().ticked();
        assert_eq!(timer.elapsed_label(), "Time Elapsed: 0.3s");
        assert_eq!(timer.remaining_label(), "Time Remaining: 59.7s");
    }

    #[test]
    fn test_tenths_from_duration() {
        assert_eq!(tenths_from_duration(Duration::from_secs(60)), 600);
        assert_eq!(tenths_from_duration(Duration::from_millis(150)), 1);
    }
}

//! Timed page turning on top of a [`Reader`]

use super::controller::{Reader, TurnOutcome};
use super::position::Direction;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const MIN_SPEED: u64 = 1;
pub const MAX_SPEED: u64 = 10;
pub const DEFAULT_SPEED: u64 = 5;

/// Clamp a speed in seconds into the supported range
pub fn clamp_speed(seconds: u64) -> u64 {
    seconds.clamp(MIN_SPEED, MAX_SPEED)
}

/// Turns a page forward every `speed` seconds while enabled
///
/// Disabling, changing the speed, or dropping the handle cancels the pending
/// turn. Playback stops by itself at the end of the text.
pub struct AutoPlay {
    reader: Arc<Reader>,
    speed: u64,
    task: Option<JoinHandle<()>>,
}

impl AutoPlay {
    pub fn new(reader: Arc<Reader>) -> Self {
        Self {
            reader,
            speed: DEFAULT_SPEED,
            task: None,
        }
    }

    pub fn with_speed(mut self, seconds: u64) -> Self {
        self.speed = clamp_speed(seconds);
        self
    }

    pub fn reader(&self) -> &Arc<Reader> {
        &self.reader
    }

    /// Seconds between turns
    pub fn speed(&self) -> u64 {
        self.speed
    }

    pub fn is_enabled(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Start or stop playback; a running timer is left as it is
    pub fn set_enabled(&mut self, enabled: bool) {
        match (enabled, self.is_enabled()) {
            (true, false) => self.schedule(),
            (false, _) => self.cancel(),
            (true, true) => {}
        }
    }

    /// Flip playback; returns the new state
    pub fn toggle(&mut self) -> bool {
        let enabled = !self.is_enabled();
        self.set_enabled(enabled);
        enabled
    }

    /// Change the interval, rescheduling if playing; returns the clamped speed
    pub fn set_speed(&mut self, seconds: u64) -> u64 {
        let speed = clamp_speed(seconds);
        if speed != self.speed {
            self.speed = speed;
            if self.is_enabled() {
                self.schedule();
            }
        }
        self.speed
    }

    fn schedule(&mut self) {
        self.cancel();

        let reader = Arc::clone(&self.reader);
        let period = Duration::from_secs(self.speed);
        tracing::debug!("Autoplay every {}s for {}", self.speed, reader.text_code());

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match reader.turn_page(Direction::Forward).await {
                    TurnOutcome::EndOfText => {
                        tracing::debug!("Autoplay reached the end of {}", reader.text_code());
                        break;
                    }
                    outcome => tracing::trace!("Autoplay turn: {:?}", outcome),
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for AutoPlay {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_speed() {
        assert_eq!(clamp_speed(0), 1);
        assert_eq!(clamp_speed(5), 5);
        assert_eq!(clamp_speed(60), 10);
    }
}

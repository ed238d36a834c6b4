//! Auto-advance countdown shown when a video ends

use std::time::Duration;

/// Seconds shown when the countdown starts
pub const COUNTDOWN_SECS: u32 = 5;

/// Interval between two countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What a countdown tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Seconds still remaining
    Remaining(u32),
    /// The countdown reached zero
    Elapsed,
}

/// Seconds left before auto-advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn start() -> Self {
        Self {
            remaining: COUNTDOWN_SECS,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance by one second
    pub fn tick(&mut self) -> Tick {
        self.remaining = self.remaining.saturating_sub(1);
        match self.remaining {
            0 => Tick::Elapsed,
            n => Tick::Remaining(n),
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_zero() {
        let mut countdown = Countdown::start();
        assert_eq!(countdown.remaining(), 5);

        let ticks: Vec<Tick> = (0..5).map(|_| countdown.tick()).collect();

        assert_eq!(
            ticks,
            vec![
                Tick::Remaining(4),
                Tick::Remaining(3),
                Tick::Remaining(2),
                Tick::Remaining(1),
                Tick::Elapsed
            ]
        );
        assert_eq!(countdown.tick(), Tick::Elapsed);
    }
}

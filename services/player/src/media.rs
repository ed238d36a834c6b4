//! Media element seam
//!
//! The controller only needs a handful of operations from whatever renders
//! the video. `SimulatedMedia` stands in for a real element in the headless
//! binary and in tests.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Operations the controller performs on the rendered video
pub trait MediaElement: Send + Sync {
    /// Playhead position in seconds
    fn current_time(&self) -> f64;

    /// Move the playhead
    fn seek(&self, seconds: f64);

    fn play(&self);

    fn pause(&self);

    fn is_paused(&self) -> bool;

    fn set_playback_rate(&self, rate: f64);
}

#[derive(Debug)]
struct SimulatedState {
    position: f64,
    duration: f64,
    rate: f64,
    paused: bool,
}

/// Clock-driven stand-in for a video element
#[derive(Debug)]
pub struct SimulatedMedia {
    state: Mutex<SimulatedState>,
}

impl SimulatedMedia {
    /// Create a paused element of the given length
    pub fn new(duration: Duration) -> Self {
        Self {
            state: Mutex::new(SimulatedState {
                position: 0.0,
                duration: duration.as_secs_f64(),
                rate: 1.0,
                paused: true,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Let `elapsed` wall-clock time pass; returns true when playback just
    /// reached the end
    pub fn advance(&self, elapsed: Duration) -> bool {
        let mut state = self.lock();
        if state.paused {
            return false;
        }

        state.position = (state.position + elapsed.as_secs_f64() * state.rate).min(state.duration);
        if state.position >= state.duration {
            state.paused = true;
            return true;
        }
        false
    }

    pub fn duration(&self) -> f64 {
        self.lock().duration
    }

    pub fn playback_rate(&self) -> f64 {
        self.lock().rate
    }
}

impl MediaElement for SimulatedMedia {
    fn current_time(&self) -> f64 {
        self.lock().position
    }

    fn seek(&self, seconds: f64) {
        let mut state = self.lock();
        state.position = seconds.clamp(0.0, state.duration);
    }

    fn play(&self) {
        self.lock().paused = false;
    }

    fn pause(&self) {
        self.lock().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.lock().paused
    }

    fn set_playback_rate(&self, rate: f64) {
        self.lock().rate = rate;
    }
}

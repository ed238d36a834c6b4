//! Playback speed selection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// Supported playback rates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    Half,
    ThreeQuarters,
    #[default]
    Normal,
    OneAndAQuarter,
    OneAndAHalf,
    OneAndThreeQuarters,
    Double,
}

impl PlaybackSpeed {
    /// Every speed in ascending order, as offered in the speed menu
    pub const ALL: [PlaybackSpeed; 7] = [
        PlaybackSpeed::Half,
        PlaybackSpeed::ThreeQuarters,
        PlaybackSpeed::Normal,
        PlaybackSpeed::OneAndAQuarter,
        PlaybackSpeed::OneAndAHalf,
        PlaybackSpeed::OneAndThreeQuarters,
        PlaybackSpeed::Double,
    ];

    /// Multiplier applied to the media element
    pub fn rate(&self) -> f64 {
        match self {
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::ThreeQuarters => 0.75,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::OneAndAQuarter => 1.25,
            PlaybackSpeed::OneAndAHalf => 1.5,
            PlaybackSpeed::OneAndThreeQuarters => 1.75,
            PlaybackSpeed::Double => 2.0,
        }
    }
}

impl TryFrom<f64> for PlaybackSpeed {
    type Error = PlayerError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        PlaybackSpeed::ALL
            .into_iter()
            .find(|speed| speed.rate() == rate)
            .ok_or(PlayerError::UnsupportedSpeed(rate))
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_round_trip() {
        for speed in PlaybackSpeed::ALL {
            assert_eq!(PlaybackSpeed::try_from(speed.rate()).unwrap(), speed);
        }
    }

    #[test]
    fn test_unsupported_rate() {
        assert!(matches!(
            PlaybackSpeed::try_from(3.0),
            Err(PlayerError::UnsupportedSpeed(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(PlaybackSpeed::Normal.to_string(), "1x");
        assert_eq!(PlaybackSpeed::OneAndAQuarter.to_string(), "1.25x");
        assert_eq!(PlaybackSpeed::default(), PlaybackSpeed::Normal);
    }
}

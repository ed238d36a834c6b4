//! Settings of the headless player

use std::time::Duration;

use common::{ClientConfig, ConfigError, error::ConfigResult};
use config::{Config, Environment};
use serde::Deserialize;

/// Default length of the simulated video
pub const DEFAULT_SIMULATED_DURATION_SECS: i64 = 600;

#[derive(Debug, Deserialize)]
struct PlaybackTarget {
    course_id: i64,
    video_id: i64,
    simulated_duration_secs: u64,
}

/// What to play and where to reach the backend
#[derive(Debug, Clone)]
pub struct PlayerSettings {
    pub client: ClientConfig,
    pub course_id: i64,
    pub video_id: i64,
    pub simulated_duration_secs: u64,
}

impl PlayerSettings {
    /// Load settings from environment variables
    ///
    /// # Environment Variables
    /// - `COURSE_ID`: Course to play (required)
    /// - `VIDEO_ID`: Video to play (required)
    /// - `SIMULATED_DURATION_SECS`: Length of the simulated video (default: 600)
    /// - plus every variable read by [`ClientConfig::from_env`]
    pub fn from_env() -> ConfigResult<Self> {
        let client = ClientConfig::from_env()?;

        let target: PlaybackTarget = Config::builder()
            .set_default("simulated_duration_secs", DEFAULT_SIMULATED_DURATION_SECS)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;

        if target.simulated_duration_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "simulated_duration_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            client,
            course_id: target.course_id,
            video_id: target.video_id,
            simulated_duration_secs: target.simulated_duration_secs,
        })
    }

    /// Length of the simulated video
    pub fn simulated_duration(&self) -> Duration {
        Duration::from_secs(self.simulated_duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: tests touching the environment run serially
        unsafe {
            std::env::remove_var("COURSE_ID");
            std::env::remove_var("VIDEO_ID");
            std::env::remove_var("SIMULATED_DURATION_SECS");
            std::env::remove_var("BACKEND_URL");
        }
    }

    #[test]
    #[serial]
    fn test_settings_from_env() {
        clear_env();
        // SAFETY: tests touching the environment run serially
        unsafe {
            std::env::set_var("COURSE_ID", "1");
            std::env::set_var("VIDEO_ID", "5");
        }

        let settings = PlayerSettings::from_env().expect("Failed to load player settings");
        assert_eq!(settings.course_id, 1);
        assert_eq!(settings.video_id, 5);
        assert_eq!(settings.simulated_duration(), Duration::from_secs(600));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_settings_require_video() {
        clear_env();
        // SAFETY: tests touching the environment run serially
        unsafe {
            std::env::set_var("COURSE_ID", "1");
        }

        assert!(matches!(
            PlayerSettings::from_env(),
            Err(ConfigError::Load(_))
        ));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_settings_reject_empty_video() {
        clear_env();
        // SAFETY: tests touching the environment run serially
        unsafe {
            std::env::set_var("COURSE_ID", "1");
            std::env::set_var("VIDEO_ID", "5");
            std::env::set_var("SIMULATED_DURATION_SECS", "0");
        }

        assert!(matches!(
            PlayerSettings::from_env(),
            Err(ConfigError::Invalid { key: "simulated_duration_secs", .. })
        ));

        clear_env();
    }
}

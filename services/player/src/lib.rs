//! Headless video player
//!
//! A [`VideoSession`] drives one video of a course: resume, periodic progress
//! saves, completion and the countdown to the next video. Rendering is left to
//! whatever implements [`MediaElement`].

pub mod backend;
pub mod controller;
pub mod countdown;
pub mod error;
pub mod media;
pub mod progress;
pub mod sequence;
pub mod settings;
pub mod speed;

pub use backend::VideoBackend;
pub use controller::{LoadFailure, Phase, SessionSnapshot, VideoSession};
pub use error::{PlayerError, PlayerResult};
pub use media::{MediaElement, SimulatedMedia};
pub use settings::PlayerSettings;
pub use speed::PlaybackSpeed;

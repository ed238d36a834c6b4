//! Video session controller
//!
//! Drives the playback of one video: loads the course to find the current
//! and next video, resumes from the stored position, saves the playhead on a
//! fixed cadence and, when the video ends, counts down to the next one.
//!
//! The periodic save and the countdown run as Tokio tasks owned by the
//! session. Both are aborted on cancel, on advance and when the session is
//! disposed or dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use api::{
    ApiError,
    models::{Video, VideoCompletion},
};
use common::{
    Navigator,
    navigation::{course_path, video_path},
};
use tokio::{
    sync::watch,
    task::{JoinHandle, JoinSet},
    time::{self, Instant},
};
use tracing::{debug, error, info, warn};

use crate::{
    backend::VideoBackend,
    countdown::{Countdown, TICK_INTERVAL, Tick},
    error::{PlayerError, PlayerResult},
    media::MediaElement,
    progress::{ProgressTracker, SaveTicket},
    sequence::VideoSequence,
    speed::PlaybackSpeed,
};

/// Wall-clock interval between two progress save attempts
pub const SAVE_INTERVAL: Duration = Duration::from_secs(5);

const VIDEO_NOT_FOUND_MESSAGE: &str = "找不到該影片";
const LOAD_FAILED_MESSAGE: &str = "無法載入影片資料";

/// Why loading failed, and where the user can go from there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub message: String,
    pub retry_path: String,
}

/// Lifecycle of a video session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Playing,
    Paused,
    /// The video ended and the next one starts when the countdown elapses
    Countdown,
    /// The video ended; nothing happens until the user acts
    Ended,
    /// Navigation to the next video was issued
    Advancing,
    Error(LoadFailure),
    /// Torn down; no further transition happens
    Disposed,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::Countdown => "counting down",
            Phase::Ended => "ended",
            Phase::Advancing => "advancing",
            Phase::Error(_) => "failed",
            Phase::Disposed => "disposed",
        }
    }
}

/// Observable state of a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub current: Option<Video>,
    pub next: Option<Video>,
    pub countdown_remaining: Option<u32>,
    pub watch_percentage: f64,
    pub completed: bool,
    pub speed: PlaybackSpeed,
}

struct SessionState {
    phase: Phase,
    sequence: Option<VideoSequence>,
    current: Option<Video>,
    next: Option<Video>,
    countdown: Option<Countdown>,
    progress: ProgressTracker,
    speed: PlaybackSpeed,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: Phase::Loading,
            sequence: None,
            current: None,
            next: None,
            countdown: None,
            progress: ProgressTracker::new(),
            speed: PlaybackSpeed::default(),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase.clone(),
            current: self.current.clone(),
            next: self.next.clone(),
            countdown_remaining: self.countdown.map(|c| c.remaining()),
            watch_percentage: self.progress.watch_percentage(),
            completed: self.progress.is_completed(),
            speed: self.speed,
        }
    }

    fn require(&self, action: &'static str, allowed: fn(&Phase) -> bool) -> PlayerResult<()> {
        if allowed(&self.phase) {
            Ok(())
        } else {
            Err(PlayerError::InvalidPhase {
                action,
                phase: self.phase.name(),
            })
        }
    }
}

#[derive(Default)]
struct Tasks {
    save: Option<JoinHandle<()>>,
    countdown: Option<JoinHandle<()>>,
}

enum CountdownStep {
    Continue,
    Stop,
    Advance(i64),
}

struct Inner {
    course_id: i64,
    video_id: i64,
    backend: Arc<dyn VideoBackend>,
    media: Arc<dyn MediaElement>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<SessionState>,
    tasks: Mutex<Tasks>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the state and publish the result to subscribers
    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.lock_state();
        let result = f(&mut state);
        self.snapshots.send_replace(state.snapshot());
        result
    }

    fn fail(&self, message: impl Into<String>) {
        let failure = LoadFailure {
            message: message.into(),
            retry_path: course_path(self.course_id),
        };
        self.update(|s| {
            if s.phase == Phase::Loading {
                s.phase = Phase::Error(failure);
            }
        });
    }

    fn dispose(&self) {
        self.update(|s| {
            s.countdown = None;
            s.phase = Phase::Disposed;
        });
        self.stop_tasks();
    }

    fn stop_tasks(&self) {
        let mut tasks = self.lock_tasks();
        if let Some(task) = tasks.save.take() {
            task.abort();
        }
        if let Some(task) = tasks.countdown.take() {
            task.abort();
        }
    }

    async fn run_save_loop(self: Arc<Self>) {
        let mut ticks = time::interval_at(Instant::now() + SAVE_INTERVAL, SAVE_INTERVAL);
        // Dropped with this task, which aborts any save still in flight
        let mut saves = JoinSet::new();

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    let position = self.media.current_time().floor() as i32;
                    let ticket = self.lock_state().progress.begin_save(position);
                    if let Some(ticket) = ticket {
                        saves.spawn(self.clone().save(ticket));
                    }
                }
                Some(_) = saves.join_next() => {}
            }
        }
    }

    async fn save(self: Arc<Self>, ticket: SaveTicket) {
        debug!(
            "Saving progress #{} for video {}: {}s",
            ticket.sequence, self.video_id, ticket.position
        );

        match self.backend.save_progress(self.video_id, ticket.position).await {
            Ok(progress) => {
                let applied = self.update(|s| s.progress.apply(ticket, &progress));
                if !applied {
                    debug!("Ignoring superseded progress response #{}", ticket.sequence);
                }
            }
            Err(e) if e.is_unauthorized() => {
                debug!("Progress not saved for anonymous viewer");
            }
            Err(e) => error!("Failed to save progress: {}", e),
        }
    }

    async fn run_countdown(self: Arc<Self>) {
        let mut ticks = time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);

        loop {
            ticks.tick().await;

            let step = self.update(|s| {
                let Some(countdown) = s.countdown.as_mut() else {
                    return CountdownStep::Stop;
                };
                if s.phase != Phase::Countdown {
                    return CountdownStep::Stop;
                }

                match countdown.tick() {
                    Tick::Remaining(_) => CountdownStep::Continue,
                    Tick::Elapsed => match s.next.as_ref() {
                        Some(next) => {
                            s.phase = Phase::Advancing;
                            CountdownStep::Advance(next.video_id)
                        }
                        None => {
                            s.phase = Phase::Ended;
                            CountdownStep::Stop
                        }
                    },
                }
            });

            match step {
                CountdownStep::Continue => continue,
                CountdownStep::Stop => break,
                CountdownStep::Advance(next_id) => {
                    {
                        let mut tasks = self.lock_tasks();
                        // This task is finishing on its own
                        tasks.countdown.take();
                        if let Some(task) = tasks.save.take() {
                            task.abort();
                        }
                    }

                    let path = video_path(self.course_id, next_id);
                    info!("Advancing to {}", path);
                    self.navigator.navigate(&path);
                    break;
                }
            }
        }
    }
}

/// Controller for the playback of one video
///
/// Timer-driven operations spawn Tokio tasks and must be called from within
/// a runtime.
pub struct VideoSession {
    inner: Arc<Inner>,
}

impl VideoSession {
    /// Create a session for `video_id` of `course_id`, in the loading phase
    pub fn new(
        backend: Arc<dyn VideoBackend>,
        media: Arc<dyn MediaElement>,
        navigator: Arc<dyn Navigator>,
        course_id: i64,
        video_id: i64,
    ) -> Self {
        let state = SessionState::new();
        let (snapshots, _) = watch::channel(state.snapshot());

        Self {
            inner: Arc::new(Inner {
                course_id,
                video_id,
                backend,
                media,
                navigator,
                state: Mutex::new(state),
                tasks: Mutex::new(Tasks::default()),
                snapshots,
            }),
        }
    }

    /// Current state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Register for state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Fetch the course and locate the current and next video
    ///
    /// On failure the session enters [`Phase::Error`], except when the
    /// session expired: the pipeline has already sent the viewer to the
    /// login view, so the session stays in [`Phase::Loading`].
    pub async fn load(&self) -> PlayerResult<()> {
        let inner = &self.inner;
        inner
            .lock_state()
            .require("load", |p| matches!(p, Phase::Loading))?;

        info!("Loading video {} of course {}", inner.video_id, inner.course_id);

        let course = match inner.backend.course(inner.course_id).await {
            Ok(course) => course,
            Err(e @ ApiError::SessionExpired(_)) => {
                warn!("Session expired while loading course {}", inner.course_id);
                return Err(e.into());
            }
            Err(e) => {
                error!("Failed to fetch course: {}", e);
                if e.is_not_found() {
                    inner.fail(e.to_string());
                } else {
                    inner.fail(LOAD_FAILED_MESSAGE);
                }
                return Err(e.into());
            }
        };

        let sequence = VideoSequence::from_course(&course);
        let Some((current, next)) = sequence
            .locate(inner.video_id)
            .map(|(current, next)| (current.clone(), next.cloned()))
        else {
            warn!(
                "Video {} not found in course {}",
                inner.video_id, inner.course_id
            );
            inner.fail(VIDEO_NOT_FOUND_MESSAGE);
            return Err(PlayerError::VideoNotFound {
                course_id: inner.course_id,
                video_id: inner.video_id,
            });
        };

        inner.update(|s| {
            s.require("load", |p| matches!(p, Phase::Loading))?;
            if current.completed {
                s.progress.mark_completed();
            }
            s.current = Some(current);
            s.next = next;
            s.sequence = Some(sequence);
            s.phase = Phase::Ready;
            Ok(())
        })
    }

    /// Resume from the stored position, start playback and the periodic save
    pub async fn start(&self) -> PlayerResult<()> {
        let inner = &self.inner;
        inner
            .lock_state()
            .require("start", |p| matches!(p, Phase::Ready))?;

        let resume = match inner.backend.progress(inner.video_id).await {
            Ok(progress) => Some(progress),
            Err(e) if e.is_unauthorized() => {
                debug!("No stored progress for anonymous viewer");
                None
            }
            Err(e) => {
                error!("Failed to load progress: {}", e);
                None
            }
        };

        // Disposal may have happened while progress was being fetched
        inner.update(|s| {
            s.require("start", |p| matches!(p, Phase::Ready))?;
            let position = resume.and_then(|progress| s.progress.resume_from(&progress));
            if let Some(position) = position {
                info!("Resuming video {} at {}s", inner.video_id, position);
                inner.media.seek(f64::from(position));
            }

            inner.media.play();
            s.phase = Phase::Playing;
            Ok::<_, PlayerError>(())
        })?;

        let task = tokio::spawn(inner.clone().run_save_loop());
        if let Some(previous) = inner.lock_tasks().save.replace(task) {
            previous.abort();
        }
        Ok(())
    }

    /// Pause playback
    pub fn pause(&self) -> PlayerResult<()> {
        self.inner.update(|s| {
            s.require("pause", |p| matches!(p, Phase::Playing))?;
            self.inner.media.pause();
            s.phase = Phase::Paused;
            Ok(())
        })
    }

    /// Resume paused playback
    pub fn play(&self) -> PlayerResult<()> {
        self.inner.update(|s| {
            s.require("play", |p| matches!(p, Phase::Paused))?;
            self.inner.media.play();
            s.phase = Phase::Playing;
            Ok(())
        })
    }

    /// Switch between playing and paused
    pub fn toggle_play(&self) -> PlayerResult<()> {
        if self.inner.media.is_paused() {
            self.play()
        } else {
            self.pause()
        }
    }

    /// Move the playhead; the save cadence is unaffected
    pub fn seek(&self, seconds: f64) {
        self.inner.media.seek(seconds);
    }

    /// Change the playback rate; the save cadence is unaffected
    pub fn set_speed(&self, speed: PlaybackSpeed) {
        self.inner.media.set_playback_rate(speed.rate());
        self.inner.update(|s| s.speed = speed);
    }

    /// Handle the media element's end-of-stream signal
    ///
    /// Starts the countdown when a next video exists and the viewer may
    /// watch it; otherwise the session just ends.
    pub fn on_ended(&self) {
        let inner = &self.inner;
        let countdown = inner.update(|s| {
            if !matches!(s.phase, Phase::Playing | Phase::Paused) {
                return false;
            }

            let entitled = match (&s.sequence, &s.next) {
                (Some(sequence), Some(next)) => sequence.is_entitled(next),
                _ => false,
            };

            if entitled {
                s.phase = Phase::Countdown;
                s.countdown = Some(Countdown::start());
            } else {
                s.phase = Phase::Ended;
            }
            entitled
        });

        if countdown {
            info!("Video {} ended, starting countdown", inner.video_id);
            let task = tokio::spawn(inner.clone().run_countdown());
            if let Some(previous) = inner.lock_tasks().countdown.replace(task) {
                previous.abort();
            }
        } else {
            info!("Video {} ended", inner.video_id);
        }
    }

    /// Stop the countdown; returns false if none was running
    pub fn cancel_countdown(&self) -> bool {
        let cancelled = self.inner.update(|s| {
            if s.phase != Phase::Countdown {
                return false;
            }
            s.countdown = None;
            s.phase = Phase::Ended;
            true
        });

        if cancelled {
            if let Some(task) = self.inner.lock_tasks().countdown.take() {
                task.abort();
            }
            info!("Countdown cancelled");
        }
        cancelled
    }

    /// Go to the next video right away; returns the path navigated to
    pub fn advance(&self) -> Option<String> {
        let inner = &self.inner;
        let next_id = inner.update(|s| {
            if matches!(
                s.phase,
                Phase::Loading | Phase::Advancing | Phase::Error(_) | Phase::Disposed
            ) {
                return None;
            }
            let next_id = s.next.as_ref()?.video_id;
            s.countdown = None;
            s.phase = Phase::Advancing;
            Some(next_id)
        })?;

        inner.stop_tasks();

        let path = video_path(inner.course_id, next_id);
        info!("Advancing to {}", path);
        inner.navigator.navigate(&path);
        Some(path)
    }

    /// Mark the current video complete and collect its reward
    pub async fn complete(&self) -> PlayerResult<VideoCompletion> {
        let completion = self.inner.backend.complete(self.inner.video_id).await?;
        self.inner.update(|s| s.progress.mark_completed());
        Ok(completion)
    }

    /// Stop every timer owned by the session
    ///
    /// The session enters [`Phase::Disposed`] and ignores later media
    /// signals and navigation requests.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl Drop for VideoSession {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

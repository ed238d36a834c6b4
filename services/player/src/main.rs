use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use api::ApiState;
use auth::{AuthPipeline, SessionStore};
use common::{FileStorage, MemoryStorage, Navigator, Storage, navigation::video_path};
use player::{Phase, PlayerSettings, SimulatedMedia, VideoSession};
use tokio::time::{self, Instant};
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

/// How often the simulated media element is moved forward
const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Navigator that only records and logs where the player would go
struct ConsoleNavigator {
    current: Mutex<String>,
}

impl Navigator for ConsoleNavigator {
    fn current_path(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, path: &str) {
        info!("Navigating to {}", path);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();

    let settings = PlayerSettings::from_env()?;
    info!(
        "Starting player for video {} of course {} against {}",
        settings.video_id, settings.course_id, settings.client.backend_url
    );

    let storage: Arc<dyn Storage> = match &settings.client.storage_path {
        Some(path) => Arc::new(FileStorage::open(path)?),
        None => Arc::new(MemoryStorage::new()),
    };

    let navigator = Arc::new(ConsoleNavigator {
        current: Mutex::new(video_path(settings.course_id, settings.video_id)),
    });

    let pipeline = AuthPipeline::new(
        &settings.client,
        SessionStore::new(storage.clone()),
        navigator.clone(),
    )?;
    let api = ApiState::new(pipeline, storage);

    let media = Arc::new(SimulatedMedia::new(settings.simulated_duration()));
    let session = VideoSession::new(
        Arc::new(api),
        media.clone(),
        navigator,
        settings.course_id,
        settings.video_id,
    );

    if let Err(e) = session.load().await {
        if let Phase::Error(failure) = session.snapshot().phase {
            error!("{} (back to {})", failure.message, failure.retry_path);
        }
        return Err(e.into());
    }

    if let Some(video) = session.snapshot().current {
        info!("Playing \"{}\" ({:.0}s)", video.title, media.duration());
    }
    session.start().await?;

    let mut clock = time::interval_at(Instant::now() + CLOCK_TICK, CLOCK_TICK);
    let mut updates = session.subscribe();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = clock.tick() => {
                if media.advance(CLOCK_TICK) {
                    session.on_ended();
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }

                let snapshot = updates.borrow_and_update().clone();
                match snapshot.phase {
                    Phase::Countdown => {
                        if let Some(remaining) = snapshot.countdown_remaining {
                            info!("Next video in {}s", remaining);
                        }
                    }
                    Phase::Ended => {
                        info!("Playback finished");
                        break;
                    }
                    Phase::Advancing => break,
                    _ => debug!(
                        "Watched {:.1}% (completed: {})",
                        snapshot.watch_percentage, snapshot.completed
                    ),
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down player");
                break;
            }
        }
    }

    session.dispose();
    Ok(())
}

// Playback session - one engine, one playlist, and what happens when an item fails

use super::engine::{EngineEvent, PlaybackEngine};
use super::playlist::Playlist;
use crate::media::VideoRecord;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Playing,
    Paused,
    Erroring,
}

/// What handling one engine event did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    StateChanged(SessionState),
    TrackChanged { index: usize },
    /// The failed item was skipped and playback resumed at `next`
    Skipped { failed: usize, next: usize },
    /// The failed item was the last one; playback stays stopped on it
    Halted { index: usize },
    Unchanged,
}

/// One engine instance, its playlist and the error-skip policy.
///
/// Engine events arrive on a single channel and are handled one at a time by whoever
/// owns the session, so no two handlers ever race.
pub struct PlaybackSession {
    engine: Box<dyn PlaybackEngine>,
    playlist: Playlist,
    state: SessionState,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    released: bool,
}

impl PlaybackSession {
    pub fn new(mut engine: Box<dyn PlaybackEngine>) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        engine.set_event_sender(Some(sender));

        Self {
            engine,
            playlist: Playlist::default(),
            state: SessionState::Idle,
            events,
            released: false,
        }
    }

    /// Loads every record in order, positions at `start_index` (clamped) and starts playing
    pub fn set_playlist(&mut self, records: Vec<VideoRecord>, start_index: usize) {
        if self.released {
            warn!("Ignoring playlist for a released session");
            return;
        }

        self.playlist = Playlist::new(records, start_index);
        let locations = self.playlist.locations();
        self.engine.set_items(&locations, self.playlist.index());

        if self.playlist.is_empty() {
            self.state = SessionState::Idle;
            return;
        }

        self.engine.prepare();
        self.engine.play();
        self.state = SessionState::Playing;
        info!(
            "Session playlist set: {} items, starting at {}",
            self.playlist.len(),
            self.playlist.index()
        );
    }

    pub fn toggle_play_pause(&mut self) -> SessionState {
        if self.released || self.playlist.is_empty() {
            return self.state;
        }

        if self.engine.is_playing() {
            self.engine.pause();
            self.state = SessionState::Paused;
        } else {
            // after a halt the engine needs a fresh load before it can play again
            if self.state == SessionState::Erroring {
                self.engine.prepare();
            }
            self.engine.play();
            self.state = SessionState::Playing;
        }
        self.state
    }

    /// Signed jump from the current position; never lands before the start of the item
    pub fn seek_relative(&mut self, delta_ms: i64) {
        if self.released || self.playlist.is_empty() {
            return;
        }
        let position = i64::try_from(self.engine.current_position()).unwrap_or(i64::MAX);
        let target = position.saturating_add(delta_ms).max(0) as u64;
        debug!("Seeking {:+} ms to {} ms", delta_ms, target);
        self.engine.seek_to(target);
    }

    /// No-op at the last item
    pub fn next_track(&mut self) -> Option<usize> {
        if self.released {
            return None;
        }
        let index = self.playlist.advance()?;
        self.jump_to(index);
        Some(index)
    }

    /// No-op at the first item
    pub fn previous_track(&mut self) -> Option<usize> {
        if self.released {
            return None;
        }
        let index = self.playlist.retreat()?;
        self.jump_to(index);
        Some(index)
    }

    pub fn handle_event(&mut self, event: EngineEvent) -> SessionUpdate {
        if self.released {
            return SessionUpdate::Unchanged;
        }

        match event {
            EngineEvent::Error { message } => self.skip_failed_item(&message),
            EngineEvent::TrackChanged { index } => {
                let index = self.playlist.select(index);
                SessionUpdate::TrackChanged { index }
            }
            EngineEvent::PlayingChanged { playing } => {
                let next = match (self.state, playing) {
                    // a stopped engine after an error stays in the error state
                    (SessionState::Erroring, false) => SessionState::Erroring,
                    (_, true) => SessionState::Playing,
                    (_, false) => SessionState::Paused,
                };
                if next == self.state {
                    return SessionUpdate::Unchanged;
                }
                self.state = next;
                SessionUpdate::StateChanged(next)
            }
        }
    }

    /// Waits for the next engine event; `None` once the session is released
    pub async fn next_event(&mut self) -> Option<EngineEvent> {
        self.events.recv().await
    }

    /// Non-blocking variant for draining already delivered events
    pub fn try_next_event(&mut self) -> Option<EngineEvent> {
        self.events.try_recv().ok()
    }

    /// Detaches the event channel and frees the engine. Safe to call repeatedly.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.engine.set_event_sender(None);
        self.engine.release();
        self.events.close();
        self.released = true;
        self.state = SessionState::Idle;
        debug!("Playback session released");
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current(&self) -> Option<&VideoRecord> {
        self.playlist.current()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn skip_failed_item(&mut self, message: &str) -> SessionUpdate {
        let failed = self.playlist.index();
        self.state = SessionState::Erroring;
        warn!("Playback error on item {}: {}", failed, message);

        match self.playlist.advance() {
            Some(next) => {
                self.engine.seek_to_item(next);
                self.engine.prepare();
                self.engine.play();
                self.state = SessionState::Playing;
                info!("Skipped failed item {} -> {}", failed, next);
                SessionUpdate::Skipped { failed, next }
            }
            None => {
                info!("Failed item {} is the last one, halting", failed);
                SessionUpdate::Halted { index: failed }
            }
        }
    }

    fn jump_to(&mut self, index: usize) {
        self.engine.seek_to_item(index);
        if self.state == SessionState::Erroring {
            self.engine.prepare();
            self.engine.play();
            self.state = SessionState::Playing;
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.release();
    }
}

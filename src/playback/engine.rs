// Contract for the platform's playback engine
// Decode and render live behind this; the session only drives transport and listens

use crate::storage::Location;
use tokio::sync::mpsc;

/// Notifications from the engine, delivered in the order they happened
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The current item failed to load or decode
    Error { message: String },
    /// The engine moved to another item on its own (end of item, playlist advance)
    TrackChanged { index: usize },
    PlayingChanged { playing: bool },
}

pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;

/// Opaque playback engine. Calls return immediately; effects show up later as events.
pub trait PlaybackEngine {
    /// Replaces the whole item list and positions at `start_index`
    fn set_items(&mut self, items: &[Location], start_index: usize);
    /// Starts (or restarts after an error) loading of the current item
    fn prepare(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;

    /// Engine-side view of its own list. The session never reads these back; its
    /// playlist cursor moves only on `TrackChanged` and its own transport calls.
    fn current_index(&self) -> usize;
    fn item_count(&self) -> usize;
    fn has_next(&self) -> bool;
    fn has_previous(&self) -> bool;

    /// Jumps to the start of item `index`
    fn seek_to_item(&mut self, index: usize);
    fn seek_to(&mut self, position_ms: u64);
    fn current_position(&self) -> u64;

    /// Installs (or with `None`, detaches) the single ordered event channel
    fn set_event_sender(&mut self, sender: Option<EngineEventSender>);
    /// Frees decoder and surface resources; the engine is unusable afterwards
    fn release(&mut self);
}

/// Builds a fresh engine for every session
pub type EngineFactory = Box<dyn FnMut() -> Box<dyn PlaybackEngine>>;

// Playback - engine contract, playlist cursor and the error-skip session

pub mod engine;
pub mod playlist;
pub mod session;

pub use engine::{EngineEvent, EngineEventSender, EngineFactory, PlaybackEngine};
pub use playlist::Playlist;
pub use session::{PlaybackSession, SessionState, SessionUpdate};

// ReelPipe Library - folder-scan video playback core
// Platform services (documents, engine, audio) sit behind traits so the core runs anywhere

pub mod config;   // settings and preferences
pub mod error;    // typed errors for the library surface
pub mod logging;  // tracing subscriber setup
pub mod media;    // video records, folder scanning, container probing
pub mod playback; // engine contract, playlist, error-skip session
pub mod route;    // bit-perfect USB audio negotiation
pub mod storage;  // location handles, folder listing, grants
pub mod ui;       // gestures, overlay, session controller

// Export the stuff other modules actually use
pub use config::Config;
pub use media::{FolderScanner, VideoRecord};
pub use playback::{PlaybackEngine, PlaybackSession, SessionState};
pub use route::{AudioRouteNegotiator, AudioSubsystem};
pub use storage::{find_covering_grant, Location, PermissionGrant};
pub use ui::{ControllerCommand, GestureRouter, SessionController, SessionView};

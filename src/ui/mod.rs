// Session UI - gestures in, overlay and notices out
// The actual widgets live on the platform side behind `SessionView`

mod app;        // session controller and its event loop
pub mod events; // gesture routing and controller commands

pub use app::{Platform, SessionController, SessionId};
pub use events::{ControllerCommand, ControllerHandle, Gesture, GestureRouter, Point, TransportCommand};

use serde::Serialize;

/// What the player overlay shows for the current item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub title: String,
    /// 1-based
    pub position: usize,
    pub total: usize,
    pub playing: bool,
    pub bit_perfect: bool,
}

/// One-off messages for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoVideosFound,
    /// A file was opened that no folder grant covers
    FolderAccessRequired,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::NoVideosFound => "No MP4 videos found in this folder",
            Notice::FolderAccessRequired => "Grant access to the folder holding this video to play its neighbours",
        }
    }
}

/// Presentation surface attached to the controller. May come and go while playback continues.
pub trait SessionView: Send {
    fn render_overlay(&mut self, overlay: &Overlay);
    fn show_notice(&mut self, notice: Notice);
    fn show_status(&mut self, status: &str);
}

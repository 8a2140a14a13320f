// Touch gestures and controller commands
// Everything the surface reports is turned into a transport command here, nowhere else

use super::SessionView;
use crate::config::GestureConfig;
use crate::storage::Location;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Already-classified touch input from the video surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// A single tap that turned out not to be the first half of a double tap
    SingleTapConfirmed,
    DoubleTap { at: Point },
    Fling {
        start: Point,
        end: Point,
        velocity_x: f32,
        velocity_y: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    TogglePlayPause,
    SeekRelative(i64),
    NextTrack,
    PreviousTrack,
}

/// Maps gestures to transport commands.
///
/// The double-tap split needs the surface width, so the owner keeps it current
/// through `set_surface_width`.
#[derive(Debug, Clone)]
pub struct GestureRouter {
    surface_width: f32,
    config: GestureConfig,
}

impl GestureRouter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            surface_width: 0.0,
            config,
        }
    }

    pub fn set_surface_width(&mut self, width: f32) {
        self.surface_width = width.max(0.0);
    }

    pub fn surface_width(&self) -> f32 {
        self.surface_width
    }

    pub fn route(&self, gesture: &Gesture) -> Option<TransportCommand> {
        match *gesture {
            Gesture::SingleTapConfirmed => Some(TransportCommand::TogglePlayPause),
            Gesture::DoubleTap { at } => {
                // the exact midpoint counts as the left half
                if at.x > self.surface_width / 2.0 {
                    Some(TransportCommand::SeekRelative(self.config.seek_forward_ms))
                } else {
                    Some(TransportCommand::SeekRelative(-self.config.seek_backward_ms))
                }
            }
            Gesture::Fling {
                start,
                end,
                velocity_x,
                ..
            } => self.route_fling(start, end, velocity_x),
        }
    }

    fn route_fling(&self, start: Point, end: Point, velocity_x: f32) -> Option<TransportCommand> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;

        if dx.abs() <= dy.abs() {
            return None;
        }
        if dx.abs() <= self.config.fling_distance_threshold
            || velocity_x.abs() <= self.config.fling_velocity_threshold
        {
            return None;
        }

        // dragging the picture right brings back the previous item
        if dx > 0.0 {
            Some(TransportCommand::PreviousTrack)
        } else {
            Some(TransportCommand::NextTrack)
        }
    }
}

impl Default for GestureRouter {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

/// Everything the controller reacts to besides engine events and scan results
pub enum ControllerCommand {
    /// The user picked a folder and granted read access to it
    FolderGranted(Location),
    /// The app was opened on a single file
    FileSelected(Location),
    Gesture(Gesture),
    Transport(TransportCommand),
    SurfaceResized { width: f32 },
    AttachView(Box<dyn SessionView>),
    DetachView,
    ShowStatus,
    Shutdown,
}

impl std::fmt::Debug for ControllerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerCommand::FolderGranted(location) => f.debug_tuple("FolderGranted").field(location).finish(),
            ControllerCommand::FileSelected(location) => f.debug_tuple("FileSelected").field(location).finish(),
            ControllerCommand::Gesture(gesture) => f.debug_tuple("Gesture").field(gesture).finish(),
            ControllerCommand::Transport(command) => f.debug_tuple("Transport").field(command).finish(),
            ControllerCommand::SurfaceResized { width } => {
                f.debug_struct("SurfaceResized").field("width", width).finish()
            }
            ControllerCommand::AttachView(_) => f.write_str("AttachView"),
            ControllerCommand::DetachView => f.write_str("DetachView"),
            ControllerCommand::ShowStatus => f.write_str("ShowStatus"),
            ControllerCommand::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Cloneable way into a running controller
#[derive(Clone)]
pub struct ControllerHandle {
    sender: mpsc::UnboundedSender<ControllerCommand>,
}

impl ControllerHandle {
    pub(crate) fn new(sender: mpsc::UnboundedSender<ControllerCommand>) -> Self {
        Self { sender }
    }

    /// False once the controller is gone
    pub fn send(&self, command: ControllerCommand) -> bool {
        self.sender.send(command).is_ok()
    }

    pub fn folder_granted(&self, folder: Location) -> bool {
        self.send(ControllerCommand::FolderGranted(folder))
    }

    pub fn file_selected(&self, file: Location) -> bool {
        self.send(ControllerCommand::FileSelected(file))
    }

    pub fn gesture(&self, gesture: Gesture) -> bool {
        self.send(ControllerCommand::Gesture(gesture))
    }

    pub fn shutdown(&self) -> bool {
        self.send(ControllerCommand::Shutdown)
    }
}

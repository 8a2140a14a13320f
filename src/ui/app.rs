use super::events::{ControllerCommand, ControllerHandle, Gesture, GestureRouter, TransportCommand};
use super::{Notice, Overlay, SessionView};
use crate::config::Config;
use crate::media::{ContainerProbe, FolderScanner, VideoRecord};
use crate::playback::{EngineEvent, EngineFactory, PlaybackSession, SessionState, SessionUpdate};
use crate::route::{AudioRouteNegotiator, AudioSubsystem};
use crate::storage::{find_covering_grant, DocumentTree, Location, PermissionStore};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Services the host platform provides to the controller
pub struct Platform {
    pub documents: Arc<dyn DocumentTree>,
    pub permissions: Arc<dyn PermissionStore>,
    pub audio: Arc<dyn AudioSubsystem>,
    pub probe: Arc<dyn ContainerProbe>,
    pub engines: EngineFactory,
}

/// Identity of one scan request and the session it turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct ScanOutcome {
    id: SessionId,
    start_at: Option<Location>,
    records: Vec<VideoRecord>,
}

enum Step {
    Command(ControllerCommand),
    Scan(ScanOutcome),
    Engine(EngineEvent),
}

/// Owns the active session and sequences everything around it.
///
/// All state changes happen on whichever task drives `run`/`step`; the folder scan is
/// the only work pushed elsewhere, and its result comes back through a channel.
pub struct SessionController {
    config: Config,
    scanner: FolderScanner,
    permissions: Arc<dyn PermissionStore>,
    audio: Arc<dyn AudioSubsystem>,
    probe: Arc<dyn ContainerProbe>,
    engines: EngineFactory,
    router: GestureRouter,

    session: Option<PlaybackSession>,
    negotiator: Option<AudioRouteNegotiator>,
    session_id: Option<SessionId>,
    negotiated_index: Option<usize>,
    pending_scan: Option<SessionId>,

    view: Option<Box<dyn SessionView>>,
    last_overlay: Option<Overlay>,
    destroyed: bool,

    commands: mpsc::UnboundedReceiver<ControllerCommand>,
    command_sender: mpsc::UnboundedSender<ControllerCommand>,
    scan_results: mpsc::UnboundedReceiver<ScanOutcome>,
    scan_sender: mpsc::UnboundedSender<ScanOutcome>,
}

impl SessionController {
    pub fn new(config: Config, platform: Platform) -> Self {
        let (command_sender, commands) = mpsc::unbounded_channel();
        let (scan_sender, scan_results) = mpsc::unbounded_channel();

        let scanner = FolderScanner::new(platform.documents).with_extensions(&config.library.extensions);
        let router = GestureRouter::new(config.gestures);

        Self {
            config,
            scanner,
            permissions: platform.permissions,
            audio: platform.audio,
            probe: platform.probe,
            engines: platform.engines,
            router,
            session: None,
            negotiator: None,
            session_id: None,
            negotiated_index: None,
            pending_scan: None,
            view: None,
            last_overlay: None,
            destroyed: false,
            commands,
            command_sender,
            scan_results,
            scan_sender,
        }
    }

    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle::new(self.command_sender.clone())
    }

    /// Runs until shutdown or `destroy`
    pub async fn run(&mut self) {
        info!("Session controller running");
        while self.step().await {}
        info!("Session controller stopped");
    }

    /// Waits for and processes exactly one command, scan result or engine event.
    /// Returns false once the controller is finished.
    pub async fn step(&mut self) -> bool {
        if self.destroyed {
            return false;
        }

        let next = tokio::select! {
            command = self.commands.recv() => match command {
                Some(command) => Step::Command(command),
                None => return false,
            },
            Some(outcome) = self.scan_results.recv() => Step::Scan(outcome),
            Some(event) = next_engine_event(&mut self.session) => Step::Engine(event),
        };

        match next {
            Step::Command(command) => self.handle_command(command),
            Step::Scan(outcome) => {
                self.apply_scan(outcome);
                true
            }
            Step::Engine(event) => {
                self.handle_engine_event(event);
                true
            }
        }
    }

    /// Returns false for `Shutdown`.
    ///
    /// Folder and file commands start a scan. Inside a tokio runtime it runs on the
    /// blocking pool; without one it runs on the calling thread before this returns.
    /// Either way the result is only applied by a later `step`.
    pub fn handle_command(&mut self, command: ControllerCommand) -> bool {
        if self.destroyed {
            return false;
        }
        debug!("Controller command: {:?}", command);

        match command {
            ControllerCommand::FolderGranted(folder) => self.folder_granted(folder),
            ControllerCommand::FileSelected(file) => self.file_selected(file),
            ControllerCommand::Gesture(gesture) => self.handle_gesture(&gesture),
            ControllerCommand::Transport(command) => self.apply_transport(command),
            ControllerCommand::SurfaceResized { width } => self.router.set_surface_width(width),
            ControllerCommand::AttachView(view) => self.attach_view(view),
            ControllerCommand::DetachView => {
                self.detach_view();
            }
            ControllerCommand::ShowStatus => self.show_status(),
            ControllerCommand::Shutdown => {
                self.destroy();
                return false;
            }
        }
        true
    }

    pub fn folder_granted(&mut self, folder: Location) {
        info!("Folder granted: {}", folder);
        self.request_scan(folder, None);
    }

    /// Plays the folder around `file` when a grant covers it, else asks for folder access
    pub fn file_selected(&mut self, file: Location) {
        let grants = self.permissions.list_grants();
        let Some(grant) = find_covering_grant(&grants, &file) else {
            info!("No folder grant covers {}, asking for folder access", file);
            self.notify(Notice::FolderAccessRequired);
            return;
        };

        let tree = grant.tree_location.clone();
        let folder = if tree.tree_id() == file.document_id() {
            tree
        } else {
            file.parent_in_tree(&tree).unwrap_or(tree)
        };
        debug!("Selected {} lives in {}", file, folder);
        self.request_scan(folder, Some(file));
    }

    pub fn handle_gesture(&mut self, gesture: &Gesture) {
        match self.router.route(gesture) {
            Some(command) => self.apply_transport(command),
            None => debug!("Gesture ignored: {:?}", gesture),
        }
    }

    pub fn apply_transport(&mut self, command: TransportCommand) {
        let Some(session) = self.session.as_mut() else {
            debug!("No active session for {:?}", command);
            return;
        };

        let moved_to = match command {
            TransportCommand::TogglePlayPause => {
                session.toggle_play_pause();
                None
            }
            TransportCommand::SeekRelative(delta_ms) => {
                session.seek_relative(delta_ms);
                None
            }
            TransportCommand::NextTrack => session.next_track(),
            TransportCommand::PreviousTrack => session.previous_track(),
        };

        if let Some(index) = moved_to {
            self.renegotiate(index);
        }
        self.render_overlay();
    }

    /// Shows the latest overlay straight away; session state is untouched
    pub fn attach_view(&mut self, mut view: Box<dyn SessionView>) {
        if let Some(overlay) = &self.last_overlay {
            view.render_overlay(overlay);
        }
        self.view = Some(view);
    }

    pub fn detach_view(&mut self) -> Option<Box<dyn SessionView>> {
        self.view.take()
    }

    /// Tears down session and audio route. Any scan still in flight is dropped on arrival.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.pending_scan = None;
        self.teardown_session();
        self.view = None;
        self.destroyed = true;
        info!("Session controller destroyed");
    }

    pub fn show_status(&mut self) {
        let status = match (&self.session, &self.negotiator) {
            (Some(session), Some(negotiator)) => match session.current() {
                Some(record) => negotiator.describe_current_route(&record.location),
                None => "Nothing playing".to_string(),
            },
            _ => "Nothing playing".to_string(),
        };
        if let Some(view) = self.view.as_mut() {
            view.show_status(&status);
        }
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn pending_scan(&self) -> Option<SessionId> {
        self.pending_scan
    }

    pub fn negotiator(&self) -> Option<&AudioRouteNegotiator> {
        self.negotiator.as_ref()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.last_overlay.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn request_scan(&mut self, folder: Location, start_at: Option<Location>) {
        let id = SessionId::new();
        // a newer request supersedes whatever is still in flight
        self.pending_scan = Some(id);

        if tokio::runtime::Handle::try_current().is_err() {
            // no runtime to hand the scan to, so list inline and let the next step apply it
            debug!("No tokio runtime, scanning {} inline", folder);
            let records = self.scanner.scan(&folder);
            let _ = self.scan_sender.send(ScanOutcome {
                id,
                start_at,
                records,
            });
            return;
        }

        let scan = self.scanner.spawn_scan(folder);
        let sender = self.scan_sender.clone();
        tokio::spawn(async move {
            let records = scan.await.unwrap_or_else(|e| {
                warn!("Folder scan task failed: {}", e);
                Vec::new()
            });
            let _ = sender.send(ScanOutcome {
                id,
                start_at,
                records,
            });
        });
    }

    fn apply_scan(&mut self, outcome: ScanOutcome) {
        if self.pending_scan != Some(outcome.id) {
            debug!("Discarding stale scan {}", outcome.id);
            return;
        }
        self.pending_scan = None;

        if outcome.records.is_empty() {
            info!("Scan {} found no videos", outcome.id);
            self.notify(Notice::NoVideosFound);
            return;
        }

        let start_index = outcome
            .start_at
            .as_ref()
            .and_then(|target| position_in(&outcome.records, target))
            .unwrap_or(0);

        self.start_session(outcome.id, outcome.records, start_index);
    }

    fn start_session(&mut self, id: SessionId, records: Vec<VideoRecord>, start_index: usize) {
        // the previous route and engine must be fully released first
        self.teardown_session();

        let mut session = PlaybackSession::new((self.engines)());
        session.set_playlist(records, start_index);

        let negotiator = AudioRouteNegotiator::new(self.audio.clone(), self.probe.clone())
            .with_enabled(self.config.audio.bit_perfect);

        let index = session.playlist().index();
        self.session = Some(session);
        self.negotiator = Some(negotiator);
        self.session_id = Some(id);
        info!("Session {} started at item {}", id, index);

        self.renegotiate(index);
        self.render_overlay();
    }

    fn teardown_session(&mut self) {
        if let Some(mut negotiator) = self.negotiator.take() {
            negotiator.release();
        }
        if let Some(mut session) = self.session.take() {
            session.release();
        }
        if let Some(id) = self.session_id.take() {
            debug!("Session {} torn down", id);
        }
        self.negotiated_index = None;
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.handle_event(event) {
            SessionUpdate::TrackChanged { index } | SessionUpdate::Skipped { next: index, .. } => {
                if self.negotiated_index != Some(index) {
                    self.renegotiate(index);
                }
                self.render_overlay();
            }
            SessionUpdate::StateChanged(_) | SessionUpdate::Halted { .. } => self.render_overlay(),
            SessionUpdate::Unchanged => {}
        }
    }

    fn renegotiate(&mut self, index: usize) {
        let (Some(session), Some(negotiator)) = (self.session.as_ref(), self.negotiator.as_mut()) else {
            return;
        };
        let Some(record) = session.playlist().records().get(index) else {
            return;
        };
        negotiator.configure(&record.location);
        self.negotiated_index = Some(index);
    }

    fn current_overlay(&self) -> Option<Overlay> {
        let session = self.session.as_ref()?;
        let record = session.current()?;
        let playlist = session.playlist();

        Some(Overlay {
            title: record.display_title().to_string(),
            position: playlist.index() + 1,
            total: playlist.len(),
            playing: session.state() == SessionState::Playing,
            bit_perfect: self
                .negotiator
                .as_ref()
                .map(|negotiator| negotiator.is_bit_perfect())
                .unwrap_or(false),
        })
    }

    fn render_overlay(&mut self) {
        let Some(overlay) = self.current_overlay() else {
            return;
        };
        if let Some(view) = self.view.as_mut() {
            view.render_overlay(&overlay);
        }
        self.last_overlay = Some(overlay);
    }

    fn notify(&mut self, notice: Notice) {
        match self.view.as_mut() {
            Some(view) => view.show_notice(notice),
            None => debug!("No view attached, dropping notice {:?}", notice),
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.teardown_session();
    }
}

async fn next_engine_event(session: &mut Option<PlaybackSession>) -> Option<EngineEvent> {
    match session {
        Some(session) => session.next_event().await,
        None => std::future::pending().await,
    }
}

/// Scanned handles and selected handles may come from different grants, so match on ids
fn position_in(records: &[VideoRecord], target: &Location) -> Option<usize> {
    let target_id = target.document_id()?;
    records.iter().position(|record| {
        record.location.authority() == target.authority()
            && record.location.document_id().as_ref() == Some(&target_id)
    })
}

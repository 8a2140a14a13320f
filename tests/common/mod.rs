// Shared fakes for the integration tests
// Each fake keeps its state behind Arc<Mutex<..>> so a test can inspect it after handing it over

#![allow(dead_code)]

use reelpipe::error::{PlatformError, ProbeError, TreeError};
use reelpipe::media::{ContainerProbe, SourceFormat, VideoRecord};
use reelpipe::playback::{EngineEvent, EngineEventSender, EngineFactory, PlaybackEngine};
use reelpipe::route::{
    AudioDevice, AudioSubsystem, AudioUsage, DeviceKind, MixerBehavior, MixerFormat, MixerMode,
    SampleEncoding,
};
use reelpipe::storage::{DocumentEntry, DocumentTree, EntryKind, Location};
use reelpipe::ui::{Notice, Overlay, SessionView};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn file_location(path: &str) -> Location {
    Location::from_path(path).unwrap()
}

pub fn record(path: &str) -> VideoRecord {
    let location = file_location(path);
    let name = location.display_name().unwrap();
    VideoRecord::new(location, name, 1024, 1_700_000_000_000)
}

pub fn records(folder: &str, names: &[&str]) -> Vec<VideoRecord> {
    names
        .iter()
        .map(|name| record(&format!("{}/{}", folder, name)))
        .collect()
}

// ---------- document tree ----------

#[derive(Default)]
pub struct MemoryTree {
    folders: Mutex<HashMap<String, Vec<DocumentEntry>>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `folder` (an absolute path) with plain files named `names`
    pub fn with_files(self, folder: &str, names: &[&str]) -> Self {
        let entries = names
            .iter()
            .map(|name| entry(&format!("{}/{}", folder, name), EntryKind::File))
            .collect();
        self.folders
            .lock()
            .unwrap()
            .insert(file_location(folder).to_string(), entries);
        self
    }

    pub fn with_entries(self, folder: &Location, entries: Vec<DocumentEntry>) -> Self {
        self.folders.lock().unwrap().insert(folder.to_string(), entries);
        self
    }
}

pub fn entry(path: &str, kind: EntryKind) -> DocumentEntry {
    let location = file_location(path);
    DocumentEntry {
        name: location.display_name().unwrap(),
        location,
        kind,
        size_bytes: 2048,
        last_modified_ms: 1_700_000_000_000,
    }
}

impl DocumentTree for MemoryTree {
    fn list_children(&self, folder: &Location) -> Result<Vec<DocumentEntry>, TreeError> {
        self.folders
            .lock()
            .unwrap()
            .get(folder.as_str())
            .cloned()
            .ok_or_else(|| TreeError::Unresolvable(folder.to_string()))
    }
}

// ---------- playback engine ----------

#[derive(Debug, Default)]
pub struct EngineState {
    pub items: Vec<Location>,
    pub index: usize,
    pub playing: bool,
    pub position_ms: u64,
    pub prepare_calls: usize,
    pub released: bool,
    pub calls: Vec<String>,
    pub sender: Option<EngineEventSender>,
}

/// Test-side view of a `FakeEngine` living inside a session
#[derive(Clone, Default)]
pub struct EngineHandle(pub Arc<Mutex<EngineState>>);

impl EngineHandle {
    pub fn state(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.0.lock().unwrap()
    }

    /// Delivers an event the way the engine would; false when nobody listens any more
    pub fn emit(&self, event: EngineEvent) -> bool {
        match &self.state().sender {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    pub fn fail_current(&self) -> bool {
        self.emit(EngineEvent::Error {
            message: "decoder init failed".to_string(),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }
}

/// Records every call; only emits events when the test tells it to
pub struct FakeEngine {
    handle: EngineHandle,
}

impl FakeEngine {
    pub fn new() -> (Self, EngineHandle) {
        let handle = EngineHandle::default();
        (Self { handle: handle.clone() }, handle)
    }

    fn log(&self, call: impl Into<String>) {
        self.handle.state().calls.push(call.into());
    }
}

impl PlaybackEngine for FakeEngine {
    fn set_items(&mut self, items: &[Location], start_index: usize) {
        let mut state = self.handle.state();
        state.items = items.to_vec();
        state.index = start_index;
        state.calls.push(format!("set_items({}, {})", items.len(), start_index));
    }

    fn prepare(&mut self) {
        let mut state = self.handle.state();
        state.prepare_calls += 1;
        state.calls.push("prepare".to_string());
    }

    fn play(&mut self) {
        self.handle.state().playing = true;
        self.log("play");
    }

    fn pause(&mut self) {
        self.handle.state().playing = false;
        self.log("pause");
    }

    fn is_playing(&self) -> bool {
        self.handle.state().playing
    }

    fn current_index(&self) -> usize {
        self.handle.state().index
    }

    fn item_count(&self) -> usize {
        self.handle.state().items.len()
    }

    fn has_next(&self) -> bool {
        let state = self.handle.state();
        state.index + 1 < state.items.len()
    }

    fn has_previous(&self) -> bool {
        self.handle.state().index > 0
    }

    fn seek_to_item(&mut self, index: usize) {
        let mut state = self.handle.state();
        state.index = index;
        state.position_ms = 0;
        state.calls.push(format!("seek_to_item({})", index));
    }

    fn seek_to(&mut self, position_ms: u64) {
        let mut state = self.handle.state();
        state.position_ms = position_ms;
        state.calls.push(format!("seek_to({})", position_ms));
    }

    fn current_position(&self) -> u64 {
        self.handle.state().position_ms
    }

    fn set_event_sender(&mut self, sender: Option<EngineEventSender>) {
        self.handle.state().sender = sender;
    }

    fn release(&mut self) {
        let mut state = self.handle.state();
        state.released = true;
        state.playing = false;
        state.calls.push("release".to_string());
    }
}

/// Factory handing out fake engines; every created handle is kept in order
pub fn engine_factory() -> (EngineFactory, Arc<Mutex<Vec<EngineHandle>>>) {
    let created = Arc::new(Mutex::new(Vec::new()));
    let sink = created.clone();
    let factory: EngineFactory = Box::new(move || {
        let (engine, handle) = FakeEngine::new();
        sink.lock().unwrap().push(handle);
        Box::new(engine) as Box<dyn PlaybackEngine>
    });
    (factory, created)
}

// ---------- audio subsystem ----------

pub fn usb_dac() -> AudioDevice {
    AudioDevice {
        id: 7,
        product_name: "USB DAC".to_string(),
        kind: DeviceKind::UsbDevice,
    }
}

pub fn speaker() -> AudioDevice {
    AudioDevice {
        id: 1,
        product_name: String::new(),
        kind: DeviceKind::BuiltinSpeaker,
    }
}

pub fn mixer_mode(sample_rate: u32, channel_count: u16, behavior: MixerBehavior) -> MixerMode {
    MixerMode {
        format: MixerFormat {
            sample_rate,
            channel_count,
            encoding: SampleEncoding::Pcm24Packed,
        },
        behavior,
    }
}

#[derive(Debug, Default)]
pub struct AudioState {
    pub devices: Vec<AudioDevice>,
    pub modes: HashMap<u32, Vec<MixerMode>>,
    pub preferred: HashMap<u32, MixerMode>,
    pub reject_set: bool,
    pub calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeAudio(pub Arc<Mutex<AudioState>>);

impl FakeAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speaker plus a USB DAC offering the given modes
    pub fn with_usb_modes(modes: Vec<MixerMode>) -> Self {
        let audio = Self::default();
        {
            let mut state = audio.state();
            state.devices = vec![speaker(), usb_dac()];
            state.modes.insert(usb_dac().id, modes);
        }
        audio
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, AudioState> {
        self.0.lock().unwrap()
    }

    pub fn preferred_for(&self, device: &AudioDevice) -> Option<MixerMode> {
        self.state().preferred.get(&device.id).copied()
    }
}

impl AudioSubsystem for FakeAudio {
    fn list_output_devices(&self) -> Result<Vec<AudioDevice>, PlatformError> {
        Ok(self.state().devices.clone())
    }

    fn supported_mixer_modes(&self, device: &AudioDevice) -> Result<Vec<MixerMode>, PlatformError> {
        Ok(self.state().modes.get(&device.id).cloned().unwrap_or_default())
    }

    fn set_preferred_mixer(
        &self,
        _usage: AudioUsage,
        device: &AudioDevice,
        mode: &MixerMode,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.calls.push(format!("set({})", device.id));
        if state.reject_set {
            return Err(PlatformError::Rejected("mixer busy".to_string()));
        }
        state.preferred.insert(device.id, *mode);
        Ok(())
    }

    fn clear_preferred_mixer(&self, _usage: AudioUsage, device: &AudioDevice) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.calls.push(format!("clear({})", device.id));
        state.preferred.remove(&device.id);
        Ok(())
    }

    fn preferred_mixer(
        &self,
        _usage: AudioUsage,
        device: &AudioDevice,
    ) -> Result<Option<MixerMode>, PlatformError> {
        Ok(self.state().preferred.get(&device.id).copied())
    }
}

// ---------- container probe ----------

/// Same answer for every location unless overridden per location
#[derive(Default)]
pub struct FixedProbe {
    pub default: Option<SourceFormat>,
    pub per_location: HashMap<String, Option<SourceFormat>>,
    pub fail: bool,
}

impl FixedProbe {
    pub fn new(sample_rate: u32, channel_count: u16) -> Self {
        Self {
            default: Some(SourceFormat {
                sample_rate,
                channel_count,
            }),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, location: &Location, format: Option<SourceFormat>) -> Self {
        self.per_location.insert(location.to_string(), format);
        self
    }
}

impl ContainerProbe for FixedProbe {
    fn probe_audio_format(&self, location: &Location) -> Result<Option<SourceFormat>, ProbeError> {
        if self.fail {
            return Err(ProbeError::Unreadable(location.to_string()));
        }
        Ok(self
            .per_location
            .get(location.as_str())
            .copied()
            .unwrap_or(self.default))
    }
}

// ---------- view ----------

#[derive(Debug, Default)]
pub struct ViewLog {
    pub overlays: Vec<Overlay>,
    pub notices: Vec<Notice>,
    pub statuses: Vec<String>,
}

#[derive(Clone, Default)]
pub struct RecordingView(pub Arc<Mutex<ViewLog>>);

impl RecordingView {
    pub fn log(&self) -> std::sync::MutexGuard<'_, ViewLog> {
        self.0.lock().unwrap()
    }

    pub fn last_overlay(&self) -> Option<Overlay> {
        self.log().overlays.last().cloned()
    }
}

impl SessionView for RecordingView {
    fn render_overlay(&mut self, overlay: &Overlay) {
        self.log().overlays.push(overlay.clone());
    }

    fn show_notice(&mut self, notice: Notice) {
        self.log().notices.push(notice);
    }

    fn show_status(&mut self, status: &str) {
        self.log().statuses.push(status.to_string());
    }
}

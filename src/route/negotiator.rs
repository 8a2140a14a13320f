// Bit-perfect USB output negotiation
// Best effort all the way down: any failure just leaves standard mixing in place

use super::device::{AudioDevice, AudioSubsystem, AudioUsage, MixerMode};
use crate::media::{ContainerProbe, SourceFormat};
use crate::storage::Location;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The override currently applied to the system mixer
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRoute {
    pub device: AudioDevice,
    pub mode: MixerMode,
    pub source: SourceFormat,
    /// false when no bit-perfect mode matched the source and the first one was taken
    pub exact_match: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Negotiation {
    Activated(AudioRoute),
    Inactive(InactiveReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InactiveReason {
    Disabled,
    NoUsbDevice,
    NoBitPerfectMode,
    NoAudioStream,
    ProbeFailed(String),
    Platform(String),
}

/// Picks the bit-perfect mode matching `source` exactly, else the first bit-perfect mode.
///
/// The fallback can mean resampled output for this source; callers surface that through
/// `exact_match` rather than hiding it.
pub fn select_mixer_mode(modes: &[MixerMode], source: SourceFormat) -> Option<(MixerMode, bool)> {
    let mut bit_perfect = modes.iter().filter(|mode| mode.is_bit_perfect());
    let first = *bit_perfect.clone().next()?;

    let exact = bit_perfect.find(|mode| {
        mode.format.sample_rate == source.sample_rate && mode.format.channel_count == source.channel_count
    });

    match exact {
        Some(mode) => Some((*mode, true)),
        None => Some((first, false)),
    }
}

pub struct AudioRouteNegotiator {
    audio: Arc<dyn AudioSubsystem>,
    probe: Arc<dyn ContainerProbe>,
    enabled: bool,
    active: Option<AudioRoute>,
}

impl AudioRouteNegotiator {
    pub fn new(audio: Arc<dyn AudioSubsystem>, probe: Arc<dyn ContainerProbe>) -> Self {
        Self {
            audio,
            probe,
            enabled: true,
            active: None,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Routes `track` bit-perfect to the first USB output when the device allows it.
    /// Never fails; an inactive outcome means standard mixing.
    pub fn configure(&mut self, track: &Location) -> Negotiation {
        // only one preferred-mixer override may exist at a time
        self.release();

        if !self.enabled {
            return Negotiation::Inactive(InactiveReason::Disabled);
        }

        match self.negotiate(track) {
            Ok(route) => {
                info!(
                    "Bit-perfect output on {} at {}",
                    route.device.display_name(),
                    route.mode
                );
                self.active = Some(route.clone());
                Negotiation::Activated(route)
            }
            Err(reason) => {
                debug!("Bit-perfect output not active for {}: {:?}", track, reason);
                Negotiation::Inactive(reason)
            }
        }
    }

    /// Clears the override for exactly the device/usage pair that was configured
    pub fn release(&mut self) {
        let Some(route) = self.active.take() else {
            return;
        };
        match self.audio.clear_preferred_mixer(AudioUsage::Media, &route.device) {
            Ok(()) => debug!("Restored default mixing on {}", route.device.display_name()),
            Err(e) => warn!(
                "Failed to restore default mixing on {}: {}",
                route.device.display_name(),
                e
            ),
        }
    }

    pub fn active_route(&self) -> Option<&AudioRoute> {
        self.active.as_ref()
    }

    pub fn is_bit_perfect(&self) -> bool {
        self.active.is_some()
    }

    /// Multi-line, read-only status of the output path for `track`
    pub fn describe_current_route(&self, track: &Location) -> String {
        let mut lines = Vec::new();
        let devices = self.audio.list_output_devices().unwrap_or_else(|e| {
            warn!("Could not list output devices: {}", e);
            Vec::new()
        });

        let output = self
            .active
            .as_ref()
            .map(|route| &route.device)
            .or_else(|| devices.iter().find(|device| device.kind.is_usb()));
        match output {
            Some(device) => lines.push(format!(
                "Output: {} ({})",
                device.display_name(),
                device.kind.label()
            )),
            None => lines.push("Output: system default".to_string()),
        }

        match &self.active {
            Some(route) => {
                lines.push(format!("Mode: bit-perfect ({})", route.mode));
                if !route.exact_match {
                    lines.push(format!(
                        "Note: no bit-perfect mode matches {}, output may be resampled",
                        route.source
                    ));
                }
            }
            None => lines.push("Mode: standard mixing".to_string()),
        }

        match self.probe.probe_audio_format(track) {
            Ok(Some(format)) => lines.push(format!("Source: {}", format)),
            Ok(None) => lines.push("Source: no audio stream".to_string()),
            Err(e) => lines.push(format!("Source: unavailable ({})", e)),
        }

        let mut preferences = Vec::new();
        for device in &devices {
            let has_modes = self
                .audio
                .supported_mixer_modes(device)
                .map(|modes| !modes.is_empty())
                .unwrap_or(false);
            if !has_modes {
                continue;
            }
            let preferred = match self.audio.preferred_mixer(AudioUsage::Media, device) {
                Ok(Some(mode)) => mode.to_string(),
                Ok(None) => "default".to_string(),
                Err(e) => format!("unknown ({})", e),
            };
            preferences.push(format!("  {}: {}", device.display_name(), preferred));
        }
        if !preferences.is_empty() {
            lines.push("Preferred mixers:".to_string());
            lines.extend(preferences);
        }

        lines.join("\n")
    }

    fn negotiate(&self, track: &Location) -> Result<AudioRoute, InactiveReason> {
        let platform = |e: crate::error::PlatformError| InactiveReason::Platform(e.to_string());

        let device = self
            .audio
            .list_output_devices()
            .map_err(platform)?
            .into_iter()
            .find(|device| device.kind.is_usb())
            .ok_or(InactiveReason::NoUsbDevice)?;

        let modes = self.audio.supported_mixer_modes(&device).map_err(platform)?;
        if !modes.iter().any(|mode| mode.is_bit_perfect()) {
            return Err(InactiveReason::NoBitPerfectMode);
        }

        let source = self
            .probe
            .probe_audio_format(track)
            .map_err(|e| InactiveReason::ProbeFailed(e.to_string()))?
            .ok_or(InactiveReason::NoAudioStream)?;

        let (mode, exact_match) =
            select_mixer_mode(&modes, source).ok_or(InactiveReason::NoBitPerfectMode)?;
        if !exact_match {
            warn!(
                "No bit-perfect mode on {} matches {}, falling back to {}",
                device.display_name(),
                source,
                mode
            );
        }

        self.audio
            .set_preferred_mixer(AudioUsage::Media, &device, &mode)
            .map_err(platform)?;

        Ok(AudioRoute {
            device,
            mode,
            source,
            exact_match,
        })
    }
}

impl Drop for AudioRouteNegotiator {
    fn drop(&mut self) {
        self.release();
    }
}

// Audio output devices and mixer configurations as the platform reports them

use crate::error::PlatformError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    BuiltinSpeaker,
    WiredHeadphones,
    Bluetooth,
    Hdmi,
    UsbDevice,
    UsbHeadset,
    Other,
}

impl DeviceKind {
    pub fn is_usb(&self) -> bool {
        matches!(self, DeviceKind::UsbDevice | DeviceKind::UsbHeadset)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::BuiltinSpeaker => "built-in speaker",
            DeviceKind::WiredHeadphones => "wired headphones",
            DeviceKind::Bluetooth => "Bluetooth",
            DeviceKind::Hdmi => "HDMI",
            DeviceKind::UsbDevice => "USB device",
            DeviceKind::UsbHeadset => "USB headset",
            DeviceKind::Other => "other output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    pub id: u32,
    pub product_name: String,
    pub kind: DeviceKind,
}

impl AudioDevice {
    /// Product name, or the device class when the platform gives none
    pub fn display_name(&self) -> &str {
        if self.product_name.trim().is_empty() {
            self.kind.label()
        } else {
            &self.product_name
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleEncoding {
    Pcm16,
    Pcm24Packed,
    Pcm32,
    PcmFloat,
    Other,
}

impl SampleEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            SampleEncoding::Pcm16 => "16-bit PCM",
            SampleEncoding::Pcm24Packed => "24-bit PCM",
            SampleEncoding::Pcm32 => "32-bit PCM",
            SampleEncoding::PcmFloat => "float PCM",
            SampleEncoding::Other => "other encoding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerFormat {
    pub sample_rate: u32,
    pub channel_count: u16,
    pub encoding: SampleEncoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixerBehavior {
    Default,
    /// Samples reach the device without resampling or mixing
    BitPerfect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerMode {
    pub format: MixerFormat,
    pub behavior: MixerBehavior,
}

impl MixerMode {
    pub fn is_bit_perfect(&self) -> bool {
        self.behavior == MixerBehavior::BitPerfect
    }
}

impl fmt::Display for MixerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz / {} ch / {}",
            self.format.sample_rate,
            self.format.channel_count,
            self.format.encoding.label()
        )?;
        if self.is_bit_perfect() {
            write!(f, " (bit-perfect)")?;
        }
        Ok(())
    }
}

/// Audio attribute the preferred-mixer override is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioUsage {
    Media,
}

/// The platform's audio routing and mixer API
pub trait AudioSubsystem: Send + Sync {
    fn list_output_devices(&self) -> Result<Vec<AudioDevice>, PlatformError>;
    fn supported_mixer_modes(&self, device: &AudioDevice) -> Result<Vec<MixerMode>, PlatformError>;
    fn set_preferred_mixer(
        &self,
        usage: AudioUsage,
        device: &AudioDevice,
        mode: &MixerMode,
    ) -> Result<(), PlatformError>;
    fn clear_preferred_mixer(&self, usage: AudioUsage, device: &AudioDevice) -> Result<(), PlatformError>;
    fn preferred_mixer(
        &self,
        usage: AudioUsage,
        device: &AudioDevice,
    ) -> Result<Option<MixerMode>, PlatformError>;
}

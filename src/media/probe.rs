// Container probing - sample rate and channel count of the first audio stream
// The route negotiator matches mixer modes against this

use crate::error::ProbeError;
use crate::storage::Location;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFormat {
    pub sample_rate: u32,
    pub channel_count: u16,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz, {} ch", self.sample_rate, self.channel_count)
    }
}

/// `Ok(None)` means the container has no audio stream
pub trait ContainerProbe: Send + Sync {
    fn probe_audio_format(&self, location: &Location) -> Result<Option<SourceFormat>, ProbeError>;
}

/// Reads the audio sample entry (mp4a/esds) of MP4 containers
#[derive(Debug, Clone, Default)]
pub struct Mp4TagProbe;

impl ContainerProbe for Mp4TagProbe {
    fn probe_audio_format(&self, location: &Location) -> Result<Option<SourceFormat>, ProbeError> {
        let path = readable_path(location)?;
        let tag = mp4ameta::Tag::read_from_path(&path)
            .map_err(|e| ProbeError::Container(e.to_string()))?;

        let format = match (tag.sample_rate(), tag.channel_config()) {
            (Some(rate), Some(channels)) => Some(SourceFormat {
                sample_rate: rate.hz(),
                channel_count: channels.channel_count() as u16,
            }),
            _ => None,
        };
        Ok(format)
    }
}

/// Probes any container symphonia can demux; first track carrying a sample rate wins
#[cfg(feature = "probe")]
#[derive(Debug, Clone, Default)]
pub struct SymphoniaProbe;

#[cfg(feature = "probe")]
impl ContainerProbe for SymphoniaProbe {
    fn probe_audio_format(&self, location: &Location) -> Result<Option<SourceFormat>, ProbeError> {
        use symphonia::core::formats::FormatOptions;
        use symphonia::core::io::MediaSourceStream;
        use symphonia::core::meta::MetadataOptions;
        use symphonia::core::probe::Hint;
        use std::fs::File;

        let path = readable_path(location)?;
        let file = File::open(&path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| ProbeError::Container(e.to_string()))?;

        let format = probed
            .format
            .tracks()
            .iter()
            .find(|track| track.codec_params.sample_rate.is_some())
            .and_then(|track| {
                let sample_rate = track.codec_params.sample_rate?;
                let channels = track.codec_params.channels?;
                Some(SourceFormat {
                    sample_rate,
                    channel_count: channels.count() as u16,
                })
            });
        Ok(format)
    }
}

/// Symphonia when the `probe` feature is on, mp4 tags otherwise
pub fn default_probe() -> Arc<dyn ContainerProbe> {
    #[cfg(feature = "probe")]
    {
        Arc::new(SymphoniaProbe)
    }
    #[cfg(not(feature = "probe"))]
    {
        Arc::new(Mp4TagProbe)
    }
}

fn readable_path(location: &Location) -> Result<PathBuf, ProbeError> {
    location
        .to_file_path()
        .filter(|path| path.is_file())
        .ok_or_else(|| ProbeError::Unreadable(location.to_string()))
}

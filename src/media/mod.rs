// Video library side - what counts as a video, how a folder becomes a playlist

pub mod collation;
pub mod probe;
pub mod record;
pub mod scanner;

pub use probe::{default_probe, ContainerProbe, Mp4TagProbe, SourceFormat};
pub use record::VideoRecord;
pub use scanner::FolderScanner;

#[cfg(feature = "probe")]
pub use probe::SymphoniaProbe;

/// Extensions a folder scan keeps unless config says otherwise
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp4", "m4v"];

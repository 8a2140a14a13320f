use crate::storage::{DocumentEntry, Location};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One playable file from a folder scan. Never mutated after the scan builds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub location: Location,
    pub display_name: String,
    pub size_bytes: u64,
    pub last_modified: i64, // epoch millis
}

impl VideoRecord {
    pub fn new(location: Location, display_name: impl Into<String>, size_bytes: u64, last_modified: i64) -> Self {
        Self {
            location,
            display_name: display_name.into(),
            size_bytes,
            last_modified,
        }
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.last_modified).single()
    }

    /// Name without the container extension, for the overlay
    pub fn display_title(&self) -> &str {
        match self.display_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.display_name,
        }
    }
}

impl From<DocumentEntry> for VideoRecord {
    fn from(entry: DocumentEntry) -> Self {
        Self {
            location: entry.location,
            display_name: entry.name,
            size_bytes: entry.size_bytes,
            last_modified: entry.last_modified_ms,
        }
    }
}

// Folder listing capability
// On a device this is the document provider; LocalTree covers plain directories

use super::Location;
use crate::error::TreeError;
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
    Other,
}

/// One immediate child of a folder handle
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntry {
    pub location: Location,
    pub name: String,
    pub kind: EntryKind,
    pub size_bytes: u64,
    pub last_modified_ms: i64,
}

/// Lists the immediate children of a folder handle.
///
/// Implementations are called from a blocking worker, never from the session thread.
pub trait DocumentTree: Send + Sync {
    fn list_children(&self, folder: &Location) -> Result<Vec<DocumentEntry>, TreeError>;
}

/// Directory listing straight off the local filesystem (file:// locations only)
#[derive(Debug, Clone, Default)]
pub struct LocalTree;

impl LocalTree {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentTree for LocalTree {
    fn list_children(&self, folder: &Location) -> Result<Vec<DocumentEntry>, TreeError> {
        let path = folder
            .to_file_path()
            .ok_or_else(|| TreeError::Unresolvable(folder.to_string()))?;

        if !path.exists() {
            return Err(TreeError::Unresolvable(folder.to_string()));
        }
        if !path.is_dir() {
            return Err(TreeError::NotAFolder(folder.to_string()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
        {
            let file_type = entry.file_type();
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Folder
            } else {
                EntryKind::Other
            };

            // Entries that vanish between listing and stat are just skipped
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let last_modified_ms = metadata
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|elapsed| elapsed.as_millis() as i64)
                .unwrap_or(0);

            let location = Location::from_path(entry.path())?;
            entries.push(DocumentEntry {
                location,
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
                size_bytes: metadata.len(),
                last_modified_ms,
            });
        }

        Ok(entries)
    }
}

use super::collation::sort_by_name;
use super::{VideoRecord, DEFAULT_EXTENSIONS};
use crate::storage::{DocumentTree, EntryKind, Location};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Turns a granted folder into an ordered playlist of its video files
#[derive(Clone)]
pub struct FolderScanner {
    tree: Arc<dyn DocumentTree>,
    supported_extensions: Vec<String>,
}

impl FolderScanner {
    pub fn new(tree: Arc<dyn DocumentTree>) -> Self {
        Self {
            tree,
            supported_extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.supported_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Immediate children only, no recursion. An unresolvable folder yields an empty list.
    pub fn scan(&self, folder: &Location) -> Vec<VideoRecord> {
        let entries = match self.tree.list_children(folder) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Folder scan of {} failed: {}", folder, e);
                return Vec::new();
            }
        };

        let total = entries.len();
        let mut records: Vec<VideoRecord> = entries
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::File)
            .filter(|entry| self.is_supported_name(&entry.name))
            .map(VideoRecord::from)
            .collect();

        sort_by_name(&mut records, |record| record.display_name.as_str());

        debug!("Scanned {}: {} of {} entries are videos", folder, records.len(), total);
        records
    }

    /// Runs `scan` on the blocking pool so the session thread never waits on folder IO
    pub fn spawn_scan(&self, folder: Location) -> JoinHandle<Vec<VideoRecord>> {
        let scanner = self.clone();
        tokio::task::spawn_blocking(move || scanner.scan(&folder))
    }

    fn is_supported_name(&self, name: &str) -> bool {
        name.rsplit_once('.')
            .map(|(_, ext)| self.supported_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

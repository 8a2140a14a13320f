use crate::media::VideoRecord;
use crate::storage::Location;

/// Ordered records plus a cursor that clamps at both ends.
///
/// The cursor is always in `[0, len)` for a non-empty playlist; a new scan replaces the
/// whole thing rather than editing it.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    records: Vec<VideoRecord>,
    cursor: usize,
}

impl Playlist {
    pub fn new(records: Vec<VideoRecord>, start_index: usize) -> Self {
        let cursor = clamp_index(start_index, records.len());
        Self { records, cursor }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn index(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&VideoRecord> {
        self.records.get(self.cursor)
    }

    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    pub fn locations(&self) -> Vec<Location> {
        self.records.iter().map(|record| record.location.clone()).collect()
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.records.len()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor > 0 && !self.records.is_empty()
    }

    /// Moves forward one item; `None` at the last item
    pub fn advance(&mut self) -> Option<usize> {
        if !self.has_next() {
            return None;
        }
        self.cursor += 1;
        Some(self.cursor)
    }

    /// Moves back one item; `None` at the first item
    pub fn retreat(&mut self) -> Option<usize> {
        if !self.has_previous() {
            return None;
        }
        self.cursor -= 1;
        Some(self.cursor)
    }

    /// Follows an index the engine reports, clamped into range
    pub fn select(&mut self, index: usize) -> usize {
        self.cursor = clamp_index(index, self.records.len());
        self.cursor
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

// Opaque location handles
// Document-provider URIs (content://authority/tree/<id>/document/<id>) and plain file:// URLs

use crate::error::LocationError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use url::Url;

const DOCUMENT_SCHEME: &str = "content";
const FILE_SCHEME: &str = "file";

// Providers encode everything in an id except the unreserved characters
const DOCUMENT_ID_ENCODE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Permission-scoped handle to a file or folder.
///
/// Nothing outside this module looks at the string structure; matching goes through
/// [`DocumentId`] segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let url = Url::parse(input).map_err(|e| LocationError::Malformed {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            DOCUMENT_SCHEME | FILE_SCHEME => Ok(Self { url }),
            other => Err(LocationError::UnsupportedScheme(other.to_string())),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LocationError> {
        let path = path.as_ref();
        let url = Url::from_file_path(path).map_err(|_| LocationError::Malformed {
            input: path.display().to_string(),
            reason: "path must be absolute".to_string(),
        })?;
        Ok(Self { url })
    }

    /// Build a document handle living inside the tree this location was granted under
    pub fn document_in_tree(&self, raw_document_id: &str) -> Result<Self, LocationError> {
        let tree = self
            .raw_tree_id()
            .ok_or_else(|| LocationError::NoDocumentId(self.url.to_string()))?;

        let encoded = format!(
            "content://{}/tree/{}/document/{}",
            self.authority(),
            utf8_percent_encode(&tree, DOCUMENT_ID_ENCODE),
            utf8_percent_encode(raw_document_id, DOCUMENT_ID_ENCODE),
        );
        Self::parse(&encoded)
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn is_document(&self) -> bool {
        self.url.scheme() == DOCUMENT_SCHEME
    }

    pub fn authority(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.url.scheme() != FILE_SCHEME {
            return None;
        }
        self.url.to_file_path().ok()
    }

    /// Identifier of the item itself: the document id when present, else the tree id.
    /// File locations use their path.
    pub fn document_id(&self) -> Option<DocumentId> {
        if let Some(path) = self.to_file_path() {
            return Some(DocumentId::from_path(&path));
        }
        let raw = self.raw_document_id().or_else(|| self.raw_tree_id())?;
        DocumentId::from_provider_id(&raw)
    }

    /// Identifier of the granted tree this handle was issued under, if any
    pub fn tree_id(&self) -> Option<DocumentId> {
        if let Some(path) = self.to_file_path() {
            return Some(DocumentId::from_path(&path));
        }
        DocumentId::from_provider_id(&self.raw_tree_id()?)
    }

    /// Folder holding this item, expressed as a handle under `tree`'s grant
    pub fn parent_in_tree(&self, tree: &Location) -> Option<Location> {
        if let Some(path) = self.to_file_path() {
            return Location::from_path(path.parent()?).ok();
        }
        let parent = self.document_id()?.parent()?;
        tree.document_in_tree(&parent.to_string()).ok()
    }

    pub fn display_name(&self) -> Option<String> {
        if let Some(path) = self.to_file_path() {
            return path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.to_string());
        }
        self.document_id()
            .and_then(|id| id.segments().last().cloned())
    }

    fn raw_tree_id(&self) -> Option<String> {
        self.segment_after("tree")
    }

    fn raw_document_id(&self) -> Option<String> {
        self.segment_after("document")
    }

    fn segment_after(&self, marker: &str) -> Option<String> {
        if !self.is_document() {
            return None;
        }
        let mut segments = self.url.path_segments()?;
        while let Some(segment) = segments.next() {
            if segment == marker {
                let raw = segments.next()?;
                return percent_decode_str(raw)
                    .decode_utf8()
                    .ok()
                    .map(|decoded| decoded.into_owned());
            }
        }
        None
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl TryFrom<String> for Location {
    type Error = LocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.url.into()
    }
}

impl std::str::FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Segment view of a document identifier.
///
/// Provider ids look like `primary:Movies/Trips`; the part before the first `:` is the
/// volume and the rest splits on `/`. Plain paths have no volume.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId {
    volume: Option<String>,
    segments: Vec<String>,
}

impl DocumentId {
    /// Returns `None` for ids carrying a `..` segment; those never match anything.
    pub fn from_provider_id(raw: &str) -> Option<Self> {
        let (volume, rest) = match raw.split_once(':') {
            Some((volume, rest)) => (Some(volume.to_string()), rest),
            None => (None, raw),
        };
        let segments = split_segments(rest)?;
        Some(Self { volume, segments })
    }

    pub fn from_path(path: &Path) -> Self {
        let segments = path
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Self {
            volume: None,
            segments,
        }
    }

    pub fn volume(&self) -> Option<&str> {
        self.volume.as_deref()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn parent(&self) -> Option<DocumentId> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            volume: self.volume.clone(),
            segments: rest.to_vec(),
        })
    }

    /// True when `other` is this id or lives beneath it on a whole-segment boundary
    pub fn covers(&self, other: &DocumentId) -> bool {
        self.volume == other.volume
            && self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(ours, theirs)| ours == theirs)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.volume {
            Some(volume) => write!(f, "{}:{}", volume, self.segments.join("/")),
            None => f.write_str(&self.segments.join("/")),
        }
    }
}

fn split_segments(raw: &str) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            other => segments.push(other.to_string()),
        }
    }
    Some(segments)
}

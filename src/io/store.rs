//! Loading tag documents by embed name

use crate::io::configuration::{
    DEFAULT_EMBEDS_DIRECTORY, DOCUMENT_EXTENSIONS, MAX_DOCUMENT_BYTES, TEXT_LIST_EXTENSION,
};
use crate::io::error::{EmbedError, Result, file_system, invalid_format};
use crate::tags::document::TagDocument;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of tag documents keyed by embed name
///
/// Every call loads afresh; implementations must not cache.
pub trait TagDefinitionStore {
    /// Load the document registered under `name`
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::NotFound`] if no document exists and
    /// [`EmbedError::InvalidFormat`] if one exists but cannot be parsed
    fn load(&self, name: &str) -> Result<TagDocument>;
}

impl<T: TagDefinitionStore + ?Sized> TagDefinitionStore for &T {
    fn load(&self, name: &str) -> Result<TagDocument> {
        (**self).load(name)
    }
}

impl TagDefinitionStore for HashMap<String, TagDocument> {
    fn load(&self, name: &str) -> Result<TagDocument> {
        self.get(name).cloned().ok_or_else(|| EmbedError::NotFound {
            name: name.to_string(),
            path: PathBuf::from(name),
        })
    }
}

/// Documents stored as files below a root directory
///
/// `hair/color` resolves to `<root>/hair/color.yml`, then `.yaml`, then
/// `.txt`.
#[derive(Clone, Debug)]
pub struct FileTagStore {
    root: PathBuf,
    max_document_bytes: u64,
}

impl Default for FileTagStore {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDS_DIRECTORY)
    }
}

impl FileTagStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_document_bytes: MAX_DOCUMENT_BYTES,
        }
    }

    /// Change the size limit above which documents are rejected
    #[must_use]
    pub fn with_max_document_bytes(mut self, limit: u64) -> Self {
        self.max_document_bytes = limit;
        self
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate paths for `name`, in lookup order
    ///
    /// Empty when the name has no usable segment, or when any segment is
    /// blank, `.` or `..`, so every candidate stays below the root.
    pub fn candidate_paths(&self, name: &str) -> Vec<PathBuf> {
        let segments: Vec<&str> = name
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let unusable = segments.iter().any(|segment| {
            let trimmed = segment.trim();
            trimmed.is_empty() || trimmed == "." || trimmed == ".."
        });
        if segments.is_empty() || unusable {
            debug!(name, "Embed name does not map below the root");
            return Vec::new();
        }

        let base = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        DOCUMENT_EXTENSIONS
            .iter()
            .map(|extension| {
                let mut file: OsString = base.clone().into_os_string();
                file.push(".");
                file.push(extension);
                PathBuf::from(file)
            })
            .collect()
    }

    /// First existing document path for `name`
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        self.candidate_paths(name)
            .into_iter()
            .find(|path| path.is_file())
    }

    /// Read and parse a document file, choosing the format by extension
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::InvalidFormat`] for oversized, non-UTF-8 or
    /// unparsable documents and [`EmbedError::FileSystem`] for other read
    /// failures
    pub fn read_document(&self, path: &Path) -> Result<TagDocument> {
        let metadata = fs::metadata(path).map_err(|e| file_system(path, "metadata", e))?;
        if metadata.len() > self.max_document_bytes {
            return Err(invalid_format(
                path,
                &format!(
                    "document is {} bytes, limit is {}",
                    metadata.len(),
                    self.max_document_bytes
                ),
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                invalid_format(path, &e)
            } else {
                file_system(path, "read", e)
            }
        })?;

        let is_text_list =
            path.extension().and_then(|ext| ext.to_str()) == Some(TEXT_LIST_EXTENSION);

        if is_text_list {
            let group_name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(TagDocument::from_text_list(&group_name, &content))
        } else {
            TagDocument::from_yaml_str(&content, path)
        }
    }
}

impl TagDefinitionStore for FileTagStore {
    fn load(&self, name: &str) -> Result<TagDocument> {
        let Some(path) = self.locate(name) else {
            let path = self
                .candidate_paths(name)
                .into_iter()
                .next()
                .unwrap_or_else(|| self.root.clone());
            return Err(EmbedError::NotFound {
                name: name.to_string(),
                path,
            });
        };

        debug!(path = %path.display(), "Loading embed document");
        self.read_document(&path)
    }
}

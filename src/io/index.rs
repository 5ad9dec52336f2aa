//! Embed discovery and fuzzy autocomplete over embed names

use crate::io::configuration::{
    COMPLETE_MATCH_BONUS, CONSECUTIVE_MATCH_SCORE, DOCUMENT_EXTENSIONS, MATCH_SCORE,
    PREFIX_MATCH_BONUS,
};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One document found below the embeds root
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmbedEntry {
    /// Name to write between angle brackets, e.g. `hair/color`
    pub name: String,
    /// File name without extension
    pub file_name: String,
    /// Folder relative to the root, empty at top level
    pub folder: String,
    /// Path relative to the root including the extension
    pub relative_path: String,
}

impl EmbedEntry {
    /// Build an entry from a `/`-separated path relative to the embeds root
    ///
    /// Returns `None` unless the path carries a document extension.
    pub fn from_relative_path(relative_path: &str) -> Option<Self> {
        let (stem_path, extension) = relative_path.rsplit_once('.')?;
        if !DOCUMENT_EXTENSIONS.contains(&extension) {
            return None;
        }

        let (folder, file_name) = stem_path.rsplit_once('/').unwrap_or(("", stem_path));
        if file_name.is_empty() {
            return None;
        }

        Some(Self {
            name: stem_path.to_string(),
            file_name: file_name.to_string(),
            folder: folder.to_string(),
            relative_path: relative_path.to_string(),
        })
    }

    fn extension_rank(&self) -> usize {
        self.relative_path
            .rsplit_once('.')
            .and_then(|(_, extension)| DOCUMENT_EXTENSIONS.iter().position(|e| *e == extension))
            .unwrap_or(DOCUMENT_EXTENSIONS.len())
    }
}

/// Searchable list of available embeds
#[derive(Clone, Debug, Default)]
pub struct EmbedIndex {
    entries: Vec<EmbedEntry>,
}

impl EmbedIndex {
    /// Walk `root` recursively and index every document
    ///
    /// A missing root gives an empty index.
    pub fn scan(root: &Path) -> Self {
        if !root.exists() {
            warn!(root = %root.display(), "Embeds directory does not exist");
            return Self::default();
        }

        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    debug!(%error, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(root).ok()?;
                let relative = relative.to_string_lossy().replace('\\', "/");
                EmbedEntry::from_relative_path(&relative)
            })
            .collect();

        let index = Self::from_entries(entries);
        info!(count = index.entries.len(), "Scanned and indexed embed files");
        index
    }

    /// Build an index from known entries
    ///
    /// Entries sharing an embed name collapse to the one the store would load.
    pub fn from_entries(mut entries: Vec<EmbedEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.extension_rank().cmp(&b.extension_rank()))
        });
        entries.dedup_by(|later, earlier| later.name == earlier.name);
        Self { entries }
    }

    /// All indexed entries, sorted by name
    pub const fn entries(&self) -> &[EmbedEntry] {
        self.entries.as_slice()
    }

    /// Number of indexed entries
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was indexed
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose name contains `query` as a subsequence, best first
    pub fn search(&self, query: &str, limit: usize) -> Vec<&EmbedEntry> {
        let query = query.to_lowercase();

        let mut scored: Vec<(usize, &EmbedEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let candidate = entry.name.to_lowercase();
                fuzzy_match(&candidate, &query).then(|| (match_score(&candidate, &query), entry))
            })
            .collect();

        // Stable sort keeps name order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(limit);
        scored.into_iter().map(|(_, entry)| entry).collect()
    }
}

/// Whether every character of `query` appears in `candidate` in order
pub fn fuzzy_match(candidate: &str, query: &str) -> bool {
    let mut remaining = query.chars().peekable();
    for c in candidate.chars() {
        if remaining.peek() == Some(&c) {
            remaining.next();
        }
    }
    remaining.peek().is_none()
}

/// Rank how well `query` matches `candidate`
///
/// Runs of consecutive matches, a complete match and a shared prefix all
/// raise the score.
pub fn match_score(candidate: &str, query: &str) -> usize {
    let mut score = 0;
    let mut remaining = query.chars().peekable();
    let mut last_matched = false;

    for c in candidate.chars() {
        let Some(&wanted) = remaining.peek() else {
            break;
        };

        if c == wanted {
            score += if last_matched {
                CONSECUTIVE_MATCH_SCORE
            } else {
                MATCH_SCORE
            };
            last_matched = true;
            remaining.next();
        } else {
            last_matched = false;
        }
    }

    if remaining.peek().is_none() {
        score += COMPLETE_MATCH_BONUS;
    }
    if candidate.starts_with(query) {
        score += PREFIX_MATCH_BONUS;
    }

    score
}

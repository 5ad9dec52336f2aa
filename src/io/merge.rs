//! Folding several embed documents or tag lists into one

use crate::io::configuration::{MERGED_GROUP_NAME, TEXT_LIST_EXTENSION};
use crate::io::error::{Result, file_system, invalid_parameter};
use crate::io::store::FileTagStore;
use crate::tags::document::{SamplingPolicy, TagDocument, TagGroup, Tagset};
use indexmap::IndexSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Union of every raw tag across `documents`, first occurrence first
///
/// The result holds a single group drawing one tag per expansion.
pub fn merge_documents<'a, I>(documents: I) -> TagDocument
where
    I: IntoIterator<Item = &'a TagDocument>,
{
    let tags: IndexSet<&str> = documents
        .into_iter()
        .flat_map(|document| document.tagset.iter())
        .flat_map(|(_, group)| group.tags.iter().map(String::as_str))
        .collect();

    let mut tagset = Tagset::new();
    tagset.insert(
        MERGED_GROUP_NAME,
        TagGroup::new(tags, SamplingPolicy::Count(1)),
    );
    TagDocument::new(tagset, MERGED_GROUP_NAME)
}

/// Unique trimmed non-blank lines across `contents`, first occurrence first
pub fn merge_text_lists<'a, I>(contents: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let lines: IndexSet<&str> = contents
        .into_iter()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines.into_iter().map(str::to_string).collect()
}

/// Merge `inputs` into `output`, returning the number of unique tags
///
/// A `.txt` output merges the inputs line by line; `.yml` and `.yaml`
/// outputs parse each input as a document.
///
/// # Errors
///
/// Returns an error if the output extension is unsupported, an input cannot
/// be read or parsed, or the output cannot be written
pub fn merge_files(inputs: &[PathBuf], output: &Path) -> Result<usize> {
    let extension = output
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let (content, count) = match extension {
        TEXT_LIST_EXTENSION => {
            let contents = inputs
                .iter()
                .map(|path| fs::read_to_string(path).map_err(|e| file_system(path, "read", e)))
                .collect::<Result<Vec<_>>>()?;
            let lines = merge_text_lists(contents.iter().map(String::as_str));
            let count = lines.len();
            let mut content = lines.join("\n");
            content.push('\n');
            (content, count)
        }
        "yml" | "yaml" => {
            let reader = FileTagStore::default();
            let documents = inputs
                .iter()
                .map(|path| reader.read_document(path))
                .collect::<Result<Vec<_>>>()?;
            let merged = merge_documents(&documents);
            let count = merged
                .tagset
                .get(MERGED_GROUP_NAME)
                .map_or(0, |group| group.tags.len());
            (merged.to_yaml_string()?, count)
        }
        _ => {
            return Err(invalid_parameter(
                "output",
                &output.display(),
                &"expected a .txt, .yml or .yaml file",
            ));
        }
    };

    fs::write(output, content).map_err(|e| file_system(output, "write", e))?;
    info!(output = %output.display(), count, "Merged embed files");
    Ok(count)
}

//! Placeholder expansion for image-generation prompts
//!
//! Prompts name embeds as `<name>`. Each embed is a document of tag groups
//! plus a condition choosing which groups contribute; the chosen groups are
//! sampled, weighted with emphasis brackets, and spliced back into the text.

#![forbid(unsafe_code)]

/// Document storage, errors, configuration and the command-line surface
pub mod io;
/// Prompt scanning, splicing and normalization
pub mod prompt;
/// Tag documents, condition evaluation and sampling
pub mod tags;

pub use io::error::{EmbedError, Result};
pub use io::store::{FileTagStore, TagDefinitionStore};
pub use prompt::expander::EmbedExpander;

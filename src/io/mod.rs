/// Command-line interface and log setup
pub mod cli;
/// Engine constants and defaults
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// Embed discovery and fuzzy search
pub mod index;
/// Merging embed documents and tag lists
pub mod merge;
/// Document lookup by embed name
pub mod store;

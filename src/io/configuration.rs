//! Engine constants and runtime configuration defaults

// Document lookup
/// Directory searched for embed documents when none is given
pub const DEFAULT_EMBEDS_DIRECTORY: &str = "embeds";

/// Document extensions in lookup priority order
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["yml", "yaml", "txt"];

/// Extension marking a plain-text tag list
pub const TEXT_LIST_EXTENSION: &str = "txt";

/// Largest document the store will read, in bytes
pub const MAX_DOCUMENT_BYTES: u64 = 1024 * 1024;

// Tag rendering
/// Separator placed between generated tags
pub const TAG_SEPARATOR: &str = ",";

/// Prefix applied to every tag of an artist group
pub const ARTIST_TAG_PREFIX: &str = "artist:";

/// Sample count used when a group omits `Sampling`
pub const DEFAULT_SAMPLE_COUNT: usize = 1;

/// Keyword selecting every tag of a group
pub const SAMPLE_ALL_KEYWORD: &str = "all";

// Autocomplete
/// Default number of search results returned
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// Score for a matched query character
pub const MATCH_SCORE: usize = 1;

/// Score for a matched character directly after another match
pub const CONSECUTIVE_MATCH_SCORE: usize = 2;

/// Bonus when the whole query was matched
pub const COMPLETE_MATCH_BONUS: usize = 5;

/// Bonus when the embed name starts with the query
pub const PREFIX_MATCH_BONUS: usize = 3;

// Merging
/// Group name used for merged documents
pub const MERGED_GROUP_NAME: &str = "merged";

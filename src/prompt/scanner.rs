//! Detection of `<name>` placeholders in prompt text

use rand::Rng;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::{debug, warn};

// A name excludes `<` and `>`, so an unmatched `<` can never extend a match
// across a later placeholder.
/// Placeholder grammar: name, an optional count suffix, then an optional
/// second suffix that is accepted and ignored
const PLACEHOLDER_PATTERN: &str = r"<([\p{L}\p{N}\s/]+)(?::([\d~]+))?(?::[-\d~]+)?>";

// Pattern is a compile-time constant
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"));

/// Count suffix written after a placeholder name
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleCount {
    /// `<name:n>`
    Exact(usize),
    /// `<name:min~max>`, inclusive on both ends
    Range {
        /// Smallest count
        min: usize,
        /// Largest count
        max: usize,
    },
}

impl SampleCount {
    /// Draw the concrete count for one expansion
    ///
    /// Returns `None` for a reversed range.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Option<usize> {
        match self {
            Self::Exact(count) => Some(count),
            Self::Range { min, max } if min <= max => Some(rng.random_range(min..=max)),
            Self::Range { min, max } => {
                warn!(min, max, "Ignoring reversed sample range");
                None
            }
        }
    }
}

/// One placeholder occurrence
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Placeholder {
    /// Embed name between the angle brackets
    pub name: String,
    /// Byte offset of the opening `<`
    pub start: usize,
    /// Byte offset just past the closing `>`
    pub end: usize,
    /// Optional count suffix
    pub count: Option<SampleCount>,
}

impl Placeholder {
    /// Half-open byte span covered in the source text
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Find every placeholder in `text`, left to right
pub fn scan(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let name = captures.get(1)?.as_str().to_string();
            let count = captures.get(2).and_then(|suffix| parse_count(suffix.as_str()));

            debug!(
                name = name.as_str(),
                start = whole.start(),
                end = whole.end(),
                ?count,
                "Detected embed placeholder"
            );

            Some(Placeholder {
                name,
                start: whole.start(),
                end: whole.end(),
                count,
            })
        })
        .collect()
}

/// Parse `n` or `min~max`; anything else, such as `1~` or `1~2~3`, is no count
fn parse_count(suffix: &str) -> Option<SampleCount> {
    let count = match suffix.split_once('~') {
        None => suffix.parse().ok().map(SampleCount::Exact),
        Some((min, max)) => min
            .parse()
            .ok()
            .zip(max.parse().ok())
            .map(|(min, max)| SampleCount::Range { min, max }),
    };

    if count.is_none() {
        warn!(suffix, "Ignoring invalid sample count");
    }
    count
}

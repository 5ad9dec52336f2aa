//! Tag selection, weight brackets and artist prefixes for a single group

use crate::io::configuration::ARTIST_TAG_PREFIX;
use crate::tags::document::{SamplingPolicy, TagGroup};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Expand one group into the tags it contributes
///
/// Applies the sampling policy, then the weight transform for weighted
/// groups, then the artist prefix, preserving the selection order throughout.
pub fn sample<R: Rng + ?Sized>(group: &TagGroup, rng: &mut R) -> Vec<String> {
    let tags: Vec<String> = select_tags(&group.tags, group.sampling, rng)
        .into_iter()
        .map(|tag| {
            let rendered = if group.weighted {
                apply_weight(tag)
            } else {
                tag.to_string()
            };
            if group.artist_prefix {
                format!("{ARTIST_TAG_PREFIX}{rendered}")
            } else {
                rendered
            }
        })
        .collect();

    debug!(?tags, "Sampled tag group");
    tags
}

/// Pick tags according to the sampling policy
///
/// `Count(n)` shuffles a copy and keeps the first `min(n, len)` entries, so
/// no tag is drawn twice.
pub fn select_tags<'a, R: Rng + ?Sized>(
    tags: &'a [String],
    sampling: SamplingPolicy,
    rng: &mut R,
) -> Vec<&'a str> {
    let mut selected: Vec<&str> = tags.iter().map(String::as_str).collect();

    if let SamplingPolicy::Count(count) = sampling {
        selected.shuffle(rng);
        selected.truncate(count);
    }

    selected
}

/// Convert `+`/`-` prefixes into `{}`/`[]` emphasis brackets
///
/// The bracket depth is the length of the leading run; once a tag carries a
/// prefix every `+` and `-` in it is dropped. `++foo` becomes `{{foo}}`,
/// `--bar` becomes `[[bar]]`, and `baz` is returned unchanged.
pub fn apply_weight(tag: &str) -> String {
    let emphasis = leading_run(tag, '+');
    let deemphasis = leading_run(tag, '-');

    if emphasis == 0 && deemphasis == 0 {
        return tag.to_string();
    }

    let cleaned: String = tag.chars().filter(|c| !matches!(c, '+' | '-')).collect();

    if emphasis > 0 {
        wrap(&cleaned, emphasis, '{', '}')
    } else {
        wrap(&cleaned, deemphasis, '[', ']')
    }
}

fn leading_run(tag: &str, marker: char) -> usize {
    tag.chars().take_while(|&c| c == marker).count()
}

fn wrap(tag: &str, depth: usize, open: char, close: char) -> String {
    let mut wrapped = String::with_capacity(tag.len() + depth * 2);
    wrapped.extend(std::iter::repeat_n(open, depth));
    wrapped.push_str(tag);
    wrapped.extend(std::iter::repeat_n(close, depth));
    wrapped
}

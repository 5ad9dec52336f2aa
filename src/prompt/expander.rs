//! Placeholder expansion over whole prompts

use crate::io::configuration::TAG_SEPARATOR;
use crate::io::error::Result;
use crate::io::store::TagDefinitionStore;
use crate::prompt::normalize::normalize_commas;
use crate::prompt::scanner::{Placeholder, scan};
use crate::tags::condition::evaluate;
use crate::tags::document::{DocumentKind, SamplingPolicy};
use crate::tags::sampler::sample;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

/// Expands `<name>` placeholders using documents from a store
///
/// Holds no state between calls besides the store itself; randomness is
/// supplied per call.
#[derive(Clone, Debug, Default)]
pub struct EmbedExpander<S> {
    store: S,
}

impl<S: TagDefinitionStore> EmbedExpander<S> {
    /// Create an expander over `store`
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Backing document store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Replace every placeholder in `text` and normalize commas
    ///
    /// Never fails: placeholders whose documents cannot be loaded, or whose
    /// condition selects nothing, are deleted.
    pub fn expand<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        info!(prompt = text, "Processing prompt");

        let placeholders = scan(text);

        // Resolved right to left so random draws happen in reverse text order
        let mut replacements: Vec<Vec<String>> = Vec::with_capacity(placeholders.len());
        for placeholder in placeholders.iter().rev() {
            replacements.push(self.resolve_or_empty(placeholder, rng));
        }
        replacements.reverse();

        let spliced = splice(text, &placeholders, &replacements);
        let expanded = normalize_commas(&spliced);

        info!(prompt = expanded.as_str(), "Final processed prompt");
        expanded
    }

    /// [`expand`](Self::expand) with a generator seeded from the operating system
    pub fn expand_with_os_rng(&self, text: &str) -> String {
        let mut rng = StdRng::from_os_rng();
        self.expand(text, &mut rng)
    }

    /// Produce the tags for a single placeholder
    ///
    /// A count suffix on the placeholder overrides the sampling of plain-text
    /// documents and is ignored for structured ones.
    ///
    /// # Errors
    ///
    /// Returns any error from the store
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        placeholder: &Placeholder,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let mut document = self.store.load(&placeholder.name)?;

        match document.kind {
            DocumentKind::Structured => {
                if placeholder.count.is_some() {
                    debug!(
                        name = placeholder.name.as_str(),
                        "Ignoring count suffix on structured document"
                    );
                }
                Ok(evaluate(&document.condition, &document.tagset, rng))
            }
            // Text lists have no condition; every group is sampled directly
            DocumentKind::TextList => {
                if let Some(resolved) = placeholder.count.and_then(|count| count.resolve(rng)) {
                    document.override_sampling(SamplingPolicy::Count(resolved));
                }
                Ok(document
                    .tagset
                    .iter()
                    .flat_map(|(_, group)| sample(group, &mut *rng))
                    .collect())
            }
        }
    }

    fn resolve_or_empty<R: Rng + ?Sized>(&self, placeholder: &Placeholder, rng: &mut R) -> Vec<String> {
        match self.resolve(placeholder, rng) {
            Ok(tags) => {
                debug!(name = placeholder.name.as_str(), ?tags, "Generated tags");
                tags
            }
            Err(error) => {
                warn!(name = placeholder.name.as_str(), %error, "Dropping embed");
                Vec::new()
            }
        }
    }
}

/// Rebuild `text` with each placeholder span replaced by its tags
///
/// An empty replacement deletes the span along with the whitespace that
/// would otherwise be left dangling beside it.
fn splice(text: &str, placeholders: &[Placeholder], replacements: &[Vec<String>]) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut trim_next_gap = false;

    for (placeholder, tags) in placeholders.iter().zip(replacements) {
        let gap = text.get(cursor..placeholder.start).unwrap_or_default();
        output.push_str(if trim_next_gap { gap.trim_start() } else { gap });
        trim_next_gap = false;
        cursor = placeholder.end;

        if !tags.is_empty() {
            output.push_str(&tags.join(TAG_SEPARATOR));
            continue;
        }

        let rest = text.get(placeholder.end..).unwrap_or_default();
        let dangling = rest
            .chars()
            .next()
            .is_none_or(|next| next == ',' || next.is_whitespace());
        if dangling {
            let kept = output.trim_end().len();
            output.truncate(kept);
        }
        trim_next_gap = output.is_empty();
    }

    let tail = text.get(cursor..).unwrap_or_default();
    output.push_str(if trim_next_gap { tail.trim_start() } else { tail });
    output
}

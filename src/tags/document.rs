//! Typed tag documents and their on-disk YAML and plain-text forms
//!
//! Raw YAML is validated into [`TagDocument`] at the boundary so the
//! evaluator and sampler never see untyped maps.

use crate::io::configuration::{DEFAULT_SAMPLE_COUNT, SAMPLE_ALL_KEYWORD};
use crate::io::error::{EmbedError, Result, invalid_format};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use std::path::Path;

/// How many tags a group contributes per expansion
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SamplingPolicy {
    /// Every tag, in document order
    All,
    /// Up to `n` tags drawn without replacement
    Count(usize),
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::Count(DEFAULT_SAMPLE_COUNT)
    }
}

/// A named collection of candidate tags
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagGroup {
    /// Raw tags, weight prefixes included
    pub tags: Vec<String>,
    /// Whether every emitted tag receives the artist prefix
    pub artist_prefix: bool,
    /// Whether `+`/`-` prefixes become emphasis brackets
    ///
    /// Plain-text lists carry their own `{}`/`[]` markup and are emitted as
    /// written.
    pub weighted: bool,
    /// Selection policy applied on each expansion
    pub sampling: SamplingPolicy,
}

impl TagGroup {
    /// Create a weighted group without the artist prefix
    pub fn new<I, S>(tags: I, sampling: SamplingPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            artist_prefix: false,
            weighted: true,
            sampling,
        }
    }

    /// Toggle the artist prefix
    #[must_use]
    pub fn with_artist_prefix(mut self, enabled: bool) -> Self {
        self.artist_prefix = enabled;
        self
    }

    /// Toggle the weight transform
    #[must_use]
    pub fn with_weights(mut self, enabled: bool) -> Self {
        self.weighted = enabled;
        self
    }
}

/// Ordered mapping from group name to group
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tagset {
    groups: IndexMap<String, TagGroup>,
}

impl Tagset {
    /// Create an empty tagset
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a group, returning any group previously stored under the name
    pub fn insert(&mut self, name: impl Into<String>, group: TagGroup) -> Option<TagGroup> {
        self.groups.insert(name.into(), group)
    }

    /// Look up a group by name
    pub fn get(&self, name: &str) -> Option<&TagGroup> {
        self.groups.get(name)
    }

    /// Look up a group, failing when the name is not defined
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::UnknownGroup`] if no group has this name
    pub fn group(&self, name: &str) -> Result<&TagGroup> {
        self.groups.get(name).ok_or_else(|| EmbedError::UnknownGroup {
            group: name.to_string(),
        })
    }

    /// Whether a group with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Groups in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagGroup)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the tagset has no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<(String, TagGroup)> for Tagset {
    fn from_iter<T: IntoIterator<Item = (String, TagGroup)>>(iter: T) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

/// Storage format a document was read from
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocumentKind {
    /// YAML document with a tagset and condition
    Structured,
    /// One tag per line, expanded as a single group
    TextList,
}

/// Everything needed to expand one embed name
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagDocument {
    /// Groups available to the condition
    pub tagset: Tagset,
    /// Condition expression; blank selects every group
    pub condition: String,
    /// Format the document came from
    pub kind: DocumentKind,
}

impl TagDocument {
    /// Create a structured document
    pub fn new(tagset: Tagset, condition: impl Into<String>) -> Self {
        Self {
            tagset,
            condition: condition.into(),
            kind: DocumentKind::Structured,
        }
    }

    /// Parse a YAML document
    ///
    /// `origin` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::InvalidFormat`] if the YAML is malformed, a
    /// group lacks `tags`, a tag is not a scalar, or `Sampling` is neither a
    /// non-negative integer nor `all`
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self> {
        let raw: RawDocument =
            serde_yaml_ng::from_str(content).map_err(|e| invalid_format(origin, &e))?;

        let tagset = raw
            .tagset
            .into_iter()
            .map(|(name, group)| group.into_group(&name, origin).map(|group| (name, group)))
            .collect::<Result<Tagset>>()?;

        Ok(Self::new(tagset, raw.condition.unwrap_or_default()))
    }

    /// Build a document from a plain-text list, one tag per non-blank line
    ///
    /// Lines are emitted verbatim, without the weight transform.
    pub fn from_text_list(group_name: &str, content: &str) -> Self {
        let tags = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());

        let mut tagset = Tagset::new();
        tagset.insert(
            group_name,
            TagGroup::new(tags, SamplingPolicy::All).with_weights(false),
        );

        Self {
            tagset,
            condition: String::new(),
            kind: DocumentKind::TextList,
        }
    }

    /// Replace the sampling policy of every group
    pub fn override_sampling(&mut self, sampling: SamplingPolicy) {
        for group in self.tagset.groups.values_mut() {
            group.sampling = sampling;
        }
    }

    /// Serialize in the on-disk YAML schema
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::InvalidFormat`] if the YAML emitter fails
    pub fn to_yaml_string(&self) -> Result<String> {
        let raw = RawDocument {
            tagset: self
                .tagset
                .iter()
                .map(|(name, group)| (name.to_string(), RawGroup::from_group(group)))
                .collect(),
            condition: (!self.condition.is_empty()).then(|| self.condition.clone()),
        };

        serde_yaml_ng::to_string(&raw).map_err(|e| invalid_format("<serialized>", &e))
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct RawDocument {
    tagset: IndexMap<String, RawGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RawGroup {
    tags: Vec<Value>,
    #[serde(rename = "ArtistTagPrefix", default)]
    artist_prefix: bool,
    #[serde(rename = "Sampling", default, skip_serializing_if = "Option::is_none")]
    sampling: Option<RawSampling>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum RawSampling {
    Count(u64),
    Keyword(String),
}

impl RawGroup {
    fn into_group(self, name: &str, origin: &Path) -> Result<TagGroup> {
        let tags = self
            .tags
            .into_iter()
            .map(|value| {
                scalar_to_tag(value).ok_or_else(|| {
                    invalid_format(origin, &format!("group '{name}' contains a non-scalar tag"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let sampling = match self.sampling {
            None => SamplingPolicy::default(),
            Some(RawSampling::Count(count)) => {
                SamplingPolicy::Count(usize::try_from(count).map_err(|error| {
                    invalid_format(origin, &format!("group '{name}' Sampling {count}: {error}"))
                })?)
            }
            Some(RawSampling::Keyword(keyword)) if keyword.eq_ignore_ascii_case(SAMPLE_ALL_KEYWORD) => {
                SamplingPolicy::All
            }
            Some(RawSampling::Keyword(keyword)) => {
                return Err(invalid_format(
                    origin,
                    &format!("group '{name}' has unsupported Sampling '{keyword}'"),
                ));
            }
        };

        Ok(TagGroup {
            tags,
            artist_prefix: self.artist_prefix,
            weighted: true,
            sampling,
        })
    }

    fn from_group(group: &TagGroup) -> Self {
        let sampling = match group.sampling {
            SamplingPolicy::All => RawSampling::Keyword(SAMPLE_ALL_KEYWORD.to_string()),
            SamplingPolicy::Count(count) => {
                RawSampling::Count(u64::try_from(count).unwrap_or(u64::MAX))
            }
        };

        Self {
            tags: group.tags.iter().cloned().map(Value::String).collect(),
            artist_prefix: group.artist_prefix,
            sampling: Some(sampling),
        }
    }
}

fn scalar_to_tag(value: Value) -> Option<String> {
    match value {
        Value::String(tag) => Some(tag),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

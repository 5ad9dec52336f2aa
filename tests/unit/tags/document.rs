//! Tests for tag document parsing, validation and serialization

#[cfg(test)]
mod tests {
    use promptembed::EmbedError;
    use promptembed::tags::document::{
        DocumentKind, SamplingPolicy, TagDocument, TagGroup, Tagset,
    };
    use std::path::Path;

    const SAMPLE_DOCUMENT: &str = r#"
tagset:
  groupA:
    tags: ["tag1", "tag2", "++tag3", "-tag4"]
    ArtistTagPrefix: false
    Sampling: 2          # integer, or the literal string "all"
  groupB:
    tags: ["b1"]
    ArtistTagPrefix: true
    Sampling: all
  groupC:
    tags: ["c1", "c2"]
condition: "groupA and (groupB or groupC)"
"#;

    fn parse(content: &str) -> Result<TagDocument, EmbedError> {
        TagDocument::from_yaml_str(content, Path::new("inline.yml"))
    }

    fn assert_invalid(content: &str) {
        match parse(content) {
            Err(EmbedError::InvalidFormat { path, .. }) => {
                assert_eq!(path, Path::new("inline.yml"));
            }
            other => unreachable!("Expected InvalidFormat, got {other:?}"),
        }
    }

    // Tests the documented schema parses into typed groups
    // Verified by ignoring the ArtistTagPrefix key
    #[test]
    fn test_parse_sample_document() {
        let Ok(document) = parse(SAMPLE_DOCUMENT) else {
            unreachable!("Sample document should parse");
        };

        assert_eq!(document.kind, DocumentKind::Structured);
        assert_eq!(document.condition, "groupA and (groupB or groupC)");
        assert_eq!(document.tagset.len(), 3);

        let group_a = document.tagset.get("groupA");
        assert_eq!(
            group_a,
            Some(&TagGroup::new(
                ["tag1", "tag2", "++tag3", "-tag4"],
                SamplingPolicy::Count(2)
            ))
        );

        let group_b = document.tagset.get("groupB");
        assert_eq!(group_b.map(|g| g.sampling), Some(SamplingPolicy::All));
        assert_eq!(group_b.map(|g| g.artist_prefix), Some(true));

        // Sampling defaults to a single tag
        let group_c = document.tagset.get("groupC");
        assert_eq!(group_c.map(|g| g.sampling), Some(SamplingPolicy::Count(1)));
        assert_eq!(group_c.map(|g| g.artist_prefix), Some(false));
    }

    // Tests groups keep document order
    // Verified by collecting into a sorted map
    #[test]
    fn test_tagset_preserves_order() {
        let content = "tagset:\n  zeta: {tags: [z]}\n  alpha: {tags: [a]}\n  mid: {tags: [m]}\n";
        let Ok(document) = parse(content) else {
            unreachable!("Document should parse");
        };

        let names: Vec<&str> = document.tagset.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(document.condition.is_empty());
    }

    // Tests the all keyword ignores case
    // Verified by matching "all" exactly
    #[test]
    fn test_sampling_all_case_insensitive() {
        let Ok(document) = parse("tagset:\n  g:\n    tags: [a]\n    Sampling: ALL\n") else {
            unreachable!("Document should parse");
        };

        assert_eq!(
            document.tagset.get("g").map(|g| g.sampling),
            Some(SamplingPolicy::All)
        );
    }

    // Tests scalar tags of any type become strings
    // Verified by rejecting numeric tags
    #[test]
    fn test_scalar_tags_are_stringified() {
        let Ok(document) = parse("tagset:\n  g:\n    tags: [1, true, x]\n") else {
            unreachable!("Document should parse");
        };

        assert_eq!(
            document.tagset.get("g").map(|g| g.tags.clone()),
            Some(vec!["1".to_string(), "true".to_string(), "x".to_string()])
        );
    }

    // Tests unknown keys are tolerated
    // Verified by denying unknown fields
    #[test]
    fn test_unknown_keys_ignored() {
        let content = "version: 3\ntagset:\n  g:\n    tags: [a]\n    Comment: hi\ncondition: g\n";

        assert!(parse(content).is_ok());
    }

    // Tests schema violations surface as InvalidFormat
    // Verified by defaulting malformed fields
    #[test]
    fn test_schema_violations() {
        assert_invalid("tagset:\n  g:\n    tags: a\n");
        assert_invalid("tagset:\n  g:\n    Sampling: 2\n");
        assert_invalid("tagset:\n  g:\n    tags: [[nested]]\n");
        assert_invalid("tagset:\n  g:\n    tags: [a]\n    Sampling: -1\n");
        assert_invalid("tagset:\n  g:\n    tags: [a]\n    Sampling: some\n");
        assert_invalid("condition: g\n");
        assert_invalid("tagset: [not, a, map]\n");
        assert_invalid("tagset:\n  g: {tags: [a]\ncondition: [broken\n");
    }

    // Tests plain-text lists become a single unweighted group of every line
    // Verified by keeping blank lines
    #[test]
    fn test_from_text_list() {
        let document = TagDocument::from_text_list("colors", "  red \n\nblue\n   \n+green\n");

        assert_eq!(document.kind, DocumentKind::TextList);
        assert!(document.condition.is_empty());
        assert_eq!(
            document.tagset.get("colors"),
            Some(&TagGroup::new(["red", "blue", "+green"], SamplingPolicy::All).with_weights(false))
        );
    }

    // Tests structured groups are weighted and text-list groups are not
    // Verified by defaulting every group to unweighted
    #[test]
    fn test_weighting_by_document_kind() {
        let Ok(structured) = parse("tagset:\n  g:\n    tags: [+a]\n") else {
            unreachable!("Document should parse");
        };
        let text_list = TagDocument::from_text_list("faces", "-_-\n");

        assert_eq!(structured.tagset.get("g").map(|g| g.weighted), Some(true));
        assert_eq!(text_list.tagset.get("faces").map(|g| g.weighted), Some(false));
    }

    // Tests sampling overrides reach every group
    // Verified by overriding only the first group
    #[test]
    fn test_override_sampling() {
        let mut tagset = Tagset::new();
        tagset.insert("a", TagGroup::new(["x"], SamplingPolicy::All));
        tagset.insert("b", TagGroup::new(["y"], SamplingPolicy::Count(4)));
        let mut document = TagDocument::new(tagset, "a and b");

        document.override_sampling(SamplingPolicy::Count(1));

        assert!(
            document
                .tagset
                .iter()
                .all(|(_, group)| group.sampling == SamplingPolicy::Count(1))
        );
    }

    // Tests serialization uses the on-disk schema
    // Verified by serializing with field names instead of renamed keys
    #[test]
    fn test_yaml_serialization() {
        let mut tagset = Tagset::new();
        tagset.insert(
            "style",
            TagGroup::new(["++bold", "soft"], SamplingPolicy::Count(1)).with_artist_prefix(true),
        );
        tagset.insert("all", TagGroup::new(["x"], SamplingPolicy::All));
        let document = TagDocument::new(tagset, "style and all");

        let Ok(yaml) = document.to_yaml_string() else {
            unreachable!("Serialization should succeed");
        };

        assert!(yaml.contains("ArtistTagPrefix: true"));
        assert!(yaml.contains("Sampling: 1"));
        assert!(yaml.contains("Sampling: all"));
        assert_eq!(parse(&yaml).ok(), Some(document));
    }

    // Tests UnknownGroup is raised for absent names
    // Verified by returning an empty group instead
    #[test]
    fn test_tagset_group_lookup() {
        let mut tagset = Tagset::new();
        tagset.insert("present", TagGroup::new(["x"], SamplingPolicy::All));

        assert!(tagset.group("present").is_ok());
        assert!(tagset.contains("present"));
        match tagset.group("ghost") {
            Err(EmbedError::UnknownGroup { group }) => assert_eq!(group, "ghost"),
            other => unreachable!("Expected UnknownGroup, got {other:?}"),
        }
    }
}

//! Tests for embed discovery and fuzzy search

#[cfg(test)]
mod tests {
    use promptembed::io::index::{EmbedEntry, EmbedIndex, fuzzy_match, match_score};
    use std::fs;
    use tempfile::TempDir;

    fn entry(relative_path: &str) -> EmbedEntry {
        let Some(entry) = EmbedEntry::from_relative_path(relative_path) else {
            unreachable!("'{relative_path}' should be a document path");
        };
        entry
    }

    fn names(entries: &[&EmbedEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name.clone()).collect()
    }

    // Tests relative paths split into name, folder and file name
    // Verified by keeping the extension in the name
    #[test]
    fn test_entry_from_relative_path() {
        assert_eq!(
            EmbedEntry::from_relative_path("hair/long/color.yml"),
            Some(EmbedEntry {
                name: "hair/long/color".to_string(),
                file_name: "color".to_string(),
                folder: "hair/long".to_string(),
                relative_path: "hair/long/color.yml".to_string(),
            })
        );
        assert_eq!(entry("mood.txt").folder, "");
        assert!(EmbedEntry::from_relative_path("notes.md").is_none());
        assert!(EmbedEntry::from_relative_path("README").is_none());
        assert!(EmbedEntry::from_relative_path("hidden/.yml").is_none());
    }

    // Tests duplicate names keep the document the store would load
    // Verified by keeping the last entry per name
    #[test]
    fn test_from_entries_dedup() {
        let index = EmbedIndex::from_entries(vec![
            entry("mood.txt"),
            entry("hair.yaml"),
            entry("mood.yml"),
            entry("hair.txt"),
        ]);

        let paths: Vec<&str> = index
            .entries()
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["hair.yaml", "mood.yml"]);
        assert_eq!(index.len(), 2);
    }

    // Tests subsequence matching
    // Verified by requiring contiguous matches
    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("hair/color", "hc"));
        assert!(fuzzy_match("hair/color", ""));
        assert!(!fuzzy_match("hair/color", "ch"));
        assert!(!fuzzy_match("mood", "moods"));
    }

    // Tests scoring rewards runs, completion and prefixes
    // Verified by scoring every match equally
    #[test]
    fn test_match_score() {
        assert_eq!(match_score("abc", "abc"), 13);
        assert_eq!(match_score("xaxbxc", "abc"), 8);
        assert_eq!(match_score("abx", "abc"), 3);
        assert!(match_score("hat", "ha") > match_score("shade", "ha"));
    }

    // Tests search ordering, case folding and limits
    // Verified by sorting results by name only
    #[test]
    fn test_search() {
        let index = EmbedIndex::from_entries(vec![
            entry("shade.yml"),
            entry("hat.yml"),
            entry("hair/color.yml"),
            entry("shoes.txt"),
        ]);

        assert_eq!(names(&index.search("HA", 10)), vec!["hair/color", "hat", "shade"]);
        assert_eq!(names(&index.search("ha", 1)), vec!["hair/color"]);
        assert!(index.search("zz", 10).is_empty());
    }

    // Tests directory scanning with nested folders and foreign files
    // Verified by indexing every file regardless of extension
    #[test]
    fn test_scan_directory() {
        let Ok(dir) = TempDir::new() else {
            unreachable!("Temporary directory should be creatable");
        };
        let root = dir.path();
        assert!(fs::create_dir_all(root.join("hair")).is_ok());
        for (relative, content) in [
            ("hair/color.yml", "tagset: {}\n"),
            ("hair/color.txt", "red\n"),
            ("mood.txt", "sad\n"),
            ("notes.md", "ignored\n"),
        ] {
            assert!(fs::write(root.join(relative), content).is_ok());
        }

        let index = EmbedIndex::scan(root);
        let found: Vec<(&str, &str)> = index
            .entries()
            .iter()
            .map(|e| (e.name.as_str(), e.relative_path.as_str()))
            .collect();

        assert_eq!(
            found,
            vec![("hair/color", "hair/color.yml"), ("mood", "mood.txt")]
        );
        assert!(EmbedIndex::scan(&root.join("missing")).is_empty());
    }
}

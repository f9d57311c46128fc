//! `[content]` section configuration.
//!
//! ```toml
//! [content]
//! dir = "src/content"     # Content root (relative to site root)
//! collection = "blog"     # Collection directory under `dir`
//! slug = "safe"           # safe | ascii
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod fields {
    use super::FieldPath;

    pub const DIR: FieldPath = FieldPath::new("content.dir");
    pub const COLLECTION: FieldPath = FieldPath::new("content.collection");
}

/// How entry paths become slugs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    /// Lowercase, drop punctuation, keep Unicode letters (default).
    #[default]
    Safe,
    /// Like `safe`, but transliterate Unicode to ASCII first.
    Ascii,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub dir: PathBuf,
    pub collection: String,
    pub slug: SlugMode,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: "src/content".into(),
            collection: "blog".into(),
            slug: SlugMode::Safe,
        }
    }
}

impl ContentConfig {
    /// Directory holding the configured collection's entries.
    pub fn collection_dir(&self) -> PathBuf {
        self.dir.join(&self.collection)
    }

    /// Raw path checks, run before paths are made absolute.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        if self.dir.is_absolute() {
            diag.error_with_hint(
                fields::DIR,
                format!("must be relative, got '{}'", self.dir.display()),
                "paths are resolved against the directory holding folio.toml",
            );
        }
        let name = Path::new(&self.collection);
        if self.collection.is_empty() || name.components().count() != 1 {
            diag.error_with_hint(
                fields::COLLECTION,
                format!("invalid collection name '{}'", self.collection),
                "use a single directory name, e.g. \"blog\"",
            );
        }
    }

    /// Checks on the normalized (absolute) paths.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let dir = self.collection_dir();
        if !dir.is_dir() {
            diag.error_with_hint(
                fields::COLLECTION,
                format!("collection directory '{}' does not exist", dir.display()),
                format!("create it or change {}", fields::DIR),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.content.dir, PathBuf::from("src/content"));
        assert_eq!(config.content.collection, "blog");
        assert_eq!(config.content.slug, SlugMode::Safe);
        assert_eq!(
            config.content.collection_dir(),
            PathBuf::from("src/content/blog")
        );
    }

    #[test]
    fn test_custom() {
        let config =
            test_parse_config("[content]\ndir = \"posts\"\ncollection = \"notes\"\nslug = \"ascii\"");
        assert_eq!(config.content.collection_dir(), PathBuf::from("posts/notes"));
        assert_eq!(config.content.slug, SlugMode::Ascii);
    }

    #[test]
    fn test_validate_paths() {
        let mut diag = ConfigDiagnostics::new();
        ContentConfig {
            dir: "/abs".into(),
            collection: "a/b".into(),
            slug: SlugMode::Safe,
        }
        .validate_paths(&mut diag);
        assert_eq!(diag.errors().len(), 2);
    }

    #[test]
    fn test_validate_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = ContentConfig::default();
        config.dir = tmp.path().to_path_buf();

        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.has_errors());

        std::fs::create_dir_all(tmp.path().join("blog")).unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(!diag.has_errors());
    }
}

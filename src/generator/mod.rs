//! Generated documents.
//!
//! - **Feed**: RSS 2.0 from the validated collection (`rss.xml`)
//! - **Robots**: crawler directives (`robots.txt`)
//! - **Sitemap**: index + url set (`sitemap-index.xml`, `sitemap-0.xml`)
//!
//! Every generator is a pure function of config, entries and a
//! [`RequestContext`]; `build` writes the result to disk, `serve` returns it
//! as a response body.

mod context;
pub mod feed;
pub mod robots;
pub mod sitemap;

pub use context::RequestContext;

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Drop indentation and line breaks between elements.
///
/// Only for documents whose text content never spans lines (sitemaps).
pub fn minify_xml(content: &str, enabled: bool) -> Cow<'_, str> {
    if !enabled {
        return Cow::Borrowed(content);
    }
    Cow::Owned(
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(""),
    )
}

/// Write `content` to `path` (relative to `output_dir`), creating parents.
pub fn write_output(output_dir: &Path, path: &str, content: &str) -> Result<PathBuf> {
    let target = output_dir.join(path.trim_start_matches('/'));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&target, content)
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_xml() {
        let xml = "<?xml version=\"1.0\"?>\n<root>\n\n  <item>Hello</item>\n</root>\n";
        assert_eq!(
            minify_xml(xml, true),
            "<?xml version=\"1.0\"?><root><item>Hello</item></root>"
        );
        assert_eq!(minify_xml(xml, false), xml);
    }

    #[test]
    fn test_write_output_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_output(tmp.path(), "/maps/index.xml", "<x/>").unwrap();
        assert_eq!(path, tmp.path().join("maps/index.xml"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<x/>");
    }
}

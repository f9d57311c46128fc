//! Entry slugs derived from storage paths.
//!
//! `2024/Hello World.md` -> `2024/hello-world`, `guides/index.md` -> `guides`.

use crate::config::SlugMode;
use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

/// Characters dropped from a slug segment.
static RE_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\p{M}\s_-]").expect("valid regex"));

static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s").expect("valid regex"));

/// Slugify one path segment.
pub fn slugify(segment: &str, mode: SlugMode) -> String {
    let text = match mode {
        SlugMode::Safe => segment.to_lowercase(),
        SlugMode::Ascii => deunicode::deunicode(segment).to_lowercase(),
    };
    let text = RE_UNSAFE.replace_all(text.trim(), "");
    RE_SPACE.replace_all(&text, "-").into_owned()
}

/// Slug for an entry at `relative` (relative to its collection directory).
pub fn slug_from_path(relative: &Path, mode: SlugMode) -> String {
    let without_ext = relative.with_extension("");
    let segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(slugify(&s.to_string_lossy(), mode)),
            _ => None,
        })
        .collect();

    let mut slug = segments.join("/");
    if let Some(parent) = slug.strip_suffix("/index") {
        slug = parent.to_string();
    }
    slug
}

/// Normalize a slug set explicitly in frontmatter.
pub fn normalize_explicit(slug: &str) -> String {
    slug.trim().trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_slugify_safe() {
        assert_eq!(slugify("Hello World", SlugMode::Safe), "hello-world");
        assert_eq!(slugify("Rust: Ownership!", SlugMode::Safe), "rust-ownership");
        assert_eq!(slugify("snake_case-ok", SlugMode::Safe), "snake_case-ok");
        assert_eq!(slugify("Café Crème", SlugMode::Safe), "café-crème");
    }

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Café Crème", SlugMode::Ascii), "cafe-creme");
    }

    #[test]
    fn test_slug_from_path() {
        let slug = |p: &str| slug_from_path(&PathBuf::from(p), SlugMode::Safe);
        assert_eq!(slug("first-post.md"), "first-post");
        assert_eq!(slug("2024/Hello World.mdx"), "2024/hello-world");
        assert_eq!(slug("guides/index.md"), "guides");
        assert_eq!(slug("index.md"), "index");
    }

    #[test]
    fn test_normalize_explicit() {
        assert_eq!(normalize_explicit("/custom/path/"), "custom/path");
        assert_eq!(normalize_explicit(" plain "), "plain");
    }
}

//! Load a named collection: every Markdown entry under
//! `{content.dir}/{collection}`, validated against the post schema.
//!
//! The read fails closed. Any invalid entry fails the whole collection, and
//! the error lists every problem found, not just the first.

use super::frontmatter::{self, FrontmatterError};
use super::schema::{Post, RawPost, SchemaError};
use super::slug::{normalize_explicit, slug_from_path};
use crate::config::{ContentConfig, SlugMode};
use crate::image::AssetResolver;
use crate::utils::plural_count;
use jwalk::WalkDir;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File extensions treated as entries.
const ENTRY_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

/// One validated entry of a collection.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Path relative to the collection directory, `/`-separated.
    pub id: String,
    pub slug: String,
    pub post: Post,
}

/// All entries of one collection, in path order.
#[derive(Debug, Clone)]
pub struct Collection {
    pub name: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("collection directory '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("{}: cannot list directory", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: jwalk::Error,
    },

    #[error("{entry}: cannot read file")]
    Read {
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{entry}: {source}")]
    Frontmatter {
        entry: String,
        source: FrontmatterError,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{entry}: slug must be a non-empty string")]
    InvalidSlug { entry: String },

    #[error("duplicate slug '{slug}' for {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("{}", InvalidList(.collection, .errors))]
    Invalid {
        collection: String,
        errors: Vec<CollectionError>,
    },
}

/// Display helper for [`CollectionError::Invalid`].
struct InvalidList<'a>(&'a str, &'a [CollectionError]);

impl fmt::Display for InvalidList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.1.len() == 1 { "entry" } else { "entries" };
        write!(f, "collection '{}' has {} invalid {noun}", self.0, self.1.len())?;
        for error in self.1 {
            write!(f, "\n{error}")?;
        }
        Ok(())
    }
}

impl CollectionError {
    /// Individual problems, flattened out of [`CollectionError::Invalid`].
    pub fn problems(&self) -> Vec<&CollectionError> {
        match self {
            Self::Invalid { errors, .. } => errors.iter().collect(),
            other => vec![other],
        }
    }
}

impl Collection {
    /// Load and validate the collection configured in `[content]`.
    ///
    /// Entries are parsed and validated in parallel; the result keeps path
    /// order.
    pub fn load(config: &ContentConfig, resolver: &dyn AssetResolver) -> Result<Self, CollectionError> {
        let dir = config.collection_dir();
        if !dir.is_dir() {
            return Err(CollectionError::NotFound(dir));
        }

        let (paths, mut errors) = collect_entry_paths(&dir);
        crate::debug!("content"; "{} in {}", plural_count(paths.len(), "file"), dir.display());

        let results: Vec<Result<Entry, CollectionError>> = paths
            .par_iter()
            .map(|path| load_entry(&dir, path, config.slug, resolver))
            .collect();

        let mut entries = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(entry) => entries.push(entry),
                Err(err) => errors.push(err),
            }
        }
        errors.extend(check_duplicate_slugs(&entries));

        if !errors.is_empty() {
            return Err(CollectionError::Invalid {
                collection: config.collection.clone(),
                errors,
            });
        }

        Ok(Self {
            name: config.collection.clone(),
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}

/// Entry files under `dir`, sorted by path, plus every directory that could
/// not be listed.
///
/// Files and directories starting with `_` or `.` are skipped.
fn collect_entry_paths(dir: &Path) -> (Vec<PathBuf>, Vec<CollectionError>) {
    let mut paths = Vec::new();
    let mut errors = Vec::new();

    for item in WalkDir::new(dir) {
        let mut entry = match item {
            Ok(entry) => entry,
            Err(source) => {
                let path = source.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                if !is_skipped(dir, &path) {
                    errors.push(CollectionError::Walk { path, source });
                }
                continue;
            }
        };

        let path = entry.path();
        if is_skipped(dir, &path) {
            continue;
        }
        // A directory that cannot be read still comes back as an entry
        if let Some(source) = entry.read_children_error.take() {
            errors.push(CollectionError::Walk { path, source });
            continue;
        }

        let is_entry = entry.file_type().is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ENTRY_EXTENSIONS.contains(&ext));
        if is_entry {
            paths.push(path);
        }
    }

    paths.sort();
    (paths, errors)
}

/// Any component below `dir` starts with `_` or `.`.
fn is_skipped(dir: &Path, path: &Path) -> bool {
    path.strip_prefix(dir).is_ok_and(|rel| {
        rel.components().any(|c| match c {
            Component::Normal(s) => {
                let s = s.to_string_lossy();
                s.starts_with('_') || s.starts_with('.')
            }
            _ => false,
        })
    })
}

fn entry_id(dir: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(dir).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn load_entry(
    dir: &Path,
    path: &Path,
    mode: SlugMode,
    resolver: &dyn AssetResolver,
) -> Result<Entry, CollectionError> {
    let id = entry_id(dir, path);
    let content = fs::read_to_string(path).map_err(|source| CollectionError::Read {
        entry: id.clone(),
        source,
    })?;

    let (fields, _body) =
        frontmatter::extract(&content).map_err(|source| CollectionError::Frontmatter {
            entry: id.clone(),
            source,
        })?;
    let raw = RawPost::from_fields(fields);

    let slug = match &raw.slug {
        None => slug_from_path(path.strip_prefix(dir).unwrap_or(path), mode),
        Some(Value::String(s)) if !normalize_explicit(s).is_empty() => normalize_explicit(s),
        Some(_) => return Err(CollectionError::InvalidSlug { entry: id }),
    };

    let post = Post::validate(&id, &raw, path, resolver)?;

    Ok(Entry {
        id,
        slug,
        post,
    })
}

fn check_duplicate_slugs(entries: &[Entry]) -> Vec<CollectionError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    let mut errors = Vec::new();
    for entry in entries {
        if let Some(first) = seen.insert(&entry.slug, &entry.id) {
            errors.push(CollectionError::DuplicateSlug {
                slug: entry.slug.clone(),
                first: first.to_string(),
                second: entry.id.clone(),
            });
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::schema::tests::FakeResolver;
    use crate::image::FsAssetResolver;
    use crate::utils::date::DateTimeUtc;

    const FRONTMATTER: &str = "title: Post\ndescription: About things\npubDate: 2024-01-01\nupdatedDate: 2024-01-02\nheroImage: ./hero.png\nsocialImage: ./social.png\nimageAlt: alt text\ntags: [a, b]";

    fn write_entry(dir: &Path, rel: &str, frontmatter: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("---\n{frontmatter}\n---\n\nBody of {rel}\n")).unwrap();
    }

    fn config(dir: &Path) -> ContentConfig {
        ContentConfig {
            dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_in_path_order() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = tmp.path().join("blog");
        write_entry(&blog, "zeta.md", FRONTMATTER);
        write_entry(&blog, "alpha.md", FRONTMATTER);
        write_entry(&blog, "2024/Second Post.mdx", FRONTMATTER);
        write_entry(&blog, "guides/index.md", FRONTMATTER);

        let collection = Collection::load(&config(tmp.path()), &FakeResolver).unwrap();
        assert_eq!(collection.name, "blog");

        let slugs: Vec<_> = collection.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["2024/second-post", "alpha", "guides", "zeta"]);

        let first = &collection.entries[0];
        assert_eq!(first.id, "2024/Second Post.mdx");
        assert_eq!(first.post.pub_date, DateTimeUtc::from_ymd(2024, 1, 1));
    }

    #[test]
    fn test_skips_drafts_and_other_files() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = tmp.path().join("blog");
        write_entry(&blog, "post.md", FRONTMATTER);
        write_entry(&blog, "_draft.md", FRONTMATTER);
        write_entry(&blog, "_wip/post.md", FRONTMATTER);
        fs::write(blog.join("notes.txt"), "not an entry").unwrap();

        let collection = Collection::load(&config(tmp.path()), &FakeResolver).unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_empty_collection() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("blog")).unwrap();
        let collection = Collection::load(&config(tmp.path()), &FakeResolver).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Collection::load(&config(tmp.path()), &FakeResolver).unwrap_err();
        assert!(matches!(err, CollectionError::NotFound(_)));
    }

    #[test]
    fn test_fails_closed_with_all_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = tmp.path().join("blog");
        write_entry(&blog, "good.md", FRONTMATTER);
        write_entry(&blog, "no-title.md", &FRONTMATTER.replace("title: Post\n", ""));
        fs::write(blog.join("plain.md"), "# no frontmatter").unwrap();

        let err = Collection::load(&config(tmp.path()), &FakeResolver).unwrap_err();
        let problems = err.problems();
        assert_eq!(problems.len(), 2);
        assert!(matches!(
            problems[0],
            CollectionError::Schema(e) if e.entry == "no-title.md" && e.has_issue("title")
        ));
        assert!(matches!(
            problems[1],
            CollectionError::Frontmatter { entry, source: FrontmatterError::Missing } if entry == "plain.md"
        ));

        let text = err.to_string();
        assert!(text.starts_with("collection 'blog' has 2 invalid entries"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_directory_fails() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let blog = tmp.path().join("blog");
        write_entry(&blog, "good.md", FRONTMATTER);
        write_entry(&blog, "2024/hidden.md", FRONTMATTER);
        write_entry(&blog, "_drafts/wip.md", FRONTMATTER);

        let locked = blog.join("2024");
        let drafts = blog.join("_drafts");
        for dir in [&locked, &drafts] {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
        }
        // Permission bits do not stop root
        if fs::read_dir(&locked).is_ok() {
            return;
        }

        let result = Collection::load(&config(tmp.path()), &FakeResolver);
        for dir in [&locked, &drafts] {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let err = result.unwrap_err();
        let problems = err.problems();
        assert_eq!(problems.len(), 1);
        assert!(matches!(
            problems[0],
            CollectionError::Walk { path, .. } if path.ends_with("2024")
        ));
        assert!(err.to_string().contains("cannot list directory"));
    }

    #[test]
    fn test_explicit_slug_and_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = tmp.path().join("blog");
        write_entry(&blog, "a.md", &format!("{FRONTMATTER}\nslug: /custom/"));
        write_entry(&blog, "custom.md", FRONTMATTER);

        let err = Collection::load(&config(tmp.path()), &FakeResolver).unwrap_err();
        assert!(matches!(
            err.problems()[0],
            CollectionError::DuplicateSlug { slug, first, second }
                if slug == "custom" && first == "a.md" && second == "custom.md"
        ));
    }

    #[test]
    fn test_invalid_explicit_slug() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = tmp.path().join("blog");
        write_entry(&blog, "a.md", &format!("{FRONTMATTER}\nslug: 12"));

        let err = Collection::load(&config(tmp.path()), &FakeResolver).unwrap_err();
        assert!(matches!(
            err.problems()[0],
            CollectionError::InvalidSlug { .. }
        ));
    }

    #[test]
    fn test_load_with_filesystem_images() {
        let tmp = tempfile::tempdir().unwrap();
        let blog = tmp.path().join("blog");
        write_entry(&blog, "post/index.md", FRONTMATTER);
        for name in ["hero.png", "social.png"] {
            image::RgbImage::new(16, 9)
                .save(blog.join("post").join(name))
                .unwrap();
        }

        let resolver = FsAssetResolver::new(tmp.path());
        let collection = Collection::load(&config(tmp.path()), &resolver).unwrap();
        let entry = &collection.entries[0];
        assert_eq!(entry.slug, "post");
        assert_eq!(
            (entry.post.social_image.width, entry.post.social_image.height),
            (16, 9)
        );
    }
}

//! Resolve frontmatter image references against the filesystem.

use super::{ImageAsset, ImageError};
use std::path::{Path, PathBuf};

/// Resolves an image reference found in an entry's frontmatter.
pub trait AssetResolver: Sync {
    fn resolve(&self, reference: &str, entry_path: &Path) -> Result<ImageAsset, ImageError>;
}

/// Resolver for local files.
///
/// - `./cover.png`, `../shared/cover.png`, `cover.png`: relative to the entry file
/// - `/images/cover.png`: relative to the content directory
pub struct FsAssetResolver {
    root: PathBuf,
}

impl FsAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, reference: &str, entry_path: &Path) -> Result<PathBuf, ImageError> {
        if reference.contains("://") || reference.starts_with("//") {
            return Err(ImageError::Remote(reference.to_string()));
        }

        let path = match reference.strip_prefix('/') {
            Some(rooted) => self.root.join(rooted),
            None => entry_path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(reference),
        };

        if path.is_file() {
            Ok(path)
        } else {
            Err(ImageError::NotFound(path))
        }
    }
}

impl AssetResolver for FsAssetResolver {
    fn resolve(&self, reference: &str, entry_path: &Path) -> Result<ImageAsset, ImageError> {
        let path = self.locate(reference, entry_path)?;
        let (width, height) =
            ::image::image_dimensions(&path).map_err(|source| ImageError::Decode {
                path: path.clone(),
                source,
            })?;

        Ok(ImageAsset {
            reference: reference.to_string(),
            path,
            width,
            height,
        })
    }
}

//! Image collaborators.
//!
//! - [`AssetResolver`]: turns a frontmatter image reference into an
//!   [`ImageAsset`] with pixel dimensions (used by schema validation).
//! - [`ImageTransformer`]: re-encodes an asset into a servable file
//!   (used by the feed mapper for `<media:content>`).
//!
//! Both are traits so the content and feed layers can be exercised with
//! in-memory fakes.

mod process;
mod resolve;

pub use process::{ImageProcessor, ImageTransformer};
pub use resolve::{AssetResolver, FsAssetResolver};

#[cfg(test)]
pub(crate) use process::TransformedImage;

use std::path::PathBuf;
use thiserror::Error;

/// A resolved image referenced by a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Reference as written in frontmatter.
    pub reference: String,
    /// Absolute path of the source file.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("remote image '{0}' is not supported, use a local file")]
    Remote(String),

    #[error("image '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read image '{}'", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("cannot encode image '{}'", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("I/O error on '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

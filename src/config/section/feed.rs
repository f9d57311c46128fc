//! `[feed]` section configuration.
//!
//! ```toml
//! [feed]
//! enable = true
//! path = "rss.xml"             # Feed location, relative to the site URL
//! link_prefix = "/articles/"   # Item link = prefix + slug + "/"
//! social_images = true         # Embed <media:content> from socialImage
//! image_format = "jpeg"        # Encoding social images are converted to
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::mime;
use serde::{Deserialize, Serialize};

pub mod fields {
    use super::FieldPath;

    pub const PATH: FieldPath = FieldPath::new("feed.path");
    pub const LINK_PREFIX: FieldPath = FieldPath::new("feed.link_prefix");
}

/// Encoding processed images are normalized to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl ImageEncoding {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => mime::types::JPEG,
            Self::Png => mime::types::PNG,
            Self::Webp => mime::types::WEBP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    pub path: String,
    pub link_prefix: String,
    pub social_images: bool,
    pub image_format: ImageEncoding,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "rss.xml".into(),
            link_prefix: "/articles/".into(),
            social_images: true,
            image_format: ImageEncoding::Jpeg,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_site_path(&self.path, fields::PATH, diag);

        if !self.link_prefix.starts_with('/') || !self.link_prefix.ends_with('/') {
            diag.error_with_hint(
                fields::LINK_PREFIX,
                format!("'{}' must start and end with '/'", self.link_prefix),
                "e.g.: link_prefix = \"/articles/\"",
            );
        }
    }
}

/// Shared check for output file paths served from the site root.
pub fn validate_site_path(path: &str, field: FieldPath, diag: &mut ConfigDiagnostics) {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.ends_with('/') {
        diag.error_with_hint(
            field,
            format!("'{path}' is not a file path"),
            "use a file name such as \"rss.xml\"",
        );
    } else if trimmed.split('/').any(|seg| seg == ".." || seg == ".") {
        diag.error(field, format!("'{path}' must not contain '.' or '..' segments"));
    }
}

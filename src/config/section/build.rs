//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! output = "dist"        # Output directory (relative to site root)
//! assets = "_assets"     # Processed images, under output
//! minify = false         # Strip whitespace from generated XML
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub mod fields {
    use super::FieldPath;

    pub const OUTPUT: FieldPath = FieldPath::new("build.output");
    pub const ASSETS: FieldPath = FieldPath::new("build.assets");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    pub output: PathBuf,

    /// Directory under `output` for processed images; also their URL path.
    pub assets: String,

    pub minify: bool,

    /// Clean output directory before building (CLI only).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            output: "dist".into(),
            assets: "_assets".into(),
            minify: false,
            clean: false,
        }
    }
}

impl BuildSectionConfig {
    /// Absolute directory processed images are written to.
    pub fn assets_dir(&self) -> PathBuf {
        self.output.join(&self.assets)
    }

    /// Raw path checks, run before paths are made absolute.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        if self.output.is_absolute() {
            diag.error(
                fields::OUTPUT,
                format!("must be relative, got '{}'", self.output.display()),
            );
        }

        let assets = Path::new(&self.assets);
        let is_plain = !self.assets.is_empty()
            && assets
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            diag.error_with_hint(
                fields::ASSETS,
                format!("'{}' must be a relative directory name", self.assets),
                "e.g.: assets = \"_assets\"",
            );
        }
    }
}

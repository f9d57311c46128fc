//! `[robots]` and `[sitemap]` section configuration.
//!
//! ```toml
//! [robots]
//! enable = true
//! path = "robots.txt"
//!
//! [sitemap]
//! enable = true
//! path = "sitemap-index.xml"   # Also the target of robots' Sitemap: line
//! ```

use super::feed::validate_site_path;
use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

pub mod fields {
    use super::FieldPath;

    pub const ROBOTS_PATH: FieldPath = FieldPath::new("robots.path");
    pub const SITEMAP_PATH: FieldPath = FieldPath::new("sitemap.path");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub enable: bool,
    pub path: String,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "robots.txt".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub enable: bool,
    pub path: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "sitemap-index.xml".into(),
        }
    }
}

impl SitemapConfig {
    /// The single url-set file the index points at, next to the index.
    pub fn urlset_path(&self) -> String {
        match self.path.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/sitemap-0.xml"),
            None => "sitemap-0.xml".into(),
        }
    }
}

pub fn validate(robots: &RobotsConfig, sitemap: &SitemapConfig, diag: &mut ConfigDiagnostics) {
    validate_site_path(&robots.path, fields::ROBOTS_PATH, diag);
    validate_site_path(&sitemap.path, fields::SITEMAP_PATH, diag);

    if sitemap.enable && sitemap.urlset_path() == sitemap.path {
        diag.error(
            fields::SITEMAP_PATH,
            "sitemap index would overwrite the url-set file 'sitemap-0.xml'",
        );
    }

    // robots.txt always carries the Sitemap: line
    if robots.enable && !sitemap.enable {
        diag.warn(
            fields::SITEMAP_PATH,
            format!(
                "sitemaps are disabled, but robots.txt still points crawlers at '{}'",
                sitemap.path
            ),
        );
    }
}

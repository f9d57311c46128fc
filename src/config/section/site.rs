//! `[site]` section configuration.
//!
//! Site metadata used for the feed channel and every absolute URL.

use crate::config::{ConfigDiagnostics, FieldPath, util::normalize_base_url};
use serde::{Deserialize, Serialize};
use url::Url;

pub mod fields {
    use super::FieldPath;

    pub const TITLE: FieldPath = FieldPath::new("site.title");
    pub const DESCRIPTION: FieldPath = FieldPath::new("site.description");
    pub const URL: FieldPath = FieldPath::new("site.url");
    pub const LANGUAGE: FieldPath = FieldPath::new("site.language");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Site title (feed channel title).
    pub title: String,

    /// Site description (feed channel description).
    pub description: String,

    /// Deployed base URL, e.g. `https://example.com/` or `https://example.com/blog/`.
    pub url: Option<String>,

    /// Language code (e.g., "en", "zh-Hans").
    pub language: String,
}

impl Default for SiteInfoConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            url: None,
            language: "en".into(),
        }
    }
}

impl SiteInfoConfig {
    /// Base URL with a guaranteed trailing slash, if configured and valid.
    pub fn base_url(&self) -> Option<Url> {
        self.url.as_deref().and_then(|u| normalize_base_url(u).ok())
    }

    /// Validate site configuration.
    ///
    /// `url_required` is false for commands that never build absolute links.
    pub fn validate(&self, url_required: bool, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error_with_hint(
                fields::TITLE,
                "site title is empty",
                "set a title, it becomes the feed's channel title",
            );
        }
        if self.description.trim().is_empty() {
            diag.error_with_hint(
                fields::DESCRIPTION,
                "site description is empty",
                "RSS channels require a description",
            );
        }
        if self.language.trim().is_empty() {
            diag.warn(fields::LANGUAGE, "language is empty, feed will omit it");
        }

        let Some(url_str) = &self.url else {
            if url_required {
                diag.error_with_hint(
                    fields::URL,
                    format!("{} is not configured", fields::URL),
                    "set it, e.g.: url = \"https://example.com/\"",
                );
            }
            return;
        };

        match Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        fields::URL,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com/",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        fields::URL,
                        "URL must have a valid host",
                        "use format like https://example.com/",
                    );
                }
                if parsed.query().is_some() || parsed.fragment().is_some() {
                    diag.error(fields::URL, "URL must not carry a query or fragment");
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    fields::URL,
                    format!("invalid URL: {e}"),
                    "use format like https://example.com/",
                );
            }
        }
    }
}

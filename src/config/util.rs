//! Configuration utility functions.

use std::path::{Path, PathBuf};
use url::Url;

/// Parse a site URL and make sure its path ends with `/`.
///
/// Relative joins against the result then stay inside the site:
/// `https://example.com/blog` + `rss.xml` -> `https://example.com/blog/rss.xml`.
pub fn normalize_base_url(url_str: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(url_str)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Make a path absolute, resolving symlinks when the path exists.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Find config file by searching upward from current directory
///
/// ```text
/// /home/user/site/src/content/blog/  ← cwd
/// /home/user/site/folio.toml         ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

// ============================================================================
// tests
// ============================================================================

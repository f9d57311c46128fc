//! Request path to generated document.

use crate::config::SiteConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Feed,
    Robots,
    SitemapIndex,
    SitemapUrlset,
    /// A processed image already on disk.
    Asset(PathBuf),
    NotFound,
}

/// Map a request URL (path plus optional query) to a route.
///
/// `site_path` is the path of the site URL (`/` or `/blog/`); requests
/// outside it are not ours.
pub fn route(url: &str, site_path: &str, config: &SiteConfig) -> Route {
    let decoded = normalize_url(url);
    let prefix = site_path.trim_matches('/');
    let Some(rel) = strip_site_prefix(&decoded, prefix) else {
        return Route::NotFound;
    };

    if config.feed.enable && rel == config.feed.path.trim_matches('/') {
        return Route::Feed;
    }
    if config.robots.enable && rel == config.robots.path.trim_matches('/') {
        return Route::Robots;
    }
    if config.sitemap.enable {
        if rel == config.sitemap.path.trim_matches('/') {
            return Route::SitemapIndex;
        }
        if rel == config.sitemap.urlset_path().trim_matches('/') {
            return Route::SitemapUrlset;
        }
    }

    let assets = config.build.assets.trim_matches('/');
    if let Some(name) = rel.strip_prefix(assets).and_then(|r| r.strip_prefix('/'))
        && let Some(path) = resolve_asset(name, &config.build.assets_dir())
    {
        return Route::Asset(path);
    }

    Route::NotFound
}

fn strip_site_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    match path.strip_prefix(prefix)? {
        "" => Some(""),
        rest => rest.strip_prefix('/'),
    }
}

/// Resolve `name` under `assets_dir`, rejecting anything that escapes it.
fn resolve_asset(name: &str, assets_dir: &Path) -> Option<PathBuf> {
    if name.is_empty() || name.contains("..") {
        return None;
    }

    // Canonicalize so symlinks cannot point outside the directory
    let canonical = assets_dir.join(name).canonicalize().ok()?;
    let root = assets_dir.canonicalize().ok()?;
    (canonical.starts_with(&root) && canonical.is_file()).then_some(canonical)
}

/// Decode, strip query string, trim slashes.
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    decoded.trim_matches('/').to_string()
}

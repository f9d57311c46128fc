//! URLs a generator needs to build absolute links.

use anyhow::{Context, Result};
use url::Url;

/// The site base URL plus the URL of the request being answered.
///
/// Item links resolve against `site`. The feed's self link and media URLs
/// resolve against `request_url`, so a feed fetched from a dev server points
/// back at that server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Base URL with trailing slash.
    pub site: Url,
    pub request_url: Url,
}

impl RequestContext {
    pub fn new(site: Url, request_url: Url) -> Self {
        Self { site, request_url }
    }

    /// Context for writing files: there is no request, so the document's own
    /// location under the site stands in for it.
    pub fn for_build(site: &Url, document: &str) -> Result<Self> {
        let request_url = site
            .join(document.trim_start_matches('/'))
            .with_context(|| format!("cannot place '{document}' under {site}"))?;
        Ok(Self::new(site.clone(), request_url))
    }

    /// Root-relative URL path of a site-relative path, keeping the site's
    /// path prefix: `rss.xml` -> `/blog/rss.xml` for `https://x.dev/blog/`.
    pub fn site_path(&self, path: &str) -> String {
        format!("{}{}", self.site.path(), path.trim_start_matches('/'))
    }

    /// Absolute URL of a site-relative path.
    pub fn site_url(&self, path: &str) -> Result<Url> {
        self.site
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid site path '{path}'"))
    }

    /// Resolve `reference` against the request URL.
    pub fn resolve(&self, reference: &str) -> Result<Url> {
        self.request_url
            .join(reference)
            .with_context(|| format!("cannot resolve '{reference}' against {}", self.request_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_for_build() {
        let ctx = RequestContext::for_build(&url("https://example.com/"), "rss.xml").unwrap();
        assert_eq!(ctx.request_url.as_str(), "https://example.com/rss.xml");
    }

    #[test]
    fn test_site_path_keeps_prefix() {
        let ctx = RequestContext::for_build(&url("https://example.com/blog/"), "/rss.xml").unwrap();
        assert_eq!(ctx.request_url.as_str(), "https://example.com/blog/rss.xml");
        assert_eq!(ctx.site_path("rss.xml"), "/blog/rss.xml");
        assert_eq!(
            ctx.site_url("/articles/a/").unwrap().as_str(),
            "https://example.com/blog/articles/a/"
        );
    }

    #[test]
    fn test_resolve_against_request() {
        let ctx = RequestContext::new(
            url("https://example.com/"),
            url("http://127.0.0.1:4321/rss.xml?utm=x"),
        );
        assert_eq!(
            ctx.resolve("/_assets/a.jpg").unwrap().as_str(),
            "http://127.0.0.1:4321/_assets/a.jpg"
        );
        assert_eq!(
            ctx.site_url("articles/a/").unwrap().as_str(),
            "https://example.com/articles/a/"
        );
    }
}

//! `robots.txt`: allow every crawler, point at the sitemap index.

use crate::config::SiteConfig;
use anyhow::Result;
use url::Url;

/// Crawler directives for `site` (base URL with trailing slash).
pub fn robots_txt(site: &Url, sitemap_path: &str) -> String {
    [
        "User-agent: *",
        "Allow: /",
        "",
        &format!("Sitemap: {site}{}", sitemap_path.trim_start_matches('/')),
    ]
    .join("\n")
}

pub fn render_robots(config: &SiteConfig) -> Result<String> {
    Ok(robots_txt(&config.base_url()?, &config.sitemap.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_robots_exact() {
        let site = Url::parse("https://example.com/").unwrap();
        assert_eq!(
            robots_txt(&site, "sitemap-index.xml"),
            "User-agent: *\nAllow: /\n\nSitemap: https://example.com/sitemap-index.xml"
        );
    }

    #[test]
    fn test_robots_with_site_path() {
        let site = Url::parse("https://example.com/blog/").unwrap();
        assert!(
            robots_txt(&site, "/sitemap-index.xml")
                .ends_with("Sitemap: https://example.com/blog/sitemap-index.xml")
        );
    }

    #[test]
    fn test_render_from_config() {
        let config = test_parse_config("[sitemap]\npath = \"maps/index.xml\"");
        assert!(
            render_robots(&config)
                .unwrap()
                .ends_with("Sitemap: https://example.com/maps/index.xml")
        );
    }
}

//! Sitemap generation.
//!
//! `robots.txt` points crawlers at a sitemap index, which lists one url set:
//!
//! ```xml
//! <!-- sitemap-index.xml -->
//! <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <sitemap><loc>https://example.com/sitemap-0.xml</loc></sitemap>
//! </sitemapindex>
//!
//! <!-- sitemap-0.xml -->
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url><loc>https://example.com/</loc></url>
//!   <url><loc>https://example.com/articles/hello/</loc><lastmod>2025-01-01</lastmod></url>
//! </urlset>
//! ```

use crate::config::SiteConfig;
use crate::content::Entry;
use crate::generator::{RequestContext, feed::item_link};
use anyhow::Result;
use std::borrow::Cow;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Both sitemap documents, unminified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sitemaps {
    pub index: String,
    pub urlset: String,
}

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

/// Build the index and url set for the site root plus every entry.
pub fn render_sitemaps(config: &SiteConfig, entries: &[Entry]) -> Result<Sitemaps> {
    let site = config.base_url()?;
    let ctx = RequestContext::new(site.clone(), site.clone());

    let mut urls = Vec::with_capacity(entries.len() + 1);
    urls.push(UrlEntry {
        loc: site.to_string(),
        lastmod: None,
    });
    for entry in entries {
        let link = item_link(&config.feed.link_prefix, &entry.slug);
        urls.push(UrlEntry {
            loc: ctx.site_url(&link)?.to_string(),
            lastmod: Some(entry.post.updated_date.to_date_string()),
        });
    }

    let urlset_loc = ctx.site_url(&config.sitemap.urlset_path())?;
    Ok(Sitemaps {
        index: index_xml(urlset_loc.as_str()),
        urlset: urlset_xml(&urls),
    })
}

fn index_xml(urlset_loc: &str) -> String {
    let mut xml = String::with_capacity(256);
    xml.push_str(XML_DECL);
    xml.push_str("<sitemapindex xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n  <sitemap>\n    <loc>");
    xml.push_str(&escape_xml(urlset_loc));
    xml.push_str("</loc>\n  </sitemap>\n</sitemapindex>\n");
    xml
}

fn urlset_xml(urls: &[UrlEntry]) -> String {
    let mut xml = String::with_capacity(128 * (urls.len() + 1));
    xml.push_str(XML_DECL);
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in urls {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&entry.loc));
        xml.push_str("</loc>\n");
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str("    <lastmod>");
            xml.push_str(lastmod);
            xml.push_str("</lastmod>\n");
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::generator::feed::test_entry as entry;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<'\">"), "&lt;&apos;&quot;&gt;");
    }

    #[test]
    fn test_index_points_at_urlset() {
        let config = test_parse_config("");
        let maps = render_sitemaps(&config, &[]).unwrap();

        assert!(maps.index.starts_with(XML_DECL));
        assert!(maps.index.contains("<loc>https://example.com/sitemap-0.xml</loc>"));
        assert_eq!(maps.urlset.matches("<url>").count(), 1);
        assert!(maps.urlset.contains("<loc>https://example.com/</loc>"));
    }

    #[test]
    fn test_urlset_lists_entries() {
        let config = test_parse_config("");
        let entries = vec![entry("first", "A"), entry("2024/second", "B")];
        let maps = render_sitemaps(&config, &entries).unwrap();

        assert_eq!(maps.urlset.matches("<url>").count(), 3);
        assert!(maps.urlset.contains("<loc>https://example.com/articles/first/</loc>"));
        assert!(
            maps.urlset
                .contains("<loc>https://example.com/articles/2024/second/</loc>")
        );
        // updatedDate of the shared fixture
        assert_eq!(maps.urlset.matches("<lastmod>2024-02-01</lastmod>").count(), 2);
    }

    #[test]
    fn test_nested_sitemap_path() {
        let mut config = test_parse_config("[sitemap]\npath = \"maps/index.xml\"");
        config.site.url = Some("https://example.com/blog/".into());
        let maps = render_sitemaps(&config, &[]).unwrap();
        assert!(
            maps.index
                .contains("<loc>https://example.com/blog/maps/sitemap-0.xml</loc>")
        );
    }
}

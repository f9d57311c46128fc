//! RSS 2.0 document assembly.
//!
//! ```xml
//! <rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/">
//!   <channel>
//!     <title>..</title><link>..</link><description>..</description>
//!     <atom:link href="https://example.com/rss.xml" rel="self" type="application/rss+xml"/>
//!     <item>
//!       <title>..</title><link>..</link><guid>..</guid><pubDate>..</pubDate>
//!       <category>..</category>
//!       <media:content type="image/jpeg" width=".." height=".." medium="image" url=".."/>
//!     </item>
//!   </channel>
//! </rss>
//! ```

use super::item::{FeedItem, MediaContent};
use crate::config::SiteConfig;
use crate::generator::RequestContext;
use crate::utils::mime;
use anyhow::{Result, anyhow};
use rss::extension::{Extension, ExtensionBuilder, ExtensionMap};
use rss::validation::Validate;
use rss::{CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use std::collections::BTreeMap;
use url::Url;

pub const MEDIA_NS: &str = "http://search.yahoo.com/mrss/";
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Channel-level metadata, taken from `[site]` and `[feed]`.
#[derive(Debug, Clone)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    pub site: Url,
    pub language: Option<String>,
    /// Feed location relative to the site, e.g. `rss.xml`.
    pub path: String,
}

impl FeedMeta {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            site: config.base_url()?,
            language: Some(config.site.language.clone()).filter(|l| !l.is_empty()),
            path: config.feed.path.clone(),
        })
    }
}

/// A complete feed, ready to serialize.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub meta: FeedMeta,
    pub items: Vec<FeedItem>,
}

impl FeedDocument {
    pub fn new(meta: FeedMeta, items: Vec<FeedItem>) -> Self {
        Self { meta, items }
    }

    pub fn to_channel(&self, ctx: &RequestContext) -> Result<Channel> {
        let self_link = ctx.resolve(&ctx.site_path(&self.meta.path))?;

        let items = self
            .items
            .iter()
            .map(|item| to_rss_item(item, ctx))
            .collect::<Result<Vec<_>>>()?;

        let namespaces = BTreeMap::from([
            ("atom".to_string(), ATOM_NS.to_string()),
            ("media".to_string(), MEDIA_NS.to_string()),
        ]);

        let channel = ChannelBuilder::default()
            .title(xml_text(&self.meta.title))
            .link(self.meta.site.to_string())
            .description(xml_text(&self.meta.description))
            .language(self.meta.language.clone())
            .generator(format!("folio {}", env!("CARGO_PKG_VERSION")))
            .namespaces(namespaces)
            .extensions(extension_map("atom", atom_self_link(&self_link)))
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
        Ok(channel)
    }

    /// Serialize to XML. Identical input gives identical bytes.
    pub fn to_xml(&self, ctx: &RequestContext) -> Result<String> {
        Ok(self.to_channel(ctx)?.to_string())
    }
}

fn to_rss_item(item: &FeedItem, ctx: &RequestContext) -> Result<Item> {
    let link = ctx.site_url(&item.link)?.to_string();

    let categories = item
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(xml_text(tag)).build())
        .collect::<Vec<_>>();

    let extensions = item
        .custom_data
        .as_ref()
        .map(|media| extension_map("media", media_content(media)))
        .unwrap_or_default();

    Ok(ItemBuilder::default()
        .title(xml_text(&item.title))
        .link(link.clone())
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(xml_text(&item.description))
        .pub_date(item.pub_date.to_rfc2822())
        .categories(categories)
        .extensions(extensions)
        .build())
}

/// Drop characters XML 1.0 cannot carry, even escaped.
fn xml_text(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || ('\u{20}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || c >= '\u{10000}'
        })
        .collect()
}

/// `{prefix: {local name: [extension]}}`, the shape the `rss` writer expects.
fn extension_map(prefix: &str, extension: Extension) -> ExtensionMap {
    let local = extension
        .name()
        .split_once(':')
        .map_or(extension.name(), |(_, local)| local)
        .to_string();
    let mut inner = BTreeMap::new();
    inner.insert(local, vec![extension]);
    let mut map = ExtensionMap::new();
    map.insert(prefix.to_string(), inner);
    map
}

fn atom_self_link(href: &Url) -> Extension {
    let attrs = BTreeMap::from([
        ("href".to_string(), href.to_string()),
        ("rel".to_string(), "self".to_string()),
        ("type".to_string(), mime::types::RSS_FEED.to_string()),
    ]);
    ExtensionBuilder::default()
        .name("atom:link".to_string())
        .attrs(attrs)
        .build()
}

fn media_content(media: &MediaContent) -> Extension {
    let attrs = BTreeMap::from([
        ("type".to_string(), media.mime.to_string()),
        ("width".to_string(), media.width.to_string()),
        ("height".to_string(), media.height.to_string()),
        ("medium".to_string(), MediaContent::MEDIUM.to_string()),
        ("url".to_string(), media.url.to_string()),
    ]);
    ExtensionBuilder::default()
        .name("media:content".to_string())
        .attrs(attrs)
        .build()
}

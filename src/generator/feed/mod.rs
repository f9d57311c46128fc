//! RSS feed generation.
//!
//! - [`item`]: validated entries -> [`FeedItem`]s (link, optional media)
//! - [`document`]: channel metadata + items -> RSS 2.0 XML

mod document;
mod item;

pub use document::{FeedDocument, FeedMeta};
pub use item::{ItemMapper, item_link};

#[cfg(test)]
pub(crate) use item::tests::entry as test_entry;

use crate::config::SiteConfig;
use crate::content::Entry;
use crate::generator::RequestContext;
use crate::image::ImageTransformer;
use crate::logger::ProgressLine;
use anyhow::Result;

/// Render the feed for `entries`.
///
/// Social images go through `images` when `feed.social_images` is on; a
/// failure on any of them fails the whole feed.
pub fn render_feed(
    config: &SiteConfig,
    entries: &[Entry],
    ctx: &RequestContext,
    images: Option<&dyn ImageTransformer>,
    progress: Option<&ProgressLine>,
) -> Result<String> {
    let mut mapper = ItemMapper::new(ctx, &config.feed.link_prefix);
    if config.feed.social_images
        && let Some(transformer) = images
    {
        mapper = mapper.with_images(transformer, config.feed.image_format);
    }

    let items = mapper.map_all(entries, progress)?;
    let document = FeedDocument::new(FeedMeta::from_config(config)?, items);
    document.to_xml(ctx)
}

//! Post -> feed item.

use crate::config::ImageEncoding;
use crate::content::Entry;
use crate::generator::RequestContext;
use crate::image::ImageTransformer;
use crate::logger::ProgressLine;
use crate::utils::date::DateTimeUtc;
use anyhow::{Context, Result};
use rayon::prelude::*;
use url::Url;

/// `<media:content>` for an item's social image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaContent {
    pub url: Url,
    pub width: u32,
    pub height: u32,
    /// MIME type of the processed file.
    pub mime: &'static str,
}

impl MediaContent {
    pub const MEDIUM: &'static str = "image";
}

/// One `<item>` of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub pub_date: DateTimeUtc,
    pub updated_date: DateTimeUtc,
    pub tags: Vec<String>,
    /// Root-relative link, `{prefix}{slug}/`.
    pub link: String,
    pub custom_data: Option<MediaContent>,
}

/// `{prefix}{slug}/`
pub fn item_link(prefix: &str, slug: &str) -> String {
    format!("{prefix}{slug}/")
}

/// Maps collection entries to feed items, optionally processing social images.
pub struct ItemMapper<'a> {
    ctx: &'a RequestContext,
    link_prefix: &'a str,
    images: Option<(&'a dyn ImageTransformer, ImageEncoding)>,
}

impl<'a> ItemMapper<'a> {
    pub fn new(ctx: &'a RequestContext, link_prefix: &'a str) -> Self {
        Self {
            ctx,
            link_prefix,
            images: None,
        }
    }

    /// Embed each post's social image, converted to `format`.
    pub fn with_images(
        mut self,
        transformer: &'a dyn ImageTransformer,
        format: ImageEncoding,
    ) -> Self {
        self.images = Some((transformer, format));
        self
    }

    pub fn map(&self, entry: &Entry) -> Result<FeedItem> {
        let post = &entry.post;

        let custom_data = match self.images {
            Some((transformer, format)) => {
                let image = transformer
                    .transform(&post.social_image, format)
                    .with_context(|| format!("{}: socialImage", entry.id))?;
                Some(MediaContent {
                    url: self.ctx.resolve(&image.src)?,
                    width: image.width,
                    height: image.height,
                    mime: image.mime,
                })
            }
            None => None,
        };

        Ok(FeedItem {
            title: post.title.clone(),
            description: post.description.clone(),
            pub_date: post.pub_date,
            updated_date: post.updated_date,
            tags: post.tags.clone(),
            link: item_link(self.link_prefix, &entry.slug),
            custom_data,
        })
    }

    /// Map every entry in parallel, keeping entry order.
    ///
    /// Any failure fails the whole batch.
    pub fn map_all(
        &self,
        entries: &[Entry],
        progress: Option<&ProgressLine>,
    ) -> Result<Vec<FeedItem>> {
        entries
            .par_iter()
            .map(|entry| {
                let item = self.map(entry);
                if let Some(progress) = progress {
                    progress.inc();
                }
                item
            })
            .collect()
    }
}

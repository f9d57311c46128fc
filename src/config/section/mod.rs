//! Configuration section definitions.
//!
//! Each module corresponds to a section in `folio.toml`:
//!
//! | Module    | TOML Section             | Purpose                         |
//! |-----------|--------------------------|---------------------------------|
//! | `site`    | `[site]`                 | Title, description, base URL    |
//! | `content` | `[content]`              | Collection location, slug mode  |
//! | `feed`    | `[feed]`                 | RSS output and enrichment       |
//! | `robots`  | `[robots]`, `[sitemap]`  | Crawler directives, sitemaps    |
//! | `build`   | `[build]`                | Output paths, minification      |
//! | `serve`   | `[serve]`                | Development server              |

pub mod build;
pub mod content;
pub mod feed;
pub mod robots;
mod serve;
pub mod site;

pub use build::BuildSectionConfig;
pub use content::{ContentConfig, SlugMode};
pub use feed::{FeedConfig, ImageEncoding};
pub use robots::{RobotsConfig, SitemapConfig};
pub use serve::ServeConfig;
pub use site::SiteInfoConfig;

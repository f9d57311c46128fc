//! Steps shared by `build`, `serve` and `check`.

use anyhow::Result;

use crate::config::SiteConfig;
use crate::content::Collection;
use crate::image::FsAssetResolver;

/// Load and validate the configured collection.
///
/// Image references resolve relative to each entry, or to the content
/// directory for `/`-rooted references.
pub fn load_collection(config: &SiteConfig) -> Result<Collection> {
    let resolver = FsAssetResolver::new(&config.content.dir);
    Ok(Collection::load(&config.content, &resolver)?)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! A small on-disk site for command tests.

    use crate::config::{SiteConfig, test_parse_config};
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::path::Path;

    pub const FRONTMATTER: &str = "title: Hello\ndescription: First post\npubDate: 2024-01-15\nupdatedDate: 2024-02-01\nheroImage: ./hero.png\nsocialImage: ./social.png\nimageAlt: A hero\ntags: [rust]";

    /// `{root}/src/content/blog/{slug}.md` with two PNGs next to it.
    pub fn write_post(root: &Path, slug: &str, frontmatter: &str) {
        let dir = root.join("src/content/blog");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(format!("{slug}.md")),
            format!("---\n{frontmatter}\n---\n\nBody\n"),
        )
        .unwrap();
        for (name, w, h) in [("hero.png", 8, 4), ("social.png", 12, 6)] {
            let path = dir.join(name);
            if !path.exists() {
                RgbImage::from_pixel(w, h, Rgb([40, 80, 120])).save(path).unwrap();
            }
        }
    }

    /// Config rooted at `root`, with absolute content/output paths.
    pub fn config(root: &Path, extra: &str) -> SiteConfig {
        let mut config = test_parse_config(extra);
        config.root = root.to_path_buf();
        config.content.dir = root.join("src/content");
        config.build.output = root.join("dist");
        config
    }
}

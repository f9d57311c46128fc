//! Re-encode images into content-addressed files under the assets directory.
//!
//! `cover.png` -> `{output}/_assets/cover.3fa9c1d2.jpg`, served as
//! `/_assets/cover.3fa9c1d2.jpg`. The hash is taken from the source bytes, so
//! an unchanged source maps to the same file and is not encoded again.

use super::{ImageAsset, ImageError};
use crate::config::{ImageEncoding, SiteConfig};
use anyhow::Result;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Length of the content hash embedded in output file names.
const HASH_LEN: usize = 8;

static TMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A processed image ready to be linked from generated documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedImage {
    /// URL path, e.g. `/_assets/cover.3fa9c1d2.jpg`.
    pub src: String,
    /// Written file.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub mime: &'static str,
}

/// Converts an image asset into a servable file of a fixed encoding.
pub trait ImageTransformer: Sync {
    fn transform(
        &self,
        asset: &ImageAsset,
        format: ImageEncoding,
    ) -> Result<TransformedImage, ImageError>;
}

/// Filesystem-backed [`ImageTransformer`].
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    out_dir: PathBuf,
    /// URL path of `out_dir`, with leading and trailing slash.
    url_base: String,
}

impl ImageProcessor {
    pub fn new(out_dir: impl Into<PathBuf>, url_base: impl Into<String>) -> Self {
        let mut url_base = url_base.into();
        if !url_base.starts_with('/') {
            url_base.insert(0, '/');
        }
        if !url_base.ends_with('/') {
            url_base.push('/');
        }
        Self {
            out_dir: out_dir.into(),
            url_base,
        }
    }

    /// Processor writing to `build.assets` under the output directory.
    ///
    /// The URL keeps the site's path prefix, so a site at
    /// `https://example.com/blog/` serves images from `/blog/_assets/`.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let site = config.base_url()?;
        let url_base = format!("{}{}/", site.path(), config.build.assets);
        Ok(Self::new(config.build.assets_dir(), url_base))
    }

    fn output_name(source: &Path, bytes: &[u8], format: ImageEncoding) -> String {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_else(|| "image".into());
        let hash = blake3::hash(bytes);
        let hash = &hex::encode(hash.as_bytes())[..HASH_LEN];
        format!("{stem}.{hash}.{}", format.extension())
    }

    fn write(
        &self,
        img: &DynamicImage,
        target: &Path,
        format: ImageEncoding,
    ) -> Result<(), ImageError> {
        let io_err = |source| ImageError::Io {
            path: target.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.out_dir).map_err(io_err)?;

        // Concurrent posts may share an image, so each writer gets its own temp file
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .out_dir
            .join(format!(".{}.{}.{n}.tmp", std::process::id(), format.extension()));

        let encoded = match format {
            ImageEncoding::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
                .save_with_format(&tmp, ImageFormat::Jpeg),
            ImageEncoding::Png => img.save_with_format(&tmp, ImageFormat::Png),
            ImageEncoding::Webp => DynamicImage::ImageRgba8(img.to_rgba8())
                .save_with_format(&tmp, ImageFormat::WebP),
        };
        if let Err(source) = encoded {
            let _ = fs::remove_file(&tmp);
            return Err(ImageError::Encode {
                path: target.to_path_buf(),
                source,
            });
        }

        fs::rename(&tmp, target).map_err(io_err)
    }
}

impl ImageTransformer for ImageProcessor {
    fn transform(
        &self,
        asset: &ImageAsset,
        format: ImageEncoding,
    ) -> Result<TransformedImage, ImageError> {
        let bytes = fs::read(&asset.path).map_err(|source| ImageError::Io {
            path: asset.path.clone(),
            source,
        })?;

        let name = Self::output_name(&asset.path, &bytes, format);
        let target = self.out_dir.join(&name);

        let (width, height) = if target.is_file() {
            (asset.width, asset.height)
        } else {
            let img = image::load_from_memory(&bytes).map_err(|source| ImageError::Decode {
                path: asset.path.clone(),
                source,
            })?;
            self.write(&img, &target, format)?;
            (img.width(), img.height())
        };

        crate::debug!("image"; "{} -> {}", asset.reference, name);

        Ok(TransformedImage {
            src: format!("{}{name}", self.url_base),
            path: target,
            width,
            height,
            mime: format.mime(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_asset(dir: &Path, name: &str, width: u32, height: u32) -> ImageAsset {
        let path = dir.join(name);
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 128]))
            .save(&path)
            .unwrap();
        ImageAsset {
            reference: format!("./{name}"),
            path,
            width,
            height,
        }
    }

    #[test]
    fn test_transform_to_jpeg() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let asset = png_asset(src.path(), "cover.png", 6, 4);

        let processor = ImageProcessor::new(out.path(), "/_assets/");
        let image = processor.transform(&asset, ImageEncoding::Jpeg).unwrap();

        assert!(image.src.starts_with("/_assets/cover."));
        assert!(image.src.ends_with(".jpg"));
        assert_eq!((image.width, image.height), (6, 4));
        assert_eq!(image.mime, "image/jpeg");

        let written = image::open(&image.path).unwrap();
        assert_eq!((written.width(), written.height()), (6, 4));
        assert_eq!(
            image::ImageFormat::from_path(&image.path).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_transform_is_content_addressed() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let asset = png_asset(src.path(), "cover.png", 3, 3);

        let processor = ImageProcessor::new(out.path(), "_assets");
        let first = processor.transform(&asset, ImageEncoding::Jpeg).unwrap();
        let second = processor.transform(&asset, ImageEncoding::Jpeg).unwrap();
        assert_eq!(first, second);

        // Only the output file, no leftover temp files
        let files: Vec<_> = fs::read_dir(out.path()).unwrap().collect();
        assert_eq!(files.len(), 1);

        // Different bytes, different name
        let other = png_asset(src.path(), "cover.png", 5, 5);
        let third = processor.transform(&other, ImageEncoding::Jpeg).unwrap();
        assert_ne!(first.src, third.src);
    }

    #[test]
    fn test_url_base_normalized() {
        let processor = ImageProcessor::new("/tmp/out", "blog/_assets");
        assert_eq!(processor.url_base, "/blog/_assets/");
    }

    #[test]
    fn test_transform_missing_source() {
        let out = tempfile::tempdir().unwrap();
        let asset = ImageAsset {
            reference: "./gone.png".into(),
            path: out.path().join("gone.png"),
            width: 1,
            height: 1,
        };
        let processor = ImageProcessor::new(out.path(), "/_assets/");
        let err = processor.transform(&asset, ImageEncoding::Jpeg).unwrap_err();
        assert!(matches!(err, ImageError::Io { .. }));
    }

    #[test]
    fn test_from_config_keeps_site_path() {
        let mut config = crate::config::test_parse_config("");
        config.site.url = Some("https://example.com/blog".into());
        let processor = ImageProcessor::from_config(&config).unwrap();
        assert_eq!(processor.url_base, "/blog/_assets/");
    }
}

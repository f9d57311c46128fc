//! Site configuration management for `folio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── content    # [content]
//! │   ├── feed       # [feed]
//! │   ├── robots     # [robots], [sitemap]
//! │   ├── serve      # [serve]
//! │   └── site       # [site]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! Loading order: locate file, parse (unknown keys warned), check raw paths,
//! apply CLI overrides and make paths absolute, then validate everything and
//! report all problems at once.

pub mod section;
pub mod types;
mod util;

pub use section::{
    BuildSectionConfig, ContentConfig, FeedConfig, ImageEncoding, RobotsConfig, ServeConfig,
    SiteInfoConfig, SitemapConfig, SlugMode,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    log,
};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use url::Url;
use util::{find_config_file, normalize_path};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteInfoConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub robots: RobotsConfig,

    #[serde(default)]
    pub sitemap: SitemapConfig,

    #[serde(default)]
    pub build: BuildSectionConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file; the project root is the
    /// config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.validate_paths()?;

        config.config_path = normalize_path(&config_path);
        config.finalize(cli);
        config.validate(&cli.command)?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored: {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // accessors
    // ========================================================================

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Path relative to the site root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Point links at the dev server when no site URL is configured.
    ///
    /// `addr` is the address actually bound, which may differ from
    /// `serve.port` after a port retry.
    pub fn with_local_url(mut self, addr: SocketAddr) -> Self {
        if self.site.url.is_none() {
            self.site.url = Some(format!("http://{addr}/"));
        }
        self
    }

    /// Site base URL with trailing slash.
    ///
    /// Validation guarantees this for `build`; `serve` fills in the bound
    /// address when no URL is configured.
    pub fn base_url(&self) -> Result<Url> {
        self.site
            .base_url()
            .ok_or_else(|| anyhow!("site.url is missing or invalid"))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.root = root;

        Self::update_option(&mut self.content.dir, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.content.dir = normalize_path(&self.root.join(&self.content.dir));
        self.build.output = normalize_path(&self.root.join(&self.build.output));

        self.apply_command_options(&cli.command);
    }

    fn apply_command_options(&mut self, command: &Commands) {
        match command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Serve {
                build_args,
                interface,
                port,
            } => {
                self.apply_build_args(build_args);
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Check { verbose } => crate::logger::set_verbose(*verbose),
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.build.minify, args.minify.as_ref());
        Self::update_option(&mut self.feed.social_images, args.social_images.as_ref());
        self.build.clean = args.clean;

        if let Some(ref url) = args.site_url {
            self.site.url = Some(url.clone());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Checks that need the paths exactly as the user wrote them.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.content.validate_paths(&mut diag);
        self.build.validate_paths(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Validate configuration for the given command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, command: &Commands) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        let url_required = matches!(command, Commands::Build { .. });
        self.site.validate(url_required, &mut diag);
        self.content.validate(&mut diag);
        self.feed.validate(&mut diag);
        section::robots::validate(&self.robots, &self.sitemap, &mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(ConfigError::Diagnostics)
            .with_context(|| format!("in {}", self.config_path.display()))
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal required `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!(
        "[site]\ntitle = \"Test\"\ndescription = \"Test\"\nurl = \"https://example.com/\"\n{extra}"
    );
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = test_parse_config("");
        assert_eq!(config.site.title, "Test");
        assert_eq!(config.base_url().unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) =
            SiteConfig::parse_with_ignored("[site]\ntitle = \"x\"\ntitel = \"y\"\n[feeds]\n")
                .unwrap();
        assert!(ignored.iter().any(|f| f == "site.titel"));
        assert!(ignored.iter().any(|f| f == "feeds"));
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(SiteConfig::from_str("[site\n").is_err());
    }

    #[test]
    fn test_validate_reports_all_sections() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::from_str(
            "[site]\ntitle = \"\"\ndescription = \"d\"\n[feed]\nlink_prefix = \"x\"",
        )
        .unwrap();
        config.content.dir = tmp.path().to_path_buf();

        let command = Commands::Build {
            build_args: BuildArgs::default(),
        };
        let err = config.validate(&command).unwrap_err();
        let diag = err
            .downcast_ref::<ConfigError>()
            .and_then(|e| match e {
                ConfigError::Diagnostics(d) => Some(d),
                _ => None,
            })
            .expect("diagnostics");

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"site.title"));
        assert!(fields.contains(&"site.url"));
        assert!(fields.contains(&"content.collection"));
        assert!(fields.contains(&"feed.link_prefix"));
    }

    #[test]
    fn test_local_url_uses_bound_address() {
        let mut config = test_parse_config("");
        config.site.url = None;
        config.apply_command_options(&Commands::Serve {
            build_args: BuildArgs::default(),
            interface: None,
            port: Some(8080),
        });
        assert!(config.site.url.is_none());

        let bound: SocketAddr = "127.0.0.1:8082".parse().unwrap();
        let config = config.with_local_url(bound);
        assert_eq!(config.base_url().unwrap().as_str(), "http://127.0.0.1:8082/");

        let configured = test_parse_config("").with_local_url(bound);
        assert_eq!(configured.base_url().unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn test_build_args_override() {
        let mut config = test_parse_config("");
        let args = BuildArgs {
            minify: Some(true),
            social_images: Some(false),
            site_url: Some("https://cdn.example.org/blog".into()),
            ..Default::default()
        };
        config.apply_command_options(&Commands::Build { build_args: args });
        assert!(config.build.minify);
        assert!(!config.feed.social_images);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://cdn.example.org/blog/"
        );
    }
}

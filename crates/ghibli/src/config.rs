//! Configuration file (site.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ghibli_static::{BuildConfig, SiteMeta};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
    #[serde(default = "default_backup")]
    pub backup: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            backup: default_backup(),
        }
    }
}

/// Site text overrides; anything unset keeps the built-in default.
#[derive(Debug, Deserialize, Default)]
pub struct SiteConfig {
    name: Option<String>,
    logo: Option<String>,
    tagline: Option<String>,
    title: Option<String>,
    description: Option<String>,
    stylesheet: Option<String>,
    /// Empty string disables the script
    decoration_script: Option<String>,
    attribution_name: Option<String>,
    attribution_url: Option<String>,
    copyright: Option<String>,
}

impl SiteConfig {
    pub fn into_meta(self) -> SiteMeta {
        let defaults = SiteMeta::default();
        SiteMeta {
            name: self.name.unwrap_or(defaults.name),
            logo: self.logo.unwrap_or(defaults.logo),
            tagline: self.tagline.unwrap_or(defaults.tagline),
            title: self.title.unwrap_or(defaults.title),
            description: self.description.unwrap_or(defaults.description),
            stylesheet: self.stylesheet.unwrap_or(defaults.stylesheet),
            decoration_script: match self.decoration_script {
                Some(script) if script.is_empty() => None,
                Some(script) => Some(script),
                None => defaults.decoration_script,
            },
            attribution_name: self.attribution_name.unwrap_or(defaults.attribution_name),
            attribution_url: self.attribution_url.unwrap_or(defaults.attribution_url),
            copyright: self.copyright.unwrap_or(defaults.copyright),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_public")]
    pub public: String,
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            public: default_public(),
            minify: default_minify(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}
fn default_backup() -> String {
    "data/complete-backup.json".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_public() -> String {
    "public".to_string()
}
fn default_minify() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

impl ConfigFile {
    /// Build configuration with CLI overrides applied.
    pub fn build_config(self, output: Option<PathBuf>, minify: Option<bool>) -> BuildConfig {
        BuildConfig {
            backup_path: PathBuf::from(&self.data.backup),
            public_dir: PathBuf::from(&self.build.public),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.build.output)),
            minify: minify.unwrap_or(self.build.minify),
            site: self.site.into_meta(),
        }
    }
}

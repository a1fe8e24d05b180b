use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SiteError;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub paths: PathsConfig,
    pub template: TemplateConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix substituted for root-relative `href="/` and `src="/` links.
    pub base_path: String,
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub content: PathBuf,
    pub static_dir: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            static_dir: PathBuf::from("static"),
            template: PathBuf::from("template.html"),
            output: PathBuf::from("docs"),
        }
    }
}

/// Markers in the page template that receive the title and rendered body.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TemplateConfig {
    pub title_placeholder: String,
    pub content_placeholder: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            title_placeholder: "{{ Title }}".to_string(),
            content_placeholder: "{{ Content }}".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|source| SiteError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(SiteError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

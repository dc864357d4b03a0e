use serde::{Deserialize, Serialize};
use spanweave_engine::ingest::{ContentModel, HtmlAsRichTextConfig, SerializerEntry};
use spanweave_engine::model::Direction;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No ingestion profile named {name:?}")]
    UnknownProfile { name: String },
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Profile used when none is named.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Where converted files go when no output path is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

/// Saved ingestion settings for one content source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Ordered, since the first matching selector rule wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub serializer: Vec<SerializerRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ContentModel>,
}

/// Maps a tag name or CSS selector to a node type shorthand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerRule {
    pub key: String,
    pub node: String,
}

impl Profile {
    pub fn to_ingest_config(&self) -> HtmlAsRichTextConfig {
        HtmlAsRichTextConfig {
            container: self.container.clone(),
            exclude: self.exclude.clone(),
            include: self.include.clone(),
            serializer: self
                .serializer
                .iter()
                .map(|rule| (rule.key.clone(), SerializerEntry::Shorthand(rule.node.clone())))
                .collect(),
            model: self.model.clone(),
            direction: self.direction,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the output directory
        if let Some(dir) = config.output_dir.take() {
            config.output_dir = Some(Self::expand_path(&dir).unwrap_or(dir));
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/spanweave");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The named profile, else the default one, else an empty profile.
    pub fn profile(&self, name: Option<&str>) -> Result<Profile, ConfigError> {
        match name.or(self.default_profile.as_deref()) {
            Some(name) => {
                self.profiles
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownProfile {
                        name: name.to_string(),
                    })
            }
            None => Ok(Profile::default()),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

//! FAQ desk configuration.
//!
//! Lives in `config.toml`; every field has a default so a missing file (or
//! a file with only a few keys) is valid.
//!
//! Lookup order: explicit path, `$FAQ_CONFIG`, `<config dir>/faq/config.toml`,
//! then built-in defaults.

use crate::annotator::EntityEntry;
use crate::error::ConfigError;
use crate::store::DataSources;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV: &str = "FAQ_CONFIG";
const CONFIG_DIR: &str = "faq";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub subject: SubjectConfig,
    #[serde(default)]
    pub links: LinkConfig,
    #[serde(default)]
    pub dialog: DialogConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

/// Where the three aligned data files live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_questions")]
    pub questions: String,
    #[serde(default = "default_answers")]
    pub answers: String,
    #[serde(default = "default_patterns")]
    pub patterns: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_questions() -> String {
    "questions.txt".to_string()
}

fn default_answers() -> String {
    "answers.txt".to_string()
}

fn default_patterns() -> String {
    "fuzzy_regex.txt".to_string()
}

impl DataConfig {
    pub fn sources(&self) -> DataSources {
        DataSources {
            questions: self.dir.join(&self.questions),
            answers: self.dir.join(&self.answers),
            patterns: self.dir.join(&self.patterns),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            questions: default_questions(),
            answers: default_answers(),
            patterns: default_patterns(),
        }
    }
}

/// The one topic the bot answers about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectConfig {
    /// Compared verbatim against detected entity text
    #[serde(default = "default_subject_name")]
    pub name: String,
    /// Used in the banner and the redirect message
    #[serde(default = "default_subject_display")]
    pub display_name: String,
}

fn default_subject_name() -> String {
    "muhammad ali".to_string()
}

fn default_subject_display() -> String {
    "Muhammad Ali".to_string()
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            name: default_subject_name(),
            display_name: default_subject_display(),
        }
    }
}

/// URL templates; `{}` is replaced with the encoded target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default = "default_map_search")]
    pub map_search: String,
    #[serde(default = "default_encyclopedia")]
    pub encyclopedia: String,
}

fn default_map_search() -> String {
    "https://www.google.com/maps/search/{}".to_string()
}

fn default_encyclopedia() -> String {
    "https://en.wikipedia.org/wiki/{}".to_string()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            map_search: default_map_search(),
            encyclopedia: default_encyclopedia(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Answer greetings before running the matcher
    #[serde(default)]
    pub greet_first: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` wins
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Environment variable checked first for the bot token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// File holding the bot token when the variable is unset
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

fn default_token_env() -> String {
    "DISCORD_TOKEN".to_string()
}

fn default_token_file() -> PathBuf {
    PathBuf::from("bot_token.txt")
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            token_file: default_token_file(),
        }
    }
}

/// Extra gazetteer entries for the built-in annotator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconConfig {
    #[serde(default)]
    pub entities: Vec<EntityEntry>,
}

impl FaqConfig {
    /// Load from an explicit path, the environment, or the user config dir.
    ///
    /// An explicit or `$FAQ_CONFIG` path must exist; the user config file is
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }
        match Self::user_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `<config dir>/faq/config.toml`
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}

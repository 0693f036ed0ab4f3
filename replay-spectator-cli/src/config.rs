//! Configuration loading and parsing

use anyhow::{Context, Result};
use replay_spectator::{Hero, HeroClass, HeroTable, SelectorConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Report file (default: stdout)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Hero class overrides on top of the built-in roster
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RosterConfig {
    /// Start from an empty table instead of the built-in roster
    #[serde(default)]
    pub replace_standard: bool,
    /// Hero name -> class
    #[serde(default)]
    pub classes: BTreeMap<String, HeroClass>,
}

impl RosterConfig {
    /// Build the hero table this roster describes
    pub fn hero_table(&self) -> HeroTable {
        let mut table = if self.replace_standard {
            HeroTable::new()
        } else {
            HeroTable::standard()
        };

        for (name, class) in &self.classes {
            table.insert(Hero::new(name.clone(), *class));
        }

        table
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .selector
        .validate()
        .with_context(|| format!("Invalid [selector] section in {:?}", path))?;

    Ok(config)
}

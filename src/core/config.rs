use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::grammar::{Grammar, GrammarOverrides};
use super::types::Category;

/// Per-category selector passed after the category flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySelectors {
    pub device: String,
    pub memory: String,
    pub temperature: String,
    pub usage: String,
}

impl Default for CategorySelectors {
    fn default() -> Self {
        Self {
            device: "DEVICE".to_string(),
            memory: "MEMORY".to_string(),
            temperature: "TEMP".to_string(),
            usage: "USAGE".to_string(),
        }
    }
}

impl CategorySelectors {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Device => &self.device,
            Category::Memory => &self.memory,
            Category::Temperature => &self.temperature,
            Category::Usage => &self.usage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Program name looked up on PATH, or a path to the binary
    #[serde(default = "default_executable")]
    pub executable: String,
    #[serde(default = "default_query_flag")]
    pub query_flag: String,
    #[serde(default = "default_category_flag")]
    pub category_flag: String,
    #[serde(default)]
    pub selectors: CategorySelectors,
    #[serde(default)]
    pub grammar: GrammarOverrides,
}

fn default_executable() -> String {
    "efsmi".to_string()
}

fn default_query_flag() -> String {
    "-q".to_string()
}

fn default_category_flag() -> String {
    "-d".to_string()
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            query_flag: default_query_flag(),
            category_flag: default_category_flag(),
            selectors: CategorySelectors::default(),
            grammar: GrammarOverrides::default(),
        }
    }
}

impl DetectorConfig {
    /// Load from the user config directory, defaulting when no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, data).with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("gcu-probe").join("config.json"))
    }

    /// Argument vector for one category query, e.g. `-q -d MEMORY`
    pub fn args_for(&self, category: Category) -> [&str; 3] {
        [
            self.query_flag.as_str(),
            self.category_flag.as_str(),
            self.selectors.get(category),
        ]
    }

    /// Built-in efsmi grammar with this config's overrides applied
    pub fn build_grammar(&self) -> crate::Result<Grammar> {
        Grammar::efsmi().with_overrides(&self.grammar)
    }
}
